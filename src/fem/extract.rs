//! Sub-space descriptor extraction and offset accumulation.
//!
//! Dofs of sibling sub-spaces are numbered contiguously in sub-space order,
//! so the offset of sub-space `i` is the sum of the global dimensions of
//! sub-spaces `0..i`. Those dimensions are only known once each sibling has
//! been initialized against the mesh, hence every preceding sibling is
//! instantiated and initialized just to be measured.

use crate::dofmap_error::DofMapError;
use crate::fem::descriptor::ElementDofDescriptor;
use crate::fem::dofmap::init_descriptor;
use crate::topology::mesh::MeshTopology;
use crate::topology::summary::MeshSummary;

fn check_sub_space(parent: &dyn ElementDofDescriptor, index: usize) -> Result<(), DofMapError> {
    let available = parent.num_sub_dof_maps();
    if available == 0 {
        return Err(DofMapError::NoSubspaces);
    }
    if index >= available {
        return Err(DofMapError::IndexOutOfRange { index, available });
    }
    Ok(())
}

/// Offset of sub-space `index` inside the numbering of `parent`.
pub fn sub_dofmap_offset<M: MeshTopology + ?Sized>(
    parent: &dyn ElementDofDescriptor,
    index: usize,
    summary: &MeshSummary,
    mesh: &M,
) -> Result<usize, DofMapError> {
    check_sub_space(parent, index)?;
    let mut offset = 0;
    for sibling in 0..index {
        let mut descriptor = parent
            .create_sub_dof_map(sibling)
            .ok_or(DofMapError::IndexOutOfRange {
                index: sibling,
                available: parent.num_sub_dof_maps(),
            })?;
        init_descriptor(descriptor.as_mut(), summary, mesh)?;
        offset += descriptor.global_dimension();
    }
    Ok(offset)
}

/// Walk `component` down the sub-space tree of `root`.
///
/// Returns a fresh, uninitialized descriptor of the selected sub-space and
/// its offset relative to `root`'s numbering, accumulated over all levels.
pub fn extract_sub_descriptor<M: MeshTopology + ?Sized>(
    root: &dyn ElementDofDescriptor,
    component: &[usize],
    summary: &MeshSummary,
    mesh: &M,
) -> Result<(Box<dyn ElementDofDescriptor>, usize), DofMapError> {
    let (&first, rest) = component
        .split_first()
        .ok_or(DofMapError::EmptyComponent)?;

    let mut offset = sub_dofmap_offset(root, first, summary, mesh)?;
    let mut current = create_sub(root, first)?;
    for &index in rest {
        offset += sub_dofmap_offset(current.as_ref(), index, summary, mesh)?;
        current = create_sub(current.as_ref(), index)?;
    }
    Ok((current, offset))
}

fn create_sub(
    parent: &dyn ElementDofDescriptor,
    index: usize,
) -> Result<Box<dyn ElementDofDescriptor>, DofMapError> {
    parent
        .create_sub_dof_map(index)
        .ok_or(DofMapError::IndexOutOfRange {
            index,
            available: parent.num_sub_dof_maps(),
        })
}
