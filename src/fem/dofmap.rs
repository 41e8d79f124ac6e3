//! `DofMap`: local-to-global dof indexing of a finite element space.
//!
//! A dof map wraps a [`SharedDescriptor`] bound to one mesh, plus the offset
//! at which its dofs start when it represents a sub-space of a larger
//! composite space. It exposes per-cell tabulation, sub-space extraction and
//! collapsing onto an independent numbering.
//!
//! # Offsets
//! Every tabulated index is shifted by [`DofMap::offset`]. The offset is fixed
//! at construction: it is zero for maps built directly from a descriptor and
//! for collapsed maps, and is accumulated from sibling sub-spaces for maps
//! produced by [`DofMap::extract_sub_dofmap`]. The offset never changes
//! [`DofMap::global_dimension`], only the range of indices the map occupies.
//!
//! # Threads
//! Tabulation only takes a read lock on the descriptor, so different cells
//! may be tabulated concurrently, each caller with its own [`CellView`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashSet;

use crate::dofmap_error::DofMapError;
use crate::fem::descriptor::{ElementDofDescriptor, SharedDescriptor, share};
use crate::fem::extract::extract_sub_descriptor;
use crate::topology::cell::CellView;
use crate::topology::mesh::MeshTopology;
use crate::topology::summary::MeshSummary;

/// Translation from a collapsed map's dofs to the original map's dofs.
pub type CollapseMap = BTreeMap<usize, usize>;

/// Dof map of a (sub-)space over one mesh.
#[derive(Clone, Debug)]
pub struct DofMap {
    descriptor: SharedDescriptor,
    summary: MeshSummary,
    offset: usize,
}

static_assertions::assert_impl_all!(DofMap: Send, Sync);

impl DofMap {
    /// Materialize the mesh entities `descriptor` needs, then initialize.
    ///
    /// In distributed mode entities of dimension `tdim - 1` are always
    /// materialized and globally numbered, whether or not the element needs
    /// them.
    pub fn new<M: MeshTopology + ?Sized>(
        descriptor: SharedDescriptor,
        mesh: &mut M,
    ) -> Result<Self, DofMapError> {
        materialize_entities(&**descriptor.read(), mesh)?;
        Self::from_initialized(descriptor, mesh)
    }

    /// Initialize against a mesh whose required entities already exist.
    pub fn from_initialized<M: MeshTopology + ?Sized>(
        descriptor: SharedDescriptor,
        mesh: &M,
    ) -> Result<Self, DofMapError> {
        Self::with_offset(descriptor, mesh, 0)
    }

    fn with_offset<M: MeshTopology + ?Sized>(
        descriptor: SharedDescriptor,
        mesh: &M,
        offset: usize,
    ) -> Result<Self, DofMapError> {
        let started = Instant::now();
        let summary = MeshSummary::from_mesh(mesh)?;
        init_descriptor(&mut **descriptor.write(), &summary, mesh)?;
        log::debug!(
            "Init dofmap: {} cells in {:?}",
            summary.num_cells(),
            started.elapsed()
        );
        let map = Self {
            descriptor,
            summary,
            offset,
        };
        map.validate_cells(mesh)?;
        Ok(map)
    }

    /// The shared descriptor behind this map.
    pub fn descriptor(&self) -> &SharedDescriptor {
        &self.descriptor
    }

    pub fn mesh_summary(&self) -> &MeshSummary {
        &self.summary
    }

    /// Index at which this map's dofs start in the enclosing numbering.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn signature(&self) -> String {
        self.descriptor.read().signature()
    }

    /// Total number of dofs of the space.
    pub fn global_dimension(&self) -> usize {
        self.descriptor.read().global_dimension()
    }

    pub fn local_dimension(&self, cell: &CellView) -> usize {
        self.descriptor.read().local_dimension(cell)
    }

    pub fn max_local_dimension(&self) -> usize {
        self.descriptor.read().max_local_dimension()
    }

    pub fn geometric_dimension(&self) -> usize {
        self.descriptor.read().geometric_dimension()
    }

    pub fn num_facet_dofs(&self) -> usize {
        self.descriptor.read().num_facet_dofs()
    }

    pub fn num_sub_dof_maps(&self) -> usize {
        self.descriptor.read().num_sub_dof_maps()
    }

    /// Global dofs of the cell `view` is positioned on.
    pub fn tabulate_cell_dofs(&self, view: &CellView) -> Vec<usize> {
        let mut dofs = self.descriptor.read().tabulate_dofs(view);
        if self.offset > 0 {
            for dof in &mut dofs {
                *dof += self.offset;
            }
        }
        dofs
    }

    /// Global dofs of `cell`.
    pub fn tabulate_dofs<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
        cell: usize,
    ) -> Result<Vec<usize>, DofMapError> {
        let view = CellView::for_cell(mesh, cell)?;
        Ok(self.tabulate_cell_dofs(&view))
    }

    /// Cell-local positions of the dofs on `local_facet`.
    ///
    /// Positions index into the list returned by the tabulation methods, so
    /// the offset is already accounted for there.
    pub fn tabulate_facet_dofs(&self, local_facet: usize) -> Vec<usize> {
        self.descriptor.read().tabulate_facet_dofs(local_facet)
    }

    /// Coordinates of the dof points of the cell `view` is positioned on,
    /// one row per local dof.
    pub fn tabulate_cell_coordinates(&self, view: &CellView) -> Vec<Vec<f64>> {
        self.descriptor.read().tabulate_coordinates(view)
    }

    /// Coordinates of the dof points of `cell`.
    pub fn tabulate_coordinates<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
        cell: usize,
    ) -> Result<Vec<Vec<f64>>, DofMapError> {
        let view = CellView::for_cell(mesh, cell)?;
        Ok(self.tabulate_cell_coordinates(&view))
    }

    /// Dof map of the sub-space selected by `component`, e.g. `[1]` for
    /// sub-space 1 or `[1, 0]` for sub-space 0 of sub-space 1.
    ///
    /// The result numbers its dofs inside this map's numbering: its offset is
    /// this map's offset plus the dimensions of all preceding siblings at
    /// every level of the path.
    pub fn extract_sub_dofmap<M: MeshTopology + ?Sized>(
        &self,
        component: &[usize],
        mesh: &M,
    ) -> Result<DofMap, DofMapError> {
        let (sub, offset) = {
            let descriptor = self.descriptor.read();
            extract_sub_descriptor(&**descriptor, component, &self.summary, mesh)?
        };
        log::debug!("Extracted dof map for sub system: {}", sub.signature());
        log::debug!("Offset for sub system: {offset}");
        DofMap::with_offset(share(sub), mesh, self.offset + offset)
    }

    /// Dof map on the same descriptor with an independent, zero-offset
    /// numbering, plus the translation from its dofs to this map's dofs.
    ///
    /// The table is filled cell by cell in ascending order; when two cells
    /// disagree on the original index of a collapsed dof, the later cell wins.
    pub fn collapse<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
    ) -> Result<(DofMap, CollapseMap), DofMapError> {
        let collapsed = DofMap::from_initialized(Arc::clone(&self.descriptor), mesh)?;
        debug_assert_eq!(collapsed.global_dimension(), self.global_dimension());

        let mut cells = Vec::with_capacity(mesh.num_cells());
        let mut view = CellView::new(mesh);
        for cell in 0..mesh.num_cells() {
            view.update(mesh, cell)?;
            cells.push((collapsed.tabulate_cell_dofs(&view), self.tabulate_cell_dofs(&view)));
        }
        Ok((collapsed, collapse_translation(cells)))
    }

    /// Every dof touched by some cell, each once.
    ///
    /// Without `sort` the dofs come in first-touch order over ascending cells.
    pub fn dofs<M: MeshTopology + ?Sized>(
        &self,
        mesh: &M,
        sort: bool,
    ) -> Result<Vec<usize>, DofMapError> {
        let mut seen = HashSet::with_capacity(self.global_dimension());
        let mut dofs = Vec::with_capacity(self.global_dimension());
        let mut view = CellView::new(mesh);
        for cell in 0..mesh.num_cells() {
            view.update(mesh, cell)?;
            for dof in self.tabulate_cell_dofs(&view) {
                if seen.insert(dof) {
                    dofs.push(dof);
                }
            }
        }
        if sort {
            dofs.sort_unstable();
        }
        Ok(dofs)
    }

    /// Check every cell's dof list against the map's dimensions.
    pub fn validate_cells<M: MeshTopology + ?Sized>(&self, mesh: &M) -> Result<(), DofMapError> {
        let max_local = self.max_local_dimension();
        let range = self.offset..self.offset + self.global_dimension();
        let mut view = CellView::new(mesh);
        for cell in 0..mesh.num_cells() {
            view.update(mesh, cell)?;
            let dofs = self.tabulate_cell_dofs(&view);
            let local = self.local_dimension(&view);
            if dofs.len() != local || local > max_local {
                return Err(DofMapError::InvalidDofs(format!(
                    "cell {cell} tabulated {} dofs for local dimension {local} (maximum {max_local})",
                    dofs.len()
                )));
            }
            if let Some(dof) = dofs.iter().find(|&&dof| !range.contains(&dof)) {
                return Err(DofMapError::InvalidDofs(format!(
                    "cell {cell} has dof {dof} outside {range:?}"
                )));
            }
        }
        Ok(())
    }

    /// Human-readable summary; `verbose` adds the descriptor's layout data.
    pub fn describe(&self, verbose: bool) -> String {
        let short = format!("<DofMap of global dimension {}>", self.global_dimension());
        if !verbose {
            return short;
        }
        let descriptor = self.descriptor.read();
        let mut s = String::new();
        s.push_str(&short);
        s.push_str("\n\n");
        s.push_str(&format!("  Signature:               {}\n", descriptor.signature()));
        s.push_str(&format!("  Global dimension:        {}\n", descriptor.global_dimension()));
        s.push_str(&format!("  Maximum local dimension: {}\n", descriptor.max_local_dimension()));
        s.push_str(&format!("  Geometric dimension:     {}\n", descriptor.geometric_dimension()));
        s.push_str(&format!("  Number of sub dofmaps:   {}\n", descriptor.num_sub_dof_maps()));
        s.push_str(&format!("  Number of facet dofs:    {}\n", descriptor.num_facet_dofs()));
        s
    }
}

impl fmt::Display for DofMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(false))
    }
}

/// Pair collapsed and original dofs position by position, cell by cell.
/// A collapsed dof seen again overwrites its earlier entry.
fn collapse_translation<I>(cells: I) -> CollapseMap
where
    I: IntoIterator<Item = (Vec<usize>, Vec<usize>)>,
{
    let mut translation = CollapseMap::new();
    for (collapsed, original) in cells {
        translation.extend(collapsed.into_iter().zip(original));
    }
    translation
}

/// Materialize (and, when distributed, globally number) the entity
/// dimensions `descriptor` depends on.
fn materialize_entities<M: MeshTopology + ?Sized>(
    descriptor: &dyn ElementDofDescriptor,
    mesh: &mut M,
) -> Result<(), DofMapError> {
    let tdim = mesh.topological_dimension();
    let distributed = mesh.is_distributed();
    for dim in 1..=tdim {
        let facets = distributed && dim + 1 == tdim;
        if descriptor.needs_mesh_entities(dim) || facets {
            mesh.init(dim);
            if distributed {
                mesh.number_entities(dim)?;
            }
        }
    }
    Ok(())
}

/// Check the element against the mesh's cells and entity availability, then bind `descriptor` to the mesh, running
/// the per-cell pass if the descriptor asks for it.
pub(crate) fn init_descriptor<M: MeshTopology + ?Sized>(
    descriptor: &mut dyn ElementDofDescriptor,
    summary: &MeshSummary,
    mesh: &M,
) -> Result<(), DofMapError> {
    let mesh_dimension = mesh.topological_dimension();
    if descriptor.topological_dimension() != Some(mesh_dimension) {
        return Err(DofMapError::IncompatibleElement {
            signature: descriptor.signature(),
            mesh_dimension,
        });
    }
    for dim in 0..=mesh_dimension {
        if descriptor.needs_mesh_entities(dim) && mesh.num_entities(dim) == 0 {
            return Err(DofMapError::MissingEntities { dim });
        }
    }
    if descriptor.init_mesh(summary) {
        log::trace!(
            "per-cell initialization of {} over {} cells",
            descriptor.signature(),
            mesh.num_cells()
        );
        let mut view = CellView::new(mesh);
        for cell in 0..mesh.num_cells() {
            view.update(mesh, cell)?;
            descriptor.init_cell(summary, &view);
        }
        descriptor.init_cell_finalize();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fem::config::ElementSpec;
    use crate::topology::cell_type::CellType;
    use crate::topology::simplex_mesh::SimplexMesh;

    fn p1_p1_interval(n: usize) -> (SimplexMesh, DofMap) {
        let mut mesh = SimplexMesh::unit_interval(n).unwrap();
        let p1 = ElementSpec::lagrange(CellType::Interval, 1);
        let map = DofMap::new(ElementSpec::vector(p1, 2).shared(), &mut mesh).unwrap();
        (mesh, map)
    }

    #[test]
    fn new_materializes_needed_entities() {
        let mut mesh = SimplexMesh::unit_square(2, 2).unwrap();
        assert!(!mesh.is_initialized(1));
        let map = DofMap::new(ElementSpec::lagrange(CellType::Triangle, 2).shared(), &mut mesh).unwrap();
        assert!(mesh.is_initialized(1));
        // 9 vertices + 16 edges
        assert_eq!(map.global_dimension(), 25);
        assert_eq!(map.max_local_dimension(), 6);
        assert_eq!(map.offset(), 0);
    }

    #[test]
    fn sub_dofmap_tabulates_inside_parent_range() {
        let (mesh, map) = p1_p1_interval(3);
        let second = map.extract_sub_dofmap(&[1], &mesh).unwrap();
        assert_eq!(second.offset(), 4);
        assert_eq!(second.global_dimension(), 4);
        let parent = map.tabulate_dofs(&mesh, 1).unwrap();
        let sub = second.tabulate_dofs(&mesh, 1).unwrap();
        assert_eq!(&parent[2..], sub.as_slice());
    }

    #[test]
    fn collapse_restarts_numbering_at_zero() {
        let (mesh, map) = p1_p1_interval(3);
        let second = map.extract_sub_dofmap(&[1], &mesh).unwrap();
        let (collapsed, translation) = second.collapse(&mesh).unwrap();
        assert_eq!(collapsed.offset(), 0);
        assert_eq!(collapsed.global_dimension(), second.global_dimension());
        assert_eq!(translation.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(translation.values().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn translation_keeps_last_cell_on_conflict() {
        // two cells disagree on where collapsed dof 0 comes from
        let translation = collapse_translation(vec![
            (vec![0, 1], vec![4, 5]),
            (vec![0, 2], vec![7, 6]),
        ]);
        assert_eq!(translation.len(), 3);
        assert_eq!(translation[&0], 7);
        assert_eq!(translation[&1], 5);
        assert_eq!(translation[&2], 6);
    }

    #[test]
    fn dofs_first_touch_order_and_sorted() {
        let mut mesh = SimplexMesh::unit_square(1, 1).unwrap();
        let map = DofMap::new(ElementSpec::lagrange(CellType::Triangle, 1).shared(), &mut mesh).unwrap();
        // cells [0, 1, 3] and [0, 2, 3]
        assert_eq!(map.dofs(&mesh, false).unwrap(), vec![0, 1, 3, 2]);
        assert_eq!(map.dofs(&mesh, true).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn describe_short_and_verbose() {
        let (_, map) = p1_p1_interval(1);
        assert_eq!(map.describe(false), "<DofMap of global dimension 4>");
        assert_eq!(map.to_string(), map.describe(false));
        let verbose = map.describe(true);
        assert!(verbose.starts_with("<DofMap of global dimension 4>\n"));
        assert!(verbose.contains("Signature:"));
        assert!(verbose.contains("Number of sub dofmaps:   2"));
        assert!(verbose.contains("Number of facet dofs:    2"));
    }

    #[test]
    fn tabulate_out_of_range_cell() {
        let (mesh, map) = p1_p1_interval(2);
        assert_eq!(
            map.tabulate_dofs(&mesh, 2).unwrap_err(),
            DofMapError::CellOutOfRange {
                cell: 2,
                num_cells: 2
            }
        );
    }

    #[test]
    fn validate_cells_accepts_built_in_elements() {
        let (mesh, map) = p1_p1_interval(4);
        map.validate_cells(&mesh).unwrap();
        map.extract_sub_dofmap(&[1], &mesh)
            .unwrap()
            .validate_cells(&mesh)
            .unwrap();
    }
}
