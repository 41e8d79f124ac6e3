//! Composite descriptor for mixed and vector elements.
//!
//! Sub-space `i` occupies the contiguous global range that starts after the
//! global dimensions of sub-spaces `0..i`, and the local layout is the
//! concatenation of the sub-element layouts in sub-space order.

use crate::fem::descriptor::ElementDofDescriptor;
use crate::fem::config::ElementSpec;
use crate::topology::cell::CellView;
use crate::topology::summary::MeshSummary;

/// Concatenation of sub-element descriptors.
#[derive(Debug)]
pub struct MixedDescriptor {
    specs: Vec<ElementSpec>,
    subs: Vec<Box<dyn ElementDofDescriptor>>,
    needs_cell_pass: Vec<bool>,
}

impl MixedDescriptor {
    pub fn new(specs: Vec<ElementSpec>) -> Self {
        let subs = specs.iter().map(ElementSpec::instantiate).collect();
        Self {
            needs_cell_pass: vec![false; specs.len()],
            specs,
            subs,
        }
    }

    /// Specs of the sub-elements, in sub-space order.
    pub fn specs(&self) -> &[ElementSpec] {
        &self.specs
    }
}

impl ElementDofDescriptor for MixedDescriptor {
    fn signature(&self) -> String {
        let parts: Vec<String> = self.subs.iter().map(|s| s.signature()).collect();
        format!("MixedDescriptor({})", parts.join(", "))
    }

    fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.subs.iter().any(|s| s.needs_mesh_entities(dim))
    }

    fn init_mesh(&mut self, mesh: &MeshSummary) -> bool {
        self.needs_cell_pass = self.subs.iter_mut().map(|s| s.init_mesh(mesh)).collect();
        self.needs_cell_pass.iter().any(|&needed| needed)
    }

    fn init_cell(&mut self, mesh: &MeshSummary, cell: &CellView) {
        for (sub, _) in self
            .subs
            .iter_mut()
            .zip(&self.needs_cell_pass)
            .filter(|(_, needed)| **needed)
        {
            sub.init_cell(mesh, cell);
        }
    }

    fn init_cell_finalize(&mut self) {
        for (sub, &needed) in self.subs.iter_mut().zip(&self.needs_cell_pass) {
            if needed {
                sub.init_cell_finalize();
            }
        }
    }

    fn global_dimension(&self) -> usize {
        self.subs.iter().map(|s| s.global_dimension()).sum()
    }

    fn local_dimension(&self, cell: &CellView) -> usize {
        self.subs.iter().map(|s| s.local_dimension(cell)).sum()
    }

    fn max_local_dimension(&self) -> usize {
        self.subs.iter().map(|s| s.max_local_dimension()).sum()
    }

    fn geometric_dimension(&self) -> usize {
        self.subs
            .iter()
            .map(|s| s.geometric_dimension())
            .max()
            .unwrap_or(0)
    }

    fn topological_dimension(&self) -> Option<usize> {
        let mut dims = self.subs.iter().map(|s| s.topological_dimension());
        let first = dims.next()??;
        dims.all(|d| d == Some(first)).then_some(first)
    }

    fn num_facet_dofs(&self) -> usize {
        self.subs.iter().map(|s| s.num_facet_dofs()).sum()
    }

    fn num_sub_dof_maps(&self) -> usize {
        self.specs.len()
    }

    fn create_sub_dof_map(&self, index: usize) -> Option<Box<dyn ElementDofDescriptor>> {
        self.specs.get(index).map(ElementSpec::instantiate)
    }

    fn tabulate_dofs(&self, cell: &CellView) -> Vec<usize> {
        let mut dofs = Vec::with_capacity(self.max_local_dimension());
        let mut offset = 0;
        for sub in &self.subs {
            dofs.extend(sub.tabulate_dofs(cell).into_iter().map(|d| d + offset));
            offset += sub.global_dimension();
        }
        dofs
    }

    fn tabulate_coordinates(&self, cell: &CellView) -> Vec<Vec<f64>> {
        self.subs
            .iter()
            .flat_map(|sub| sub.tabulate_coordinates(cell))
            .collect()
    }

    fn tabulate_facet_dofs(&self, local_facet: usize) -> Vec<usize> {
        let mut dofs = Vec::with_capacity(self.num_facet_dofs());
        let mut offset = 0;
        for sub in &self.subs {
            dofs.extend(
                sub.tabulate_facet_dofs(local_facet)
                    .into_iter()
                    .map(|d| d + offset),
            );
            offset += sub.max_local_dimension();
        }
        dofs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::cell_type::CellType;
    use crate::topology::simplex_mesh::SimplexMesh;

    #[test]
    fn taylor_hood_layout() {
        let mut element = MixedDescriptor::new(vec![
            ElementSpec::vector(ElementSpec::lagrange(CellType::Triangle, 2), 2),
            ElementSpec::lagrange(CellType::Triangle, 1),
        ]);
        assert_eq!(element.num_sub_dof_maps(), 2);
        assert_eq!(element.max_local_dimension(), 6 + 6 + 3);
        assert_eq!(element.num_facet_dofs(), 3 + 3 + 2);

        let mut mesh = SimplexMesh::unit_square(1, 1).unwrap();
        crate::topology::MeshTopology::init(&mut mesh, 1);
        let summary = MeshSummary::from_mesh(&mesh).unwrap();
        assert!(!element.init_mesh(&summary));
        assert_eq!(element.global_dimension(), 9 + 9 + 4);

        let cell = CellView::for_cell(&mesh, 1).unwrap();
        let dofs = element.tabulate_dofs(&cell);
        assert_eq!(dofs.len(), 15);
        // pressure block starts after both velocity components
        assert_eq!(&dofs[12..], &[18, 20, 21]);
    }

    #[test]
    fn sub_elements_must_agree_on_cell_dimension() {
        let interval = ElementSpec::lagrange(CellType::Interval, 1);
        let triangle = ElementSpec::lagrange(CellType::Triangle, 1);
        let same = MixedDescriptor::new(vec![triangle.clone(), triangle.clone()]);
        assert_eq!(same.topological_dimension(), Some(2));
        let mixed = MixedDescriptor::new(vec![triangle, interval]);
        assert_eq!(mixed.topological_dimension(), None);
        assert_eq!(MixedDescriptor::new(Vec::new()).topological_dimension(), None);
    }

    #[test]
    fn facet_dofs_shift_by_local_block() {
        let element = MixedDescriptor::new(vec![
            ElementSpec::lagrange(CellType::Interval, 1),
            ElementSpec::lagrange(CellType::Interval, 1),
        ]);
        assert_eq!(element.tabulate_facet_dofs(0), vec![1, 3]);
        assert!(element.create_sub_dof_map(2).is_none());
    }
}
