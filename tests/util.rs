#![allow(dead_code)]
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mesh_dofmap::fem::{ElementDofDescriptor, ElementSpec};
use mesh_dofmap::topology::{CellType, CellView, MeshSummary, MeshTopology, SimplexMesh};
use mesh_dofmap::{DofMap, DofMapError};

pub fn p1_interval() -> ElementSpec {
    ElementSpec::lagrange(CellType::Interval, 1)
}

/// Two P1 components on the unit interval with `n` cells.
pub fn vector_p1_interval(n: usize) -> (SimplexMesh, DofMap) {
    let mut mesh = SimplexMesh::unit_interval(n).unwrap();
    let map = DofMap::new(ElementSpec::vector(p1_interval(), 2).shared(), &mut mesh).unwrap();
    (mesh, map)
}

/// Taylor-Hood (P2 x P2, P1) on the unit square.
pub fn taylor_hood(nx: usize, ny: usize) -> (SimplexMesh, DofMap) {
    let mut mesh = SimplexMesh::unit_square(nx, ny).unwrap();
    let p2 = ElementSpec::lagrange(CellType::Triangle, 2);
    let p1 = ElementSpec::lagrange(CellType::Triangle, 1);
    let spec = ElementSpec::mixed(vec![ElementSpec::vector(p2, 2), p1]);
    let map = DofMap::new(spec.shared(), &mut mesh).unwrap();
    (mesh, map)
}

/// Tabulated dofs of every cell, in cell order.
pub fn all_cell_dofs<M: MeshTopology>(map: &DofMap, mesh: &M) -> Vec<Vec<usize>> {
    (0..mesh.num_cells())
        .map(|c| map.tabulate_dofs(mesh, c))
        .collect::<Result<_, DofMapError>>()
        .unwrap()
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Wraps a descriptor and counts the per-cell initialization calls it sees.
#[derive(Debug)]
pub struct CountingDescriptor {
    inner: Box<dyn ElementDofDescriptor>,
    pub init_cells: Arc<AtomicUsize>,
    /// Drop the last dof of every tabulated cell.
    pub truncate: bool,
}

impl CountingDescriptor {
    pub fn new(spec: &ElementSpec) -> (Self, Arc<AtomicUsize>) {
        let init_cells = Arc::new(AtomicUsize::new(0));
        let descriptor = Self {
            inner: spec.instantiate(),
            init_cells: Arc::clone(&init_cells),
            truncate: false,
        };
        (descriptor, init_cells)
    }

    /// A descriptor whose cell dof lists are one short of its local dimension.
    pub fn truncated(spec: &ElementSpec) -> Self {
        let (mut descriptor, _) = Self::new(spec);
        descriptor.truncate = true;
        descriptor
    }
}

impl ElementDofDescriptor for CountingDescriptor {
    fn signature(&self) -> String {
        format!("Counting({})", self.inner.signature())
    }
    fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.inner.needs_mesh_entities(dim)
    }
    fn init_mesh(&mut self, mesh: &MeshSummary) -> bool {
        self.inner.init_mesh(mesh)
    }
    fn init_cell(&mut self, mesh: &MeshSummary, cell: &CellView) {
        self.init_cells.fetch_add(1, Ordering::SeqCst);
        self.inner.init_cell(mesh, cell);
    }
    fn init_cell_finalize(&mut self) {
        self.inner.init_cell_finalize();
    }
    fn global_dimension(&self) -> usize {
        self.inner.global_dimension()
    }
    fn max_local_dimension(&self) -> usize {
        self.inner.max_local_dimension()
    }
    fn geometric_dimension(&self) -> usize {
        self.inner.geometric_dimension()
    }
    fn topological_dimension(&self) -> Option<usize> {
        self.inner.topological_dimension()
    }
    fn num_facet_dofs(&self) -> usize {
        self.inner.num_facet_dofs()
    }
    fn num_sub_dof_maps(&self) -> usize {
        self.inner.num_sub_dof_maps()
    }
    fn create_sub_dof_map(&self, index: usize) -> Option<Box<dyn ElementDofDescriptor>> {
        self.inner.create_sub_dof_map(index)
    }
    fn tabulate_dofs(&self, cell: &CellView) -> Vec<usize> {
        let mut dofs = self.inner.tabulate_dofs(cell);
        if self.truncate {
            dofs.pop();
        }
        dofs
    }
    fn tabulate_facet_dofs(&self, local_facet: usize) -> Vec<usize> {
        self.inner.tabulate_facet_dofs(local_facet)
    }
    fn tabulate_coordinates(&self, cell: &CellView) -> Vec<Vec<f64>> {
        self.inner.tabulate_coordinates(cell)
    }
}
