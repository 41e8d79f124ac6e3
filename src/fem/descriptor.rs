//! The element dof descriptor contract.
//!
//! A descriptor knows the local dof layout of one finite element and how to
//! turn the entity indices of a cell into global dof indices. It is supplied
//! from outside the dof map (generated element code, a built-in element from
//! [`ElementSpec`](crate::fem::ElementSpec), or a user type) and is shared
//! between maps through [`SharedDescriptor`].
//!
//! Lifecycle: [`init_mesh`](ElementDofDescriptor::init_mesh) is called once
//! per mesh. If it returns `true` the dof map follows up with one
//! [`init_cell`](ElementDofDescriptor::init_cell) per cell in ascending order
//! and a final [`init_cell_finalize`](ElementDofDescriptor::init_cell_finalize).
//! After that the descriptor is frozen against the mesh.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::topology::cell::CellView;
use crate::topology::summary::MeshSummary;

/// Local-to-global dof indexing of a finite element.
pub trait ElementDofDescriptor: fmt::Debug + Send + Sync {
    /// Diagnostic identifier of the element.
    fn signature(&self) -> String;

    /// Whether tabulation needs mesh entities of dimension `dim`.
    fn needs_mesh_entities(&self, dim: usize) -> bool;

    /// Bind the descriptor to a mesh; return `true` to request a per-cell pass.
    fn init_mesh(&mut self, mesh: &MeshSummary) -> bool;

    /// Per-cell initialization, called only if `init_mesh` returned `true`.
    fn init_cell(&mut self, mesh: &MeshSummary, cell: &CellView) {
        let _ = (mesh, cell);
    }

    /// Called once after the last `init_cell`.
    fn init_cell_finalize(&mut self) {}

    /// Total number of dofs over the mesh.
    fn global_dimension(&self) -> usize;

    /// Number of dofs on `cell`.
    fn local_dimension(&self, cell: &CellView) -> usize {
        let _ = cell;
        self.max_local_dimension()
    }

    /// Largest local dimension over all cells.
    fn max_local_dimension(&self) -> usize;

    /// Dimension of the space the mesh is embedded in (after `init_mesh`).
    fn geometric_dimension(&self) -> usize;

    /// Topological dimension of the cells the element is defined on, or
    /// `None` if the element has no single cell dimension.
    fn topological_dimension(&self) -> Option<usize>;

    /// Number of dofs in the closure of one facet.
    fn num_facet_dofs(&self) -> usize;

    /// Number of sub-spaces this element decomposes into (0 for simple elements).
    fn num_sub_dof_maps(&self) -> usize;

    /// Fresh, uninitialized descriptor of sub-space `index`.
    fn create_sub_dof_map(&self, index: usize) -> Option<Box<dyn ElementDofDescriptor>>;

    /// Global dofs of `cell`, in local dof order.
    fn tabulate_dofs(&self, cell: &CellView) -> Vec<usize>;

    /// Local positions (into the cell's dof list) of the dofs on `local_facet`.
    fn tabulate_facet_dofs(&self, local_facet: usize) -> Vec<usize>;

    /// Physical coordinates of the point each local dof of `cell` sits at,
    /// one row of `geometric_dimension` values per dof, in local dof order.
    fn tabulate_coordinates(&self, cell: &CellView) -> Vec<Vec<f64>>;
}

/// A descriptor shared by several dof maps.
pub type SharedDescriptor = Arc<RwLock<Box<dyn ElementDofDescriptor>>>;

/// Wrap a descriptor for sharing between dof maps.
pub fn share(descriptor: Box<dyn ElementDofDescriptor>) -> SharedDescriptor {
    Arc::new(RwLock::new(descriptor))
}
