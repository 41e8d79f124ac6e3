//! The mesh topology adapter consumed by dof maps.
//!
//! A dof map never stores a mesh; it only asks these questions while it is
//! being initialized and while it tabulates cells. Distributed entity
//! numbering happens entirely behind this trait: by the time a dof map looks
//! at a mesh, global indices and per-process offsets are already consistent.

use crate::dofmap_error::DofMapError;
use crate::topology::cell_type::CellType;

/// Topological queries a dof map needs from a mesh.
pub trait MeshTopology {
    /// Cell type of every cell in the mesh.
    fn cell_type(&self) -> CellType;

    /// Topological dimension of the cells.
    fn topological_dimension(&self) -> usize {
        self.cell_type().dimension()
    }

    /// Dimension of the embedding space.
    fn geometric_dimension(&self) -> usize;

    /// Number of materialized local entities of dimension `dim`.
    ///
    /// Returns 0 for dimensions that have not been materialized with
    /// [`init`](Self::init).
    fn num_entities(&self, dim: usize) -> usize;

    /// Number of cells, always materialized.
    fn num_cells(&self) -> usize {
        self.num_entities(self.topological_dimension())
    }

    /// Whether every cell lists its vertices in canonical (ascending global) order.
    fn is_ordered(&self) -> bool;

    /// Materialize entities of dimension `dim` (no-op if already present).
    fn init(&mut self, dim: usize);

    /// Local indices of the entities of dimension `dim` incident to `cell`,
    /// in reference order. Empty if `dim` has not been materialized.
    fn cell_entities(&self, cell: usize, dim: usize) -> &[usize];

    /// Coordinates of local vertex `vertex`.
    fn vertex_coordinates(&self, vertex: usize) -> &[f64];

    /// Whether entity indices are part of a multi-process numbering.
    fn is_distributed(&self) -> bool {
        false
    }

    /// Assign a globally consistent numbering to entities of dimension `dim`.
    ///
    /// Serial meshes have nothing to do.
    fn number_entities(&mut self, dim: usize) -> Result<(), DofMapError> {
        let _ = dim;
        Ok(())
    }

    /// Global index of local entity `entity` of dimension `dim`.
    fn global_entity_index(&self, dim: usize, entity: usize) -> usize {
        let _ = dim;
        entity
    }

    /// Number of entities of dimension `dim` across all processes.
    fn num_global_entities(&self, dim: usize) -> usize {
        self.num_entities(dim)
    }

    /// First global index owned by this process for dimension `dim`.
    fn global_entity_offset(&self, dim: usize) -> Option<usize> {
        let _ = dim;
        None
    }
}
