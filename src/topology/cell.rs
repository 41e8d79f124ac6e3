//! Lightweight per-cell view handed to element descriptors.
//!
//! A [`CellView`] is a reusable cursor: build it once for a mesh and
//! [`update`](CellView::update) it for each cell visited. Entity indices are
//! global when the mesh is distributed. A view must not be shared between
//! concurrent tabulation calls; give each caller its own.

use crate::dofmap_error::DofMapError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::MeshTopology;

/// Topological and geometric data of one cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellView {
    index: usize,
    cell_type: CellType,
    geometric_dimension: usize,
    /// `entity_indices[d]` are the (global) indices of the cell's entities of dimension `d`.
    entity_indices: Vec<Vec<usize>>,
    /// Vertex coordinates, `geometric_dimension` values per vertex.
    coordinates: Vec<f64>,
}

impl CellView {
    /// Create an empty view sized for cells of `mesh`.
    pub fn new<M: MeshTopology + ?Sized>(mesh: &M) -> Self {
        let cell_type = mesh.cell_type();
        Self {
            index: 0,
            cell_type,
            geometric_dimension: mesh.geometric_dimension(),
            entity_indices: vec![Vec::new(); cell_type.dimension() + 1],
            coordinates: Vec::with_capacity(cell_type.num_vertices() * mesh.geometric_dimension()),
        }
    }

    /// Build a view positioned on `cell`.
    pub fn for_cell<M: MeshTopology + ?Sized>(mesh: &M, cell: usize) -> Result<Self, DofMapError> {
        let mut view = Self::new(mesh);
        view.update(mesh, cell)?;
        Ok(view)
    }

    /// Move the view to `cell`, reusing its buffers.
    pub fn update<M: MeshTopology + ?Sized>(
        &mut self,
        mesh: &M,
        cell: usize,
    ) -> Result<(), DofMapError> {
        let num_cells = mesh.num_cells();
        if cell >= num_cells {
            return Err(DofMapError::CellOutOfRange { cell, num_cells });
        }
        self.index = cell;
        let distributed = mesh.is_distributed();
        for (dim, indices) in self.entity_indices.iter_mut().enumerate() {
            indices.clear();
            let local = mesh.cell_entities(cell, dim);
            if distributed {
                indices.extend(local.iter().map(|&e| mesh.global_entity_index(dim, e)));
            } else {
                indices.extend_from_slice(local);
            }
        }
        self.coordinates.clear();
        for &v in mesh.cell_entities(cell, 0) {
            self.coordinates.extend_from_slice(mesh.vertex_coordinates(v));
        }
        Ok(())
    }

    /// Local index of the cell in the mesh.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn topological_dimension(&self) -> usize {
        self.cell_type.dimension()
    }

    pub fn geometric_dimension(&self) -> usize {
        self.geometric_dimension
    }

    /// Entity indices of dimension `dim`; empty if not materialized.
    pub fn entity_indices(&self, dim: usize) -> &[usize] {
        self.entity_indices.get(dim).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Coordinates of local vertex `vertex`.
    pub fn vertex_coordinates(&self, vertex: usize) -> &[f64] {
        let start = vertex * self.geometric_dimension;
        self.coordinates
            .get(start..start + self.geometric_dimension)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::simplex_mesh::SimplexMesh;

    #[test]
    fn update_reuses_buffers_across_cells() {
        let mut mesh = SimplexMesh::unit_square(1, 1).unwrap();
        mesh.init(1);
        let mut view = CellView::new(&mesh);
        view.update(&mesh, 1).unwrap();
        assert_eq!(view.index(), 1);
        assert_eq!(view.entity_indices(0), &[0, 2, 3]);
        assert_eq!(view.entity_indices(1).len(), 3);
        assert_eq!(view.entity_indices(2), &[1]);
        assert_eq!(view.vertex_coordinates(1), &[0.0, 1.0]);

        view.update(&mesh, 0).unwrap();
        assert_eq!(view.entity_indices(0), &[0, 1, 3]);
        assert_eq!(view.vertex_coordinates(1), &[1.0, 0.0]);
    }

    #[test]
    fn out_of_range_cell_is_an_error() {
        let mesh = SimplexMesh::unit_interval(2).unwrap();
        assert_eq!(
            CellView::for_cell(&mesh, 2),
            Err(DofMapError::CellOutOfRange {
                cell: 2,
                num_cells: 2
            })
        );
    }

    #[test]
    fn distributed_mesh_reports_global_indices() {
        let mut mesh = SimplexMesh::unit_interval(2).unwrap();
        mesh.set_global_numbering(0, vec![7, 8, 9], 10, 7).unwrap();
        let view = CellView::for_cell(&mesh, 1).unwrap();
        assert_eq!(view.entity_indices(0), &[8, 9]);
    }
}
