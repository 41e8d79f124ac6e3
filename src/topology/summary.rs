//! Mesh summary handed to element descriptors.
//!
//! The summary is all a descriptor learns about the mesh as a whole: its
//! dimensions and how many entities of each dimension exist. In distributed
//! mode the counts are global and each dimension carries the first global
//! index owned by this process.

use crate::dofmap_error::DofMapError;
use crate::topology::mesh::MeshTopology;

/// Per-dimension entity counts (and offsets, if distributed) of a mesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshSummary {
    topological_dimension: usize,
    geometric_dimension: usize,
    num_entities: Vec<usize>,
    global_offsets: Option<Vec<usize>>,
}

impl MeshSummary {
    /// Summarize `mesh`, which must be in canonical vertex order.
    pub fn from_mesh<M: MeshTopology + ?Sized>(mesh: &M) -> Result<Self, DofMapError> {
        if !mesh.is_ordered() {
            return Err(DofMapError::MeshNotOrdered);
        }
        let tdim = mesh.topological_dimension();
        let num_entities = (0..=tdim).map(|d| mesh.num_global_entities(d)).collect();
        let global_offsets = mesh.is_distributed().then(|| {
            (0..=tdim)
                .map(|d| mesh.global_entity_offset(d).unwrap_or(0))
                .collect()
        });
        Ok(Self {
            topological_dimension: tdim,
            geometric_dimension: mesh.geometric_dimension(),
            num_entities,
            global_offsets,
        })
    }

    pub fn topological_dimension(&self) -> usize {
        self.topological_dimension
    }

    pub fn geometric_dimension(&self) -> usize {
        self.geometric_dimension
    }

    /// Number of entities of dimension `dim` (global count when distributed).
    pub fn num_entities(&self, dim: usize) -> usize {
        self.num_entities.get(dim).copied().unwrap_or(0)
    }

    pub fn num_cells(&self) -> usize {
        self.num_entities(self.topological_dimension)
    }

    pub fn is_distributed(&self) -> bool {
        self.global_offsets.is_some()
    }

    /// First global index of dimension `dim` owned by this process.
    pub fn global_offset(&self, dim: usize) -> Option<usize> {
        self.global_offsets
            .as_ref()
            .and_then(|offsets| offsets.get(dim).copied())
    }
}
