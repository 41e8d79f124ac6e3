//! Mesh topology as seen by dof maps.
//!
//! This module provides:
//! - [`MeshTopology`], the adapter trait a dof map consumes
//! - [`SimplexMesh`], an in-memory simplicial implementation
//! - [`CellView`] and [`MeshSummary`], the per-cell and whole-mesh data handed
//!   to element descriptors
//! - [`CellType`] with reference-cell entity numbering

pub mod cell;
pub mod cell_type;
pub mod mesh;
pub mod simplex_mesh;
pub mod summary;

pub use cell::CellView;
pub use cell_type::CellType;
pub use mesh::MeshTopology;
pub use simplex_mesh::SimplexMesh;
pub use summary::MeshSummary;
