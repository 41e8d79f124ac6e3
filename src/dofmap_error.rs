//! DofMapError: Unified error type for mesh-dofmap public APIs
//!
//! Every failure in this crate is a programming or configuration error
//! (unordered mesh, entities not materialized, bad sub-space path), so each
//! variant is fatal at this layer and is propagated to the caller as-is.

use thiserror::Error;

/// Unified error type for mesh-dofmap operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DofMapError {
    /// The mesh is not in canonical local-to-global vertex order.
    #[error(
        "Mesh is not ordered according to the local-to-global numbering convention, consider calling `order()` on the mesh"
    )]
    MeshNotOrdered,
    /// The descriptor needs entities of `dim` but none have been materialized.
    #[error(
        "Unable to create dof map: missing mesh entities of dimension {dim}. Try calling `init({dim})` on the mesh"
    )]
    MissingEntities { dim: usize },
    /// Sub-space extraction on a descriptor that has no sub-spaces.
    #[error("Unable to extract sub system (there are no sub systems)")]
    NoSubspaces,
    /// Sub-space extraction with an empty component path.
    #[error("Unable to extract sub system (no sub system specified)")]
    EmptyComponent,
    /// Requested sub-space index exceeds the number of sub-spaces.
    #[error("Unable to extract sub system {index} (only {available} sub systems defined)")]
    IndexOutOfRange { index: usize, available: usize },
    /// Operation not provided by this type (e.g. transposed block product).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// A cell index past the end of the mesh.
    #[error("Cell {cell} out of range (mesh has {num_cells} cells)")]
    CellOutOfRange { cell: usize, num_cells: usize },
    /// Mesh input data is malformed.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
    /// A dof index past the end of a block.
    #[error("Dof {dof} out of range for block of size {size}")]
    DofOutOfRange { dof: usize, size: usize },
    /// A tabulated dof list disagrees with the map's dimensions.
    #[error("Dof map invariant violated: {0}")]
    InvalidDofs(String),
    /// The element is not defined on the mesh's cells.
    #[error("Element {signature} cannot be used on cells of topological dimension {mesh_dimension}")]
    IncompatibleElement {
        signature: String,
        mesh_dimension: usize,
    },
    /// A block-structured container received a block of the wrong size.
    #[error("Block size mismatch: expected {expected}, found {found}")]
    BlockSizeMismatch { expected: usize, found: usize },
}
