//! Block linear algebra over dof-map-sized dense blocks.
//!
//! Blocks are `nalgebra` dense matrices and vectors, one per sub-space of a
//! mixed problem. Block `i` is sized from the global dimension of the `i`-th
//! dof map, and dof indices passed to the scatter helpers are block-local, so
//! use collapsed maps (offset 0) when filling blocks.

pub mod block_matrix;
pub mod block_vector;

pub use block_matrix::BlockMatrix;
pub use block_vector::BlockVector;

use crate::dofmap_error::DofMapError;

fn check_dofs(dofs: &[usize], size: usize) -> Result<(), DofMapError> {
    match dofs.iter().find(|&&dof| dof >= size) {
        Some(&dof) => Err(DofMapError::DofOutOfRange { dof, size }),
        None => Ok(()),
    }
}

fn check_len(expected: usize, found: usize) -> Result<(), DofMapError> {
    if expected != found {
        return Err(DofMapError::BlockSizeMismatch { expected, found });
    }
    Ok(())
}
