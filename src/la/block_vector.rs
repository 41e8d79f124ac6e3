use nalgebra::DVector;

use crate::dofmap_error::DofMapError;
use crate::fem::dofmap::DofMap;
use crate::la::{check_dofs, check_len};

/// Vector split into independently sized blocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockVector {
    blocks: Vec<DVector<f64>>,
}

impl BlockVector {
    /// Zero vector with one block per entry of `sizes`.
    pub fn new(sizes: &[usize]) -> Self {
        Self {
            blocks: sizes.iter().map(|&n| DVector::zeros(n)).collect(),
        }
    }

    /// Zero vector with block `i` of length `dofmaps[i].global_dimension()`.
    pub fn from_dofmaps(dofmaps: &[&DofMap]) -> Self {
        let sizes: Vec<usize> = dofmaps.iter().map(|m| m.global_dimension()).collect();
        Self::new(&sizes)
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total length over all blocks.
    pub fn size(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    pub fn block(&self, i: usize) -> Result<&DVector<f64>, DofMapError> {
        let available = self.blocks.len();
        self.blocks
            .get(i)
            .ok_or(DofMapError::IndexOutOfRange { index: i, available })
    }

    pub fn block_mut(&mut self, i: usize) -> Result<&mut DVector<f64>, DofMapError> {
        let available = self.blocks.len();
        self.blocks
            .get_mut(i)
            .ok_or(DofMapError::IndexOutOfRange { index: i, available })
    }

    /// Replace block `i`.
    pub fn set_block(&mut self, i: usize, block: DVector<f64>) -> Result<(), DofMapError> {
        *self.block_mut(i)? = block;
        Ok(())
    }

    pub fn zero(&mut self) {
        for block in &mut self.blocks {
            block.fill(0.0);
        }
    }

    /// Add `values[k]` to entry `dofs[k]` of block `i`.
    ///
    /// Nothing is written unless every index is in range.
    pub fn add_local(&mut self, i: usize, dofs: &[usize], values: &[f64]) -> Result<(), DofMapError> {
        check_len(dofs.len(), values.len())?;
        let block = self.block_mut(i)?;
        check_dofs(dofs, block.len())?;
        for (&dof, &value) in dofs.iter().zip(values) {
            block[dof] += value;
        }
        Ok(())
    }
}
