//! Matrix of `m x n` dense blocks acting on [`BlockVector`]s.

use std::fmt::Write as _;

use itertools::Itertools;
use nalgebra::{DMatrix, DVector};

use crate::dofmap_error::DofMapError;
use crate::fem::dofmap::DofMap;
use crate::la::block_vector::BlockVector;
use crate::la::{check_dofs, check_len};

/// Rectangular array of dense matrix blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockMatrix {
    blocks: Vec<Vec<DMatrix<f64>>>,
    num_cols: usize,
}

impl BlockMatrix {
    /// `m x n` blocks, each an empty `0 x 0` matrix.
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            blocks: vec![vec![DMatrix::zeros(0, 0); n]; m],
            num_cols: n,
        }
    }

    /// Zero blocks sized `rows[i].global_dimension() x cols[j].global_dimension()`.
    pub fn from_dofmaps(rows: &[&DofMap], cols: &[&DofMap]) -> Self {
        let blocks = rows
            .iter()
            .map(|r| {
                cols.iter()
                    .map(|c| DMatrix::zeros(r.global_dimension(), c.global_dimension()))
                    .collect()
            })
            .collect();
        Self {
            blocks,
            num_cols: cols.len(),
        }
    }

    /// Number of block rows (`dim == 0`) or block columns (`dim == 1`).
    pub fn size(&self, dim: usize) -> Result<usize, DofMapError> {
        match dim {
            0 => Ok(self.blocks.len()),
            1 => Ok(self.num_cols),
            _ => Err(DofMapError::UnsupportedOperation("BlockMatrix has rank 2")),
        }
    }

    fn check_index(&self, i: usize, j: usize) -> Result<(), DofMapError> {
        if i >= self.blocks.len() {
            return Err(DofMapError::IndexOutOfRange {
                index: i,
                available: self.blocks.len(),
            });
        }
        if j >= self.num_cols {
            return Err(DofMapError::IndexOutOfRange {
                index: j,
                available: self.num_cols,
            });
        }
        Ok(())
    }

    pub fn block(&self, i: usize, j: usize) -> Result<&DMatrix<f64>, DofMapError> {
        self.check_index(i, j)?;
        Ok(&self.blocks[i][j])
    }

    pub fn block_mut(&mut self, i: usize, j: usize) -> Result<&mut DMatrix<f64>, DofMapError> {
        self.check_index(i, j)?;
        Ok(&mut self.blocks[i][j])
    }

    pub fn set_block(&mut self, i: usize, j: usize, block: DMatrix<f64>) -> Result<(), DofMapError> {
        *self.block_mut(i, j)? = block;
        Ok(())
    }

    pub fn zero(&mut self) {
        for block in self.blocks.iter_mut().flatten() {
            block.fill(0.0);
        }
    }

    /// Add the element matrix `values` into block `(i, j)` at rows
    /// `row_dofs` and columns `col_dofs`.
    pub fn add_local(
        &mut self,
        i: usize,
        j: usize,
        row_dofs: &[usize],
        col_dofs: &[usize],
        values: &DMatrix<f64>,
    ) -> Result<(), DofMapError> {
        check_len(row_dofs.len(), values.nrows())?;
        check_len(col_dofs.len(), values.ncols())?;
        let block = self.block_mut(i, j)?;
        check_dofs(row_dofs, block.nrows())?;
        check_dofs(col_dofs, block.ncols())?;
        for ((a, &r), (b, &c)) in row_dofs
            .iter()
            .enumerate()
            .cartesian_product(col_dofs.iter().enumerate())
        {
            block[(r, c)] += values[(a, b)];
        }
        Ok(())
    }

    /// `y = A x`, block row by block row: `y_i = sum_j A_ij x_j`.
    ///
    /// Each `y_i` is resized to the row count of `A_i0`. On error `y` is
    /// left untouched.
    pub fn mult(&self, x: &BlockVector, y: &mut BlockVector, transposed: bool) -> Result<(), DofMapError> {
        if transposed {
            return Err(DofMapError::UnsupportedOperation(
                "BlockMatrix::mult: transposed not implemented",
            ));
        }
        check_len(self.num_cols, x.num_blocks())?;
        check_len(self.blocks.len(), y.num_blocks())?;
        let mut result = Vec::with_capacity(self.blocks.len());
        for row in &self.blocks {
            let rows = row.first().map_or(0, |a| a.nrows());
            let mut acc = DVector::zeros(rows);
            for (j, a) in row.iter().enumerate() {
                let xj = x.block(j)?;
                check_len(rows, a.nrows())?;
                check_len(a.ncols(), xj.len())?;
                acc.gemv(1.0, a, xj, 1.0);
            }
            result.push(acc);
        }
        for (i, acc) in result.into_iter().enumerate() {
            y.set_block(i, acc)?;
        }
        Ok(())
    }

    /// Human-readable summary; `verbose` prints every block.
    pub fn describe(&self, verbose: bool) -> String {
        let short = format!(
            "<BlockMatrix containing {} x {} blocks>",
            self.blocks.len(),
            self.num_cols
        );
        if !verbose {
            return short;
        }
        let mut s = short;
        s.push_str("\n\n");
        for (i, row) in self.blocks.iter().enumerate() {
            for (j, block) in row.iter().enumerate() {
                let _ = writeln!(s, "  BlockMatrix ({i}, {j})\n");
                for line in block.to_string().lines() {
                    let _ = writeln!(s, "    {line}");
                }
            }
        }
        s
    }
}
