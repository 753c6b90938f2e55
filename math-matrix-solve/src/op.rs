//! The matrix solve kernel
//!
//! [`MatrixSolveOp`] implements [`BinaryLinalgKernel`] for one scalar type and
//! one batch mode. The four registered variants are type aliases of it.

use crate::cost::solve_cost;
use crate::direct::LuFactorization;
use crate::error::Result;
use crate::registry::op_name;
use crate::shape::{solve_output_shape, validate_output_shape, validate_solve_operands};
use crate::traits::{BinaryLinalgKernel, RealField};
use ndarray::{ArrayView2, ArrayViewMut2};
use std::marker::PhantomData;

/// Solves `A·X = B` with a general dense LU factorization.
///
/// No symmetric or positive definite fast paths are taken and no condition
/// number is estimated: singularity is only detected through exact zero
/// pivots.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixSolveOp<T: RealField, const BATCHED: bool> {
    _scalar: PhantomData<T>,
}

/// `MatrixSolve` for `f32`
pub type MatrixSolveF32 = MatrixSolveOp<f32, false>;
/// `MatrixSolve` for `f64`
pub type MatrixSolveF64 = MatrixSolveOp<f64, false>;
/// `BatchMatrixSolve` for `f32`
pub type BatchMatrixSolveF32 = MatrixSolveOp<f32, true>;
/// `BatchMatrixSolve` for `f64`
pub type BatchMatrixSolveF64 = MatrixSolveOp<f64, true>;

impl<T: RealField, const BATCHED: bool> MatrixSolveOp<T, BATCHED> {
    /// Create the kernel
    pub fn new() -> Self {
        Self {
            _scalar: PhantomData,
        }
    }
}

impl<T: RealField, const BATCHED: bool> BinaryLinalgKernel<T> for MatrixSolveOp<T, BATCHED> {
    fn name(&self) -> &'static str {
        op_name(BATCHED)
    }

    fn supports_batch_operation(&self) -> bool {
        BATCHED
    }

    fn output_matrix_shape(
        &self,
        matrix_shape: &[usize],
        rhs_shape: &[usize],
    ) -> Result<Vec<usize>> {
        solve_output_shape(matrix_shape, rhs_shape)
    }

    fn cost_per_unit(&self, matrix_shape: &[usize], rhs_shape: &[usize]) -> i64 {
        solve_cost(matrix_shape[0], rhs_shape[1])
    }

    fn compute_matrix(
        &self,
        matrix: ArrayView2<'_, T>,
        rhs: ArrayView2<'_, T>,
        output: ArrayViewMut2<'_, T>,
    ) -> Result<()> {
        validate_solve_operands(matrix.shape(), rhs.shape())?;
        validate_output_shape([matrix.ncols(), rhs.ncols()], output.shape())?;
        if matrix.nrows() == 0 {
            // The solution of an empty system is the empty matrix
            return Ok(());
        }

        let lu = LuFactorization::factorize(matrix)?;
        lu.solve_into(rhs, output)
    }
}
