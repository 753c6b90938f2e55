//! Core traits for the solve kernel
//!
//! This module defines the two abstractions the rest of the crate is built on:
//! - [`RealField`]: Trait for the floating point scalar types a solve runs in
//! - [`BinaryLinalgKernel`]: The capability set a batch driver needs from a
//!   two-input linear algebra kernel (shape derivation, cost, compute)

use crate::error::Result;
use crate::registry::DType;
use ndarray::{ArrayView2, ArrayViewMut2};
use num_traits::{Float, NumAssign};
use std::fmt::Debug;

/// Trait for scalar types that a solve can run in.
///
/// All arithmetic of a single solve stays in one `RealField` type; there is
/// no mixed precision.
///
/// # Implementations
///
/// Provided for:
/// - `f32`
/// - `f64`
pub trait RealField: Float + NumAssign + Send + Sync + Debug + 'static {
    /// Registered scalar type
    const DTYPE: DType;

    /// Machine epsilon as an `f64`, used for residual tolerances
    fn epsilon_f64() -> f64;
}

impl RealField for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn epsilon_f64() -> f64 {
        f32::EPSILON as f64
    }
}

impl RealField for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn epsilon_f64() -> f64 {
        f64::EPSILON
    }
}

/// Trait for kernels that take a coefficient matrix and a right-hand side.
///
/// A batch driver calls [`output_matrix_shape`](Self::output_matrix_shape)
/// and [`cost_per_unit`](Self::cost_per_unit) once per call, then
/// [`compute_matrix`](Self::compute_matrix) once per batch element. The shapes
/// passed to the first two methods are the trailing two dimensions only.
pub trait BinaryLinalgKernel<T: RealField>: Send + Sync {
    /// Registered operation name
    fn name(&self) -> &'static str;

    /// Whether leading batch dimensions are accepted
    fn supports_batch_operation(&self) -> bool;

    /// Shape of one output matrix for the given input matrix shapes
    fn output_matrix_shape(
        &self,
        matrix_shape: &[usize],
        rhs_shape: &[usize],
    ) -> Result<Vec<usize>>;

    /// Estimated cost of computing one batch element
    fn cost_per_unit(&self, matrix_shape: &[usize], rhs_shape: &[usize]) -> i64;

    /// Compute one batch element into `output`
    fn compute_matrix(
        &self,
        matrix: ArrayView2<'_, T>,
        rhs: ArrayView2<'_, T>,
        output: ArrayViewMut2<'_, T>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtypes() {
        assert_eq!(<f32 as RealField>::DTYPE, DType::F32);
        assert_eq!(<f64 as RealField>::DTYPE, DType::F64);
    }

    #[test]
    fn test_epsilon() {
        assert!(f32::epsilon_f64() > f64::epsilon_f64());
        assert_eq!(f64::epsilon_f64(), f64::EPSILON);
    }
}
