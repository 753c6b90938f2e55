//! Shape validation and output shape derivation
//!
//! Checks run before any factorization so that a bad call fails with a
//! structural error instead of a numeric one.

use crate::error::{Result, SolveError};

/// Split a tensor shape into its leading batch dimensions and matrix shape.
///
/// The shape must have rank at least 2.
pub fn split_batch_shape(shape: &[usize]) -> (&[usize], [usize; 2]) {
    let rank = shape.len();
    debug_assert!(rank >= 2);
    (&shape[..rank - 2], [shape[rank - 2], shape[rank - 1]])
}

/// Number of matrices described by leading batch dimensions
pub fn batch_count(batch_dims: &[usize]) -> usize {
    batch_dims.iter().product()
}

/// Check that a coefficient matrix and right-hand side can be solved together.
///
/// Both slices are 2-D matrix shapes `[rows, cols]`.
pub fn validate_solve_operands(matrix_shape: &[usize], rhs_shape: &[usize]) -> Result<()> {
    let (rows, cols) = (matrix_shape[0], matrix_shape[1]);
    if rows != cols {
        return Err(SolveError::NotSquare { rows, cols });
    }
    if rows != rhs_shape[0] {
        return Err(SolveError::IncompatibleDimensions {
            matrix_rows: rows,
            rhs_rows: rhs_shape[0],
        });
    }
    Ok(())
}

/// Check that a caller-provided output matrix has the expected shape
pub fn validate_output_shape(expected: [usize; 2], got: &[usize]) -> Result<()> {
    if got != expected.as_slice() {
        return Err(SolveError::OutputShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}

/// Derive the solution shape: the matrix shape with its last dimension
/// replaced by the right-hand side's last dimension.
pub fn solve_output_shape(matrix_shape: &[usize], rhs_shape: &[usize]) -> Result<Vec<usize>> {
    if matrix_shape.len() != rhs_shape.len() {
        return Err(SolveError::RankMismatch {
            lhs: matrix_shape.len(),
            rhs: rhs_shape.len(),
        });
    }
    let rank = matrix_shape.len();
    if rank < 2 {
        return Err(SolveError::InvalidRank {
            op: "solve",
            expected: "rank >= 2",
            rank,
        });
    }
    validate_solve_operands(&matrix_shape[rank - 2..], &rhs_shape[rank - 2..])?;

    let mut output = matrix_shape.to_vec();
    output[rank - 1] = rhs_shape[rank - 1];
    Ok(output)
}

/// Validate the ranks and leading dimensions of a pair of input tensors.
///
/// Returns the shared leading dimensions. Single-matrix operations accept
/// rank 2 only; batched operations accept any rank of at least 2.
pub fn validate_batch_shapes<'a>(
    op: &'static str,
    batched: bool,
    matrix_shape: &'a [usize],
    rhs_shape: &[usize],
) -> Result<&'a [usize]> {
    if matrix_shape.len() != rhs_shape.len() {
        return Err(SolveError::RankMismatch {
            lhs: matrix_shape.len(),
            rhs: rhs_shape.len(),
        });
    }
    let rank = matrix_shape.len();
    if batched && rank < 2 {
        return Err(SolveError::InvalidRank {
            op,
            expected: "rank >= 2",
            rank,
        });
    }
    if !batched && rank != 2 {
        return Err(SolveError::InvalidRank {
            op,
            expected: "rank 2",
            rank,
        });
    }

    let (lhs_batch, _) = split_batch_shape(matrix_shape);
    let (rhs_batch, _) = split_batch_shape(rhs_shape);
    if lhs_batch != rhs_batch {
        return Err(SolveError::BatchShapeMismatch {
            lhs: lhs_batch.to_vec(),
            rhs: rhs_batch.to_vec(),
        });
    }
    Ok(lhs_batch)
}
