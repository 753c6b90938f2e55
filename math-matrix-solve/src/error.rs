//! Error types for matrix solve operations.
//!
//! Structural errors (bad shapes) are raised before any numeric work;
//! invertibility errors come out of the pivot check after factorization.
//! Both are scoped to a single batch element.

use crate::registry::DType;
use thiserror::Error;

/// Errors that can occur while validating or solving a linear system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The coefficient matrix is not square.
    #[error("Input matrix must be square. Got {rows}x{cols}")]
    NotSquare {
        /// Row count of the coefficient matrix
        rows: usize,
        /// Column count of the coefficient matrix
        cols: usize,
    },

    /// The right-hand side row count differs from the coefficient matrix.
    #[error("Input matrix and rhs are incompatible: matrix has {matrix_rows} rows, rhs has {rhs_rows}")]
    IncompatibleDimensions {
        /// Row count of the coefficient matrix
        matrix_rows: usize,
        /// Row count of the right-hand side
        rhs_rows: usize,
    },

    /// The output matrix does not have the solution shape.
    #[error("Output matrix has shape {got:?}, expected {expected:?}")]
    OutputShapeMismatch {
        /// Shape of the solution
        expected: Vec<usize>,
        /// Shape of the provided output
        got: Vec<usize>,
    },

    /// Input rank is not accepted by the operation.
    #[error("{op} requires {expected}, got rank {rank}")]
    InvalidRank {
        /// Name of the operation
        op: &'static str,
        /// Human readable rank requirement
        expected: &'static str,
        /// Rank that was supplied
        rank: usize,
    },

    /// Coefficient and right-hand side tensors have different ranks.
    #[error("Input matrix and rhs must have the same rank: {lhs} vs {rhs}")]
    RankMismatch {
        /// Rank of the coefficient tensor
        lhs: usize,
        /// Rank of the right-hand side tensor
        rhs: usize,
    },

    /// Leading (batch) dimensions of the two inputs differ.
    #[error("Batch dimensions differ: {lhs:?} vs {rhs:?}")]
    BatchShapeMismatch {
        /// Leading dimensions of the coefficient tensor
        lhs: Vec<usize>,
        /// Leading dimensions of the right-hand side tensor
        rhs: Vec<usize>,
    },

    /// An exact zero pivot was found during LU factorization.
    #[error("Input matrix is not invertible.")]
    NotInvertible,

    /// No registration exists for the requested name and dtype.
    #[error("No operation registered as '{name}' for dtype {dtype}")]
    UnknownOp {
        /// Requested operation name
        name: String,
        /// Requested scalar type
        dtype: DType,
    },

    /// Input tensor could not be viewed as a stack of matrices.
    #[error("Cannot view input as a batch of matrices: {0}")]
    Layout(String),

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A specialized `Result` type for solve operations.
pub type Result<T> = std::result::Result<T, SolveError>;

impl SolveError {
    /// Returns `true` for shape and rank errors detected before factorization.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SolveError::NotSquare { .. }
                | SolveError::IncompatibleDimensions { .. }
                | SolveError::OutputShapeMismatch { .. }
                | SolveError::InvalidRank { .. }
                | SolveError::RankMismatch { .. }
                | SolveError::BatchShapeMismatch { .. }
        )
    }

    /// Returns `true` if the coefficient matrix had an exact zero pivot.
    pub fn is_not_invertible(&self) -> bool {
        matches!(self, SolveError::NotInvertible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = SolveError::NotSquare { rows: 2, cols: 3 };
        assert!(err.is_structural());
        assert!(!err.is_not_invertible());

        let err = SolveError::IncompatibleDimensions {
            matrix_rows: 2,
            rhs_rows: 3,
        };
        assert!(err.is_structural());

        assert!(SolveError::NotInvertible.is_not_invertible());
        assert!(!SolveError::NotInvertible.is_structural());
        assert!(!SolveError::Config("bad".into()).is_structural());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SolveError::NotInvertible.to_string(),
            "Input matrix is not invertible."
        );
        assert!(
            SolveError::NotSquare { rows: 2, cols: 3 }
                .to_string()
                .starts_with("Input matrix must be square.")
        );
        assert!(
            SolveError::IncompatibleDimensions {
                matrix_rows: 2,
                rhs_rows: 3
            }
            .to_string()
            .starts_with("Input matrix and rhs are incompatible")
        );
    }
}
