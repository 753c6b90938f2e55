//! Batched dense linear solves
//!
//! This crate solves `A·X = B` for one matrix or for a batch of independent
//! `(A, B)` pairs, in `f32` or `f64`.
//!
//! # Features
//!
//! - **Solve kernel**: LU decomposition with partial pivoting, exact zero pivot
//!   detection, forward/backward substitution
//! - **Batch driver**: per-element failures, rayon parallelism sized from a
//!   cost estimate (`rayon` feature, on by default)
//! - **Registrations**: `MatrixSolve` and `BatchMatrixSolve` for `f32` and `f64`
//!
//! Singular matrices are only detected through exact zero pivots. There is no
//! condition number estimate, so ill-conditioned systems solve without error.
//!
//! # Example
//!
//! ```
//! use math_audio_matrix_solve::matrix_solve;
//! use ndarray::array;
//!
//! let a = array![[2.0_f64, 0.0], [0.0, 4.0]];
//! let b = array![[4.0_f64], [8.0]];
//! let x = matrix_solve(a.view(), b.view()).unwrap();
//! assert_eq!(x, array![[2.0], [2.0]]);
//! ```

pub mod batch;
pub mod config;
pub mod cost;
pub mod direct;
pub mod error;
pub mod op;
pub mod parallel;
pub mod registry;
pub mod shape;
pub mod traits;

// Re-export main types
pub use batch::{BatchDriver, BatchSolution, ElementFailure, batch_matrix_solve, matrix_solve};
pub use config::BatchConfig;
pub use direct::LuFactorization;
pub use error::{Result, SolveError};
pub use op::{
    BatchMatrixSolveF32, BatchMatrixSolveF64, MatrixSolveF32, MatrixSolveF64, MatrixSolveOp,
};
pub use registry::{DType, OpRegistration};
pub use traits::{BinaryLinalgKernel, RealField};
