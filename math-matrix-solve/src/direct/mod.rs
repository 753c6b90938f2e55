//! Direct solvers for dense linear systems
//!
//! This module provides:
//! - [`LuFactorization`]: LU decomposition with partial pivoting

mod lu;

pub use lu::LuFactorization;
