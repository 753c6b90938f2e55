//! Operation registrations exposed to a host framework
//!
//! The solve kernel is registered under two names, each for two scalar types.
//! All four entries share the same generic implementation in [`crate::op`].

use crate::error::{Result, SolveError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the single-matrix solve operation
pub const MATRIX_SOLVE: &str = "MatrixSolve";

/// Name of the batched solve operation
pub const BATCH_MATRIX_SOLVE: &str = "BatchMatrixSolve";

/// Floating point scalar type of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "float"),
            DType::F64 => write!(f, "double"),
        }
    }
}

/// A named operation variant the host framework can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpRegistration {
    /// Operation name
    pub name: &'static str,
    /// Scalar type the variant is instantiated for
    pub dtype: DType,
    /// Whether leading batch dimensions are accepted
    pub batched: bool,
}

const REGISTRATIONS: [OpRegistration; 4] = [
    OpRegistration {
        name: MATRIX_SOLVE,
        dtype: DType::F32,
        batched: false,
    },
    OpRegistration {
        name: MATRIX_SOLVE,
        dtype: DType::F64,
        batched: false,
    },
    OpRegistration {
        name: BATCH_MATRIX_SOLVE,
        dtype: DType::F32,
        batched: true,
    },
    OpRegistration {
        name: BATCH_MATRIX_SOLVE,
        dtype: DType::F64,
        batched: true,
    },
];

/// All registered solve variants
pub fn registrations() -> &'static [OpRegistration] {
    &REGISTRATIONS
}

/// Find the registration for an operation name and scalar type
pub fn lookup(name: &str, dtype: DType) -> Result<OpRegistration> {
    REGISTRATIONS
        .iter()
        .find(|r| r.name == name && r.dtype == dtype)
        .copied()
        .ok_or_else(|| SolveError::UnknownOp {
            name: name.to_string(),
            dtype,
        })
}

/// Registered operation name for a batch flag
pub fn op_name(batched: bool) -> &'static str {
    if batched {
        BATCH_MATRIX_SOLVE
    } else {
        MATRIX_SOLVE
    }
}
