// Copyright 2025 Lars Brubaker
// Error taxonomy for interpolator construction and batch evaluation.
//
// Failures are shape or parameter problems detected eagerly. A query point
// outside the convex hull is a normal outcome (fill value), and a gradient
// solve that runs out of sweeps is reported through `GradientReport`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Array dimensions disagree, e.g. value rows vs. point count.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// An index in a supplied vertex or neighbor table points past the end
    /// of the array it refers to.
    #[error("{table} index {index} out of range (len {len})")]
    IndexOutOfRange {
        table: &'static str,
        index: i64,
        len: usize,
    },

    #[error("triangulation has no simplices")]
    EmptyTriangulation,

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
