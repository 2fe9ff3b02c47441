// In: src/error.rs

//! This module defines the single, unified error type for the entire maskarray library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::config::FpErrorKind;

#[derive(Error, Debug)]
pub enum MaskArrayError {
    // =========================================================================
    // === Shape Errors
    // =========================================================================
    #[error("can only perform ops with 1-d structures, got an operand with {ndim} dimensions")]
    UnsupportedDimension { ndim: usize },

    #[error("Lengths must match: left has {left} elements, right has {right}")]
    LengthMismatch { left: usize, right: usize },

    // =========================================================================
    // === Type & Cast Errors
    // =========================================================================
    #[error("Type mismatch: {message} (left: {left}, right: {right})")]
    TypeMismatch {
        message: String,
        left: String,
        right: String,
    },

    #[error("Unsafe cast from {from} to {to}: {reason}")]
    UnsafeCast {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Integers to negative integer powers are not allowed (exponent {exponent} at position {index})")]
    NegativeIntegerPower { index: usize, exponent: i64 },

    #[error("Floating point error ({kind}) encountered in '{op}' at position {index}")]
    FloatingPoint {
        kind: FpErrorKind,
        op: &'static str,
        index: usize,
    },

    // =========================================================================
    // === Argument & Construction Errors
    // =========================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported argument: {0}")]
    UnsupportedArgument(String),

    #[error("Could not parse {value:?} as a number at position {index}")]
    Parse { index: usize, value: String },

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl MaskArrayError {
    /// Builds a `TypeMismatch` naming both involved types.
    pub(crate) fn type_mismatch(
        message: impl Into<String>,
        left: impl ToString,
        right: impl ToString,
    ) -> Self {
        MaskArrayError::TypeMismatch {
            message: message.into(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Returns `true` for the shape family (rank or length problems).
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            MaskArrayError::UnsupportedDimension { .. } | MaskArrayError::LengthMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MaskArrayError>;
