//! This module defines the core, strongly-typed descriptors used throughout
//! the crate: numeric dtypes, cast targets and scalar values.

pub mod cast_target;
pub mod numeric_dtype;
pub mod scalar;

// Re-export the main type(s) for easier access.
pub use cast_target::{CastTarget, NativeDtype};
pub use numeric_dtype::{NumericDtype, NumericKind};
pub use scalar::{Na, Scalar, NA};
