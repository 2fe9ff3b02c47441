//! This file is the root of the `maskarray` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`array`, `arithmetic`,
//!     `cast`, `bridge`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the public surface: the `NumericArray` type, its dtype and
//!     scalar descriptors, the configuration types and the error type.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod arithmetic;
pub mod array;
pub mod bridge;
pub mod cast;
pub mod config;
pub mod error;
pub mod kernels;
pub mod null_handling;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use arithmetic::{ArithOutput, ArithmeticOp, DurationArray, NativeOperand, OpResult, Operand};
pub use array::{NumericArray, NumericBuffer, RoundArgs};
pub use cast::{CastOutput, FillValue, NativeArray, NativeNumeric};
pub use config::{ErrAction, ErrState, MaskArrayConfig};
pub use error::{MaskArrayError, Result};
pub use null_handling::ValidityMask;
pub use observability::init_logging;
pub use traits::NumericNative;
pub use types::{CastTarget, NativeDtype, NumericDtype, Scalar, NA};

#[doc(hidden)]
pub use log as __log;
