//! This module serves as the public API for the stateless numeric kernels.
//!
//! Kernels operate on plain slices and scalars; they know nothing about
//! validity masks beyond the combined mask the slice runner is handed.

pub mod elementwise;
pub(crate) mod rounding;

pub use elementwise::{binary_kernel, KernelEvent, KernelOp};
