//! Missingness tracking: the validity buffer and its Arrow conversions.

pub mod validity;

pub use validity::ValidityMask;
