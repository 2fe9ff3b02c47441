// In: src/array/mod.rs

//! The Masked Numeric Array: a typed data buffer paired with a validity mask
//! of the same length.
//!
//! Arrays have value semantics. Every operation that produces an array
//! returns a new one with its own buffers; nothing mutates a live array.

pub mod buffer;
mod construct;
mod unary;


pub use buffer::NumericBuffer;
pub(crate) use buffer::{dispatch_buffer, map_buffer};
pub use unary::RoundArgs;

use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::{NumericDtype, Scalar};

#[derive(Debug, Clone)]
pub struct NumericArray {
    data: NumericBuffer,
    mask: ValidityMask,
}

impl NumericArray {
    //==================================================================================
    // 1. Construction
    //==================================================================================

    /// Pairs a data buffer with its mask.
    ///
    /// # Panics
    /// Panics if the lengths differ. Use [`NumericArray::try_new`] for
    /// untrusted input.
    pub fn new(data: NumericBuffer, mask: ValidityMask) -> Self {
        assert_eq!(
            data.len(),
            mask.len(),
            "data and mask must have the same length"
        );
        Self { data, mask }
    }

    /// Fallible counterpart of [`NumericArray::new`].
    ///
    /// # Errors
    /// Returns `LengthMismatch` if the lengths differ.
    pub fn try_new(data: NumericBuffer, mask: ValidityMask) -> Result<Self> {
        if data.len() != mask.len() {
            return Err(MaskArrayError::LengthMismatch {
                left: data.len(),
                right: mask.len(),
            });
        }
        Ok(Self { data, mask })
    }

    /// An array with no missing slots.
    pub fn from_values<T: NumericNative>(values: Vec<T>) -> Self {
        let mask = ValidityMask::all_present(values.len());
        Self::new(T::into_buffer(values), mask)
    }

    /// `None` entries become missing slots holding zero.
    pub fn from_options<T: NumericNative>(values: &[Option<T>]) -> Self {
        let data = values.iter().map(|v| v.unwrap_or_else(T::zero)).collect();
        let mask = values.iter().map(Option::is_none).collect();
        Self::new(T::into_buffer(data), mask)
    }

    pub fn empty(dtype: NumericDtype) -> Self {
        Self::new(NumericBuffer::zeros(dtype, 0), ValidityMask::all_present(0))
    }

    /// Concatenates arrays of the same dtype, preserving order.
    ///
    /// # Errors
    /// * `InvalidArgument` for an empty input (there is no dtype to use).
    /// * `TypeMismatch` if the dtypes differ.
    pub fn concat(arrays: &[NumericArray]) -> Result<Self> {
        let first = arrays.first().ok_or_else(|| {
            MaskArrayError::InvalidArgument("need at least one array to concatenate".to_string())
        })?;
        let dtype = first.dtype();
        let buffers: Vec<&NumericBuffer> = arrays.iter().map(|a| &a.data).collect();
        let data = NumericBuffer::concat(dtype, &buffers)?;
        let mask = ValidityMask::concat(arrays.iter().map(|a| &a.mask));
        Ok(Self::new(data, mask))
    }

    //==================================================================================
    // 2. Accessors
    //==================================================================================

    pub fn dtype(&self) -> NumericDtype {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &NumericBuffer {
        &self.data
    }

    pub fn mask(&self) -> &ValidityMask {
        &self.mask
    }

    /// The raw typed values, including the unspecified data at missing slots.
    ///
    /// # Errors
    /// Returns `InternalError` if `T` does not match the array's dtype.
    pub fn values<T: NumericNative>(&self) -> Result<&[T]> {
        self.data.typed::<T>()
    }

    /// The value at `idx`, or `None` if the slot is missing or out of bounds.
    pub fn get(&self, idx: usize) -> Option<Scalar> {
        if idx >= self.len() || self.mask.is_missing(idx) {
            return None;
        }
        Some(self.data.scalar_at(idx))
    }

    pub fn null_count(&self) -> usize {
        self.mask.count_missing()
    }

    pub fn has_missing(&self) -> bool {
        self.mask.any_missing()
    }

    /// One boolean per slot, `true` where missing.
    pub fn isna(&self) -> Vec<bool> {
        self.mask.to_vec()
    }

    /// # Errors
    /// Returns `InternalError` if `T` does not match the array's dtype.
    pub fn to_options<T: NumericNative>(&self) -> Result<Vec<Option<T>>> {
        let values = self.values::<T>()?;
        Ok(values
            .iter()
            .zip(self.mask.iter())
            .map(|(&v, missing)| (!missing).then_some(v))
            .collect())
    }

    //==================================================================================
    // 3. Ownership
    //==================================================================================

    /// A full, independent copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn into_parts(self) -> (NumericBuffer, ValidityMask) {
        (self.data, self.mask)
    }
}

/// Arrays are equal when dtype and mask agree and every present slot holds
/// the same value. Data behind missing slots is ignored; present NaNs
/// compare equal.
impl PartialEq for NumericArray {
    fn eq(&self, other: &Self) -> bool {
        if self.dtype() != other.dtype() || self.mask != other.mask {
            return false;
        }
        (0..self.len())
            .filter(|&i| !self.mask.is_missing(i))
            .all(|i| match (self.data.scalar_at(i), other.data.scalar_at(i)) {
                // A present NaN equals a present NaN.
                (Scalar::Float64(a), Scalar::Float64(b)) if a.is_nan() && b.is_nan() => true,
                (a, b) => a == b,
            })
    }
}
