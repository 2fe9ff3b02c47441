// In: src/array/buffer.rs

//! The type-erased data buffer of a `NumericArray`.
//!
//! One variant per supported element type. Code that needs the concrete
//! element type goes through `dispatch_buffer!` (read access) or
//! `map_buffer!` (same-type transforms) instead of matching by hand.

use num_traits::{AsPrimitive, One, Zero};

use crate::error::{MaskArrayError, Result};
use crate::traits::NumericNative;
use crate::types::{NumericDtype, Scalar};
use crate::with_native_type;

#[derive(Debug, Clone, PartialEq)]
pub enum NumericBuffer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// Binds `$v` to the typed `Vec` inside a `NumericBuffer` and evaluates `$body`.
macro_rules! dispatch_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            $crate::array::NumericBuffer::Int8($v) => $body,
            $crate::array::NumericBuffer::Int16($v) => $body,
            $crate::array::NumericBuffer::Int32($v) => $body,
            $crate::array::NumericBuffer::Int64($v) => $body,
            $crate::array::NumericBuffer::UInt8($v) => $body,
            $crate::array::NumericBuffer::UInt16($v) => $body,
            $crate::array::NumericBuffer::UInt32($v) => $body,
            $crate::array::NumericBuffer::UInt64($v) => $body,
            $crate::array::NumericBuffer::Float32($v) => $body,
            $crate::array::NumericBuffer::Float64($v) => $body,
        }
    };
}

/// Like `dispatch_buffer!`, but `$body` must produce a `Vec` of the same
/// element type, which is wrapped back into the same variant.
macro_rules! map_buffer {
    ($buffer:expr, $v:ident => $body:expr) => {
        match $buffer {
            $crate::array::NumericBuffer::Int8($v) => $crate::array::NumericBuffer::Int8($body),
            $crate::array::NumericBuffer::Int16($v) => $crate::array::NumericBuffer::Int16($body),
            $crate::array::NumericBuffer::Int32($v) => $crate::array::NumericBuffer::Int32($body),
            $crate::array::NumericBuffer::Int64($v) => $crate::array::NumericBuffer::Int64($body),
            $crate::array::NumericBuffer::UInt8($v) => $crate::array::NumericBuffer::UInt8($body),
            $crate::array::NumericBuffer::UInt16($v) => {
                $crate::array::NumericBuffer::UInt16($body)
            }
            $crate::array::NumericBuffer::UInt32($v) => {
                $crate::array::NumericBuffer::UInt32($body)
            }
            $crate::array::NumericBuffer::UInt64($v) => {
                $crate::array::NumericBuffer::UInt64($body)
            }
            $crate::array::NumericBuffer::Float32($v) => {
                $crate::array::NumericBuffer::Float32($body)
            }
            $crate::array::NumericBuffer::Float64($v) => {
                $crate::array::NumericBuffer::Float64($body)
            }
        }
    };
}

pub(crate) use dispatch_buffer;
pub(crate) use map_buffer;

impl NumericBuffer {
    //==================================================================================
    // 1. Construction
    //==================================================================================

    /// `len` ones of `dtype`; the placeholder data behind all-missing results.
    pub fn ones(dtype: NumericDtype, len: usize) -> Self {
        with_native_type!(dtype, T => { T::into_buffer(vec![<T as One>::one(); len]) })
    }

    pub fn zeros(dtype: NumericDtype, len: usize) -> Self {
        with_native_type!(dtype, T => { T::into_buffer(vec![<T as Zero>::zero(); len]) })
    }

    /// `len` copies of a numeric scalar converted to `dtype` with `as` semantics.
    ///
    /// # Errors
    /// Returns `TypeMismatch` for non-numeric scalars.
    pub fn repeat_scalar(scalar: &Scalar, dtype: NumericDtype, len: usize) -> Result<Self> {
        with_native_type!(dtype, T => {
            let value: T = match scalar {
                Scalar::Int64(v) => (*v).as_(),
                Scalar::UInt64(v) => (*v).as_(),
                Scalar::Float64(v) => (*v).as_(),
                other => {
                    return Err(MaskArrayError::type_mismatch(
                        "can only perform ops with numeric values",
                        dtype,
                        other.type_name(),
                    ))
                }
            };
            Ok(T::into_buffer(vec![value; len]))
        })
    }

    /// Concatenates buffers of one dtype, preserving order.
    ///
    /// # Errors
    /// Returns `TypeMismatch` if any part has a different dtype than `dtype`.
    pub fn concat(dtype: NumericDtype, parts: &[&NumericBuffer]) -> Result<Self> {
        with_native_type!(dtype, T => {
            let total = parts.iter().map(|p| p.len()).sum();
            let mut out: Vec<T> = Vec::with_capacity(total);
            for part in parts {
                let slice = T::buffer_slice(part).ok_or_else(|| {
                    MaskArrayError::type_mismatch(
                        "cannot concatenate arrays of different dtypes",
                        dtype,
                        part.dtype(),
                    )
                })?;
                out.extend_from_slice(slice);
            }
            Ok(T::into_buffer(out))
        })
    }

    //==================================================================================
    // 2. Queries
    //==================================================================================

    pub fn len(&self) -> usize {
        dispatch_buffer!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> NumericDtype {
        match self {
            NumericBuffer::Int8(_) => NumericDtype::Int8,
            NumericBuffer::Int16(_) => NumericDtype::Int16,
            NumericBuffer::Int32(_) => NumericDtype::Int32,
            NumericBuffer::Int64(_) => NumericDtype::Int64,
            NumericBuffer::UInt8(_) => NumericDtype::UInt8,
            NumericBuffer::UInt16(_) => NumericDtype::UInt16,
            NumericBuffer::UInt32(_) => NumericDtype::UInt32,
            NumericBuffer::UInt64(_) => NumericDtype::UInt64,
            NumericBuffer::Float32(_) => NumericDtype::Float32,
            NumericBuffer::Float64(_) => NumericDtype::Float64,
        }
    }

    /// The value at `idx` widened to its scalar family.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn scalar_at(&self, idx: usize) -> Scalar {
        dispatch_buffer!(self, v => Scalar::from(v[idx]))
    }

    pub fn is_one_at(&self, idx: usize) -> bool {
        dispatch_buffer!(self, v => v[idx].is_one())
    }

    pub fn is_zero_at(&self, idx: usize) -> bool {
        dispatch_buffer!(self, v => v[idx].is_zero())
    }

    /// Every value as `f64`; lossy for 64-bit integers past 2^53.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        dispatch_buffer!(self, v => v.iter().map(|&x| x.as_()).collect())
    }

    //==================================================================================
    // 3. Conversion
    //==================================================================================

    /// Converts every value to `dtype` with `as` semantics: integers wrap or
    /// truncate, floats saturate and NaN becomes zero.
    pub fn cast(&self, dtype: NumericDtype) -> NumericBuffer {
        if dtype == self.dtype() {
            return self.clone();
        }
        with_native_type!(dtype, T => {
            dispatch_buffer!(self, v => T::into_buffer(v.iter().map(|&x| x.as_()).collect()))
        })
    }

    /// Borrows the typed values.
    ///
    /// # Errors
    /// Returns `InternalError` if `T` is not this buffer's element type.
    pub fn typed<T: NumericNative>(&self) -> Result<&[T]> {
        T::buffer_slice(self).ok_or_else(|| {
            MaskArrayError::InternalError(format!(
                "buffer holds {} values, requested {}",
                self.dtype(),
                T::DTYPE
            ))
        })
    }
}
