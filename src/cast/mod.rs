// In: src/cast/mod.rs

//! The cast engine.
//!
//! `astype` has two destinations:
//! * another nullable dtype (`CastTarget::Masked`): values convert, the mask
//!   carries over;
//! * a native dtype (`CastTarget::Native`): missing slots are replaced by a
//!   fill value chosen from the target family, and casting fails if a
//!   missing slot has no fill value.

pub mod native;
pub(crate) mod nansafe;

#[cfg(test)]
mod tests;

use std::borrow::Cow;

use ndarray::{Array1, ArrayView1, CowArray};
use num_traits::{AsPrimitive, Zero};

pub use native::{NativeArray, NativeNumeric};

use crate::arithmetic::NAT;
use crate::array::{dispatch_buffer, NumericArray, NumericBuffer};
use crate::config::MaskArrayConfig;
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::{CastTarget, NativeDtype, NumericDtype};
use crate::with_native_type;

/// The value written into missing slots of a native result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillValue {
    Float(f64),
    Int(i64),
    /// Not-a-time.
    NaT,
}

impl FillValue {
    /// NaN for float targets, NaT for datetime targets, nothing otherwise.
    pub fn for_target(dtype: NativeDtype) -> Option<FillValue> {
        if dtype.is_float() {
            Some(FillValue::Float(f64::NAN))
        } else if dtype.is_datetime() {
            Some(FillValue::NaT)
        } else {
            None
        }
    }

    fn as_numeric<T: NumericNative>(&self) -> T
    where
        f64: AsPrimitive<T>,
        i64: AsPrimitive<T>,
    {
        match self {
            FillValue::Float(v) => v.as_(),
            FillValue::Int(v) => v.as_(),
            FillValue::NaT => NAT.as_(),
        }
    }

    fn as_bool(&self) -> bool {
        match self {
            FillValue::Float(v) => *v != 0.0,
            FillValue::Int(v) => *v != 0,
            FillValue::NaT => true,
        }
    }

    fn as_nanos(&self) -> i64 {
        match self {
            FillValue::Float(v) => float_to_nanos(*v),
            FillValue::Int(v) => *v,
            FillValue::NaT => NAT,
        }
    }
}

/// What `astype` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CastOutput<'a> {
    Masked(Cow<'a, NumericArray>),
    Native(NativeArray<'a>),
}

impl<'a> CastOutput<'a> {
    pub fn as_masked(&self) -> Option<&NumericArray> {
        match self {
            CastOutput::Masked(arr) => Some(arr),
            CastOutput::Native(_) => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeArray<'a>> {
        match self {
            CastOutput::Native(arr) => Some(arr),
            CastOutput::Masked(_) => None,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        match self {
            CastOutput::Masked(arr) => matches!(arr, Cow::Borrowed(_)),
            CastOutput::Native(arr) => arr.is_borrowed(),
        }
    }
}

impl NumericArray {
    /// Casts to `target`.
    ///
    /// With `copy == false` the result borrows from `self` when no
    /// conversion is needed; `copy == true` always produces new buffers.
    ///
    /// # Errors
    /// `UnsafeCast` when missing values have no fill value in the target
    /// family, or when float values cannot be represented in an integer
    /// target.
    pub fn astype(&self, target: CastTarget, copy: bool) -> Result<CastOutput<'_>> {
        log::debug!(
            "astype: {} -> {} (copy={}, {} missing)",
            self.dtype(),
            target,
            copy,
            self.null_count()
        );
        match target {
            CastTarget::Masked(dtype) => Ok(CastOutput::Masked(self.cast_masked(dtype, copy)?)),
            CastTarget::Native(dtype) => {
                if self.dtype().is_float() {
                    nansafe::check_float_source(self, dtype)?;
                }
                let fill = FillValue::for_target(dtype);
                Ok(CastOutput::Native(self.to_native(dtype, fill, copy)?))
            }
        }
    }

    /// [`NumericArray::astype`] with `copy` taken from `config`.
    ///
    /// # Errors
    /// See [`NumericArray::astype`].
    pub fn astype_with_config(
        &self,
        target: CastTarget,
        config: &MaskArrayConfig,
    ) -> Result<CastOutput<'_>> {
        self.astype(target, config.cast.copy)
    }

    /// Materializes a native array of `dtype`, writing `na_value` into
    /// missing slots.
    ///
    /// # Errors
    /// Returns `UnsafeCast` if a slot is missing and `na_value` is `None`.
    pub fn to_native(
        &self,
        dtype: NativeDtype,
        na_value: Option<FillValue>,
        copy: bool,
    ) -> Result<NativeArray<'_>> {
        let fill = match (self.has_missing(), na_value) {
            (true, None) => {
                return Err(MaskArrayError::UnsafeCast {
                    from: self.dtype().to_string(),
                    to: dtype.to_string(),
                    reason: format!(
                        "cannot convert to '{}'-dtype array with missing values; \
                         specify an appropriate na_value for this dtype",
                        dtype
                    ),
                })
            }
            (_, fill) => fill,
        };
        let mask = self.mask();

        let native = match dtype {
            NativeDtype::Numeric(target) => {
                NativeArray::Numeric(self.materialize_numeric(target, fill, copy)?)
            }
            NativeDtype::Bool => {
                let values = self.data().to_f64_vec();
                NativeArray::Bool(Array1::from_iter(values.into_iter().enumerate().map(
                    |(i, v)| match fill {
                        Some(f) if mask.is_missing(i) => f.as_bool(),
                        // NaN is truthy.
                        _ => v != 0.0,
                    },
                )))
            }
            NativeDtype::DatetimeNs | NativeDtype::TimedeltaNs => {
                let nanos = self.nanos_with_fill(fill);
                if dtype == NativeDtype::DatetimeNs {
                    NativeArray::DatetimeNs(nanos)
                } else {
                    NativeArray::TimedeltaNs(nanos)
                }
            }
        };
        log::trace!("to_native produced {} ({} elements)", native.dtype(), native.len());
        Ok(native)
    }

    fn materialize_numeric(
        &self,
        target: NumericDtype,
        fill: Option<FillValue>,
        copy: bool,
    ) -> Result<NativeNumeric<'_>> {
        let mask = self.mask();
        if target == self.dtype() && !copy && !self.has_missing() {
            return with_native_type!(target, T => {
                let values = self.values::<T>()?;
                Ok(T::wrap_native(CowArray::from(ArrayView1::from(values))))
            });
        }
        with_native_type!(target, T => {
            let converted = self.data().cast(target);
            let mut values: Vec<T> = converted.typed::<T>()?.to_vec();
            if let Some(fill) = fill {
                let fill_value: T = fill.as_numeric::<T>();
                for (value, missing) in values.iter_mut().zip(mask.iter()) {
                    if missing {
                        *value = fill_value;
                    }
                }
            }
            Ok(T::wrap_native(CowArray::from(Array1::from(values))))
        })
    }

    fn nanos_with_fill(&self, fill: Option<FillValue>) -> Array1<i64> {
        let mask = self.mask();
        let nanos: Vec<i64> = if self.dtype().is_float() {
            self.data().to_f64_vec().into_iter().map(float_to_nanos).collect()
        } else {
            dispatch_buffer!(self.data(), v => v.iter().map(|&x| AsPrimitive::<i64>::as_(x)).collect())
        };
        Array1::from_iter(nanos.into_iter().enumerate().map(|(i, n)| match fill {
            Some(f) if mask.is_missing(i) => f.as_nanos(),
            _ => n,
        }))
    }

    /// Builds a masked array from a native numeric result. Float NaN reads
    /// as missing.
    ///
    /// # Errors
    /// Returns `TypeMismatch` for bool and temporal arrays.
    pub fn from_native(native: &NativeArray<'_>) -> Result<Self> {
        let numeric = native.as_numeric().ok_or_else(|| {
            MaskArrayError::type_mismatch(
                "can only build a numeric array from numeric values",
                "numeric",
                native.dtype(),
            )
        })?;
        let data = numeric.to_buffer();
        let mask: ValidityMask = if data.dtype().is_float() {
            data.to_f64_vec().iter().map(|v| v.is_nan()).collect()
        } else {
            ValidityMask::all_present(data.len())
        };
        Ok(NumericArray::new(zero_missing(data, &mask), mask))
    }

    /// Nullable-to-nullable conversion. The mask is copied unchanged.
    fn cast_masked(&self, dtype: NumericDtype, copy: bool) -> Result<Cow<'_, NumericArray>> {
        if dtype == self.dtype() {
            return Ok(if copy {
                Cow::Owned(self.copy())
            } else {
                Cow::Borrowed(self)
            });
        }
        if self.dtype().is_float() && dtype.is_integer() {
            nansafe::check_float_to_int(self, &dtype.to_string())?;
        }
        let data = zero_missing(self.data().cast(dtype), self.mask());
        Ok(Cow::Owned(NumericArray::new(data, self.mask().clone())))
    }
}

/// Resets the unspecified data behind missing slots so converted garbage
/// never leaks into the new array.
fn zero_missing(buffer: NumericBuffer, mask: &ValidityMask) -> NumericBuffer {
    if !mask.any_missing() {
        return buffer;
    }
    let dtype = buffer.dtype();
    with_native_type!(dtype, T => {
        match T::buffer_slice(&buffer) {
            Some(values) => {
                let mut values = values.to_vec();
                for (value, missing) in values.iter_mut().zip(mask.iter()) {
                    if missing {
                        *value = T::zero();
                    }
                }
                T::into_buffer(values)
            }
            None => buffer,
        }
    })
}

/// Float to nanoseconds: non-finite and out-of-range values become `NAT`.
fn float_to_nanos(v: f64) -> i64 {
    if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        v as i64
    } else {
        NAT
    }
}
