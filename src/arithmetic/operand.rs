// In: src/arithmetic/operand.rs

//! The closed set of right-hand operands a binary operator accepts, and their
//! validation against the left-hand array.

use chrono::TimeDelta;
use ndarray::{ArrayBase, Data, Dimension};

use crate::array::{NumericArray, NumericBuffer};
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::{Na, NumericDtype, Scalar};

const NUMERIC_ONLY: &str = "can only perform ops with numeric values";

/// The right-hand side of a binary operator.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Another nullable array; contributes its mask.
    Masked(&'a NumericArray),
    /// A plain buffer without missingness.
    Native(NativeOperand),
    Scalar(Scalar),
    Duration(TimeDelta),
    /// The missing-value singleton.
    Missing,
}

/// Values of a plain (non-masked) buffer, flattened in logical order.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValues {
    Numeric(NumericBuffer),
    Bool(Vec<bool>),
}

/// A plain buffer together with its shape, so rank can be checked at
/// operator time.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeOperand {
    shape: Vec<usize>,
    values: NativeValues,
}

impl NativeOperand {
    /// A one-dimensional numeric buffer.
    pub fn from_buffer(buffer: NumericBuffer) -> Self {
        Self {
            shape: vec![buffer.len()],
            values: NativeValues::Numeric(buffer),
        }
    }

    pub fn from_ndarray<T, S, D>(array: &ArrayBase<S, D>) -> Self
    where
        T: NumericNative,
        S: Data<Elem = T>,
        D: Dimension,
    {
        Self {
            shape: array.shape().to_vec(),
            values: NativeValues::Numeric(T::into_buffer(array.iter().copied().collect())),
        }
    }

    pub fn from_bool_ndarray<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = bool>,
        D: Dimension,
    {
        Self {
            shape: array.shape().to_vec(),
            values: NativeValues::Bool(array.iter().copied().collect()),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Length of the first axis.
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> &NativeValues {
        &self.values
    }

    fn type_name(&self) -> String {
        match &self.values {
            NativeValues::Numeric(buffer) => buffer.dtype().numpy_name().to_string(),
            NativeValues::Bool(_) => "bool".to_string(),
        }
    }
}

/// A validated operand, borrowing from the caller's `Operand`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Resolved<'o> {
    /// Elementwise values of the same length as `self`. `mask` is `None` for
    /// plain buffers.
    Array {
        data: &'o NumericBuffer,
        mask: Option<&'o ValidityMask>,
    },
    Scalar(&'o Scalar),
    Duration(TimeDelta),
    Missing,
}

impl<'a> Operand<'a> {
    /// Name of the operand's type, used in error reports.
    pub fn type_name(&self) -> String {
        match self {
            Operand::Masked(arr) => arr.dtype().to_string(),
            Operand::Native(native) => native.type_name(),
            Operand::Scalar(s) => s.type_name().to_string(),
            Operand::Duration(_) => "timedelta".to_string(),
            Operand::Missing => "NAType".to_string(),
        }
    }

    /// Checks rank, length and kind against a left-hand array of `len`
    /// elements and `dtype`.
    ///
    /// # Errors
    /// * `UnsupportedDimension` for operands of rank > 1.
    /// * `LengthMismatch` for array operands of a different length.
    /// * `TypeMismatch` for non-numeric buffers or scalars.
    pub(crate) fn resolve(&self, len: usize, dtype: NumericDtype) -> Result<Resolved<'_>> {
        match self {
            Operand::Masked(arr) => {
                if arr.len() != len {
                    return Err(MaskArrayError::LengthMismatch {
                        left: len,
                        right: arr.len(),
                    });
                }
                Ok(Resolved::Array {
                    data: arr.data(),
                    mask: Some(arr.mask()),
                })
            }
            Operand::Native(native) => {
                if native.ndim() > 1 {
                    return Err(MaskArrayError::UnsupportedDimension {
                        ndim: native.ndim(),
                    });
                }
                if native.len() != len {
                    return Err(MaskArrayError::LengthMismatch {
                        left: len,
                        right: native.len(),
                    });
                }
                match &native.values {
                    NativeValues::Numeric(buffer) => Ok(Resolved::Array {
                        data: buffer,
                        mask: None,
                    }),
                    NativeValues::Bool(_) => Err(MaskArrayError::type_mismatch(
                        NUMERIC_ONLY,
                        dtype,
                        native.type_name(),
                    )),
                }
            }
            Operand::Scalar(scalar) if scalar.is_numeric() => Ok(Resolved::Scalar(scalar)),
            Operand::Scalar(scalar) => Err(MaskArrayError::type_mismatch(
                NUMERIC_ONLY,
                dtype,
                scalar.type_name(),
            )),
            Operand::Duration(delta) => Ok(Resolved::Duration(*delta)),
            Operand::Missing => Ok(Resolved::Missing),
        }
    }
}

impl<'o> Resolved<'o> {
    pub(crate) fn is_missing_singleton(&self) -> bool {
        matches!(self, Resolved::Missing)
    }

    /// The operand's mask, if it carries one.
    pub(crate) fn mask(&self) -> Option<&'o ValidityMask> {
        match self {
            Resolved::Array { mask, .. } => *mask,
            _ => None,
        }
    }

    pub(crate) fn is_float(&self) -> bool {
        match self {
            Resolved::Array { data, .. } => data.dtype().is_float(),
            Resolved::Scalar(s) => matches!(s, Scalar::Float64(_)),
            _ => false,
        }
    }
}

//==================================================================================
// Conversions
//==================================================================================

impl<'a> From<&'a NumericArray> for Operand<'a> {
    fn from(array: &'a NumericArray) -> Self {
        Operand::Masked(array)
    }
}

impl From<Scalar> for Operand<'_> {
    fn from(scalar: Scalar) -> Self {
        Operand::Scalar(scalar)
    }
}

impl From<Na> for Operand<'_> {
    fn from(_: Na) -> Self {
        Operand::Missing
    }
}

impl From<TimeDelta> for Operand<'_> {
    fn from(delta: TimeDelta) -> Self {
        Operand::Duration(delta)
    }
}

impl From<NativeOperand> for Operand<'_> {
    fn from(native: NativeOperand) -> Self {
        Operand::Native(native)
    }
}

impl From<NumericBuffer> for Operand<'_> {
    fn from(buffer: NumericBuffer) -> Self {
        Operand::Native(NativeOperand::from_buffer(buffer))
    }
}

impl<T: NumericNative> From<Vec<T>> for Operand<'_> {
    fn from(values: Vec<T>) -> Self {
        Operand::Native(NativeOperand::from_buffer(T::into_buffer(values)))
    }
}

impl<T, S, D> From<&ArrayBase<S, D>> for Operand<'_>
where
    T: NumericNative,
    S: Data<Elem = T>,
    D: Dimension,
{
    /// Zero-dimensional arrays act as scalars.
    fn from(array: &ArrayBase<S, D>) -> Self {
        if array.ndim() == 0 {
            if let Some(value) = array.iter().next() {
                return Operand::Scalar(T::into_buffer(vec![*value]).scalar_at(0));
            }
        }
        Operand::Native(NativeOperand::from_ndarray(array))
    }
}

macro_rules! impl_operand_from_primitive {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(value: $t) -> Self {
                    Operand::Scalar(Scalar::from(value))
                }
            }
        )+
    };
}

impl_operand_from_primitive!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, &str);
