// In: src/cast/native.rs

//! Plain (non-nullable) one-dimensional arrays produced by the cast engine.

use ndarray::{Array1, ArrayView1, CowArray, Ix1};

use crate::array::NumericBuffer;
use crate::traits::NumericNative;
use crate::types::{NativeDtype, NumericDtype};

/// A native numeric array, borrowed from the source when no conversion was
/// needed.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeNumeric<'a> {
    Int8(CowArray<'a, i8, Ix1>),
    Int16(CowArray<'a, i16, Ix1>),
    Int32(CowArray<'a, i32, Ix1>),
    Int64(CowArray<'a, i64, Ix1>),
    UInt8(CowArray<'a, u8, Ix1>),
    UInt16(CowArray<'a, u16, Ix1>),
    UInt32(CowArray<'a, u32, Ix1>),
    UInt64(CowArray<'a, u64, Ix1>),
    Float32(CowArray<'a, f32, Ix1>),
    Float64(CowArray<'a, f64, Ix1>),
}

macro_rules! dispatch_native {
    ($native:expr, $v:ident => $body:expr) => {
        match $native {
            NativeNumeric::Int8($v) => $body,
            NativeNumeric::Int16($v) => $body,
            NativeNumeric::Int32($v) => $body,
            NativeNumeric::Int64($v) => $body,
            NativeNumeric::UInt8($v) => $body,
            NativeNumeric::UInt16($v) => $body,
            NativeNumeric::UInt32($v) => $body,
            NativeNumeric::UInt64($v) => $body,
            NativeNumeric::Float32($v) => $body,
            NativeNumeric::Float64($v) => $body,
        }
    };
}

impl<'a> NativeNumeric<'a> {
    pub fn dtype(&self) -> NumericDtype {
        match self {
            NativeNumeric::Int8(_) => NumericDtype::Int8,
            NativeNumeric::Int16(_) => NumericDtype::Int16,
            NativeNumeric::Int32(_) => NumericDtype::Int32,
            NativeNumeric::Int64(_) => NumericDtype::Int64,
            NativeNumeric::UInt8(_) => NumericDtype::UInt8,
            NativeNumeric::UInt16(_) => NumericDtype::UInt16,
            NativeNumeric::UInt32(_) => NumericDtype::UInt32,
            NativeNumeric::UInt64(_) => NumericDtype::UInt64,
            NativeNumeric::Float32(_) => NumericDtype::Float32,
            NativeNumeric::Float64(_) => NumericDtype::Float64,
        }
    }

    pub fn len(&self) -> usize {
        dispatch_native!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if the values are a view into the source array.
    pub fn is_borrowed(&self) -> bool {
        dispatch_native!(self, v => v.is_view())
    }

    pub fn view<T: NumericNative>(&self) -> Option<ArrayView1<'_, T>> {
        T::native_view(self)
    }

    /// Copies the values into a numeric buffer of the same dtype.
    pub fn to_buffer(&self) -> NumericBuffer {
        match self {
            NativeNumeric::Int8(v) => NumericBuffer::Int8(v.iter().copied().collect()),
            NativeNumeric::Int16(v) => NumericBuffer::Int16(v.iter().copied().collect()),
            NativeNumeric::Int32(v) => NumericBuffer::Int32(v.iter().copied().collect()),
            NativeNumeric::Int64(v) => NumericBuffer::Int64(v.iter().copied().collect()),
            NativeNumeric::UInt8(v) => NumericBuffer::UInt8(v.iter().copied().collect()),
            NativeNumeric::UInt16(v) => NumericBuffer::UInt16(v.iter().copied().collect()),
            NativeNumeric::UInt32(v) => NumericBuffer::UInt32(v.iter().copied().collect()),
            NativeNumeric::UInt64(v) => NumericBuffer::UInt64(v.iter().copied().collect()),
            NativeNumeric::Float32(v) => NumericBuffer::Float32(v.iter().copied().collect()),
            NativeNumeric::Float64(v) => NumericBuffer::Float64(v.iter().copied().collect()),
        }
    }
}

/// The result of casting to a native dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArray<'a> {
    Numeric(NativeNumeric<'a>),
    Bool(Array1<bool>),
    /// Nanoseconds since the Unix epoch, `NAT` for not-a-time.
    DatetimeNs(Array1<i64>),
    /// Nanosecond durations, `NAT` for not-a-time.
    TimedeltaNs(Array1<i64>),
}

impl<'a> NativeArray<'a> {
    pub fn dtype(&self) -> NativeDtype {
        match self {
            NativeArray::Numeric(n) => NativeDtype::Numeric(n.dtype()),
            NativeArray::Bool(_) => NativeDtype::Bool,
            NativeArray::DatetimeNs(_) => NativeDtype::DatetimeNs,
            NativeArray::TimedeltaNs(_) => NativeDtype::TimedeltaNs,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NativeArray::Numeric(n) => n.len(),
            NativeArray::Bool(v) => v.len(),
            NativeArray::DatetimeNs(v) | NativeArray::TimedeltaNs(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, NativeArray::Numeric(n) if n.is_borrowed())
    }

    pub fn as_numeric(&self) -> Option<&NativeNumeric<'a>> {
        match self {
            NativeArray::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Typed view of a numeric result.
    pub fn view<T: NumericNative>(&self) -> Option<ArrayView1<'_, T>> {
        self.as_numeric().and_then(|n| n.view::<T>())
    }

    pub fn as_bool(&self) -> Option<&Array1<bool>> {
        match self {
            NativeArray::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// The nanosecond values of a datetime or timedelta result.
    pub fn as_nanos(&self) -> Option<&Array1<i64>> {
        match self {
            NativeArray::DatetimeNs(v) | NativeArray::TimedeltaNs(v) => Some(v),
            _ => None,
        }
    }
}
