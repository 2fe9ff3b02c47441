//! This module defines the trait that links each primitive element type to its
//! dtype, its Arrow type and its kernels.

use arrow::datatypes::{
    ArrowNativeType, ArrowPrimitiveType, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use ndarray::{ArrayView1, CowArray, Ix1};
use num_traits::{AsPrimitive, NumCast, One, Zero};
use std::fmt;

use crate::array::NumericBuffer;
use crate::cast::NativeNumeric;
use crate::kernels::elementwise::{float_apply, int_abs, int_apply, int_neg, Computed, KernelOp};
use crate::kernels::rounding::{float_round, int_round};
use crate::types::NumericDtype;

/// A primitive element type storable in a `NumericArray`.
pub trait NumericNative:
    ArrowNativeType + NumCast + AsPrimitive<f64> + PartialOrd + Zero + One + fmt::Display
{
    const DTYPE: NumericDtype;

    /// The Arrow primitive type with the same physical layout.
    type ArrowType: ArrowPrimitiveType<Native = Self>;

    /// Borrows the typed values if `buffer` holds this element type.
    fn buffer_slice(buffer: &NumericBuffer) -> Option<&[Self]>;

    /// Wraps typed values into the type-erased buffer.
    fn into_buffer(values: Vec<Self>) -> NumericBuffer;

    /// Wraps a (possibly borrowed) native array into its type-erased form.
    fn wrap_native(values: CowArray<'_, Self, Ix1>) -> NativeNumeric<'_>;

    /// Views the native array if it holds this element type.
    fn native_view<'b>(native: &'b NativeNumeric<'_>) -> Option<ArrayView1<'b, Self>>;

    fn apply_binary(op: KernelOp, a: Self, b: Self) -> Computed<Self>;

    fn negate(self) -> Self;

    fn absolute(self) -> Self;

    /// Rounds half to even at `decimals` places; negative `decimals` round
    /// to the left of the decimal point.
    fn round_to(self, decimals: i32) -> Self;

    /// `false` only for NaN and infinities.
    fn is_finite_value(self) -> bool;

    /// `true` if the value has no fractional part.
    fn is_integral(self) -> bool;
}

// Implement the trait for all primitive integer types.
macro_rules! impl_int_native {
    ($T:ty, $variant:ident, $arrow:ty) => {
        impl NumericNative for $T {
            const DTYPE: NumericDtype = NumericDtype::$variant;
            type ArrowType = $arrow;

            fn buffer_slice(buffer: &NumericBuffer) -> Option<&[Self]> {
                match buffer {
                    NumericBuffer::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn into_buffer(values: Vec<Self>) -> NumericBuffer {
                NumericBuffer::$variant(values)
            }

            fn wrap_native(values: CowArray<'_, Self, Ix1>) -> NativeNumeric<'_> {
                NativeNumeric::$variant(values)
            }

            fn native_view<'b>(native: &'b NativeNumeric<'_>) -> Option<ArrayView1<'b, Self>> {
                match native {
                    NativeNumeric::$variant(values) => Some(values.view()),
                    _ => None,
                }
            }

            fn apply_binary(op: KernelOp, a: Self, b: Self) -> Computed<Self> {
                int_apply(op, a, b)
            }

            fn negate(self) -> Self {
                int_neg(self)
            }

            fn absolute(self) -> Self {
                int_abs(self)
            }

            fn round_to(self, decimals: i32) -> Self {
                int_round(self, decimals)
            }

            fn is_finite_value(self) -> bool {
                true
            }

            fn is_integral(self) -> bool {
                true
            }
        }
    };
}

macro_rules! impl_float_native {
    ($T:ty, $variant:ident, $arrow:ty) => {
        impl NumericNative for $T {
            const DTYPE: NumericDtype = NumericDtype::$variant;
            type ArrowType = $arrow;

            fn buffer_slice(buffer: &NumericBuffer) -> Option<&[Self]> {
                match buffer {
                    NumericBuffer::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            fn into_buffer(values: Vec<Self>) -> NumericBuffer {
                NumericBuffer::$variant(values)
            }

            fn wrap_native(values: CowArray<'_, Self, Ix1>) -> NativeNumeric<'_> {
                NativeNumeric::$variant(values)
            }

            fn native_view<'b>(native: &'b NativeNumeric<'_>) -> Option<ArrayView1<'b, Self>> {
                match native {
                    NativeNumeric::$variant(values) => Some(values.view()),
                    _ => None,
                }
            }

            fn apply_binary(op: KernelOp, a: Self, b: Self) -> Computed<Self> {
                float_apply(op, a, b)
            }

            fn negate(self) -> Self {
                -self
            }

            fn absolute(self) -> Self {
                self.abs()
            }

            fn round_to(self, decimals: i32) -> Self {
                float_round(self, decimals)
            }

            fn is_finite_value(self) -> bool {
                self.is_finite()
            }

            fn is_integral(self) -> bool {
                self.is_finite() && self.fract() == 0.0
            }
        }
    };
}

impl_int_native!(i8, Int8, Int8Type);
impl_int_native!(i16, Int16, Int16Type);
impl_int_native!(i32, Int32, Int32Type);
impl_int_native!(i64, Int64, Int64Type);
impl_int_native!(u8, UInt8, UInt8Type);
impl_int_native!(u16, UInt16, UInt16Type);
impl_int_native!(u32, UInt32, UInt32Type);
impl_int_native!(u64, UInt64, UInt64Type);
impl_float_native!(f32, Float32, Float32Type);
impl_float_native!(f64, Float64, Float64Type);

/// Runs `$body` with `$T` bound to the primitive type of `$dtype`.
///
/// ```ignore
/// let len = with_native_type!(dtype, T => { Vec::<T>::new().len() });
/// ```
#[macro_export]
#[doc(hidden)]
macro_rules! with_native_type {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::types::NumericDtype::Int8 => {
                type $T = i8;
                $body
            }
            $crate::types::NumericDtype::Int16 => {
                type $T = i16;
                $body
            }
            $crate::types::NumericDtype::Int32 => {
                type $T = i32;
                $body
            }
            $crate::types::NumericDtype::Int64 => {
                type $T = i64;
                $body
            }
            $crate::types::NumericDtype::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::types::NumericDtype::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::types::NumericDtype::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::types::NumericDtype::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::types::NumericDtype::Float32 => {
                type $T = f32;
                $body
            }
            $crate::types::NumericDtype::Float64 => {
                type $T = f64;
                $body
            }
        }
    };
}
