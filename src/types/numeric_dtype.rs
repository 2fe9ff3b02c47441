//! This module defines the canonical, type-safe representation of the numeric
//! element types a `NumericArray` can hold, and the promotion rules between them.

use arrow_schema::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MaskArrayError, Result};

/// The element kind of a numeric dtype.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Signed,
    Unsigned,
    Float,
}

impl NumericKind {
    /// Single-character kind code: `i`, `u` or `f`.
    pub fn code(&self) -> char {
        match self {
            NumericKind::Signed => 'i',
            NumericKind::Unsigned => 'u',
            NumericKind::Float => 'f',
        }
    }
}

/// The dtype of a nullable numeric array.
///
/// Each variant pairs a kind with a bit width; `numpy_name` gives the plain
/// (non-nullable) counterpart used on the native side of a cast.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericDtype {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl NumericDtype {
    pub const ALL: [NumericDtype; 10] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
    ];

    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => NumericKind::Signed,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64 => NumericKind::Unsigned,
            Self::Float32 | Self::Float64 => NumericKind::Float,
        }
    }

    pub fn bit_width(&self) -> u32 {
        match self {
            Self::Int8 | Self::UInt8 => 8,
            Self::Int16 | Self::UInt16 => 16,
            Self::Int32 | Self::UInt32 | Self::Float32 => 32,
            Self::Int64 | Self::UInt64 | Self::Float64 => 64,
        }
    }

    /// Size of one element in bytes.
    pub fn itemsize(&self) -> usize {
        (self.bit_width() / 8) as usize
    }

    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Returns `true` if the data type is a signed integer.
    pub fn is_signed_int(&self) -> bool {
        self.kind() == NumericKind::Signed
    }

    pub fn is_unsigned_int(&self) -> bool {
        self.kind() == NumericKind::Unsigned
    }

    /// Returns `true` if the data type is a floating-point number.
    pub fn is_float(&self) -> bool {
        self.kind() == NumericKind::Float
    }

    /// The nullable dtype name, e.g. `Int64`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    /// The plain native dtype name, e.g. `int64`.
    pub fn numpy_name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Looks up a dtype by kind and width.
    pub fn from_kind_and_width(kind: NumericKind, bits: u32) -> Option<Self> {
        match (kind, bits) {
            (NumericKind::Signed, 8) => Some(Self::Int8),
            (NumericKind::Signed, 16) => Some(Self::Int16),
            (NumericKind::Signed, 32) => Some(Self::Int32),
            (NumericKind::Signed, 64) => Some(Self::Int64),
            (NumericKind::Unsigned, 8) => Some(Self::UInt8),
            (NumericKind::Unsigned, 16) => Some(Self::UInt16),
            (NumericKind::Unsigned, 32) => Some(Self::UInt32),
            (NumericKind::Unsigned, 64) => Some(Self::UInt64),
            (NumericKind::Float, 32) => Some(Self::Float32),
            (NumericKind::Float, 64) => Some(Self::Float64),
            _ => None,
        }
    }

    /// Converts an Arrow `DataType` into a `NumericDtype`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self> {
        match arrow_type {
            ArrowDataType::Int8 => Ok(Self::Int8),
            ArrowDataType::Int16 => Ok(Self::Int16),
            ArrowDataType::Int32 => Ok(Self::Int32),
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            ArrowDataType::UInt32 => Ok(Self::UInt32),
            ArrowDataType::UInt64 => Ok(Self::UInt64),
            ArrowDataType::Float32 => Ok(Self::Float32),
            ArrowDataType::Float64 => Ok(Self::Float64),
            dt => Err(MaskArrayError::type_mismatch(
                "Arrow type has no numeric counterpart",
                dt,
                "numeric",
            )),
        }
    }

    /// Converts a `NumericDtype` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::Int8 => ArrowDataType::Int8,
            Self::Int16 => ArrowDataType::Int16,
            Self::Int32 => ArrowDataType::Int32,
            Self::Int64 => ArrowDataType::Int64,
            Self::UInt8 => ArrowDataType::UInt8,
            Self::UInt16 => ArrowDataType::UInt16,
            Self::UInt32 => ArrowDataType::UInt32,
            Self::UInt64 => ArrowDataType::UInt64,
            Self::Float32 => ArrowDataType::Float32,
            Self::Float64 => ArrowDataType::Float64,
        }
    }

    /// The common dtype of two operands under the native promotion table.
    ///
    /// * integers of the same signedness widen to the larger width;
    /// * signed with unsigned goes to the smallest signed type holding both,
    ///   or `Float64` when that would need more than 64 bits;
    /// * `Float32` absorbs integers up to 16 bits, anything wider gives `Float64`.
    pub fn promote(left: Self, right: Self) -> Self {
        use NumericKind::*;

        if left == right {
            return left;
        }
        let (lk, lw) = (left.kind(), left.bit_width());
        let (rk, rw) = (right.kind(), right.bit_width());
        match (lk, rk) {
            (Float, Float) => {
                if lw.max(rw) == 64 {
                    Self::Float64
                } else {
                    Self::Float32
                }
            }
            (Float, _) => Self::promote_float_int(lw, rw),
            (_, Float) => Self::promote_float_int(rw, lw),
            (Signed, Signed) | (Unsigned, Unsigned) => {
                Self::from_kind_and_width(lk, lw.max(rw)).unwrap_or(Self::Float64)
            }
            (Signed, Unsigned) => Self::promote_mixed_sign(lw, rw),
            (Unsigned, Signed) => Self::promote_mixed_sign(rw, lw),
        }
    }

    fn promote_float_int(float_bits: u32, int_bits: u32) -> Self {
        if float_bits == 32 && int_bits <= 16 {
            Self::Float32
        } else {
            Self::Float64
        }
    }

    fn promote_mixed_sign(signed_bits: u32, unsigned_bits: u32) -> Self {
        if signed_bits > unsigned_bits {
            return Self::from_kind_and_width(NumericKind::Signed, signed_bits)
                .unwrap_or(Self::Float64);
        }
        Self::from_kind_and_width(NumericKind::Signed, unsigned_bits * 2).unwrap_or(Self::Float64)
    }

    /// The smallest dtype able to hold the integer `value`, preferring
    /// unsigned types for non-negative values.
    pub fn min_for_i64(value: i64) -> Self {
        if value >= 0 {
            return Self::min_for_u64(value as u64);
        }
        if value >= i64::from(i8::MIN) {
            Self::Int8
        } else if value >= i64::from(i16::MIN) {
            Self::Int16
        } else if value >= i64::from(i32::MIN) {
            Self::Int32
        } else {
            Self::Int64
        }
    }

    pub fn min_for_u64(value: u64) -> Self {
        if value <= u64::from(u8::MAX) {
            Self::UInt8
        } else if value <= u64::from(u16::MAX) {
            Self::UInt16
        } else if value <= u64::from(u32::MAX) {
            Self::UInt32
        } else {
            Self::UInt64
        }
    }

    /// The smallest signed dtype holding `value`, or `None` past 64 bits.
    pub fn min_signed_for(value: i128) -> Option<Self> {
        [Self::Int8, Self::Int16, Self::Int32, Self::Int64]
            .into_iter()
            .find(|d| d.can_hold_i128(value))
    }

    /// Whether an integer value is representable without wrapping.
    pub fn can_hold_i128(&self, value: i128) -> bool {
        let (min, max): (i128, i128) = match self {
            Self::Int8 => (i8::MIN.into(), i8::MAX.into()),
            Self::Int16 => (i16::MIN.into(), i16::MAX.into()),
            Self::Int32 => (i32::MIN.into(), i32::MAX.into()),
            Self::Int64 => (i64::MIN.into(), i64::MAX.into()),
            Self::UInt8 => (0, u8::MAX.into()),
            Self::UInt16 => (0, u16::MAX.into()),
            Self::UInt32 => (0, u32::MAX.into()),
            Self::UInt64 => (0, u64::MAX.into()),
            // Floats can hold any integer up to rounding.
            Self::Float32 | Self::Float64 => return true,
        };
        (min..=max).contains(&value)
    }
}

/// Provides the canonical string representation for a `NumericDtype`.
impl fmt::Display for NumericDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
