//! Scalar values and the missing-value singleton.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The missing-value singleton: "no value, unknown".
///
/// `Na` is a zero-sized marker with exactly one value, [`NA`]. It is distinct
/// from every number, including NaN.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Na;

/// The process-wide missing-value singleton.
pub const NA: Na = Na;

impl fmt::Display for Na {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<NA>")
    }
}

/// A single element read out of, or fed into, a `NumericArray`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Bool(bool),
    Utf8(String),
}

impl Scalar {
    /// Name of the scalar's type, used in type-mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int64(_) => "int",
            Scalar::UInt64(_) => "uint",
            Scalar::Float64(_) => "float",
            Scalar::Bool(_) => "bool",
            Scalar::Utf8(_) => "str",
        }
    }

    /// `true` for integer and float scalars; booleans are not numbers here.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int64(_) | Scalar::UInt64(_) | Scalar::Float64(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::UInt64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::UInt64(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Utf8(v) => write!(f, "{:?}", v),
        }
    }
}

macro_rules! impl_scalar_from {
    ($variant:ident, $wide:ty, $($t:ty),+) => {
        $(
            impl From<$t> for Scalar {
                fn from(value: $t) -> Self {
                    Scalar::$variant(<$wide>::from(value))
                }
            }
        )+
    };
}

impl_scalar_from!(Int64, i64, i8, i16, i32, i64);
impl_scalar_from!(UInt64, u64, u8, u16, u32, u64);
impl_scalar_from!(Float64, f64, f32, f64);

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Utf8(value.to_string())
    }
}
