//! Target dtypes for `NumericArray::astype`, and the descriptor parser that
//! resolves strings such as `"Int64"` or `"datetime64[ns]"` into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MaskArrayError;
use crate::types::NumericDtype;

/// A plain (non-nullable) dtype on the native side of a cast.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "dtype", rename_all = "snake_case")]
pub enum NativeDtype {
    Numeric(NumericDtype),
    Bool,
    /// Nanoseconds since the Unix epoch.
    DatetimeNs,
    /// Signed nanosecond durations.
    TimedeltaNs,
}

impl NativeDtype {
    pub fn is_float(&self) -> bool {
        matches!(self, NativeDtype::Numeric(d) if d.is_float())
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, NativeDtype::DatetimeNs)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NativeDtype::Numeric(d) => d.numpy_name(),
            NativeDtype::Bool => "bool",
            NativeDtype::DatetimeNs => "datetime64[ns]",
            NativeDtype::TimedeltaNs => "timedelta64[ns]",
        }
    }
}

impl fmt::Display for NativeDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where an `astype` call should land.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "family", content = "dtype", rename_all = "snake_case")]
pub enum CastTarget {
    /// Another nullable numeric dtype; the mask is carried over.
    Masked(NumericDtype),
    /// A plain buffer; missing slots need a fill value.
    Native(NativeDtype),
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastTarget::Masked(d) => write!(f, "{}", d),
            CastTarget::Native(d) => write!(f, "{}", d),
        }
    }
}

impl From<NumericDtype> for CastTarget {
    fn from(dtype: NumericDtype) -> Self {
        CastTarget::Masked(dtype)
    }
}

impl From<NativeDtype> for CastTarget {
    fn from(dtype: NativeDtype) -> Self {
        CastTarget::Native(dtype)
    }
}

/// Capitalised names resolve to the nullable family, lower-case names to the
/// native one.
impl FromStr for CastTarget {
    type Err = MaskArrayError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let trimmed = descriptor.trim();
        if let Some(dtype) = NumericDtype::ALL.iter().find(|d| d.name() == trimmed) {
            return Ok(CastTarget::Masked(*dtype));
        }
        if let Some(dtype) = NumericDtype::ALL.iter().find(|d| d.numpy_name() == trimmed) {
            return Ok(CastTarget::Native(NativeDtype::Numeric(*dtype)));
        }
        let native = match trimmed {
            "int" => NativeDtype::Numeric(NumericDtype::Int64),
            "float" | "double" => NativeDtype::Numeric(NumericDtype::Float64),
            "bool" => NativeDtype::Bool,
            "datetime64[ns]" | "M8[ns]" => NativeDtype::DatetimeNs,
            "timedelta64[ns]" | "m8[ns]" => NativeDtype::TimedeltaNs,
            _ => {
                return Err(MaskArrayError::InvalidArgument(format!(
                    "data type '{}' not understood",
                    descriptor
                )))
            }
        };
        Ok(CastTarget::Native(native))
    }
}
