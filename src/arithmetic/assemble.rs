// In: src/arithmetic/assemble.rs

//! Result Assembly: turns raw elementwise output plus the combined mask into
//! the correctly typed result array.

use crate::arithmetic::duration::DurationArray;
use crate::array::{NumericArray, NumericBuffer};
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::types::NumericDtype;

/// The typed result of one arithmetic computation.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithOutput {
    Numeric(NumericArray),
    Duration(DurationArray),
}

impl ArithOutput {
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            ArithOutput::Numeric(arr) => Some(arr),
            ArithOutput::Duration(_) => None,
        }
    }

    pub fn as_duration(&self) -> Option<&DurationArray> {
        match self {
            ArithOutput::Duration(arr) => Some(arr),
            ArithOutput::Numeric(_) => None,
        }
    }

    /// # Errors
    /// Returns `TypeMismatch` for a duration result.
    pub fn into_numeric(self) -> Result<NumericArray> {
        match self {
            ArithOutput::Numeric(arr) => Ok(arr),
            ArithOutput::Duration(_) => Err(MaskArrayError::type_mismatch(
                "expected a numeric result",
                "numeric",
                "timedelta",
            )),
        }
    }

    pub fn mask(&self) -> &ValidityMask {
        match self {
            ArithOutput::Numeric(arr) => arr.mask(),
            ArithOutput::Duration(arr) => arr.mask(),
        }
    }

    pub fn len(&self) -> usize {
        self.mask().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the operands looked like, as far as the output dtype is concerned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResultKind {
    pub lhs_is_float: bool,
    pub other_is_float: bool,
    pub is_truediv: bool,
}

impl ResultKind {
    /// Float results are required for true division and whenever either
    /// operand is floating point.
    fn needs_float(&self) -> bool {
        self.is_truediv || self.lhs_is_float || self.other_is_float
    }
}

/// Wraps freshly computed `data` with `mask`, widening integer data to
/// `Float64` when the operation must produce a floating result.
pub(crate) fn assemble_numeric(
    data: NumericBuffer,
    mask: ValidityMask,
    kind: ResultKind,
) -> NumericArray {
    let data = if data.dtype().is_integer() && kind.needs_float() {
        data.cast(NumericDtype::Float64)
    } else {
        data
    };
    NumericArray::new(data, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INT_ONLY: ResultKind = ResultKind {
        lhs_is_float: false,
        other_is_float: false,
        is_truediv: false,
    };

    #[test]
    fn test_integer_results_stay_integer() {
        let out = assemble_numeric(
            NumericBuffer::Int16(vec![1, 2]),
            ValidityMask::all_present(2),
            INT_ONLY,
        );
        assert_eq!(out.dtype(), NumericDtype::Int16);
    }

    #[test]
    fn test_truediv_widens_to_float64() {
        let kind = ResultKind {
            is_truediv: true,
            ..INT_ONLY
        };
        let out = assemble_numeric(
            NumericBuffer::Int8(vec![1, 1]),
            ValidityMask::all_missing(2),
            kind,
        );
        assert_eq!(out.dtype(), NumericDtype::Float64);
        assert!(out.mask().all_set());
    }

    #[test]
    fn test_float_results_keep_their_width() {
        let kind = ResultKind {
            lhs_is_float: true,
            ..INT_ONLY
        };
        let out = assemble_numeric(
            NumericBuffer::Float32(vec![0.5]),
            ValidityMask::all_present(1),
            kind,
        );
        assert_eq!(out.dtype(), NumericDtype::Float32);
    }
}
