// In: src/arithmetic/duration.rs

//! Operators between a numeric array and a duration scalar.
//!
//! Durations are signed nanosecond counts. `NAT` (`i64::MIN`) is the
//! not-a-time sentinel: it is stored at every missing slot of a
//! `DurationArray`, and any slot whose result overflows or divides by zero
//! becomes missing.

use chrono::TimeDelta;
use num_traits::AsPrimitive;

use crate::arithmetic::ArithmeticOp;
use crate::array::{dispatch_buffer, NumericArray};
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;

/// The not-a-time sentinel shared by duration and datetime buffers.
pub const NAT: i64 = i64::MIN;

/// A nullable array of nanosecond durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationArray {
    nanos: Vec<i64>,
    mask: ValidityMask,
}

impl DurationArray {
    /// Builds the array, storing `NAT` at every missing slot.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn new(mut nanos: Vec<i64>, mask: ValidityMask) -> Self {
        assert_eq!(
            nanos.len(),
            mask.len(),
            "data and mask must have the same length"
        );
        for (value, missing) in nanos.iter_mut().zip(mask.iter()) {
            if missing {
                *value = NAT;
            }
        }
        Self { nanos, mask }
    }

    pub fn from_options(values: &[Option<TimeDelta>]) -> Self {
        let nanos = values
            .iter()
            .map(|v| v.and_then(|d| d.num_nanoseconds()).unwrap_or(NAT))
            .collect::<Vec<_>>();
        let mask = nanos.iter().map(|&n| n == NAT).collect();
        Self::new(nanos, mask)
    }

    pub fn len(&self) -> usize {
        self.nanos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nanos.is_empty()
    }

    pub fn mask(&self) -> &ValidityMask {
        &self.mask
    }

    /// Raw nanosecond values, `NAT` at missing slots.
    pub fn nanos(&self) -> &[i64] {
        &self.nanos
    }

    pub fn get(&self, idx: usize) -> Option<TimeDelta> {
        if idx >= self.len() || self.mask.is_missing(idx) {
            return None;
        }
        Some(TimeDelta::nanoseconds(self.nanos[idx]))
    }

    pub fn to_options(&self) -> Vec<Option<TimeDelta>> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// Applies `op` between `lhs` and a duration.
///
/// # Errors
/// Returns `TypeMismatch` for operators undefined between numbers and
/// durations, and for `rfloordiv` with a floating-point array.
pub(crate) fn duration_op(
    lhs: &NumericArray,
    delta: TimeDelta,
    op: ArithmeticOp,
) -> Result<DurationArray> {
    let nanos = delta.num_nanoseconds().ok_or_else(|| {
        MaskArrayError::InvalidArgument(format!(
            "duration {} does not fit in 64-bit nanoseconds",
            delta
        ))
    })?;
    let is_float = lhs.dtype().is_float();

    let compute: fn(f64, i128, i64, bool) -> Option<i64> = match op {
        ArithmeticOp::Mul | ArithmeticOp::RMul => scale,
        ArithmeticOp::RTrueDiv => divide,
        ArithmeticOp::RFloorDiv if !is_float => floor_divide,
        _ => {
            return Err(MaskArrayError::type_mismatch(
                format!("unsupported operand for '{}' with a duration", op.name()),
                lhs.dtype(),
                "timedelta",
            ))
        }
    };

    let values: Vec<(f64, i128)> = dispatch_buffer!(lhs.data(), v => v
        .iter()
        .map(|&x| (AsPrimitive::<f64>::as_(x), AsPrimitive::<i128>::as_(x)))
        .collect());

    let mut mask = lhs.mask().clone();
    let mut out = Vec::with_capacity(values.len());
    for (idx, (as_float, as_int)) in values.into_iter().enumerate() {
        if mask.is_missing(idx) {
            out.push(NAT);
            continue;
        }
        match compute(as_float, as_int, nanos, is_float) {
            Some(n) if n != NAT => out.push(n),
            _ => {
                mask.set(idx, true);
                out.push(NAT);
            }
        }
    }
    log::trace!(
        "duration op '{}' produced {} missing slots",
        op.name(),
        mask.count_missing()
    );
    Ok(DurationArray::new(out, mask))
}

fn from_f64_nanos(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn scale(x: f64, xi: i128, nanos: i64, is_float: bool) -> Option<i64> {
    if is_float {
        from_f64_nanos(nanos as f64 * x)
    } else {
        i64::try_from(xi.checked_mul(i128::from(nanos))?).ok()
    }
}

fn divide(x: f64, xi: i128, nanos: i64, is_float: bool) -> Option<i64> {
    if is_float {
        if x == 0.0 {
            return None;
        }
        from_f64_nanos(nanos as f64 / x)
    } else {
        if xi == 0 {
            return None;
        }
        i64::try_from(i128::from(nanos) / xi).ok()
    }
}

fn floor_divide(_x: f64, xi: i128, nanos: i64, _is_float: bool) -> Option<i64> {
    if xi == 0 {
        return None;
    }
    let n = i128::from(nanos);
    let q = n / xi;
    let q = if (n % xi != 0) && ((n < 0) != (xi < 0)) {
        q - 1
    } else {
        q
    };
    i64::try_from(q).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_integers_by_duration() {
        let arr = NumericArray::from_options(&[Some(2i32), None, Some(-1)]);
        let out = duration_op(&arr, TimeDelta::seconds(3), ArithmeticOp::Mul).unwrap();
        assert_eq!(
            out.to_options(),
            vec![Some(TimeDelta::seconds(6)), None, Some(TimeDelta::seconds(-3))]
        );
        assert_eq!(out.nanos()[1], NAT);
    }

    #[test]
    fn test_duration_divided_by_array() {
        let arr = NumericArray::from_values(vec![2.0f64, 0.0]);
        let out = duration_op(&arr, TimeDelta::nanoseconds(7), ArithmeticOp::RTrueDiv).unwrap();
        assert_eq!(out.get(0), Some(TimeDelta::nanoseconds(3)));
        assert_eq!(out.get(1), None);
    }

    #[test]
    fn test_duration_floor_divided_by_integers() {
        let arr = NumericArray::from_values(vec![2i64, -2, 0]);
        let out =
            duration_op(&arr, TimeDelta::nanoseconds(7), ArithmeticOp::RFloorDiv).unwrap();
        assert_eq!(
            out.to_options(),
            vec![
                Some(TimeDelta::nanoseconds(3)),
                Some(TimeDelta::nanoseconds(-4)),
                None
            ]
        );
    }

    #[test]
    fn test_overflow_becomes_missing() {
        let arr = NumericArray::from_values(vec![i64::MAX]);
        let out = duration_op(&arr, TimeDelta::seconds(1), ArithmeticOp::RMul).unwrap();
        assert_eq!(out.get(0), None);
        assert!(out.mask().is_missing(0));
    }

    #[test]
    fn test_unsupported_duration_operators() {
        let arr = NumericArray::from_values(vec![1.5f32]);
        for op in [ArithmeticOp::Add, ArithmeticOp::TrueDiv, ArithmeticOp::RFloorDiv] {
            let err = duration_op(&arr, TimeDelta::seconds(1), op).unwrap_err();
            assert!(matches!(err, MaskArrayError::TypeMismatch { .. }));
        }
    }
}
