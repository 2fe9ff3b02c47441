// In: src/arithmetic/mask.rs

//! Result-mask computation: base combination, then the power identities.

use crate::arithmetic::operand::Resolved;
use crate::arithmetic::ArithmeticOp;
use crate::array::{NumericArray, NumericBuffer};
use crate::null_handling::ValidityMask;
use crate::types::Scalar;

/// The base result mask.
///
/// Without an operand mask the result starts as a copy of `lhs`'s mask and
/// is forced all-missing for the missing-value singleton. With one, it is the
/// elementwise OR of both masks.
pub(crate) fn combine_masks(lhs: &NumericArray, other: &Resolved<'_>) -> ValidityMask {
    match other.mask() {
        Some(omask) => lhs.mask().or(omask),
        None => {
            let mut mask = lhs.mask().clone();
            if other.is_missing_singleton() {
                mask.fill_missing();
            }
            mask
        }
    }
}

/// Clears result slots whose value is fixed by `1 ** x == 1` or `x ** 0 == 1`.
///
/// Both rules are checked independently for `pow` and `rpow`; every other
/// operator leaves the mask unchanged.
pub(crate) fn apply_identity_overrides(
    op: ArithmeticOp,
    mask: &mut ValidityMask,
    lhs: &NumericArray,
    other: &Resolved<'_>,
) {
    match op {
        ArithmeticOp::Pow => {
            // 1 ** x is 1.
            clear_where_lhs(mask, lhs, |data, i| data.is_one_at(i));
            // x ** 0 is 1.
            clear_where_other(mask, other, OperandValue::Zero);
        }
        ArithmeticOp::RPow => {
            // 1 ** x is 1.
            clear_where_other(mask, other, OperandValue::One);
            // x ** 0 is 1.
            clear_where_lhs(mask, lhs, |data, i| data.is_zero_at(i));
        }
        _ => {}
    }
}

#[derive(Clone, Copy)]
enum OperandValue {
    Zero,
    One,
}

fn clear_where_lhs(
    mask: &mut ValidityMask,
    lhs: &NumericArray,
    matches: impl Fn(&NumericBuffer, usize) -> bool,
) {
    let data = lhs.data();
    let lhs_mask = lhs.mask();
    mask.clear_where(|i| !lhs_mask.is_missing(i) && matches(data, i));
}

fn clear_where_other(mask: &mut ValidityMask, other: &Resolved<'_>, value: OperandValue) {
    match other {
        Resolved::Array { data, mask: omask } => {
            let hit = |i: usize| match value {
                OperandValue::Zero => data.is_zero_at(i),
                OperandValue::One => data.is_one_at(i),
            };
            match omask {
                Some(omask) => mask.clear_where(|i| !omask.is_missing(i) && hit(i)),
                None => mask.clear_where(hit),
            }
        }
        Resolved::Scalar(scalar) => {
            if scalar_equals(scalar, value) {
                mask.clear_where(|_| true);
            }
        }
        Resolved::Duration(_) | Resolved::Missing => {}
    }
}

fn scalar_equals(scalar: &Scalar, value: OperandValue) -> bool {
    let target = match value {
        OperandValue::Zero => 0.0,
        OperandValue::One => 1.0,
    };
    match scalar {
        Scalar::Int64(v) => *v as f64 == target,
        Scalar::UInt64(v) => *v as f64 == target,
        Scalar::Float64(v) => *v == target,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(values: &[Option<i64>]) -> NumericArray {
        NumericArray::from_options(values)
    }

    #[test]
    fn test_combine_with_masked_operand_is_or() {
        let a = arr(&[Some(1), None, Some(3)]);
        let b = arr(&[None, Some(2), Some(3)]);
        let resolved = Resolved::Array {
            data: b.data(),
            mask: Some(b.mask()),
        };
        assert_eq!(combine_masks(&a, &resolved).to_vec(), vec![true, true, false]);
    }

    #[test]
    fn test_combine_with_missing_singleton_is_all_missing() {
        let a = arr(&[Some(1), Some(2)]);
        assert!(combine_masks(&a, &Resolved::Missing).all_set());
    }

    #[test]
    fn test_pow_overrides() {
        let base = arr(&[Some(1), None, Some(2), Some(5)]);
        let exponent = arr(&[None, Some(0), None, Some(2)]);
        let resolved = Resolved::Array {
            data: exponent.data(),
            mask: Some(exponent.mask()),
        };
        let mut mask = combine_masks(&base, &resolved);
        apply_identity_overrides(ArithmeticOp::Pow, &mut mask, &base, &resolved);
        assert_eq!(mask.to_vec(), vec![false, false, true, false]);
    }

    #[test]
    fn test_rpow_overrides() {
        // rpow computes other ** self.
        let exponent = arr(&[Some(0), None, Some(3)]);
        let scalar = Scalar::Int64(1);
        let resolved = Resolved::Scalar(&scalar);
        let mut mask = combine_masks(&exponent, &resolved);
        apply_identity_overrides(ArithmeticOp::RPow, &mut mask, &exponent, &resolved);
        assert!(!mask.any_missing());
    }

    #[test]
    fn test_pow_with_missing_singleton_keeps_unit_base() {
        let base = arr(&[Some(1), Some(2), None]);
        let mut mask = combine_masks(&base, &Resolved::Missing);
        apply_identity_overrides(ArithmeticOp::Pow, &mut mask, &base, &Resolved::Missing);
        assert_eq!(mask.to_vec(), vec![false, true, true]);
    }

    #[test]
    fn test_other_operators_are_untouched() {
        let base = arr(&[Some(1), None]);
        let mut mask = combine_masks(&base, &Resolved::Missing);
        apply_identity_overrides(ArithmeticOp::Mul, &mut mask, &base, &Resolved::Missing);
        assert!(mask.all_set());
    }
}
