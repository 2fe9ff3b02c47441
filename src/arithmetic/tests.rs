//==================================================================================
// Unit Tests for the arithmetic engine
//==================================================================================

use chrono::TimeDelta;
use ndarray::{arr1, arr2, Array1};

use super::*;
use crate::config::{ErrAction, FpErrorKind};
use crate::types::NA;

fn int64(values: &[Option<i64>]) -> NumericArray {
    NumericArray::from_options(values)
}

fn numeric(out: ArithOutput) -> NumericArray {
    out.into_numeric().unwrap()
}

#[test]
fn test_add_propagates_either_mask() {
    let a = int64(&[Some(1), None, Some(3), Some(4)]);
    let b = int64(&[Some(10), Some(20), None, Some(40)]);
    let out = numeric(a.add(&b).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Int64);
    assert_eq!(
        out.to_options::<i64>().unwrap(),
        vec![Some(11), None, None, Some(44)]
    );
}

#[test]
fn test_reversed_operators_swap_operands() {
    let a = int64(&[Some(2), Some(5)]);
    let sub = numeric(a.rsub(10i64).unwrap());
    assert_eq!(sub.to_options::<i64>().unwrap(), vec![Some(8), Some(5)]);
    let rpow = numeric(a.rpow(3i64).unwrap());
    assert_eq!(rpow.to_options::<i64>().unwrap(), vec![Some(9), Some(243)]);
    let rmod = numeric(a.rmod(7i64).unwrap());
    assert_eq!(rmod.to_options::<i64>().unwrap(), vec![Some(1), Some(2)]);
}

#[test]
fn test_missing_singleton_masks_everything() {
    let a = int64(&[Some(1), Some(2), None]);
    for op in ArithmeticOp::ALL {
        match a.binary_op(NA, op).unwrap() {
            OpResult::Single(out) => assert!(out.mask().all_set() || op == ArithmeticOp::Pow),
            OpResult::Pair(q, r) => {
                assert!(q.mask().all_set());
                assert!(r.mask().all_set());
            }
        }
    }
}

#[test]
fn test_missing_singleton_truediv_is_float() {
    let a = int64(&[Some(1), Some(2)]);
    let out = numeric(a.truediv(NA).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Float64);
    assert!(out.mask().all_set());

    let out = numeric(a.rtruediv(NA).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Float64);

    let out = numeric(a.mul(NA).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Int64);

    let floats = NumericArray::from_values(vec![1.0f32]);
    let out = numeric(floats.truediv(NA).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Float32);
}

#[test]
fn test_pow_identities_with_missing_operands() {
    let base = int64(&[Some(1), Some(2), None, Some(3)]);
    let exponent = int64(&[None, None, Some(0), Some(2)]);
    let out = numeric(base.pow(&exponent).unwrap());
    assert_eq!(
        out.to_options::<i64>().unwrap(),
        vec![Some(1), None, Some(1), Some(9)]
    );
}

#[test]
fn test_pow_with_missing_singleton_keeps_unit_base() {
    let base = int64(&[Some(1), Some(2)]);
    let out = numeric(base.pow(NA).unwrap());
    assert_eq!(out.to_options::<i64>().unwrap(), vec![Some(1), None]);
}

#[test]
fn test_rpow_identities() {
    let exponent = int64(&[Some(0), None, Some(2)]);
    let out = numeric(exponent.rpow(1i64).unwrap());
    assert_eq!(
        out.to_options::<i64>().unwrap(),
        vec![Some(1), Some(1), Some(1)]
    );

    let out = numeric(exponent.rpow(NA).unwrap());
    assert_eq!(out.to_options::<i64>().unwrap(), vec![Some(1), None, None]);
}

#[test]
fn test_pow_scalar_zero_exponent_unmasks_all() {
    let base = int64(&[None, Some(4)]);
    let out = numeric(base.pow(0i64).unwrap());
    assert_eq!(out.to_options::<i64>().unwrap(), vec![Some(1), Some(1)]);
}

#[test]
fn test_truediv_promotes_integers_to_float64() {
    let a = NumericArray::from_values(vec![1i8, 3]);
    let b = NumericArray::from_values(vec![2i8, 0]);
    let out = numeric(a.truediv(&b).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Float64);
    let values = out.values::<f64>().unwrap();
    assert_eq!(values[0], 0.5);
    assert!(values[1].is_infinite());
}

#[test]
fn test_integer_division_by_zero_is_suppressed() {
    let a = int64(&[Some(7), Some(7)]);
    let b = int64(&[Some(0), Some(2)]);
    let out = numeric(a.floordiv(&b).unwrap());
    assert_eq!(out.to_options::<i64>().unwrap(), vec![Some(0), Some(3)]);
    let out = numeric(a.modulo(&b).unwrap());
    assert_eq!(out.to_options::<i64>().unwrap(), vec![Some(0), Some(1)]);
}

#[test]
fn test_errstate_raise_only_sees_present_slots() {
    let a = int64(&[Some(1), Some(1)]);
    let b = int64(&[None, Some(1)]);
    let strict = ErrState::raise_all();
    assert!(a
        .binary_op_with(&b, ArithmeticOp::FloorDiv, &strict)
        .is_ok());

    let zero = int64(&[Some(1), Some(0)]);
    let err = a
        .binary_op_with(&zero, ArithmeticOp::FloorDiv, &strict)
        .unwrap_err();
    assert!(matches!(
        err,
        MaskArrayError::FloatingPoint {
            kind: FpErrorKind::Divide,
            index: 1,
            ..
        }
    ));
}

#[test]
fn test_errstate_from_config() {
    let config = MaskArrayConfig::from_json_str(r#"{"errstate": {"divide": "raise"}}"#).unwrap();
    assert_eq!(config.errstate.divide, ErrAction::Raise);
    let a = NumericArray::from_values(vec![1.0f64]);
    let err = a
        .binary_op_with_config(0.0f64, ArithmeticOp::TrueDiv, &config)
        .unwrap_err();
    assert!(matches!(err, MaskArrayError::FloatingPoint { .. }));
    // Overflow stays ignored.
    assert!(NumericArray::from_values(vec![f64::MAX])
        .binary_op_with_config(f64::MAX, ArithmeticOp::Mul, &config)
        .is_ok());
}

#[test]
fn test_negative_integer_power() {
    let a = int64(&[Some(2), None]);
    let err = a.pow(-1i64).unwrap_err();
    assert!(matches!(
        err,
        MaskArrayError::NegativeIntegerPower { index: 0, .. }
    ));

    let only_missing = int64(&[None, None]);
    assert!(only_missing.pow(-1i64).is_ok());

    let floats = NumericArray::from_values(vec![2.0f64]);
    let out = numeric(floats.pow(-1i64).unwrap());
    assert_eq!(out.values::<f64>().unwrap(), &[0.5]);
}

#[test]
fn test_divmod_matches_separate_operators() {
    let a = int64(&[Some(7), Some(-7), None, Some(9)]);
    let b = int64(&[Some(2), Some(2), Some(3), None]);
    let (q, r) = a.divmod(&b).unwrap();
    let q = numeric(q);
    let r = numeric(r);
    assert_eq!(q, numeric(a.floordiv(&b).unwrap()));
    assert_eq!(r, numeric(a.modulo(&b).unwrap()));
    assert_eq!(q.mask(), r.mask());
    assert_eq!(q.isna(), vec![false, false, true, true]);
    assert_eq!(q.to_options::<i64>().unwrap()[1], Some(-4));
    assert_eq!(r.to_options::<i64>().unwrap()[1], Some(1));
}

#[test]
fn test_rdivmod_matches_reversed_operators() {
    let a = int64(&[Some(2), Some(3)]);
    let (q, r) = a.rdivmod(7i64).unwrap();
    assert_eq!(numeric(q), numeric(a.rfloordiv(7i64).unwrap()));
    assert_eq!(numeric(r), numeric(a.rmod(7i64).unwrap()));
}

#[test]
fn test_native_operands() {
    let a = int64(&[Some(1), None, Some(3)]);
    let native: Array1<f64> = arr1(&[0.5, 0.5, 0.5]);
    let out = numeric(a.add(&native).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Float64);
    assert_eq!(
        out.to_options::<f64>().unwrap(),
        vec![Some(1.5), None, Some(3.5)]
    );

    let out = numeric(a.mul(vec![2i32, 2, 2]).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Int64);
}

#[test]
fn test_native_operand_validation() {
    let a = int64(&[Some(1), Some(2)]);

    let err = a.add(&arr2(&[[1i64, 2], [3, 4]])).unwrap_err();
    assert!(matches!(err, MaskArrayError::UnsupportedDimension { ndim: 2 }));

    let err = a.add(vec![1i64, 2, 3]).unwrap_err();
    assert!(matches!(err, MaskArrayError::LengthMismatch { left: 2, right: 3 }));

    let bools = NativeOperand::from_bool_ndarray(&arr1(&[true, false]));
    let err = a.add(bools).unwrap_err();
    assert!(matches!(err, MaskArrayError::TypeMismatch { .. }));
}

#[test]
fn test_scalar_validation() {
    let a = int64(&[Some(1)]);
    assert!(matches!(
        a.add("x").unwrap_err(),
        MaskArrayError::TypeMismatch { .. }
    ));
    assert!(matches!(
        a.add(true).unwrap_err(),
        MaskArrayError::TypeMismatch { .. }
    ));
}

#[test]
fn test_length_mismatch_for_every_operator() {
    let a = int64(&[Some(1), Some(2), Some(3)]);
    let b = int64(&[Some(1), Some(2), Some(3), Some(4)]);
    for op in ArithmeticOp::ALL {
        let err = a.binary_op(&b, op).unwrap_err();
        assert!(err.is_shape_error(), "{} did not report a shape error", op);
    }
}

#[test]
fn test_scalar_typing_by_value() {
    let small = NumericArray::from_values(vec![1i8, 2]);
    assert_eq!(numeric(small.add(1i64).unwrap()).dtype(), NumericDtype::Int8);
    assert_eq!(numeric(small.add(300i64).unwrap()).dtype(), NumericDtype::Int16);
    assert_eq!(numeric(small.add(0.5f64).unwrap()).dtype(), NumericDtype::Float64);

    let unsigned = NumericArray::from_values(vec![1u8]);
    assert_eq!(numeric(unsigned.add(-1i64).unwrap()).dtype(), NumericDtype::Int16);
    assert_eq!(numeric(unsigned.add(1000i64).unwrap()).dtype(), NumericDtype::UInt16);

    let floats = NumericArray::from_values(vec![1.0f32]);
    assert_eq!(numeric(floats.add(2.5f64).unwrap()).dtype(), NumericDtype::Float32);
}

#[test]
fn test_mixed_array_promotion() {
    let a = NumericArray::from_values(vec![200u8]);
    let b = NumericArray::from_values(vec![-1i8]);
    let out = numeric(a.add(&b).unwrap());
    assert_eq!(out.dtype(), NumericDtype::Int16);
    assert_eq!(out.values::<i16>().unwrap(), &[199]);
}

#[test]
fn test_duration_operand() {
    let a = int64(&[Some(2), None]);
    let out = a.mul(TimeDelta::seconds(5)).unwrap();
    let durations = out.as_duration().unwrap();
    assert_eq!(
        durations.to_options(),
        vec![Some(TimeDelta::seconds(10)), None]
    );
    assert!(matches!(
        a.sub(TimeDelta::seconds(1)).unwrap_err(),
        MaskArrayError::TypeMismatch { .. }
    ));
}

#[test]
fn test_results_never_alias_inputs() {
    let a = int64(&[Some(1), Some(2)]);
    let out = numeric(a.add(0i64).unwrap());
    assert_eq!(out, a);
    assert_ne!(out.values::<i64>().unwrap().as_ptr(), a.values::<i64>().unwrap().as_ptr());
}

#[test]
fn test_operator_names_parse() {
    assert_eq!("rtruediv".parse::<ArithmeticOp>().unwrap(), ArithmeticOp::RTrueDiv);
    assert_eq!("__divmod__".parse::<ArithmeticOp>().unwrap(), ArithmeticOp::DivMod);
    assert!("matmul".parse::<ArithmeticOp>().is_err());
    for op in ArithmeticOp::ALL {
        assert_eq!(op.name().parse::<ArithmeticOp>().unwrap(), op);
    }
}
