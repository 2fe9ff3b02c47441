//==================================================================================
// Unit Tests for the cast engine
//==================================================================================

use super::*;
use crate::config::MaskArrayConfig;

fn target(descriptor: &str) -> CastTarget {
    descriptor.parse().unwrap()
}

#[test]
fn test_missing_to_float_reads_nan() {
    let arr = NumericArray::from_options(&[Some(1i64), None, Some(3)]);
    let out = arr.astype(target("float64"), false).unwrap();
    let native = out.as_native().unwrap();
    let view = native.view::<f64>().unwrap();
    assert_eq!(view[0], 1.0);
    assert!(view[1].is_nan());
    assert_eq!(view[2], 3.0);
}

#[test]
fn test_missing_to_integer_is_unsafe() {
    let arr = NumericArray::from_options(&[Some(1i32), None]);
    for descriptor in ["int64", "uint8", "bool", "timedelta64[ns]"] {
        let err = arr.astype(target(descriptor), true).unwrap_err();
        assert!(
            matches!(err, MaskArrayError::UnsafeCast { .. }),
            "{descriptor}: {err}"
        );
    }
}

#[test]
fn test_missing_to_datetime_is_nat() {
    let arr = NumericArray::from_options(&[Some(1_000i64), None]);
    let out = arr.astype(target("datetime64[ns]"), true).unwrap();
    let nanos = out.as_native().unwrap().as_nanos().unwrap();
    assert_eq!(nanos.to_vec(), vec![1_000, NAT]);
}

#[test]
fn test_no_missing_casts_to_any_native_target() {
    let arr = NumericArray::from_values(vec![0u8, 2, 255]);
    let out = arr.astype(target("int16"), true).unwrap();
    assert_eq!(
        out.as_native().unwrap().view::<i16>().unwrap().to_vec(),
        vec![0, 2, 255]
    );
    let flags = arr.astype(target("bool"), true).unwrap();
    assert_eq!(
        flags.as_native().unwrap().as_bool().unwrap().to_vec(),
        vec![false, true, true]
    );
}

#[test]
fn test_copy_false_borrows_matching_native_buffer() {
    let arr = NumericArray::from_values(vec![1.5f64, 2.5]);
    let borrowed = arr.astype(target("float64"), false).unwrap();
    assert!(borrowed.is_borrowed());
    let owned = arr.astype(target("float64"), true).unwrap();
    assert!(!owned.is_borrowed());
    assert_eq!(borrowed, owned);
}

#[test]
fn test_copy_false_with_missing_still_materializes() {
    let arr = NumericArray::from_options(&[Some(1.5f64), None]);
    let out = arr.astype(target("float64"), false).unwrap();
    assert!(!out.is_borrowed());
}

#[test]
fn test_float_source_with_infinity_to_integer_fails() {
    let arr = NumericArray::from_values(vec![1.0f64, f64::INFINITY]);
    let err = arr.astype(target("int64"), true).unwrap_err();
    assert!(err.to_string().contains("non-finite"));
}

#[test]
fn test_float_source_truncates_to_integer() {
    let arr = NumericArray::from_values(vec![1.9f64, -2.7]);
    let out = arr.astype(target("int32"), true).unwrap();
    assert_eq!(
        out.as_native().unwrap().view::<i32>().unwrap().to_vec(),
        vec![1, -2]
    );
}

#[test]
fn test_masked_to_masked_keeps_mask() {
    let arr = NumericArray::from_options(&[Some(1i8), None, Some(-3)]);
    let out = arr.astype(target("Float32"), true).unwrap();
    let masked = out.as_masked().unwrap();
    assert_eq!(masked.dtype(), NumericDtype::Float32);
    assert_eq!(
        masked.to_options::<f32>().unwrap(),
        vec![Some(1.0), None, Some(-3.0)]
    );
}

#[test]
fn test_masked_same_dtype_borrow_and_copy() {
    let arr = NumericArray::from_options(&[Some(7u16), None]);
    let view = arr.astype(CastTarget::Masked(NumericDtype::UInt16), false).unwrap();
    assert!(view.is_borrowed());
    let copied = arr.astype(CastTarget::Masked(NumericDtype::UInt16), true).unwrap();
    assert!(!copied.is_borrowed());
    assert_eq!(copied.as_masked().unwrap(), &arr);
}

#[test]
fn test_masked_float_to_int_requires_integral_values() {
    let ok = NumericArray::from_options(&[Some(2.0f64), None]);
    let out = ok.astype(target("Int64"), true).unwrap();
    assert_eq!(
        out.as_masked().unwrap().to_options::<i64>().unwrap(),
        vec![Some(2), None]
    );

    let fractional = NumericArray::from_values(vec![2.5f64]);
    assert!(matches!(
        fractional.astype(target("Int64"), true),
        Err(MaskArrayError::UnsafeCast { .. })
    ));

    let nan = NumericArray::from_values(vec![f64::NAN]);
    assert!(nan.astype(target("Int8"), true).is_err());
}

#[test]
fn test_missing_nan_data_does_not_block_masked_cast() {
    let data = NumericBuffer::Float64(vec![1.0, f64::NAN]);
    let arr = NumericArray::new(data, ValidityMask::from_bools(&[false, true]));
    let out = arr.astype(target("Int32"), true).unwrap();
    let masked = out.as_masked().unwrap();
    assert_eq!(masked.to_options::<i32>().unwrap(), vec![Some(1), None]);
    assert_eq!(masked.values::<i32>().unwrap(), &[1, 0]);
}

#[test]
fn test_to_native_with_explicit_fill() {
    let arr = NumericArray::from_options(&[Some(4i64), None]);
    let native = arr
        .to_native(
            NativeDtype::Numeric(NumericDtype::Int64),
            Some(FillValue::Int(-1)),
            true,
        )
        .unwrap();
    assert_eq!(native.view::<i64>().unwrap().to_vec(), vec![4, -1]);
}

#[test]
fn test_to_native_without_fill_reports_target() {
    let arr = NumericArray::from_options(&[None::<u32>]);
    let err = arr
        .to_native(NativeDtype::Numeric(NumericDtype::UInt32), None, true)
        .unwrap_err();
    assert!(err.to_string().contains("'uint32'-dtype"));
}

#[test]
fn test_fill_value_by_target_family() {
    assert!(matches!(
        FillValue::for_target(NativeDtype::Numeric(NumericDtype::Float32)),
        Some(FillValue::Float(v)) if v.is_nan()
    ));
    assert_eq!(FillValue::for_target(NativeDtype::DatetimeNs), Some(FillValue::NaT));
    assert_eq!(FillValue::for_target(NativeDtype::TimedeltaNs), None);
    assert_eq!(FillValue::for_target(NativeDtype::Bool), None);
}

#[test]
fn test_astype_with_config_uses_copy_default() {
    let arr = NumericArray::from_values(vec![1i32, 2]);
    let config = MaskArrayConfig::from_json_str(r#"{"cast": {"copy": false}}"#).unwrap();
    let out = arr.astype_with_config(target("int32"), &config).unwrap();
    assert!(out.is_borrowed());
    let out = arr
        .astype_with_config(target("int32"), &MaskArrayConfig::default())
        .unwrap();
    assert!(!out.is_borrowed());
}

#[test]
fn test_native_roundtrip_reproduces_data() {
    let arr = NumericArray::from_values(vec![-5i16, 0, 300]);
    let out = arr.astype(target("int16"), false).unwrap();
    let back = NumericArray::from_native(out.as_native().unwrap()).unwrap();
    assert_eq!(back, arr);
}

#[test]
fn test_from_native_reads_nan_as_missing() {
    let arr = NumericArray::from_options(&[Some(1.0f32), None]);
    let out = arr.astype(target("float32"), true).unwrap();
    let back = NumericArray::from_native(out.as_native().unwrap()).unwrap();
    assert_eq!(back, arr);

    let source = NumericArray::from_values(vec![1u8]);
    let flags = source.astype(target("bool"), true).unwrap();
    assert!(NumericArray::from_native(flags.as_native().unwrap()).is_err());
}
