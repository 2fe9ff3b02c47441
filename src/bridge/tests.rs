use super::*;
use arrow::array::{Float32Array, Int64Array, StringArray, UInt16Array};
use std::sync::Arc;

use crate::error::MaskArrayError;

fn int64_chunk(values: Vec<Option<i64>>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

#[test]
fn test_zero_chunks_yield_empty_array() {
    let arr = NumericArray::from_arrow_chunks(&[], NumericDtype::UInt16).unwrap();
    assert!(arr.is_empty());
    assert_eq!(arr.dtype(), NumericDtype::UInt16);
}

#[test]
fn test_single_chunk_is_returned_as_is() {
    let chunks = vec![int64_chunk(vec![Some(5), None])];
    let arr = NumericArray::from_arrow_chunks(&chunks, NumericDtype::Int64).unwrap();
    assert_eq!(arr.to_options::<i64>().unwrap(), vec![Some(5), None]);
}

#[test]
fn test_multiple_chunks_concatenate_in_order() {
    let chunks = vec![
        int64_chunk(vec![Some(1), Some(2)]),
        int64_chunk(vec![None, Some(4)]),
    ];
    let arr = NumericArray::from_arrow_chunks(&chunks, NumericDtype::Int64).unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(
        arr.to_options::<i64>().unwrap(),
        vec![Some(1), Some(2), None, Some(4)]
    );
}

#[test]
fn test_mixed_chunk_types_are_cast() {
    let chunks: Vec<ArrayRef> = vec![
        Arc::new(UInt16Array::from(vec![Some(1), None])),
        Arc::new(Float32Array::from(vec![Some(2.5)])),
    ];
    let arr = NumericArray::from_arrow_chunks(&chunks, NumericDtype::Float64).unwrap();
    assert_eq!(
        arr.to_options::<f64>().unwrap(),
        vec![Some(1.0), None, Some(2.5)]
    );
}

#[test]
fn test_any_bad_chunk_fails_the_whole_import() {
    let chunks: Vec<ArrayRef> = vec![
        int64_chunk(vec![Some(1)]),
        Arc::new(StringArray::from(vec!["x"])),
    ];
    let err = NumericArray::from_arrow_chunks(&chunks, NumericDtype::Int64).unwrap_err();
    assert!(matches!(err, MaskArrayError::TypeMismatch { .. }));
}

#[test]
fn test_arrow_roundtrip_preserves_values_and_mask() {
    let arr = NumericArray::from_options(&[Some(-1i64), None, Some(i64::MAX)]);
    let exported = arr.to_arrow().unwrap();
    assert_eq!(exported.null_count(), 1);
    let back = NumericArray::from_arrow(exported.as_ref(), NumericDtype::Int64).unwrap();
    assert_eq!(back, arr);
}
