// In: src/bridge/arrow_impl.rs

use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::buffer::ScalarBuffer;
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::DataType;
use std::sync::Arc;

use crate::array::NumericArray;
use crate::cast::nansafe::check_float_to_int;
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::NumericDtype;
use crate::with_native_type;

/// DATA MARSHALLING (Arrow -> maskarray)
/// Builds one masked array from one Arrow chunk.
///
/// A chunk whose type differs from `dtype` is first cast with
/// `safe = false`, so values that do not fit are reported instead of being
/// silently turned into nulls. Only integer and floating Arrow types are
/// accepted for that cast. A floating chunk read as an integer dtype must
/// hold finite integral values in every valid slot.
///
/// The Arrow validity buffer (`true` = valid) is inverted into the mask
/// convention (`true` = missing).
pub(crate) fn chunk_to_numeric(chunk: &dyn Array, dtype: NumericDtype) -> Result<NumericArray> {
    let target = dtype.to_arrow_type();
    let converted: Option<ArrayRef> = if chunk.data_type() == &target {
        None
    } else {
        Some(reinterpret(chunk, &target, dtype)?)
    };
    let chunk: &dyn Array = match &converted {
        Some(array) => array.as_ref(),
        None => chunk,
    };

    with_native_type!(dtype, T => {
        let primitive = chunk.as_primitive_opt::<<T as NumericNative>::ArrowType>().ok_or_else(|| {
            MaskArrayError::InternalError(format!(
                "Arrow chunk of type {} is not a primitive array",
                chunk.data_type()
            ))
        })?;
        let values: Vec<T> = primitive.values().to_vec();
        let mask = ValidityMask::from_null_buffer(primitive.nulls(), primitive.len());
        NumericArray::try_new(T::into_buffer(values), mask)
    })
}

fn reinterpret(chunk: &dyn Array, target: &DataType, dtype: NumericDtype) -> Result<ArrayRef> {
    let source = chunk.data_type();
    if !(source.is_integer() || source.is_floating()) {
        return Err(MaskArrayError::type_mismatch(
            format!("Expected array of {} type, got {} instead", dtype, source),
            dtype,
            source,
        ));
    }
    if source.is_floating() && dtype.is_integer() {
        // Arrow truncates fractional floats even with `safe = false`.
        let wide = chunk_to_numeric(chunk, NumericDtype::Float64)?;
        check_float_to_int(&wide, &dtype.to_string())?;
    }
    log::debug!("casting Arrow chunk from {} to {}", source, target);
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(chunk, target, &options)?)
}

/// DATA MARSHALLING (maskarray -> Arrow)
/// Exports the values with the mask inverted into a validity `NullBuffer`.
/// No buffer is attached when nothing is missing.
pub(crate) fn numeric_to_arrow(array: &NumericArray) -> Result<ArrayRef> {
    with_native_type!(array.dtype(), T => {
        let values = ScalarBuffer::from(array.values::<T>()?.to_vec());
        let primitive = PrimitiveArray::<<T as NumericNative>::ArrowType>::try_new(
            values,
            array.mask().to_null_buffer(),
        )?;
        Ok(Arc::new(primitive) as ArrayRef)
    })
}
