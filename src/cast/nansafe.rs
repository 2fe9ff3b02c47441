// In: src/cast/nansafe.rs

//! Guards for float sources whose present values cannot survive the cast.

use crate::array::NumericArray;
use crate::error::{MaskArrayError, Result};
use crate::types::NativeDtype;

/// Float to native: integer and timedelta targets reject present NaN or
/// infinite values.
pub(super) fn check_float_source(arr: &NumericArray, target: NativeDtype) -> Result<()> {
    let needs_finite = match target {
        NativeDtype::Numeric(dtype) => dtype.is_integer(),
        NativeDtype::TimedeltaNs => true,
        NativeDtype::Bool | NativeDtype::DatetimeNs => false,
    };
    if !needs_finite {
        return Ok(());
    }
    let values = arr.data().to_f64_vec();
    let mask = arr.mask();
    if let Some(idx) = (0..values.len()).find(|&i| !mask.is_missing(i) && !values[i].is_finite()) {
        log::debug!("non-finite value {} at position {} blocks cast", values[idx], idx);
        return Err(MaskArrayError::UnsafeCast {
            from: arr.dtype().to_string(),
            to: target.to_string(),
            reason: "Cannot convert non-finite values (NA or inf) to integer".to_string(),
        });
    }
    Ok(())
}

/// Float to masked integer: every present value must be finite and have no
/// fractional part.
pub(crate) fn check_float_to_int(arr: &NumericArray, target: &str) -> Result<()> {
    let values = arr.data().to_f64_vec();
    let mask = arr.mask();
    for (idx, value) in values.iter().enumerate() {
        if mask.is_missing(idx) {
            continue;
        }
        if !value.is_finite() {
            return Err(MaskArrayError::UnsafeCast {
                from: arr.dtype().to_string(),
                to: target.to_string(),
                reason: "Cannot convert non-finite values (NA or inf) to integer".to_string(),
            });
        }
        if value.fract() != 0.0 {
            return Err(MaskArrayError::UnsafeCast {
                from: arr.dtype().to_string(),
                to: target.to_string(),
                reason: format!("cannot safely cast non-equivalent {} to {}", value, target),
            });
        }
    }
    Ok(())
}
