// In: src/array/construct.rs

//! Sequence constructors: coercing scalars and parsing text into a
//! `NumericArray` of a requested dtype.

use num_traits::{AsPrimitive, NumCast, Zero};

use crate::array::NumericArray;
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::{NumericDtype, Scalar};
use crate::with_native_type;

/// Tokens read as a missing value by `from_strings`.
const MISSING_TOKENS: [&str; 5] = ["", "NA", "<NA>", "NaN", "nan"];

impl NumericArray {
    /// Builds an array of `dtype` from a sequence of scalars.
    ///
    /// A float NaN marks a missing slot. Integers must fit `dtype`, and floats
    /// bound for an integer dtype must be whole numbers.
    ///
    /// # Errors
    /// * `UnsafeCast` for a value that cannot be represented exactly.
    /// * `TypeMismatch` for boolean or string scalars.
    pub fn from_scalars(scalars: &[Scalar], dtype: NumericDtype) -> Result<Self> {
        with_native_type!(dtype, T => {
            let mut data: Vec<T> = Vec::with_capacity(scalars.len());
            let mut mask = ValidityMask::all_present(scalars.len());
            for (idx, scalar) in scalars.iter().enumerate() {
                match coerce_scalar::<T>(scalar, dtype)? {
                    Some(value) => data.push(value),
                    None => {
                        data.push(T::zero());
                        mask.set(idx, true);
                    }
                }
            }
            Ok(Self::new(T::into_buffer(data), mask))
        })
    }

    /// Parses textual values, then builds the array like `from_scalars`.
    ///
    /// Each token is read as an integer if possible, else as a float. `None`
    /// and the tokens `""`, `"NA"`, `"<NA>"`, `"NaN"` and `"nan"` are missing.
    ///
    /// # Errors
    /// * `Parse` for a token that is neither an integer nor a float.
    /// * Any error of `from_scalars`.
    pub fn from_strings(strings: &[Option<&str>], dtype: NumericDtype) -> Result<Self> {
        let scalars = strings
            .iter()
            .enumerate()
            .map(|(index, token)| parse_token(index, *token))
            .collect::<Result<Vec<_>>>()?;
        log::trace!("parsed {} tokens for a {} array", scalars.len(), dtype);
        Self::from_scalars(&scalars, dtype)
    }
}

/// `Ok(None)` means the scalar denotes a missing value.
fn coerce_scalar<T>(scalar: &Scalar, dtype: NumericDtype) -> Result<Option<T>>
where
    T: NumericNative,
    f64: AsPrimitive<T>,
{
    let unsafe_cast = |from: &str, value: &dyn std::fmt::Display| MaskArrayError::UnsafeCast {
        from: from.to_string(),
        to: dtype.to_string(),
        reason: format!("cannot safely cast non-equivalent value {}", value),
    };

    match scalar {
        Scalar::Int64(v) => <T as NumCast>::from(*v)
            .map(Some)
            .ok_or_else(|| unsafe_cast("int64", v)),
        Scalar::UInt64(v) => <T as NumCast>::from(*v)
            .map(Some)
            .ok_or_else(|| unsafe_cast("uint64", v)),
        Scalar::Float64(v) if v.is_nan() => Ok(None),
        Scalar::Float64(v) if dtype.is_float() => Ok(Some((*v).as_())),
        Scalar::Float64(v) => match <T as NumCast>::from(*v) {
            Some(cast) if AsPrimitive::<f64>::as_(cast) == *v => Ok(Some(cast)),
            _ => Err(unsafe_cast("float64", v)),
        },
        other => Err(MaskArrayError::type_mismatch(
            "cannot build a numeric array from non-numeric values",
            dtype,
            other.type_name(),
        )),
    }
}

fn parse_token(index: usize, token: Option<&str>) -> Result<Scalar> {
    let token = match token.map(str::trim) {
        None => return Ok(Scalar::Float64(f64::NAN)),
        Some(t) if MISSING_TOKENS.contains(&t) => return Ok(Scalar::Float64(f64::NAN)),
        Some(t) => t,
    };
    if let Ok(v) = token.parse::<i64>() {
        return Ok(Scalar::Int64(v));
    }
    if let Ok(v) = token.parse::<u64>() {
        return Ok(Scalar::UInt64(v));
    }
    token
        .parse::<f64>()
        .map(Scalar::Float64)
        .map_err(|_| MaskArrayError::Parse {
            index,
            value: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scalars_nan_is_missing() {
        let arr = NumericArray::from_scalars(
            &[Scalar::Int64(1), Scalar::Float64(f64::NAN), Scalar::Float64(3.0)],
            NumericDtype::Int32,
        )
        .unwrap();
        assert_eq!(arr.to_options::<i32>().unwrap(), vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_from_scalars_floats_into_float_dtypes() {
        let scalars = [Scalar::Float64(0.25), Scalar::Int64(-2), Scalar::Float64(f64::NAN)];
        let narrow = NumericArray::from_scalars(&scalars, NumericDtype::Float32).unwrap();
        assert_eq!(
            narrow.to_options::<f32>().unwrap(),
            vec![Some(0.25), Some(-2.0), None]
        );
        let wide = NumericArray::from_scalars(&scalars, NumericDtype::Float64).unwrap();
        assert_eq!(wide.values::<f64>().unwrap()[0], 0.25);
    }

    #[test]
    fn test_from_scalars_rejects_fractional_floats_for_integers() {
        let err = NumericArray::from_scalars(&[Scalar::Float64(1.5)], NumericDtype::Int64)
            .unwrap_err();
        assert!(matches!(err, MaskArrayError::UnsafeCast { .. }));
    }

    #[test]
    fn test_from_scalars_rejects_out_of_range_integers() {
        let err =
            NumericArray::from_scalars(&[Scalar::Int64(300)], NumericDtype::UInt8).unwrap_err();
        assert!(matches!(err, MaskArrayError::UnsafeCast { .. }));
        assert!(NumericArray::from_scalars(&[Scalar::Int64(-1)], NumericDtype::UInt64).is_err());
    }

    #[test]
    fn test_from_scalars_rejects_non_numeric() {
        let err = NumericArray::from_scalars(&[Scalar::Bool(true)], NumericDtype::Int64)
            .unwrap_err();
        assert!(matches!(err, MaskArrayError::TypeMismatch { .. }));
        assert!(NumericArray::from_scalars(&[Scalar::from("1")], NumericDtype::Float64).is_err());
    }

    #[test]
    fn test_from_strings_parses_and_masks() {
        let arr = NumericArray::from_strings(
            &[Some("1"), Some("NA"), None, Some(" 2.5 "), Some("nan")],
            NumericDtype::Float64,
        )
        .unwrap();
        assert_eq!(
            arr.to_options::<f64>().unwrap(),
            vec![Some(1.0), None, None, Some(2.5), None]
        );
    }

    #[test]
    fn test_from_strings_reports_bad_tokens() {
        let err =
            NumericArray::from_strings(&[Some("1"), Some("abc")], NumericDtype::Int64).unwrap_err();
        assert!(matches!(err, MaskArrayError::Parse { index: 1, .. }));
    }

    #[test]
    fn test_from_strings_large_unsigned() {
        let arr =
            NumericArray::from_strings(&[Some("18446744073709551615")], NumericDtype::UInt64)
                .unwrap();
        assert_eq!(arr.values::<u64>().unwrap(), &[u64::MAX]);
    }
}
