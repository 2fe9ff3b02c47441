// In: src/array/unary.rs

//! Single-array transforms. Each returns a new array with a copied mask.

use std::collections::HashMap;
use std::ops::Neg;

use crate::array::{map_buffer, NumericArray};
use crate::error::{MaskArrayError, Result};
use crate::traits::NumericNative;
use crate::types::Scalar;

/// Extra arguments accepted by [`NumericArray::round_with`] for compatibility
/// with callers that forward array-library style arguments.
///
/// `None` stands for an explicit null argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundArgs {
    /// Positional arguments after `decimals`. The first one is `out`.
    pub positional: Vec<Option<Scalar>>,
    pub keywords: HashMap<String, Option<Scalar>>,
}

impl RoundArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positional(mut self, value: Option<Scalar>) -> Self {
        self.positional.push(value);
        self
    }

    pub fn with_keyword(mut self, name: &str, value: Option<Scalar>) -> Self {
        self.keywords.insert(name.to_string(), value);
        self
    }

    /// # Errors
    /// * `UnsupportedArgument` if an output buffer is requested.
    /// * `InvalidArgument` if a `decimals` keyword disagrees with `decimals`.
    fn validate(&self, decimals: i32) -> Result<()> {
        if matches!(self.positional.first(), Some(Some(_)))
            || matches!(self.keywords.get("out"), Some(Some(_)))
        {
            return Err(MaskArrayError::UnsupportedArgument(
                "the 'out' parameter is not supported".to_string(),
            ));
        }
        if let Some(value) = self.keywords.get("decimals") {
            let agrees = matches!(value, Some(Scalar::Int64(d)) if *d == i64::from(decimals));
            if !agrees {
                return Err(MaskArrayError::InvalidArgument(format!(
                    "conflicting 'decimals' keyword ({}) for decimals={}",
                    value
                        .as_ref()
                        .map_or_else(|| "None".to_string(), |v| v.to_string()),
                    decimals
                )));
            }
        }
        for name in self.keywords.keys().filter(|k| !matches!(k.as_str(), "out" | "decimals")) {
            log::debug!("round: ignoring keyword argument '{}'", name);
        }
        if self.positional.len() > 1 {
            log::debug!(
                "round: ignoring {} extra positional arguments",
                self.positional.len() - 1
            );
        }
        Ok(())
    }
}

impl NumericArray {
    /// Elementwise negation. Integers wrap: `-MIN == MIN`, unsigned values
    /// wrap around zero.
    pub fn neg(&self) -> NumericArray {
        let data = map_buffer!(self.data(), v => v.iter().map(|&x| x.negate()).collect());
        NumericArray::new(data, self.mask().clone())
    }

    /// Elementwise absolute value; `abs(MIN) == MIN` for signed integers.
    pub fn abs(&self) -> NumericArray {
        let data = map_buffer!(self.data(), v => v.iter().map(|&x| x.absolute()).collect());
        NumericArray::new(data, self.mask().clone())
    }

    /// Unary plus: an independent copy.
    pub fn pos(&self) -> NumericArray {
        self.copy()
    }

    /// Rounds each value half to even at `decimals` places. Negative
    /// `decimals` round to the left of the decimal point.
    pub fn round(&self, decimals: i32) -> NumericArray {
        let data = map_buffer!(self.data(), v => v.iter().map(|&x| x.round_to(decimals)).collect());
        NumericArray::new(data, self.mask().clone())
    }

    /// [`NumericArray::round`] with compatibility arguments. Arguments that
    /// would change the result are rejected; the rest are ignored.
    ///
    /// # Errors
    /// * `UnsupportedArgument` for a non-null `out` argument.
    /// * `InvalidArgument` for a `decimals` keyword that disagrees with `decimals`.
    pub fn round_with(&self, decimals: i32, args: &RoundArgs) -> Result<NumericArray> {
        args.validate(decimals)?;
        Ok(self.round(decimals))
    }
}

impl Neg for &NumericArray {
    type Output = NumericArray;

    fn neg(self) -> NumericArray {
        NumericArray::neg(self)
    }
}

impl Neg for NumericArray {
    type Output = NumericArray;

    fn neg(self) -> NumericArray {
        NumericArray::neg(&self)
    }
}
