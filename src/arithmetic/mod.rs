// In: src/arithmetic/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Arithmetic Engine
// ====================================================================================
//
// Every binary operator on a `NumericArray` runs through `binary_op_with`:
//
//   1. [Operand Resolution (operand.rs)]  -> rank, length and kind checks
//         |
//         `-> a duration operand branches off to `duration.rs`
//
//   2. [Mask Computation (mask.rs)]       -> base combination, then the
//                                            `1 ** x` / `x ** 0` identities
//
//   3. [Data Computation]                 -> placeholder ones for the missing
//                                            singleton, otherwise the
//                                            elementwise kernels under the
//                                            caller's `ErrState`
//
//   4. [Result Assembly (assemble.rs)]    -> typed output, float widening
//
// `divmod` and `rdivmod` run steps 3 and 4 twice against the same mask.
// ====================================================================================

pub mod assemble;
pub mod duration;
pub(crate) mod mask;
pub mod operand;

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub use assemble::ArithOutput;
pub use duration::{DurationArray, NAT};
pub use operand::{NativeOperand, NativeValues, Operand};

use crate::array::{NumericArray, NumericBuffer};
use crate::config::{ErrState, MaskArrayConfig};
use crate::error::{MaskArrayError, Result};
use crate::kernels::{binary_kernel, KernelOp};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;
use crate::types::{NumericDtype, Scalar};
use crate::with_native_type;
use assemble::{assemble_numeric, ResultKind};
use mask::{apply_identity_overrides, combine_masks};
use operand::Resolved;

//==================================================================================
// 1. Operators
//==================================================================================

/// The binary operators. `R*` variants compute `other <op> self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    RAdd,
    Sub,
    RSub,
    Mul,
    RMul,
    TrueDiv,
    RTrueDiv,
    FloorDiv,
    RFloorDiv,
    Mod,
    RMod,
    Pow,
    RPow,
    DivMod,
    RDivMod,
}

impl ArithmeticOp {
    pub const ALL: [ArithmeticOp; 16] = [
        Self::Add,
        Self::RAdd,
        Self::Sub,
        Self::RSub,
        Self::Mul,
        Self::RMul,
        Self::TrueDiv,
        Self::RTrueDiv,
        Self::FloorDiv,
        Self::RFloorDiv,
        Self::Mod,
        Self::RMod,
        Self::Pow,
        Self::RPow,
        Self::DivMod,
        Self::RDivMod,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::RAdd => "radd",
            Self::Sub => "sub",
            Self::RSub => "rsub",
            Self::Mul => "mul",
            Self::RMul => "rmul",
            Self::TrueDiv => "truediv",
            Self::RTrueDiv => "rtruediv",
            Self::FloorDiv => "floordiv",
            Self::RFloorDiv => "rfloordiv",
            Self::Mod => "mod",
            Self::RMod => "rmod",
            Self::Pow => "pow",
            Self::RPow => "rpow",
            Self::DivMod => "divmod",
            Self::RDivMod => "rdivmod",
        }
    }

    pub fn is_truediv(&self) -> bool {
        matches!(self, Self::TrueDiv | Self::RTrueDiv)
    }

    /// `true` for operators that produce a (quotient, remainder) pair.
    pub fn is_pair(&self) -> bool {
        matches!(self, Self::DivMod | Self::RDivMod)
    }

    /// The single-result operators a pair operator is made of.
    fn split_pair(&self) -> Option<(ArithmeticOp, ArithmeticOp)> {
        match self {
            Self::DivMod => Some((Self::FloorDiv, Self::Mod)),
            Self::RDivMod => Some((Self::RFloorDiv, Self::RMod)),
            _ => None,
        }
    }

    /// The kernel and whether the operands are swapped before calling it.
    fn kernel(&self) -> Option<(KernelOp, bool)> {
        let kernel = match self {
            Self::Add => (KernelOp::Add, false),
            Self::RAdd => (KernelOp::Add, true),
            Self::Sub => (KernelOp::Sub, false),
            Self::RSub => (KernelOp::Sub, true),
            Self::Mul => (KernelOp::Mul, false),
            Self::RMul => (KernelOp::Mul, true),
            Self::TrueDiv => (KernelOp::TrueDiv, false),
            Self::RTrueDiv => (KernelOp::TrueDiv, true),
            Self::FloorDiv => (KernelOp::FloorDiv, false),
            Self::RFloorDiv => (KernelOp::FloorDiv, true),
            Self::Mod => (KernelOp::Mod, false),
            Self::RMod => (KernelOp::Mod, true),
            Self::Pow => (KernelOp::Pow, false),
            Self::RPow => (KernelOp::Pow, true),
            Self::DivMod | Self::RDivMod => return None,
        };
        Some(kernel)
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArithmeticOp {
    type Err = MaskArrayError;

    /// Accepts plain names (`"add"`) and dunder names (`"__add__"`).
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim_start_matches("__").trim_end_matches("__");
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| MaskArrayError::InvalidArgument(format!("unknown operator '{}'", s)))
    }
}

/// The outcome of `binary_op`: one array, or a pair for `divmod`/`rdivmod`.
#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    Single(ArithOutput),
    Pair(ArithOutput, ArithOutput),
}

impl OpResult {
    /// # Errors
    /// Returns `InternalError` for a pair result.
    pub fn into_single(self) -> Result<ArithOutput> {
        match self {
            OpResult::Single(out) => Ok(out),
            OpResult::Pair(..) => Err(MaskArrayError::InternalError(
                "expected a single result, got a pair".to_string(),
            )),
        }
    }

    /// # Errors
    /// Returns `InternalError` for a single result.
    pub fn into_pair(self) -> Result<(ArithOutput, ArithOutput)> {
        match self {
            OpResult::Pair(a, b) => Ok((a, b)),
            OpResult::Single(_) => Err(MaskArrayError::InternalError(
                "expected a pair result, got a single array".to_string(),
            )),
        }
    }
}

//==================================================================================
// 2. The Engine
//==================================================================================

impl NumericArray {
    /// Applies `op` with every numeric event ignored.
    ///
    /// # Errors
    /// See [`NumericArray::binary_op_with`].
    pub fn binary_op<'a>(&self, other: impl Into<Operand<'a>>, op: ArithmeticOp) -> Result<OpResult> {
        self.binary_op_with(other, op, &ErrState::ignore_all())
    }

    /// Applies `op` using the error state from `config`.
    ///
    /// # Errors
    /// See [`NumericArray::binary_op_with`].
    pub fn binary_op_with_config<'a>(
        &self,
        other: impl Into<Operand<'a>>,
        op: ArithmeticOp,
        config: &MaskArrayConfig,
    ) -> Result<OpResult> {
        self.binary_op_with(other, op, &config.errstate)
    }

    /// Applies `op` between `self` and `other`.
    ///
    /// `errstate` only governs events on present result slots; whatever
    /// happens at missing slots is never observed.
    ///
    /// # Errors
    /// * `UnsupportedDimension` / `LengthMismatch` for shape problems.
    /// * `TypeMismatch` for non-numeric operands, or an operator undefined
    ///   for a duration.
    /// * `NegativeIntegerPower` for a negative integer exponent on a present slot.
    /// * `FloatingPoint` when `errstate` raises for an event.
    pub fn binary_op_with<'a>(
        &self,
        other: impl Into<Operand<'a>>,
        op: ArithmeticOp,
        errstate: &ErrState,
    ) -> Result<OpResult> {
        let other = other.into();
        let resolved = other.resolve(self.len(), self.dtype())?;
        log::debug!(
            "binary_op '{}': {} with {} ({} elements)",
            op,
            self.dtype(),
            other.type_name(),
            self.len()
        );
        log_metric!("event" = "binary_op", "op" = op, "len" = self.len());

        if let Resolved::Duration(delta) = resolved {
            let out = duration::duration_op(self, delta, op)?;
            return Ok(OpResult::Single(ArithOutput::Duration(out)));
        }

        let mut mask = combine_masks(self, &resolved);
        apply_identity_overrides(op, &mut mask, self, &resolved);

        let kind = ResultKind {
            lhs_is_float: self.dtype().is_float(),
            other_is_float: resolved.is_float(),
            is_truediv: op.is_truediv(),
        };

        if resolved.is_missing_singleton() {
            // The data is never observed, but its dtype is.
            let placeholder = || {
                let data = NumericBuffer::ones(self.dtype(), self.len());
                ArithOutput::Numeric(assemble_numeric(data, mask.clone(), kind))
            };
            return Ok(if op.is_pair() {
                OpResult::Pair(placeholder(), placeholder())
            } else {
                OpResult::Single(placeholder())
            });
        }

        match op.split_pair() {
            Some((div_op, mod_op)) => {
                let quotient = self.compute(&resolved, div_op, &mask, errstate, kind)?;
                let remainder = self.compute(&resolved, mod_op, &mask, errstate, kind)?;
                Ok(OpResult::Pair(quotient, remainder))
            }
            None => Ok(OpResult::Single(
                self.compute(&resolved, op, &mask, errstate, kind)?,
            )),
        }
    }

    /// Runs the elementwise kernel for a single-result operator and
    /// assembles the output.
    fn compute(
        &self,
        other: &Resolved<'_>,
        op: ArithmeticOp,
        mask: &ValidityMask,
        errstate: &ErrState,
        kind: ResultKind,
    ) -> Result<ArithOutput> {
        let (kernel_op, reversed) = op.kernel().ok_or_else(|| {
            MaskArrayError::InternalError(format!("'{}' has no elementwise kernel", op))
        })?;

        let other_dtype = match other {
            Resolved::Array { data, .. } => data.dtype(),
            Resolved::Scalar(scalar) => scalar_operand_dtype(self.dtype(), scalar),
            Resolved::Duration(_) | Resolved::Missing => {
                return Err(MaskArrayError::InternalError(
                    "compute called without elementwise operand".to_string(),
                ))
            }
        };
        let mut compute_dtype = NumericDtype::promote(self.dtype(), other_dtype);
        if kernel_op == KernelOp::TrueDiv && compute_dtype.is_integer() {
            compute_dtype = NumericDtype::Float64;
        }
        log::trace!(
            "'{}' computes in {} ({} with {})",
            op,
            compute_dtype,
            self.dtype(),
            other_dtype
        );

        let lhs = cast_to(self.data(), compute_dtype);
        let rhs = match other {
            Resolved::Array { data, .. } => cast_to(data, compute_dtype),
            Resolved::Scalar(scalar) => {
                Cow::Owned(NumericBuffer::repeat_scalar(scalar, compute_dtype, self.len())?)
            }
            Resolved::Duration(_) | Resolved::Missing => {
                return Err(MaskArrayError::InternalError(
                    "compute called without elementwise operand".to_string(),
                ))
            }
        };
        let (a, b) = if reversed { (&rhs, &lhs) } else { (&lhs, &rhs) };

        let data = with_native_type!(compute_dtype, T => {
            let values = binary_kernel::<T>(
                a.typed::<T>()?,
                b.typed::<T>()?,
                kernel_op,
                mask,
                errstate,
                op.name(),
            )?;
            T::into_buffer(values)
        });
        Ok(ArithOutput::Numeric(assemble_numeric(
            data,
            mask.clone(),
            kind,
        )))
    }
}

fn cast_to(buffer: &NumericBuffer, dtype: NumericDtype) -> Cow<'_, NumericBuffer> {
    if buffer.dtype() == dtype {
        Cow::Borrowed(buffer)
    } else {
        Cow::Owned(buffer.cast(dtype))
    }
}

/// The dtype a scalar contributes to promotion against an array of `dtype`.
///
/// Integers that fit `dtype` keep it. Otherwise the value's smallest dtype
/// (signed for signed arrays and negative values) is promoted with `dtype`.
/// Floats keep a floating `dtype` and turn an integer one into `Float64`.
fn scalar_operand_dtype(dtype: NumericDtype, scalar: &Scalar) -> NumericDtype {
    let value: i128 = match scalar {
        Scalar::Int64(v) => i128::from(*v),
        Scalar::UInt64(v) => i128::from(*v),
        _ if dtype.is_float() => return dtype,
        _ => return NumericDtype::Float64,
    };
    if dtype.can_hold_i128(value) {
        return dtype;
    }
    let value_dtype = if dtype.is_signed_int() || value < 0 {
        NumericDtype::min_signed_for(value).unwrap_or(NumericDtype::UInt64)
    } else {
        // Non-negative and at most u64::MAX.
        NumericDtype::min_for_u64(value as u64)
    };
    NumericDtype::promote(dtype, value_dtype)
}

//==================================================================================
// 3. Named Operators
//==================================================================================

macro_rules! single_result_ops {
    ($($(#[$doc:meta])* $method:ident => $op:ident),+ $(,)?) => {
        impl NumericArray {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                /// See [`NumericArray::binary_op_with`].
                pub fn $method<'a>(&self, other: impl Into<Operand<'a>>) -> Result<ArithOutput> {
                    self.binary_op(other, ArithmeticOp::$op)?.into_single()
                }
            )+
        }
    };
}

single_result_ops! {
    /// `self + other`
    add => Add,
    /// `other + self`
    radd => RAdd,
    /// `self - other`
    sub => Sub,
    /// `other - self`
    rsub => RSub,
    /// `self * other`
    mul => Mul,
    /// `other * self`
    rmul => RMul,
    /// `self / other`, always floating point.
    truediv => TrueDiv,
    /// `other / self`, always floating point.
    rtruediv => RTrueDiv,
    /// `self // other`
    floordiv => FloorDiv,
    /// `other // self`
    rfloordiv => RFloorDiv,
    /// `self % other`; the remainder takes the sign of `other`.
    modulo => Mod,
    /// `other % self`
    rmod => RMod,
    /// `self ** other`
    pow => Pow,
    /// `other ** self`
    rpow => RPow,
}

impl NumericArray {
    /// `(self // other, self % other)` sharing one mask.
    ///
    /// # Errors
    /// See [`NumericArray::binary_op_with`].
    pub fn divmod<'a>(&self, other: impl Into<Operand<'a>>) -> Result<(ArithOutput, ArithOutput)> {
        self.binary_op(other, ArithmeticOp::DivMod)?.into_pair()
    }

    /// `(other // self, other % self)` sharing one mask.
    ///
    /// # Errors
    /// See [`NumericArray::binary_op_with`].
    pub fn rdivmod<'a>(&self, other: impl Into<Operand<'a>>) -> Result<(ArithOutput, ArithOutput)> {
        self.binary_op(other, ArithmeticOp::RDivMod)?.into_pair()
    }
}
