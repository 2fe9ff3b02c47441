//! Pure, stateless elementwise kernels with native numeric semantics.
//!
//! Each scalar kernel returns the computed value together with an optional
//! `KernelEvent`. The slice runner decides what an event means: events on
//! missing slots are dropped, events on present slots are checked against the
//! caller's `ErrState`.

use num_traits::{Float, PrimInt, ToPrimitive, WrappingAdd, WrappingMul, WrappingNeg, WrappingSub};

use crate::config::{ErrAction, ErrState, FpErrorKind};
use crate::error::{MaskArrayError, Result};
use crate::null_handling::ValidityMask;
use crate::traits::NumericNative;

//==================================================================================
// 1. Operation & Event Types
//==================================================================================

/// The primitive binary operations the kernels implement. Reversed operators
/// are expressed by swapping the operands before calling a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelOp {
    Add,
    Sub,
    Mul,
    TrueDiv,
    FloorDiv,
    Mod,
    Pow,
}

/// Something noteworthy happened while computing one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelEvent {
    Fp(FpErrorKind),
    /// Integer base raised to a negative integer exponent.
    NegativeIntegerPower,
}

pub type Computed<T> = (T, Option<KernelEvent>);

//==================================================================================
// 2. Integer Kernels
//==================================================================================

/// Integer kernel: wrapping `+ - *`, floor division and floor modulo, and
/// wrapping exponentiation.
pub(crate) fn int_apply<I>(op: KernelOp, a: I, b: I) -> Computed<I>
where
    I: PrimInt + WrappingAdd + WrappingSub + WrappingMul,
{
    match op {
        KernelOp::Add => match a.checked_add(&b) {
            Some(v) => (v, None),
            None => (a.wrapping_add(&b), Some(KernelEvent::Fp(FpErrorKind::Overflow))),
        },
        KernelOp::Sub => match a.checked_sub(&b) {
            Some(v) => (v, None),
            None => (a.wrapping_sub(&b), Some(KernelEvent::Fp(FpErrorKind::Overflow))),
        },
        KernelOp::Mul => match a.checked_mul(&b) {
            Some(v) => (v, None),
            None => (a.wrapping_mul(&b), Some(KernelEvent::Fp(FpErrorKind::Overflow))),
        },
        // The engine promotes true division to floating point before dispatch.
        KernelOp::FloorDiv | KernelOp::TrueDiv => int_floor_div(a, b),
        KernelOp::Mod => int_floor_mod(a, b),
        KernelOp::Pow => int_pow(a, b),
    }
}

fn int_floor_div<I>(a: I, b: I) -> Computed<I>
where
    I: PrimInt + WrappingSub + WrappingMul,
{
    if b.is_zero() {
        return (I::zero(), Some(KernelEvent::Fp(FpErrorKind::Divide)));
    }
    match a.checked_div(&b) {
        Some(q) => {
            let r = a.wrapping_sub(&q.wrapping_mul(&b));
            if !r.is_zero() && ((r < I::zero()) != (b < I::zero())) {
                (q - I::one(), None)
            } else {
                (q, None)
            }
        }
        // MIN / -1
        None => (I::min_value(), Some(KernelEvent::Fp(FpErrorKind::Overflow))),
    }
}

fn int_floor_mod<I>(a: I, b: I) -> Computed<I>
where
    I: PrimInt + WrappingSub + WrappingMul,
{
    if b.is_zero() {
        return (I::zero(), Some(KernelEvent::Fp(FpErrorKind::Divide)));
    }
    match a.checked_div(&b) {
        Some(q) => {
            let r = a.wrapping_sub(&q.wrapping_mul(&b));
            if !r.is_zero() && ((r < I::zero()) != (b < I::zero())) {
                (r + b, None)
            } else {
                (r, None)
            }
        }
        // MIN % -1
        None => (I::zero(), None),
    }
}

fn int_pow<I>(base: I, exponent: I) -> Computed<I>
where
    I: PrimInt + WrappingMul,
{
    if exponent < I::zero() {
        // 1 ** x is 1 for every exponent.
        if base == I::one() {
            return (I::one(), None);
        }
        return (I::zero(), Some(KernelEvent::NegativeIntegerPower));
    }
    let mut e = exponent.to_u64().unwrap_or(u64::MAX);
    let mut result = I::one();
    let mut acc = base;
    let mut overflow = false;
    while e > 0 {
        if e & 1 == 1 {
            result = match result.checked_mul(&acc) {
                Some(v) => v,
                None => {
                    overflow = true;
                    result.wrapping_mul(&acc)
                }
            };
        }
        e >>= 1;
        if e > 0 {
            acc = match acc.checked_mul(&acc) {
                Some(v) => v,
                None => {
                    overflow = true;
                    acc.wrapping_mul(&acc)
                }
            };
        }
    }
    let event = overflow.then_some(KernelEvent::Fp(FpErrorKind::Overflow));
    (result, event)
}

/// Wrapping negation; `MIN` stays `MIN` and unsigned values wrap around.
pub(crate) fn int_neg<I: WrappingNeg>(a: I) -> I {
    a.wrapping_neg()
}

/// Wrapping absolute value; `abs(MIN) == MIN`.
pub(crate) fn int_abs<I: PrimInt + WrappingNeg>(a: I) -> I {
    if a < I::zero() {
        a.wrapping_neg()
    } else {
        a
    }
}

//==================================================================================
// 3. Floating-Point Kernels
//==================================================================================

pub(crate) fn float_apply<F: Float>(op: KernelOp, a: F, b: F) -> Computed<F> {
    match op {
        KernelOp::Add => classify(a + b, a, b),
        KernelOp::Sub => classify(a - b, a, b),
        KernelOp::Mul => classify(a * b, a, b),
        KernelOp::TrueDiv => {
            if b.is_zero() {
                return (a / b, zero_division_event(a));
            }
            classify(a / b, a, b)
        }
        KernelOp::FloorDiv => float_divmod(a, b).0,
        KernelOp::Mod => float_divmod(a, b).1,
        KernelOp::Pow => {
            let value = a.powf(b);
            if value.is_infinite() && a.is_zero() && b < F::zero() {
                return (value, Some(KernelEvent::Fp(FpErrorKind::Divide)));
            }
            classify(value, a, b)
        }
    }
}

/// Reports overflow or invalid results that did not come from non-finite inputs.
fn classify<F: Float>(value: F, a: F, b: F) -> Computed<F> {
    if value.is_nan() && !a.is_nan() && !b.is_nan() {
        (value, Some(KernelEvent::Fp(FpErrorKind::Invalid)))
    } else if value.is_infinite() && a.is_finite() && b.is_finite() {
        (value, Some(KernelEvent::Fp(FpErrorKind::Overflow)))
    } else {
        (value, None)
    }
}

fn zero_division_event<F: Float>(a: F) -> Option<KernelEvent> {
    if a.is_nan() {
        None
    } else if a.is_zero() {
        Some(KernelEvent::Fp(FpErrorKind::Invalid))
    } else {
        Some(KernelEvent::Fp(FpErrorKind::Divide))
    }
}

/// Floor quotient and floor remainder (remainder takes the sign of `b`).
fn float_divmod<F: Float>(a: F, b: F) -> (Computed<F>, Computed<F>) {
    if b.is_zero() {
        let quotient = (a / b, zero_division_event(a));
        let remainder_event = (!a.is_nan()).then_some(KernelEvent::Fp(FpErrorKind::Invalid));
        return (quotient, (a % b, remainder_event));
    }

    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if !rem.is_zero() {
        if (b < F::zero()) != (rem < F::zero()) {
            rem = rem + b;
            div = div - F::one();
        }
    } else {
        rem = F::zero().copysign(b);
    }

    let floordiv = if !div.is_zero() {
        let mut floor = div.floor();
        if div - floor > F::from(0.5).unwrap_or_else(F::zero) {
            floor = floor + F::one();
        }
        floor
    } else {
        F::zero().copysign(a / b)
    };

    (classify(floordiv, a, b), classify(rem, a, b))
}

//==================================================================================
// 4. Slice Runner
//==================================================================================

/// Applies `op` across two equal-length slices.
///
/// `mask` is the already-combined result mask: events at missing slots are
/// never observed. `op_name` is only used for error reports.
///
/// # Errors
/// * `NegativeIntegerPower` for a present slot with a negative integer exponent.
/// * `FloatingPoint` when `errstate` raises for the event's category.
pub fn binary_kernel<T: NumericNative>(
    lhs: &[T],
    rhs: &[T],
    op: KernelOp,
    mask: &ValidityMask,
    errstate: &ErrState,
    op_name: &'static str,
) -> Result<Vec<T>> {
    debug_assert_eq!(lhs.len(), rhs.len());
    debug_assert_eq!(lhs.len(), mask.len());

    let mut out = Vec::with_capacity(lhs.len());
    for (idx, (&a, &b)) in lhs.iter().zip(rhs).enumerate() {
        let (value, event) = T::apply_binary(op, a, b);
        if let Some(event) = event {
            if !mask.is_missing(idx) {
                check_event(event, errstate, op_name, idx, b)?;
            }
        }
        out.push(value);
    }
    Ok(out)
}

fn check_event<T: NumericNative>(
    event: KernelEvent,
    errstate: &ErrState,
    op_name: &'static str,
    index: usize,
    exponent: T,
) -> Result<()> {
    match event {
        KernelEvent::NegativeIntegerPower => Err(MaskArrayError::NegativeIntegerPower {
            index,
            exponent: ToPrimitive::to_i64(&exponent).unwrap_or(i64::MIN),
        }),
        KernelEvent::Fp(kind) => match errstate.action_for(kind) {
            ErrAction::Ignore => Ok(()),
            ErrAction::Raise => Err(MaskArrayError::FloatingPoint {
                kind,
                op: op_name,
                index,
            }),
        },
    }
}
