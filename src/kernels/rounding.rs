//! Round-half-to-even kernels behind `NumericArray::round`.

use num_traits::{Float, PrimInt, WrappingMul};

/// Rounds to the nearest integer, ties to even.
pub(crate) fn rint<F: Float>(y: F) -> F {
    let r = y.round();
    let half = F::from(0.5).unwrap_or_else(F::zero);
    let two = F::one() + F::one();
    if (r - y).abs() == half && r % two != F::zero() {
        // `round` moved away from zero; step back to the even neighbour.
        r - y.signum()
    } else {
        r
    }
}

/// Scales by a power of ten, rounds ties to even and scales back.
///
/// Non-finite values pass through unchanged.
pub(crate) fn float_round<F: Float>(x: F, decimals: i32) -> F {
    if !x.is_finite() {
        return x;
    }
    let ten = F::from(10.0).unwrap_or_else(F::one);
    if decimals >= 0 {
        let factor = ten.powi(decimals);
        rint(x * factor) / factor
    } else {
        let factor = ten.powi(-decimals);
        rint(x / factor) * factor
    }
}

/// Integers are already whole; negative `decimals` round to a multiple of
/// `10^-decimals`, ties to even, using exact integer arithmetic.
pub(crate) fn int_round<I: PrimInt + WrappingMul>(x: I, decimals: i32) -> I {
    if decimals >= 0 {
        return x;
    }
    let ten = match I::from(10) {
        Some(ten) => ten,
        None => return x,
    };
    let mut factor = I::one();
    for _ in 0..decimals.unsigned_abs() {
        factor = match factor.checked_mul(&ten) {
            Some(f) => f,
            // |x| is below half of any factor the type cannot hold.
            None => return I::zero(),
        };
    }

    let q = x / factor;
    let r = x % factor;
    let r_abs = if r < I::zero() { I::zero() - r } else { r };
    let upper = factor - r_abs;
    let away = r_abs > upper || (r_abs == upper && (q % (I::one() + I::one())) != I::zero());
    let q = if !away {
        q
    } else if x < I::zero() {
        q - I::one()
    } else {
        q + I::one()
    };
    q.wrapping_mul(&factor)
}
