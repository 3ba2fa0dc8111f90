use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Fractional bits of every smoothed quantity (Q.128).
pub const PRECISION: u64 = 128;

lazy_static! {
    /// 1.0 in Q.128
    pub static ref ONE_Q128: BigInt = BigInt::one() << PRECISION;

    /// ln(2) in Q.128, truncated.
    pub static ref LN_2: BigInt =
        BigInt::from(235_865_763_225_513_294_137_944_142_764_154_484_399u128);
}

/// Shift a Q.0 integer into Q.128.
pub fn to_q128(value: &BigInt) -> BigInt {
    value << PRECISION
}

/// Shift a Q.128 value back to Q.0 (rounds toward negative infinity).
pub fn from_q128(value: &BigInt) -> BigInt {
    value >> PRECISION
}

/// Natural logarithm of a positive Q.128 value, returned in Q.128.
///
/// The input is normalised to `2^k * m` with `m` in `[1, 2)`, then
/// `ln(x) = k * ln(2) + ln(m)`. Returns `None` for non-positive input.
pub fn ln(x: &BigInt) -> Option<BigInt> {
    if !x.is_positive() {
        return None;
    }

    let k = x.bits() as i64 - 1 - PRECISION as i64;
    let mantissa = if k >= 0 {
        x >> (k as u64)
    } else {
        x << (k.unsigned_abs())
    };

    Some(&*LN_2 * k + ln_mantissa(&mantissa))
}

/// ln(m) for Q.128 `m` in `[1, 2]` via `2 * atanh((m - 1) / (m + 1))`.
/// The series argument stays below 1/3, so each term shrinks by ≥ 9×.
fn ln_mantissa(m: &BigInt) -> BigInt {
    let one = &*ONE_Q128;
    let y = ((m - one) << PRECISION) / (m + one);
    let y_squared = (&y * &y) >> PRECISION;

    let mut term = y;
    let mut sum = BigInt::zero();
    let mut n: u32 = 1;
    while !term.is_zero() {
        sum += &term / n;
        term = (&term * &y_squared) >> PRECISION;
        n += 2;
    }

    sum << 1
}
