// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SMOOTHED FILTER ESTIMATES
//
// Position + velocity snapshot of a trending network metric (reward rate,
// quality-adjusted power). Produced once per epoch by the alpha-beta filter
// that lives with the reward/power actors; here it is read-only input.
//
// Both fields are Q.128. Every operation multiplies before it shifts or
// divides so precision is only dropped once, at the end.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::fixed::{ln, PRECISION};
use crate::ChainEpoch;

lazy_static! {
    /// Squared denominator velocity (Q.128) at or below which the ratio
    /// integral falls back to the linear midpoint form: 2^-50.
    pub static ref EXTRAPOLATED_CUM_SUM_RATIO_EPSILON: BigInt =
        BigInt::one() << (PRECISION - 50);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEstimate {
    #[serde(with = "crate::bigint_str")]
    position: BigInt,
    #[serde(with = "crate::bigint_str")]
    velocity: BigInt,
}

impl FilterEstimate {
    /// Build from Q.0 position and velocity.
    pub fn new(position: impl Into<BigInt>, velocity: impl Into<BigInt>) -> Self {
        Self {
            position: position.into() << PRECISION,
            velocity: velocity.into() << PRECISION,
        }
    }

    /// Build from values already in Q.128 (e.g. a persisted snapshot).
    pub fn from_q128(position: BigInt, velocity: BigInt) -> Self {
        Self { position, velocity }
    }

    /// A flat trend at `value`.
    pub fn constant(value: impl Into<BigInt>) -> Self {
        Self::new(value, BigInt::zero())
    }

    pub fn position(&self) -> &BigInt {
        &self.position
    }

    pub fn velocity(&self) -> &BigInt {
        &self.velocity
    }

    /// Current value, Q.0.
    pub fn estimate(&self) -> BigInt {
        &self.position >> PRECISION
    }

    /// Value `delta` epochs ahead of the snapshot, Q.0.
    pub fn extrapolate(&self, delta: ChainEpoch) -> BigInt {
        (&self.velocity * delta + &self.position) >> PRECISION
    }

    /// Integral of `numerator(t) / denominator(t)` over `t ∈ [0, duration]`,
    /// returned in Q.128.
    ///
    /// With `n(t) = p1 + v1·t` and `d(t) = p2 + v2·t`:
    ///
    /// ```text
    /// ∫ n/d dt = (v1/v2)·Δ + (p1·v2 − p2·v1)/v2² · ln(d(Δ) / d(0))
    /// ```
    ///
    /// When `v2²` does not exceed [`EXTRAPOLATED_CUM_SUM_RATIO_EPSILON`] the
    /// denominator is treated as flat and `n` is sampled at the midpoint.
    /// Returns zero if the denominator is non-positive anywhere it is read.
    pub fn extrapolated_cum_sum_of_ratio(
        duration: ChainEpoch,
        numerator: &FilterEstimate,
        denominator: &FilterEstimate,
    ) -> BigInt {
        let delta_t = BigInt::from(duration) << PRECISION; // Q.0 => Q.128
        let p1 = &numerator.position;
        let v1 = &numerator.velocity;
        let p2 = &denominator.position;
        let v2 = &denominator.velocity;

        let squared_v2 = (v2 * v2) >> PRECISION; // Q.256 => Q.128

        if squared_v2 > *EXTRAPOLATED_CUM_SUM_RATIO_EPSILON {
            let x2a = p2.clone();
            let x2b = p2 + ((&delta_t * v2) >> PRECISION);

            let (ln_a, ln_b) = match (ln(&x2a), ln(&x2b)) {
                (Some(a), Some(b)) => (a, b),
                _ => return BigInt::zero(),
            };

            // Q.128 * Q.128 * Q.128 => Q.384 => Q.256
            let m1 = ((&ln_b - &ln_a) * p1 * v2) >> PRECISION;

            // (Q.256 + Q.256) * Q.128 => Q.384 => Q.256
            let m2_left = (&ln_a - &ln_b) * p2;
            let m2_right = v2 * &delta_t;
            let m2 = ((m2_left + m2_right) * v1) >> PRECISION;

            return (m1 + m2) / squared_v2; // Q.256 / Q.128 => Q.128
        }

        if !p2.is_positive() {
            return BigInt::zero();
        }

        let half_delta_t = &delta_t >> 1u32;
        let x1m = p1 + ((v1 * &half_delta_t) >> PRECISION);

        (x1m * &delta_t) / p2 // Q.256 / Q.128 => Q.128
    }
}
