// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SECTOR MONIES - FIXED-POINT MATH
//
// Arbitrary-precision integer primitives shared by every monies calculator.
// Smoothed estimates are Q.128 fixed point: value = integer / 2^128.
// No floating point anywhere: every node must derive identical bits.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use num_bigint::BigInt;

pub mod bigint_str;
pub mod fixed;
pub mod frac;
pub mod smooth;

pub use fixed::PRECISION;
pub use frac::{BigFrac, FracError};
pub use smooth::FilterEstimate;

/// Token balance in atto units (10^-18 of a whole token). Signed, unbounded.
pub type TokenAmount = BigInt;

/// Quality-adjusted storage power in bytes. Non-negative by caller contract.
pub type StoragePower = BigInt;

/// Discrete chain time step.
pub type ChainEpoch = i64;
