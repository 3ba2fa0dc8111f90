use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FracError {
    #[error("fraction denominator must be non-zero")]
    ZeroDenominator,
}

/// Exact rational policy coefficient. The denominator is never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFrac", into = "RawFrac")]
pub struct BigFrac {
    numerator: BigInt,
    denominator: BigInt,
}

#[derive(Serialize, Deserialize)]
struct RawFrac {
    #[serde(with = "crate::bigint_str")]
    numerator: BigInt,
    #[serde(with = "crate::bigint_str")]
    denominator: BigInt,
}

impl TryFrom<RawFrac> for BigFrac {
    type Error = FracError;

    fn try_from(raw: RawFrac) -> Result<Self, FracError> {
        BigFrac::new(raw.numerator, raw.denominator)
    }
}

impl From<BigFrac> for RawFrac {
    fn from(frac: BigFrac) -> Self {
        RawFrac {
            numerator: frac.numerator,
            denominator: frac.denominator,
        }
    }
}

impl BigFrac {
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, FracError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(FracError::ZeroDenominator);
        }
        Ok(Self {
            numerator: numerator.into(),
            denominator,
        })
    }

    /// Infallible constructor for constant tables.
    pub fn from_ratio(numerator: u64, denominator: NonZeroU64) -> Self {
        Self {
            numerator: BigInt::from(numerator),
            denominator: BigInt::from(denominator.get()),
        }
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// `value * numerator / denominator`, multiplying before the single
    /// truncating division.
    pub fn apply(&self, value: &BigInt) -> BigInt {
        (value * &self.numerator) / &self.denominator
    }

    /// True when the fraction is in `[0, 1]`.
    pub fn is_unit_interval(&self) -> bool {
        let num = &self.numerator * self.denominator.signum();
        let den = self.denominator.abs();
        !num.is_negative() && num <= den
    }
}
