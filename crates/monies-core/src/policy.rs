// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SECTOR MONIES - POLICY CONSTANTS
//
// Governance-set protocol parameters, consumed as an immutable value.
// Mainnet values are the default; a devnet preset shortens the day so the
// time-based penalties can be exercised quickly. Any field can be
// overridden from a TOML file without a rebuild.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use log::debug;
use monies_math::{BigFrac, ChainEpoch, TokenAmount};
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU64;
use std::path::Path;
use thiserror::Error;

use crate::{EPOCHS_IN_DAY, EXPECTED_LEADERS_PER_EPOCH, NANO_PRECISION, TOKEN_PRECISION};

/// Devnet day: 120 epochs, so a "140 day" lifetime cap passes in hours.
pub const DEVNET_EPOCHS_IN_DAY: ChainEpoch = 120;

/// Reference sector size the pledge-per-byte cap was set against (32 GiB).
const REFERENCE_SECTOR_BYTES: u64 = 32 << 30;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read or write policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse policy: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize policy: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid policy: {0}")]
    Invalid(String),
}

/// Protocol parameters for every monies calculation.
///
/// Projection periods are stored in epochs rather than re-derived from
/// `epochs_in_day`, so an override file states exactly what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Epochs per day; the only epoch → day conversion (truncating).
    pub epochs_in_day: ChainEpoch,

    /// Window of expected reward locked as initial pledge.
    pub initial_pledge_projection_period: ChainEpoch,

    /// Window of expected reward locked as pre-commit deposit. Currently the
    /// same 20 days as the initial pledge window; kept as its own field so the
    /// two can diverge.
    pub pre_commit_deposit_projection_period: ChainEpoch,

    /// Window of expected reward charged per continued fault.
    pub continued_fault_projection_period: ChainEpoch,

    /// Window of expected reward that floors the termination fee.
    pub termination_penalty_lower_bound_projection_period: ChainEpoch,

    /// Window of expected reward charged for a successfully disputed PoSt.
    pub invalid_window_post_projection_period: ChainEpoch,

    /// Maximum sector lifetime, in days, that a termination fee charges for.
    pub termination_lifetime_cap: i64,

    /// Multiple of the per-leader block reward charged for a consensus fault.
    pub consensus_fault_factor: u64,

    pub expected_leaders_per_epoch: u64,

    /// Cap on initial pledge per byte of quality-adjusted power.
    #[serde(with = "monies_math::bigint_str")]
    pub initial_pledge_max_per_byte: TokenAmount,

    #[serde(with = "monies_math::bigint_str")]
    pub base_reward_for_disputed_window_post: TokenAmount,

    #[serde(with = "monies_math::bigint_str")]
    pub base_penalty_for_disputed_window_post: TokenAmount,

    /// Base fee at or below which the aggregate fee is flat per sector.
    #[serde(with = "monies_math::bigint_str")]
    pub batch_balancer: TokenAmount,

    /// Flat network fee per sector, shared 25/75 by pre-commit and prove-commit.
    #[serde(with = "monies_math::bigint_str")]
    pub base_fee_per_sector: TokenAmount,

    /// Share of circulating supply targeted for pledge lock-up.
    pub initial_pledge_lock_target: BigFrac,

    /// Fraction of assumed daily reward charged per day of sector age on termination.
    pub termination_reward_factor: BigFrac,

    /// Fraction of each block reward that vests rather than unlocking immediately.
    pub locked_reward_factor: BigFrac,
}

impl Default for Policy {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl Policy {
    pub fn mainnet() -> Self {
        Self::for_day_length(EPOCHS_IN_DAY)
    }

    pub fn devnet() -> Self {
        Self::for_day_length(DEVNET_EPOCHS_IN_DAY)
    }

    /// Mainnet economics with every period expressed against `epochs_in_day`.
    fn for_day_length(epochs_in_day: ChainEpoch) -> Self {
        // 3.51 days, 3.5 days
        let continued_fault = (epochs_in_day * 351) / 100;
        let lower_bound = (epochs_in_day * 35) / 10;

        Self {
            epochs_in_day,
            initial_pledge_projection_period: 20 * epochs_in_day,
            pre_commit_deposit_projection_period: 20 * epochs_in_day, // matches the pledge window
            continued_fault_projection_period: continued_fault,
            termination_penalty_lower_bound_projection_period: lower_bound,
            invalid_window_post_projection_period: continued_fault + 2 * epochs_in_day,
            termination_lifetime_cap: 140,
            consensus_fault_factor: 5,
            expected_leaders_per_epoch: EXPECTED_LEADERS_PER_EPOCH,
            initial_pledge_max_per_byte: TokenAmount::from(TOKEN_PRECISION)
                / TokenAmount::from(REFERENCE_SECTOR_BYTES),
            base_reward_for_disputed_window_post: TokenAmount::from(4u64) * TOKEN_PRECISION,
            base_penalty_for_disputed_window_post: TokenAmount::from(20u64) * TOKEN_PRECISION,
            batch_balancer: TokenAmount::from(5 * NANO_PRECISION),
            // 5 nano × 65,733,297 gas / 20
            base_fee_per_sector: TokenAmount::from(16_433_324_250_000_000u64),
            initial_pledge_lock_target: frac(3, 10),
            termination_reward_factor: frac(1, 2),
            locked_reward_factor: frac(75, 100),
        }
    }

    /// Parse a (possibly partial) TOML override on top of mainnet and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, PolicyError> {
        let policy: Policy = toml::from_str(content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load policy from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, PolicyError> {
        let content = fs::read_to_string(path)?;
        let policy = Self::from_toml_str(&content)?;
        debug!(
            "loaded monies policy from {} (epochs_in_day={}, lifetime_cap={}d)",
            path.display(),
            policy.epochs_in_day,
            policy.termination_lifetime_cap
        );
        Ok(policy)
    }

    pub fn to_toml_string(&self) -> Result<String, PolicyError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save policy to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), PolicyError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Reject parameter sets the calculators are not total over.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.epochs_in_day <= 0 {
            return Err(invalid("epochs_in_day must be positive"));
        }

        let periods = [
            ("initial_pledge_projection_period", self.initial_pledge_projection_period),
            ("pre_commit_deposit_projection_period", self.pre_commit_deposit_projection_period),
            ("continued_fault_projection_period", self.continued_fault_projection_period),
            (
                "termination_penalty_lower_bound_projection_period",
                self.termination_penalty_lower_bound_projection_period,
            ),
            ("invalid_window_post_projection_period", self.invalid_window_post_projection_period),
            ("termination_lifetime_cap", self.termination_lifetime_cap),
        ];
        for (name, value) in periods {
            if value < 0 {
                return Err(invalid(&format!("{} must be non-negative (got {})", name, value)));
            }
        }

        if self
            .termination_lifetime_cap
            .checked_mul(self.epochs_in_day)
            .is_none()
        {
            return Err(invalid(&format!(
                "termination_lifetime_cap of {} days overflows at {} epochs per day",
                self.termination_lifetime_cap, self.epochs_in_day
            )));
        }

        if self.expected_leaders_per_epoch == 0 {
            return Err(invalid("expected_leaders_per_epoch must be positive"));
        }

        if !self.batch_balancer.is_positive() {
            return Err(invalid("batch_balancer must be positive"));
        }

        let amounts = [
            ("initial_pledge_max_per_byte", &self.initial_pledge_max_per_byte),
            ("base_reward_for_disputed_window_post", &self.base_reward_for_disputed_window_post),
            ("base_penalty_for_disputed_window_post", &self.base_penalty_for_disputed_window_post),
            ("base_fee_per_sector", &self.base_fee_per_sector),
        ];
        for (name, value) in amounts {
            if value.is_negative() {
                return Err(invalid(&format!("{} must be non-negative (got {})", name, value)));
            }
        }

        let fractions = [
            ("initial_pledge_lock_target", &self.initial_pledge_lock_target),
            ("termination_reward_factor", &self.termination_reward_factor),
            ("locked_reward_factor", &self.locked_reward_factor),
        ];
        for (name, value) in fractions {
            if !value.is_unit_interval() {
                return Err(invalid(&format!("{} must lie in [0, 1]", name)));
            }
        }

        Ok(())
    }

    /// Lifetime cap converted to epochs.
    pub fn termination_lifetime_cap_epochs(&self) -> ChainEpoch {
        self.termination_lifetime_cap.saturating_mul(self.epochs_in_day)
    }

    /// Whole days in `epochs`, truncating. Negative ages count as zero days.
    pub fn whole_days(&self, epochs: ChainEpoch) -> i64 {
        if epochs <= 0 || self.epochs_in_day <= 0 {
            return 0;
        }
        epochs / self.epochs_in_day
    }
}

fn frac(numerator: u64, denominator: u64) -> BigFrac {
    BigFrac::from_ratio(numerator, NonZeroU64::new(denominator).unwrap_or(NonZeroU64::MIN))
}

fn invalid(msg: &str) -> PolicyError {
    PolicyError::Invalid(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use std::io::Write;

    #[test]
    fn test_mainnet_constants() {
        let p = Policy::mainnet();
        assert_eq!(p.epochs_in_day, 2880);
        assert_eq!(p.initial_pledge_projection_period, 57_600);
        assert_eq!(p.pre_commit_deposit_projection_period, 57_600);
        assert_eq!(p.continued_fault_projection_period, 10_108);
        assert_eq!(p.termination_penalty_lower_bound_projection_period, 10_080);
        assert_eq!(p.invalid_window_post_projection_period, 15_868);
        assert_eq!(p.termination_lifetime_cap_epochs(), 140 * 2880);
        assert_eq!(p.initial_pledge_max_per_byte, TokenAmount::from(29_103_830u64));
        assert_eq!(p.batch_balancer, TokenAmount::from(5_000_000_000u64));
        assert_eq!(p, Policy::default());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_devnet_scales_periods_with_day_length() {
        let p = Policy::devnet();
        assert_eq!(p.epochs_in_day, DEVNET_EPOCHS_IN_DAY);
        assert_eq!(p.continued_fault_projection_period, 421); // 120 × 3.51, truncated
        assert_eq!(p.termination_penalty_lower_bound_projection_period, 420);
        assert_eq!(p.termination_lifetime_cap, 140);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_whole_days_truncates() {
        let p = Policy::mainnet();
        assert_eq!(p.whole_days(0), 0);
        assert_eq!(p.whole_days(2879), 0);
        assert_eq!(p.whole_days(2880), 1);
        assert_eq!(p.whole_days(2880 * 20 + 2879), 20);
        assert_eq!(p.whole_days(-5), 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let p = Policy::devnet();
        let text = p.to_toml_string().unwrap();
        let back = Policy::from_toml_str(&text).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_partial_override_keeps_mainnet_defaults() {
        let text = r#"
            termination_lifetime_cap = 180
            batch_balancer = "7_000_000_000"

            [termination_reward_factor]
            numerator = "1"
            denominator = "4"
        "#;
        let p = Policy::from_toml_str(text).unwrap();
        assert_eq!(p.termination_lifetime_cap, 180);
        assert_eq!(p.batch_balancer, TokenAmount::from(7_000_000_000u64));
        assert_eq!(p.termination_reward_factor, BigFrac::new(1, 4).unwrap());
        assert_eq!(p.epochs_in_day, EPOCHS_IN_DAY);
        assert_eq!(p.base_fee_per_sector, Policy::mainnet().base_fee_per_sector);
    }

    #[test]
    fn test_zero_denominator_rejected_on_load() {
        let text = r#"
            [locked_reward_factor]
            numerator = "3"
            denominator = "0"
        "#;
        assert!(matches!(
            Policy::from_toml_str(text),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut p = Policy::mainnet();
        p.epochs_in_day = 0;
        assert!(matches!(p.validate(), Err(PolicyError::Invalid(_))));

        let mut p = Policy::mainnet();
        p.batch_balancer = TokenAmount::zero();
        assert!(p.validate().is_err());

        let mut p = Policy::mainnet();
        p.continued_fault_projection_period = -1;
        assert!(p.validate().is_err());

        let mut p = Policy::mainnet();
        p.base_fee_per_sector = TokenAmount::from(-1);
        assert!(p.validate().is_err());

        let mut p = Policy::mainnet();
        p.initial_pledge_lock_target = BigFrac::new(11, 10).unwrap();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_lifetime_cap_overflow_rejected() {
        assert!(matches!(
            Policy::from_toml_str("termination_lifetime_cap = 9223372036854775807"),
            Err(PolicyError::Invalid(_))
        ));

        // largest cap that still fits in epochs
        let max_days = i64::MAX / EPOCHS_IN_DAY;
        let p = Policy::from_toml_str(&format!("termination_lifetime_cap = {}", max_days)).unwrap();
        assert_eq!(p.termination_lifetime_cap_epochs(), max_days * EPOCHS_IN_DAY);

        let p = Policy::from_toml_str(&format!("termination_lifetime_cap = {}", max_days + 1));
        assert!(matches!(p, Err(PolicyError::Invalid(_))));
    }

    #[test]
    fn test_lifetime_cap_epochs_saturates_when_unvalidated() {
        let mut p = Policy::mainnet();
        p.termination_lifetime_cap = i64::MAX;
        assert_eq!(p.termination_lifetime_cap_epochs(), i64::MAX);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        assert!(matches!(
            Policy::from_toml_str("epochs_in_day = -2880"),
            Err(PolicyError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_and_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");

        Policy::devnet().save_to_file(&path).unwrap();
        assert_eq!(Policy::load_from_file(&path).unwrap(), Policy::devnet());

        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "epochs_in_day = \"not a number\"").unwrap();
        assert!(Policy::load_from_file(&path).is_err());

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Policy::load_from_file(&missing),
            Err(PolicyError::Io(_))
        ));
    }
}
