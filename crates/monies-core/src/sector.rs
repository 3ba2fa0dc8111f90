// Per-sector economic bookkeeping, assembled by the caller for one calculation.

use monies_math::{ChainEpoch, FilterEstimate, StoragePower, TokenAmount};
use serde::{Deserialize, Serialize};

use crate::reward_penalty::RewardPenaltyCalculator;

/// History inherited from a sector this one replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedSector {
    #[serde(with = "monies_math::bigint_str")]
    pub day_reward: TokenAmount,
    pub age: ChainEpoch,
}

/// Transient input bundle for termination and pledge calculations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEconomicRecord {
    /// Expected reward per day, fixed at activation.
    #[serde(with = "monies_math::bigint_str")]
    pub day_reward: TokenAmount,
    /// Epochs since activation.
    pub age: ChainEpoch,
    /// Pledge locked at activation; doubles as the 20-day reward anchor.
    #[serde(with = "monies_math::bigint_str")]
    pub initial_pledge: TokenAmount,
    #[serde(with = "monies_math::bigint_str")]
    pub qa_power: StoragePower,
    #[serde(default)]
    pub replaced: Option<ReplacedSector>,
}

impl SectorEconomicRecord {
    pub fn new(
        day_reward: TokenAmount,
        age: ChainEpoch,
        initial_pledge: TokenAmount,
        qa_power: StoragePower,
    ) -> Self {
        Self {
            day_reward,
            age,
            initial_pledge,
            qa_power,
            replaced: None,
        }
    }

    pub fn with_replaced(mut self, day_reward: TokenAmount, age: ChainEpoch) -> Self {
        self.replaced = Some(ReplacedSector { day_reward, age });
        self
    }

    /// Fee charged if this sector terminated now.
    pub fn termination_fee(
        &self,
        calc: &RewardPenaltyCalculator<'_>,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
    ) -> TokenAmount {
        let (replaced_day_reward, replaced_age) = match &self.replaced {
            Some(r) => (r.day_reward.clone(), r.age),
            None => (TokenAmount::default(), 0),
        };
        calc.pledge_penalty_for_termination(
            &self.day_reward,
            self.age,
            &self.initial_pledge,
            network_qa_power_estimate,
            &self.qa_power,
            reward_estimate,
            &replaced_day_reward,
            replaced_age,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;

    #[test]
    fn test_record_fee_matches_calculator() {
        let policy = Policy::mainnet();
        let calc = RewardPenaltyCalculator::new(&policy);
        let reward = FilterEstimate::constant(1u64 << 50);
        let power = FilterEstimate::constant(1u64 << 50);

        let day_reward = TokenAmount::from(1_000_000u64);
        let pledge = &day_reward * 20u32;
        let record = SectorEconomicRecord::new(
            day_reward.clone(),
            15 * policy.epochs_in_day,
            pledge.clone(),
            StoragePower::from(1),
        )
        .with_replaced(&day_reward * 2u32, 20 * policy.epochs_in_day);

        let direct = calc.pledge_penalty_for_termination(
            &day_reward,
            15 * policy.epochs_in_day,
            &pledge,
            &power,
            &StoragePower::from(1),
            &reward,
            &(&day_reward * 2u32),
            20 * policy.epochs_in_day,
        );
        assert_eq!(record.termination_fee(&calc, &reward, &power), direct);
        // 20M + 1M×15/2 + 2M×20/2
        assert_eq!(direct, TokenAmount::from(47_500_000u64));
    }

    #[test]
    fn test_record_without_replacement() {
        let policy = Policy::mainnet();
        let calc = RewardPenaltyCalculator::new(&policy);
        let reward = FilterEstimate::constant(1u64 << 50);
        let power = FilterEstimate::constant(1u64 << 50);
        let record = SectorEconomicRecord::new(
            TokenAmount::from(100u64),
            10 * policy.epochs_in_day,
            TokenAmount::from(2_000u64),
            StoragePower::from(1),
        );
        // lower bound for one unit of power dominates: 10,080 > 2,000 + 500
        assert_eq!(
            record.termination_fee(&calc, &reward, &power),
            TokenAmount::from(10_080u64)
        );
    }

    #[test]
    fn test_record_toml_round_trip() {
        let record = SectorEconomicRecord::new(
            TokenAmount::from(7u64),
            42,
            TokenAmount::from(140u64),
            StoragePower::from(1u64 << 36),
        )
        .with_replaced(TokenAmount::from(3u64), 9);
        let text = toml::to_string(&record).unwrap();
        let back: SectorEconomicRecord = toml::from_str(&text).unwrap();
        assert_eq!(record, back);
    }
}
