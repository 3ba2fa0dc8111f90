// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SECTOR MONIES - REWARD & PENALTY CALCULATOR
//
// Expected block reward attributable to a sector's power, and everything
// derived from it: fault fees, termination fees, initial pledge and
// pre-commit deposit.
//
// Precision rules:
//   - multiply every numerator before the single division / shift
//   - amounts are clamped at zero; pledge-like amounts are floored at 1 atto
//   - age is truncated to whole days before it is multiplied
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use log::trace;
use monies_math::{ChainEpoch, FilterEstimate, StoragePower, TokenAmount, PRECISION};
use num_traits::{Signed, Zero};
use std::cmp::{max, min};

use crate::bounds::{apportion_age, clamp_non_negative, floor_at_one};
use crate::policy::Policy;

// ─────────────────────────────────────────────────────────────────
// EXPECTED REWARD
// ─────────────────────────────────────────────────────────────────

/// Expected reward earned by `qa_sector_power` over `projection_duration`
/// epochs: the integrated reward-rate trend, scaled by the sector's share of
/// the projected network power.
///
/// Zero when the sector has no power, or when the network power estimate is
/// non-positive now or at the end of the window. Never negative.
pub fn expected_reward_for_power(
    reward_estimate: &FilterEstimate,
    network_qa_power_estimate: &FilterEstimate,
    qa_sector_power: &StoragePower,
    projection_duration: ChainEpoch,
) -> TokenAmount {
    if !qa_sector_power.is_positive() {
        return TokenAmount::zero();
    }

    if !network_qa_power_estimate.estimate().is_positive()
        || !network_qa_power_estimate
            .extrapolate(projection_duration)
            .is_positive()
    {
        trace!(
            "network power projects non-positive within {} epochs; expected reward is zero",
            projection_duration
        );
        return TokenAmount::zero();
    }

    let expected_reward_for_period = FilterEstimate::extrapolated_cum_sum_of_ratio(
        projection_duration,
        reward_estimate,
        network_qa_power_estimate,
    );

    // Q.0 * Q.128 => Q.128 => Q.0
    let br = (qa_sector_power * expected_reward_for_period) >> PRECISION;
    if br.is_negative() {
        trace!("expected reward {} clamped to zero", br);
    }
    clamp_non_negative(br)
}

/// As [`expected_reward_for_power`], but never below 1 atto so downstream
/// formulas always see a strictly positive anchor.
pub fn expected_reward_for_power_clamped_at_atto_fil(
    reward_estimate: &FilterEstimate,
    network_qa_power_estimate: &FilterEstimate,
    qa_sector_power: &StoragePower,
    projection_duration: ChainEpoch,
) -> TokenAmount {
    floor_at_one(expected_reward_for_power(
        reward_estimate,
        network_qa_power_estimate,
        qa_sector_power,
        projection_duration,
    ))
}

// ─────────────────────────────────────────────────────────────────
// POLICY-BOUND CALCULATOR
// ─────────────────────────────────────────────────────────────────

/// Penalty, pledge and deposit formulas evaluated against one [`Policy`].
#[derive(Debug, Clone, Copy)]
pub struct RewardPenaltyCalculator<'p> {
    policy: &'p Policy,
}

impl<'p> RewardPenaltyCalculator<'p> {
    pub fn new(policy: &'p Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'p Policy {
        self.policy
    }

    /// Expected reward forfeited per period of an undeclared, continued fault.
    pub fn pledge_penalty_for_continued_fault(
        &self,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
        qa_sector_power: &StoragePower,
    ) -> TokenAmount {
        expected_reward_for_power(
            reward_estimate,
            network_qa_power_estimate,
            qa_sector_power,
            self.policy.continued_fault_projection_period,
        )
    }

    /// Minimum termination fee: walking away silently must never be cheaper
    /// than declaring the termination.
    pub fn pledge_penalty_for_termination_lower_bound(
        &self,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
        qa_sector_power: &StoragePower,
    ) -> TokenAmount {
        expected_reward_for_power(
            reward_estimate,
            network_qa_power_estimate,
            qa_sector_power,
            self.policy.termination_penalty_lower_bound_projection_period,
        )
    }

    /// Termination fee:
    ///
    /// ```text
    /// max(lower_bound,
    ///     twenty_day_reward
    ///       + day_reward          × days(capped_age)          × factor
    ///       + replaced_day_reward × days(capped_replaced_age) × factor)
    /// ```
    ///
    /// The replaced sector's age only fills whatever lifetime cap the
    /// current sector's own age leaves unused. A zero `(replaced_day_reward,
    /// replaced_sector_age)` pair means no replacement history.
    #[allow(clippy::too_many_arguments)]
    pub fn pledge_penalty_for_termination(
        &self,
        day_reward: &TokenAmount,
        sector_age: ChainEpoch,
        twenty_day_reward_at_activation: &TokenAmount,
        network_qa_power_estimate: &FilterEstimate,
        qa_sector_power: &StoragePower,
        reward_estimate: &FilterEstimate,
        replaced_day_reward: &TokenAmount,
        replaced_sector_age: ChainEpoch,
    ) -> TokenAmount {
        let (capped_age, capped_replaced_age) = apportion_age(
            sector_age,
            replaced_sector_age,
            self.policy.termination_lifetime_cap_epochs(),
        );

        let fee_base = twenty_day_reward_at_activation
            + self.termination_segment_penalty(day_reward, capped_age)
            + self.termination_segment_penalty(replaced_day_reward, capped_replaced_age);

        let lower_bound = self.pledge_penalty_for_termination_lower_bound(
            reward_estimate,
            network_qa_power_estimate,
            qa_sector_power,
        );

        if fee_base < lower_bound {
            trace!(
                "termination fee base {} below lower bound {}; charging lower bound",
                fee_base,
                lower_bound
            );
            return lower_bound;
        }
        fee_base
    }

    /// `day_reward × whole_days(age) × factor`, one truncating division.
    fn termination_segment_penalty(&self, day_reward: &TokenAmount, age: ChainEpoch) -> TokenAmount {
        let days = self.policy.whole_days(age);
        let factor = &self.policy.termination_reward_factor;
        (day_reward * days * factor.numerator()) / factor.denominator()
    }

    /// Collateral required to activate a sector.
    ///
    /// The reward component is expected reward over the initial pledge
    /// window (floored at 1 atto). The consensus component is the sector's
    /// share of `lock_target × circulating_supply`, where the share's
    /// denominator is the larger of network power, baseline power and the
    /// sector's own power, so it never exceeds the lock target. The total is
    /// capped per byte of power and floored at 1 atto.
    pub fn initial_pledge_for_power(
        &self,
        qa_power: &StoragePower,
        baseline_power: &StoragePower,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
        circulating_supply: &TokenAmount,
    ) -> TokenAmount {
        let ip_base = expected_reward_for_power_clamped_at_atto_fil(
            reward_estimate,
            network_qa_power_estimate,
            qa_power,
            self.policy.initial_pledge_projection_period,
        );

        let lock_target = &self.policy.initial_pledge_lock_target;
        let network_qa_power = network_qa_power_estimate.estimate();
        let pledge_share_denom = max(max(network_qa_power, baseline_power.clone()), qa_power.clone());

        let additional_ip = if pledge_share_denom.is_positive() {
            let num = lock_target.numerator() * circulating_supply * qa_power;
            let denom = lock_target.denominator() * pledge_share_denom;
            clamp_non_negative(num / denom)
        } else {
            TokenAmount::zero()
        };

        let nominal_pledge = ip_base + additional_ip;
        let space_race_pledge_cap = &self.policy.initial_pledge_max_per_byte * qa_power;

        let pledge = min(nominal_pledge, space_race_pledge_cap);
        if !pledge.is_positive() {
            trace!("initial pledge {} floored at 1 atto", pledge);
        }
        floor_at_one(pledge)
    }

    /// Deposit held between pre-commit and prove-commit.
    pub fn pre_commit_deposit_for_power(
        &self,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
        qa_sector_power: &StoragePower,
    ) -> TokenAmount {
        expected_reward_for_power_clamped_at_atto_fil(
            reward_estimate,
            network_qa_power_estimate,
            qa_sector_power,
            self.policy.pre_commit_deposit_projection_period,
        )
    }

    // ─────────────────────────────────────────────────────────────
    // DISPUTES, CONSENSUS FAULTS, REWARD VESTING
    // ─────────────────────────────────────────────────────────────

    /// Penalty for a window PoSt proven invalid by a dispute: expected
    /// reward over the invalid-PoSt window plus a flat base penalty.
    pub fn pledge_penalty_for_invalid_window_post(
        &self,
        reward_estimate: &FilterEstimate,
        network_qa_power_estimate: &FilterEstimate,
        qa_sector_power: &StoragePower,
    ) -> TokenAmount {
        expected_reward_for_power(
            reward_estimate,
            network_qa_power_estimate,
            qa_sector_power,
            self.policy.invalid_window_post_projection_period,
        ) + &self.policy.base_penalty_for_disputed_window_post
    }

    /// Reward paid to whoever successfully disputes a window PoSt.
    pub fn reward_for_disputed_window_post(&self) -> TokenAmount {
        self.policy.base_reward_for_disputed_window_post.clone()
    }

    /// `consensus_fault_factor` times the expected per-leader block reward.
    pub fn consensus_fault_penalty(&self, this_epoch_reward: &TokenAmount) -> TokenAmount {
        let penalty = (this_epoch_reward * self.policy.consensus_fault_factor)
            / self.policy.expected_leaders_per_epoch.max(1);
        clamp_non_negative(penalty)
    }

    /// Split a block reward into `(locked, unlocked)`; the locked part vests.
    pub fn locked_reward_from_reward(&self, reward: &TokenAmount) -> (TokenAmount, TokenAmount) {
        let reward = clamp_non_negative(reward.clone());
        let locked = self.policy.locked_reward_factor.apply(&reward);
        let unlocked = &reward - &locked;
        (locked, unlocked)
    }
}
