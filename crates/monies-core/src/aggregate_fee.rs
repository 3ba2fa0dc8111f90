// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SECTOR MONIES - AGGREGATE NETWORK FEE
//
// Fee burnt when many sectors are pre-committed or proven in one aggregated
// message. One curve, split between the two phases:
//   - flat per sector while the network base fee is at or below the balancer
//   - proportional to the base fee above it
//   - pre-commit pays 1/4 of the curve, prove-commit exactly 3× pre-commit
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use log::trace;
use monies_math::TokenAmount;
use num_traits::{Signed, Zero};
use std::cmp::max;

use crate::bounds::clamp_non_negative;
use crate::policy::Policy;

/// Pre-commit share of the curve.
const PRE_COMMIT_SHARE_DENOM: u64 = 4;

/// Prove-commit fee as a multiple of the pre-commit fee.
const PROVE_COMMIT_MULTIPLIER: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct AggregateFeeCalculator<'p> {
    policy: &'p Policy,
}

impl<'p> AggregateFeeCalculator<'p> {
    pub fn new(policy: &'p Policy) -> Self {
        Self { policy }
    }

    /// Network fee for pre-committing `aggregate_size` sectors in one batch:
    ///
    /// ```text
    /// n × base_fee_per_sector × max(base_fee, balancer) / (4 × balancer)
    /// ```
    /// evaluated with a single truncating division over the whole batch.
    pub fn aggregate_pre_commit_network_fee(
        &self,
        aggregate_size: u64,
        base_fee: &TokenAmount,
    ) -> TokenAmount {
        let balancer = &self.policy.batch_balancer;
        if !balancer.is_positive() {
            trace!("non-positive batch balancer; aggregate fee is zero");
            return TokenAmount::zero();
        }

        let effective_gas_fee = max(base_fee, balancer);
        let network_fee_num = &self.policy.base_fee_per_sector * aggregate_size * effective_gas_fee;
        let network_fee_den = balancer * PRE_COMMIT_SHARE_DENOM;
        clamp_non_negative(network_fee_num / network_fee_den)
    }

    /// Network fee for proving `aggregate_size` sectors with one aggregate
    /// proof. Always exactly three times the pre-commit fee for the same batch.
    pub fn aggregate_prove_commit_network_fee(
        &self,
        aggregate_size: u64,
        base_fee: &TokenAmount,
    ) -> TokenAmount {
        self.aggregate_pre_commit_network_fee(aggregate_size, base_fee) * PROVE_COMMIT_MULTIPLIER
    }
}
