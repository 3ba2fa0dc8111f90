// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SECTOR MONIES - CORE MODULE
//
// Pure economic calculators for a storage-mining actor: expected reward
// share, fault and termination penalties, pledge and deposit requirements,
// and the batched network fee for aggregated pre-commit / prove-commit.
//
// All token math is arbitrary-precision integer (atto units). Nothing here
// holds state between calls; the caller owns the ledger and applies the
// returned amounts as debits or credits.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use lazy_static::lazy_static;

pub mod aggregate_fee;
pub mod bounds;
pub mod policy;
pub mod reward_penalty;
pub mod sector;

pub use aggregate_fee::AggregateFeeCalculator;
pub use monies_math::{BigFrac, ChainEpoch, FilterEstimate, StoragePower, TokenAmount};
pub use policy::{Policy, PolicyError};
pub use reward_penalty::{
    expected_reward_for_power, expected_reward_for_power_clamped_at_atto_fil,
    RewardPenaltyCalculator,
};
pub use sector::{ReplacedSector, SectorEconomicRecord};

/// 1 token = 10^18 atto
pub const TOKEN_PRECISION: u64 = 1_000_000_000_000_000_000;

/// 1 nano-token = 10^9 atto
pub const NANO_PRECISION: u64 = 1_000_000_000;

/// Mainnet block time is 30s: 2 per minute × 60 × 24
pub const EPOCHS_IN_DAY: ChainEpoch = 2 * 60 * 24;

/// Expected number of block producers per epoch on mainnet
pub const EXPECTED_LEADERS_PER_EPOCH: u64 = 5;

lazy_static! {
    /// One whole token in atto units
    pub static ref ONE_FIL: TokenAmount = TokenAmount::from(TOKEN_PRECISION);

    /// One nano-token in atto units
    pub static ref ONE_NANO_FIL: TokenAmount = TokenAmount::from(NANO_PRECISION);
}
