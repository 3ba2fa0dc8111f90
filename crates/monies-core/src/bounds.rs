// Clamp, floor and cap helpers shared by the composite formulas.

use monies_math::{ChainEpoch, TokenAmount};
use num_traits::{One, Signed, Zero};

/// Negative amounts become zero.
pub fn clamp_non_negative(value: TokenAmount) -> TokenAmount {
    if value.is_negative() {
        TokenAmount::zero()
    } else {
        value
    }
}

/// Amounts ≤ 0 become exactly 1 atto.
pub fn floor_at_one(value: TokenAmount) -> TokenAmount {
    if value.is_positive() {
        value
    } else {
        TokenAmount::one()
    }
}

/// Split a lifetime cap between a sector's own age and the age it inherited
/// from a replaced predecessor.
///
/// The current segment is capped first; the replaced segment only fills what
/// is left. Negative ages count as zero. Returns `(current, replaced)`, whose
/// sum never exceeds `cap_epochs`.
pub fn apportion_age(
    sector_age: ChainEpoch,
    replaced_sector_age: ChainEpoch,
    cap_epochs: ChainEpoch,
) -> (ChainEpoch, ChainEpoch) {
    let cap = cap_epochs.max(0);
    let capped_age = sector_age.clamp(0, cap);
    let remaining = (cap - capped_age).max(0);
    let capped_replaced_age = replaced_sector_age.clamp(0, remaining);
    (capped_age, capped_replaced_age)
}
