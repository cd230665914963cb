//! Currency arithmetic for rolls, sales, and daily claims.

use crate::bonus::BonusTotals;

/// Cost of a single roll, in coins
pub const ROLL_COST: i64 = 100;

/// Base daily reward before the currency multiplier, in coins
pub const DAILY_BASE: i64 = 250;

/// Error type for balance checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    /// Balance below the required cost. Surfaced before any mutation.
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },
}

/// Fail fast when a balance cannot cover a cost. No mutation happens here.
pub fn ensure_funds(available: i64, needed: i64) -> Result<(), EconomyError> {
    if available < needed {
        return Err(EconomyError::InsufficientFunds { needed, available });
    }
    Ok(())
}

/// Sale payout for one copy, with the currency multiplier applied
/// (rounded down).
pub fn sale_value(base_value: i64, totals: &BonusTotals) -> i64 {
    (base_value as f64 * totals.currency_multiplier).floor() as i64
}

/// Daily reward with the currency multiplier applied (rounded down).
pub fn daily_reward(totals: &BonusTotals) -> i64 {
    (DAILY_BASE as f64 * totals.currency_multiplier).floor() as i64
}
