use crate::error::StrategyError;

use super::types::AssetAmount;

/// Returns the entry with the largest raw amount. Amounts are compared in
/// native token units regardless of decimals, matching how the reserve
/// targets are quoted. Ties keep the first occurrence, so the result is
/// deterministic for any input order.
pub fn largest_amount(amounts: &[AssetAmount]) -> Result<AssetAmount, StrategyError> {
    let mut iter = amounts.iter();
    let mut largest = iter.next().ok_or(StrategyError::EmptySelection)?;
    for candidate in iter {
        if candidate.amount.raw() > largest.amount.raw() {
            largest = candidate;
        }
    }
    Ok(*largest)
}
