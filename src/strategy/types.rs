use std::collections::HashMap;

use ethers::types::Address;

use crate::math::Amount;

/// Current holdings per underlyer token, supplied fresh each decision cycle.
pub type BalanceMap = HashMap<Address, Amount>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetAmount {
    pub asset: Address,
    pub amount: Amount,
}

/// The amount the portfolio manager wants moved for one reserve pool, in the
/// reserve underlyer's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalanceTarget {
    pub reserve: Address,
    pub amount: Amount,
}

/// Static per-reward-token swap configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SwapSpec {
    pub zap_name: String,
    pub asset: Address,
    pub in_decimals: u32,
    pub out_decimals: u32,
    /// Slippage fraction at `constants::SLIPPAGE_DECIMALS`, e.g. "0.05".
    pub slippage: Amount,
}

/// A sized swap ready to be turned into an on-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapInstruction {
    pub zap_name: String,
    /// Reward-token amount to swap, in input-token decimals.
    pub amount: Amount,
    /// Minimum acceptable output, in output-token decimals.
    pub min_amount: Amount,
}
