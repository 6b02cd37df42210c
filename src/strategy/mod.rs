pub mod engine;
pub mod excess;
pub mod selection;
pub mod swap;
pub mod types;

use ethers::types::Address;

use crate::math::Amount;
use self::types::{BalanceMap, RebalanceTarget};

/// Ordered rebalance targets for the configured reserves, fetched fresh each
/// decision cycle from the portfolio manager contract.
pub trait TargetSource {
    async fn rebalance_targets(&self) -> eyre::Result<Vec<RebalanceTarget>>;
}

/// Live token balances held by the LP account. Implementations gather all
/// reads before returning so the strategy computes against one snapshot.
pub trait BalanceSource {
    async fn underlyer_balances(&self) -> eyre::Result<BalanceMap>;
    async fn reward_balance(&self, asset: Address, decimals: u32) -> eyre::Result<Amount>;
}

/// USD unit price quotes at `constants::USD_PRICE_DECIMALS`. Transient fetch
/// failures are retried by the implementation, never by the strategy.
pub trait PriceSource {
    async fn usd_price(&self, asset: Address) -> eyre::Result<Amount>;
}
