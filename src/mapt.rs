use std::sync::Arc;

use ethers::prelude::*;
use eyre::Result;
use tracing::{debug, instrument};

use crate::error::StrategyError;
use crate::math::Amount;
use crate::registry::ReserveRegistry;
use crate::strategy::types::RebalanceTarget;
use crate::strategy::TargetSource;

abigen!(
    MetaPoolTokenContract,
    r#"[
        function getRebalanceReserveAmounts() external view returns (address[], int256[])
    ]"#
);

/// Client for the portfolio manager token contract, which publishes how much
/// each reserve pool should move this cycle. Amounts are signed: a reserve
/// can be owed funds as well as hold excess.
#[derive(Clone)]
pub struct Mapt<M> {
    contract: MetaPoolTokenContract<M>,
    reserves: Arc<ReserveRegistry>,
}

impl<M: Middleware + 'static> Mapt<M> {
    pub fn new(address: Address, client: Arc<M>, reserves: Arc<ReserveRegistry>) -> Self {
        Self {
            contract: MetaPoolTokenContract::new(address, client),
            reserves,
        }
    }

    /// Ordered rebalance targets, scaled to each reserve underlyer's
    /// decimals. A published reserve missing from the registry is a
    /// configuration error, surfaced here before the strategy runs.
    #[instrument(skip(self))]
    pub async fn fetch_rebalance_targets(&self) -> Result<Vec<RebalanceTarget>> {
        let (pools, amounts) = self.contract.get_rebalance_reserve_amounts().call().await?;
        if pools.len() != amounts.len() {
            eyre::bail!(
                "rebalance amount arrays disagree: {} pools vs {} amounts",
                pools.len(),
                amounts.len()
            );
        }
        let targets = pools
            .into_iter()
            .zip(amounts)
            .map(|(pool, raw)| {
                let entry = self
                    .reserves
                    .get(&pool)
                    .ok_or(StrategyError::UnknownReserve(pool))?;
                Ok(RebalanceTarget {
                    reserve: pool,
                    amount: Amount::new(raw, entry.underlyer_decimals),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(target_count = targets.len(), "Fetched rebalance targets");
        Ok(targets)
    }
}

impl<M: Middleware + 'static> TargetSource for Mapt<M> {
    async fn rebalance_targets(&self) -> Result<Vec<RebalanceTarget>> {
        self.fetch_rebalance_targets().await
    }
}
