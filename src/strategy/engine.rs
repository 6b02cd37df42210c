use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info, instrument};

use crate::error::StrategyError;
use crate::registry::ReserveRegistry;

use super::excess::net_excess;
use super::selection::largest_amount;
use super::types::AssetAmount;
use super::{BalanceSource, TargetSource};

/// One decision cycle over live targets and balances: which underlyer has the
/// largest deployable excess, and how much of it.
pub struct Strategy<T, B> {
    target_source: T,
    balance_source: B,
    reserves: Arc<ReserveRegistry>,
}

impl<T, B> Strategy<T, B>
where
    T: TargetSource,
    B: BalanceSource,
{
    pub fn new(target_source: T, balance_source: B, reserves: Arc<ReserveRegistry>) -> Self {
        Self {
            target_source,
            balance_source,
            reserves,
        }
    }

    /// The single highest-priority rebalance instruction for this cycle.
    ///
    /// Both collaborator reads are gathered before any computation so the
    /// decision is made against one logically-atomic snapshot. When no
    /// reserve is in excess the cycle ends with the operational
    /// `NoRebalanceCandidate` outcome rather than a fault.
    #[instrument(skip(self))]
    pub async fn next_balance_amount(&self) -> Result<AssetAmount> {
        let (targets, balances) = tokio::try_join!(
            self.target_source.rebalance_targets(),
            self.balance_source.underlyer_balances(),
        )?;
        debug!(
            target_count = targets.len(),
            balance_count = balances.len(),
            "Gathered rebalance snapshot"
        );

        let excess = net_excess(&targets, &balances, &self.reserves)?;
        if excess.is_empty() {
            return Err(StrategyError::NoRebalanceCandidate.into());
        }
        let next = largest_amount(&excess)?;
        info!(
            asset = ?next.asset,
            amount = %next.amount,
            candidate_count = excess.len(),
            "Selected reserve excess for deployment"
        );
        Ok(next)
    }
}
