use std::sync::Arc;

use ethers::contract::ContractCall;
use ethers::prelude::*;
use eyre::Result;
use futures::future::{join_all, try_join_all};
use tracing::{debug, instrument, warn};

use crate::error::StrategyError;
use crate::math::Amount;
use crate::registry::ReserveRegistry;
use crate::strategy::types::BalanceMap;
use crate::strategy::BalanceSource;

abigen!(
    LpAccountContract,
    r#"[
        function zapNames() external view returns (string[])
        function getLpTokenBalance(string name) external view returns (uint256)
        function claim(string[] names)
        function swap(string name, uint256 amount, uint256 minAmount)
        function deployStrategy(string name, uint256[] amounts)
    ]"#
);

abigen!(
    IERC20,
    r#"[
        function balanceOf(address owner) external view returns (uint256)
    ]"#
);

/// Keeps the zap names whose LP balance is positive; those are the positions
/// with rewards worth claiming. The two lists come from paired contract reads
/// and must line up.
pub fn claim_names(zap_names: Vec<String>, lp_balances: &[U256]) -> Result<Vec<String>, StrategyError> {
    if zap_names.len() != lp_balances.len() {
        return Err(StrategyError::ClaimListMismatch {
            names: zap_names.len(),
            balances: lp_balances.len(),
        });
    }
    Ok(zap_names
        .into_iter()
        .zip(lp_balances)
        .filter(|(_, balance)| **balance > U256::zero())
        .map(|(name, _)| name)
        .collect())
}

/// Client for the LP account contract that custodies the index's reserves.
/// All reads for one decision cycle are gathered before returning, so the
/// strategy sees a single consistent snapshot.
#[derive(Clone)]
pub struct LpAccount<M> {
    contract: LpAccountContract<M>,
    client: Arc<M>,
    reserves: Arc<ReserveRegistry>,
}

impl<M: Middleware + 'static> LpAccount<M> {
    pub fn new(address: Address, client: Arc<M>, reserves: Arc<ReserveRegistry>) -> Self {
        Self {
            contract: LpAccountContract::new(address, client.clone()),
            client,
            reserves,
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Balances of every configured reserve underlyer held by the LP account,
    /// read concurrently and returned as one snapshot.
    #[instrument(skip(self))]
    pub async fn underlyer_balances_snapshot(&self) -> Result<BalanceMap> {
        let account = self.address();
        let reads = self.reserves.iter().map(|(_, entry)| {
            let token = IERC20::new(entry.underlyer, self.client.clone());
            let underlyer = entry.underlyer;
            let decimals = entry.underlyer_decimals;
            async move {
                let balance = token.balance_of(account).call().await?;
                let amount = Amount::from_u256(balance, decimals).map_err(StrategyError::Math)?;
                Ok::<_, eyre::Report>((underlyer, amount))
            }
        });
        let entries = try_join_all(reads).await?;
        debug!(balance_count = entries.len(), "Fetched underlyer balance snapshot");
        Ok(entries.into_iter().collect())
    }

    #[instrument(skip(self))]
    pub async fn reward_token_balance(&self, asset: Address, decimals: u32) -> Result<Amount> {
        let token = IERC20::new(asset, self.client.clone());
        let balance = token.balance_of(self.address()).call().await?;
        let amount = Amount::from_u256(balance, decimals).map_err(StrategyError::Math)?;
        debug!(asset = ?asset, balance = %amount, "Fetched reward token balance");
        Ok(amount)
    }

    pub async fn zap_names(&self) -> Result<Vec<String>> {
        Ok(self.contract.zap_names().call().await?)
    }

    /// Per-zap LP token balances in zap order. A zap that cannot report a
    /// balance is treated as zero so one retired zap does not block claiming
    /// from the rest.
    pub async fn lp_balances(&self, names: &[String]) -> Vec<U256> {
        let reads = names.iter().map(|name| {
            let call = self.contract.get_lp_token_balance(name.clone());
            let name = name.clone();
            async move {
                match call.call().await {
                    Ok(balance) => balance,
                    Err(err) => {
                        warn!(zap = %name, error = ?err, "LP balance read failed, treating as zero");
                        U256::zero()
                    }
                }
            }
        });
        join_all(reads).await
    }

    /// The zap names worth claiming from this cycle.
    #[instrument(skip(self))]
    pub async fn plan_claim(&self) -> Result<Vec<String>> {
        let names = self.zap_names().await?;
        let balances = self.lp_balances(&names).await;
        Ok(claim_names(names, &balances)?)
    }

    pub fn claim_tx(&self, names: Vec<String>) -> ContractCall<M, ()> {
        self.contract.claim(names)
    }

    pub fn swap_tx(&self, name: String, amount: U256, min_amount: U256) -> ContractCall<M, ()> {
        self.contract.swap(name, amount, min_amount)
    }

    pub fn deploy_tx(&self, name: String, amounts: Vec<U256>) -> ContractCall<M, ()> {
        self.contract.deploy_strategy(name, amounts)
    }
}

impl<M: Middleware + 'static> BalanceSource for LpAccount<M> {
    async fn underlyer_balances(&self) -> Result<BalanceMap> {
        self.underlyer_balances_snapshot().await
    }

    async fn reward_balance(&self, asset: Address, decimals: u32) -> Result<Amount> {
        self.reward_token_balance(asset, decimals).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_zaps_with_positive_lp_balance() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let balances = [U256::zero(), U256::from(5), U256::from(1)];
        assert_eq!(claim_names(names, &balances).unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn mismatched_list_lengths_are_rejected() {
        let names = vec!["a".to_string(), "b".to_string()];
        let balances = [U256::from(1)];
        assert!(matches!(
            claim_names(names, &balances),
            Err(StrategyError::ClaimListMismatch { names: 2, balances: 1 })
        ));
    }

    #[test]
    fn no_claimable_zaps_yields_an_empty_list() {
        let names = vec!["a".to_string()];
        assert!(claim_names(names, &[U256::zero()]).unwrap().is_empty());
    }
}
