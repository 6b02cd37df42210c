use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;
use eyre::Result;
use tracing::info;

use index_treasury_bot::coingecko::CoinGecko;
use index_treasury_bot::config::Config;
use index_treasury_bot::constants;
use index_treasury_bot::error::{self, StrategyError};
use index_treasury_bot::logging;
use index_treasury_bot::lpaccount::LpAccount;
use index_treasury_bot::registry::{ReserveRegistry, SwapRegistry};
use index_treasury_bot::strategy::swap::Harvester;
use index_treasury_bot::wallet::{self, WalletManager};

/// Runs one harvest cycle: claim accrued rewards from every zap with an LP
/// balance, then swap each reward token that is worth swapping.
#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let cfg = Config::load();
    info!(mode = %cfg.mode, "Starting harvest cycle");

    let reserves = Arc::new(ReserveRegistry::mainnet()?);
    let wallet_manager = WalletManager::new(&cfg)?;
    let lp_account = LpAccount::new(
        Address::from_str(constants::LP_ACCOUNT_ADDRESS)?,
        wallet_manager.signer.clone(),
        reserves.clone(),
    );
    let price_source = CoinGecko::new(cfg.http_client.clone());
    let harvester = Harvester::new(
        lp_account.clone(),
        price_source,
        SwapRegistry::mainnet()?,
        constants::MIN_SWAP_USD,
    );

    let claimable = lp_account.plan_claim().await?;
    if claimable.is_empty() {
        info!("No zaps with LP balances to claim from");
    } else {
        let receipt = wallet::send_call(lp_account.claim_tx(claimable.clone())).await?;
        info!(
            tx_hash = ?receipt.transaction_hash,
            zaps = ?claimable,
            "Claimed rewards"
        );
    }

    for symbol in harvester.symbols() {
        match harvester.plan_swap(&symbol).await {
            Ok(instruction) => {
                let amount = instruction.amount.to_u256().map_err(StrategyError::Math)?;
                let min_amount = instruction.min_amount.to_u256().map_err(StrategyError::Math)?;
                let receipt = wallet::send_call(lp_account.swap_tx(
                    instruction.zap_name.clone(),
                    amount,
                    min_amount,
                ))
                .await?;
                info!(
                    tx_hash = ?receipt.transaction_hash,
                    symbol = %symbol,
                    zap_name = %instruction.zap_name,
                    amount = %instruction.amount,
                    min_amount = %instruction.min_amount,
                    "Swapped reward tokens"
                );
            }
            Err(report) => match error::as_operational(&report) {
                Some(outcome) => info!(symbol = %symbol, outcome = %outcome, "Skipping reward swap"),
                None => return Err(report),
            },
        }
    }

    Ok(())
}
