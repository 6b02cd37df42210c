use std::str::FromStr;
use std::sync::Arc;

use ethers::types::Address;
use eyre::Result;
use tracing::info;

use index_treasury_bot::config::Config;
use index_treasury_bot::constants;
use index_treasury_bot::error;
use index_treasury_bot::logging;
use index_treasury_bot::lpaccount::LpAccount;
use index_treasury_bot::mapt::Mapt;
use index_treasury_bot::registry::{PositionRegistry, ReserveRegistry};
use index_treasury_bot::strategy::engine::Strategy;
use index_treasury_bot::wallet::{self, WalletManager};

/// Runs one rebalance cycle: find the reserve underlyer with the largest
/// excess over its rebalance target and deploy it into the index position.
#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();
    let cfg = Config::load();
    info!(mode = %cfg.mode, "Starting rebalance cycle");

    let reserves = Arc::new(ReserveRegistry::mainnet()?);
    let positions = PositionRegistry::mainnet(&reserves)?;
    let wallet_manager = WalletManager::new(&cfg)?;

    let lp_account = LpAccount::new(
        Address::from_str(constants::LP_ACCOUNT_ADDRESS)?,
        wallet_manager.signer.clone(),
        reserves.clone(),
    );
    let mapt = Mapt::new(
        Address::from_str(constants::MAPT_ADDRESS)?,
        wallet_manager.signer.clone(),
        reserves.clone(),
    );
    let strategy = Strategy::new(mapt, lp_account.clone(), reserves.clone());

    match strategy.next_balance_amount().await {
        Ok(next) => {
            let (name, amounts) =
                positions.deploy_params(constants::DEFAULT_INDEX_POSITION, &next)?;
            let receipt = wallet::send_call(lp_account.deploy_tx(name, amounts)).await?;
            info!(
                tx_hash = ?receipt.transaction_hash,
                asset = ?next.asset,
                amount = %next.amount,
                "Deployed reserve excess into index position"
            );
        }
        Err(report) => match error::as_operational(&report) {
            Some(outcome) => info!(outcome = %outcome, "No rebalance this cycle"),
            None => return Err(report),
        },
    }

    Ok(())
}
