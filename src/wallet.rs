use ethers::prelude::*;
use ethers::signers::Signer as _;
use std::str::FromStr;
use std::sync::Arc;
use eyre::Result;
use tracing::debug;

use crate::config::Config;

pub type Signer = SignerMiddleware<Arc<Provider<Http>>, LocalWallet>;

pub struct WalletManager {
    pub signer: Arc<Signer>,
    pub address: Address,
}

impl WalletManager {
    pub fn new(config: &Config) -> Result<Self> {
        let signer = Self::get_wallet_signer(config)?;
        Ok(Self {
            signer: Arc::new(signer.clone()),
            address: signer.address(),
        })
    }

    /// Returns a Wallet + Provider combo as a `SignerMiddleware`
    fn get_wallet_signer(config: &Config) -> Result<Signer> {
        // Load wallet from private key
        let wallet = LocalWallet::from_str(&config.wallet_private_key)?
            .with_chain_id(config.chain_id);

        // Use already-built provider (already Arc-wrapped)
        let provider = config.provider.clone();

        // Combine wallet and provider
        let client = SignerMiddleware::new(provider, wallet);
        Ok(client)
    }
}

/// Sends a prepared contract call and waits for its receipt, failing on a
/// reverted or missing receipt.
pub async fn send_call<M, D>(call: ContractCall<M, D>) -> Result<TransactionReceipt>
where
    M: Middleware + 'static,
    D: ethers::abi::Detokenize,
{
    let pending = call.send().await?;
    let tx_hash = pending.tx_hash();
    debug!(tx_hash = %tx_hash, "Transaction sent, waiting for confirmation");

    match pending.await? {
        Some(receipt) => {
            if receipt.status == Some(U64::from(1)) {
                Ok(receipt)
            } else {
                Err(eyre::eyre!("Transaction failed: {:?}", receipt))
            }
        }
        None => Err(eyre::eyre!("Transaction receipt not found")),
    }
}
