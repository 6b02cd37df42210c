use std::collections::HashMap;

use ethers::types::Address;
use eyre::{eyre, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, instrument, warn};

use crate::constants::{COINGECKO_PRICE_ENDPOINT, USD_PRICE_DECIMALS};
use crate::error::StrategyError;
use crate::math::Amount;
use crate::strategy::PriceSource;

#[derive(Debug, Clone, Deserialize)]
struct TokenQuote {
    usd: Decimal,
}

/// CoinGecko simple-price client. Quotes come back as exact decimals and are
/// truncated to `USD_PRICE_DECIMALS` before entering the core; no value ever
/// passes through binary floating point.
pub struct CoinGecko {
    client: Client,
    endpoint: String,
}

impl CoinGecko {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: COINGECKO_PRICE_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Fetches the USD unit price with retry and linear backoff. Retry lives
    /// here, around the HTTP call; the strategy itself never retries.
    #[instrument(skip(self))]
    pub async fn token_price(&self, asset: Address) -> Result<Amount> {
        const MAX_RETRIES: u32 = 3;
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.try_fetch_price(asset).await {
                Ok(price) => return Ok(price),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < MAX_RETRIES {
                        let delay_ms = attempt * 500; // Linear backoff: 500ms, 1000ms
                        warn!(
                            attempt = attempt,
                            delay_ms = delay_ms,
                            error = %last_error.as_ref().unwrap(),
                            "Failed to fetch token price, retrying after delay"
                        );
                        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms as u64)).await;
                    }
                }
            }
        }

        error!(
            attempts = MAX_RETRIES,
            error = %last_error.as_ref().unwrap(),
            "Failed to fetch token price after all retries"
        );
        Err(last_error.unwrap())
    }

    async fn try_fetch_price(&self, asset: Address) -> Result<Amount> {
        let address = format!("{asset:#x}");
        let res = self
            .client
            .get(&self.endpoint)
            .query(&[("contract_addresses", address.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?;
        let quotes: HashMap<String, TokenQuote> = res.json().await?;
        let quote = quotes
            .get(&address)
            .ok_or_else(|| eyre!("no USD quote for token {address}"))?;

        let truncated = quote.usd.trunc_with_scale(USD_PRICE_DECIMALS);
        let price = Amount::parse(&truncated.to_string(), USD_PRICE_DECIMALS)
            .map_err(StrategyError::Math)?;
        Ok(price)
    }
}

impl PriceSource for CoinGecko {
    async fn usd_price(&self, asset: Address) -> Result<Amount> {
        self.token_price(asset).await
    }
}
