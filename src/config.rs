use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use ethers::providers::{Provider, Http};
use reqwest::Client;

pub struct Config {
    pub provider: Arc<Provider<Http>>,
    pub wallet_private_key: String,
    pub chain_id: u64,
    pub http_client: Client,
    pub mode: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let mode = env::var("MODE").unwrap_or_else(|_| "test".to_string());

        let rpc_url = match mode.as_str() {
            "test" => env::var("ETH_RPC_URL_TEST").expect("Missing ETH_RPC_URL_TEST"),
            "prod" => env::var("ETH_RPC_URL_PROD").expect("Missing ETH_RPC_URL_PROD"),
            _ => panic!("Invalid MODE value (must be 'test' or 'prod')"),
        };

        let wallet_private_key = match mode.as_str() {
            "test" => env::var("WALLET_PRIVATE_KEY_TEST").expect("Missing WALLET_PRIVATE_KEY_TEST"),
            "prod" => env::var("WALLET_PRIVATE_KEY_PROD").expect("Missing WALLET_PRIVATE_KEY_PROD"),
            _ => panic!("Invalid MODE"),
        };

        let chain_id = env::var("CHAIN_ID")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(1);

        let provider = Provider::<Http>::try_from(rpc_url)
            .expect("Failed to create RPC provider");

        let http_client = Client::new();

        Config {
            provider: Arc::new(provider),
            wallet_private_key,
            chain_id,
            http_client,
            mode,
        }
    }
}
