// Mainnet addresses and fixed decimal scales for the index treasury.

// Protocol contracts
pub const LP_ACCOUNT_ADDRESS: &str = "0xE08Ee4C1b248464aAcC5c0130247b1B9d9e6005E";
pub const MAPT_ADDRESS: &str = "0xdc9eff7bb202fd60de3f049c7ec1efb08006261f";

// Reserve pools
pub const DAI_RESERVE_POOL_ADDRESS: &str = "0x75ce0e501e2e6776fcaaa514f394a88a772a8970";
pub const USDC_RESERVE_POOL_ADDRESS: &str = "0xe18b0365d5d09f394f84ee56ed29dd2d8d6fba5f";
pub const USDT_RESERVE_POOL_ADDRESS: &str = "0xea9c5a2717d5ab75afaac340151e73a7e37d99a7";

// Reserve underlyers
pub const DAI_ADDRESS: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
pub const USDC_ADDRESS: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const USDT_ADDRESS: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

// Reward tokens
pub const CRV_ADDRESS: &str = "0xD533a949740bb3306d119CC777fa900bA034cd52";
pub const CVX_ADDRESS: &str = "0x4e3FBD56CD56c3e72c1403e103b45Db9da5B9D2B";

pub const DAI_DECIMALS: u32 = 18;
pub const USDC_DECIMALS: u32 = 6;
pub const USDT_DECIMALS: u32 = 6;
pub const REWARD_TOKEN_DECIMALS: u32 = 18;

/// USD unit prices are quoted at this scale throughout the crate.
pub const USD_PRICE_DECIMALS: u32 = 8;
/// Slippage fractions are fixed at 4 fractional digits (basis-point units).
pub const SLIPPAGE_DECIMALS: u32 = 4;
/// Swap slippage tolerance as a decimal literal, parsed at `SLIPPAGE_DECIMALS`.
pub const SWAP_SLIPPAGE: &str = "0.05";
/// Reward swaps worth less than this many whole USD are skipped.
pub const MIN_SWAP_USD: i64 = 100;

/// The index position that excess reserves are deployed into.
pub const DEFAULT_INDEX_POSITION: &str = "convex-3pool";

pub const COINGECKO_PRICE_ENDPOINT: &str =
    "https://api.coingecko.com/api/v3/simple/token_price/ethereum";
