pub mod coingecko;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod lpaccount;
pub mod mapt;
pub mod math;
pub mod registry;
pub mod strategy;
pub mod wallet;
