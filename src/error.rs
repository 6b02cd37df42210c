use ethers::types::Address;
use thiserror::Error;

use crate::math::MathError;

/// How the host should react to a failed decision cycle.
///
/// `Configuration` means static config and live state disagree and someone
/// needs to look at it. `Range` means an input or intermediate value left its
/// legal domain; the cycle is aborted and never silently clamped.
/// `Operational` outcomes are expected steady state: the cycle simply has
/// nothing to do, and the host logs at info level and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Range,
    Operational,
}

#[derive(Debug, Error)]
pub enum StrategyError {
    // Configuration
    #[error("reserve pool is not configured: {0:?}")]
    UnknownReserve(Address),
    #[error("no balance entry for underlyer {0:?}")]
    MissingBalance(Address),
    #[error("duplicate registry key: {0:?}")]
    DuplicateKey(Address),
    #[error("duplicate registry name: {0:?}")]
    DuplicateName(String),
    #[error("position {name:?} references unknown underlyer {asset:?}")]
    UnknownPositionUnderlyer { name: String, asset: Address },
    #[error("index position is not configured: {0:?}")]
    UnknownPosition(String),
    #[error("swap is not configured: {0:?}")]
    UnknownSwap(String),
    #[error("position {name:?} does not include underlyer {asset:?}")]
    AssetNotInPosition { name: String, asset: Address },
    #[error("zap name and LP balance counts do not match: {names} vs {balances}")]
    ClaimListMismatch { names: usize, balances: usize },

    // Range
    #[error("token price cannot be negative")]
    NegativePrice,
    #[error("slippage cannot be negative")]
    NegativeSlippage,
    #[error("minimum swap amount cannot be negative")]
    NegativeMinAmount,
    #[error("cannot select the largest of zero amounts")]
    EmptySelection,
    #[error(transparent)]
    Math(#[from] MathError),

    // Operational
    #[error("no reserve is in excess of its rebalance target")]
    NoRebalanceCandidate,
    #[error("no reward tokens available for swap")]
    RewardBalanceTooSmall,
    #[error("USD value of reward tokens is too low: ${0}")]
    SwapValueBelowFloor(String),
}

impl StrategyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownReserve(_)
            | Self::MissingBalance(_)
            | Self::DuplicateKey(_)
            | Self::DuplicateName(_)
            | Self::UnknownPositionUnderlyer { .. }
            | Self::UnknownPosition(_)
            | Self::UnknownSwap(_)
            | Self::AssetNotInPosition { .. }
            | Self::ClaimListMismatch { .. } => ErrorKind::Configuration,
            Self::NegativePrice
            | Self::NegativeSlippage
            | Self::NegativeMinAmount
            | Self::EmptySelection
            | Self::Math(_) => ErrorKind::Range,
            Self::NoRebalanceCandidate
            | Self::RewardBalanceTooSmall
            | Self::SwapValueBelowFloor(_) => ErrorKind::Operational,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.kind() == ErrorKind::Operational
    }
}

/// Picks the strategy error out of a report when the failure is an expected
/// no-action outcome rather than a fault. Host binaries use this to decide
/// between an info log and a non-zero exit.
pub fn as_operational(report: &eyre::Report) -> Option<&StrategyError> {
    report
        .downcast_ref::<StrategyError>()
        .filter(|err| err.is_operational())
}
