use ethers::types::I256;
use eyre::Result;
use tracing::{debug, info, instrument};

use crate::error::StrategyError;
use crate::math::{Amount, MathError};
use crate::registry::SwapRegistry;

use super::types::{SwapInstruction, SwapSpec};
use super::{BalanceSource, PriceSource};

/// USD value of the slippage allowance, truncated back to the value's own
/// scale after applying the 4-decimal slippage fraction.
pub fn slippage_usd_value(usd_value: &Amount, slippage: &Amount) -> Result<Amount, StrategyError> {
    if slippage.is_negative() {
        return Err(StrategyError::NegativeSlippage);
    }
    let scaled = usd_value.checked_mul(slippage)?;
    Ok(scaled.rescale(usd_value.scale())?)
}

/// Sizes the minimum acceptable output for swapping `input_amount` of the
/// reward token, in output-token decimals.
///
/// The USD value is carried at the combined scale of the input amount and the
/// price quote with no intermediate rounding; only the final conversion to
/// output decimals truncates. The closing negativity check is defensive: the
/// guards above already rule it out, but the contract keeps it.
pub fn size_swap(
    spec: &SwapSpec,
    input_amount: &Amount,
    unit_price_usd: &Amount,
) -> Result<Amount, StrategyError> {
    if unit_price_usd.is_negative() {
        return Err(StrategyError::NegativePrice);
    }
    if input_amount.scale() != spec.in_decimals {
        return Err(StrategyError::Math(MathError::ScaleMismatch {
            left: input_amount.scale(),
            right: spec.in_decimals,
        }));
    }

    let usd_value = input_amount.checked_mul(unit_price_usd)?;
    let slippage_value = slippage_usd_value(&usd_value, &spec.slippage)?;
    let min_output_usd = usd_value.checked_sub(&slippage_value)?;
    let min_amount = min_output_usd.rescale(spec.out_decimals)?;
    if min_amount.is_negative() {
        return Err(StrategyError::NegativeMinAmount);
    }
    Ok(min_amount)
}

/// Plans reward-token swaps: reads the harvested balance, prices it, sizes
/// the minimum output, and skips swaps that are not economically worthwhile.
pub struct Harvester<B, P> {
    balance_source: B,
    price_source: P,
    swaps: SwapRegistry,
    /// Swaps whose minimum output is worth less than this many whole USD are
    /// skipped, expressed in the output token's decimals at check time.
    min_swap_usd: i64,
}

impl<B, P> Harvester<B, P>
where
    B: BalanceSource,
    P: PriceSource,
{
    pub fn new(balance_source: B, price_source: P, swaps: SwapRegistry, min_swap_usd: i64) -> Self {
        Self {
            balance_source,
            price_source,
            swaps,
            min_swap_usd,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.swaps.symbols().map(str::to_string).collect()
    }

    /// Sizes the swap for one reward token, or ends the cycle with an
    /// operational outcome: a dust balance or a value below the floor is a
    /// skip, not a fault.
    #[instrument(skip(self))]
    pub async fn plan_swap(&self, symbol: &str) -> Result<SwapInstruction> {
        let spec = self.swaps.get(symbol)?;

        let amount = self
            .balance_source
            .reward_balance(spec.asset, spec.in_decimals)
            .await?;
        if amount.raw() < I256::one() {
            return Err(StrategyError::RewardBalanceTooSmall.into());
        }

        let price = self.price_source.usd_price(spec.asset).await?;
        debug!(symbol, amount = %amount, price = %price, "Sizing reward swap");

        let min_amount = size_swap(spec, &amount, &price)?;
        let floor = Amount::from_whole(self.min_swap_usd, spec.out_decimals)
            .map_err(StrategyError::Math)?;
        if min_amount.raw() < floor.raw() {
            return Err(StrategyError::SwapValueBelowFloor(min_amount.to_string()).into());
        }

        info!(
            symbol,
            zap_name = %spec.zap_name,
            amount = %amount,
            min_amount = %min_amount,
            "Planned reward swap"
        );
        Ok(SwapInstruction {
            zap_name: spec.zap_name.clone(),
            amount,
            min_amount,
        })
    }
}
