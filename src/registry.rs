use std::collections::HashMap;
use std::str::FromStr;

use ethers::types::{Address, U256};

use crate::constants::{
    CRV_ADDRESS, CVX_ADDRESS, DAI_ADDRESS, DAI_DECIMALS, DAI_RESERVE_POOL_ADDRESS,
    DEFAULT_INDEX_POSITION, REWARD_TOKEN_DECIMALS, SLIPPAGE_DECIMALS, SWAP_SLIPPAGE, USDC_ADDRESS,
    USDC_DECIMALS, USDC_RESERVE_POOL_ADDRESS, USDT_ADDRESS, USDT_DECIMALS,
    USDT_RESERVE_POOL_ADDRESS,
};
use crate::error::StrategyError;
use crate::math::Amount;
use crate::strategy::types::{AssetAmount, SwapSpec};

fn static_address(literal: &str) -> Address {
    Address::from_str(literal).expect("static address literal")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveEntry {
    pub underlyer: Address,
    pub underlyer_decimals: u32,
}

/// Fixed mapping from reserve pool to its underlyer token, populated once at
/// startup and immutable thereafter. Every reserve referenced by a rebalance
/// target must exist here.
#[derive(Debug, Clone)]
pub struct ReserveRegistry {
    pools: Vec<Address>,
    entries: HashMap<Address, ReserveEntry>,
}

impl ReserveRegistry {
    pub fn new(entries: Vec<(Address, ReserveEntry)>) -> Result<Self, StrategyError> {
        let mut pools = Vec::with_capacity(entries.len());
        let mut map = HashMap::with_capacity(entries.len());
        let mut underlyers = HashMap::with_capacity(entries.len());
        for (pool, entry) in entries {
            if map.insert(pool, entry).is_some() {
                return Err(StrategyError::DuplicateKey(pool));
            }
            if underlyers.insert(entry.underlyer, pool).is_some() {
                return Err(StrategyError::DuplicateKey(entry.underlyer));
            }
            pools.push(pool);
        }
        Ok(Self { pools, entries: map })
    }

    pub fn mainnet() -> Result<Self, StrategyError> {
        Self::new(vec![
            (
                static_address(DAI_RESERVE_POOL_ADDRESS),
                ReserveEntry {
                    underlyer: static_address(DAI_ADDRESS),
                    underlyer_decimals: DAI_DECIMALS,
                },
            ),
            (
                static_address(USDC_RESERVE_POOL_ADDRESS),
                ReserveEntry {
                    underlyer: static_address(USDC_ADDRESS),
                    underlyer_decimals: USDC_DECIMALS,
                },
            ),
            (
                static_address(USDT_RESERVE_POOL_ADDRESS),
                ReserveEntry {
                    underlyer: static_address(USDT_ADDRESS),
                    underlyer_decimals: USDT_DECIMALS,
                },
            ),
        ])
    }

    pub fn get(&self, pool: &Address) -> Option<&ReserveEntry> {
        self.entries.get(pool)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Configured reserves in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &ReserveEntry)> {
        self.pools.iter().map(|pool| (pool, &self.entries[pool]))
    }

    fn has_underlyer(&self, asset: &Address) -> bool {
        self.entries.values().any(|entry| entry.underlyer == *asset)
    }
}

/// Static per-reward-token swap configuration, keyed by reward token symbol.
#[derive(Debug, Clone)]
pub struct SwapRegistry {
    swaps: HashMap<String, SwapSpec>,
}

impl SwapRegistry {
    pub fn new(swaps: Vec<(String, SwapSpec)>) -> Result<Self, StrategyError> {
        let mut map = HashMap::with_capacity(swaps.len());
        let mut assets = HashMap::with_capacity(swaps.len());
        for (symbol, spec) in swaps {
            if assets.insert(spec.asset, symbol.clone()).is_some() {
                return Err(StrategyError::DuplicateKey(spec.asset));
            }
            if map.insert(symbol.clone(), spec).is_some() {
                return Err(StrategyError::DuplicateName(symbol));
            }
        }
        Ok(Self { swaps: map })
    }

    pub fn mainnet() -> Result<Self, StrategyError> {
        let slippage = Amount::parse(SWAP_SLIPPAGE, SLIPPAGE_DECIMALS)?;
        Self::new(vec![
            (
                "CRV".to_string(),
                SwapSpec {
                    zap_name: "crv-to-usdc".to_string(),
                    asset: static_address(CRV_ADDRESS),
                    in_decimals: REWARD_TOKEN_DECIMALS,
                    out_decimals: USDC_DECIMALS,
                    slippage,
                },
            ),
            (
                "CVX".to_string(),
                SwapSpec {
                    zap_name: "cvx-to-usdc".to_string(),
                    asset: static_address(CVX_ADDRESS),
                    in_decimals: REWARD_TOKEN_DECIMALS,
                    out_decimals: USDC_DECIMALS,
                    slippage,
                },
            ),
        ])
    }

    pub fn get(&self, symbol: &str) -> Result<&SwapSpec, StrategyError> {
        self.swaps
            .get(symbol)
            .ok_or_else(|| StrategyError::UnknownSwap(symbol.to_string()))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.swaps.keys().map(String::as_str)
    }
}

/// Index positions and their ordered underlyer lists. Underlyers must be
/// reserve underlyers known to the `ReserveRegistry`; an unknown reference is
/// rejected at load instead of surfacing mid-cycle.
#[derive(Debug, Clone)]
pub struct PositionRegistry {
    positions: HashMap<String, Vec<Address>>,
}

impl PositionRegistry {
    pub fn new(
        positions: Vec<(String, Vec<Address>)>,
        reserves: &ReserveRegistry,
    ) -> Result<Self, StrategyError> {
        let mut map = HashMap::with_capacity(positions.len());
        for (name, underlyers) in positions {
            for asset in &underlyers {
                if !reserves.has_underlyer(asset) {
                    return Err(StrategyError::UnknownPositionUnderlyer {
                        name,
                        asset: *asset,
                    });
                }
            }
            if map.insert(name.clone(), underlyers).is_some() {
                return Err(StrategyError::DuplicateName(name));
            }
        }
        Ok(Self { positions: map })
    }

    pub fn mainnet(reserves: &ReserveRegistry) -> Result<Self, StrategyError> {
        Self::new(
            vec![(
                DEFAULT_INDEX_POSITION.to_string(),
                vec![
                    static_address(DAI_ADDRESS),
                    static_address(USDC_ADDRESS),
                    static_address(USDT_ADDRESS),
                ],
            )],
            reserves,
        )
    }

    /// Builds the `deployStrategy` parameters for one position: the deploy
    /// amount at the asset's slot in the position's underlyer order, zero
    /// everywhere else.
    pub fn deploy_params(
        &self,
        name: &str,
        deploy: &AssetAmount,
    ) -> Result<(String, Vec<U256>), StrategyError> {
        let underlyers = self
            .positions
            .get(name)
            .ok_or_else(|| StrategyError::UnknownPosition(name.to_string()))?;
        let index = underlyers
            .iter()
            .position(|asset| *asset == deploy.asset)
            .ok_or_else(|| StrategyError::AssetNotInPosition {
                name: name.to_string(),
                asset: deploy.asset,
            })?;

        let mut amounts = vec![U256::zero(); underlyers.len()];
        amounts[index] = deploy.amount.to_u256()?;
        Ok((name.to_string(), amounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(byte: u8) -> Address {
        Address::from_low_u64_be(byte as u64)
    }

    fn registry() -> ReserveRegistry {
        ReserveRegistry::new(vec![
            (asset(1), ReserveEntry { underlyer: asset(11), underlyer_decimals: 18 }),
            (asset(2), ReserveEntry { underlyer: asset(12), underlyer_decimals: 6 }),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_pool() {
        let err = ReserveRegistry::new(vec![
            (asset(1), ReserveEntry { underlyer: asset(11), underlyer_decimals: 18 }),
            (asset(1), ReserveEntry { underlyer: asset(12), underlyer_decimals: 6 }),
        ])
        .unwrap_err();
        assert!(matches!(err, StrategyError::DuplicateKey(pool) if pool == asset(1)));
    }

    #[test]
    fn rejects_duplicate_underlyer() {
        let err = ReserveRegistry::new(vec![
            (asset(1), ReserveEntry { underlyer: asset(11), underlyer_decimals: 18 }),
            (asset(2), ReserveEntry { underlyer: asset(11), underlyer_decimals: 18 }),
        ])
        .unwrap_err();
        assert!(matches!(err, StrategyError::DuplicateKey(token) if token == asset(11)));
    }

    #[test]
    fn iterates_in_declaration_order() {
        let pools: Vec<Address> = registry().iter().map(|(pool, _)| *pool).collect();
        assert_eq!(pools, vec![asset(1), asset(2)]);
    }

    fn swap_spec(asset: Address) -> SwapSpec {
        SwapSpec {
            zap_name: "zap".to_string(),
            asset,
            in_decimals: 18,
            out_decimals: 6,
            slippage: Amount::parse("0.05", SLIPPAGE_DECIMALS).unwrap(),
        }
    }

    #[test]
    fn swap_registry_rejects_duplicate_symbol() {
        let err = SwapRegistry::new(vec![
            ("CRV".to_string(), swap_spec(asset(21))),
            ("CRV".to_string(), swap_spec(asset(22))),
        ])
        .unwrap_err();
        assert!(matches!(err, StrategyError::DuplicateName(symbol) if symbol == "CRV"));
    }

    #[test]
    fn swap_registry_rejects_duplicate_asset() {
        let err = SwapRegistry::new(vec![
            ("CRV".to_string(), swap_spec(asset(21))),
            ("CVX".to_string(), swap_spec(asset(21))),
        ])
        .unwrap_err();
        assert!(matches!(err, StrategyError::DuplicateKey(token) if token == asset(21)));
    }

    #[test]
    fn position_underlyers_must_be_known() {
        let err = PositionRegistry::new(
            vec![("pos".to_string(), vec![asset(11), asset(99)])],
            &registry(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StrategyError::UnknownPositionUnderlyer { asset: bad, .. } if bad == asset(99)
        ));
    }

    #[test]
    fn deploy_params_are_one_hot() {
        let positions = PositionRegistry::new(
            vec![("pos".to_string(), vec![asset(11), asset(12)])],
            &registry(),
        )
        .unwrap();
        let deploy = AssetAmount {
            asset: asset(12),
            amount: Amount::from_whole(400, 6).unwrap(),
        };
        let (name, amounts) = positions.deploy_params("pos", &deploy).unwrap();
        assert_eq!(name, "pos");
        assert_eq!(amounts, vec![U256::zero(), U256::from(400_000_000u64)]);
    }

    #[test]
    fn deploy_params_reject_unlisted_asset() {
        let positions = PositionRegistry::new(
            vec![("pos".to_string(), vec![asset(11)])],
            &registry(),
        )
        .unwrap();
        let deploy = AssetAmount {
            asset: asset(12),
            amount: Amount::from_whole(1, 6).unwrap(),
        };
        assert!(matches!(
            positions.deploy_params("pos", &deploy),
            Err(StrategyError::AssetNotInPosition { .. })
        ));
        assert!(matches!(
            positions.deploy_params("other", &deploy),
            Err(StrategyError::UnknownPosition(_))
        ));
    }

    #[test]
    fn mainnet_config_is_internally_consistent() {
        let reserves = ReserveRegistry::mainnet().unwrap();
        assert!(!reserves.is_empty());
        assert_eq!(reserves.len(), 3);
        let positions = PositionRegistry::mainnet(&reserves).unwrap();
        let swaps = SwapRegistry::mainnet().unwrap();
        assert!(swaps.get("CRV").is_ok());
        assert!(swaps.get("BAL").is_err());
        let deploy = AssetAmount {
            asset: static_address(USDC_ADDRESS),
            amount: Amount::from_whole(1, USDC_DECIMALS).unwrap(),
        };
        assert!(positions.deploy_params(DEFAULT_INDEX_POSITION, &deploy).is_ok());
    }
}
