use crate::error::StrategyError;
use crate::registry::ReserveRegistry;

use super::types::{AssetAmount, BalanceMap, RebalanceTarget};

/// Computes, per rebalance target, how much of the underlyer's balance is in
/// excess of the target. Only strictly positive excesses are kept, in the same
/// relative order as the input targets.
///
/// A target whose reserve is not configured, or whose underlyer has no
/// balance entry, is a static-config/runtime mismatch: it fails the cycle
/// rather than being treated as a zero balance.
pub fn net_excess(
    targets: &[RebalanceTarget],
    balances: &BalanceMap,
    reserves: &ReserveRegistry,
) -> Result<Vec<AssetAmount>, StrategyError> {
    let mut excess = Vec::with_capacity(targets.len());
    for target in targets {
        let entry = reserves
            .get(&target.reserve)
            .ok_or(StrategyError::UnknownReserve(target.reserve))?;
        let balance = balances
            .get(&entry.underlyer)
            .copied()
            .ok_or(StrategyError::MissingBalance(entry.underlyer))?;
        let net = balance.checked_sub(&target.amount)?;
        if net.is_positive() {
            excess.push(AssetAmount {
                asset: entry.underlyer,
                amount: net,
            });
        }
    }
    Ok(excess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Amount;
    use crate::registry::ReserveEntry;
    use ethers::types::Address;

    fn asset(byte: u8) -> Address {
        Address::from_low_u64_be(byte as u64)
    }

    fn registry() -> ReserveRegistry {
        ReserveRegistry::new(vec![
            (asset(1), ReserveEntry { underlyer: asset(11), underlyer_decimals: 6 }),
            (asset(2), ReserveEntry { underlyer: asset(12), underlyer_decimals: 6 }),
            (asset(3), ReserveEntry { underlyer: asset(13), underlyer_decimals: 6 }),
        ])
        .unwrap()
    }

    fn target(reserve: Address, raw: i64) -> RebalanceTarget {
        RebalanceTarget {
            reserve,
            amount: Amount::new(raw.into(), 6),
        }
    }

    fn balances(raws: [(Address, i64); 3]) -> BalanceMap {
        raws.into_iter()
            .map(|(token, raw)| (token, Amount::new(raw.into(), 6)))
            .collect()
    }

    #[test]
    fn empty_when_every_target_exceeds_its_balance() {
        let targets = [target(asset(1), 50_000), target(asset(2), 50_000), target(asset(3), 50_000)];
        let balances = balances([(asset(11), 10_000), (asset(12), 10_000), (asset(13), 10_000)]);
        assert!(net_excess(&targets, &balances, &registry()).unwrap().is_empty());
    }

    #[test]
    fn excess_is_exactly_balance_minus_target() {
        let targets = [target(asset(1), 10_000), target(asset(2), 10_000), target(asset(3), 10_000)];
        let balances = balances([(asset(11), 50_000), (asset(12), 50_000), (asset(13), 50_000)]);
        let excess = net_excess(&targets, &balances, &registry()).unwrap();
        assert_eq!(
            excess,
            vec![
                AssetAmount { asset: asset(11), amount: Amount::new(40_000.into(), 6) },
                AssetAmount { asset: asset(12), amount: Amount::new(40_000.into(), 6) },
                AssetAmount { asset: asset(13), amount: Amount::new(40_000.into(), 6) },
            ]
        );
    }

    #[test]
    fn negative_and_zero_nets_are_filtered_in_stable_order() {
        let targets = [target(asset(1), 10_000), target(asset(2), 50_000), target(asset(3), 10_000)];
        let balances = balances([(asset(11), 50_000), (asset(12), 10_000), (asset(13), 10_000)]);
        let excess = net_excess(&targets, &balances, &registry()).unwrap();
        assert_eq!(
            excess,
            vec![AssetAmount { asset: asset(11), amount: Amount::new(40_000.into(), 6) }]
        );
    }

    #[test]
    fn unknown_reserve_is_a_configuration_error() {
        let targets = [target(asset(1), 10_000), target(Address::zero(), 10_000)];
        let balances = balances([(asset(11), 50_000), (asset(12), 50_000), (asset(13), 50_000)]);
        let err = net_excess(&targets, &balances, &registry()).unwrap_err();
        assert!(matches!(err, StrategyError::UnknownReserve(reserve) if reserve == Address::zero()));
    }

    #[test]
    fn missing_balance_entry_is_a_configuration_error() {
        let targets = [target(asset(1), 10_000), target(asset(2), 10_000), target(asset(3), 10_000)];
        let mut balances = balances([(asset(11), 50_000), (asset(12), 50_000), (asset(13), 50_000)]);
        balances.remove(&asset(13));
        let err = net_excess(&targets, &balances, &registry()).unwrap_err();
        assert!(matches!(err, StrategyError::MissingBalance(token) if token == asset(13)));
    }
}
