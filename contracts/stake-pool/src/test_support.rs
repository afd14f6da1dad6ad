use std::collections::{BTreeMap, BTreeSet};

use stake_pool_types::config::Config;
use stake_pool_types::ids::{ActorId, AmmId, TokenId};
use stake_pool_types::Amount;

/// Shared fixture for this crate's unit tests: one allowed token (`usdx`, also the special
/// token) paired against the `mint` counterpart through `amm-1`.
pub fn sample_config() -> Config {
    let mut allowed = BTreeSet::new();
    allowed.insert(TokenId::from("usdx"));
    let mut amm_for_token = BTreeMap::new();
    amm_for_token.insert(TokenId::from("usdx"), AmmId::from("amm-1"));
    Config {
        operation_timeout: 3600,
        protocol_fee_percentage: Amount::from(1u128),
        fee_divisor: Amount::from(100u128),
        excess_multiplier: Amount::from(101u128),
        excess_divisor: Amount::from(100u128),
        allowed_tokens: allowed,
        allowed_token_weights: BTreeMap::new(),
        amm_for_token,
        mint_token: TokenId::from("mint"),
        mint_testnet_token: None,
        token_decimals: 8,
        special_token: TokenId::from("usdx"),
        cron_caller: ActorId::from("cron"),
        mint_policy: ActorId::from("mint-policy"),
        treasury: ActorId::from("treasury"),
        total_supply: Amount::from(1_000_000_000_000u128),
        min_distribution_interval: 300,
        paused: false,
    }
    .validate()
    .unwrap()
}
