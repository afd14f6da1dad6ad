use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::{ActorId, AmmId, TokenId};

/// Default per-token weight.
pub const DEFAULT_TOKEN_WEIGHT: u128 = 100;

/// Divisor applied to the special token's stake amount instead of a multiplicative weight.
pub const SPECIAL_TOKEN_WEIGHT_DIVISOR: u128 = 1000;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("special token must be a member of allowed tokens")]
    SpecialTokenNotAllowed,
    #[error("mint token must not also be an allowed user token")]
    MintTokenIsAllowedToken,
    #[error("fee_divisor must be positive")]
    ZeroFeeDivisor,
    #[error("excess_divisor must be positive")]
    ZeroExcessDivisor,
    #[error("allowed_tokens must not be empty")]
    NoAllowedTokens,
    #[error("no amm configured for token {0}")]
    NoAmmForToken(String),
}

/// Engine configuration, split into an `Unchecked` form as received from the host (e.g.
/// deserialized JSON), and a `Config` form produced by `validate()` that this crate's handlers
/// may trust.
///
/// Static loading of this struct from a config file or genesis blob is out of scope;
/// only the shape and the invariants it must satisfy are in scope.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigUnchecked {
    /// Seconds after which a pending operation becomes eligible for reaping.
    pub operation_timeout: u64,
    pub protocol_fee_percentage: Amount,
    pub fee_divisor: Amount,
    /// Safety buffer applied to the counterpart MINT amount so the subsequent swap succeeds.
    pub excess_multiplier: Amount,
    pub excess_divisor: Amount,
    pub allowed_tokens: BTreeSet<TokenId>,
    /// Per-token weight; tokens absent from this map use `DEFAULT_TOKEN_WEIGHT`.
    pub allowed_token_weights: BTreeMap<TokenId, Amount>,
    /// Which AMM instance services each allowed token's pair with the MINT token, resolved as
    /// per-token configuration (see DESIGN.md).
    pub amm_for_token: BTreeMap<TokenId, AmmId>,
    pub mint_token: TokenId,
    pub mint_testnet_token: Option<TokenId>,
    pub token_decimals: u32,
    /// The one allowed token weighted by ÷1000 instead of the usual multiplicative weight.
    pub special_token: TokenId,
    pub cron_caller: ActorId,
    pub mint_policy: ActorId,
    pub treasury: ActorId,
    /// Hard cap on cumulative minted reward.
    pub total_supply: Amount,
    /// Minimum seconds between two emission ticks.
    ///
    /// The source mixes milliseconds and seconds across callers; this
    /// crate resolves that ambiguity by fixing every time field, including this one, to whole
    /// seconds — see DESIGN.md.
    pub min_distribution_interval: u64,
    /// Global kill switch checked by every state-mutating handler. Toggling this is part of the out-of-scope admin/config surface; the
    /// engine only reads it.
    pub paused: bool,
}

pub type Config = ConfigUnchecked;

impl ConfigUnchecked {
    pub fn validate(self) -> Result<Config, ConfigError> {
        if self.allowed_tokens.is_empty() {
            return Err(ConfigError::NoAllowedTokens);
        }
        if !self.allowed_tokens.contains(&self.special_token) {
            return Err(ConfigError::SpecialTokenNotAllowed);
        }
        if self.allowed_tokens.contains(&self.mint_token) {
            return Err(ConfigError::MintTokenIsAllowedToken);
        }
        if self.fee_divisor.is_zero() {
            return Err(ConfigError::ZeroFeeDivisor);
        }
        if self.excess_divisor.is_zero() {
            return Err(ConfigError::ZeroExcessDivisor);
        }
        for token in &self.allowed_tokens {
            if !self.amm_for_token.contains_key(token) {
                return Err(ConfigError::NoAmmForToken(token.to_string()));
            }
        }
        Ok(self)
    }

    pub fn amm_for(&self, token: &TokenId) -> Result<crate::ids::AmmId, ConfigError> {
        self.amm_for_token
            .get(token)
            .cloned()
            .ok_or_else(|| ConfigError::NoAmmForToken(token.to_string()))
    }

    /// Weight for `token`'s stake amount: the special token is divided by 1000; every other
    /// allowed token multiplies by its configured (or default) weight.
    pub fn token_weight(&self, token: &TokenId) -> Amount {
        self.allowed_token_weights
            .get(token)
            .copied()
            .unwrap_or_else(|| Amount::from(DEFAULT_TOKEN_WEIGHT))
    }

    pub fn is_special_token(&self, token: &TokenId) -> bool {
        token == &self.special_token
    }
}
