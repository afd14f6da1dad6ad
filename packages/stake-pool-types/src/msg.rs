use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::{ActorId, AmmId, OperationId, StakerId, TokenId};

/// Everything that can arrive at the engine's single dispatcher. Each variant carries its typed
/// payload, as a tagged-variant rather than one message type per handler.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum InboundMessage {
    /// Deposit notice from an allowed token. Originates a new stake
    /// operation; carries no `OperationId`.
    ///
    /// `price_numerator` / `price_denominator` are the latest user-token-per-MINT price, as
    /// quoted by a price provider out of scope here. Unlike mint/burn confirmations,
    /// a price quote is a synchronous read rather than a round trip, so the host attaches it to
    /// the notice instead of the engine querying it mid-handler.
    CreditNotice {
        token: TokenId,
        sender: StakerId,
        quantity: Amount,
        price_numerator: Amount,
        price_denominator: Amount,
    },
    /// Confirmation that the mint-policy actor minted the counterpart MINT amount.
    MintConfirmation {
        operation_id: OperationId,
        amount: Amount,
        from: ActorId,
    },
    /// Error counterpart to `MintConfirmation`.
    MintFailed {
        operation_id: OperationId,
        from: ActorId,
    },
    /// Confirmation that the AMM added liquidity and minted LP tokens.
    LiquidityAdded {
        operation_id: OperationId,
        pool_tokens: Amount,
        from: AmmId,
    },
    /// Error counterpart to `LiquidityAdded`.
    LiquidityAddFailed {
        operation_id: OperationId,
        from: AmmId,
    },
    /// A staker requesting to unwind their position in `token`.
    Unstake {
        token: TokenId,
        sender: StakerId,
    },
    /// Confirmation that the AMM burned the LP position and returned both underlying assets.
    BurnConfirmation {
        operation_id: OperationId,
        token_a: TokenId,
        token_b: TokenId,
        withdrawn_a: Amount,
        withdrawn_b: Amount,
        burned_lp_tokens: Amount,
        from: AmmId,
    },
    /// Error counterpart to `BurnConfirmation`.
    BurnFailed {
        operation_id: OperationId,
        from: AmmId,
    },
    /// Emission tick entry point. The dispatcher supplies `now`, in seconds, to every
    /// handler uniformly rather than duplicating it per variant.
    RequestRewards {
        from: ActorId,
    },
    /// Supply-update intake from the mint-policy actor only.
    UpdateMintSupply {
        new_supply: Amount,
        from: ActorId,
    },
    /// Reaps stale pending operations.
    Cleanup {
        from: ActorId,
    },
    GetRewardStats {},
    GetStakeOwnership {
        staker: StakerId,
    },
    GetUniqueStakers {},
    GetTokenStakes {
        token: TokenId,
    },
}

/// Everything the engine can emit. A host serializes these onto whatever message bus it runs;
/// that bus is intentionally left unspecified here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum OutboundMessage {
    MintRequest {
        to: ActorId,
        token: TokenId,
        amount: Amount,
        operation_id: OperationId,
    },
    AddLiquidity {
        to: AmmId,
        token: TokenId,
        token_amount: Amount,
        mint_amount: Amount,
        operation_id: OperationId,
    },
    Burn {
        to: AmmId,
        lp_tokens: Amount,
        operation_id: OperationId,
    },
    Transfer {
        to: StakerId,
        token: TokenId,
        amount: Amount,
        /// Audit tag, e.g. `"refund"`, `"profit-share"`, `"il-compensation"`, `"unstake"`.
        memo: String,
    },
    DistributeRewards {
        to: ActorId,
        allocations: BTreeMap<StakerId, Amount>,
    },
    /// User-facing lifecycle notification (`Stake-Started`, `Stake-Complete`,
    /// `Unstake-Started`, `Unstake-Complete`).
    Notify {
        to: StakerId,
        kind: String,
    },
}

/// Response to `GetRewardStats`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct RewardStatsResponse {
    pub current_rewards: Amount,
    pub total_supply: Amount,
    pub remaining: Amount,
    pub last_reward_timestamp: u64,
    /// `remaining * periodRate * 288 / 10^8`.
    pub projected_daily_emission: Amount,
}

/// Response to `GetStakeOwnership`; `share_ppm` is the staker's share of total weight expressed
/// in parts-per-million, the integer-arithmetic equivalent of a 6-decimal fraction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct StakeOwnershipResponse {
    pub staker: StakerId,
    pub share_ppm: Amount,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct UniqueStakersResponse {
    pub count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct TokenStakesResponse {
    pub token: TokenId,
    pub total_amount: Amount,
    pub staker_count: u64,
}
