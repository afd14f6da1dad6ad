use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::{AmmId, OperationId, OperationKind, StakerId, TokenId};

/// A staker's finalized single-sided position in one token, keyed by `(TokenId, StakerId)`.
/// `lp_tokens` and `mint_amount` are the cost basis captured at finalize time and are
/// never mutated afterwards; only `unstake` settlement reads them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct StakingPosition {
    pub amount: Amount,
    pub lp_tokens: Amount,
    pub mint_amount: Amount,
    /// Wall-clock second of finalize; the anchor for MINT rebase computation.
    pub staked_at: u64,
}

impl StakingPosition {
    pub fn is_active(&self) -> bool {
        !self.amount.is_zero()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    Completed,
    Failed,
}

/// A multi-step stake or unstake workflow in flight, keyed by `OperationId`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct PendingOperation {
    pub id: OperationId,
    pub kind: OperationKind,
    pub token: TokenId,
    pub sender: StakerId,
    pub amount: Amount,
    pub amm: AmmId,
    pub status: OperationStatus,
    pub timestamp: u64,
    /// For `stake`: filled in once the mint-policy actor confirms. For `unstake`: copied from
    /// the position's cost basis at creation time.
    pub mint_amount: Amount,
    /// For `unstake`: the LP token quantity copied from the position's cost basis at creation
    /// time, and the amount burned. Absent while a `stake` operation has not yet received its
    /// `Liquidity-Added` confirmation.
    pub lp_tokens: Option<Amount>,
    /// For `unstake`: the cleared position's `staked_at`, carried forward since the position
    /// itself is gone by the time burn-confirmation settlement needs it for the MINT rebase.
    /// Required to compute `now - stakedAt` once the position has been cleared under
    /// checks-effects-interactions; see DESIGN.md. Absent for `stake` operations.
    pub staked_at: Option<u64>,
}

impl PendingOperation {
    pub fn is_stale(&self, now: u64, operation_timeout: u64) -> bool {
        now.saturating_sub(self.timestamp) > operation_timeout
    }
}

/// Global scalars threaded through every `Emission Engine` tick.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct GlobalCounters {
    pub current_rewards: Amount,
    pub last_reward_timestamp: u64,
    /// Last externally-reported MINT token supply, used for the burn-rate emission cap.
    pub mint_token_supply: Amount,
}
