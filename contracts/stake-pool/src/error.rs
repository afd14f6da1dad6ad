use stake_pool_types::amount::AmountError;
use stake_pool_types::config::ConfigError;
use stake_pool_types::ids::{AmmId, OperationId, OperationKind, TokenId};

/// Every failure mode this engine can surface, mapped to behaviors rather than exposed as opaque
/// strings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ContractError {
    #[error("contract is paused")]
    Paused,

    #[error("unauthorized caller")]
    Unauthorized,

    #[error("token not allowed: {0}")]
    TokenNotAllowed(TokenId),

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("no staking position found for this staker and token")]
    NoPosition,

    #[error("a pending {kind} operation already exists for this staker and token")]
    DuplicatePending { kind: OperationKind },

    #[error("operation {operation_id} not found")]
    UnknownOperation { operation_id: OperationId },

    #[error("operation {operation_id} is not pending (confirmation mismatch)")]
    NotPending { operation_id: OperationId },

    #[error("operation {operation_id} has kind {expected}, confirmation was for a different kind")]
    WrongKind {
        operation_id: OperationId,
        expected: OperationKind,
    },

    #[error("operation {operation_id} belongs to amm {expected}, confirmation came from a different amm")]
    WrongAmm { operation_id: OperationId, expected: AmmId },

    #[error("distribution requested too soon; wait until the minimum interval has elapsed")]
    DistributionTooSoon,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Amount(#[from] AmountError),
}
