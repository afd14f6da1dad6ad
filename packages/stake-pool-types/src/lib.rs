pub mod adapters;
pub mod amount;
pub mod config;
pub mod event;
pub mod ids;
pub mod msg;
pub mod pool;

pub use amount::Amount;
pub use ids::{ActorId, AmmId, OperationId, OperationKind, StakerId, TokenId};
