//! Single-sided staking/rewards engine: pending-operation registry, stake/unstake
//! orchestration, and weighted emission. See [`dispatch::handle`] for the single entry point a
//! host drives this crate through.

pub mod dispatch;
pub mod emission;
pub mod error;
pub mod il;
pub mod ledger;
pub mod operations;
pub mod rebase;
pub mod response;
pub mod stake;
pub mod unstake;

#[cfg(test)]
mod test_support;


pub use dispatch::{handle, DispatchResponse};
pub use error::ContractError;
pub use ledger::Ledger;
pub use response::HandlerOutput;
