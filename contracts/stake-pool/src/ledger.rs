use std::collections::BTreeMap;

use stake_pool_types::config::Config;
use stake_pool_types::ids::{OperationId, OperationKind, StakerId, TokenId};
use stake_pool_types::pool::{GlobalCounters, OperationStatus, PendingOperation, StakingPosition};

use crate::error::ContractError;

/// Sole mutator of persistent state. Everything else in this crate borrows a
/// `&Ledger` or `&mut Ledger` for the duration of exactly one message; nothing holds it across a
/// suspension point, since the host owns `Ledger` between dispatch calls.
///
/// Positions are stored as `TokenId -> StakerId -> StakingPosition` conceptually; this
/// crate flattens that into a single `(TokenId, StakerId)` map, since `BTreeMap` already gives
/// the sorted, deterministic traversal the emission engine's allocation pass depends on without a second level of
/// indirection.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    pub config: Config,
    positions: BTreeMap<(TokenId, StakerId), StakingPosition>,
    operations: BTreeMap<OperationId, PendingOperation>,
    pub counters: GlobalCounters,
}

impl Ledger {
    pub fn new(config: Config) -> Self {
        Ledger {
            config,
            positions: BTreeMap::new(),
            operations: BTreeMap::new(),
            counters: GlobalCounters::default(),
        }
    }

    // -- StakingPosition --------------------------------------------------------------------

    pub fn get_position(&self, token: &TokenId, staker: &StakerId) -> Option<&StakingPosition> {
        self.positions.get(&(token.clone(), staker.clone()))
    }

    /// Replaces the position atomically. Invariant: `amount > 0 <=> position exists`; callers
    /// must route through `clear_position` rather than `set_position` with a zero amount.
    pub fn set_position(&mut self, token: &TokenId, staker: &StakerId, position: StakingPosition) {
        debug_assert!(position.is_active(), "set_position called with a zero-amount position");
        self.positions.insert((token.clone(), staker.clone()), position);
    }

    pub fn clear_position(&mut self, token: &TokenId, staker: &StakerId) {
        self.positions.remove(&(token.clone(), staker.clone()));
    }

    /// Consistent point-in-time view for the emission engine. Sorted by
    /// `(TokenId, StakerId)` so allocation totals are reproducible across hosts.
    pub fn staking_positions(&self) -> impl Iterator<Item = (&TokenId, &StakerId, &StakingPosition)> {
        self.positions.iter().map(|((token, staker), position)| (token, staker, position))
    }

    // -- PendingOperation ---------------------------------------------------------------------

    pub fn get_operation(&self, id: &OperationId) -> Option<&PendingOperation> {
        self.operations.get(id)
    }

    pub fn get_operation_mut(&mut self, id: &OperationId) -> Option<&mut PendingOperation> {
        self.operations.get_mut(id)
    }

    pub fn insert_operation(&mut self, operation: PendingOperation) {
        self.operations.insert(operation.id.clone(), operation);
    }

    pub fn remove_operation(&mut self, id: &OperationId) {
        self.operations.remove(id);
    }

    pub fn pending_operations(&self) -> impl Iterator<Item = &PendingOperation> {
        self.operations.values()
    }

    pub fn count_pending_operations(&self) -> usize {
        self.operations.values().filter(|op| op.status == OperationStatus::Pending).count()
    }

    /// Linear scan for an existing pending operation on the same `(staker, token, kind)` triple.
    /// The registry's duplicate-submit guard is primarily enforced by `OperationId`
    /// derivation + existence check at `create` time; this scan backs the read-only
    /// `DuplicatePending` pre-check in the orchestrators so the rejection can be reported before
    /// even deriving an id.
    pub fn find_pending(
        &self,
        token: &TokenId,
        staker: &StakerId,
        kind: OperationKind,
    ) -> Option<&PendingOperation> {
        self.operations.values().find(|op| {
            op.status == OperationStatus::Pending
                && op.token == *token
                && op.sender == *staker
                && op.kind == kind
        })
    }

    pub fn update_status(&mut self, id: &OperationId, status: OperationStatus) -> Result<(), ContractError> {
        let op = self.operations.get_mut(id).ok_or_else(|| ContractError::UnknownOperation {
            operation_id: id.clone(),
        })?;
        if op.status != OperationStatus::Pending {
            return Err(ContractError::NotPending {
                operation_id: id.clone(),
            });
        }
        op.status = status;
        Ok(())
    }

    pub fn complete_operation(&mut self, id: &OperationId) -> Result<(), ContractError> {
        self.update_status(id, OperationStatus::Completed)
    }

    pub fn fail_operation(&mut self, id: &OperationId) -> Result<(), ContractError> {
        self.update_status(id, OperationStatus::Failed)
    }
}
