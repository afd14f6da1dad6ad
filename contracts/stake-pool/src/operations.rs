use stake_pool_types::ids::{AmmId, OperationId, OperationKind, StakerId, TokenId};
use stake_pool_types::pool::{OperationStatus, PendingOperation};
use stake_pool_types::{Amount, ActorId};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::response::HandlerOutput;

/// Creates and persists a new pending operation. `mint_amount`/`staked_at` are the cost-basis
/// fields the caller has already resolved: zero/`None` for a fresh `stake`, copied from the
/// cleared position for an `unstake`.
#[allow(clippy::too_many_arguments)]
pub fn create(
    ledger: &mut Ledger,
    kind: OperationKind,
    token: TokenId,
    staker: StakerId,
    amount: Amount,
    amm: AmmId,
    mint_amount: Amount,
    lp_tokens: Option<Amount>,
    staked_at: Option<u64>,
    now: u64,
) -> Result<OperationId, ContractError> {
    if ledger.find_pending(&token, &staker, kind).is_some() {
        return Err(ContractError::DuplicatePending { kind });
    }
    let id = OperationId::derive(&token, kind, &staker, now);
    if ledger.get_operation(&id).is_some() {
        return Err(ContractError::DuplicatePending { kind });
    }
    ledger.insert_operation(PendingOperation {
        id: id.clone(),
        kind,
        token,
        sender: staker,
        amount,
        amm,
        status: OperationStatus::Pending,
        timestamp: now,
        mint_amount,
        lp_tokens,
        staked_at,
    });
    Ok(id)
}

/// The single gate used by confirmation handlers: the operation must exist, be pending, and
/// match the expected kind.
pub fn verify<'a>(
    ledger: &'a Ledger,
    id: &OperationId,
    kind: OperationKind,
) -> Result<&'a PendingOperation, ContractError> {
    let op = ledger
        .get_operation(id)
        .ok_or_else(|| ContractError::UnknownOperation { operation_id: id.clone() })?;
    if op.status != OperationStatus::Pending {
        return Err(ContractError::NotPending { operation_id: id.clone() });
    }
    if op.kind != kind {
        return Err(ContractError::WrongKind { operation_id: id.clone(), expected: op.kind });
    }
    Ok(op)
}

/// As `verify`, with the additional cross-check that the confirming AMM matches the operation's
/// recorded AMM.
pub fn verify_from_amm<'a>(
    ledger: &'a Ledger,
    id: &OperationId,
    kind: OperationKind,
    from: &AmmId,
) -> Result<&'a PendingOperation, ContractError> {
    let op = verify(ledger, id, kind)?;
    if op.amm != *from {
        return Err(ContractError::WrongAmm { operation_id: id.clone(), expected: op.amm.clone() });
    }
    Ok(op)
}

pub fn complete(ledger: &mut Ledger, id: &OperationId) -> Result<(), ContractError> {
    ledger.complete_operation(id)
}

pub fn fail(ledger: &mut Ledger, id: &OperationId) -> Result<(), ContractError> {
    ledger.fail_operation(id)
}

/// `Cleanup`. Authorized caller only; returns the removed count so the dispatcher can reply
/// with `Operations-Removed`.
pub fn handle_cleanup(ledger: &mut Ledger, from: ActorId, now: u64) -> Result<HandlerOutput, ContractError> {
    if from != ledger.config.cron_caller {
        return Err(ContractError::Unauthorized);
    }
    let timeout = ledger.config.operation_timeout;
    let stale: Vec<OperationId> = ledger
        .pending_operations()
        .filter(|op| op.status == OperationStatus::Pending && op.is_stale(now, timeout))
        .map(|op| op.id.clone())
        .collect();
    let removed = stale.len();
    for id in &stale {
        ledger.remove_operation(id);
    }
    Ok(HandlerOutput::new()
        .add_attribute("action", "cleanup")
        .add_attribute("operations_removed", removed)
        .add_attribute("timestamp", now))
}
