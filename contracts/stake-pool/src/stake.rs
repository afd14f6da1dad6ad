use stake_pool_types::adapters::{Amm, MintPolicy};
use stake_pool_types::event::Event;
use stake_pool_types::ids::{AmmId, OperationId, OperationKind, StakerId, TokenId};
use stake_pool_types::pool::StakingPosition;
use stake_pool_types::{Amount, ActorId};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::operations;
use crate::response::HandlerOutput;

/// Deposit amount * price, with the excess safety buffer applied, floored at 1.
fn counterpart_mint_amount(ledger: &Ledger, quantity: Amount, price_numerator: Amount, price_denominator: Amount) -> Result<Amount, ContractError> {
    let raw = quantity
        .mul_div_floor(price_numerator, price_denominator)
        .ok_or(ContractError::ZeroAmount)?;
    let buffered = raw
        .mul_div_floor(ledger.config.excess_multiplier, ledger.config.excess_divisor)
        .ok_or(ContractError::ZeroAmount)?;
    Ok(if buffered.is_zero() { Amount::from(1u128) } else { buffered })
}

/// Phase 1: `Credit-Notice`.
pub fn handle_credit_notice(
    ledger: &mut Ledger,
    token: TokenId,
    sender: StakerId,
    quantity: Amount,
    price_numerator: Amount,
    price_denominator: Amount,
    now: u64,
) -> Result<HandlerOutput, ContractError> {
    if ledger.config.paused {
        return Err(ContractError::Paused);
    }
    if !ledger.config.allowed_tokens.contains(&token) {
        return Err(ContractError::TokenNotAllowed(token));
    }
    if quantity.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if ledger.find_pending(&token, &sender, OperationKind::Stake).is_some() {
        return Err(ContractError::DuplicatePending { kind: OperationKind::Stake });
    }

    let amm_id = ledger.config.amm_for(&token)?;
    let requested_mint_amount = counterpart_mint_amount(ledger, quantity, price_numerator, price_denominator)?;

    let operation_id = operations::create(
        ledger,
        OperationKind::Stake,
        token.clone(),
        sender.clone(),
        quantity,
        amm_id.clone(),
        Amount::zero(),
        None,
        None,
        now,
    )?;

    let mint_policy = MintPolicy::new(ledger.config.mint_policy.clone());
    let output = HandlerOutput::new()
        .add_message(mint_policy.mint_request_msg(token.clone(), requested_mint_amount, operation_id.clone()))
        .add_message(stake_pool_types::msg::OutboundMessage::Notify {
            to: sender.clone(),
            kind: "Stake-Started".to_string(),
        })
        .add_attribute("action", "credit_notice")
        .add_attribute("operation_id", operation_id.clone())
        .add_attribute("token", token.clone())
        .add_attribute("sender", sender.clone())
        .add_attribute("quantity", quantity)
        .add_event(
            Event::new("Stake-Started")
                .attr("operation_id", operation_id)
                .attr("staker", sender)
                .attr("token", token)
                .attr("quantity", quantity),
        );
    Ok(output)
}

/// Phase 2: `Mint-Confirmation`.
pub fn handle_mint_confirmation(
    ledger: &mut Ledger,
    operation_id: OperationId,
    amount: Amount,
    from: ActorId,
    _now: u64,
) -> Result<HandlerOutput, ContractError> {
    if from != ledger.config.mint_policy {
        return Err(ContractError::Unauthorized);
    }
    let op = operations::verify(ledger, &operation_id, OperationKind::Stake)?;
    let token = op.token.clone();
    let token_amount = op.amount;
    let amm_id = op.amm.clone();

    let op_mut = ledger
        .get_operation_mut(&operation_id)
        .expect("verify just confirmed this operation exists");
    op_mut.mint_amount = amount;

    let amm = Amm::new(amm_id);
    let output = HandlerOutput::new()
        .add_message(amm.add_liquidity_msg(token, token_amount, amount, operation_id.clone()))
        .add_attribute("action", "mint_confirmation")
        .add_attribute("operation_id", operation_id)
        .add_attribute("mint_amount", amount);
    Ok(output)
}

/// Phase 2 failure: `Mint-Failed`. The deposit is still custodied by the contract; refund it.
pub fn handle_mint_failed(ledger: &mut Ledger, operation_id: OperationId, from: ActorId) -> Result<HandlerOutput, ContractError> {
    if from != ledger.config.mint_policy {
        return Err(ContractError::Unauthorized);
    }
    let op = operations::verify(ledger, &operation_id, OperationKind::Stake)?;
    let token = op.token.clone();
    let sender = op.sender.clone();
    let amount = op.amount;
    operations::fail(ledger, &operation_id)?;

    let output = HandlerOutput::new()
        .add_message(stake_pool_types::msg::OutboundMessage::Transfer {
            to: sender,
            token,
            amount,
            memo: "refund".to_string(),
        })
        .add_attribute("action", "mint_failed")
        .add_attribute("operation_id", operation_id);
    Ok(output)
}

/// Phase 3: `Liquidity-Added`.
/// No pause check here: by the time this confirmation arrives the AMM has already executed
/// `Add-Liquidity` and minted real LP tokens the contract must account for, and unlike
/// `handle_mint_failed`/`handle_liquidity_add_failed` there is no refund path for it — rejecting
/// the confirmation would strand the operation in `pending` forever since the reaper only frees
/// registry slots, it never refunds. Matches the sibling phase-2 handler `handle_mint_confirmation`.
pub fn handle_liquidity_added(
    ledger: &mut Ledger,
    operation_id: OperationId,
    pool_tokens: Amount,
    from: AmmId,
    now: u64,
) -> Result<HandlerOutput, ContractError> {
    let op = operations::verify_from_amm(ledger, &operation_id, OperationKind::Stake, &from)?;
    let token = op.token.clone();
    let sender = op.sender.clone();
    let position = StakingPosition {
        amount: op.amount,
        lp_tokens: pool_tokens,
        mint_amount: op.mint_amount,
        staked_at: now,
    };
    ledger.set_position(&token, &sender, position);
    operations::complete(ledger, &operation_id)?;

    let output = HandlerOutput::new()
        .add_message(stake_pool_types::msg::OutboundMessage::Notify {
            to: sender.clone(),
            kind: "Stake-Complete".to_string(),
        })
        .add_attribute("action", "liquidity_added")
        .add_attribute("operation_id", operation_id.clone())
        .add_attribute("lp_tokens", pool_tokens)
        .add_event(
            Event::new("Stake-Complete")
                .attr("operation_id", operation_id)
                .attr("staker", sender)
                .attr("token", token)
                .attr("lp_tokens", pool_tokens),
        );
    Ok(output)
}

/// Phase 3 failure: `Liquidity-Add-Failed`. By this point the contract custodies both the
/// original deposit and the minted counterpart.
pub fn handle_liquidity_add_failed(ledger: &mut Ledger, operation_id: OperationId, from: AmmId) -> Result<HandlerOutput, ContractError> {
    let op = operations::verify_from_amm(ledger, &operation_id, OperationKind::Stake, &from)?;
    let token = op.token.clone();
    let sender = op.sender.clone();
    let amount = op.amount;
    let mint_amount = op.mint_amount;
    let mint_token = ledger.config.mint_token.clone();
    operations::fail(ledger, &operation_id)?;

    let mut output = HandlerOutput::new()
        .add_message(stake_pool_types::msg::OutboundMessage::Transfer {
            to: sender.clone(),
            token,
            amount,
            memo: "refund".to_string(),
        })
        .add_attribute("action", "liquidity_add_failed")
        .add_attribute("operation_id", operation_id);
    if !mint_amount.is_zero() {
        output = output.add_message(stake_pool_types::msg::OutboundMessage::Transfer {
            to: sender,
            token: mint_token,
            amount: mint_amount,
            memo: "refund".to_string(),
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_config;

    fn ledger() -> Ledger {
        Ledger::new(sample_config())
    }

    #[test]
    fn credit_notice_rejects_disallowed_token() {
        let mut ledger = ledger();
        let err = handle_credit_notice(
            &mut ledger,
            TokenId::from("other"),
            StakerId::from("alice"),
            Amount::from(100u128),
            Amount::from(1u128),
            Amount::from(1u128),
            1_000,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::TokenNotAllowed(_)));
    }

    #[test]
    fn credit_notice_rejects_zero_quantity() {
        let mut ledger = ledger();
        let err = handle_credit_notice(
            &mut ledger,
            TokenId::from("usdx"),
            StakerId::from("alice"),
            Amount::zero(),
            Amount::from(1u128),
            Amount::from(1u128),
            1_000,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::ZeroAmount);
    }

    #[test]
    fn full_stake_happy_path_finalizes_position() {
        let mut ledger = ledger();
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");

        let output = handle_credit_notice(
            &mut ledger,
            token.clone(),
            staker.clone(),
            Amount::from(1_000u128),
            Amount::from(1u128),
            Amount::from(1u128),
            1_000,
        )
        .unwrap();
        let operation_id = OperationId::derive(&token, OperationKind::Stake, &staker, 1_000);
        assert!(output.attributes.iter().any(|a| a.key == "operation_id" && a.value == operation_id.to_string()));

        handle_mint_confirmation(&mut ledger, operation_id.clone(), Amount::from(2_000u128), ActorId::from("mint-policy"), 1_000).unwrap();
        let output = handle_liquidity_added(&mut ledger, operation_id, Amount::from(12_345_678u128), AmmId::from("amm-1"), 1_050).unwrap();
        assert!(output.events.iter().any(|e| e.kind == "Stake-Complete"));

        let position = ledger.get_position(&token, &staker).unwrap();
        assert_eq!(position.amount, Amount::from(1_000u128));
        assert_eq!(position.lp_tokens, Amount::from(12_345_678u128));
        assert_eq!(position.mint_amount, Amount::from(2_000u128));
        assert_eq!(position.staked_at, 1_050);
    }

    #[test]
    fn liquidity_added_confirmation_is_honored_even_while_paused() {
        // The AMM has already minted real LP tokens by the time this confirmation arrives;
        // pausing must not strand the operation in `pending` with no refund path.
        let mut ledger = ledger();
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");
        handle_credit_notice(&mut ledger, token.clone(), staker.clone(), Amount::from(1_000u128), Amount::from(1u128), Amount::from(1u128), 1_000).unwrap();
        let operation_id = OperationId::derive(&token, OperationKind::Stake, &staker, 1_000);
        handle_mint_confirmation(&mut ledger, operation_id.clone(), Amount::from(2_000u128), ActorId::from("mint-policy"), 1_000).unwrap();

        ledger.config.paused = true;
        handle_liquidity_added(&mut ledger, operation_id, Amount::from(12_345_678u128), AmmId::from("amm-1"), 1_050).unwrap();
        assert!(ledger.get_position(&token, &staker).is_some());
    }

    #[test]
    fn duplicate_credit_notice_for_same_token_is_rejected() {
        let mut ledger = ledger();
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");
        handle_credit_notice(&mut ledger, token.clone(), staker.clone(), Amount::from(100u128), Amount::from(1u128), Amount::from(1u128), 1_000).unwrap();
        let err = handle_credit_notice(&mut ledger, token, staker, Amount::from(50u128), Amount::from(1u128), Amount::from(1u128), 1_000).unwrap_err();
        assert_eq!(err, ContractError::DuplicatePending { kind: OperationKind::Stake });
    }

    #[test]
    fn mint_failed_refunds_the_deposit() {
        let mut ledger = ledger();
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");
        handle_credit_notice(&mut ledger, token.clone(), staker.clone(), Amount::from(100u128), Amount::from(1u128), Amount::from(1u128), 1_000).unwrap();
        let operation_id = OperationId::derive(&token, OperationKind::Stake, &staker, 1_000);
        let output = handle_mint_failed(&mut ledger, operation_id, ActorId::from("mint-policy")).unwrap();
        let transfer = output.messages.first().unwrap();
        match transfer {
            stake_pool_types::msg::OutboundMessage::Transfer { amount, memo, .. } => {
                assert_eq!(*amount, Amount::from(100u128));
                assert_eq!(memo, "refund");
            }
            other => panic!("expected a Transfer message, got {:?}", other),
        }
    }
}
