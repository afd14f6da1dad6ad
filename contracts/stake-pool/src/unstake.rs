use stake_pool_types::adapters::Amm;
use stake_pool_types::event::Event;
use stake_pool_types::ids::{AmmId, OperationId, OperationKind, StakerId, TokenId};
use stake_pool_types::msg::OutboundMessage;
use stake_pool_types::Amount;

use crate::error::ContractError;
use crate::il;
use crate::ledger::Ledger;
use crate::operations;
use crate::rebase;
use crate::response::HandlerOutput;

/// Phase 1: `Unstake` request. Clears the position before any outbound message
/// (checks-effects-interactions).
pub fn handle_unstake(ledger: &mut Ledger, token: TokenId, sender: StakerId, now: u64) -> Result<HandlerOutput, ContractError> {
    if ledger.config.paused {
        return Err(ContractError::Paused);
    }
    if !ledger.config.allowed_tokens.contains(&token) {
        return Err(ContractError::TokenNotAllowed(token));
    }
    let position = ledger.get_position(&token, &sender).ok_or(ContractError::NoPosition)?;
    if !position.is_active() {
        return Err(ContractError::NoPosition);
    }
    if ledger.find_pending(&token, &sender, OperationKind::Unstake).is_some() {
        return Err(ContractError::DuplicatePending { kind: OperationKind::Unstake });
    }
    let amount = position.amount;
    let lp_tokens = position.lp_tokens;
    let mint_amount = position.mint_amount;
    let staked_at = position.staked_at;

    let amm_id = ledger.config.amm_for(&token)?;
    ledger.clear_position(&token, &sender);

    let operation_id = operations::create(
        ledger,
        OperationKind::Unstake,
        token.clone(),
        sender.clone(),
        amount,
        amm_id.clone(),
        mint_amount,
        Some(lp_tokens),
        Some(staked_at),
        now,
    )?;

    let amm = Amm::new(amm_id);
    let output = HandlerOutput::new()
        .add_message(amm.burn_msg(lp_tokens, operation_id.clone()))
        .add_message(OutboundMessage::Notify {
            to: sender.clone(),
            kind: "Unstake-Started".to_string(),
        })
        .add_attribute("action", "unstake")
        .add_attribute("operation_id", operation_id.clone())
        .add_attribute("lp_tokens", lp_tokens)
        .add_event(
            Event::new("Unstake-Started")
                .attr("operation_id", operation_id)
                .attr("staker", sender)
                .attr("token", token)
                .attr("lp_tokens", lp_tokens),
        );
    Ok(output)
}

/// Phase 2: `Burn-Confirmation` settlement.
#[allow(clippy::too_many_arguments)]
pub fn handle_burn_confirmation(
    ledger: &mut Ledger,
    operation_id: OperationId,
    token_a: TokenId,
    token_b: TokenId,
    withdrawn_a: Amount,
    withdrawn_b: Amount,
    burned_lp_tokens: Amount,
    from: AmmId,
    now: u64,
) -> Result<HandlerOutput, ContractError> {
    if ledger.config.paused {
        return Err(ContractError::Paused);
    }
    let op = operations::verify_from_amm(ledger, &operation_id, OperationKind::Unstake, &from)?;
    let sender = op.sender.clone();
    let user_token = op.token.clone();
    let initial_user_amount = op.amount;
    let initial_mint_amount = op.mint_amount;
    let staked_at = op.staked_at.expect("unstake operations always carry staked_at");

    let mint_token = ledger.config.mint_token.clone();
    let (withdrawn_user, withdrawn_mint) = if token_a == mint_token {
        (withdrawn_b, withdrawn_a)
    } else {
        (withdrawn_a, withdrawn_b)
    };

    // (a) impermanent-loss compensation.
    let il_compensation = il::compensation(initial_user_amount, withdrawn_user);

    // (b) user-token profit share.
    let amount_to_send_user = if withdrawn_user <= initial_user_amount {
        withdrawn_user
    } else {
        let profit = withdrawn_user.checked_sub(initial_user_amount)?;
        let protocol_fee = profit
            .mul_div_floor(ledger.config.protocol_fee_percentage, ledger.config.fee_divisor)
            .expect("fee_divisor is validated nonzero");
        withdrawn_user.checked_sub(protocol_fee)?
    };

    // (c) MINT-token profit share with rebase adjustment.
    let mint_profit_share = if initial_mint_amount.is_zero() || withdrawn_mint.is_zero() {
        Amount::zero()
    } else {
        let weeks = rebase::weeks_elapsed(staked_at, now);
        let rebased = rebase::rebased_cost_basis(initial_mint_amount, weeks);
        if withdrawn_mint < rebased {
            Amount::zero()
        } else {
            let profit = withdrawn_mint.checked_sub(rebased)?;
            let protocol_fee = profit
                .mul_div_floor(ledger.config.protocol_fee_percentage, ledger.config.fee_divisor)
                .expect("fee_divisor is validated nonzero");
            profit.checked_sub(protocol_fee)?
        }
    };

    // (d) mark completed before outbound transfers.
    operations::complete(ledger, &operation_id)?;

    // (e) transfers + notification.
    let total_user_transfer = amount_to_send_user.checked_add(il_compensation)?;
    let mut output = HandlerOutput::new()
        .add_message(OutboundMessage::Transfer {
            to: sender.clone(),
            token: user_token.clone(),
            amount: total_user_transfer,
            memo: "unstake".to_string(),
        })
        .add_attribute("action", "burn_confirmation")
        .add_attribute("operation_id", operation_id.clone())
        .add_attribute("withdrawn_user", withdrawn_user)
        .add_attribute("withdrawn_mint", withdrawn_mint)
        .add_attribute("burned_lp_tokens", burned_lp_tokens)
        .add_attribute("il_compensation", il_compensation)
        .add_attribute("amount_to_send_user", amount_to_send_user)
        .add_attribute("mint_profit_share", mint_profit_share)
        .add_event(
            Event::new("Unstake-Complete")
                .attr("operation_id", operation_id)
                .attr("staker", sender.clone())
                .attr("token", user_token)
                .attr("amount_to_send_user", total_user_transfer)
                .attr("mint_profit_share", mint_profit_share),
        );

    if !mint_profit_share.is_zero() {
        output = output.add_message(OutboundMessage::Transfer {
            to: sender.clone(),
            token: mint_token,
            amount: mint_profit_share,
            memo: "profit-share".to_string(),
        });
    }
    output = output.add_message(OutboundMessage::Notify {
        to: sender,
        kind: "Unstake-Complete".to_string(),
    });
    Ok(output)
}

/// Error counterpart to `Burn-Confirmation`. The position was already cleared under
/// checks-effects-interactions in phase 1 and the outcome of the underlying burn attempt is
/// unknown to this contract, so rather than invent a compensating transaction for custody it cannot
/// prove, this only fails the operation and notifies the staker. Recovery is the operator's
/// responsibility.
pub fn handle_burn_failed(ledger: &mut Ledger, operation_id: OperationId, from: AmmId) -> Result<HandlerOutput, ContractError> {
    let op = operations::verify_from_amm(ledger, &operation_id, OperationKind::Unstake, &from)?;
    let sender = op.sender.clone();
    operations::fail(ledger, &operation_id)?;

    let output = HandlerOutput::new()
        .add_message(OutboundMessage::Notify {
            to: sender,
            kind: "Unstake-Failed".to_string(),
        })
        .add_attribute("action", "burn_failed")
        .add_attribute("operation_id", operation_id);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_config;
    use stake_pool_types::pool::StakingPosition;

    fn ledger_with_position(amount: Amount, lp_tokens: Amount, mint_amount: Amount, staked_at: u64) -> (Ledger, TokenId, StakerId) {
        let mut ledger = Ledger::new(sample_config());
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");
        ledger.set_position(
            &token,
            &staker,
            StakingPosition {
                amount,
                lp_tokens,
                mint_amount,
                staked_at,
            },
        );
        (ledger, token, staker)
    }

    #[test]
    fn unstake_no_profit_no_il() {
        let (mut ledger, token, staker) = ledger_with_position(Amount::from(100u128), Amount::from(50u128), Amount::from(200u128), 0);
        let started = handle_unstake(&mut ledger, token.clone(), staker.clone(), 1_000).unwrap();
        assert!(started.events.iter().any(|e| e.kind == "Unstake-Started"));
        let operation_id = OperationId::derive(&token, OperationKind::Unstake, &staker, 1_000);
        assert!(ledger.get_position(&token, &staker).is_none());

        let output = handle_burn_confirmation(
            &mut ledger,
            operation_id,
            TokenId::from("mint"),
            token,
            Amount::from(200u128),
            Amount::from(100u128),
            Amount::from(50u128),
            AmmId::from("amm-1"),
            1_100,
        )
        .unwrap();
        let transfer = output.messages.first().unwrap();
        match transfer {
            OutboundMessage::Transfer { amount, memo, .. } => {
                assert_eq!(*amount, Amount::from(100u128));
                assert_eq!(memo, "unstake");
            }
            other => panic!("expected Transfer, got {:?}", other),
        }
        assert!(output.attributes.iter().any(|a| a.key == "mint_profit_share" && a.value == "0"));
        assert!(output.events.iter().any(|e| e.kind == "Unstake-Complete"));
    }

    #[test]
    fn unstake_user_token_profit_rounds_fee_down_to_zero() {
        // profit 10, fee_pct=1, fee_divisor=100 -> fee floors to 0.
        let (mut ledger, token, staker) = ledger_with_position(Amount::from(100u128), Amount::from(50u128), Amount::from(200u128), 0);
        handle_unstake(&mut ledger, token.clone(), staker.clone(), 1_000).unwrap();
        let operation_id = OperationId::derive(&token, OperationKind::Unstake, &staker, 1_000);

        let output = handle_burn_confirmation(
            &mut ledger,
            operation_id,
            token,
            TokenId::from("mint"),
            Amount::from(110u128),
            Amount::from(200u128),
            Amount::from(50u128),
            AmmId::from("amm-1"),
            1_100,
        )
        .unwrap();
        let transfer = output.messages.first().unwrap();
        match transfer {
            OutboundMessage::Transfer { amount, .. } => assert_eq!(*amount, Amount::from(110u128)),
            other => panic!("expected Transfer, got {:?}", other),
        }
    }

    #[test]
    fn unstake_mint_rebase_scenario() {
        let staked_at = 0u64;
        let (mut ledger, token, staker) = ledger_with_position(Amount::from(100u128), Amount::from(50u128), Amount::from(10_000_000u128), staked_at);
        handle_unstake(&mut ledger, token.clone(), staker.clone(), 0).unwrap();
        let operation_id = OperationId::derive(&token, OperationKind::Unstake, &staker, 0);

        let two_weeks = 2 * 604_800;
        let output = handle_burn_confirmation(
            &mut ledger,
            operation_id,
            token,
            TokenId::from("mint"),
            Amount::from(100u128),
            Amount::from(10_000_000u128),
            Amount::from(50u128),
            AmmId::from("amm-1"),
            two_weeks,
        )
        .unwrap();
        // rebasedInitial = 9_950_062; profit = 49_938; fee = 49_938*1/100 = 499; share = 49_439.
        assert!(output.attributes.iter().any(|a| a.key == "mint_profit_share" && a.value == "49439"));
    }

    #[test]
    fn unstake_after_already_cleared_position_is_rejected() {
        let (mut ledger, token, staker) = ledger_with_position(Amount::from(100u128), Amount::from(50u128), Amount::from(200u128), 0);
        handle_unstake(&mut ledger, token.clone(), staker.clone(), 1_000).unwrap();
        let err = handle_unstake(&mut ledger, token, staker, 1_000).unwrap_err();
        assert_eq!(err, ContractError::NoPosition);
    }
}
