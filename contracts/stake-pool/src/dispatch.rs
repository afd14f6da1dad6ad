use stake_pool_types::msg::{InboundMessage, RewardStatsResponse, StakeOwnershipResponse, TokenStakesResponse, UniqueStakersResponse};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::response::HandlerOutput;
use crate::{emission, operations, stake, unstake};

/// Everything [`handle`] can return: a mutating handler's queued messages and audit trail, or one
/// of the read-only views. A single enum, rather than one return type per message kind, keeps the
/// dispatcher a single tagged match over inbound message kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchResponse {
    Output(HandlerOutput),
    RewardStats(RewardStatsResponse),
    StakeOwnership(StakeOwnershipResponse),
    UniqueStakers(UniqueStakersResponse),
    TokenStakes(TokenStakesResponse),
}

/// The engine's sole entry point. `now` is the host's current wall-clock second, supplied once
/// per dispatch rather than duplicated across message variants.
pub fn handle(ledger: &mut Ledger, msg: InboundMessage, now: u64) -> Result<DispatchResponse, ContractError> {
    match msg {
        InboundMessage::CreditNotice {
            token,
            sender,
            quantity,
            price_numerator,
            price_denominator,
        } => stake::handle_credit_notice(ledger, token, sender, quantity, price_numerator, price_denominator, now)
            .map(DispatchResponse::Output),

        InboundMessage::MintConfirmation { operation_id, amount, from } => {
            stake::handle_mint_confirmation(ledger, operation_id, amount, from, now).map(DispatchResponse::Output)
        }
        InboundMessage::MintFailed { operation_id, from } => {
            stake::handle_mint_failed(ledger, operation_id, from).map(DispatchResponse::Output)
        }
        InboundMessage::LiquidityAdded { operation_id, pool_tokens, from } => {
            stake::handle_liquidity_added(ledger, operation_id, pool_tokens, from, now).map(DispatchResponse::Output)
        }
        InboundMessage::LiquidityAddFailed { operation_id, from } => {
            stake::handle_liquidity_add_failed(ledger, operation_id, from).map(DispatchResponse::Output)
        }

        InboundMessage::Unstake { token, sender } => unstake::handle_unstake(ledger, token, sender, now).map(DispatchResponse::Output),
        InboundMessage::BurnConfirmation {
            operation_id,
            token_a,
            token_b,
            withdrawn_a,
            withdrawn_b,
            burned_lp_tokens,
            from,
        } => unstake::handle_burn_confirmation(ledger, operation_id, token_a, token_b, withdrawn_a, withdrawn_b, burned_lp_tokens, from, now)
            .map(DispatchResponse::Output),
        InboundMessage::BurnFailed { operation_id, from } => {
            unstake::handle_burn_failed(ledger, operation_id, from).map(DispatchResponse::Output)
        }

        InboundMessage::RequestRewards { from } => emission::handle_request_rewards(ledger, from, now).map(DispatchResponse::Output),
        InboundMessage::UpdateMintSupply { new_supply, from } => {
            emission::handle_update_mint_supply(ledger, new_supply, from).map(DispatchResponse::Output)
        }
        InboundMessage::Cleanup { from } => operations::handle_cleanup(ledger, from, now).map(DispatchResponse::Output),

        InboundMessage::GetRewardStats {} => Ok(DispatchResponse::RewardStats(emission::reward_stats(ledger))),
        InboundMessage::GetStakeOwnership { staker } => {
            emission::stake_ownership(ledger, staker).map(DispatchResponse::StakeOwnership)
        }
        InboundMessage::GetUniqueStakers {} => Ok(DispatchResponse::UniqueStakers(emission::unique_stakers(ledger))),
        InboundMessage::GetTokenStakes { token } => Ok(DispatchResponse::TokenStakes(emission::token_stakes(ledger, token))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_config;
    use stake_pool_types::ids::{ActorId, StakerId, TokenId};
    use stake_pool_types::Amount;

    #[test]
    fn dispatch_routes_credit_notice_to_stake_orchestrator() {
        let mut ledger = Ledger::new(sample_config());
        let response = handle(
            &mut ledger,
            InboundMessage::CreditNotice {
                token: TokenId::from("usdx"),
                sender: StakerId::from("alice"),
                quantity: Amount::from(100u128),
                price_numerator: Amount::from(1u128),
                price_denominator: Amount::from(1u128),
            },
            1_000,
        )
        .unwrap();
        match response {
            DispatchResponse::Output(output) => {
                assert!(output.attributes.iter().any(|a| a.key == "action" && a.value == "credit_notice"));
            }
            other => panic!("expected Output, got {:?}", other),
        }
    }

    #[test]
    fn dispatch_routes_read_only_queries_without_mutating_ledger() {
        let mut ledger = Ledger::new(sample_config());
        let before = ledger.clone();
        let response = handle(&mut ledger, InboundMessage::GetUniqueStakers {}, 1_000).unwrap();
        assert_eq!(response, DispatchResponse::UniqueStakers(stake_pool_types::msg::UniqueStakersResponse { count: 0 }));
        assert_eq!(ledger.counters, before.counters);
    }

    #[test]
    fn dispatch_rejects_cleanup_from_unauthorized_caller() {
        let mut ledger = Ledger::new(sample_config());
        let err = handle(&mut ledger, InboundMessage::Cleanup { from: ActorId::from("stranger") }, 1_000).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
    }
}
