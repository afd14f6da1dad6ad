use std::collections::BTreeMap;

use stake_pool_types::adapters::Treasury;
use stake_pool_types::config::SPECIAL_TOKEN_WEIGHT_DIVISOR;
use stake_pool_types::ids::{StakerId, TokenId};
use stake_pool_types::msg::{RewardStatsResponse, StakeOwnershipResponse, TokenStakesResponse, UniqueStakersResponse};
use stake_pool_types::{Amount, ActorId};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::response::HandlerOutput;

const PRECISION_1E8: u128 = 100_000_000;
const MONTHLY_RATE_NUMERATOR: u128 = 285; // 0.0285
const MONTHLY_RATE_DENOMINATOR: u128 = 10_000;
const PERIODS_PER_MONTH: u128 = 8_640;
const WEEKLY_BURN_NUMERATOR: u128 = 25; // 0.25%
const WEEKLY_BURN_DENOMINATOR: u128 = 10_000;
const BURN_CAP_NUMERATOR: u128 = 45; // 45% of weekly burn
const BURN_CAP_DENOMINATOR: u128 = 100;
const PERIODS_PER_WEEK: u128 = 2_016;

/// `floor((MONTHLY_RATE / PERIODS_PER_MONTH) * 10^8)`.
fn period_rate() -> Amount {
    Amount::from(MONTHLY_RATE_NUMERATOR)
        .mul_div_floor(
            Amount::from(PRECISION_1E8),
            Amount::from(MONTHLY_RATE_DENOMINATOR * PERIODS_PER_MONTH),
        )
        .expect("constant denominator is nonzero")
}

/// Supply-cap- and burn-rate-capped emission budget for this tick. Returns
/// zero when no supply remains.
fn compute_emission(ledger: &Ledger) -> Amount {
    let remaining = ledger.config.total_supply.saturating_sub(ledger.counters.current_rewards);
    if remaining.is_zero() {
        return Amount::zero();
    }
    let mut emission = remaining
        .mul_div_floor(period_rate(), Amount::from(PRECISION_1E8))
        .expect("constant denominator is nonzero")
        .min(remaining);

    if !ledger.counters.mint_token_supply.is_zero() {
        let weekly_burn = ledger
            .counters
            .mint_token_supply
            .mul_div_floor(Amount::from(WEEKLY_BURN_NUMERATOR), Amount::from(WEEKLY_BURN_DENOMINATOR))
            .expect("constant denominator is nonzero");
        let weekly_cap = weekly_burn
            .mul_div_floor(Amount::from(BURN_CAP_NUMERATOR), Amount::from(BURN_CAP_DENOMINATOR))
            .expect("constant denominator is nonzero");
        let period_cap = weekly_cap
            .mul_div_floor(Amount::from(1u128), Amount::from(PERIODS_PER_WEEK))
            .expect("constant denominator is nonzero");
        if emission > period_cap {
            emission = period_cap;
        }
    }
    emission
}

/// Per-token-weighted stake, aggregated per staker across every token they hold. Sorted
/// traversal of `Ledger::staking_positions` makes the totals reproducible regardless of host.
fn aggregate_stake_weights(ledger: &Ledger) -> Result<(Amount, BTreeMap<StakerId, Amount>), ContractError> {
    let mut total_weight = Amount::zero();
    let mut weight_by_staker: BTreeMap<StakerId, Amount> = BTreeMap::new();
    for (token, staker, position) in ledger.staking_positions() {
        if !position.is_active() {
            continue;
        }
        let weight = if ledger.config.is_special_token(token) {
            position
                .amount
                .mul_div_floor(Amount::from(1u128), Amount::from(SPECIAL_TOKEN_WEIGHT_DIVISOR))
                .expect("SPECIAL_TOKEN_WEIGHT_DIVISOR is a nonzero constant")
        } else {
            position.amount.checked_mul(ledger.config.token_weight(token))?
        };
        total_weight = total_weight.checked_add(weight)?;
        let running = weight_by_staker.get(staker).copied().unwrap_or_else(Amount::zero);
        weight_by_staker.insert(staker.clone(), running.checked_add(weight)?);
    }
    Ok((total_weight, weight_by_staker))
}

/// `Request-Rewards` tick. Computes the capped emission, allocates it pro-rata across
/// the weighted stake table, and dispatches one `Distribute-Rewards` message.
pub fn handle_request_rewards(ledger: &mut Ledger, from: ActorId, now: u64) -> Result<HandlerOutput, ContractError> {
    if ledger.config.paused {
        return Err(ContractError::Paused);
    }
    if from != ledger.config.cron_caller {
        return Err(ContractError::Unauthorized);
    }
    if now < ledger.counters.last_reward_timestamp.saturating_add(ledger.config.min_distribution_interval) {
        return Err(ContractError::DistributionTooSoon);
    }

    let remaining = ledger.config.total_supply.saturating_sub(ledger.counters.current_rewards);
    if remaining.is_zero() {
        return Ok(HandlerOutput::new()
            .add_attribute("action", "request_rewards")
            .add_attribute("result", "no_tokens_remaining"));
    }

    let emission = compute_emission(ledger);
    let (total_weight, weight_by_staker) = aggregate_stake_weights(ledger)?;

    // §7: an empty totalWeight is guarded explicitly and yields an empty allocation, not a
    // failed tick.
    let mut allocations: BTreeMap<StakerId, Amount> = BTreeMap::new();
    if !total_weight.is_zero() {
        for (staker, weight) in &weight_by_staker {
            let alloc = emission
                .mul_div_floor(*weight, total_weight)
                .expect("total_weight just checked nonzero");
            if !alloc.is_zero() {
                allocations.insert(staker.clone(), alloc);
            }
        }
    }

    let treasury = Treasury::new(ledger.config.treasury.clone());
    let message = treasury.distribute_msg(allocations.clone());

    ledger.counters.current_rewards = ledger.counters.current_rewards.checked_add(emission)?;
    ledger.counters.last_reward_timestamp = now;

    Ok(HandlerOutput::new()
        .add_message(message)
        .add_attribute("action", "request_rewards")
        .add_attribute("emission", emission)
        .add_attribute("total_weight", total_weight)
        .add_attribute("staker_count", allocations.len() as u64)
        .add_attribute("current_rewards", ledger.counters.current_rewards))
}

/// `Update-MINT-Supply`. Mint-policy actor only.
pub fn handle_update_mint_supply(ledger: &mut Ledger, new_supply: Amount, from: ActorId) -> Result<HandlerOutput, ContractError> {
    if from != ledger.config.mint_policy {
        return Err(ContractError::Unauthorized);
    }
    ledger.counters.mint_token_supply = new_supply;
    Ok(HandlerOutput::new()
        .add_attribute("action", "update_mint_supply")
        .add_attribute("mint_token_supply", new_supply))
}

/// `Get-Reward-Stats`.
pub fn reward_stats(ledger: &Ledger) -> RewardStatsResponse {
    let remaining = ledger.config.total_supply.saturating_sub(ledger.counters.current_rewards);
    let rate = period_rate();
    let projected_daily_emission = remaining
        .mul_div_floor(
            rate.checked_mul(Amount::from(288u128)).unwrap_or_else(Amount::zero),
            Amount::from(PRECISION_1E8),
        )
        .unwrap_or_else(Amount::zero);
    RewardStatsResponse {
        current_rewards: ledger.counters.current_rewards,
        total_supply: ledger.config.total_supply,
        remaining,
        last_reward_timestamp: ledger.counters.last_reward_timestamp,
        projected_daily_emission,
    }
}

/// `Get-Stake-Ownership(staker)`: `stakerWeight / totalWeight`, expressed in
/// parts-per-million as this engine's integer-arithmetic equivalent of "formatted to 6 decimals".
pub fn stake_ownership(ledger: &Ledger, staker: StakerId) -> Result<StakeOwnershipResponse, ContractError> {
    let (total_weight, weight_by_staker) = aggregate_stake_weights(ledger)?;
    let staker_weight = weight_by_staker.get(&staker).copied().unwrap_or_else(Amount::zero);
    let share_ppm = if total_weight.is_zero() {
        Amount::zero()
    } else {
        staker_weight
            .mul_div_floor(Amount::from(1_000_000u128), total_weight)
            .expect("total_weight just checked nonzero")
    };
    Ok(StakeOwnershipResponse { staker, share_ppm })
}

/// `Get-Unique-Stakers`.
pub fn unique_stakers(ledger: &Ledger) -> UniqueStakersResponse {
    let count = ledger
        .staking_positions()
        .filter(|(_, _, position)| position.is_active())
        .map(|(_, staker, _)| staker)
        .collect::<std::collections::BTreeSet<_>>()
        .len() as u64;
    UniqueStakersResponse { count }
}

/// `Get-Token-Stakes(token)`.
pub fn token_stakes(ledger: &Ledger, token: TokenId) -> TokenStakesResponse {
    let mut total_amount = Amount::zero();
    let mut staker_count = 0u64;
    for (position_token, _, position) in ledger.staking_positions() {
        if position_token == &token && position.is_active() {
            total_amount = total_amount.checked_add(position.amount).unwrap_or(total_amount);
            staker_count += 1;
        }
    }
    TokenStakesResponse {
        token,
        total_amount,
        staker_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_config;
    use stake_pool_types::msg::OutboundMessage;
    use stake_pool_types::pool::StakingPosition;

    #[test]
    fn single_staker_emission_tick_matches_scenario() {
        // remaining = 500_000_000_000, periodRate = 329 -> emission = 1_645_000.
        let mut config = sample_config();
        config.total_supply = Amount::from(500_000_000_000u128);
        let mut ledger = Ledger::new(config);
        let token = TokenId::from("usdx");
        let staker = StakerId::from("alice");
        ledger.set_position(
            &token,
            &staker,
            StakingPosition {
                amount: Amount::from(1_000u128),
                lp_tokens: Amount::from(1u128),
                mint_amount: Amount::from(1u128),
                staked_at: 0,
            },
        );

        let output = handle_request_rewards(&mut ledger, ActorId::from("cron"), 1_000_000).unwrap();
        assert!(output.attributes.iter().any(|a| a.key == "emission" && a.value == "1645000"));
        assert_eq!(ledger.counters.current_rewards, Amount::from(1_645_000u128));

        match output.messages.first().unwrap() {
            OutboundMessage::DistributeRewards { allocations, .. } => {
                assert_eq!(allocations.get(&staker).copied(), Some(Amount::from(1_645_000u128)));
            }
            other => panic!("expected DistributeRewards, got {:?}", other),
        }
    }

    #[test]
    fn tick_too_soon_after_previous_is_rejected() {
        let mut ledger = Ledger::new(sample_config());
        ledger.counters.last_reward_timestamp = 1_000;
        let err = handle_request_rewards(&mut ledger, ActorId::from("cron"), 1_001).unwrap_err();
        assert_eq!(err, ContractError::DistributionTooSoon);
    }

    #[test]
    fn tick_with_no_stakers_yields_empty_allocation_not_an_error() {
        let mut ledger = Ledger::new(sample_config());
        let output = handle_request_rewards(&mut ledger, ActorId::from("cron"), 1_000).unwrap();
        match output.messages.first().unwrap() {
            OutboundMessage::DistributeRewards { allocations, .. } => assert!(allocations.is_empty()),
            other => panic!("expected DistributeRewards, got {:?}", other),
        }
    }

    #[test]
    fn unauthorized_caller_is_rejected() {
        let mut ledger = Ledger::new(sample_config());
        let err = handle_request_rewards(&mut ledger, ActorId::from("not-cron"), 1_000).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
    }
}
