use stake_pool_types::Amount;

/// Impermanent-loss compensation. The production pricing formula depends on external AMM curve
/// math that is out of scope here; this implements the contract such a formula must satisfy:
/// deterministic in its inputs, always a valid non-negative `Amount`, drawn from a protocol
/// reserve rather than the user's own withdrawal.
///
/// This stub satisfies that contract by compensating exactly the shortfall between what was
/// withdrawn and the user's original deposit — the simplest policy that is pure, non-negative,
/// and zero whenever the position lost no value relative to cost basis. A host wiring in the
/// real IL-pricing formula replaces this function; nothing else in the unstake path depends on
/// its internals.
pub fn compensation(initial_user_amount: Amount, withdrawn_user_amount: Amount) -> Amount {
    initial_user_amount.saturating_sub(withdrawn_user_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_shortfall_means_no_compensation() {
        assert_eq!(compensation(Amount::from(100u128), Amount::from(110u128)), Amount::zero());
    }

    #[test]
    fn shortfall_is_compensated_in_full() {
        assert_eq!(compensation(Amount::from(100u128), Amount::from(80u128)), Amount::from(20u128));
    }
}
