use stake_pool_types::Amount;

const SECONDS_PER_WEEK: u64 = 604_800;
const REBASE_PRECISION: u128 = 100_000_000; // 10^8
const REBASE_NUMERATOR: u128 = 9975; // 0.9975 per week
const REBASE_DENOMINATOR: u128 = 10_000;

/// `w = floor((now - stakedAt) / 604800)`.
pub fn weeks_elapsed(staked_at: u64, now: u64) -> u64 {
    now.saturating_sub(staked_at) / SECONDS_PER_WEEK
}

/// `floor(0.9975^w * 10^8)`, computed by compounding the weekly decay one floor-division at a
/// time rather than evaluating a real-valued power. Equal to `10^8` at `w = 0` and monotone
/// non-increasing.
pub fn factor(weeks: u64) -> Amount {
    let numerator = Amount::from(REBASE_NUMERATOR);
    let denominator = Amount::from(REBASE_DENOMINATOR);
    let mut factor = Amount::from(REBASE_PRECISION);
    for _ in 0..weeks {
        factor = factor
            .mul_div_floor(numerator, denominator)
            .expect("denominator is the nonzero constant 10_000");
    }
    factor
}

/// `rebased = initial * rebaseFactor / 10^8`, `initial` unchanged at `w = 0`.
pub fn rebased_cost_basis(initial: Amount, weeks: u64) -> Amount {
    if weeks == 0 {
        return initial;
    }
    initial
        .mul_div_floor(factor(weeks), Amount::from(REBASE_PRECISION))
        .expect("denominator is the nonzero constant 10^8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_is_one_at_zero_weeks() {
        assert_eq!(factor(0), Amount::from(REBASE_PRECISION));
    }

    #[test]
    fn factor_matches_two_week_scenario() {
        // floor(0.9975^2 * 10^8) = 99_500_625
        assert_eq!(factor(2), Amount::from(99_500_625u128));
    }

    #[test]
    fn factor_is_monotone_non_increasing() {
        let mut previous = factor(0);
        for w in 1..=10 {
            let current = factor(w);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn rebased_cost_basis_matches_scenario() {
        // 10_000_000 * 99_500_625 / 10^8 = 9_950_062
        let rebased = rebased_cost_basis(Amount::from(10_000_000u128), 2);
        assert_eq!(rebased, Amount::from(9_950_062u128));
    }
}
