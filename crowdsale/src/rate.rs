// File: crowdsale/src/rate.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use crowdsale_common::{Error, Result};
use solana_program::msg;

/// Checks that a new conversion rate stays within 10% of the current one (bounds included).
///
/// # Errors
/// `Error::RateOutOfBounds` if the new rate is too far from the current one (or zero).
pub fn check_rate_update(current: u64, new: u64) -> Result<()> {
    let scale = |value: u64, factor: u128| {
        u128::from(value)
            .checked_mul(factor)
            .ok_or(Error::ArithmeticError)
    };
    let scaled = scale(new, 10)?;
    if new == 0 || scaled < scale(current, 9)? || scaled > scale(current, 11)? {
        msg!("rate {} is not within 10% of {}", new, current);
        return Err(Error::RateOutOfBounds);
    }
    Ok(())
}

/// Tokens (base units) obtained for `value` lamports.
///
/// # Errors
/// If the amount does not fit in a `u64`.
pub fn tokens_for(value: u64, rate: u64) -> Result<u64> {
    value.checked_mul(rate).ok_or(Error::ArithmeticError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(check_rate_update(1000, 900), Ok(()));
        assert_eq!(check_rate_update(1000, 1100), Ok(()));
        assert_eq!(check_rate_update(1000, 1050), Ok(()));
    }

    #[test]
    fn outside_bounds() {
        assert_eq!(check_rate_update(1000, 899), Err(Error::RateOutOfBounds));
        assert_eq!(check_rate_update(1000, 1101), Err(Error::RateOutOfBounds));
        assert_eq!(check_rate_update(1000, 0), Err(Error::RateOutOfBounds));
    }

    #[test]
    fn no_overflow_on_large_rates() {
        assert_eq!(check_rate_update(u64::MAX, u64::MAX), Ok(()));
        assert_eq!(check_rate_update(u64::MAX, u64::MAX - u64::MAX / 10), Ok(()));
        assert_eq!(check_rate_update(u64::MAX / 11, u64::MAX), Err(Error::RateOutOfBounds));
    }

    #[test]
    fn one_sol_at_initial_rate() {
        assert_eq!(tokens_for(1_000_000_000, 1000), Ok(1_000_000_000_000));
        assert_eq!(tokens_for(u64::MAX, 2), Err(Error::ArithmeticError));
    }
}
