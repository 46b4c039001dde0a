// File: crowdsale/src/bonus.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use crowdsale_common::{Error, Result};

use crate::config::{SaleConfig, DAY};

// (first day without the bonus, percentage)
const TIERS: [(i64, u8); 4] = [(2, 30), (4, 20), (6, 10), (8, 5)];

/// Bonus percentage for a purchase made at `now`.
///
/// # Errors
/// `Error::SaleNotOpen` outside of `[start_time, end_time)`.
pub fn bonus_percentage(config: &SaleConfig, now: i64) -> Result<u8> {
    if now < config.start_time || now >= config.end_time {
        return Err(Error::SaleNotOpen);
    }
    let days = now
        .checked_sub(config.start_time)
        .and_then(|elapsed| elapsed.checked_div(DAY))
        .ok_or(Error::ArithmeticError)?;
    Ok(TIERS
        .iter()
        .find(|(limit, _)| days < *limit)
        .map_or(0, |(_, pct)| *pct))
}

/// Bonus granted on `principal` for a given percentage.
///
/// # Errors
/// On overflow.
pub fn bonus_amount(principal: u64, percentage: u8) -> Result<u64> {
    let bonus = u128::from(principal)
        .checked_mul(u128::from(percentage))
        .and_then(|bonus| bonus.checked_div(100))
        .ok_or(Error::ArithmeticError)?;
    u64::try_from(bonus).map_err(|_err| Error::ArithmeticError)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_717_200_000;

    fn config() -> SaleConfig {
        SaleConfig::default_for(START)
    }

    #[test]
    fn tiers() {
        let config = config();
        for (day, expected) in [(0, 30), (1, 30), (2, 20), (3, 20), (4, 10), (5, 10), (6, 5), (7, 5), (8, 0), (29, 0)] {
            assert_eq!(
                bonus_percentage(&config, START + day * DAY),
                Ok(expected),
                "day {day}"
            );
        }
    }

    #[test]
    fn tier_boundaries() {
        let config = config();
        assert_eq!(bonus_percentage(&config, START + 2 * DAY - 1), Ok(30));
        assert_eq!(bonus_percentage(&config, START + 8 * DAY - 1), Ok(5));
        assert_eq!(bonus_percentage(&config, START + 8 * DAY), Ok(0));
    }

    #[test]
    fn closed_sale() {
        let config = config();
        assert_eq!(bonus_percentage(&config, START - 1), Err(Error::SaleNotOpen));
        assert_eq!(bonus_percentage(&config, config.end_time), Err(Error::SaleNotOpen));
        assert_eq!(bonus_percentage(&config, config.end_time - 1), Ok(0));
    }

    #[test]
    fn amounts() {
        assert_eq!(bonus_amount(1000, 30), Ok(300));
        assert_eq!(bonus_amount(1000, 20), Ok(200));
        assert_eq!(bonus_amount(1000, 0), Ok(0));
        assert_eq!(bonus_amount(u64::MAX, 30), Ok(5_534_023_222_112_865_484));
    }
}
