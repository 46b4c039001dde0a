// File: crowdsale/src/vesting.rs
// Project: crowdsale-onchain
// Creation date: Thursday 13 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use borsh::{BorshDeserialize, BorshSerialize};
use crowdsale_common::{pda::PdaType, Error, Result};
use crowdsale_macro::pda;
use shank::ShankType;
use solana_program::pubkey::Pubkey;

use crate::config::SaleConfig;

/// Vesting schedule of a beneficiary.
///
/// The principal unlocks linearly from `start_timestamp` to `end_timestamp`, with nothing
/// available before `start_timestamp + lock_period`. The bonus unlocks linearly from
/// `end_timestamp` to `bonus_end_timestamp`, and only once the whole principal has been claimed.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, ShankType)]
pub struct VestingSchedule {
    /// Start of the vesting.
    pub start_timestamp: i64,
    /// Time at which the whole principal is unlocked.
    pub end_timestamp: i64,
    /// Delay after the start before anything can be released.
    pub lock_period: i64,
    /// Time at which the whole bonus is unlocked.
    pub bonus_end_timestamp: i64,
    /// Principal granted.
    pub initial_amount: u64,
    /// Principal already released.
    pub initial_amount_claimed: u64,
    /// Principal not released yet.
    pub initial_balance: u64,
    /// Bonus granted.
    pub initial_bonus: u64,
    /// Bonus already released.
    pub bonus_claimed: u64,
    /// Bonus not released yet.
    pub bonus_balance: u64,
    /// Can the administrator revoke this schedule.
    pub revocable: bool,
    /// The schedule has been revoked (terminal).
    pub revoked: bool,
}

/// Amounts released by a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Release {
    /// Principal released.
    pub principal: u64,
    /// Bonus released.
    pub bonus: u64,
}

impl Release {
    /// Total number of tokens released.
    ///
    /// # Errors
    /// On overflow.
    pub fn total(&self) -> Result<u64> {
        self.principal
            .checked_add(self.bonus)
            .ok_or(Error::ArithmeticError)
    }
}

// Part of `amount` unlocked at `now` when vesting linearly between `from` and `to`.
fn linear(amount: u64, from: i64, to: i64, now: i64) -> Result<u64> {
    if now >= to {
        return Ok(amount);
    }
    if now <= from {
        return Ok(0);
    }
    let elapsed = u128::try_from(now.checked_sub(from).ok_or(Error::ArithmeticError)?)
        .map_err(|_err| Error::ArithmeticError)?;
    let duration = u128::try_from(to.checked_sub(from).ok_or(Error::ArithmeticError)?)
        .map_err(|_err| Error::ArithmeticError)?;
    let unlocked = u128::from(amount)
        .checked_mul(elapsed)
        .and_then(|value| value.checked_div(duration))
        .ok_or(Error::ArithmeticError)?;
    u64::try_from(unlocked).map_err(|_err| Error::ArithmeticError)
}

impl VestingSchedule {
    /// Creates a schedule starting at `start` with the sale's vesting parameters.
    ///
    /// # Errors
    /// If the end of the vesting can't be represented.
    pub fn new(config: &SaleConfig, start: i64, amount: u64, bonus: u64) -> Result<Self> {
        let end_timestamp = start
            .checked_add(config.vesting_period)
            .ok_or(Error::ArithmeticError)?;
        let bonus_end_timestamp = end_timestamp
            .checked_add(config.bonus_vesting_period)
            .ok_or(Error::ArithmeticError)?;
        Ok(Self {
            start_timestamp: start,
            end_timestamp,
            lock_period: config.lock_period,
            bonus_end_timestamp,
            initial_amount: amount,
            initial_amount_claimed: 0,
            initial_balance: amount,
            initial_bonus: bonus,
            bonus_claimed: 0,
            bonus_balance: bonus,
            revocable: config.revocable,
            revoked: false,
        })
    }

    /// Total number of tokens granted by the schedule.
    ///
    /// # Errors
    /// On overflow.
    pub fn granted(&self) -> Result<u64> {
        self.initial_amount
            .checked_add(self.initial_bonus)
            .ok_or(Error::ArithmeticError)
    }

    /// Principal unlocked at `now`, claimed or not.
    ///
    /// # Errors
    /// On arithmetic errors.
    pub fn unlocked_principal(&self, now: i64) -> Result<u64> {
        let unlock = self
            .start_timestamp
            .checked_add(self.lock_period)
            .ok_or(Error::ArithmeticError)?;
        if now < unlock {
            return Ok(0);
        }
        linear(
            self.initial_amount,
            self.start_timestamp,
            self.end_timestamp,
            now,
        )
    }

    /// Bonus unlocked at `now`, claimed or not (ignoring the principal's progress).
    ///
    /// # Errors
    /// On arithmetic errors.
    pub fn unlocked_bonus(&self, now: i64) -> Result<u64> {
        linear(
            self.initial_bonus,
            self.end_timestamp,
            self.bonus_end_timestamp,
            now,
        )
    }

    /// Computes what can be released at `now`, without modifying the schedule.
    ///
    /// # Errors
    /// - `Error::ScheduleRevoked` if the schedule has been revoked,
    /// - `Error::NothingToRelease` if nothing new is unlocked.
    pub fn releasable(&self, now: i64) -> Result<Release> {
        if self.revoked {
            return Err(Error::ScheduleRevoked);
        }
        let principal = self
            .unlocked_principal(now)?
            .saturating_sub(self.initial_amount_claimed)
            .min(self.initial_balance);
        let claimed = self
            .initial_amount_claimed
            .checked_add(principal)
            .ok_or(Error::ArithmeticError)?;
        let bonus = if claimed >= self.initial_amount {
            self.unlocked_bonus(now)?
                .saturating_sub(self.bonus_claimed)
                .min(self.bonus_balance)
        } else {
            0
        };
        if principal == 0 && bonus == 0 {
            return Err(Error::NothingToRelease);
        }
        Ok(Release { principal, bonus })
    }

    /// Records a release computed by [`VestingSchedule::releasable`].
    ///
    /// # Errors
    /// If the release is larger than the remaining balances.
    pub fn apply_release(&mut self, release: &Release) -> Result<()> {
        let mut next = *self;
        next.initial_amount_claimed = next
            .initial_amount_claimed
            .checked_add(release.principal)
            .ok_or(Error::ArithmeticError)?;
        next.initial_balance = next
            .initial_balance
            .checked_sub(release.principal)
            .ok_or(Error::InsufficientFunds)?;
        next.bonus_claimed = next
            .bonus_claimed
            .checked_add(release.bonus)
            .ok_or(Error::ArithmeticError)?;
        next.bonus_balance = next
            .bonus_balance
            .checked_sub(release.bonus)
            .ok_or(Error::InsufficientFunds)?;
        *self = next;
        Ok(())
    }

    /// Revokes the schedule, returning the forfeited (unclaimed) tokens.
    ///
    /// # Errors
    /// - `Error::ScheduleRevoked` if it already was,
    /// - `Error::NotRevocable` if the schedule can't be revoked.
    pub fn revoke(&mut self) -> Result<u64> {
        if self.revoked {
            return Err(Error::ScheduleRevoked);
        }
        if !self.revocable {
            return Err(Error::NotRevocable);
        }
        let forfeited = self
            .initial_balance
            .checked_add(self.bonus_balance)
            .ok_or(Error::ArithmeticError)?;
        self.initial_balance = 0;
        self.bonus_balance = 0;
        self.revoked = true;
        Ok(forfeited)
    }

    /// Lowers the remaining balances, returning the tokens taken back.
    ///
    /// The granted totals are rebased on what has already been claimed, so that
    /// `balance + claimed = granted` keeps holding.
    ///
    /// # Errors
    /// - `Error::ScheduleRevoked` if the schedule has been revoked,
    /// - `Error::AllocationOutOfBounds` if a new balance is larger than the current one.
    pub fn correct(&mut self, new_balance: u64, new_bonus: u64) -> Result<u64> {
        if self.revoked {
            return Err(Error::ScheduleRevoked);
        }
        let (Some(principal_delta), Some(bonus_delta)) = (
            self.initial_balance.checked_sub(new_balance),
            self.bonus_balance.checked_sub(new_bonus),
        ) else {
            return Err(Error::AllocationOutOfBounds);
        };
        let delta = principal_delta
            .checked_add(bonus_delta)
            .ok_or(Error::ArithmeticError)?;
        let initial_amount = self
            .initial_amount_claimed
            .checked_add(new_balance)
            .ok_or(Error::ArithmeticError)?;
        let initial_bonus = self
            .bonus_claimed
            .checked_add(new_bonus)
            .ok_or(Error::ArithmeticError)?;

        self.initial_amount = initial_amount;
        self.initial_balance = new_balance;
        self.initial_bonus = initial_bonus;
        self.bonus_balance = new_bonus;
        Ok(delta)
    }

    /// Checks the accounting invariants of the schedule.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.revoked {
            return self.initial_balance == 0 && self.bonus_balance == 0;
        }
        self.initial_balance.checked_add(self.initial_amount_claimed) == Some(self.initial_amount)
            && self.bonus_balance.checked_add(self.bonus_claimed) == Some(self.initial_bonus)
    }
}

/// Vesting schedule PDA, one per beneficiary.
#[pda(kind = PdaType::VestingSchedule, seed = "Vesting", seed = beneficiary)]
pub struct VestingSchedulePda {
    /// Owner of the vested tokens.
    pub beneficiary: Pubkey,
    /// The schedule itself.
    pub schedule: VestingSchedule,
}

impl VestingSchedulePda {
    /// Creates a new vesting schedule PDA
    #[must_use]
    pub const fn new(bump: u8, beneficiary: Pubkey, schedule: VestingSchedule) -> Self {
        Self {
            pda_type: PdaType::VestingSchedule,
            bump,
            beneficiary,
            schedule,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crowdsale_common::pda::SalePda as _;

    use super::*;
    use crate::config::DAY;

    const START: i64 = 1_717_200_000;
    const AMOUNT: u64 = 500_000;
    const BONUS: u64 = 100_000;

    fn setup() -> VestingSchedule {
        VestingSchedule::new(&SaleConfig::default_for(START), START, AMOUNT, BONUS).unwrap()
    }

    #[test]
    fn creation() {
        let schedule = setup();
        assert_eq!(schedule.end_timestamp, START + 150 * DAY);
        assert_eq!(schedule.bonus_end_timestamp, START + 180 * DAY);
        assert_eq!(schedule.granted(), Ok(600_000));
        assert!(schedule.is_consistent());
    }

    #[test]
    fn nothing_at_start() {
        let schedule = setup();
        assert_eq!(schedule.releasable(START), Err(Error::NothingToRelease));
        assert_eq!(schedule.releasable(START - DAY), Err(Error::NothingToRelease));
    }

    #[test]
    fn lock_period() {
        let mut config = SaleConfig::default_for(START);
        config.lock_period = 10 * DAY;
        let schedule = VestingSchedule::new(&config, START, AMOUNT, BONUS).unwrap();
        assert_eq!(schedule.releasable(START + 10 * DAY - 1), Err(Error::NothingToRelease));
        // The principal accrued during the lock is available once it's over.
        assert_eq!(
            schedule.releasable(START + 10 * DAY).unwrap().principal,
            AMOUNT / 15
        );
    }

    #[test]
    fn monthly_releases() {
        let mut schedule = setup();
        for month in 1..=5 {
            let release = schedule.releasable(START + month * 30 * DAY).unwrap();
            assert_eq!(release.principal, AMOUNT / 5, "month {month}");
            schedule.apply_release(&release).unwrap();
            assert!(schedule.is_consistent());
        }
        assert_eq!(schedule.initial_balance, 0);
        assert_eq!(schedule.initial_amount_claimed, AMOUNT);
        assert_eq!(schedule.bonus_claimed, 0);
    }

    #[test]
    fn second_release_is_empty() {
        let mut schedule = setup();
        let now = START + 45 * DAY;
        let release = schedule.releasable(now).unwrap();
        schedule.apply_release(&release).unwrap();
        assert_eq!(schedule.releasable(now), Err(Error::NothingToRelease));
    }

    #[test]
    fn bonus_after_principal() {
        let mut schedule = setup();
        let release = schedule.releasable(START + 150 * DAY).unwrap();
        assert_eq!(release, Release { principal: AMOUNT, bonus: 0 });
        schedule.apply_release(&release).unwrap();

        let release = schedule.releasable(START + 165 * DAY).unwrap();
        assert_eq!(release, Release { principal: 0, bonus: BONUS / 2 });
        schedule.apply_release(&release).unwrap();

        let release = schedule.releasable(START + 200 * DAY).unwrap();
        assert_eq!(release, Release { principal: 0, bonus: BONUS / 2 });
        schedule.apply_release(&release).unwrap();

        assert!(schedule.is_consistent());
        assert_eq!(schedule.releasable(START + 400 * DAY), Err(Error::NothingToRelease));
    }

    #[test]
    fn principal_and_bonus_in_one_call() {
        let mut schedule = setup();
        let release = schedule.releasable(START + 60 * DAY).unwrap();
        schedule.apply_release(&release).unwrap();

        let release = schedule.releasable(START + 170 * DAY).unwrap();
        assert_eq!(release.principal, AMOUNT - AMOUNT * 2 / 5);
        assert_eq!(release.bonus, BONUS * 2 / 3);
    }

    #[test]
    fn bonus_waits_for_principal_claim() {
        let schedule = setup();
        // Past the bonus window but nothing claimed yet: everything at once.
        let release = schedule.releasable(START + 200 * DAY).unwrap();
        assert_eq!(release, Release { principal: AMOUNT, bonus: BONUS });
    }

    #[test]
    fn revocation() {
        let mut schedule = setup();
        let release = schedule.releasable(START + 30 * DAY).unwrap();
        schedule.apply_release(&release).unwrap();

        assert_eq!(schedule.revoke(), Ok(AMOUNT - AMOUNT / 5 + BONUS));
        assert!(schedule.revoked);
        assert!(schedule.is_consistent());
        assert_eq!(schedule.initial_amount_claimed, AMOUNT / 5);
        assert_eq!(schedule.releasable(START + 400 * DAY), Err(Error::ScheduleRevoked));
        assert_eq!(schedule.revoke(), Err(Error::ScheduleRevoked));
    }

    #[test]
    fn not_revocable() {
        let mut config = SaleConfig::default_for(START);
        config.revocable = false;
        let mut schedule = VestingSchedule::new(&config, START, AMOUNT, BONUS).unwrap();
        assert_eq!(schedule.revoke(), Err(Error::NotRevocable));
        assert!(!schedule.revoked);
    }

    #[test]
    fn correction() {
        let mut schedule = setup();
        assert_eq!(schedule.correct(400_000, 50_000), Ok(150_000));
        assert_eq!(schedule.initial_balance, 400_000);
        assert_eq!(schedule.bonus_balance, 50_000);
        assert!(schedule.is_consistent());
    }

    #[test]
    fn correction_after_claim() {
        let mut schedule = setup();
        let release = schedule.releasable(START + 30 * DAY).unwrap();
        schedule.apply_release(&release).unwrap();

        assert_eq!(schedule.correct(300_000, BONUS), Ok(100_000));
        assert_eq!(schedule.initial_amount, 400_000);
        assert!(schedule.is_consistent());
    }

    #[test]
    fn correction_cannot_increase() {
        let mut schedule = setup();
        assert_eq!(schedule.correct(AMOUNT + 1, BONUS), Err(Error::AllocationOutOfBounds));
        assert_eq!(schedule.correct(AMOUNT, BONUS + 1), Err(Error::AllocationOutOfBounds));
        assert_eq!(schedule, setup());
    }

    #[test]
    fn correction_after_revocation() {
        let mut schedule = setup();
        schedule.revoke().unwrap();
        assert_eq!(schedule.correct(0, 0), Err(Error::ScheduleRevoked));
    }

    #[test]
    fn pda_seeds() {
        let beneficiary = Pubkey::new_unique();
        let pda = VestingSchedulePda::new(253, beneficiary, setup());
        assert_eq!(
            pda.seeds(),
            vec![b"Vesting".to_vec(), beneficiary.to_bytes().to_vec(), vec![253]]
        );
        let (address, bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
        assert_eq!(
            Pubkey::create_program_address(
                &[b"Vesting", beneficiary.as_ref(), &[bump]],
                &crate::ID
            ),
            Ok(address)
        );
    }
}
