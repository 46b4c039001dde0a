// File: crowdsale/src/sale/allocation.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use crowdsale_common::{debug, Error, Result};
use solana_program::pubkey::Pubkey;

use super::Crowdsale;
use crate::{ledger::TokenLedger, vesting::VestingSchedule};

impl<L: TokenLedger> Crowdsale<'_, L> {
    /// Grants a vested allocation outside of the purchase path.
    ///
    /// Neither the whitelist nor the sale window apply. A beneficiary keeps a single
    /// schedule, even once revoked.
    ///
    /// # Returns
    /// The beneficiary's new vesting schedule.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::AllocationOutOfBounds` if `amount` is outside of the configured bounds,
    /// - `Error::ScheduleExists` if the beneficiary already has a schedule,
    /// - `Error::SupplyExceeded` if the sale's cap would be exceeded.
    pub fn mint_and_vest(
        &mut self,
        beneficiary: &Pubkey,
        existing: Option<&VestingSchedule>,
        amount: u64,
        bonus: u64,
    ) -> Result<VestingSchedule> {
        self.require_admin()?;
        if amount < self.config.min_initial_allocation
            || amount > self.config.max_initial_allocation
        {
            return Err(Error::AllocationOutOfBounds);
        }
        if existing.is_some() {
            return Err(Error::ScheduleExists);
        }

        let schedule = VestingSchedule::new(self.config, self.now, amount, bonus)?;
        let granted = schedule.granted()?;
        let total_allocated = self.allocate(granted)?;
        debug!("granting {} + {} tokens to {}", amount, bonus, beneficiary);

        let custody = self.ledger.custody();
        self.ledger.mint(&custody, granted)?;

        self.state.total_allocated = total_allocated;
        Ok(schedule)
    }

    /// Lowers the remaining balances of a schedule, moving the difference to the revoked pool.
    ///
    /// # Returns
    /// The number of tokens moved to the pool.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::NoSchedule` if the beneficiary has no schedule,
    /// - `Error::ScheduleRevoked` if the schedule has been revoked,
    /// - `Error::AllocationOutOfBounds` if a balance would increase.
    pub fn update_vesting_schedule(
        &mut self,
        schedule: Option<&mut VestingSchedule>,
        new_amount: u64,
        new_bonus: u64,
    ) -> Result<u64> {
        self.require_admin()?;
        let schedule = schedule.ok_or(Error::NoSchedule)?;

        let mut corrected = *schedule;
        let delta = corrected.correct(new_amount, new_bonus)?;
        let revoked_amount = self
            .state
            .revoked_amount
            .checked_add(delta)
            .ok_or(Error::ArithmeticError)?;

        *schedule = corrected;
        self.state.revoked_amount = revoked_amount;
        Ok(delta)
    }
}
