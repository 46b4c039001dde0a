// File: crowdsale/src/sale/pool.rs
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
    /// Revokes a schedule, moving its unclaimed tokens to the revoked pool.
    ///
    /// # Returns
    /// The number of tokens forfeited.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::NoSchedule` if the beneficiary has no schedule,
    /// - `Error::NotRevocable` if the schedule can't be revoked,
    /// - `Error::ScheduleRevoked` if it already was.
    pub fn revoke_vesting(&mut self, schedule: Option<&mut VestingSchedule>) -> Result<u64> {
        self.require_admin()?;
        let schedule = schedule.ok_or(Error::NoSchedule)?;

        let mut revoked = *schedule;
        let forfeited = revoked.revoke()?;
        let revoked_amount = self
            .state
            .revoked_amount
            .checked_add(forfeited)
            .ok_or(Error::ArithmeticError)?;

        *schedule = revoked;
        self.state.revoked_amount = revoked_amount;
        Ok(forfeited)
    }

    /// Moves tokens out of the revoked pool.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::InvalidAmount` for an empty transfer,
    /// - `Error::InsufficientPool` if the pool holds less than `amount`.
    pub fn transfer_revoked_tokens(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.require_admin()?;
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        let remaining = self
            .state
            .revoked_amount
            .checked_sub(amount)
            .ok_or(Error::InsufficientPool)?;
        debug!("moving {} revoked tokens to {}", amount, to);

        self.ledger.transfer(to, amount)?;

        self.state.revoked_amount = remaining;
        Ok(())
    }

    /// Closes the sale, minting the team allocation.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::AlreadyFinalized` if the sale already was,
    /// - `Error::SaleNotEnded` before the end of the sale.
    pub fn finalize(&mut self) -> Result<()> {
        self.require_admin()?;
        if self.state.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if self.now < self.config.end_time {
            return Err(Error::SaleNotEnded);
        }

        let team_wallet = self.state.team_wallet;
        self.ledger.mint(&team_wallet, self.config.team_allocation)?;

        self.state.finalized = true;
        Ok(())
    }

    /// Hands the mint authority of the token over to `new_owner`.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::MintAuthorityMismatch` if the sale doesn't hold the mint authority.
    pub fn update_token_owner(&mut self, new_owner: &Pubkey) -> Result<()> {
        self.require_admin()?;
        self.ledger.transfer_ownership(new_owner)?;
        self.state.token_owner = *new_owner;
        Ok(())
    }
}
