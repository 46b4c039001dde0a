// File: crowdsale/src/sale/release.rs
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
use crate::{
    ledger::TokenLedger,
    vesting::{Release, VestingSchedule},
};

impl<L: TokenLedger> Crowdsale<'_, L> {
    /// Releases the unlocked tokens of a schedule to its beneficiary.
    ///
    /// Anyone may trigger a release: the tokens always go to `beneficiary`.
    ///
    /// # Errors
    /// - `Error::NoSchedule` if the beneficiary has no schedule,
    /// - `Error::ScheduleRevoked` if the schedule has been revoked,
    /// - `Error::NothingToRelease` if nothing new is unlocked.
    pub fn release(
        &mut self,
        beneficiary: &Pubkey,
        schedule: Option<&mut VestingSchedule>,
    ) -> Result<Release> {
        let schedule = schedule.ok_or(Error::NoSchedule)?;
        let release = schedule.releasable(self.now)?;
        let mut next = *schedule;
        next.apply_release(&release)?;
        debug!(
            "releasing {} + {} tokens to {}",
            release.principal, release.bonus, beneficiary
        );

        self.ledger.transfer(beneficiary, release.total()?)?;

        *schedule = next;
        Ok(release)
    }
}
