// File: crowdsale/src/sale/mod.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

//! Accounting core of the sale.
//!
//! Every operation checks its preconditions first, then calls the token ledger,
//! and only then updates the records: a failing operation leaves them untouched.

mod allocation;
mod contribution;
mod pool;
mod release;

use crowdsale_common::{debug, security::require_admin, Error, Result};
use solana_program::pubkey::Pubkey;

use crate::{
    config::{SaleConfig, SaleState},
    ledger::TokenLedger,
    rate::check_rate_update,
    whitelist::WhitelistPda,
};

/// A single operation on the sale, performed by `caller` at `now`.
pub struct Crowdsale<'a, L> {
    config: &'a SaleConfig,
    state: &'a mut SaleState,
    ledger: &'a mut L,
    caller: Pubkey,
    now: i64,
}

impl<'a, L: TokenLedger> Crowdsale<'a, L> {
    /// Prepares an operation on the sale.
    ///
    /// # Parameters
    /// * `config` - Parameters of the sale,
    /// * `state` - Running state of the sale, updated by the operation,
    /// * `ledger` - Token ledger,
    /// * `caller` - Authenticated caller of the operation,
    /// * `now` - Current timestamp.
    pub fn new(
        config: &'a SaleConfig,
        state: &'a mut SaleState,
        ledger: &'a mut L,
        caller: Pubkey,
        now: i64,
    ) -> Self {
        Self {
            config,
            state,
            ledger,
            caller,
            now,
        }
    }

    fn require_admin(&self) -> Result<()> {
        require_admin(&self.caller, &self.state.admin)
    }

    // New total allocation of the sale once `amount` more tokens are allocated.
    fn allocate(&self, amount: u64) -> Result<u64> {
        let total = self
            .state
            .total_allocated
            .checked_add(amount)
            .ok_or(Error::ArithmeticError)?;
        if total > self.config.sale_supply_cap {
            debug!(
                "allocating {} would bring the sale to {} (cap {})",
                amount, total, self.config.sale_supply_cap
            );
            return Err(Error::SupplyExceeded);
        }
        Ok(total)
    }

    /// Updates the conversion rate, within 10% of the current one.
    ///
    /// # Errors
    /// - `Error::Unauthorized` if the caller isn't the administrator,
    /// - `Error::RateOutOfBounds` if the new rate is too far from the current one.
    pub fn update_rate(&mut self, new_rate: u64) -> Result<()> {
        self.require_admin()?;
        check_rate_update(self.state.rate, new_rate)?;
        self.state.rate = new_rate;
        Ok(())
    }

    /// Adds or removes whitelist entries.
    ///
    /// Adding a listed address or removing an absent one does nothing.
    ///
    /// # Returns
    /// The number of entries that changed.
    ///
    /// # Errors
    /// `Error::Unauthorized` if the caller isn't the administrator.
    pub fn update_whitelist(&self, entries: &mut [WhitelistPda], listed: bool) -> Result<usize> {
        self.require_admin()?;
        let mut changed = 0_usize;
        for entry in entries.iter_mut().filter(|entry| entry.listed != listed) {
            entry.listed = listed;
            changed = changed.saturating_add(1);
        }
        Ok(changed)
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use solana_program::pubkey::Pubkey;

    use super::Crowdsale;
    use crate::{
        config::{SaleConfig, SaleState, ONE_TOKEN},
        ledger::memory::MemoryLedger,
    };

    pub const START: i64 = 1_717_200_000;
    pub const RATE: u64 = 1000;
    pub const ONE_SOL: u64 = 1_000_000_000;
    pub const TOKENS: u64 = ONE_TOKEN;

    pub struct Sale {
        pub config: SaleConfig,
        pub state: SaleState,
        pub ledger: MemoryLedger,
        pub admin: Pubkey,
    }

    impl Sale {
        pub fn new() -> Self {
            let admin = Pubkey::new_unique();
            let custody = Pubkey::new_unique();
            Self {
                config: SaleConfig::default_for(START),
                state: SaleState::new(admin, Pubkey::new_unique(), Pubkey::new_unique(), RATE),
                ledger: MemoryLedger::new(custody),
                admin,
            }
        }

        pub fn as_caller(&mut self, caller: Pubkey, now: i64) -> Crowdsale<'_, MemoryLedger> {
            Crowdsale::new(&self.config, &mut self.state, &mut self.ledger, caller, now)
        }

        pub fn as_admin(&mut self, now: i64) -> Crowdsale<'_, MemoryLedger> {
            let admin = self.admin;
            self.as_caller(admin, now)
        }

        pub fn custody_balance(&self) -> u64 {
            self.ledger
                .balances
                .get(&self.ledger.custody)
                .copied()
                .unwrap_or_default()
        }
    }
}
