// File: crowdsale/src/sale/contribution.rs
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
    bonus::{bonus_amount, bonus_percentage},
    ledger::{TokenLedger, ValueSink},
    rate::tokens_for,
    vesting::VestingSchedule,
};

impl<L: TokenLedger> Crowdsale<'_, L> {
    /// Buys tokens for `beneficiary` with `value` lamports.
    ///
    /// The principal and the bonus are minted into the sale's custody and vest on a new
    /// schedule starting now; the payment goes to the receiving wallet.
    ///
    /// # Parameters
    /// * `sink` - Receiver of the payment,
    /// * `beneficiary` - Owner of the vested tokens,
    /// * `whitelisted` - Membership of the beneficiary,
    /// * `existing` - Schedule already held by the beneficiary, if any,
    /// * `value` - Payment, in lamports.
    ///
    /// # Returns
    /// The beneficiary's new vesting schedule.
    ///
    /// # Errors
    /// - `Error::SaleNotOpen` outside of the sale window,
    /// - `Error::NotWhitelisted` if the beneficiary isn't whitelisted,
    /// - `Error::AlreadyContributed` if the beneficiary already has a schedule,
    /// - `Error::SupplyExceeded` if the sale's cap would be exceeded.
    pub fn buy_tokens<V: ValueSink>(
        &mut self,
        sink: &mut V,
        beneficiary: &Pubkey,
        whitelisted: bool,
        existing: Option<&VestingSchedule>,
        value: u64,
    ) -> Result<VestingSchedule> {
        let percentage = bonus_percentage(self.config, self.now)?;
        if !whitelisted {
            return Err(Error::NotWhitelisted);
        }
        if existing.is_some() {
            return Err(Error::AlreadyContributed);
        }
        if value == 0 {
            return Err(Error::InvalidAmount);
        }

        let principal = tokens_for(value, self.state.rate)?;
        let bonus = bonus_amount(principal, percentage)?;
        let schedule = VestingSchedule::new(self.config, self.now, principal, bonus)?;
        let granted = schedule.granted()?;
        let total_allocated = self.allocate(granted)?;
        debug!(
            "{} buys {} tokens with a {}% bonus ({})",
            beneficiary, principal, percentage, bonus
        );

        let custody = self.ledger.custody();
        self.ledger.mint(&custody, granted)?;
        sink.forward(value)?;

        self.state.total_allocated = total_allocated;
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::DAY,
        ledger::memory::MemorySink,
        sale::fixture::*,
    };

    fn buy(sale: &mut Sale, day: i64) -> Result<VestingSchedule> {
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        sale.as_caller(buyer, START + day * DAY)
            .buy_tokens(&mut sink, &buyer, true, None, ONE_SOL)
    }

    #[test]
    fn first_day_purchase() {
        let mut sale = Sale::new();
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        let schedule = sale
            .as_caller(buyer, START)
            .buy_tokens(&mut sink, &buyer, true, None, ONE_SOL)
            .unwrap();

        assert_eq!(schedule.initial_amount, 1000 * TOKENS);
        assert_eq!(schedule.initial_bonus, 300 * TOKENS);
        assert_eq!(schedule.initial_balance, 1000 * TOKENS);
        assert_eq!(schedule.bonus_balance, 300 * TOKENS);
        assert_eq!(schedule.start_timestamp, START);
        assert_eq!(sale.state.total_allocated, 1300 * TOKENS);
        assert_eq!(sale.custody_balance(), 1300 * TOKENS);
        assert_eq!(sink.forwarded, ONE_SOL);
    }

    #[test]
    fn bonus_tiers() {
        for (day, bonus) in [(1, 300), (3, 200), (5, 100), (7, 50), (9, 0)] {
            let mut sale = Sale::new();
            let schedule = buy(&mut sale, day).unwrap();
            assert_eq!(schedule.initial_bonus, bonus * TOKENS, "day {day}");
        }
    }

    #[test]
    fn closed_sale() {
        let mut sale = Sale::new();
        assert_eq!(buy(&mut sale, -1), Err(Error::SaleNotOpen));
        assert_eq!(buy(&mut sale, 30), Err(Error::SaleNotOpen));
        assert_eq!(sale.state.total_allocated, 0);
    }

    #[test]
    fn not_whitelisted() {
        let mut sale = Sale::new();
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        assert_eq!(
            sale.as_caller(buyer, START)
                .buy_tokens(&mut sink, &buyer, false, None, ONE_SOL),
            Err(Error::NotWhitelisted)
        );
        assert_eq!(sink.forwarded, 0);
    }

    #[test]
    fn second_purchase() {
        let mut sale = Sale::new();
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        let schedule = sale
            .as_caller(buyer, START)
            .buy_tokens(&mut sink, &buyer, true, None, ONE_SOL)
            .unwrap();
        assert_eq!(
            sale.as_caller(buyer, START + DAY)
                .buy_tokens(&mut sink, &buyer, true, Some(&schedule), ONE_SOL),
            Err(Error::AlreadyContributed)
        );
        assert_eq!(sale.state.total_allocated, schedule.granted().unwrap());
        assert_eq!(sink.forwarded, ONE_SOL);
    }

    #[test]
    fn supply_cap() {
        let mut sale = Sale::new();
        sale.config.sale_supply_cap = 1300 * TOKENS;
        buy(&mut sale, 0).unwrap();
        assert_eq!(buy(&mut sale, 0), Err(Error::SupplyExceeded));
        assert_eq!(sale.state.total_allocated, 1300 * TOKENS);
        assert_eq!(sale.custody_balance(), 1300 * TOKENS);
    }

    #[test]
    fn lost_mint_authority_changes_nothing() {
        let mut sale = Sale::new();
        sale.ledger.authority = Pubkey::new_unique();
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        assert_eq!(
            sale.as_caller(buyer, START)
                .buy_tokens(&mut sink, &buyer, true, None, ONE_SOL),
            Err(Error::MintAuthorityMismatch)
        );
        assert_eq!(sale.state.total_allocated, 0);
        assert_eq!(sink.forwarded, 0);
    }

    #[test]
    fn zero_payment() {
        let mut sale = Sale::new();
        let mut sink = MemorySink::default();
        let buyer = Pubkey::new_unique();
        assert_eq!(
            sale.as_caller(buyer, START)
                .buy_tokens(&mut sink, &buyer, true, None, 0),
            Err(Error::InvalidAmount)
        );
    }
}
