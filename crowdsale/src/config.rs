// File: crowdsale/src/config.rs
// Project: crowdsale-onchain
// Creation date: Thursday 13 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use borsh::{BorshDeserialize, BorshSerialize};
use crowdsale_common::{format_timestamp, pda::PdaType, Error, Result};
use crowdsale_macro::pda;
use shank::ShankType;
use solana_program::{msg, pubkey::Pubkey};

/// Number of decimals of the sold token.
pub const DECIMALS: u8 = 9;
/// Base units in one whole token.
pub const ONE_TOKEN: u64 = 1_000_000_000;
/// Duration of a day, in seconds.
pub const DAY: i64 = 86_400;
/// Seeds of the token's mint account (without the bump).
pub const MINT_SEEDS: [&[u8]; 2] = [b"Mint", b"SALE"];

/// Get the address of the token's mint.
#[must_use]
pub fn get_mint_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&MINT_SEEDS, program_id)
}

/// Parameters of the sale, fixed at initialization.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, ShankType)]
pub struct SaleConfig {
    /// Opening of the sale.
    pub start_time: i64,
    /// Closing of the sale (exclusive).
    pub end_time: i64,
    /// Smallest administrative grant (base units, principal only).
    pub min_initial_allocation: u64,
    /// Largest administrative grant (base units, principal only).
    pub max_initial_allocation: u64,
    /// Maximum number of tokens allocated by the sale (principal and bonus).
    pub sale_supply_cap: u64,
    /// Tokens minted to the team on finalization.
    pub team_allocation: u64,
    /// Duration of the principal's linear vesting (seconds).
    pub vesting_period: i64,
    /// Time after the start of a schedule before anything can be released (seconds).
    pub lock_period: i64,
    /// Duration of the bonus' linear vesting, after the principal's (seconds).
    pub bonus_vesting_period: i64,
    /// Whether the administrator may revoke the schedules.
    pub revocable: bool,
}

impl SaleConfig {
    /// Default parameters for a sale opening at `start_time`.
    #[must_use]
    pub const fn default_for(start_time: i64) -> Self {
        Self {
            start_time,
            end_time: start_time.saturating_add(30 * DAY),
            min_initial_allocation: 10_000 * ONE_TOKEN,
            max_initial_allocation: 5_000_000 * ONE_TOKEN,
            sale_supply_cap: 165_000_000 * ONE_TOKEN,
            team_allocation: 135_000_000 * ONE_TOKEN,
            vesting_period: 150 * DAY,
            lock_period: 0,
            bonus_vesting_period: 30 * DAY,
            revocable: true,
        }
    }

    /// Checks that the parameters are consistent.
    ///
    /// # Errors
    /// `Error::InvalidSaleConfiguration` if they aren't.
    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            msg!(
                "sale window is empty: {} -> {}",
                format_timestamp(self.start_time),
                format_timestamp(self.end_time)
            );
            return Err(Error::InvalidSaleConfiguration);
        }
        if self.min_initial_allocation > self.max_initial_allocation
            || self.max_initial_allocation > self.sale_supply_cap
        {
            msg!(
                "allocation bounds are inconsistent: min {}, max {}, cap {}",
                self.min_initial_allocation,
                self.max_initial_allocation,
                self.sale_supply_cap
            );
            return Err(Error::InvalidSaleConfiguration);
        }
        if self.vesting_period < 0 || self.lock_period < 0 || self.bonus_vesting_period < 0 {
            msg!("vesting periods can't be negative");
            return Err(Error::InvalidSaleConfiguration);
        }
        Ok(())
    }
}

/// Running state of the sale.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, ShankType)]
pub struct SaleState {
    /// Single administrator of the sale.
    pub admin: Pubkey,
    /// Wallet receiving the buyers' payments.
    pub wallet: Pubkey,
    /// Recipient of the team allocation.
    pub team_wallet: Pubkey,
    /// Mint of the sold token (default until the mint is created).
    pub mint: Pubkey,
    /// Base units of token per lamport.
    pub rate: u64,
    /// Tokens allocated so far (principal and bonus), counted against the supply cap.
    pub total_allocated: u64,
    /// Tokens forfeited by revocations and corrections, held in custody.
    pub revoked_amount: u64,
    /// Set once the team allocation has been minted.
    pub finalized: bool,
    /// Last known holder of the mint authority.
    pub token_owner: Pubkey,
}

impl SaleState {
    /// State of a sale that hasn't sold anything yet.
    #[must_use]
    pub const fn new(admin: Pubkey, wallet: Pubkey, team_wallet: Pubkey, rate: u64) -> Self {
        Self {
            admin,
            wallet,
            team_wallet,
            mint: Pubkey::new_from_array([0; 32]),
            rate,
            total_allocated: 0,
            revoked_amount: 0,
            finalized: false,
            token_owner: Pubkey::new_from_array([0; 32]),
        }
    }
}

/// Configuration PDA of the crowdsale program.
#[pda(kind = PdaType::SaleConfiguration, seed = "SaleConfiguration")]
pub struct ConfigurationPda {
    /// Parameters of the sale.
    pub config: SaleConfig,
    /// Running state of the sale.
    pub state: SaleState,
}

impl ConfigurationPda {
    /// Creates a new configuration PDA
    #[must_use]
    pub const fn new(bump: u8, config: SaleConfig, state: SaleState) -> Self {
        Self {
            pda_type: PdaType::SaleConfiguration,
            bump,
            config,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crowdsale_common::pda::SalePda as _;

    use super::*;

    const START: i64 = 1_717_200_000;

    #[test]
    fn defaults_are_valid() {
        let config = SaleConfig::default_for(START);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.end_time - config.start_time, 30 * DAY);
        assert_eq!(config.team_allocation, 135_000_000 * ONE_TOKEN);
    }

    #[test]
    fn empty_window() {
        let mut config = SaleConfig::default_for(START);
        config.end_time = START;
        assert_eq!(config.validate(), Err(Error::InvalidSaleConfiguration));
    }

    #[test]
    fn inverted_allocation_bounds() {
        let mut config = SaleConfig::default_for(START);
        config.min_initial_allocation = config.max_initial_allocation + 1;
        assert_eq!(config.validate(), Err(Error::InvalidSaleConfiguration));

        let mut config = SaleConfig::default_for(START);
        config.max_initial_allocation = config.sale_supply_cap + 1;
        assert_eq!(config.validate(), Err(Error::InvalidSaleConfiguration));
    }

    #[test]
    fn negative_period() {
        let mut config = SaleConfig::default_for(START);
        config.lock_period = -1;
        assert_eq!(config.validate(), Err(Error::InvalidSaleConfiguration));
    }

    #[test]
    fn config_pda_round_trip() {
        let config = SaleConfig::default_for(START);
        let state = SaleState::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            1000,
        );
        let pda = ConfigurationPda::new(254, config, state);
        let data = borsh::to_vec(&pda).unwrap();
        let read = ConfigurationPda::try_from_slice(&data).unwrap();
        assert_eq!(read, pda);
        assert_eq!(read.seeds(), vec![b"SaleConfiguration".to_vec(), vec![254]]);
    }
}
