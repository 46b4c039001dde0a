// File: crowdsale-common/src/query.rs
// Project: crowdsale-onchain
// Creation date: Wednesday 24 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use chrono::DateTime;
use solana_program::{
    account_info::AccountInfo, clock::Clock, program_option::COption, pubkey::Pubkey,
    sysvar::Sysvar as _,
};
use spl_token_2022::{
    extension::StateWithExtensions,
    state::{Account, Mint},
};

use crate::{Error, Result};

/// Get the amount of tokens held by a given ATA
///
/// # Errors
/// If the given account is not an (existing) ATA
pub fn get_ata_balance(ata: &AccountInfo) -> Result<u64> {
    Ok(get_ata_state(ata)?.amount)
}

fn get_ata_state(ata: &AccountInfo) -> Result<Account> {
    let data = ata.try_borrow_data().map_err(|_err| Error::InvalidAtaData)?;
    let state = StateWithExtensions::<Account>::unpack(&data)
        .map_err(|_err| Error::InvalidAtaData)?
        .base;
    Ok(state)
}

/// Get the mint authority of a given mint
///
/// # Parameters
/// * `mint` - Mint for which to retrieve the authority
///
/// # Errors
/// If the given account is not an (existing) mint, or if it can no longer be minted.
pub fn get_mint_owner(mint: &AccountInfo) -> Result<Pubkey> {
    let data = mint.try_borrow_data().map_err(|_err| Error::InvalidRawData)?;
    let state = StateWithExtensions::<Mint>::unpack(&data)
        .map_err(|_err| Error::InvalidRawData)?
        .base;
    match state.mint_authority {
        COption::Some(pubkey) => Ok(pubkey),
        COption::None => Err(Error::MintAuthorityMismatch),
    }
}

/// Get the current timestamp from the cluster's clock.
///
/// # Errors
/// If the clock could not be obtained
pub fn get_timestamp() -> Result<i64> {
    let clock = Clock::get().map_err(|_err| Error::Clock)?;
    Ok(clock.unix_timestamp)
}

/// Human readable form of a timestamp, for the logs.
#[must_use]
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map_or_else(|| timestamp.to_string(), |date| date.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(format_timestamp(1_717_200_000), "2024-06-01T00:00:00+00:00");
    }
}
