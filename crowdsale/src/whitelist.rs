// File: crowdsale/src/whitelist.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use crowdsale_common::{
    pda::{is_unallocated, PdaType},
    Error,
};
use crowdsale_macro::pda;
use solana_program::{account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey};

/// Whitelist entry of an address.
///
/// Entries are never closed: removing an address only clears `listed`.
#[pda(kind = PdaType::Whitelist, seed = "Whitelist", seed = address)]
pub struct WhitelistPda {
    /// Whitelisted address.
    pub address: Pubkey,
    /// Current membership.
    pub listed: bool,
}

impl WhitelistPda {
    /// Creates a new whitelist entry
    #[must_use]
    pub const fn new(bump: u8, address: Pubkey, listed: bool) -> Self {
        Self {
            pda_type: PdaType::Whitelist,
            bump,
            address,
            listed,
        }
    }

    /// Checks if `address` is whitelisted, given its whitelist account.
    ///
    /// An account that was never created means the address isn't listed.
    ///
    /// # Errors
    /// If the account is not the address' whitelist entry.
    pub fn is_whitelisted(
        program_id: &Pubkey,
        address: &Pubkey,
        account: &AccountInfo,
    ) -> Result<bool, ProgramError> {
        let (expected, _bump) = Self::get_address(address, program_id);
        if expected != *account.key {
            msg!("whitelist entry of {} should be {}", address, expected);
            return Err(Error::AccountMismatch.into());
        }
        if is_unallocated(account) {
            return Ok(false);
        }
        if account.owner != program_id {
            return Err(Error::InvalidOwner.into());
        }
        let entry = Self::from_account(account)?;
        Ok(entry.listed && entry.address == *address)
    }
}
