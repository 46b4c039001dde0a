// File: crowdsale-common/src/pda/account.rs
// Project: crowdsale-onchain
// Creation date: Thursday 25 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
    pubkey::Pubkey,
    rent::Rent,
    system_instruction::{allocate, assign, create_account, transfer},
    system_program,
    sysvar::Sysvar,
};

use crate::{debug, Error};

/// Define the type of account for a PDA.
///
/// This is a security requirement to make sure that a PDA of one type can't be used for
/// something else than it was supposed to be.
#[derive(Clone, Copy, Debug, BorshSerialize, BorshDeserialize, PartialEq, Eq)]
pub enum PdaType {
    /// Configuration and running totals of the sale.
    SaleConfiguration,
    /// Whitelist membership of an address.
    Whitelist,
    /// Vesting schedule of a beneficiary.
    VestingSchedule,
}

/// Checks if an account holds nothing but lamports.
///
/// Anyone can send lamports to an address, so such an account counts as not created.
#[must_use]
pub fn is_unallocated(account: &AccountInfo) -> bool {
    account.data_is_empty() && system_program::check_id(account.owner)
}

/// Allocates `space` bytes at a PDA address and assigns it to `owner`.
///
/// If the address already received lamports, it is topped up to `lamports` and
/// allocated in place instead of being created.
///
/// # Parameters
/// * `account` - The PDA's account,
/// * `payer` - The transaction paying account,
/// * `owner` - The program that will own the account,
/// * `space` - Size of the account's data,
/// * `lamports` - Minimum balance of the account,
/// * `seeds` - Seeds signing for the PDA.
///
/// # Errors
/// If the account is already in use or one of the system calls fails.
pub fn allocate_pda<'a>(
    account: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    owner: &Pubkey,
    space: usize,
    lamports: u64,
    seeds: &[&[u8]],
) -> ProgramResult {
    if !is_unallocated(account) {
        return Err(Error::AccountAlreadyExists.into());
    }
    if account.lamports() == 0 {
        return invoke_signed(
            &create_account(payer.key, account.key, lamports, space as u64, owner),
            &[payer.clone(), account.clone()],
            &[seeds],
        );
    }

    debug!("{} was funded beforehand, allocating in place", account.key);
    let missing = lamports.saturating_sub(account.lamports());
    if missing > 0 {
        invoke(
            &transfer(payer.key, account.key, missing),
            &[payer.clone(), account.clone()],
        )?;
    }
    invoke_signed(
        &allocate(account.key, space as u64),
        &[account.clone()],
        &[seeds],
    )?;
    invoke_signed(&assign(account.key, owner), &[account.clone()], &[seeds])
}

/// Common properties of a crowdsale PDA
pub trait SalePda: BorshDeserialize + BorshSerialize {
    /// The type of the PDA
    const PDA_TYPE: PdaType;

    /// Get the PDA's bump
    fn get_bump(&self) -> u8;

    /// Checks that a PDA has the expected [`PdaType`]
    fn is_valid(&self) -> bool;

    /// Get the seeds used to sign the PDA's address.
    fn seeds(&self) -> Vec<Vec<u8>>;

    /// Update the PDA's data.
    ///
    /// # Parameters
    /// * `account` - The account where the data is saved,
    /// * `payer` - The transaction paying account (used in case `realloc` is necessary).
    ///
    /// # Errors
    /// If the account does not exist yet or the PDA failed to be serialized.
    fn write<'a>(&self, account: &AccountInfo<'a>, payer: &AccountInfo<'a>) -> ProgramResult {
        if is_unallocated(account) {
            return Err(Error::WriteInsteadOfCreatePda.into());
        }
        let mut account_data = borsh::to_vec(self).map_err(|_err| Error::InvalidRawData)?;
        if account_data.len() != account.data_len() {
            let rent = Rent::get()?.minimum_balance(account_data.len());
            if rent > account.lamports() {
                let diff = rent.saturating_sub(account.lamports());
                invoke(
                    &transfer(payer.key, account.key, diff),
                    &[payer.clone(), account.clone()],
                )?;
            }
            account.realloc(account_data.len(), false)?;
        }
        account_data.swap_with_slice(*account.try_borrow_mut_data()?);
        Ok(())
    }

    /// Creates the PDA on the chain
    ///
    /// # Parameters
    /// * `account` - The account where the data will be saved,
    /// * `payer` - The transaction paying account,
    /// * `program_id` - The program owning the PDA.
    ///
    /// # Errors
    /// If the data failed to be serialized, rent could not be computed, etc.
    fn create<'a>(
        &self,
        account: &AccountInfo<'a>,
        payer: &AccountInfo<'a>,
        program_id: &Pubkey,
    ) -> ProgramResult {
        // In case there was a mixup in the PDA constructor.
        if !self.is_valid() {
            return Err(Error::InvalidPdaType.into());
        }
        let mut data = borsh::to_vec(self).map_err(|_err| Error::InvalidRawData)?;
        let rent = Rent::get()?.minimum_balance(data.len());
        debug!("Creating PDA. Rent needed: {} lamports", rent);

        let seeds = self.seeds();
        let seeds = seeds.iter().map(Vec::as_slice).collect::<Vec<_>>();
        allocate_pda(account, payer, program_id, data.len(), rent, &seeds)?;

        debug!("writing PDA data");
        data.swap_with_slice(*account.try_borrow_mut_data()?);
        Ok(())
    }

    /// Creates the PDA if the account is still empty, updates it otherwise.
    ///
    /// # Errors
    /// See [`SalePda::create`] and [`SalePda::write`].
    fn save<'a>(
        &self,
        account: &AccountInfo<'a>,
        payer: &AccountInfo<'a>,
        program_id: &Pubkey,
    ) -> ProgramResult {
        if is_unallocated(account) {
            self.create(account, payer, program_id)
        } else {
            self.write(account, payer)
        }
    }
}
