// File: crowdsale/src/ledger.rs
// Project: crowdsale-onchain
// Creation date: Tuesday 03 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

//! Collaborators of the sale: the token ledger and the wallet receiving the payments.

use crowdsale_common::{check_ata_exists, debug, get_ata_balance, get_mint_owner, Error, Result};
use solana_program::{
    account_info::AccountInfo,
    instruction::Instruction,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_token_2022::instruction::{mint_to, set_authority, transfer_checked, AuthorityType};

use crate::config::DECIMALS;

/// Token ledger the sale mints into and distributes from.
pub trait TokenLedger {
    /// Owner of the sale's custody account.
    fn custody(&self) -> Pubkey;

    /// Mints `amount` tokens to `to`.
    ///
    /// # Errors
    /// `Error::MintAuthorityMismatch` if the sale does not hold the mint authority.
    fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

    /// Transfers `amount` tokens from the custody to `to`.
    ///
    /// # Errors
    /// `Error::InsufficientFunds` if the custody does not hold enough tokens.
    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

    /// Hands the mint authority over to `new_owner`.
    ///
    /// # Errors
    /// `Error::MintAuthorityMismatch` if the sale does not hold the mint authority.
    fn transfer_ownership(&mut self, new_owner: &Pubkey) -> Result<()>;
}

/// Destination of the buyers' payments.
pub trait ValueSink {
    /// Moves `value` lamports to the receiving wallet.
    ///
    /// # Errors
    /// If the payment could not be made.
    fn forward(&mut self, value: u64) -> Result<()>;
}

fn cpi_error(err: ProgramError) -> Error {
    msg!("cross program call failed: {}", err);
    Error::CrossProgramCallFailed
}

/// SPL Token 2022 ledger, with the configuration PDA as mint authority and custody owner.
pub struct SplTokenLedger<'a> {
    mint: AccountInfo<'a>,
    authority: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    seeds: Vec<Vec<u8>>,
    holders: Vec<AccountInfo<'a>>,
}

impl<'a> SplTokenLedger<'a> {
    /// Creates the ledger.
    ///
    /// # Parameters
    /// * `mint` - Mint of the sold token,
    /// * `authority` - Configuration PDA (mint authority and custody owner),
    /// * `custody` - ATA of the configuration PDA,
    /// * `token_program` - SPL Token 2022 program,
    /// * `seeds` - Seeds used to sign for the configuration PDA.
    ///
    /// # Errors
    /// If the custody account is not the configuration PDA's ATA.
    pub fn new(
        mint: &AccountInfo<'a>,
        authority: &AccountInfo<'a>,
        custody: &AccountInfo<'a>,
        token_program: &AccountInfo<'a>,
        seeds: Vec<Vec<u8>>,
    ) -> Result<Self> {
        let expected =
            get_associated_token_address_with_program_id(authority.key, mint.key, &spl_token_2022::id());
        if expected != *custody.key {
            msg!("custody should be {} but got {}", expected, custody.key);
            return Err(Error::InvalidAta);
        }
        Ok(Self {
            mint: mint.clone(),
            authority: authority.clone(),
            custody: custody.clone(),
            token_program: token_program.clone(),
            seeds,
            holders: Vec::new(),
        })
    }

    /// Registers the ATAs the ledger may credit.
    #[must_use]
    pub fn with_holders(mut self, holders: &[&AccountInfo<'a>]) -> Self {
        self.holders
            .extend(holders.iter().map(|account| (*account).clone()));
        self
    }

    fn ata_of(&self, owner: &Pubkey) -> Result<&AccountInfo<'a>> {
        let address =
            get_associated_token_address_with_program_id(owner, self.mint.key, &spl_token_2022::id());
        if address == *self.custody.key {
            return Ok(&self.custody);
        }
        self.holders
            .iter()
            .find(|account| *account.key == address)
            .ok_or_else(|| {
                msg!("ATA {} of {} was not provided", address, owner);
                Error::InvalidAta
            })
    }

    fn check_authority(&self) -> Result<()> {
        if get_mint_owner(&self.mint)? != *self.authority.key {
            msg!("the sale no longer holds the mint authority of {}", self.mint.key);
            return Err(Error::MintAuthorityMismatch);
        }
        Ok(())
    }

    fn signed(&self, instruction: &Instruction, accounts: &[AccountInfo<'a>]) -> Result<()> {
        let seeds = self.seeds.iter().map(Vec::as_slice).collect::<Vec<_>>();
        invoke_signed(instruction, accounts, &[seeds.as_slice()]).map_err(cpi_error)
    }
}

impl TokenLedger for SplTokenLedger<'_> {
    fn custody(&self) -> Pubkey {
        *self.authority.key
    }

    fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.check_authority()?;
        let target = self.ata_of(to)?.clone();
        check_ata_exists!(target);
        debug!("minting {} tokens to {}", amount, target.key);
        let instruction = mint_to(
            self.token_program.key,
            self.mint.key,
            target.key,
            self.authority.key,
            &[],
            amount,
        )
        .map_err(cpi_error)?;
        self.signed(
            &instruction,
            &[self.mint.clone(), target, self.authority.clone()],
        )
    }

    fn transfer(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        if get_ata_balance(&self.custody)? < amount {
            return Err(Error::InsufficientFunds);
        }
        let target = self.ata_of(to)?.clone();
        check_ata_exists!(target);
        debug!("transferring {} tokens to {}", amount, target.key);
        let instruction = transfer_checked(
            self.token_program.key,
            self.custody.key,
            self.mint.key,
            target.key,
            self.authority.key,
            &[],
            amount,
            DECIMALS,
        )
        .map_err(cpi_error)?;
        self.signed(
            &instruction,
            &[
                self.custody.clone(),
                self.mint.clone(),
                target,
                self.authority.clone(),
            ],
        )
    }

    fn transfer_ownership(&mut self, new_owner: &Pubkey) -> Result<()> {
        self.check_authority()?;
        let instruction = set_authority(
            self.token_program.key,
            self.mint.key,
            Some(new_owner),
            AuthorityType::MintTokens,
            self.authority.key,
            &[],
        )
        .map_err(cpi_error)?;
        self.signed(&instruction, &[self.mint.clone(), self.authority.clone()])
    }
}

/// Ledger of the instructions that don't give access to the token accounts.
///
/// Any token operation is refused.
pub struct DetachedLedger {
    custody: Pubkey,
}

impl DetachedLedger {
    /// Creates the ledger for the custody owned by `custody`.
    #[must_use]
    pub const fn new(custody: Pubkey) -> Self {
        Self { custody }
    }
}

impl TokenLedger for DetachedLedger {
    fn custody(&self) -> Pubkey {
        self.custody
    }

    fn mint(&mut self, _to: &Pubkey, _amount: u64) -> Result<()> {
        Err(Error::AccountMismatch)
    }

    fn transfer(&mut self, _to: &Pubkey, _amount: u64) -> Result<()> {
        Err(Error::AccountMismatch)
    }

    fn transfer_ownership(&mut self, _new_owner: &Pubkey) -> Result<()> {
        Err(Error::AccountMismatch)
    }
}

/// Forwards the payment of a purchase from the buyer to the receiving wallet.
pub struct LamportSink<'a> {
    payer: AccountInfo<'a>,
    wallet: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
}

impl<'a> LamportSink<'a> {
    /// Creates the sink.
    #[must_use]
    pub fn new(
        payer: &AccountInfo<'a>,
        wallet: &AccountInfo<'a>,
        system_program: &AccountInfo<'a>,
    ) -> Self {
        Self {
            payer: payer.clone(),
            wallet: wallet.clone(),
            system_program: system_program.clone(),
        }
    }
}

impl ValueSink for LamportSink<'_> {
    fn forward(&mut self, value: u64) -> Result<()> {
        if self.payer.lamports() < value {
            msg!("{} can't pay {} lamports", self.payer.key, value);
            return Err(Error::InsufficientFunds);
        }
        invoke(
            &system_instruction::transfer(self.payer.key, self.wallet.key, value),
            &[
                self.payer.clone(),
                self.wallet.clone(),
                self.system_program.clone(),
            ],
        )
        .map_err(cpi_error)
    }
}
