// File: crowdsale-common/src/errors.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use std::{error, result};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error as ThisError;

/// Results for the crowdsale programs with an `Error` associated by default.
pub type Result<T> = result::Result<T, Error>;

/// Custom error that can occur in the crowdsale On-Chain program.
///
/// The discriminant is the code carried by `ProgramError::Custom`: new variants go at the end.
#[derive(Clone, Copy, Debug, Eq, ThisError, FromPrimitive, PartialEq)]
pub enum Error {
    /// The caller is not the sale's administrator.
    #[error("caller is not authorized for this operation")]
    Unauthorized,
    /// Purchase attempted outside of the sale window.
    #[error("the sale is not open")]
    SaleNotOpen,
    /// Finalization attempted before the end of the sale.
    #[error("the sale has not ended yet")]
    SaleNotEnded,
    /// The sale has already been finalized.
    #[error("the sale has already been finalized")]
    AlreadyFinalized,
    /// The new rate is more than 10% away from the current one.
    #[error("the new rate is out of the allowed bounds")]
    RateOutOfBounds,
    /// The allocation is outside of the configured minimum / maximum.
    #[error("the allocation is out of the allowed bounds")]
    AllocationOutOfBounds,
    /// The allocation would exceed the sale's supply cap.
    #[error("the sale's supply cap would be exceeded")]
    SupplyExceeded,
    /// The beneficiary already has an active vesting schedule.
    #[error("a vesting schedule already exists for this beneficiary")]
    ScheduleExists,
    /// The beneficiary has no vesting schedule.
    #[error("no vesting schedule exists for this beneficiary")]
    NoSchedule,
    /// The vesting schedule has been revoked.
    #[error("the vesting schedule has been revoked")]
    ScheduleRevoked,
    /// The beneficiary has already bought tokens.
    #[error("the beneficiary has already contributed")]
    AlreadyContributed,
    /// Nothing is unlocked (or everything unlocked has been released).
    #[error("there is nothing to release")]
    NothingToRelease,
    /// Not enough tokens in the revoked pool.
    #[error("there are not enough tokens in the revoked pool")]
    InsufficientPool,
    /// The beneficiary is not on the whitelist.
    #[error("the beneficiary is not whitelisted")]
    NotWhitelisted,
    /// The vesting schedule cannot be revoked.
    #[error("the vesting schedule is not revocable")]
    NotRevocable,
    /// A computation could not be performed successfully.
    #[error("arithmetic error")]
    ArithmeticError,
    /// Tried to create an account that already exists.
    #[error("the account already exists and can't be created")]
    AccountAlreadyExists,
    /// Tried to perform token operations on an account that doesn't exist yet.
    #[error("the ATA does not exist yet")]
    ATADoesNotExist,
    /// Not enough tokens to perform the transfer.
    #[error("there are not enough tokens for this operation")]
    InsufficientFunds,
    /// The given amount is invalid (likely lower or equal to zero).
    #[error("the amount must be strictly greater than zero")]
    InvalidAmount,
    /// An ATA given does not match what was expected (wrong owner for example).
    #[error("an ATA does not match what was expected")]
    InvalidAta,
    /// The data of an account does not match what's expected from an ATA.
    #[error("invalid data for ATA")]
    InvalidAtaData,
    /// The given PDA is not owned by this program.
    #[error("a PDA's owner is not the crowdsale program")]
    InvalidOwner,
    /// The given PDA has the wrong type.
    #[error("the PDA account is not of the right type")]
    InvalidPdaType,
    /// The program ID is invalid.
    #[error("a program ID does not match the expected one")]
    InvalidProgramId,
    /// There was an error when serializing or deserializing the data.
    #[error("data could not be (de)serialized as expected")]
    InvalidRawData,
    /// The sale parameters are inconsistent.
    #[error("invalid sale configuration")]
    InvalidSaleConfiguration,
    /// Could not obtain the clock.
    #[error("failed to obtain the clock from the blockchain")]
    Clock,
    /// The sale does not (or no longer) hold the mint authority of the token.
    #[error("the sale does not hold the token's mint authority")]
    MintAuthorityMismatch,
    /// A given account does not match the one recorded in the configuration.
    #[error("an account does not match the sale's configuration")]
    AccountMismatch,
    /// The current instruction can only be run once and has already been executed.
    #[error("unique operation already executed")]
    UniqueOperationAlreadyExecuted,
    /// Tried to update a PDA that was never created.
    #[error("the PDA must be created before being written")]
    WriteInsteadOfCreatePda,
    /// A call to another program (token, system) failed.
    #[error("cross program call failed")]
    CrossProgramCallFailed,
    /// An unknown error has occurred (should not happen obviously, check the logs…)
    #[error("unknown error")]
    UnknownError,
}

impl From<Error> for ProgramError {
    fn from(err: Error) -> Self {
        msg!("CrowdsaleError: {}", err);
        Self::Custom(err as u32)
    }
}

impl From<u32> for Error {
    fn from(value: u32) -> Self {
        Self::from_u32(value).unwrap_or(Self::UnknownError)
    }
}

impl<T> DecodeError<T> for Error {
    fn type_of() -> &'static str {
        "CrowdsaleError"
    }
}

impl PrintProgramError for Error {
    fn print<E>(&self)
    where
        E: 'static + error::Error + DecodeError<E> + PrintProgramError + num_traits::FromPrimitive,
    {
        msg!("CrowdsaleError: {}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_code_round_trip() {
        let code = match ProgramError::from(Error::NothingToRelease) {
            ProgramError::Custom(code) => code,
            other => panic!("unexpected program error {other:?}"),
        };
        assert_eq!(Error::from(code), Error::NothingToRelease);
    }

    #[test]
    fn unknown_code() {
        assert_eq!(Error::from(u32::MAX), Error::UnknownError);
    }
}
