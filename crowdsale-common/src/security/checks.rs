// File: crowdsale-common/src/security/checks.rs
// Project: crowdsale-onchain
// Creation date: Thursday 25 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

/// Checks that given accounts are valid ATAs.
#[macro_export]
macro_rules! check_ata_exists {
    () => {};
    ($a:expr) => {
        if $crate::pda::is_unallocated(&$a) {
            return Err($crate::Error::ATADoesNotExist.into());
        }
    };
    ($a:expr, $($tail:tt)*) => {
        check_ata_exists!($a);
        check_ata_exists!($($tail)*);
    };
}

/// Check that the given program owns the PDA
#[macro_export]
macro_rules! check_pda_owner {
    ($program_id:ident, $pda:expr $(,)?) => {
        if $pda.lamports() > 0 && $pda.owner != $program_id {
            $crate::debug!("{} has owner {} and not {}", stringify!($pda), $pda.owner, $program_id);
            return Err($crate::Error::InvalidOwner.into());
        }
    };
    ($program_id:ident, $pda:expr $(, $tail:expr)*) => {
        check_pda_owner!($program_id, $pda);
        check_pda_owner!($program_id $(, $tail)*);
    }
}

/// Checks that an account matches the one expected (from the configuration or a derivation).
#[macro_export]
macro_rules! check_key {
    ($account:expr, $expected:expr) => {
        if *$account.key != $expected {
            solana_program::msg!(
                "{} should be {} but got {}",
                stringify!($account),
                $expected,
                $account.key
            );
            return Err($crate::Error::AccountMismatch.into());
        }
    };
}

/// Checks that the given account's key matches the System program ID
///
/// # Arguments
/// * `account` - The account to check
///
/// # Errors
/// If the account's key does not match
#[macro_export]
macro_rules! check_system_program {
    ($id:expr) => {
        if *$id.key != solana_program::system_program::id() {
            return Err($crate::Error::InvalidProgramId.into());
        }
    };
}

/// Checks that the given account's key matches the SPL Token 2022 program ID
///
/// # Arguments
/// * `account` - The account to check
///
/// # Errors
/// If the account's key does not match
#[macro_export]
macro_rules! check_spl_program {
    ($id:expr) => {
        if *$id.key != spl_token_2022::id() {
            return Err($crate::Error::InvalidProgramId.into());
        }
    };
}

/// Checks that the given account's key matches the Associated Token Account program ID
///
/// # Arguments
/// * `account` - The account to check
///
/// # Errors
/// If the account's key does not match
#[macro_export]
macro_rules! check_ata_program {
    ($id:expr) => {
        if *$id.key != spl_associated_token_account::id() {
            return Err($crate::Error::InvalidProgramId.into());
        }
    };
}
