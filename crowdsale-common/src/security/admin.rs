// File: crowdsale-common/src/security/admin.rs
// Project: crowdsale-onchain
// Creation date: Wednesday 04 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

use crate::{Error, Result};

/// Checks that an operation is performed by the sale's administrator.
///
/// # Parameters
/// * `caller` - Authenticated identity of the caller,
/// * `admin` - Administrator recorded in the sale's configuration.
///
/// # Errors
/// `Error::Unauthorized` if the caller is not the administrator.
pub fn require_admin(caller: &Pubkey, admin: &Pubkey) -> Result<()> {
    if caller == admin {
        Ok(())
    } else {
        msg!("{} is not the administrator of the sale", caller);
        Err(Error::Unauthorized)
    }
}

/// Gets the identity of the caller of an instruction.
///
/// # Errors
/// `Error::Unauthorized` if the account did not sign the transaction.
pub fn signer_key(account: &AccountInfo) -> Result<Pubkey> {
    if account.is_signer {
        Ok(*account.key)
    } else {
        msg!("{} did not sign the transaction", account.key);
        Err(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_accepted() {
        let admin = Pubkey::new_unique();
        assert_eq!(require_admin(&admin, &admin), Ok(()));
    }

    #[test]
    fn other_caller_rejected() {
        let admin = Pubkey::new_unique();
        let caller = Pubkey::new_unique();
        assert_eq!(require_admin(&caller, &admin), Err(Error::Unauthorized));
    }

    #[test]
    fn unsigned_caller_rejected() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = Vec::new();
        let account = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        assert_eq!(signer_key(&account), Err(Error::Unauthorized));
    }
}
