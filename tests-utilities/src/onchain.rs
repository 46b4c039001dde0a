// File: tests-utilities/src/onchain.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 14:02:51
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use std::{collections::HashMap, fmt::Debug};

use crowdsale_common::{pda::SalePda, Error};
use solana_program::{
    clock::Clock, hash::Hash, instruction::Instruction, pubkey::Pubkey,
    system_instruction::transfer, system_program,
};
use solana_program_runtime::invoke_context::BuiltinFunctionWithContext;
use solana_program_test::{
    BanksClientError, ProgramTest, ProgramTestBanksClientExt, ProgramTestContext,
};
use solana_sdk::{
    account::Account,
    instruction::InstructionError,
    signature::{keypair_from_seed_phrase_and_passphrase, Keypair},
    signer::Signer,
    transaction::{Transaction, TransactionError},
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_token_2022::{
    extension::{
        metadata_pointer::MetadataPointer, BaseStateWithExtensions as _, StateWithExtensions,
    },
    state::{self, Mint},
};
use spl_token_metadata_interface::{borsh::BorshDeserialize as _, state::TokenMetadata};

const API_KEY: [u8; 64] = [
    29, 238, 17, 250, 48, 124, 110, 93, 126, 238, 0, 241, 188, 40, 229, 185, 116, 45, 103, 72, 100,
    120, 126, 26, 191, 169, 241, 114, 185, 147, 230, 30, 241, 221, 196, 199, 134, 183, 206, 136,
    205, 162, 105, 186, 99, 228, 45, 248, 95, 176, 164, 34, 110, 163, 84, 179, 82, 240, 225, 185,
    112, 153, 240, 58,
];

/// Lamports given to every new wallet.
pub const WALLET_FUNDS: u64 = 20_000_000_000;

/// Environment used for On-Chain tests
pub struct Environment {
    /// Public key of the program
    pub program_id: Pubkey,
    /// Testing runtime / cluster
    pub context: ProgramTestContext,
    /// Current block
    pub blockhash: Hash,
    /// Map of Name - Keypair for all wallets used in the tests
    pub wallets: HashMap<String, Keypair>,
}

impl Environment {
    /// Creates a new testing environment.
    ///
    /// # Parameters
    /// * `program_id` - Address of the program,
    /// * `entrypoint` - Program's entrypoint (call with `solana_program_test::processor!(entrypoint)`)
    ///
    /// # Panics
    /// If the environment couldn't be created (API key was not parsed successfully for example)
    pub async fn new(
        program_id: Pubkey,
        program: &str,
        entrypoint: Option<BuiltinFunctionWithContext>,
    ) -> Self {
        log::debug!("creating environment for {program}");
        let Ok(api_key) = Keypair::from_bytes(&API_KEY) else {
            panic!("could not parse API key while setting up environment");
        };
        let api_account = Account::new(500_000_000_000, 0, &system_program::ID);
        let mut program_test = ProgramTest::default();
        program_test.prefer_bpf(false);
        program_test.add_program(program, program_id, entrypoint);
        program_test.add_account(api_key.pubkey(), api_account);
        let context = program_test.start_with_context().await;
        let blockhash = context.last_blockhash;

        Self {
            program_id,
            context,
            blockhash,
            wallets: HashMap::from([("API".to_owned(), api_key)]),
        }
    }

    /// Executes a transaction
    ///
    /// Once the transaction is finished, the block will be switched for a new one,
    /// which prevents duplicated instructions from being ignored.
    ///
    /// # Errors
    /// If an instruction fails with one of the program's errors, it is returned.
    ///
    /// # Panics
    /// If there is an error, but it's not a Custom one, then there's a panic as it shouldn't happen.
    /// Can also happen if there are no signers
    pub async fn execute_transaction(
        &mut self,
        instructions: &[Instruction],
        signers: &[&str],
    ) -> Result<(), Error> {
        log::debug!("executing transaction with {} instruction(s)", instructions.len());
        let signers: Vec<&Keypair> = signers
            .iter()
            .filter_map(|name| self.wallets.get(*name))
            .collect();
        assert!(!signers.is_empty(), "signers must not be empty");
        let mut transaction =
            Transaction::new_with_payer(instructions, Some(&signers.first().unwrap().pubkey()));
        transaction.sign(signers.as_slice(), self.blockhash);
        let res = self.context.banks_client.process_transaction(transaction).await;

        // Go to the next blockhash to prevent duplicated transactions from being ignored
        self.blockhash = self
            .context
            .banks_client
            .get_new_latest_blockhash(&self.blockhash)
            .await
            .unwrap();

        match res {
            Ok(()) => Ok(()),
            Err(BanksClientError::TransactionError(TransactionError::InstructionError(
                _num,
                InstructionError::Custom(err),
            ))) => Err(Error::from(err)),
            Err(err) => panic!("Unexpected error: {err}"),
        }
    }

    /// Current timestamp of the cluster.
    ///
    /// # Panics
    /// If the clock could not be read.
    pub async fn now(&mut self) -> i64 {
        let clock: Clock = self.context.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp
    }

    /// Moves the cluster's clock to `timestamp`.
    ///
    /// # Panics
    /// If the clock could not be read.
    pub async fn warp_to(&mut self, timestamp: i64) {
        let mut clock: Clock = self.context.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp = timestamp;
        self.context.set_sysvar(&clock);
    }

    /// Get the state of an account.
    ///
    /// If the account doesn't exist, `None` will be returned.
    ///
    /// # Parameters
    /// * `address` - Address of the account for which to get the state
    ///
    /// # Panics
    /// If the account could not be retrieved (existing or not)
    pub async fn get_account(&mut self, address: &Pubkey) -> Option<Account> {
        self.context.banks_client.get_account(*address).await.unwrap()
    }

    /// Lamports held by an account (0 if it doesn't exist).
    pub async fn get_balance(&mut self, address: &Pubkey) -> u64 {
        self.get_account(address)
            .await
            .map_or(0, |account| account.lamports)
    }

    /// Address of the Token 2022 ATA of `owner` for `mint`.
    #[must_use]
    pub fn ata(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::id())
    }

    /// Get the amount of tokens owned by the account.
    ///
    /// If the account doesn't exist, `None` will be returned.
    ///
    /// # Parameters
    /// * `address` - Address of the account for which to get the amount of tokens
    ///
    /// # Panics
    /// If the account is not a valid ATA (so does not own tokens)
    pub async fn get_token_amount(&mut self, address: &Pubkey) -> Option<u64> {
        let res = self.get_account(address).await?;
        let state = StateWithExtensions::<state::Account>::unpack(&res.data)
            .unwrap()
            .base;
        Some(state.amount)
    }

    /// Get a mint base state
    ///
    /// # Parameters
    /// * `address` - Pubkey of the mint
    ///
    /// # Panics
    /// If the account is not a valid Mint.
    pub async fn get_mint_state(&mut self, address: &Pubkey) -> Mint {
        let res = self.get_account(address).await.unwrap();
        StateWithExtensions::<state::Mint>::unpack(&res.data)
            .unwrap()
            .base
    }

    /// Get the Metadata from a Mint.
    ///
    /// # Parameters
    /// * `address` - Pubkey of the mint
    ///
    /// # Panics
    /// If the account is not a valid Mint
    pub async fn get_mint_metadata(&mut self, address: &Pubkey) -> Option<TokenMetadata> {
        // Base mint, account type, metadata pointer and the metadata's TLV header.
        const META_START: usize = 238;
        let data = self.get_account(address).await?.data;
        let state = StateWithExtensions::<state::Mint>::unpack(&data).ok()?;
        let pointer = state.get_extension::<MetadataPointer>().ok()?;
        let key: Option<Pubkey> = pointer.metadata_address.into();
        assert_eq!(key, Some(*address), "Metadata was not present on the mint");
        TokenMetadata::try_from_slice(data.get(META_START..)?).ok()
    }

    /// Loads a PDA data from an account.
    ///
    /// # Parameters
    /// * `account` - Account from which to read the data
    ///
    /// # Returns
    /// `None` if the account doesn't exist or doesn't hold a PDA of that type.
    pub async fn from_account<T>(&mut self, account: &Pubkey) -> Option<T>
    where
        T: SalePda + Debug,
    {
        let data = self.get_account(account).await?.data;
        let res = T::try_from_slice(&data).ok()?;
        if !res.is_valid() {
            return None::<T>;
        }
        Some(res)
    }

    /// Adds a new wallet to the testing environment
    ///
    /// # Parameters
    /// * `client` - Name of the client to add.
    ///
    /// # Returns
    /// * Pubkey of the client's wallet.
    ///
    /// # Panics
    /// If the keypair couldn't be generated
    #[must_use]
    pub async fn add_wallet(&mut self, name: &str) -> Pubkey {
        log::debug!("adding wallet for user '{name}'");
        let keypair = keypair_from_seed_phrase_and_passphrase(name, "passphrase").unwrap();
        let key = keypair.pubkey();
        self.wallets.insert(name.into(), keypair);

        let Some(api_key) = self.wallets.get("API") else {
            panic!("no API key in the environment");
        };
        let instruction = transfer(&api_key.pubkey(), &key, WALLET_FUNDS);
        assert!(
            self.execute_transaction(&[instruction], &["API"])
                .await
                .is_ok(),
            "could not fund the wallet for {name}"
        );

        key
    }
}
