// File: crowdsale/tests/common/mod.rs
// Project: crowdsale-onchain
// Creation date: Monday 17 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 14:02:51
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

#![allow(clippy::panic)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use crowdsale::{
    add_to_whitelist, buy_tokens,
    config::{get_mint_address, DAY as SECONDS_PER_DAY, ONE_TOKEN},
    create_mint, initialize, mint_and_vest, process_instruction, release, ConfigurationPda,
    InitializeArgs, SaleConfig, VestingSchedule, VestingSchedulePda,
};
use crowdsale_common::Error;
use solana_program_test::processor;
use solana_sdk::{pubkey::Pubkey, signer::Signer as _};
use tests_utilities::onchain::Environment;

pub const RATE: u64 = 1000;
pub const ONE_SOL: u64 = 1_000_000_000;
pub const TOKENS: u64 = ONE_TOKEN;
pub const DAY: i64 = SECONDS_PER_DAY;

/// Creates the testing environment, with the administrator and the sale's wallets.
pub async fn new_environment() -> Environment {
    let mut env =
        Environment::new(crowdsale::ID, "crowdsale", processor!(process_instruction)).await;
    let _admin = env.add_wallet("Admin").await;
    let _wallet = env.add_wallet("Wallet").await;
    let _team = env.add_wallet("Team").await;
    env
}

/// Default parameters of the sale, opening at `start`.
pub fn default_args(env: &Environment, start: i64) -> InitializeArgs {
    InitializeArgs {
        config: SaleConfig::default_for(start),
        admin: env.wallets["Admin"].pubkey(),
        wallet: env.wallets["Wallet"].pubkey(),
        team_wallet: env.wallets["Team"].pubkey(),
        rate: RATE,
    }
}

/// Default initialization of the sale, opening now.
///
/// # Panics
/// If the environment couldn't be set correctly.
pub async fn init_default() -> Environment {
    let mut env = new_environment().await;
    let start = env.now().await;
    let api = env.wallets["API"].pubkey();
    let Ok(instruction) = initialize(&api, default_args(&env, start)) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["API"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );
    env
}

/// Initializes the sale and creates its token.
///
/// # Panics
/// If the environment couldn't be set correctly.
pub async fn init_with_mint() -> Environment {
    let mut env = init_default().await;
    let admin = env.wallets["Admin"].pubkey();
    let Ok(instruction) = create_mint(&admin, "Crowdsale Token", "CST", "https://example.com")
    else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );
    env
}

pub fn mint() -> Pubkey {
    get_mint_address(&crowdsale::ID).0
}

pub fn ata(owner: &Pubkey) -> Pubkey {
    Environment::ata(owner, &mint())
}

pub fn config_address() -> Pubkey {
    ConfigurationPda::get_address(&crowdsale::ID).0
}

pub fn custody() -> Pubkey {
    ata(&config_address())
}

/// Current state of the sale.
///
/// # Panics
/// If the configuration could not be loaded.
pub async fn get_config(env: &mut Environment) -> ConfigurationPda {
    let Some(config) = env.from_account(&config_address()).await else {
        panic!("could not load the sale's configuration");
    };
    config
}

/// Vesting schedule of a beneficiary, if any.
pub async fn schedule_of(env: &mut Environment, beneficiary: &Pubkey) -> Option<VestingSchedule> {
    let (address, _) = VestingSchedulePda::get_address(beneficiary, &crowdsale::ID);
    let pda: VestingSchedulePda = env.from_account(&address).await?;
    Some(pda.schedule)
}

/// Tokens held by `owner` (0 without an ATA).
pub async fn token_balance(env: &mut Environment, owner: &Pubkey) -> u64 {
    env.get_token_amount(&ata(owner)).await.unwrap_or_default()
}

/// Adds addresses to the whitelist.
///
/// # Panics
/// If the whitelist couldn't be updated.
pub async fn whitelist(env: &mut Environment, addresses: &[Pubkey]) {
    let admin = env.wallets["Admin"].pubkey();
    let Ok(instruction) = add_to_whitelist(&admin, addresses) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );
}

/// `buyer` buys tokens for `beneficiary`.
///
/// # Errors
/// If the purchase failed.
pub async fn buy(
    env: &mut Environment,
    buyer: &str,
    beneficiary: &Pubkey,
    value: u64,
) -> Result<(), Error> {
    println!("{buyer} buys for {value} lamports");
    let buyer_key = env.wallets[buyer].pubkey();
    let wallet = env.wallets["Wallet"].pubkey();
    let Ok(instruction) = buy_tokens(&buyer_key, beneficiary, &wallet, value) else {
        panic!("could not create instruction");
    };
    env.execute_transaction(&[instruction], &[buyer]).await
}

/// Grants a vested allocation.
///
/// # Errors
/// If the allocation failed.
pub async fn grant(
    env: &mut Environment,
    beneficiary: &Pubkey,
    amount: u64,
    bonus: u64,
) -> Result<(), Error> {
    let admin = env.wallets["Admin"].pubkey();
    let Ok(instruction) = mint_and_vest(&admin, beneficiary, amount, bonus) else {
        panic!("could not create instruction");
    };
    env.execute_transaction(&[instruction], &["Admin"]).await
}

/// Releases the unlocked tokens of `beneficiary`, paid by `payer`.
///
/// # Errors
/// If the release failed.
pub async fn release_for(
    env: &mut Environment,
    payer: &str,
    beneficiary: &Pubkey,
) -> Result<(), Error> {
    let payer_key = env.wallets[payer].pubkey();
    let Ok(instruction) = release(&payer_key, beneficiary) else {
        panic!("could not create instruction");
    };
    env.execute_transaction(&[instruction], &[payer]).await
}
