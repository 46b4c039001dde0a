// File: crowdsale/tests/finalize.rs
// Project: crowdsale-onchain
// Creation date: Wednesday 04 September 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 14:02:51
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

#![allow(clippy::tests_outside_test_module)]
#![allow(clippy::panic)]
#![allow(clippy::print_stdout)]

pub mod common;

use crowdsale::{finalize, update_token_owner};
use crowdsale_common::Error;
use solana_program_test::tokio;
use solana_sdk::{program_option::COption, pubkey::Pubkey, signer::Signer as _};
use spl_token_2022::instruction::{set_authority, AuthorityType};
use tests_utilities::onchain::Environment;

use crate::common::{
    config_address, get_config, grant, init_with_mint, mint, token_balance, TOKENS,
};

async fn close(env: &mut Environment, signer: &str) -> Result<(), Error> {
    let key = env.wallets[signer].pubkey();
    let team = env.wallets["Team"].pubkey();
    let Ok(instruction) = finalize(&key, &team) else {
        panic!("could not create instruction");
    };
    env.execute_transaction(&[instruction], &[signer]).await
}

async fn hand_over(env: &mut Environment, signer: &str, new_owner: &Pubkey) -> Result<(), Error> {
    let key = env.wallets[signer].pubkey();
    let Ok(instruction) = update_token_owner(&key, new_owner) else {
        panic!("could not create instruction");
    };
    env.execute_transaction(&[instruction], &[signer]).await
}

#[tokio::test]
async fn finalization() {
    let mut env = init_with_mint().await;
    let team = env.wallets["Team"].pubkey();
    let _stranger = env.add_wallet("Stranger").await;
    let config = get_config(&mut env).await.config;

    assert_eq!(close(&mut env, "Admin").await, Err(Error::SaleNotEnded));

    env.warp_to(config.end_time).await;
    assert_eq!(close(&mut env, "Stranger").await, Err(Error::Unauthorized));
    assert!(close(&mut env, "Admin").await.is_ok());
    assert!(get_config(&mut env).await.state.finalized);
    assert_eq!(token_balance(&mut env, &team).await, config.team_allocation);
    assert_eq!(
        env.get_mint_state(&mint()).await.supply,
        config.team_allocation
    );

    assert_eq!(close(&mut env, "Admin").await, Err(Error::AlreadyFinalized));
}

#[tokio::test]
async fn wrong_team_wallet() {
    let mut env = init_with_mint().await;
    let admin = env.wallets["Admin"].pubkey();
    let end = get_config(&mut env).await.config.end_time;
    env.warp_to(end).await;

    let Ok(instruction) = finalize(&admin, &admin) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert_eq!(res, Err(Error::AccountMismatch));
}

#[tokio::test]
async fn token_owner() {
    let mut env = init_with_mint().await;
    let _stranger = env.add_wallet("Stranger").await;
    let new_owner = Pubkey::new_unique();

    assert_eq!(
        hand_over(&mut env, "Stranger", &new_owner).await,
        Err(Error::Unauthorized)
    );
    assert_eq!(
        get_config(&mut env).await.state.token_owner,
        config_address()
    );

    assert!(hand_over(&mut env, "Admin", &new_owner).await.is_ok());
    assert_eq!(get_config(&mut env).await.state.token_owner, new_owner);
    assert_eq!(
        env.get_mint_state(&mint()).await.mint_authority,
        COption::Some(new_owner)
    );

    // The sale can't mint anymore.
    let beneficiary = Pubkey::new_unique();
    assert_eq!(
        grant(&mut env, &beneficiary, 10_000 * TOKENS, 0).await,
        Err(Error::MintAuthorityMismatch)
    );
    assert_eq!(
        hand_over(&mut env, "Admin", &Pubkey::new_unique()).await,
        Err(Error::MintAuthorityMismatch)
    );
}

#[tokio::test]
async fn authority_handed_back() {
    let mut env = init_with_mint().await;
    let new_owner = env.add_wallet("New Owner").await;
    assert!(hand_over(&mut env, "Admin", &new_owner).await.is_ok());

    let Ok(instruction) = set_authority(
        &spl_token_2022::id(),
        &mint(),
        Some(&config_address()),
        AuthorityType::MintTokens,
        &new_owner,
        &[],
    ) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["New Owner"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );

    // The sale mints again.
    let beneficiary = Pubkey::new_unique();
    assert!(grant(&mut env, &beneficiary, 10_000 * TOKENS, 0).await.is_ok());
}
