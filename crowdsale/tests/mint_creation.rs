// File: crowdsale/tests/mint_creation.rs
// Project: crowdsale-onchain
// Creation date: Friday 14 June 2024
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

use crowdsale::{config::DECIMALS, create_mint};
use crowdsale_common::Error;
use solana_program_test::tokio;
use solana_sdk::{program_option::COption, signer::Signer as _};

use crate::common::{config_address, custody, get_config, init_default, init_with_mint, mint};

#[tokio::test]
async fn default() {
    let mut env = init_with_mint().await;
    let mint = mint();

    let state = env.get_mint_state(&mint).await;
    assert_eq!(state.decimals, DECIMALS);
    assert_eq!(state.supply, 0);
    assert_eq!(state.mint_authority, COption::Some(config_address()));
    assert!(state.freeze_authority.is_none());

    let Some(metadata) = env.get_mint_metadata(&mint).await else {
        panic!("the mint has no metadata");
    };
    assert_eq!(metadata.name, "Crowdsale Token");
    assert_eq!(metadata.symbol, "CST");
    assert_eq!(metadata.uri, "https://example.com");

    assert_eq!(env.get_token_amount(&custody()).await, Some(0));

    let config = get_config(&mut env).await;
    assert_eq!(config.state.mint, mint);
    assert_eq!(config.state.token_owner, config_address());
}

#[tokio::test]
async fn only_once() {
    let mut env = init_with_mint().await;
    let admin = env.wallets["Admin"].pubkey();
    let Ok(instruction) = create_mint(&admin, "Other", "OTH", "https://example.org") else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert_eq!(res, Err(Error::UniqueOperationAlreadyExecuted));
}

#[tokio::test]
async fn unauthorized() {
    let mut env = init_default().await;
    let stranger = env.add_wallet("Stranger").await;
    let Ok(instruction) = create_mint(&stranger, "Crowdsale Token", "CST", "https://example.com")
    else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Stranger"]).await;
    assert_eq!(res, Err(Error::Unauthorized));
    assert!(env.get_account(&mint()).await.is_none());
}
