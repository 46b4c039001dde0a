// File: crowdsale/tests/whitelist.rs
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

use crowdsale::{add_to_whitelist, remove_from_whitelist, WhitelistPda};
use crowdsale_common::Error;
use solana_program_test::tokio;
use solana_sdk::{pubkey::Pubkey, signer::Signer as _};
use tests_utilities::onchain::Environment;

use crate::common::{buy, init_with_mint, whitelist, ONE_SOL};

async fn entry(env: &mut Environment, address: &Pubkey) -> Option<WhitelistPda> {
    let (pda, _) = WhitelistPda::get_address(address, &crowdsale::ID);
    env.from_account(&pda).await
}

#[tokio::test]
async fn add_and_remove() {
    let mut env = init_with_mint().await;
    let admin = env.wallets["Admin"].pubkey();
    let addresses = [Pubkey::new_unique(), Pubkey::new_unique()];

    // Duplicates and already listed addresses are ignored.
    whitelist(&mut env, &[addresses[0], addresses[1], addresses[0]]).await;
    whitelist(&mut env, &addresses).await;
    for address in &addresses {
        let Some(entry) = entry(&mut env, address).await else {
            panic!("no whitelist entry for {address}");
        };
        assert!(entry.listed);
        assert_eq!(entry.address, *address);
    }

    let never_listed = Pubkey::new_unique();
    let Ok(instruction) = remove_from_whitelist(&admin, &[addresses[0], never_listed]) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );
    assert!(entry(&mut env, &addresses[0]).await.is_some_and(|entry| !entry.listed));
    assert!(entry(&mut env, &addresses[1]).await.is_some_and(|entry| entry.listed));
    assert!(entry(&mut env, &never_listed).await.is_none());
}

#[tokio::test]
async fn unauthorized() {
    let mut env = init_with_mint().await;
    let stranger = env.add_wallet("Stranger").await;
    let address = Pubkey::new_unique();
    let Ok(instruction) = add_to_whitelist(&stranger, &[address]) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Stranger"]).await;
    assert_eq!(res, Err(Error::Unauthorized));
    assert!(entry(&mut env, &address).await.is_none());
}

#[tokio::test]
async fn purchases_need_the_whitelist() {
    let mut env = init_with_mint().await;
    let admin = env.wallets["Admin"].pubkey();
    let buyer = env.add_wallet("Buyer").await;

    let res = buy(&mut env, "Buyer", &buyer, ONE_SOL).await;
    assert_eq!(res, Err(Error::NotWhitelisted));

    whitelist(&mut env, &[buyer]).await;
    let Ok(instruction) = remove_from_whitelist(&admin, &[buyer]) else {
        panic!("could not create instruction");
    };
    let res = env.execute_transaction(&[instruction], &["Admin"]).await;
    assert!(
        res.is_ok(),
        "there was an unexpected error in the instruction"
    );
    let res = buy(&mut env, "Buyer", &buyer, ONE_SOL).await;
    assert_eq!(res, Err(Error::NotWhitelisted));
}
