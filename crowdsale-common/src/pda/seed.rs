// File: crowdsale-common/src/pda/seed.rs
// Project: crowdsale-onchain
// Creation date: Thursday 25 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use solana_program::pubkey::Pubkey;

/// A seed used to derive the address of a PDA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed(Vec<u8>);

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<u8> for Seed {
    fn from(value: u8) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl From<Pubkey> for Seed {
    fn from(value: Pubkey) -> Self {
        Self(value.to_bytes().to_vec())
    }
}

impl From<&Pubkey> for Seed {
    fn from(value: &Pubkey) -> Self {
        Self(value.to_bytes().to_vec())
    }
}

impl From<Seed> for Vec<u8> {
    fn from(value: Seed) -> Self {
        value.0
    }
}
