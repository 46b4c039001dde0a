// File: crowdsale/src/lib.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

//! Time-boxed token sale On-Chain program, with bonus tiers and linear vesting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bonus;
pub mod config;
mod entrypoint;
pub mod instruction;
pub mod ledger;
mod processor;
pub mod rate;
pub mod sale;
pub mod vesting;
pub mod whitelist;

// Only make public elements that would be useful.
/// The configuration PDA of the sale.
pub use config::{ConfigurationPda, SaleConfig, SaleState};
/// Instructions of the crowdsale program.
pub use instruction::*;
/// Handles the dispatch of the processing operations (only used in tests).
pub use processor::process_instruction;
/// Vesting of the purchased and granted tokens.
pub use vesting::{Release, VestingSchedule, VestingSchedulePda};
/// Whitelist membership.
pub use whitelist::WhitelistPda;

// Set the program's ID.
include!(concat!(env!("OUT_DIR"), "/program_id.rs"));

// Set the security.txt data
#[cfg(not(feature = "no-entrypoint"))]
solana_security_txt::security_txt! {
    name: "Crowdsale Program",
    project_url: "https://www.bangk.app",
    contacts: "email:vincent.berthier@bangk.app",
    policy: "none at this time",

    // Optional
    preferred_languages: "fr,en"
}
