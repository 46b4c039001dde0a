// File: crowdsale-common/src/lib.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Wednesday 04 September 2024 @ 16:02:17
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

//! Definitions of operations, types, utilities shared by the crowdsale programs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

/// Definition of Custom Error for the crowdsale On-Chain programs
pub mod errors;
/// Definition of the crowdsale's PDAs
pub mod pda;
/// Account queries (mints, ATAs, clock)
mod query;
/// Definition of security checks perform before executing instructions
pub mod security;

pub use errors::{Error, Result};
pub use query::*;

/// Only output messages if in debug mode.
#[macro_export]
macro_rules! debug {
    ($($msg:expr),+$(,)?) => {
        #[cfg(feature = "debug-msg")]
        solana_program::msg!($($msg,)+)
    };
}
