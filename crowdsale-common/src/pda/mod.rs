// File: crowdsale-common/src/pda/mod.rs
// Project: crowdsale-onchain
// Creation date: Thursday 13 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 25 July 2024 @ 19:59:05
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

mod account;
mod seed;

pub use account::*;
pub use seed::*;
