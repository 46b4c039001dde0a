// File: crowdsale-macro/src/lib.rs
// Project: crowdsale-onchain
// Creation date: Thursday 25 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Tuesday 03 September 2024 @ 10:12:41
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

//! Attribute macros shared by the crowdsale programs.

mod pda;
use pda::impl_pda;

use proc_macro::TokenStream;

/// Turns a struct into a PDA record.
///
/// Adds the `pda_type` and `bump` fields, derives Borsh (de)serialization and implements
/// `SalePda`, `get_address` and `from_account`.
///
/// ```ignore
/// #[pda(kind = PdaType::VestingSchedule, seed = "Vesting", seed = schedule.beneficiary)]
/// pub struct VestingSchedulePda {
///     pub schedule: VestingSchedule,
/// }
/// ```
#[proc_macro_attribute]
pub fn pda(attrs: TokenStream, input: TokenStream) -> TokenStream {
    impl_pda(attrs, input)
}
