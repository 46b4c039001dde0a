// File: crowdsale-macro/src/pda.rs
// Project: crowdsale-onchain
// Creation date: Thursday 25 July 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Tuesday 03 September 2024 @ 10:12:41
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use darling::{ast::NestedMeta, util::parse_expr, Error, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parser, parse_macro_input, DeriveInput, Expr, ExprField, ExprLit, ExprPath, Ident,
    Member,
};

#[derive(Debug, FromMeta)]
struct PdaArgs {
    kind: syn::Path,
    #[darling(multiple, with = parse_expr::preserve_str_literal)]
    seed: Vec<Expr>,
}

// Seeds as they are used to sign for the PDA (`SalePda::seeds()`).
fn get_seed(seed: &Expr) -> TokenStream2 {
    match seed {
        Expr::Lit(ExprLit { lit: value, .. }) => quote! { Seed::from(#value) },
        Expr::Field(field) => quote! { Seed::from(self.#field) },
        Expr::Path(ExprPath { path, .. }) => {
            assert!(
                path.segments.len() == 1,
                "seed should either be a literal, an ident or a field"
            );
            quote! { Seed::from(self.#path) }
        }
        _ => panic!("seed should be either literal, an ident or a field"),
    }
}

// The bump always comes last.
fn make_pda_seed(seeds: &[TokenStream2]) -> TokenStream2 {
    quote! { Vec::from([#(#seeds,)* Seed::from(self.bump)]) }
}

// Data used to generate `get_address()`:
// -> the parameters of the function,
// -> the documentation of those parameters,
// -> the conversions of the parameters into seeds,
// -> the seeds as given to `Pubkey::find_program_address()`.
fn get_address_data(seeds: &[Expr]) -> (TokenStream2, String, TokenStream2, TokenStream2) {
    let mut params = quote! {};
    let mut doc = String::new();
    let mut casts = quote! {};
    let mut address_seeds = Vec::new();

    for (seed, ident) in seeds.iter().map(get_address_seed) {
        if let Some(ident) = ident {
            params = quote! { #params #ident: I, };
            doc = format!("{doc}* `{ident}`\n");
            casts = quote! {
                #casts
                let #ident: Seed = #ident.into();
                let #ident: Vec<u8> = #ident.into();
            };
        }
        address_seeds.push(seed);
    }
    let address_seeds = quote! { #(&#address_seeds),* };
    (params, doc, casts, address_seeds)
}

// Seed and (optional) parameter name for each `seed` attribute.
fn get_address_seed(expr: &Expr) -> (TokenStream2, Option<Ident>) {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => (quote! {#lit.as_bytes().to_vec()}, None),
        Expr::Field(ExprField {
            member: Member::Named(ident),
            ..
        }) => (quote! { #ident }, Some(ident.clone())),
        Expr::Path(ExprPath { path, .. }) => match path.segments.first() {
            Some(segment) => {
                let ident = segment.ident.clone();
                (quote! { #ident }, Some(ident))
            }
            None => (quote! {}, None),
        },
        _ => (quote! {}, None),
    }
}

fn get_address_fn(
    crate_name: &Ident,
    params: &TokenStream2,
    casts: &TokenStream2,
    seeds: &TokenStream2,
) -> TokenStream2 {
    if params.is_empty() {
        quote! {
            pub fn get_address(
                program_id: &solana_program::pubkey::Pubkey,
            ) -> (solana_program::pubkey::Pubkey, u8) {
                solana_program::pubkey::Pubkey::find_program_address(&[#seeds], program_id)
            }
        }
    } else {
        quote! {
            pub fn get_address<I>(
                #params program_id: &solana_program::pubkey::Pubkey,
            ) -> (solana_program::pubkey::Pubkey, u8)
            where
                I: Into<#crate_name::pda::Seed>,
            {
                use #crate_name::pda::Seed;

                #casts
                solana_program::pubkey::Pubkey::find_program_address(&[#seeds], program_id)
            }
        }
    }
}

// Implements most of a PDA's boilerplate.
pub fn impl_pda(attrs: TokenStream, input: TokenStream) -> TokenStream {
    let mut ast = parse_macro_input!(input as DeriveInput);
    let name = ast.ident.clone();

    let attr_args = match NestedMeta::parse_meta_list(attrs.into()) {
        Ok(v) => v,
        Err(e) => {
            return TokenStream::from(Error::from(e).write_errors());
        }
    };

    let PdaArgs { seed, kind } = match PdaArgs::from_list(&attr_args) {
        Ok(params) => params,
        Err(error) => {
            return TokenStream::from(error.write_errors());
        }
    };

    if seed.is_empty() {
        return TokenStream::from(Error::missing_field("seed").write_errors());
    }

    let crate_ident = match std::env::var("CARGO_PKG_NAME").unwrap_or_default().as_str() {
        "crowdsale-common" => format_ident!("crate"),
        _ => format_ident!("crowdsale_common"),
    };
    let (get_address_params, get_address_doc, get_address_casts, get_address_seeds) =
        get_address_data(&seed);
    let seeds = seed.iter().map(get_seed).collect::<Vec<_>>();
    let pda_seeds = make_pda_seed(&seeds);

    let syn::Data::Struct(ref mut struct_data) = ast.data else {
        return syn::Error::new(
            ast.ident.span(),
            "the PDA attribute can only be used on a struct",
        )
        .into_compile_error()
        .into();
    };

    if let syn::Fields::Named(fields) = &mut struct_data.fields {
        let header = [
            quote! {
                /// Type of the PDA
                pub pda_type: #crate_ident::pda::PdaType
            },
            quote! {
                /// Bump for the PDA
                pub bump: u8
            },
        ];
        for (idx, field) in header.into_iter().enumerate() {
            match syn::Field::parse_named.parse2(field) {
                Ok(field) => fields.named.insert(idx, field),
                Err(err) => return err.into_compile_error().into(),
            }
        }
    }

    let get_address = get_address_fn(
        &crate_ident,
        &get_address_params,
        &get_address_casts,
        &get_address_seeds,
    );

    // Built as a string, otherwise cargo test picks up the list as a doc test.
    let get_address_doc = format!(
        "Get the PDA's address.\n\n All parameters that are not the program_id must implement `Into<Seed>`.\n\n # Parameters\n {get_address_doc} * `program_id` - Program owning the PDA.\n\n # Returns\n\n * Tuple of the PDA's public key and associated bump");

    quote! {
        #[derive(Debug, Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize, shank::ShankAccount)]
        #ast

        #[automatically_derived]
        impl #crate_ident::pda::SalePda for #name {
            const PDA_TYPE: #crate_ident::pda::PdaType = #kind;

            fn get_bump(&self) -> u8 {
                self.bump
            }

            fn is_valid(&self) -> bool {
                self.pda_type == Self::PDA_TYPE
            }

            fn seeds(&self) -> Vec<Vec<u8>> {
                use #crate_ident::pda::Seed;
                let seeds: Vec<Seed> = #pda_seeds;
                seeds.into_iter().map(Into::into).collect()
            }
        }

        #[automatically_derived]
        impl #name {
            #[doc = #get_address_doc]
            #[must_use]
            #get_address

            /// Loads a PDA data from an account.
            ///
            /// # Parameters
            /// * `account` - Account from which to read the data
            ///
            /// # Errors
            /// If the given account does not contain the expected data.
            pub fn from_account(account: &solana_program::account_info::AccountInfo)
                -> core::result::Result<Self, solana_program::program_error::ProgramError> {
                let data = account.try_borrow_data()?;
                let res = <Self as borsh::BorshDeserialize>::try_from_slice(&data)
                    .map_err(|_err| #crate_ident::Error::InvalidRawData)?;
                if res.pda_type != <Self as #crate_ident::pda::SalePda>::PDA_TYPE {
                    return Err(#crate_ident::Error::InvalidPdaType.into());
                }
                Ok(res)
            }
        }
    }
    .into()
}
