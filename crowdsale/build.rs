// File: crowdsale/build.rs
// Project: crowdsale-onchain
// Creation date: Thursday 13 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Tuesday 03 September 2024 @ 09:41:12
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use std::{env, fs, path::Path};

const TESTING_INIT_KEY: &str = "HH9PXuEgE36MgMDq9hhY4gLGh4CEMUKPqLoW8UrjaiX3";
const TESTING_PROGRAM_ID: &str = "CCj7VqoXZxn2ZGs8TPKGW27AWu5Wsf7qhLx4Xo2YUsBb";

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let path_keys = Path::new(&out_dir).join("keys.rs");
    let path_id = Path::new(&out_dir).join("program_id.rs");

    match env::var("CROWDSALE_MODE").unwrap_or_default().as_str() {
        mode @ ("MAINNET" | "DEVNET") => {
            let init_key = env::var("CROWDSALE_INIT_KEY").unwrap();
            let program_id = env::var("CROWDSALE_PROGRAM_ID").unwrap();
            println!("cargo:warning=Compiling crowdsale for {mode} ({program_id})");
            write_key(&path_keys, &init_key);
            write_id(&path_id, &program_id);
        }
        "TESTING" => {
            write_testing(&path_keys, &path_id);
        }
        _ => {
            println!(
                "cargo:warning=Compiling crowdsale with unrecognized mode '{:?}': using TESTING",
                env::var("CROWDSALE_MODE")
            );
            write_testing(&path_keys, &path_id);
        }
    }
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CROWDSALE_MODE");
    println!("cargo:rerun-if-env-changed=CROWDSALE_INIT_KEY");
    println!("cargo:rerun-if-env-changed=CROWDSALE_PROGRAM_ID");
}

fn write_testing(path_keys: &Path, path_id: &Path) {
    write_key(path_keys, TESTING_INIT_KEY);
    write_id(path_id, TESTING_PROGRAM_ID);
    println!("cargo:rustc-cfg=feature=\"debug-msg\"");
}

fn write_key(dest_path: &Path, key: &str) {
    fs::write(
        dest_path,
        format!(
            "
/// Key allowed to initialize the sale
pub const INIT_KEY: Pubkey = solana_program::pubkey!(\"{key}\");
"
        ),
    )
    .unwrap();
}

fn write_id(dest_path: &Path, program_id: &str) {
    fs::write(
        dest_path,
        format!(
            "
solana_program::declare_id!(\"{program_id}\");
"
        ),
    )
    .unwrap();
}
