// File: crowdsale/src/instruction.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use borsh::{BorshDeserialize, BorshSerialize};
use shank::ShankInstruction;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::{
    config::{get_mint_address, ConfigurationPda, SaleConfig},
    vesting::VestingSchedulePda,
    whitelist::WhitelistPda,
};

/// Arguments for the program's initialization.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct InitializeArgs {
    /// Parameters of the sale.
    pub config: SaleConfig,
    /// Administrator of the sale.
    pub admin: Pubkey,
    /// Wallet receiving the payments.
    pub wallet: Pubkey,
    /// Recipient of the team allocation.
    pub team_wallet: Pubkey,
    /// Initial conversion rate (base units of token per lamport).
    pub rate: u64,
}

/// Arguments for the creation of the token's mint.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct CreateMintArgs {
    /// Name of the token.
    pub name: String,
    /// Symbol of the token.
    pub symbol: String,
    /// URI of the token's metadata.
    pub uri: String,
}

/// Addresses to add to / remove from the whitelist.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug)]
pub struct WhitelistArgs {
    /// Addresses concerned (their whitelist PDAs are given in the same order).
    pub addresses: Vec<Pubkey>,
}

/// Arguments to update the conversion rate.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct UpdateRateArgs {
    /// New conversion rate.
    pub rate: u64,
}

/// Arguments for a purchase.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct BuyTokensArgs {
    /// Owner of the bought tokens.
    pub beneficiary: Pubkey,
    /// Payment, in lamports.
    pub value: u64,
}

/// Arguments for an administrative allocation or its correction.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct AllocationArgs {
    /// Owner of the vested tokens.
    pub beneficiary: Pubkey,
    /// Principal (new remaining principal for a correction).
    pub amount: u64,
    /// Bonus (new remaining bonus for a correction).
    pub bonus: u64,
}

/// Arguments for the operations on a single schedule.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct BeneficiaryArgs {
    /// Owner of the schedule.
    pub beneficiary: Pubkey,
}

/// Arguments to move tokens out of the revoked pool.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct TransferRevokedTokensArgs {
    /// Wallet receiving the tokens.
    pub to: Pubkey,
    /// Number of tokens.
    pub amount: u64,
}

/// Arguments to hand the mint authority over.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug)]
pub struct UpdateTokenOwnerArgs {
    /// New mint authority.
    pub new_owner: Pubkey,
}

/// Global payload for the crowdsale program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, ShankInstruction)]
#[rustfmt::skip]
pub enum CrowdsaleInstruction {
    /// Initialize the program.
    #[account(0, signer, writable, name="payer", desc="Initialization key, paying for the instruction")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="system_program", desc="System Program")]
    Initialize(InitializeArgs),

    /// Create the token's mint and the sale's custody account.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="mint", desc="Mint of the sold token")]
    #[account(3, writable, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(4, name="system_program", desc="System Program")]
    #[account(5, name="token_program", desc="SPL Token 2022 Program")]
    #[account(6, name="ata_program", desc="Associated Token Account Program")]
    CreateMint(CreateMintArgs),

    /// Add addresses to the whitelist.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="system_program", desc="System Program")]
    #[account(3, writable, name="whitelist", desc="Whitelist PDAs of the addresses, one per address")]
    AddToWhitelist(WhitelistArgs),

    /// Remove addresses from the whitelist.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="system_program", desc="System Program")]
    #[account(3, writable, name="whitelist", desc="Whitelist PDAs of the addresses, one per address")]
    RemoveFromWhitelist(WhitelistArgs),

    /// Update the conversion rate.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    UpdateRate(UpdateRateArgs),

    /// Buy tokens, vested for the beneficiary.
    #[account(0, signer, writable, name="buyer", desc="Buyer paying for the tokens and the instruction")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="whitelist", desc="Whitelist PDA of the beneficiary")]
    #[account(3, writable, name="vesting", desc="Vesting schedule PDA of the beneficiary")]
    #[account(4, writable, name="wallet", desc="Wallet receiving the payment")]
    #[account(5, writable, name="mint", desc="Mint of the sold token")]
    #[account(6, writable, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(7, name="system_program", desc="System Program")]
    #[account(8, name="token_program", desc="SPL Token 2022 Program")]
    BuyTokens(BuyTokensArgs),

    /// Grant a vested allocation outside of the sale.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="vesting", desc="Vesting schedule PDA of the beneficiary")]
    #[account(3, writable, name="mint", desc="Mint of the sold token")]
    #[account(4, writable, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(5, name="system_program", desc="System Program")]
    #[account(6, name="token_program", desc="SPL Token 2022 Program")]
    MintAndVest(AllocationArgs),

    /// Lower the remaining balances of a schedule.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="vesting", desc="Vesting schedule PDA of the beneficiary")]
    UpdateVestingSchedule(AllocationArgs),

    /// Release the unlocked tokens of a beneficiary.
    #[account(0, signer, writable, name="payer", desc="Fee payer (and payer of the beneficiary's ATA if needed)")]
    #[account(1, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="vesting", desc="Vesting schedule PDA of the beneficiary")]
    #[account(3, name="beneficiary", desc="Wallet of the beneficiary")]
    #[account(4, writable, name="beneficiary_ata", desc="ATA of the beneficiary")]
    #[account(5, name="mint", desc="Mint of the sold token")]
    #[account(6, writable, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(7, name="system_program", desc="System Program")]
    #[account(8, name="token_program", desc="SPL Token 2022 Program")]
    #[account(9, name="ata_program", desc="Associated Token Account Program")]
    Release(BeneficiaryArgs),

    /// Revoke the schedule of a beneficiary.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="vesting", desc="Vesting schedule PDA of the beneficiary")]
    RevokeVesting(BeneficiaryArgs),

    /// Move tokens out of the revoked pool.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="target", desc="Wallet receiving the tokens")]
    #[account(3, writable, name="target_ata", desc="ATA receiving the tokens")]
    #[account(4, name="mint", desc="Mint of the sold token")]
    #[account(5, writable, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(6, name="system_program", desc="System Program")]
    #[account(7, name="token_program", desc="SPL Token 2022 Program")]
    #[account(8, name="ata_program", desc="Associated Token Account Program")]
    TransferRevokedTokens(TransferRevokedTokensArgs),

    /// Close the sale and mint the team allocation.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, name="team_wallet", desc="Recipient of the team allocation")]
    #[account(3, writable, name="team_ata", desc="ATA of the team allocation's recipient")]
    #[account(4, writable, name="mint", desc="Mint of the sold token")]
    #[account(5, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(6, name="system_program", desc="System Program")]
    #[account(7, name="token_program", desc="SPL Token 2022 Program")]
    #[account(8, name="ata_program", desc="Associated Token Account Program")]
    Finalize,

    /// Hand the mint authority over.
    #[account(0, signer, writable, name="admin", desc="Administrator of the sale and fee payer")]
    #[account(1, writable, name="config_pda", desc="The PDA in which the sale's configuration is stored")]
    #[account(2, writable, name="mint", desc="Mint of the sold token")]
    #[account(3, name="custody", desc="ATA of the configuration PDA holding the vested tokens")]
    #[account(4, name="token_program", desc="SPL Token 2022 Program")]
    UpdateTokenOwner(UpdateTokenOwnerArgs),
}

// Mint and custody of the sale.
fn token_accounts() -> (Pubkey, Pubkey) {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (mint, _mint_bump) = get_mint_address(&crate::ID);
    let custody =
        get_associated_token_address_with_program_id(&config_pda, &mint, &spl_token_2022::ID);
    (mint, custody)
}

fn ata(owner: &Pubkey) -> Pubkey {
    let (mint, _mint_bump) = get_mint_address(&crate::ID);
    get_associated_token_address_with_program_id(owner, &mint, &spl_token_2022::ID)
}

/// Initializes the sale's configuration.
///
/// # Parameters
/// * `payer` - Initialization key, paying for the instruction,
/// * `args` - Parameters of the sale.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn initialize(payer: &Pubkey, args: InitializeArgs) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::Initialize(args))?,
    })
}

/// Creates the token's mint, owned by the sale.
///
/// # Parameters
/// * `admin` - Administrator of the sale,
/// * `name` - Name of the token,
/// * `symbol` - Symbol of the token,
/// * `uri` - URI of the token's metadata.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn create_mint(
    admin: &Pubkey,
    name: &str,
    symbol: &str,
    uri: &str,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (mint, custody) = token_accounts();
    let args = CreateMintArgs {
        name: name.to_owned(),
        symbol: symbol.to_owned(),
        uri: uri.to_owned(),
    };
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new(mint, false),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::CreateMint(args))?,
    })
}

fn whitelist(
    admin: &Pubkey,
    addresses: &[Pubkey],
    payload: fn(WhitelistArgs) -> CrowdsaleInstruction,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let mut accounts = vec![
        AccountMeta::new(*admin, true),
        AccountMeta::new_readonly(config_pda, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    accounts.extend(
        addresses
            .iter()
            .map(|address| AccountMeta::new(WhitelistPda::get_address(address, &crate::ID).0, false)),
    );
    Ok(Instruction {
        program_id: crate::ID,
        accounts,
        data: borsh::to_vec(&payload(WhitelistArgs {
            addresses: addresses.to_vec(),
        }))?,
    })
}

/// Adds addresses to the whitelist.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn add_to_whitelist(admin: &Pubkey, addresses: &[Pubkey]) -> Result<Instruction, ProgramError> {
    whitelist(admin, addresses, CrowdsaleInstruction::AddToWhitelist)
}

/// Removes addresses from the whitelist.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn remove_from_whitelist(
    admin: &Pubkey,
    addresses: &[Pubkey],
) -> Result<Instruction, ProgramError> {
    whitelist(admin, addresses, CrowdsaleInstruction::RemoveFromWhitelist)
}

/// Updates the conversion rate.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn update_rate(admin: &Pubkey, rate: u64) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::UpdateRate(UpdateRateArgs { rate }))?,
    })
}

/// Buys tokens for a beneficiary.
///
/// # Parameters
/// * `buyer` - Account paying for the tokens,
/// * `beneficiary` - Owner of the vested tokens,
/// * `wallet` - Wallet receiving the payment (from the sale's configuration),
/// * `value` - Payment, in lamports.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn buy_tokens(
    buyer: &Pubkey,
    beneficiary: &Pubkey,
    wallet: &Pubkey,
    value: u64,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (whitelist, _whitelist_bump) = WhitelistPda::get_address(beneficiary, &crate::ID);
    let (vesting, _vesting_bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
    let (mint, custody) = token_accounts();
    let args = BuyTokensArgs {
        beneficiary: *beneficiary,
        value,
    };
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*buyer, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new_readonly(whitelist, false),
            AccountMeta::new(vesting, false),
            AccountMeta::new(*wallet, false),
            AccountMeta::new(mint, false),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::BuyTokens(args))?,
    })
}

/// Grants a vested allocation to a beneficiary.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn mint_and_vest(
    admin: &Pubkey,
    beneficiary: &Pubkey,
    amount: u64,
    bonus: u64,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (vesting, _vesting_bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
    let (mint, custody) = token_accounts();
    let args = AllocationArgs {
        beneficiary: *beneficiary,
        amount,
        bonus,
    };
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new(vesting, false),
            AccountMeta::new(mint, false),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::MintAndVest(args))?,
    })
}

/// Lowers the remaining balances of a beneficiary's schedule.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn update_vesting_schedule(
    admin: &Pubkey,
    beneficiary: &Pubkey,
    amount: u64,
    bonus: u64,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (vesting, _vesting_bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
    let args = AllocationArgs {
        beneficiary: *beneficiary,
        amount,
        bonus,
    };
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new(vesting, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::UpdateVestingSchedule(args))?,
    })
}

/// Releases the unlocked tokens of a beneficiary.
///
/// # Parameters
/// * `payer` - Fee payer, can be anyone,
/// * `beneficiary` - Owner of the schedule, receiving the tokens.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn release(payer: &Pubkey, beneficiary: &Pubkey) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (vesting, _vesting_bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
    let (mint, custody) = token_accounts();
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(config_pda, false),
            AccountMeta::new(vesting, false),
            AccountMeta::new_readonly(*beneficiary, false),
            AccountMeta::new(ata(beneficiary), false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::Release(BeneficiaryArgs {
            beneficiary: *beneficiary,
        }))?,
    })
}

/// Revokes a beneficiary's schedule.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn revoke_vesting(admin: &Pubkey, beneficiary: &Pubkey) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (vesting, _vesting_bump) = VestingSchedulePda::get_address(beneficiary, &crate::ID);
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new(vesting, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::RevokeVesting(BeneficiaryArgs {
            beneficiary: *beneficiary,
        }))?,
    })
}

/// Moves tokens out of the revoked pool.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn transfer_revoked_tokens(
    admin: &Pubkey,
    to: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (mint, custody) = token_accounts();
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new_readonly(*to, false),
            AccountMeta::new(ata(to), false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::TransferRevokedTokens(
            TransferRevokedTokensArgs { to: *to, amount },
        ))?,
    })
}

/// Closes the sale.
///
/// # Parameters
/// * `admin` - Administrator of the sale,
/// * `team_wallet` - Recipient of the team allocation (from the sale's configuration).
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn finalize(admin: &Pubkey, team_wallet: &Pubkey) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (mint, custody) = token_accounts();
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new_readonly(*team_wallet, false),
            AccountMeta::new(ata(team_wallet), false),
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(custody, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::Finalize)?,
    })
}

/// Hands the mint authority of the token over.
///
/// # Errors
/// If instruction's data could not be serialized (so…never?)
pub fn update_token_owner(admin: &Pubkey, new_owner: &Pubkey) -> Result<Instruction, ProgramError> {
    let (config_pda, _config_bump) = ConfigurationPda::get_address(&crate::ID);
    let (mint, custody) = token_accounts();
    Ok(Instruction {
        program_id: crate::ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new(mint, false),
            AccountMeta::new_readonly(custody, false),
            AccountMeta::new_readonly(spl_token_2022::ID, false),
        ],
        data: borsh::to_vec(&CrowdsaleInstruction::UpdateTokenOwner(
            UpdateTokenOwnerArgs {
                new_owner: *new_owner,
            },
        ))?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn whitelist_accounts_follow_addresses() {
        let admin = Pubkey::new_unique();
        let addresses = [Pubkey::new_unique(), Pubkey::new_unique()];
        let instruction = add_to_whitelist(&admin, &addresses).unwrap();
        assert_eq!(instruction.accounts.len(), 5);
        for (meta, address) in instruction.accounts[3..].iter().zip(addresses) {
            assert_eq!(meta.pubkey, WhitelistPda::get_address(address, &crate::ID).0);
            assert!(meta.is_writable);
        }
        let payload = CrowdsaleInstruction::try_from_slice(&instruction.data).unwrap();
        assert!(matches!(
            payload,
            CrowdsaleInstruction::AddToWhitelist(WhitelistArgs { addresses: ref sent }) if sent == &addresses
        ));
    }

    #[test]
    fn release_targets_beneficiary_ata() {
        let payer = Pubkey::new_unique();
        let beneficiary = Pubkey::new_unique();
        let instruction = release(&payer, &beneficiary).unwrap();
        let (mint, _bump) = get_mint_address(&crate::ID);
        assert_eq!(
            instruction.accounts[4].pubkey,
            get_associated_token_address_with_program_id(&beneficiary, &mint, &spl_token_2022::ID)
        );
        assert!(instruction.accounts[0].is_signer);
        assert!(!instruction.accounts[3].is_signer);
    }
}
