// File: crowdsale/src/processor.rs
// Project: crowdsale-onchain
// Creation date: Sunday 09 June 2024
// Author: Vincent Berthier <vincent.berthier@bangk.app>
// -----
// Last modified: Thursday 05 September 2024 @ 11:20:43
// Modified by: Vincent Berthier
// -----
// Copyright © 2024 <Bangk> - All rights reserved

use std::collections::HashSet;

use borsh::BorshDeserialize as _;
use crowdsale_common::{
    check_ata_program, check_key, check_pda_owner, check_spl_program, check_system_program, debug,
    format_timestamp, get_timestamp,
    pda::{allocate_pda, is_unallocated, SalePda},
    security::{require_admin, signer_key},
    Error,
};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    sysvar::Sysvar as _,
};
use spl_associated_token_account::instruction::{
    create_associated_token_account, create_associated_token_account_idempotent,
};
use spl_token_2022::{
    extension::{metadata_pointer, ExtensionType},
    instruction::initialize_mint2,
    state::Mint,
};
use spl_token_metadata_interface::{
    instruction::initialize as initialize_metadata, state::TokenMetadata,
};

use crate::{
    config::{get_mint_address, ConfigurationPda, SaleState, DECIMALS, MINT_SEEDS},
    instruction::{
        AllocationArgs, BeneficiaryArgs, BuyTokensArgs, CreateMintArgs, CrowdsaleInstruction,
        InitializeArgs, TransferRevokedTokensArgs, UpdateRateArgs, UpdateTokenOwnerArgs,
        WhitelistArgs,
    },
    ledger::{DetachedLedger, LamportSink, SplTokenLedger},
    sale::Crowdsale,
    vesting::VestingSchedulePda,
    whitelist::WhitelistPda,
};

include!(concat!(env!("OUT_DIR"), "/keys.rs"));

/// Main processor for the program
///
/// # Errors
/// If the wrong number of accounts was given, if the funds are insufficient, etc.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let Ok(payload) = CrowdsaleInstruction::try_from_slice(instruction_data) else {
        return Err(ProgramError::InvalidInstructionData);
    };
    match payload {
        CrowdsaleInstruction::Initialize(args) => initialize(program_id, accounts, &args),
        CrowdsaleInstruction::CreateMint(args) => create_mint(program_id, accounts, args),
        CrowdsaleInstruction::AddToWhitelist(args) => {
            update_whitelist(program_id, accounts, &args, true)
        }
        CrowdsaleInstruction::RemoveFromWhitelist(args) => {
            update_whitelist(program_id, accounts, &args, false)
        }
        CrowdsaleInstruction::UpdateRate(args) => update_rate(program_id, accounts, args),
        CrowdsaleInstruction::BuyTokens(args) => buy_tokens(program_id, accounts, args),
        CrowdsaleInstruction::MintAndVest(args) => mint_and_vest(program_id, accounts, args),
        CrowdsaleInstruction::UpdateVestingSchedule(args) => {
            update_vesting_schedule(program_id, accounts, args)
        }
        CrowdsaleInstruction::Release(args) => release(program_id, accounts, args),
        CrowdsaleInstruction::RevokeVesting(args) => revoke_vesting(program_id, accounts, args),
        CrowdsaleInstruction::TransferRevokedTokens(args) => {
            transfer_revoked_tokens(program_id, accounts, args)
        }
        CrowdsaleInstruction::Finalize => finalize(program_id, accounts),
        CrowdsaleInstruction::UpdateTokenOwner(args) => {
            update_token_owner(program_id, accounts, args)
        }
    }
}

/// Loads the sale's configuration, checking the account is the right one.
fn load_config(program_id: &Pubkey, account: &AccountInfo) -> Result<ConfigurationPda, ProgramError> {
    let (expected, _bump) = ConfigurationPda::get_address(program_id);
    check_key!(account, expected);
    if is_unallocated(account) {
        msg!("the sale has not been initialized");
        return Err(Error::InvalidSaleConfiguration.into());
    }
    check_pda_owner!(program_id, account);
    ConfigurationPda::from_account(account)
}

/// Loads the schedule of a beneficiary (`None` if it doesn't exist yet).
fn load_schedule(
    program_id: &Pubkey,
    beneficiary: &Pubkey,
    account: &AccountInfo,
) -> Result<(Option<VestingSchedulePda>, u8), ProgramError> {
    let (expected, bump) = VestingSchedulePda::get_address(beneficiary, program_id);
    check_key!(account, expected);
    if is_unallocated(account) {
        return Ok((None, bump));
    }
    check_pda_owner!(program_id, account);
    Ok((Some(VestingSchedulePda::from_account(account)?), bump))
}

fn sale_ledger<'a>(
    config: &ConfigurationPda,
    config_account: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    custody: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
) -> Result<SplTokenLedger<'a>, ProgramError> {
    check_key!(mint, config.state.mint);
    check_spl_program!(token_program);
    Ok(SplTokenLedger::new(
        mint,
        config_account,
        custody,
        token_program,
        config.seeds(),
    )?)
}

/// Creates the ATA of `owner` if it doesn't exist yet.
fn ensure_ata<'a>(
    payer: &AccountInfo<'a>,
    owner: &AccountInfo<'a>,
    ata: &AccountInfo<'a>,
    mint: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    token_program: &AccountInfo<'a>,
) -> ProgramResult {
    if !is_unallocated(ata) {
        return Ok(());
    }
    debug!("creating ATA {} for {}", ata.key, owner.key);
    invoke(
        &create_associated_token_account_idempotent(
            payer.key,
            owner.key,
            mint.key,
            token_program.key,
        ),
        &[
            payer.clone(),
            ata.clone(),
            owner.clone(),
            mint.clone(),
            system_program.clone(),
            token_program.clone(),
        ],
    )
}

struct InitializeAccounts<'a> {
    payer: AccountInfo<'a>,
    config: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
}

impl<'a> InitializeAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            payer: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn initialize(program_id: &Pubkey, accounts: &[AccountInfo], args: &InitializeArgs) -> ProgramResult {
    let ctx = InitializeAccounts::new(accounts)?;
    msg!("Crowdsale: initializing the sale");

    let payer = signer_key(&ctx.payer)?;
    if payer != INIT_KEY {
        msg!("Signer {} is not authorized to initialize the sale.", payer);
        return Err(Error::Unauthorized.into());
    }
    check_system_program!(ctx.system_program);

    let (expected, bump) = ConfigurationPda::get_address(program_id);
    check_key!(ctx.config, expected);
    if !is_unallocated(&ctx.config) {
        msg!("the sale has already been initialized");
        return Err(Error::UniqueOperationAlreadyExecuted.into());
    }

    args.config.validate()?;
    if args.rate == 0 {
        msg!("the conversion rate can't be zero");
        return Err(Error::InvalidSaleConfiguration.into());
    }

    let state = SaleState::new(args.admin, args.wallet, args.team_wallet, args.rate);
    let config = ConfigurationPda::new(bump, args.config, state);
    config.create(&ctx.config, &ctx.payer, program_id)?;

    msg!(
        "sale open from {} to {} at {} tokens per lamport, administered by {}",
        format_timestamp(args.config.start_time),
        format_timestamp(args.config.end_time),
        args.rate,
        args.admin
    );
    Ok(())
}

struct CreateMintAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    ata_program: AccountInfo<'a>,
}

impl<'a> CreateMintAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
            ata_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn create_mint(program_id: &Pubkey, accounts: &[AccountInfo], args: CreateMintArgs) -> ProgramResult {
    let ctx = CreateMintAccounts::new(accounts)?;
    msg!("Crowdsale: creating the {} mint", args.symbol);

    check_system_program!(ctx.system_program);
    check_spl_program!(ctx.token_program);
    check_ata_program!(ctx.ata_program);

    let mut config = load_config(program_id, &ctx.config)?;
    require_admin(&signer_key(&ctx.admin)?, &config.state.admin)?;

    let (mint_address, mint_bump) = get_mint_address(program_id);
    check_key!(ctx.mint, mint_address);
    if !is_unallocated(&ctx.mint) {
        msg!("the mint has already been created");
        return Err(Error::UniqueOperationAlreadyExecuted.into());
    }

    debug!("Initializing mint {}", ctx.mint.key);
    let mint_len =
        ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])
            .map_err(|_err| Error::CrossProgramCallFailed)?;

    let metadata = TokenMetadata {
        update_authority: Some(*ctx.config.key).try_into()?,
        mint: *ctx.mint.key,
        name: args.name,
        symbol: args.symbol,
        uri: args.uri,
        additional_metadata: vec![],
    };
    let meta_len = metadata
        .tlv_size_of()
        .map_err(|_err| Error::InvalidRawData)?;
    let data_len = mint_len
        .checked_add(meta_len)
        .ok_or(Error::ArithmeticError)?;

    // The metadata is appended by the token program: the rent must already cover it.
    let rent = Rent::get()?.minimum_balance(data_len);
    debug!("Creating {} mint of size {}b (rent {}).", metadata.name, data_len, rent);
    let [mint_seed, sale_seed] = MINT_SEEDS;
    allocate_pda(
        &ctx.mint,
        &ctx.admin,
        &spl_token_2022::id(),
        mint_len,
        rent,
        &[mint_seed, sale_seed, &[mint_bump]],
    )?;

    let seeds = config.seeds();
    let seeds = seeds.iter().map(Vec::as_slice).collect::<Vec<_>>();
    debug!("Initializing extensions");
    invoke(
        &metadata_pointer::instruction::initialize(
            &spl_token_2022::id(),
            ctx.mint.key,
            Some(*ctx.config.key),
            Some(*ctx.mint.key),
        )?,
        &[ctx.mint.clone()],
    )?;

    debug!("Initializing Mint");
    invoke(
        &initialize_mint2(
            &spl_token_2022::id(),
            ctx.mint.key,
            ctx.config.key,
            None,
            DECIMALS,
        )?,
        &[ctx.mint.clone()],
    )?;

    debug!("Initializing metadata");
    invoke_signed(
        &initialize_metadata(
            &spl_token_2022::id(),
            ctx.mint.key,
            ctx.config.key,
            ctx.mint.key,
            ctx.config.key,
            metadata.name,
            metadata.symbol,
            metadata.uri,
        ),
        &[ctx.mint.clone(), ctx.config.clone()],
        &[seeds.as_slice()],
    )?;

    debug!("Creating the custody account");
    invoke(
        &create_associated_token_account(
            ctx.admin.key,
            ctx.config.key,
            ctx.mint.key,
            ctx.token_program.key,
        ),
        &[
            ctx.admin.clone(),
            ctx.custody.clone(),
            ctx.config.clone(),
            ctx.mint.clone(),
            ctx.system_program.clone(),
            ctx.token_program.clone(),
        ],
    )?;

    config.state.mint = *ctx.mint.key;
    config.state.token_owner = *ctx.config.key;
    config.write(&ctx.config, &ctx.admin)?;
    msg!("mint {} created, custody {}", ctx.mint.key, ctx.custody.key);
    Ok(())
}

struct WhitelistAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    entries: Vec<AccountInfo<'a>>,
}

impl<'a> WhitelistAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            entries: accounts_iter.cloned().collect(),
        })
    }
}

fn update_whitelist(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: &WhitelistArgs,
    listed: bool,
) -> ProgramResult {
    let ctx = WhitelistAccounts::new(accounts)?;
    msg!(
        "Crowdsale: {} {} address(es) {} the whitelist",
        if listed { "adding" } else { "removing" },
        args.addresses.len(),
        if listed { "to" } else { "from" },
    );

    check_system_program!(ctx.system_program);
    if ctx.entries.len() != args.addresses.len() {
        msg!(
            "expected {} whitelist accounts, got {}",
            args.addresses.len(),
            ctx.entries.len()
        );
        return Err(ProgramError::NotEnoughAccountKeys);
    }

    let mut config = load_config(program_id, &ctx.config)?;
    let caller = signer_key(&ctx.admin)?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(args.addresses.len());
    let mut targets = Vec::with_capacity(args.addresses.len());
    for (address, account) in args.addresses.iter().zip(ctx.entries.iter()) {
        let (expected, bump) = WhitelistPda::get_address(address, program_id);
        check_key!(account, expected);
        if !seen.insert(*address) {
            continue;
        }
        if is_unallocated(account) {
            // Removing an address that was never listed does nothing.
            if listed {
                entries.push(WhitelistPda::new(bump, *address, false));
                targets.push(account);
            }
            continue;
        }
        check_pda_owner!(program_id, account);
        entries.push(WhitelistPda::from_account(account)?);
        targets.push(account);
    }

    let mut ledger = DetachedLedger::new(*ctx.config.key);
    let ConfigurationPda { config: params, state, .. } = &mut config;
    let changed = Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .update_whitelist(&mut entries, listed)?;

    for (entry, account) in entries.iter().zip(targets) {
        entry.save(account, &ctx.admin, program_id)?;
    }
    msg!("{} whitelist entries updated", changed);
    Ok(())
}

struct AdminAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
}

impl<'a> AdminAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn update_rate(program_id: &Pubkey, accounts: &[AccountInfo], args: UpdateRateArgs) -> ProgramResult {
    let ctx = AdminAccounts::new(accounts)?;
    msg!("Crowdsale: updating the rate to {}", args.rate);

    let mut config = load_config(program_id, &ctx.config)?;
    let caller = signer_key(&ctx.admin)?;
    let previous = config.state.rate;

    let mut ledger = DetachedLedger::new(*ctx.config.key);
    let ConfigurationPda { config: params, state, .. } = &mut config;
    Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?).update_rate(args.rate)?;

    config.write(&ctx.config, &ctx.admin)?;
    msg!("rate updated from {} to {}", previous, args.rate);
    Ok(())
}

struct BuyTokensAccounts<'a> {
    buyer: AccountInfo<'a>,
    config: AccountInfo<'a>,
    whitelist: AccountInfo<'a>,
    vesting: AccountInfo<'a>,
    wallet: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
}

impl<'a> BuyTokensAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            buyer: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            whitelist: next_account_info(accounts_iter)?.clone(),
            vesting: next_account_info(accounts_iter)?.clone(),
            wallet: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn buy_tokens(program_id: &Pubkey, accounts: &[AccountInfo], args: BuyTokensArgs) -> ProgramResult {
    let ctx = BuyTokensAccounts::new(accounts)?;
    msg!(
        "Crowdsale: {} buys tokens for {} lamports on behalf of {}",
        ctx.buyer.key,
        args.value,
        args.beneficiary
    );

    check_system_program!(ctx.system_program);
    let buyer = signer_key(&ctx.buyer)?;
    let mut config = load_config(program_id, &ctx.config)?;
    check_key!(ctx.wallet, config.state.wallet);

    let whitelisted = WhitelistPda::is_whitelisted(program_id, &args.beneficiary, &ctx.whitelist)?;
    let (existing, bump) = load_schedule(program_id, &args.beneficiary, &ctx.vesting)?;

    let mut ledger = sale_ledger(
        &config,
        &ctx.config,
        &ctx.mint,
        &ctx.custody,
        &ctx.token_program,
    )?;
    let mut sink = LamportSink::new(&ctx.buyer, &ctx.wallet, &ctx.system_program);
    let ConfigurationPda { config: params, state, .. } = &mut config;
    let schedule = Crowdsale::new(params, state, &mut ledger, buyer, get_timestamp()?).buy_tokens(
        &mut sink,
        &args.beneficiary,
        whitelisted,
        existing.as_ref().map(|pda| &pda.schedule),
        args.value,
    )?;

    VestingSchedulePda::new(bump, args.beneficiary, schedule).create(
        &ctx.vesting,
        &ctx.buyer,
        program_id,
    )?;
    config.write(&ctx.config, &ctx.buyer)?;
    msg!(
        "{} tokens vested for {} (bonus {})",
        schedule.initial_amount,
        args.beneficiary,
        schedule.initial_bonus
    );
    Ok(())
}

struct AllocationAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    vesting: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
}

impl<'a> AllocationAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            vesting: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn mint_and_vest(program_id: &Pubkey, accounts: &[AccountInfo], args: AllocationArgs) -> ProgramResult {
    let ctx = AllocationAccounts::new(accounts)?;
    msg!(
        "Crowdsale: granting {} tokens (bonus {}) to {}",
        args.amount,
        args.bonus,
        args.beneficiary
    );

    check_system_program!(ctx.system_program);
    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    let (existing, bump) = load_schedule(program_id, &args.beneficiary, &ctx.vesting)?;

    let mut ledger = sale_ledger(
        &config,
        &ctx.config,
        &ctx.mint,
        &ctx.custody,
        &ctx.token_program,
    )?;
    let ConfigurationPda { config: params, state, .. } = &mut config;
    let schedule = Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .mint_and_vest(
            &args.beneficiary,
            existing.as_ref().map(|pda| &pda.schedule),
            args.amount,
            args.bonus,
        )?;

    VestingSchedulePda::new(bump, args.beneficiary, schedule).create(
        &ctx.vesting,
        &ctx.admin,
        program_id,
    )?;
    config.write(&ctx.config, &ctx.admin)
}

struct ScheduleAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    vesting: AccountInfo<'a>,
}

impl<'a> ScheduleAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            vesting: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn update_vesting_schedule(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: AllocationArgs,
) -> ProgramResult {
    let ctx = ScheduleAccounts::new(accounts)?;
    msg!(
        "Crowdsale: correcting the schedule of {} to {} (bonus {})",
        args.beneficiary,
        args.amount,
        args.bonus
    );

    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    let (mut vesting, _bump) = load_schedule(program_id, &args.beneficiary, &ctx.vesting)?;

    let mut ledger = DetachedLedger::new(*ctx.config.key);
    let ConfigurationPda { config: params, state, .. } = &mut config;
    let delta = Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .update_vesting_schedule(
            vesting.as_mut().map(|pda| &mut pda.schedule),
            args.amount,
            args.bonus,
        )?;

    if let Some(vesting) = vesting {
        vesting.write(&ctx.vesting, &ctx.admin)?;
    }
    config.write(&ctx.config, &ctx.admin)?;
    msg!(
        "{} tokens moved to the revoked pool (now {})",
        delta,
        config.state.revoked_amount
    );
    Ok(())
}

struct ReleaseAccounts<'a> {
    payer: AccountInfo<'a>,
    config: AccountInfo<'a>,
    vesting: AccountInfo<'a>,
    beneficiary: AccountInfo<'a>,
    beneficiary_ata: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    ata_program: AccountInfo<'a>,
}

impl<'a> ReleaseAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            payer: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            vesting: next_account_info(accounts_iter)?.clone(),
            beneficiary: next_account_info(accounts_iter)?.clone(),
            beneficiary_ata: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
            ata_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn release(program_id: &Pubkey, accounts: &[AccountInfo], args: BeneficiaryArgs) -> ProgramResult {
    let ctx = ReleaseAccounts::new(accounts)?;
    msg!("Crowdsale: releasing tokens for {}", args.beneficiary);

    check_system_program!(ctx.system_program);
    check_ata_program!(ctx.ata_program);
    check_key!(ctx.beneficiary, args.beneficiary);
    let caller = signer_key(&ctx.payer)?;
    let mut config = load_config(program_id, &ctx.config)?;
    let (mut vesting, _bump) = load_schedule(program_id, &args.beneficiary, &ctx.vesting)?;

    let mut ledger = sale_ledger(
        &config,
        &ctx.config,
        &ctx.mint,
        &ctx.custody,
        &ctx.token_program,
    )?
    .with_holders(&[&ctx.beneficiary_ata]);
    ensure_ata(
        &ctx.payer,
        &ctx.beneficiary,
        &ctx.beneficiary_ata,
        &ctx.mint,
        &ctx.system_program,
        &ctx.token_program,
    )?;

    let ConfigurationPda { config: params, state, .. } = &mut config;
    let released = Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?).release(
        &args.beneficiary,
        vesting.as_mut().map(|pda| &mut pda.schedule),
    )?;

    if let Some(vesting) = vesting {
        vesting.write(&ctx.vesting, &ctx.payer)?;
    }
    msg!(
        "released {} tokens and {} bonus tokens to {}",
        released.principal,
        released.bonus,
        args.beneficiary
    );
    Ok(())
}

fn revoke_vesting(program_id: &Pubkey, accounts: &[AccountInfo], args: BeneficiaryArgs) -> ProgramResult {
    let ctx = ScheduleAccounts::new(accounts)?;
    msg!("Crowdsale: revoking the schedule of {}", args.beneficiary);

    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    let (mut vesting, _bump) = load_schedule(program_id, &args.beneficiary, &ctx.vesting)?;

    let mut ledger = DetachedLedger::new(*ctx.config.key);
    let ConfigurationPda { config: params, state, .. } = &mut config;
    let forfeited = Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .revoke_vesting(vesting.as_mut().map(|pda| &mut pda.schedule))?;

    if let Some(vesting) = vesting {
        vesting.write(&ctx.vesting, &ctx.admin)?;
    }
    config.write(&ctx.config, &ctx.admin)?;
    msg!(
        "{} tokens forfeited by {} (pool now {})",
        forfeited,
        args.beneficiary,
        config.state.revoked_amount
    );
    Ok(())
}

struct PayoutAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    target: AccountInfo<'a>,
    target_ata: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    system_program: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    ata_program: AccountInfo<'a>,
}

impl<'a> PayoutAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            target: next_account_info(accounts_iter)?.clone(),
            target_ata: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            system_program: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
            ata_program: next_account_info(accounts_iter)?.clone(),
        })
    }

    fn ledger(&self, config: &ConfigurationPda) -> Result<SplTokenLedger<'a>, ProgramError> {
        check_system_program!(self.system_program);
        check_ata_program!(self.ata_program);
        let ledger = sale_ledger(
            config,
            &self.config,
            &self.mint,
            &self.custody,
            &self.token_program,
        )?
        .with_holders(&[&self.target_ata]);
        ensure_ata(
            &self.admin,
            &self.target,
            &self.target_ata,
            &self.mint,
            &self.system_program,
            &self.token_program,
        )?;
        Ok(ledger)
    }
}

fn transfer_revoked_tokens(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: TransferRevokedTokensArgs,
) -> ProgramResult {
    let ctx = PayoutAccounts::new(accounts)?;
    msg!(
        "Crowdsale: moving {} revoked tokens to {}",
        args.amount,
        args.to
    );

    check_key!(ctx.target, args.to);
    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    // Nobody but the administrator gets to create accounts at the sale's expense.
    require_admin(&caller, &config.state.admin)?;
    let mut ledger = ctx.ledger(&config)?;

    let ConfigurationPda { config: params, state, .. } = &mut config;
    Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .transfer_revoked_tokens(&args.to, args.amount)?;

    config.write(&ctx.config, &ctx.admin)?;
    msg!("revoked pool now holds {} tokens", config.state.revoked_amount);
    Ok(())
}

fn finalize(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let ctx = PayoutAccounts::new(accounts)?;
    msg!("Crowdsale: finalizing the sale");

    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    check_key!(ctx.target, config.state.team_wallet);
    require_admin(&caller, &config.state.admin)?;
    let mut ledger = ctx.ledger(&config)?;

    let now = get_timestamp()?;
    let ConfigurationPda { config: params, state, .. } = &mut config;
    Crowdsale::new(params, state, &mut ledger, caller, now).finalize()?;

    config.write(&ctx.config, &ctx.admin)?;
    msg!(
        "sale finalized on {}: {} tokens minted to {}",
        format_timestamp(now),
        config.config.team_allocation,
        config.state.team_wallet
    );
    Ok(())
}

struct UpdateTokenOwnerAccounts<'a> {
    admin: AccountInfo<'a>,
    config: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    custody: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
}

impl<'a> UpdateTokenOwnerAccounts<'a> {
    fn new(accounts: &[AccountInfo<'a>]) -> Result<Self, ProgramError> {
        let accounts_iter = &mut accounts.iter();
        Ok(Self {
            admin: next_account_info(accounts_iter)?.clone(),
            config: next_account_info(accounts_iter)?.clone(),
            mint: next_account_info(accounts_iter)?.clone(),
            custody: next_account_info(accounts_iter)?.clone(),
            token_program: next_account_info(accounts_iter)?.clone(),
        })
    }
}

fn update_token_owner(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: UpdateTokenOwnerArgs,
) -> ProgramResult {
    let ctx = UpdateTokenOwnerAccounts::new(accounts)?;
    msg!("Crowdsale: handing the mint authority over to {}", args.new_owner);

    let caller = signer_key(&ctx.admin)?;
    let mut config = load_config(program_id, &ctx.config)?;
    let mut ledger = sale_ledger(
        &config,
        &ctx.config,
        &ctx.mint,
        &ctx.custody,
        &ctx.token_program,
    )?;

    let ConfigurationPda { config: params, state, .. } = &mut config;
    Crowdsale::new(params, state, &mut ledger, caller, get_timestamp()?)
        .update_token_owner(&args.new_owner)?;

    config.write(&ctx.config, &ctx.admin)
}
