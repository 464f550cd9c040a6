// =============================================================================
// Initialize Registry Instruction
// =============================================================================
// Creates the global Registry. Runs once per deployment: the PDA has a fixed
// seed, so a second call fails at account creation.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::CurveError;
use crate::events::RegistryInitialized;
use crate::state::Registry;

/// Accounts required for the initialize_registry instruction
#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    /// Becomes registry.admin and pays for the account
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + Registry::INIT_SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    /// Wallet that will withdraw the protocol's fee share
    /// CHECK: Only the address is stored
    pub protocol_beneficiary: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Handler for initialize_registry
pub fn handler_initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
    let protocol_beneficiary = ctx.accounts.protocol_beneficiary.key();
    require!(
        protocol_beneficiary != Pubkey::default(),
        CurveError::InvalidAddress
    );

    let registry = &mut ctx.accounts.registry;
    registry.admin = ctx.accounts.admin.key();
    registry.protocol_beneficiary = protocol_beneficiary;
    registry.bond_count = 0;
    registry.bump = ctx.bumps.registry;

    emit!(RegistryInitialized {
        admin: registry.admin,
        protocol_beneficiary,
    });

    msg!("Registry initialized");
    msg!("Admin: {}", registry.admin);
    msg!("Protocol beneficiary: {}", registry.protocol_beneficiary);

    Ok(())
}
