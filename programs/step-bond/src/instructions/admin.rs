// =============================================================================
// Admin Instructions
// =============================================================================
// Registry settings only the admin can change. Curves themselves have no
// admin: once created, a bond's table and fees are fixed.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::CurveError;
use crate::events::{AdminTransferred, ProtocolBeneficiaryUpdated};
use crate::state::Registry;

// =============================================================================
// Update Protocol Beneficiary
// =============================================================================

/// Accounts required for update_protocol_beneficiary instruction
#[derive(Accounts)]
pub struct UpdateProtocolBeneficiary<'info> {
    #[account(
        constraint = admin.key() == registry.admin @ CurveError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// CHECK: Only the address is stored
    pub new_beneficiary: UncheckedAccount<'info>,
}

/// Point the protocol fee share at a new wallet
///
/// Protocol fees already accrued move with the role: the new beneficiary
/// withdraws them.
pub fn handler_update_protocol_beneficiary(ctx: Context<UpdateProtocolBeneficiary>) -> Result<()> {
    let new_beneficiary = ctx.accounts.new_beneficiary.key();
    let old_beneficiary = ctx
        .accounts
        .registry
        .set_protocol_beneficiary(new_beneficiary)?;

    emit!(ProtocolBeneficiaryUpdated {
        old_beneficiary,
        new_beneficiary,
    });

    msg!(
        "Protocol beneficiary updated from {} to {}",
        old_beneficiary,
        new_beneficiary
    );

    Ok(())
}

// =============================================================================
// Transfer Admin
// =============================================================================

/// Accounts required for transfer_admin instruction
#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    #[account(
        constraint = admin.key() == registry.admin @ CurveError::AdminOnly
    )]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// CHECK: Only the address is stored
    pub new_admin: UncheckedAccount<'info>,
}

/// Hand admin rights to a new wallet
pub fn handler_transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
    let new_admin = ctx.accounts.new_admin.key();
    let old_admin = ctx.accounts.registry.set_admin(new_admin)?;

    emit!(AdminTransferred {
        old_admin,
        new_admin,
    });

    msg!("Admin transferred from {} to {}", old_admin, new_admin);

    Ok(())
}
