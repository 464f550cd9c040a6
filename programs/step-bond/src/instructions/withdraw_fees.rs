// =============================================================================
// Withdraw Fees Instruction
// =============================================================================
// Pulls a fee ledger entry's whole balance out of the reserve mint's fee
// vault. The creator entry is released by the creator; the protocol entry
// by the registry's current protocol beneficiary.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::CurveError;
use crate::events::FeesWithdrawn;
use crate::state::{FeeLedger, Registry};

/// Accounts required for the withdraw_fees instruction
#[derive(Accounts)]
pub struct WithdrawFees<'info> {
    /// Wallet entitled to the ledger entry
    pub authority: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [FEE_LEDGER_SEED, reserve_mint.key().as_ref(), fee_ledger.beneficiary.as_ref()],
        bump = fee_ledger.bump
    )]
    pub fee_ledger: Account<'info, FeeLedger>,

    pub reserve_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [FEE_VAULT_SEED, reserve_mint.key().as_ref()],
        bump
    )]
    pub fee_vault: Account<'info, TokenAccount>,

    /// Destination for the withdrawn fees
    #[account(
        mut,
        constraint = recipient.mint == reserve_mint.key() @ CurveError::InvalidReserveMint,
        constraint = recipient.owner == authority.key() @ CurveError::InvalidTokenAccountOwner
    )]
    pub recipient: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Handler for withdraw_fees
///
/// Returns the amount withdrawn.
pub fn handler_withdraw_fees(ctx: Context<WithdrawFees>) -> Result<u64> {
    let registry = &ctx.accounts.registry;
    ctx.accounts.fee_ledger.authorize_withdraw(
        registry.key(),
        registry.protocol_beneficiary,
        ctx.accounts.authority.key(),
    )?;

    let amount = ctx.accounts.fee_ledger.take()?;

    require!(
        ctx.accounts.fee_vault.amount >= amount,
        CurveError::CorruptState
    );

    // =========================================================================
    // Transfer Fees: Fee Vault -> Recipient
    // =========================================================================

    // The fee vault is owned by the registry PDA
    let registry_seeds = &[REGISTRY_SEED, &[ctx.accounts.registry.bump]];
    let signer_seeds = &[&registry_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.fee_vault.to_account_info(),
            to: ctx.accounts.recipient.to_account_info(),
            authority: ctx.accounts.registry.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(FeesWithdrawn {
        beneficiary: ctx.accounts.fee_ledger.beneficiary,
        reserve_mint: ctx.accounts.reserve_mint.key(),
        amount,
        recipient: ctx.accounts.recipient.key(),
    });

    msg!("Fees withdrawn: {}", amount);
    msg!("Lifetime withdrawn: {}", ctx.accounts.fee_ledger.total_withdrawn);

    Ok(amount)
}
