// =============================================================================
// Sell Instruction
// =============================================================================
// Burn curve tokens for reserve along the step table.
//
// Flow:
// 1. Quote against the mint's current supply
// 2. Check slippage and the seller's token balance
// 3. Burn the tokens (seller signs)
// 4. Take the gross reserve off the bond's reserve balance
// 5. Transfer the net reserve to the seller and fees to the fee vault,
//    then verify the vault deltas
// 6. Credit both fee ledgers
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::CurveError;
use crate::events::TokensSold;
use crate::instructions::checks::{
    check_burn_authority, check_min_out, check_vault_paid, check_vault_received,
};
use crate::math::SellQuote;
use crate::state::{Bond, FeeLedger, Registry};

/// Accounts required for the sell instruction
#[derive(Accounts)]
pub struct Sell<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// Burns tokens, receives reserve, and pays rent for new ledger entries
    #[account(mut)]
    pub seller: Signer<'info>,

    // =========================================================================
    // Registry, Bond & Mints
    // =========================================================================

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [BOND_SEED, bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    #[account(
        constraint = reserve_mint.key() == bond.reserve_mint @ CurveError::InvalidReserveMint
    )]
    pub reserve_mint: Account<'info, Mint>,

    #[account(
        mut,
        seeds = [TOKEN_MINT_SEED, bond.key().as_ref()],
        bump = bond.token_mint_bump
    )]
    pub token_mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        payer = seller,
        space = 8 + FeeLedger::INIT_SPACE,
        seeds = [FEE_LEDGER_SEED, reserve_mint.key().as_ref(), bond.creator.as_ref()],
        bump
    )]
    pub creator_fee_ledger: Account<'info, FeeLedger>,

    #[account(
        init_if_needed,
        payer = seller,
        space = 8 + FeeLedger::INIT_SPACE,
        seeds = [FEE_LEDGER_SEED, reserve_mint.key().as_ref(), registry.key().as_ref()],
        bump
    )]
    pub protocol_fee_ledger: Account<'info, FeeLedger>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Seller's curve token account (source of tokens to burn)
    #[account(
        mut,
        constraint = seller_token_account.mint == token_mint.key() @ CurveError::InvalidTokenMint
    )]
    pub seller_token_account: Account<'info, TokenAccount>,

    /// Seller's reserve account (destination for proceeds)
    #[account(
        mut,
        constraint = seller_reserve_account.mint == reserve_mint.key() @ CurveError::InvalidReserveMint,
        constraint = seller_reserve_account.owner == seller.key() @ CurveError::InvalidTokenAccountOwner
    )]
    pub seller_reserve_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [RESERVE_VAULT_SEED, bond.key().as_ref()],
        bump = bond.reserve_vault_bump
    )]
    pub reserve_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [FEE_VAULT_SEED, reserve_mint.key().as_ref()],
        bump
    )]
    pub fee_vault: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for sell (exact tokens in)
///
/// # Arguments
/// * `tokens_in` - Tokens to burn
/// * `min_reserve_out` - Least reserve the seller accepts, after fees
pub fn handler_sell(ctx: Context<Sell>, tokens_in: u64, min_reserve_out: u64) -> Result<SellQuote> {
    // =========================================================================
    // Quote
    // =========================================================================

    let supply = ctx.accounts.token_mint.supply;
    let quote = ctx.accounts.bond.quote_sell(supply, tokens_in)?;

    check_min_out(quote.reserve_out, min_reserve_out)?;
    check_burn_authority(ctx.accounts.seller_token_account.owner, ctx.accounts.seller.key())?;
    require!(
        ctx.accounts.seller_token_account.amount >= tokens_in,
        CurveError::InsufficientBalance
    );
    require!(
        ctx.accounts.reserve_vault.amount >= quote.gross_reserve,
        CurveError::CorruptState
    );

    let creator_fee = quote.fees.creator_fee;
    let protocol_fee = quote.fees.protocol_fee;
    let fee_total = quote.fees.total()?;

    msg!(
        "Selling {} tokens for {} reserve (fees: creator {}, protocol {})",
        tokens_in,
        quote.reserve_out,
        creator_fee,
        protocol_fee
    );

    // =========================================================================
    // Burn Tokens from Seller
    // =========================================================================

    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.token_mint.to_account_info(),
            from: ctx.accounts.seller_token_account.to_account_info(),
            authority: ctx.accounts.seller.to_account_info(),
        },
    );
    token::burn(burn_ctx, tokens_in)?;

    ctx.accounts.bond.record_sell(&quote)?;

    // =========================================================================
    // Transfer Reserve: Reserve Vault -> Seller, Reserve Vault -> Fee Vault
    // =========================================================================

    let vault_before = ctx.accounts.reserve_vault.amount;
    let fee_vault_before = ctx.accounts.fee_vault.amount;

    let bond_id_bytes = ctx.accounts.bond.bond_id.to_le_bytes();
    let bond_seeds = &[
        BOND_SEED,
        bond_id_bytes.as_ref(),
        &[ctx.accounts.bond.bump],
    ];
    let signer_seeds = &[&bond_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.reserve_vault.to_account_info(),
            to: ctx.accounts.seller_reserve_account.to_account_info(),
            authority: ctx.accounts.bond.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, quote.reserve_out)?;

    if fee_total > 0 {
        let fee_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.reserve_vault.to_account_info(),
                to: ctx.accounts.fee_vault.to_account_info(),
                authority: ctx.accounts.bond.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(fee_ctx, fee_total)?;
    }

    ctx.accounts.reserve_vault.reload()?;
    ctx.accounts.fee_vault.reload()?;

    check_vault_paid(vault_before, ctx.accounts.reserve_vault.amount, quote.gross_reserve)?;
    check_vault_received(fee_vault_before, ctx.accounts.fee_vault.amount, fee_total)?;

    // =========================================================================
    // Credit Fee Ledgers
    // =========================================================================

    let reserve_mint = ctx.accounts.reserve_mint.key();
    let creator = ctx.accounts.bond.creator;

    let creator_fee_ledger = &mut ctx.accounts.creator_fee_ledger;
    creator_fee_ledger.init_if_new(creator, reserve_mint, ctx.bumps.creator_fee_ledger);
    creator_fee_ledger.credit(creator_fee)?;

    let protocol_fee_ledger = &mut ctx.accounts.protocol_fee_ledger;
    protocol_fee_ledger.init_if_new(
        ctx.accounts.registry.key(),
        reserve_mint,
        ctx.bumps.protocol_fee_ledger,
    );
    protocol_fee_ledger.credit(protocol_fee)?;

    // =========================================================================
    // Log Results
    // =========================================================================

    let new_supply = supply
        .checked_sub(tokens_in)
        .ok_or(CurveError::CorruptState)?;
    let reserve_balance = ctx.accounts.bond.reserve_balance;

    emit!(TokensSold {
        bond: ctx.accounts.bond.key(),
        seller: ctx.accounts.seller.key(),
        tokens_in,
        reserve_out: quote.reserve_out,
        creator_fee,
        protocol_fee,
        new_supply,
        reserve_balance,
    });

    msg!("Sell successful!");
    msg!("New supply: {}", new_supply);
    msg!("Bond reserve balance: {}", reserve_balance);

    Ok(quote)
}
