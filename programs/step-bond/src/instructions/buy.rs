// =============================================================================
// Buy Instructions
// =============================================================================
// Mint curve tokens against reserve, in two flavors sharing one account set:
//
// - buy:              exact reserve in, at least `min_tokens_out` out
// - buy_exact_tokens: exact tokens out, at most `max_reserve_in` in
//
// Flow:
// 1. Quote against the mint's current supply
// 2. Check slippage and the buyer's reserve balance
// 3. Transfer net reserve to the reserve vault and fees to the fee vault,
//    then verify both vault deltas
// 4. Update the bond's reserve balance and credit both fee ledgers
// 5. Mint tokens to the buyer
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::CurveError;
use crate::events::TokensBought;
use crate::instructions::checks::{
    check_funds, check_max_in, check_min_out, check_vault_received,
};
use crate::math::BuyQuote;
use crate::state::{Bond, FeeLedger, Registry};

/// Accounts required for buy and buy_exact_tokens
#[derive(Accounts)]
pub struct Buy<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// Pays reserve, receives tokens, and pays rent for new ledger entries
    #[account(mut)]
    pub buyer: Signer<'info>,

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

    /// Curve token; its supply is the curve's current supply
    #[account(
        mut,
        seeds = [TOKEN_MINT_SEED, bond.key().as_ref()],
        bump = bond.token_mint_bump
    )]
    pub token_mint: Account<'info, Mint>,

    /// Creator's fee entry for this reserve mint
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + FeeLedger::INIT_SPACE,
        seeds = [FEE_LEDGER_SEED, reserve_mint.key().as_ref(), bond.creator.as_ref()],
        bump
    )]
    pub creator_fee_ledger: Account<'info, FeeLedger>,

    /// Protocol's fee entry for this reserve mint
    #[account(
        init_if_needed,
        payer = buyer,
        space = 8 + FeeLedger::INIT_SPACE,
        seeds = [FEE_LEDGER_SEED, reserve_mint.key().as_ref(), registry.key().as_ref()],
        bump
    )]
    pub protocol_fee_ledger: Account<'info, FeeLedger>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Buyer's reserve account (source of payment)
    #[account(
        mut,
        constraint = buyer_reserve_account.mint == reserve_mint.key() @ CurveError::InvalidReserveMint,
        constraint = buyer_reserve_account.owner == buyer.key() @ CurveError::InvalidTokenAccountOwner
    )]
    pub buyer_reserve_account: Account<'info, TokenAccount>,

    /// Buyer's curve token account (destination for minted tokens)
    #[account(
        mut,
        constraint = buyer_token_account.mint == token_mint.key() @ CurveError::InvalidTokenMint,
        constraint = buyer_token_account.owner == buyer.key() @ CurveError::InvalidTokenAccountOwner
    )]
    pub buyer_token_account: Account<'info, TokenAccount>,

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

/// Handler for buy (exact reserve in)
///
/// # Arguments
/// * `reserve_in` - Reserve the buyer pays, fees included
/// * `min_tokens_out` - Fewest tokens the buyer accepts
pub fn handler_buy(ctx: Context<Buy>, reserve_in: u64, min_tokens_out: u64) -> Result<BuyQuote> {
    let supply = ctx.accounts.token_mint.supply;
    let quote = ctx.accounts.bond.quote_buy(supply, reserve_in)?;

    check_min_out(quote.tokens_out, min_tokens_out)?;

    settle_buy(ctx, quote)
}

/// Handler for buy_exact_tokens (exact tokens out)
///
/// # Arguments
/// * `tokens_out` - Tokens to mint
/// * `max_reserve_in` - Most reserve the buyer pays, fees included
pub fn handler_buy_exact_tokens(
    ctx: Context<Buy>,
    tokens_out: u64,
    max_reserve_in: u64,
) -> Result<BuyQuote> {
    let supply = ctx.accounts.token_mint.supply;
    let quote = ctx
        .accounts
        .bond
        .quote_reserve_for_tokens(supply, tokens_out)?;

    check_max_in(quote.reserve_in, max_reserve_in)?;

    settle_buy(ctx, quote)
}

/// Move value for a quoted buy and update bookkeeping
fn settle_buy(ctx: Context<Buy>, quote: BuyQuote) -> Result<BuyQuote> {
    let protocol_fee = quote.fees.protocol_fee;
    let creator_fee = quote.fees.creator_fee;
    let fee_total = quote.fees.total()?;

    check_funds(ctx.accounts.buyer_reserve_account.amount, quote.reserve_in)?;

    msg!(
        "Buying {} tokens for {} reserve (fees: creator {}, protocol {})",
        quote.tokens_out,
        quote.reserve_in,
        creator_fee,
        protocol_fee
    );

    // =========================================================================
    // Transfer Reserve: Buyer -> Reserve Vault, Buyer -> Fee Vault
    // =========================================================================

    let vault_before = ctx.accounts.reserve_vault.amount;
    let fee_vault_before = ctx.accounts.fee_vault.amount;

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.buyer_reserve_account.to_account_info(),
            to: ctx.accounts.reserve_vault.to_account_info(),
            authority: ctx.accounts.buyer.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, quote.net_reserve)?;

    if fee_total > 0 {
        let fee_ctx = CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer_reserve_account.to_account_info(),
                to: ctx.accounts.fee_vault.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        );
        token::transfer(fee_ctx, fee_total)?;
    }

    // Each vault must have grown by exactly what was sent to it
    ctx.accounts.reserve_vault.reload()?;
    ctx.accounts.fee_vault.reload()?;

    check_vault_received(vault_before, ctx.accounts.reserve_vault.amount, quote.net_reserve)?;
    check_vault_received(fee_vault_before, ctx.accounts.fee_vault.amount, fee_total)?;

    // =========================================================================
    // Update Bookkeeping
    // =========================================================================

    let bond = &mut ctx.accounts.bond;
    bond.record_buy(&quote)?;

    let reserve_mint = ctx.accounts.reserve_mint.key();

    let creator_fee_ledger = &mut ctx.accounts.creator_fee_ledger;
    creator_fee_ledger.init_if_new(bond.creator, reserve_mint, ctx.bumps.creator_fee_ledger);
    creator_fee_ledger.credit(creator_fee)?;

    let protocol_fee_ledger = &mut ctx.accounts.protocol_fee_ledger;
    protocol_fee_ledger.init_if_new(
        ctx.accounts.registry.key(),
        reserve_mint,
        ctx.bumps.protocol_fee_ledger,
    );
    protocol_fee_ledger.credit(protocol_fee)?;

    let reserve_balance = bond.reserve_balance;

    // =========================================================================
    // Mint Tokens: Bond -> Buyer
    // =========================================================================

    let bond_id_bytes = ctx.accounts.bond.bond_id.to_le_bytes();
    let bond_seeds = &[
        BOND_SEED,
        bond_id_bytes.as_ref(),
        &[ctx.accounts.bond.bump],
    ];
    let signer_seeds = &[&bond_seeds[..]];

    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.token_mint.to_account_info(),
            to: ctx.accounts.buyer_token_account.to_account_info(),
            authority: ctx.accounts.bond.to_account_info(),
        },
        signer_seeds,
    );
    token::mint_to(mint_ctx, quote.tokens_out)?;

    // =========================================================================
    // Log Results
    // =========================================================================

    let new_supply = ctx
        .accounts
        .token_mint
        .supply
        .checked_add(quote.tokens_out)
        .ok_or(CurveError::MathOverflow)?;

    emit!(TokensBought {
        bond: ctx.accounts.bond.key(),
        buyer: ctx.accounts.buyer.key(),
        reserve_in: quote.reserve_in,
        tokens_out: quote.tokens_out,
        creator_fee,
        protocol_fee,
        new_supply,
        reserve_balance,
    });

    msg!("Buy successful!");
    msg!("New supply: {}", new_supply);
    msg!("Bond reserve balance: {}", reserve_balance);

    Ok(quote)
}
