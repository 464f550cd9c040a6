// =============================================================================
// Quote Instructions
// =============================================================================
// Read-only views of the curve at the mint's current supply. Results come
// back as instruction return data, so clients can simulate them without
// sending a transaction.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::*;
use crate::math::{BuyQuote, SellQuote};
use crate::state::Bond;

/// Accounts required for every quote instruction
#[derive(Accounts)]
pub struct Quote<'info> {
    #[account(
        seeds = [BOND_SEED, bond.bond_id.to_le_bytes().as_ref()],
        bump = bond.bump
    )]
    pub bond: Account<'info, Bond>,

    #[account(
        seeds = [TOKEN_MINT_SEED, bond.key().as_ref()],
        bump = bond.token_mint_bump
    )]
    pub token_mint: Account<'info, Mint>,
}

pub fn handler_quote_buy(ctx: Context<Quote>, reserve_in: u64) -> Result<BuyQuote> {
    let supply = ctx.accounts.token_mint.supply;
    ctx.accounts.bond.quote_buy(supply, reserve_in)
}

pub fn handler_quote_reserve_for_tokens(ctx: Context<Quote>, tokens_out: u64) -> Result<BuyQuote> {
    let supply = ctx.accounts.token_mint.supply;
    ctx.accounts.bond.quote_reserve_for_tokens(supply, tokens_out)
}

pub fn handler_quote_sell(ctx: Context<Quote>, tokens_in: u64) -> Result<SellQuote> {
    let supply = ctx.accounts.token_mint.supply;
    ctx.accounts.bond.quote_sell(supply, tokens_in)
}

pub fn handler_quote_tokens_for_reserve(
    ctx: Context<Quote>,
    reserve_out: u64,
) -> Result<SellQuote> {
    let supply = ctx.accounts.token_mint.supply;
    ctx.accounts.bond.quote_tokens_for_reserve(supply, reserve_out)
}

/// Price of the next unit to be minted, in reserve base units per whole
/// token
pub fn handler_spot_price(ctx: Context<Quote>) -> Result<u128> {
    let supply = ctx.accounts.token_mint.supply;
    let price = ctx.accounts.bond.spot_price(supply)?;

    msg!("Supply: {}, spot price: {}", supply, price);

    Ok(price)
}
