// =============================================================================
// Settlement Checks
// =============================================================================
// Guards shared by the trading handlers. Each one compares plain amounts or
// keys read from the accounts, so the handlers stay a straight sequence of
// quote, check, CPI, check.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::CurveError;

/// Exact-in trades: the trader gets at least `min_out`
pub fn check_min_out(out: u64, min_out: u64) -> Result<()> {
    require!(out >= min_out, CurveError::SlippageExceeded);
    Ok(())
}

/// Exact-out trades: the trader pays at most `max_in`
pub fn check_max_in(paid: u64, max_in: u64) -> Result<()> {
    require!(paid <= max_in, CurveError::SlippageExceeded);
    Ok(())
}

/// The paying account holds enough for the whole quote
pub fn check_funds(available: u64, needed: u64) -> Result<()> {
    require!(available >= needed, CurveError::AssetTransferFailed);
    Ok(())
}

/// A vault grew by exactly what was sent to it
pub fn check_vault_received(before: u64, after: u64, amount: u64) -> Result<()> {
    let expected = before
        .checked_add(amount)
        .ok_or(error!(CurveError::MathOverflow))?;
    require!(after == expected, CurveError::AssetTransferFailed);
    Ok(())
}

/// A vault shrank by exactly what was paid out of it
pub fn check_vault_paid(before: u64, after: u64, amount: u64) -> Result<()> {
    let expected = before
        .checked_sub(amount)
        .ok_or(error!(CurveError::CorruptState))?;
    require!(after == expected, CurveError::AssetTransferFailed);
    Ok(())
}

/// Only the holder of a token account may burn from it
pub fn check_burn_authority(token_owner: Pubkey, seller: Pubkey) -> Result<()> {
    require!(token_owner == seller, CurveError::BurnNotAuthorized);
    Ok(())
}
