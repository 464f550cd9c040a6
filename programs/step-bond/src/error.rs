// =============================================================================
// Step Bond Error Codes
// =============================================================================
// Anchor assigns codes from 6000 upward in declaration order.
// =============================================================================

use anchor_lang::prelude::*;

/// All errors the Step Bond program can return.
///
/// Validation and economic errors are reported to the caller, who may
/// resubmit with new parameters. `CorruptState` means an invariant established
/// at curve creation no longer holds; it aborts the transaction.
#[error_code]
pub enum CurveError {
    // =========================================================================
    // Input Validation Errors
    // =========================================================================

    /// Step table is empty, too long, not strictly increasing, has a zero
    /// bound, or does not end at the declared max supply
    #[msg("Invalid step table")]
    InvalidSteps,

    /// Buy or sell fee above MAX_FEE_BPS
    #[msg("Fee rate exceeds maximum allowed")]
    InvalidFeeRate,

    /// Trying to trade or quote 0 units
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Invalid reserve mint for this bond")]
    InvalidReserveMint,

    #[msg("Invalid token mint for this bond")]
    InvalidTokenMint,

    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,

    // =========================================================================
    // Economic Errors
    // =========================================================================

    /// Quoted output fell outside the caller's bound
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,

    /// Trade would mint past the last step of the table
    #[msg("Trade exceeds the curve's max supply")]
    ExceedsMaxSupply,

    /// Trade would burn more than the circulating supply
    #[msg("Insufficient supply on the curve")]
    InsufficientSupply,

    /// Trade is too small to move a single base unit after rounding
    #[msg("Trade output rounds to zero")]
    ZeroOutput,

    // =========================================================================
    // Collaborator Errors
    // =========================================================================

    /// Reserve transfer could not be funded or the vault delta did not match
    #[msg("Reserve asset transfer failed")]
    AssetTransferFailed,

    /// Seller does not control the token account to burn from
    #[msg("Burn not authorized for this token account")]
    BurnNotAuthorized,

    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    // =========================================================================
    // Fee Ledger Errors
    // =========================================================================

    #[msg("No accrued fees to withdraw")]
    NothingToWithdraw,

    // =========================================================================
    // Authorization Errors
    // =========================================================================

    #[msg("Only admin can perform this action")]
    AdminOnly,

    /// Signer may not withdraw from this fee ledger entry
    #[msg("Signer is not the beneficiary of this fee ledger")]
    Unauthorized,

    #[msg("Invalid address")]
    InvalidAddress,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Fatal
    // =========================================================================

    /// Supply or reserve bookkeeping disagrees with the step table
    #[msg("Curve state is corrupt")]
    CorruptState,
}
