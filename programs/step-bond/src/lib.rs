// =============================================================================
// Step Bond - Step-Table Bonding Curve Protocol
// =============================================================================
//
// Step Bond issues SPL tokens whose price is set by a creator-defined step
// table instead of an order book or AMM pool:
// - Buyers pay a reserve asset and receive freshly minted supply
// - Sellers burn supply and receive reserve back along the same table
// - Every trade pays a fee, split 80% creator / 20% protocol, pulled later
//   from a fee ledger
//
// Supply, reserve held by each bond, and fees owed always balance exactly.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use math::*;
pub use state::*;

declare_id!("D68idM1YkZ3UTgcoqC5prUbwqBg913KD8xYRhyFJ4FjN");

/// The Step Bond program module
#[program]
pub mod step_bond {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the global registry (once per deployment)
    ///
    /// The signer becomes admin; `protocol_beneficiary` will withdraw the
    /// protocol's share of every fee.
    pub fn initialize_registry(ctx: Context<InitializeRegistry>) -> Result<()> {
        instructions::initialize_registry::handler_initialize_registry(ctx)
    }

    /// Create a new bonding curve and its token
    ///
    /// # Arguments
    /// * `params` - Step table, max supply, and buy/sell fee rates
    ///
    /// # Returns
    /// * The new bond id
    ///
    /// If the first step is priced at zero, its whole range is minted to the
    /// creator as a free allocation.
    pub fn create_curve(ctx: Context<CreateCurve>, params: CurveParams) -> Result<u64> {
        instructions::create_curve::handler_create_curve(ctx, params)
    }

    // =========================================================================
    // Trading
    // =========================================================================

    /// Buy tokens with an exact amount of reserve
    ///
    /// # Arguments
    /// * `reserve_in` - Reserve to pay, fees included (base units)
    /// * `min_tokens_out` - Slippage bound, fails below it
    pub fn buy(ctx: Context<Buy>, reserve_in: u64, min_tokens_out: u64) -> Result<BuyQuote> {
        instructions::buy::handler_buy(ctx, reserve_in, min_tokens_out)
    }

    /// Buy an exact amount of tokens
    ///
    /// # Arguments
    /// * `tokens_out` - Tokens to mint (base units)
    /// * `max_reserve_in` - Slippage bound, fails above it
    pub fn buy_exact_tokens(
        ctx: Context<Buy>,
        tokens_out: u64,
        max_reserve_in: u64,
    ) -> Result<BuyQuote> {
        instructions::buy::handler_buy_exact_tokens(ctx, tokens_out, max_reserve_in)
    }

    /// Sell an exact amount of tokens for reserve
    ///
    /// # Arguments
    /// * `tokens_in` - Tokens to burn (base units)
    /// * `min_reserve_out` - Slippage bound on reserve received after fees
    pub fn sell(ctx: Context<Sell>, tokens_in: u64, min_reserve_out: u64) -> Result<SellQuote> {
        instructions::sell::handler_sell(ctx, tokens_in, min_reserve_out)
    }

    // =========================================================================
    // Quotes (read-only)
    // =========================================================================

    pub fn quote_buy(ctx: Context<Quote>, reserve_in: u64) -> Result<BuyQuote> {
        instructions::quote::handler_quote_buy(ctx, reserve_in)
    }

    pub fn quote_reserve_for_tokens(ctx: Context<Quote>, tokens_out: u64) -> Result<BuyQuote> {
        instructions::quote::handler_quote_reserve_for_tokens(ctx, tokens_out)
    }

    pub fn quote_sell(ctx: Context<Quote>, tokens_in: u64) -> Result<SellQuote> {
        instructions::quote::handler_quote_sell(ctx, tokens_in)
    }

    pub fn quote_tokens_for_reserve(ctx: Context<Quote>, reserve_out: u64) -> Result<SellQuote> {
        instructions::quote::handler_quote_tokens_for_reserve(ctx, reserve_out)
    }

    pub fn spot_price(ctx: Context<Quote>) -> Result<u128> {
        instructions::quote::handler_spot_price(ctx)
    }

    // =========================================================================
    // Fees
    // =========================================================================

    /// Withdraw everything a fee ledger entry has accrued
    ///
    /// # Returns
    /// * The amount withdrawn; fails with NothingToWithdraw when zero
    pub fn withdraw_fees(ctx: Context<WithdrawFees>) -> Result<u64> {
        instructions::withdraw_fees::handler_withdraw_fees(ctx)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Change the protocol fee beneficiary (admin only)
    pub fn update_protocol_beneficiary(ctx: Context<UpdateProtocolBeneficiary>) -> Result<()> {
        instructions::admin::handler_update_protocol_beneficiary(ctx)
    }

    /// Transfer admin rights to a new address (admin only)
    ///
    /// # Warning
    /// * This is irreversible!
    pub fn transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
        instructions::admin::handler_transfer_admin(ctx)
    }
}
