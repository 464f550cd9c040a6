// =============================================================================
// Bond State Account
// =============================================================================
// One Bond per curve. It owns the token mint (mint authority) and the reserve
// vault (token account authority), keeps the immutable step table and fees,
// and tracks the reserve balance backing the outstanding supply.
//
// Supply is not stored here: the token mint's supply is the single source of
// truth, and every quote is computed against it.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::CurveError;
use crate::math::curve::{self, BuyQuote, SellQuote};
use crate::state::Step;

/// A step-table bonding curve.
///
/// PDA derived from ["bond", bond_id.to_le_bytes()].
#[account]
#[derive(Default)]
pub struct Bond {
    // =========================================================================
    // Identification
    // =========================================================================

    /// Position of this bond in the registry
    pub bond_id: u64,

    /// Wallet that created the curve and earns the creator fee
    pub creator: Pubkey,

    /// SPL mint of the reserve asset buyers pay in
    pub reserve_mint: Pubkey,

    /// SPL mint of the curve token (PDA, authority = this bond)
    pub token_mint: Pubkey,

    /// Token account holding the reserve balance (PDA, authority = this bond)
    pub reserve_vault: Pubkey,

    // =========================================================================
    // Curve Configuration (fixed at creation)
    // =========================================================================

    /// Hard cap on supply; equal to the last step's range_to
    pub max_supply: u64,

    /// Fee charged on the reserve a buyer pays
    pub buy_fee_bps: u16,

    /// Fee charged on the reserve a seller receives
    pub sell_fee_bps: u16,

    // =========================================================================
    // Financial State
    // =========================================================================

    /// Reserve held against the outstanding supply (fees excluded)
    pub reserve_balance: u64,

    /// Unix timestamp of creation
    pub created_at: i64,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub token_mint_bump: u8,
    pub reserve_vault_bump: u8,

    /// The step table, validated at creation
    pub steps: Vec<Step>,
}

impl Bond {
    /// Account size for a table of `step_count` steps
    ///
    /// discriminator (8) + bond_id (8) + 4 pubkeys (128) + max_supply (8)
    /// + fees (4) + reserve_balance (8) + created_at (8) + bumps (3)
    /// + vec length prefix (4) + steps
    pub fn space(step_count: usize) -> usize {
        8 + 8 + 32 * 4 + 8 + 2 + 2 + 8 + 8 + 3 + 4 + step_count * Step::SIZE
    }

    /// Size of the free range minted to the creator at creation
    ///
    /// Non-zero only when the first step is priced at zero.
    pub fn free_allocation(&self) -> u64 {
        match self.steps.first() {
            Some(step) if step.price == 0 => step.range_to,
            _ => 0,
        }
    }

    pub fn spot_price(&self, supply: u64) -> Result<u128> {
        curve::spot_price(&self.steps, supply)
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    pub fn quote_buy(&self, supply: u64, reserve_in: u64) -> Result<BuyQuote> {
        curve::quote_buy(&self.steps, supply, reserve_in, self.buy_fee_bps)
    }

    pub fn quote_reserve_for_tokens(&self, supply: u64, tokens_out: u64) -> Result<BuyQuote> {
        curve::quote_reserve_for_tokens(&self.steps, supply, tokens_out, self.buy_fee_bps)
    }

    pub fn quote_sell(&self, supply: u64, tokens_in: u64) -> Result<SellQuote> {
        curve::quote_sell(&self.steps, supply, tokens_in, self.sell_fee_bps)
    }

    pub fn quote_tokens_for_reserve(&self, supply: u64, reserve_out: u64) -> Result<SellQuote> {
        curve::quote_tokens_for_reserve(&self.steps, supply, reserve_out, self.sell_fee_bps)
    }

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    /// Add the net (post-fee) reserve of a buy
    pub fn record_buy(&mut self, quote: &BuyQuote) -> Result<()> {
        self.reserve_balance = self
            .reserve_balance
            .checked_add(quote.net_reserve)
            .ok_or(error!(CurveError::MathOverflow))?;
        Ok(())
    }

    /// Remove the gross (pre-fee) reserve of a sell
    ///
    /// The balance always covers a correctly priced sell, so an underflow
    /// means the balance and the supply have diverged.
    pub fn record_sell(&mut self, quote: &SellQuote) -> Result<()> {
        self.reserve_balance = self
            .reserve_balance
            .checked_sub(quote.gross_reserve)
            .ok_or(error!(CurveError::CorruptState))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_STEPS, PRICE_SCALE};

    const WHOLE: u64 = PRICE_SCALE as u64;

    fn bond(steps: Vec<Step>, buy_fee_bps: u16, sell_fee_bps: u16) -> Bond {
        Bond {
            max_supply: steps.last().map(|s| s.range_to).unwrap_or(0),
            buy_fee_bps,
            sell_fee_bps,
            steps,
            ..Default::default()
        }
    }

    #[test]
    fn test_space_fits_single_allocation() {
        assert!(Bond::space(MAX_STEPS) <= 10 * 1024);
        assert_eq!(Bond::space(0), 179);
    }

    #[test]
    fn test_free_allocation() {
        let free = bond(vec![Step::new(5 * WHOLE, 0), Step::new(10 * WHOLE, 1)], 0, 0);
        assert_eq!(free.free_allocation(), 5 * WHOLE);

        let paid = bond(vec![Step::new(10 * WHOLE, 1)], 0, 0);
        assert_eq!(paid.free_allocation(), 0);
    }

    #[test]
    fn test_buy_then_sell_balance_tracks_supply() {
        let mut b = bond(
            vec![Step::new(10 * WHOLE, PRICE_SCALE), Step::new(20 * WHOLE, 2 * PRICE_SCALE)],
            100,
            100,
        );

        let buy = b.quote_buy(0, 15 * WHOLE).unwrap();
        b.record_buy(&buy).unwrap();
        assert_eq!(b.reserve_balance, buy.net_reserve);

        // Selling everything back drains at most what the buy put in
        let sell = b.quote_sell(buy.tokens_out, buy.tokens_out).unwrap();
        b.record_sell(&sell).unwrap();
        assert!(sell.gross_reserve <= buy.net_reserve);
        assert_eq!(b.reserve_balance, buy.net_reserve - sell.gross_reserve);
    }

    #[test]
    fn test_sell_beyond_balance_is_corrupt_state() {
        let mut b = bond(vec![Step::new(10 * WHOLE, PRICE_SCALE)], 0, 0);
        let sell = b.quote_sell(WHOLE, WHOLE).unwrap();

        let err = b.record_sell(&sell).unwrap_err();
        assert_eq!(err, CurveError::CorruptState.into());
    }

    #[test]
    fn test_quotes_use_their_own_fee() {
        let b = bond(vec![Step::new(100 * WHOLE, PRICE_SCALE)], 0, 1_000);

        let buy = b.quote_buy(0, 10 * WHOLE).unwrap();
        assert_eq!(buy.fees.total().unwrap(), 0);

        let sell = b.quote_sell(buy.tokens_out, buy.tokens_out).unwrap();
        assert_eq!(sell.fees.total().unwrap(), WHOLE);
        assert_eq!(sell.reserve_out, 9 * WHOLE);
    }
}
