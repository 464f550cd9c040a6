//! Step-table curve math.
//!
//! Every quote is built on [`walk`], which moves along the table from the
//! current supply in one direction until a token count or a reserve amount is
//! reached. Rounding always favors the curve:
//!
//! | direction | reserve          | tokens           |
//! |-----------|------------------|------------------|
//! | Up (buy)  | paid in, ceil    | paid out, floor  |
//! | Down (sell) | paid out, floor | taken in, ceil  |
//!
//! so no buy/sell sequence can pull more reserve out than was put in.

use anchor_lang::prelude::*;

use crate::constants::PRICE_SCALE;
use crate::error::CurveError;
use crate::math::fees::{gross_for_net, net_of_fee, FeeSplit};
use crate::math::fixed::{mul_div_ceil, mul_div_floor, to_u64};
use crate::state::Step;

/// Which way a walk moves supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward max supply (minting)
    Up,
    /// Toward zero supply (burning)
    Down,
}

/// What stops a walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
    /// Stop once this much reserve has been spent (Up) or raised (Down)
    Reserve(u128),
    /// Stop once this many tokens have been minted (Up) or burned (Down)
    Tokens(u128),
}

/// Totals accumulated by a walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Walk {
    pub tokens: u128,
    pub reserve: u128,
}

/// Amounts for a buy. `reserve_in` is what the buyer pays, `net_reserve` is
/// what the bond's reserve balance grows by.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuyQuote {
    pub tokens_out: u64,
    pub reserve_in: u64,
    pub net_reserve: u64,
    pub fees: FeeSplit,
}

/// Amounts for a sell. `gross_reserve` leaves the bond's reserve balance,
/// `reserve_out` is what the seller receives after fees.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SellQuote {
    pub tokens_in: u64,
    pub gross_reserve: u64,
    pub reserve_out: u64,
    pub fees: FeeSplit,
}

/// Smallest index `i` with `supply <= steps[i].range_to`
///
/// Supply beyond the last step can only mean bookkeeping broke somewhere
/// else, so it is reported as `CorruptState`.
pub fn locate_step(steps: &[Step], supply: u64) -> Result<usize> {
    steps
        .iter()
        .position(|step| supply <= step.range_to)
        .ok_or(error!(CurveError::CorruptState))
}

/// Last range_to of the table
pub fn max_supply(steps: &[Step]) -> Result<u64> {
    steps
        .last()
        .map(|step| step.range_to)
        .ok_or(error!(CurveError::CorruptState))
}

/// Price of the next unit to be minted at `supply`
///
/// At max supply this is the last step's price. Non-decreasing in `supply`.
pub fn spot_price(steps: &[Step], supply: u64) -> Result<u128> {
    let index = locate_step(steps, supply)?;
    let step = steps[index];
    if supply == step.range_to && index + 1 < steps.len() {
        return Ok(steps[index + 1].price);
    }
    Ok(step.price)
}

fn step_start(steps: &[Step], index: usize) -> u128 {
    if index == 0 {
        0
    } else {
        steps[index - 1].range_to as u128
    }
}

/// Reserve worth of `tokens` at `price`, rounded toward the curve
fn reserve_for(tokens: u128, price: u128, direction: Direction) -> Result<u128> {
    match direction {
        Direction::Up => mul_div_ceil(tokens, price, PRICE_SCALE),
        Direction::Down => mul_div_floor(tokens, price, PRICE_SCALE),
    }
}

/// Tokens worth `reserve` at a non-zero `price`, rounded toward the curve
fn tokens_for(reserve: u128, price: u128, direction: Direction) -> Result<u128> {
    match direction {
        Direction::Up => mul_div_floor(reserve, PRICE_SCALE, price),
        Direction::Down => mul_div_ceil(reserve, PRICE_SCALE, price),
    }
}

/// Walk the table from `supply` until `limit` is met
///
/// Visits at most `steps.len()` steps. Fails with `ExceedsMaxSupply` when an
/// upward walk runs off the end of the table, and `InsufficientSupply` when a
/// downward walk runs past zero supply.
pub fn walk(steps: &[Step], supply: u64, direction: Direction, limit: Limit) -> Result<Walk> {
    let mut index = locate_step(steps, supply)?;
    let mut position = supply as u128;
    let mut walked = Walk::default();
    let mut remaining = match limit {
        Limit::Reserve(amount) | Limit::Tokens(amount) => amount,
    };

    while remaining > 0 {
        let step = steps[index];

        // Units of this step still reachable in the walk direction
        let available = match direction {
            Direction::Up => (step.range_to as u128)
                .checked_sub(position)
                .ok_or(error!(CurveError::CorruptState))?,
            Direction::Down => position
                .checked_sub(step_start(steps, index))
                .ok_or(error!(CurveError::CorruptState))?,
        };

        let (tokens, reserve, used) = match limit {
            Limit::Tokens(_) => {
                let take = remaining.min(available);
                (take, reserve_for(take, step.price, direction)?, take)
            }
            Limit::Reserve(_) => {
                let whole_step = reserve_for(available, step.price, direction)?;
                let covers_step = match direction {
                    Direction::Up => remaining >= whole_step,
                    Direction::Down => remaining > whole_step,
                };

                if covers_step {
                    (available, whole_step, whole_step)
                } else {
                    // remaining < whole_step here, so step.price is non-zero
                    let take = tokens_for(remaining, step.price, direction)?;
                    match direction {
                        // Unspendable dust stays with the curve
                        Direction::Up => (take, remaining, remaining),
                        Direction::Down => (take, reserve_for(take, step.price, direction)?, remaining),
                    }
                }
            }
        };

        walked.tokens = walked.tokens.checked_add(tokens).ok_or(error!(CurveError::MathOverflow))?;
        walked.reserve = walked.reserve.checked_add(reserve).ok_or(error!(CurveError::MathOverflow))?;
        remaining -= used;
        position = match direction {
            Direction::Up => position + tokens,
            Direction::Down => position - tokens,
        };

        if remaining == 0 {
            break;
        }

        match direction {
            Direction::Up => {
                index += 1;
                if index == steps.len() {
                    return err!(CurveError::ExceedsMaxSupply);
                }
            }
            Direction::Down => {
                if index == 0 {
                    return err!(CurveError::InsufficientSupply);
                }
                index -= 1;
            }
        }
    }

    Ok(walked)
}

/// Tokens minted for exactly `reserve_in` of reserve (exact-in buy)
pub fn quote_buy(steps: &[Step], supply: u64, reserve_in: u64, fee_bps: u16) -> Result<BuyQuote> {
    require!(reserve_in > 0, CurveError::InvalidAmount);
    locate_step(steps, supply)?;
    require!(supply < max_supply(steps)?, CurveError::ExceedsMaxSupply);

    let (net_reserve, fees) = net_of_fee(reserve_in, fee_bps)?;
    let walked = walk(steps, supply, Direction::Up, Limit::Reserve(net_reserve as u128))?;

    let tokens_out = to_u64(walked.tokens)?;
    require!(tokens_out > 0, CurveError::ZeroOutput);

    Ok(BuyQuote {
        tokens_out,
        reserve_in,
        net_reserve,
        fees,
    })
}

/// Reserve needed to mint exactly `tokens_out` (exact-out buy)
///
/// The returned `reserve_in` covers the step costs plus the fee on itself.
pub fn quote_reserve_for_tokens(
    steps: &[Step],
    supply: u64,
    tokens_out: u64,
    fee_bps: u16,
) -> Result<BuyQuote> {
    require!(tokens_out > 0, CurveError::InvalidAmount);

    let walked = walk(steps, supply, Direction::Up, Limit::Tokens(tokens_out as u128))?;
    let cost = to_u64(walked.reserve)?;

    let reserve_in = gross_for_net(cost, fee_bps)?;
    let (net_reserve, fees) = net_of_fee(reserve_in, fee_bps)?;

    Ok(BuyQuote {
        tokens_out,
        reserve_in,
        net_reserve,
        fees,
    })
}

/// Reserve paid for burning exactly `tokens_in` (exact-in sell)
pub fn quote_sell(steps: &[Step], supply: u64, tokens_in: u64, fee_bps: u16) -> Result<SellQuote> {
    require!(tokens_in > 0, CurveError::InvalidAmount);
    require!(tokens_in <= supply, CurveError::InsufficientSupply);

    let walked = walk(steps, supply, Direction::Down, Limit::Tokens(tokens_in as u128))?;
    let gross_reserve = to_u64(walked.reserve)?;

    // Only tokens from a free first step may be burned for nothing
    let within_free_range = steps
        .first()
        .is_some_and(|first| first.price == 0 && supply <= first.range_to);
    require!(gross_reserve > 0 || within_free_range, CurveError::ZeroOutput);

    let (reserve_out, fees) = net_of_fee(gross_reserve, fee_bps)?;

    Ok(SellQuote {
        tokens_in,
        gross_reserve,
        reserve_out,
        fees,
    })
}

/// Tokens to burn so the seller receives at least `reserve_out` after fees
/// (exact-out sell)
pub fn quote_tokens_for_reserve(
    steps: &[Step],
    supply: u64,
    reserve_out: u64,
    fee_bps: u16,
) -> Result<SellQuote> {
    require!(reserve_out > 0, CurveError::InvalidAmount);

    let target = gross_for_net(reserve_out, fee_bps)?;
    let walked = walk(steps, supply, Direction::Down, Limit::Reserve(target as u128))?;

    let gross_reserve = to_u64(walked.reserve)?;
    let (net_out, fees) = net_of_fee(gross_reserve, fee_bps)?;

    Ok(SellQuote {
        tokens_in: to_u64(walked.tokens)?,
        gross_reserve,
        reserve_out: net_out,
        fees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHOLE: u64 = PRICE_SCALE as u64;

    /// 6 free tokens, then 4 tokens at 1.0 reserve (scaled to 10^9 units)
    fn free_then_flat() -> Vec<Step> {
        vec![Step::new(6 * WHOLE, 0), Step::new(10 * WHOLE, PRICE_SCALE)]
    }

    /// Three priced steps: 100 @ 1, 200 @ 2, 300 @ 5 (whole tokens, whole reserve)
    fn three_steps() -> Vec<Step> {
        vec![
            Step::new(100 * WHOLE, 1_000_000_000),
            Step::new(300 * WHOLE, 2_000_000_000),
            Step::new(600 * WHOLE, 5_000_000_000),
        ]
    }

    #[test]
    fn test_locate_step_boundaries() {
        let steps = three_steps();
        assert_eq!(locate_step(&steps, 0).unwrap(), 0);
        assert_eq!(locate_step(&steps, 100 * WHOLE).unwrap(), 0);
        assert_eq!(locate_step(&steps, 100 * WHOLE + 1).unwrap(), 1);
        assert_eq!(locate_step(&steps, 600 * WHOLE).unwrap(), 2);
    }

    #[test]
    fn test_locate_step_past_max_is_corrupt() {
        let err = locate_step(&three_steps(), 600 * WHOLE + 1).unwrap_err();
        assert_eq!(err, CurveError::CorruptState.into());
    }

    #[test]
    fn test_buy_within_one_step() {
        // 50 reserve at price 1 buys 50 tokens from zero supply
        let quote = quote_buy(&three_steps(), 0, 50 * WHOLE, 0).unwrap();
        assert_eq!(quote.tokens_out, 50 * WHOLE);
        assert_eq!(quote.net_reserve, 50 * WHOLE);
    }

    #[test]
    fn test_buy_crosses_steps() {
        // 100 reserve fills step 0, 100 more buys 50 tokens at price 2
        let quote = quote_buy(&three_steps(), 0, 200 * WHOLE, 0).unwrap();
        assert_eq!(quote.tokens_out, 150 * WHOLE);
    }

    #[test]
    fn test_buy_floors_partial_tokens() {
        // 3 reserve units at price 2.0 buy 1.5 base units -> floor to 1
        let steps = vec![Step::new(10 * WHOLE, 2_000_000_000)];
        let walked = walk(&steps, 0, Direction::Up, Limit::Reserve(3)).unwrap();
        assert_eq!(walked.tokens, 1);
        // The leftover unit stays with the curve
        assert_eq!(walked.reserve, 3);
    }

    #[test]
    fn test_sell_floors_reserve() {
        // 3 base units at price 0.5 are worth 1.5 reserve units -> floor to 1
        let steps = vec![Step::new(10 * WHOLE, 500_000_000)];
        let quote = quote_sell(&steps, 10, 3, 0).unwrap();
        assert_eq!(quote.gross_reserve, 1);
    }

    #[test]
    fn test_dust_sell_in_priced_step_is_rejected() {
        // 1 base unit at price 0.5 is worth half a reserve unit -> nothing
        let steps = vec![Step::new(10 * WHOLE, 500_000_000)];
        let err = quote_sell(&steps, 10, 1, 0).unwrap_err();
        assert_eq!(err, CurveError::ZeroOutput.into());

        // Two units are worth exactly one
        assert_eq!(quote_sell(&steps, 10, 2, 0).unwrap().gross_reserve, 1);
    }

    #[test]
    fn test_free_range_sells_for_nothing() {
        let steps = vec![Step::new(5 * WHOLE, 0), Step::new(10 * WHOLE, PRICE_SCALE / 2)];
        let quote = quote_sell(&steps, 5 * WHOLE, 3 * WHOLE, 100).unwrap();
        assert_eq!(quote.gross_reserve, 0);
        assert_eq!(quote.reserve_out, 0);
        assert_eq!(quote.fees.total().unwrap(), 0);

        // A dust sell starting above the free range is still priced
        let err = quote_sell(&steps, 5 * WHOLE + 1, 1, 0).unwrap_err();
        assert_eq!(err, CurveError::ZeroOutput.into());
    }

    #[test]
    fn test_sell_crosses_steps_down() {
        // From 150 tokens: 50 at price 2 (100 reserve) then 50 at price 1 (50 reserve)
        let quote = quote_sell(&three_steps(), 150 * WHOLE, 100 * WHOLE, 0).unwrap();
        assert_eq!(quote.gross_reserve, 150 * WHOLE);
        assert_eq!(quote.reserve_out, 150 * WHOLE);
    }

    #[test]
    fn test_sell_more_than_supply_fails() {
        let err = quote_sell(&three_steps(), 10, 11, 0).unwrap_err();
        assert_eq!(err, CurveError::InsufficientSupply.into());
    }

    #[test]
    fn test_buy_past_max_supply_fails() {
        // Whole curve costs 100 + 400 + 1500 = 2000 reserve
        let steps = three_steps();
        let quote = quote_buy(&steps, 0, 2_000 * WHOLE, 0).unwrap();
        assert_eq!(quote.tokens_out, 600 * WHOLE);

        let err = quote_buy(&steps, 0, 2_000 * WHOLE + 1, 0).unwrap_err();
        assert_eq!(err, CurveError::ExceedsMaxSupply.into());
    }

    #[test]
    fn test_buy_at_max_supply_fails() {
        let err = quote_buy(&three_steps(), 600 * WHOLE, 1, 0).unwrap_err();
        assert_eq!(err, CurveError::ExceedsMaxSupply.into());
    }

    #[test]
    fn test_dust_buy_rounds_to_zero() {
        // 1 reserve unit at price 5.0 buys 0.2 base units
        let err = quote_buy(&three_steps(), 300 * WHOLE, 1, 0).unwrap_err();
        assert_eq!(err, CurveError::ZeroOutput.into());
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let steps = three_steps();
        let invalid: anchor_lang::error::Error = CurveError::InvalidAmount.into();
        assert_eq!(quote_buy(&steps, 0, 0, 0).unwrap_err(), invalid);
        assert_eq!(quote_sell(&steps, 10, 0, 0).unwrap_err(), invalid);
        assert_eq!(quote_reserve_for_tokens(&steps, 0, 0, 0).unwrap_err(), invalid);
        assert_eq!(quote_tokens_for_reserve(&steps, 10, 0, 0).unwrap_err(), invalid);
    }

    #[test]
    fn test_reserve_for_tokens_rounds_up() {
        // 1 base unit at price 0.5 costs 0.5 reserve units -> ceil to 1
        let steps = vec![Step::new(10 * WHOLE, 500_000_000)];
        let quote = quote_reserve_for_tokens(&steps, 0, 1, 0).unwrap();
        assert_eq!(quote.reserve_in, 1);
    }

    #[test]
    fn test_reserve_for_tokens_includes_fee() {
        // 100 tokens at price 1 cost 100 reserve net; 1% fee on top
        let quote = quote_reserve_for_tokens(&three_steps(), 0, 100 * WHOLE, 100).unwrap();
        assert!(quote.net_reserve >= 100 * WHOLE);
        assert_eq!(
            quote.reserve_in,
            quote.net_reserve + quote.fees.total().unwrap()
        );

        // Spending that gross exact-in buys at least the same tokens
        let exact_in = quote_buy(&three_steps(), 0, quote.reserve_in, 100).unwrap();
        assert!(exact_in.tokens_out >= 100 * WHOLE);
    }

    #[test]
    fn test_tokens_for_reserve_matches_sell() {
        let steps = three_steps();
        let supply = 450 * WHOLE;
        let wanted = 123 * WHOLE + 456;

        let quote = quote_tokens_for_reserve(&steps, supply, wanted, 250).unwrap();
        assert!(quote.reserve_out >= wanted);

        // Selling the quoted tokens exact-in gives the identical result
        let sell = quote_sell(&steps, supply, quote.tokens_in, 250).unwrap();
        assert_eq!(sell, quote);

        // One token fewer would not raise the target
        let short = quote_sell(&steps, supply, quote.tokens_in - 1, 250).unwrap();
        assert!(short.reserve_out < wanted);
    }

    #[test]
    fn test_tokens_for_unreachable_reserve_fails() {
        // 150 tokens in circulation are worth 200 reserve in total
        let err = quote_tokens_for_reserve(&three_steps(), 150 * WHOLE, 201 * WHOLE, 0).unwrap_err();
        assert_eq!(err, CurveError::InsufficientSupply.into());
    }

    #[test]
    fn test_free_range_scenario() {
        let steps = free_then_flat();
        let supply = 6 * WHOLE; // creator's free allocation

        // Reserve sufficient for exactly 4 tokens at 1.0, fee included
        let fee_bps = 100;
        let cost = quote_reserve_for_tokens(&steps, supply, 4 * WHOLE, fee_bps).unwrap();
        let buy = quote_buy(&steps, supply, cost.reserve_in, fee_bps).unwrap();
        assert_eq!(buy.tokens_out, 4 * WHOLE);
        let supply = supply + buy.tokens_out;
        assert_eq!(supply, 10 * WHOLE);

        // Curve is full
        let err = quote_buy(&steps, supply, 1_000, fee_bps).unwrap_err();
        assert_eq!(err, CurveError::ExceedsMaxSupply.into());

        // Selling the 4 tokens back returns the net reserve minus a second fee
        let sell = quote_sell(&steps, supply, 4 * WHOLE, fee_bps).unwrap();
        assert_eq!(sell.gross_reserve, 4 * WHOLE);
        assert!(sell.gross_reserve <= buy.net_reserve);
        assert_eq!(sell.reserve_out, sell.gross_reserve - sell.fees.total().unwrap());
        assert_eq!(
            sell.reserve_out,
            buy.reserve_in - buy.fees.total().unwrap() - sell.fees.total().unwrap()
        );
    }

    #[test]
    fn test_free_range_is_free_to_sell_into() {
        // Selling into the free range releases no reserve for those units
        let steps = free_then_flat();
        let quote = quote_sell(&steps, 8 * WHOLE, 4 * WHOLE, 0).unwrap();
        assert_eq!(quote.gross_reserve, 2 * WHOLE);
    }

    #[test]
    fn test_spot_price_steps_up_at_boundaries() {
        let steps = three_steps();
        assert_eq!(spot_price(&steps, 0).unwrap(), 1_000_000_000);
        assert_eq!(spot_price(&steps, 100 * WHOLE - 1).unwrap(), 1_000_000_000);
        assert_eq!(spot_price(&steps, 100 * WHOLE).unwrap(), 2_000_000_000);
        assert_eq!(spot_price(&steps, 600 * WHOLE).unwrap(), 5_000_000_000);
    }

    #[test]
    fn test_large_prices_use_wide_math() {
        // A full u64 range at a 2^80 price overflows a u128 product
        let price = 1u128 << 80;
        let steps = vec![Step::new(u64::MAX, price)];
        let walked = walk(&steps, 0, Direction::Up, Limit::Tokens(u64::MAX as u128)).unwrap();
        assert_eq!(walked.tokens, u64::MAX as u128);
        assert_eq!(
            walked.reserve,
            mul_div_ceil(u64::MAX as u128, price, PRICE_SCALE).unwrap()
        );

        // A quote that large does not fit an SPL amount
        let err = quote_reserve_for_tokens(&steps, 0, u64::MAX, 0).unwrap_err();
        assert_eq!(err, CurveError::MathOverflow.into());
    }
}
