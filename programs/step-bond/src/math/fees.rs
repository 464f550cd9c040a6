// =============================================================================
// Trade Fee Math
// =============================================================================
// Every buy and sell pays one fee on its gross reserve amount. PROTOCOL_CUT_BPS
// of that fee belongs to the protocol beneficiary, the remainder to the curve
// creator. The total fee is rounded up so the trader never underpays it.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS, PROTOCOL_CUT_BPS};
use crate::error::CurveError;
use crate::math::fixed::{mul_div_ceil, mul_div_floor, to_u64};

/// The two halves of a trade fee.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub creator_fee: u64,
    pub protocol_fee: u64,
}

impl FeeSplit {
    pub fn total(&self) -> Result<u64> {
        self.creator_fee
            .checked_add(self.protocol_fee)
            .ok_or(error!(CurveError::MathOverflow))
    }
}

/// Validate a creator-chosen fee rate
pub fn validate_fee_bps(fee_bps: u16) -> Result<()> {
    require!(fee_bps <= MAX_FEE_BPS, CurveError::InvalidFeeRate);
    Ok(())
}

/// Split the fee owed on `gross` at `fee_bps`
///
/// Formula:
/// - total = ceil(gross * fee_bps / 10000)
/// - protocol_fee = floor(total * PROTOCOL_CUT_BPS / 10000)
/// - creator_fee = total - protocol_fee
pub fn split_fee(gross: u64, fee_bps: u16) -> Result<FeeSplit> {
    validate_fee_bps(fee_bps)?;

    let total = mul_div_ceil(gross as u128, fee_bps as u128, BPS_DENOMINATOR as u128)?;
    let protocol_fee = mul_div_floor(total, PROTOCOL_CUT_BPS as u128, BPS_DENOMINATOR as u128)?;

    // Creator takes the remainder so the split always sums to the total
    let creator_fee = total
        .checked_sub(protocol_fee)
        .ok_or(error!(CurveError::MathOverflow))?;

    Ok(FeeSplit {
        creator_fee: to_u64(creator_fee)?,
        protocol_fee: to_u64(protocol_fee)?,
    })
}

/// Smallest gross amount whose post-fee remainder is at least `net`
///
/// gross = ceil(net * 10000 / (10000 - fee_bps)). With the fee rounded up,
/// `gross - split_fee(gross).total() >= net` holds for this gross.
pub fn gross_for_net(net: u64, fee_bps: u16) -> Result<u64> {
    validate_fee_bps(fee_bps)?;

    let keep_bps = (BPS_DENOMINATOR - fee_bps) as u128;
    let gross = mul_div_ceil(net as u128, BPS_DENOMINATOR as u128, keep_bps)?;
    to_u64(gross)
}

/// Amount left after the fee on `gross` is taken out
pub fn net_of_fee(gross: u64, fee_bps: u16) -> Result<(u64, FeeSplit)> {
    let fees = split_fee(gross, fee_bps)?;
    let net = gross
        .checked_sub(fees.total()?)
        .ok_or(error!(CurveError::MathOverflow))?;
    Ok((net, fees))
}
