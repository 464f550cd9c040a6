//! Integer `a * b / d` with an explicit rounding direction.
//!
//! The product is formed in `u128` when it fits and in `U256` otherwise, so a
//! full `u64` step range times a large `u128` price never loses precision.

use anchor_lang::prelude::*;

use crate::error::CurveError;

// Kept out of the anchor prelude's scope: the macro expands to code that
// names the two-parameter `core::result::Result`.
mod wide {
    use uint::construct_uint;

    construct_uint! {
        /// 256-bit unsigned integer for intermediate products.
        pub struct U256(4);
    }
}

pub use wide::U256;

/// Which way a quotient is rounded when the division is inexact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// `floor(a * b / d)`
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128> {
    mul_div(a, b, d, Rounding::Down)
}

/// `ceil(a * b / d)`
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128> {
    mul_div(a, b, d, Rounding::Up)
}

pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128> {
    require!(d != 0, CurveError::DivisionByZero);

    if let Some(product) = a.checked_mul(b) {
        let quotient = product / d;
        if rounding == Rounding::Up && product % d != 0 {
            return quotient
                .checked_add(1)
                .ok_or(error!(CurveError::MathOverflow));
        }
        return Ok(quotient);
    }

    // a, b < 2^128 so the product always fits in 256 bits
    let product = U256::from(a) * U256::from(b);
    let (mut quotient, remainder) = product.div_mod(U256::from(d));
    if rounding == Rounding::Up && !remainder.is_zero() {
        quotient = quotient + U256::one();
    }
    if quotient > U256::from(u128::MAX) {
        return err!(CurveError::MathOverflow);
    }
    Ok(quotient.low_u128())
}

/// Narrow a quote result to the `u64` used by SPL token amounts.
pub fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(CurveError::MathOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_division_ignores_rounding() {
        assert_eq!(mul_div_floor(6, 4, 3).unwrap(), 8);
        assert_eq!(mul_div_ceil(6, 4, 3).unwrap(), 8);
    }

    #[test]
    fn test_inexact_division_rounds_each_way() {
        assert_eq!(mul_div_floor(7, 1, 2).unwrap(), 3);
        assert_eq!(mul_div_ceil(7, 1, 2).unwrap(), 4);
    }

    #[test]
    fn test_wide_product_falls_back_to_u256() {
        // (2^100 * 2^60) / 2^64 = 2^96, product does not fit in u128
        let a = 1u128 << 100;
        let b = 1u128 << 60;
        let d = 1u128 << 64;
        assert!(a.checked_mul(b).is_none());
        assert_eq!(mul_div_floor(a, b, d).unwrap(), 1u128 << 96);

        // Inexact wide division still rounds up by exactly one
        assert_eq!(mul_div_ceil(a, b, d + 1).unwrap(), mul_div_floor(a, b, d + 1).unwrap() + 1);
    }

    #[test]
    fn test_u256_full_width_product() {
        let product = U256::from(u128::MAX) * U256::from(u128::MAX);
        let (quotient, remainder) = product.div_mod(U256::from(u128::MAX));
        assert_eq!(quotient, U256::from(u128::MAX));
        assert!(remainder.is_zero());

        // Largest quotient that still fits comes back through the u128 API
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX).unwrap(), u128::MAX);
    }

    #[test]
    fn test_quotient_overflow_is_rejected() {
        let err = mul_div_floor(u128::MAX, u128::MAX, 1).unwrap_err();
        assert_eq!(err, CurveError::MathOverflow.into());
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        let err = mul_div_ceil(1, 1, 0).unwrap_err();
        assert_eq!(err, CurveError::DivisionByZero.into());
    }

    #[test]
    fn test_to_u64_bounds() {
        assert_eq!(to_u64(u64::MAX as u128).unwrap(), u64::MAX);
        assert!(to_u64(u64::MAX as u128 + 1).is_err());
    }
}
