// =============================================================================
// Step Table
// =============================================================================
// A curve is an ordered list of steps. Step `i` prices every unit of supply in
// (steps[i-1].range_to, steps[i].range_to] at steps[i].price, with the first
// step starting at zero supply.
//
// The table is validated once, when the curve is created. Nothing downstream
// re-checks it: the curve math relies on every invariant below.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::MAX_STEPS;
use crate::error::CurveError;

/// One constant-price segment of a bonding curve.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Cumulative supply (token base units) at which this step ends
    pub range_to: u64,

    /// Reserve base units per whole token (PRICE_SCALE token base units)
    /// Zero only on the first step, which is then a free-mint range
    pub price: u128,
}

impl Step {
    /// Serialized size: range_to (8) + price (16)
    pub const SIZE: usize = 8 + 16;

    pub fn new(range_to: u64, price: u128) -> Self {
        Self { range_to, price }
    }
}

/// Check a step table against the curve's declared max supply
///
/// Rejects:
/// - an empty table or one longer than MAX_STEPS
/// - a zero range_to on any step
/// - range_to or price not strictly increasing between consecutive steps
/// - a final range_to different from max_supply
pub fn validate_steps(steps: &[Step], max_supply: u64) -> Result<()> {
    require!(!steps.is_empty(), CurveError::InvalidSteps);
    require!(steps.len() <= MAX_STEPS, CurveError::InvalidSteps);

    for (i, step) in steps.iter().enumerate() {
        require!(step.range_to > 0, CurveError::InvalidSteps);

        if i > 0 {
            let prev = &steps[i - 1];
            require!(step.range_to > prev.range_to, CurveError::InvalidSteps);
            // Also confines a zero price to the first step
            require!(step.price > prev.price, CurveError::InvalidSteps);
        }
    }

    let last = steps[steps.len() - 1];
    require!(last.range_to == max_supply, CurveError::InvalidSteps);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Step> {
        vec![Step::new(100, 0), Step::new(300, 10), Step::new(1_000, 25)]
    }

    fn rejected(steps: &[Step], max_supply: u64) -> bool {
        validate_steps(steps, max_supply).unwrap_err() == CurveError::InvalidSteps.into()
    }

    #[test]
    fn test_valid_table_passes() {
        assert!(validate_steps(&table(), 1_000).is_ok());
        assert!(validate_steps(&[Step::new(1, 1)], 1).is_ok());
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(rejected(&[], 0));
        assert!(rejected(&[], 1_000));
    }

    #[test]
    fn test_oversized_table_is_rejected() {
        let steps: Vec<Step> = (1..=MAX_STEPS as u64 + 1)
            .map(|i| Step::new(i, i as u128))
            .collect();
        assert!(rejected(&steps, MAX_STEPS as u64 + 1));

        // Exactly MAX_STEPS is still accepted
        assert!(validate_steps(&steps[..MAX_STEPS], MAX_STEPS as u64).is_ok());
    }

    #[test]
    fn test_zero_range_is_rejected() {
        assert!(rejected(&[Step::new(0, 1), Step::new(10, 2)], 10));
    }

    #[test]
    fn test_non_increasing_range_is_rejected() {
        assert!(rejected(&[Step::new(10, 1), Step::new(10, 2)], 10));
        assert!(rejected(&[Step::new(10, 1), Step::new(5, 2)], 5));
    }

    #[test]
    fn test_non_increasing_price_is_rejected() {
        assert!(rejected(&[Step::new(10, 5), Step::new(20, 5)], 20));
        assert!(rejected(&[Step::new(10, 5), Step::new(20, 4)], 20));
    }

    #[test]
    fn test_zero_price_only_on_first_step() {
        assert!(validate_steps(&[Step::new(10, 0), Step::new(20, 1)], 20).is_ok());
        assert!(rejected(&[Step::new(10, 1), Step::new(20, 0)], 20));
    }

    #[test]
    fn test_max_supply_mismatch_is_rejected() {
        assert!(rejected(&table(), 999));
        assert!(rejected(&table(), 1_001));
    }
}
