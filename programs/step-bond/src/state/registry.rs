// =============================================================================
// Registry State Account
// =============================================================================
// The single global account of the program. It hands out bond ids (the index
// every Bond PDA is derived from), names the protocol fee beneficiary, and
// signs for the per-reserve-mint fee vaults.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::CurveError;

/// Global configuration and bond arena counter.
///
/// PDA derived from ["registry"].
#[account]
#[derive(InitSpace)]
pub struct Registry {
    /// Can change the protocol beneficiary and hand over admin rights
    pub admin: Pubkey,

    /// Receives the protocol's cut of every trade fee
    pub protocol_beneficiary: Pubkey,

    /// Number of bonds created so far; the next bond's id
    pub bond_count: u64,

    /// Bump seed for the Registry PDA
    pub bump: u8,
}

impl Registry {
    /// Reserve the next bond id
    pub fn next_bond_id(&mut self) -> Result<u64> {
        let bond_id = self.bond_count;
        self.bond_count = self
            .bond_count
            .checked_add(1)
            .ok_or(error!(CurveError::MathOverflow))?;
        Ok(bond_id)
    }

    /// Replace the protocol beneficiary, returning the previous one
    pub fn set_protocol_beneficiary(&mut self, new_beneficiary: Pubkey) -> Result<Pubkey> {
        require_new_address(self.protocol_beneficiary, new_beneficiary)?;
        Ok(std::mem::replace(&mut self.protocol_beneficiary, new_beneficiary))
    }

    /// Replace the admin, returning the previous one
    pub fn set_admin(&mut self, new_admin: Pubkey) -> Result<Pubkey> {
        require_new_address(self.admin, new_admin)?;
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }
}

/// A role may only move to a real address different from its current holder
fn require_new_address(current: Pubkey, new: Pubkey) -> Result<()> {
    require!(new != Pubkey::default(), CurveError::InvalidAddress);
    require!(new != current, CurveError::InvalidAddress);
    Ok(())
}
