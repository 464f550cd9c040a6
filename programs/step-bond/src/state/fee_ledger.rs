// =============================================================================
// Fee Ledger State Account
// =============================================================================
// One entry per (beneficiary, reserve mint). The protocol's entry uses the
// registry address as its beneficiary key. Trades only ever add to the
// balance; the tokens sit in the reserve mint's fee vault until the
// beneficiary pulls them with withdraw_fees. A trade therefore never depends
// on a beneficiary being able to receive tokens.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::CurveError;

/// Accrued, withdrawable fees of one beneficiary in one reserve asset.
///
/// PDA derived from ["fee_ledger", reserve_mint, beneficiary].
#[account]
#[derive(InitSpace, Default)]
pub struct FeeLedger {
    /// Wallet allowed to withdraw this balance
    pub beneficiary: Pubkey,

    /// Reserve asset the balance is denominated in
    pub reserve_mint: Pubkey,

    /// Fees accrued and not yet withdrawn
    pub balance: u64,

    /// Lifetime fees credited
    pub total_credited: u64,

    /// Lifetime fees withdrawn
    pub total_withdrawn: u64,

    /// Bump seed for this FeeLedger PDA
    pub bump: u8,
}

impl FeeLedger {
    /// Fill in the identity of a freshly created (zeroed) entry
    pub fn init_if_new(&mut self, beneficiary: Pubkey, reserve_mint: Pubkey, bump: u8) {
        if self.beneficiary == Pubkey::default() {
            self.beneficiary = beneficiary;
            self.reserve_mint = reserve_mint;
            self.bump = bump;
        }
    }

    /// Wallet whose signature releases this balance
    ///
    /// The protocol's entry is keyed by the registry, so it is released by
    /// whoever is the protocol beneficiary at withdrawal time.
    pub fn withdraw_authority(&self, registry: Pubkey, protocol_beneficiary: Pubkey) -> Pubkey {
        if self.beneficiary == registry {
            protocol_beneficiary
        } else {
            self.beneficiary
        }
    }

    /// Fail with Unauthorized unless `signer` may release this balance
    pub fn authorize_withdraw(
        &self,
        registry: Pubkey,
        protocol_beneficiary: Pubkey,
        signer: Pubkey,
    ) -> Result<()> {
        require!(
            self.withdraw_authority(registry, protocol_beneficiary) == signer,
            CurveError::Unauthorized
        );
        Ok(())
    }

    /// Accrue `amount` to this entry
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(error!(CurveError::MathOverflow))?;

        self.total_credited = self
            .total_credited
            .checked_add(amount)
            .ok_or(error!(CurveError::MathOverflow))?;

        Ok(())
    }

    /// Zero the balance and return what it held
    pub fn take(&mut self) -> Result<u64> {
        require!(self.balance > 0, CurveError::NothingToWithdraw);

        let amount = self.balance;
        self.balance = 0;
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(error!(CurveError::MathOverflow))?;

        Ok(amount)
    }
}
