// =============================================================================
// Step Bond Events
// =============================================================================
// Emitted with `emit!` so indexers can follow every curve without replaying
// account diffs. Amounts are in base units.
// =============================================================================

use anchor_lang::prelude::*;

#[event]
pub struct RegistryInitialized {
    pub admin: Pubkey,
    pub protocol_beneficiary: Pubkey,
}

#[event]
pub struct CurveCreated {
    pub bond: Pubkey,
    pub bond_id: u64,
    pub creator: Pubkey,
    pub reserve_mint: Pubkey,
    pub token_mint: Pubkey,
    pub max_supply: u64,
    pub step_count: u16,
    pub buy_fee_bps: u16,
    pub sell_fee_bps: u16,
    /// Tokens minted to the creator from a zero-priced first step
    pub free_allocation: u64,
}

#[event]
pub struct TokensBought {
    pub bond: Pubkey,
    pub buyer: Pubkey,
    pub reserve_in: u64,
    pub tokens_out: u64,
    pub creator_fee: u64,
    pub protocol_fee: u64,
    pub new_supply: u64,
    pub reserve_balance: u64,
}

#[event]
pub struct TokensSold {
    pub bond: Pubkey,
    pub seller: Pubkey,
    pub tokens_in: u64,
    pub reserve_out: u64,
    pub creator_fee: u64,
    pub protocol_fee: u64,
    pub new_supply: u64,
    pub reserve_balance: u64,
}

#[event]
pub struct FeesWithdrawn {
    pub beneficiary: Pubkey,
    pub reserve_mint: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
}

#[event]
pub struct ProtocolBeneficiaryUpdated {
    pub old_beneficiary: Pubkey,
    pub new_beneficiary: Pubkey,
}

#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}
