// =============================================================================
// Step Bond Protocol Constants
// =============================================================================
// Seeds, fixed-point scales and hard limits shared by the curve math, the
// account layouts and the instruction handlers.
// =============================================================================

// =============================================================================
// TOKEN & PRICE SCALE
// =============================================================================

/// Decimals of every token minted by a curve
pub const TOKEN_DECIMALS: u8 = 9;

/// Token base units in one whole token
///
/// Step prices are quoted in reserve base units per whole token, so the
/// reserve cost of `n` token base units at `price` is `n * price / PRICE_SCALE`.
pub const PRICE_SCALE: u128 = 1_000_000_000;

// =============================================================================
// STEP TABLE LIMITS
// =============================================================================

/// Largest serialized transaction the cluster accepts (IPv6 MTU minus headers)
pub const MAX_TRANSACTION_SIZE: usize = 1232;

/// Maximum number of steps in a curve
///
/// The whole table travels in one create_curve instruction (24 bytes per
/// step), so it must fit in a single transaction next to the instruction's
/// 12 account keys, the creator's signature and two compute-budget
/// instructions.
pub const MAX_STEPS: usize = 24;

// =============================================================================
// FEE CONFIGURATION (in basis points - 1 BPS = 0.01%)
// =============================================================================

/// Total basis points (100%) - denominator in every fee calculation
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Protocol's cut of every trade fee: 20% of the fee, creator keeps the rest
pub const PROTOCOL_CUT_BPS: u16 = 2_000;

/// Highest buy or sell fee a creator may configure (50%)
pub const MAX_FEE_BPS: u16 = 5_000;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the global Registry account
/// Full seed: ["registry"]
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Seed for a Bond account
/// Full seed: ["bond", bond_id.to_le_bytes()]
pub const BOND_SEED: &[u8] = b"bond";

/// Seed for the token mint issued by a bond
/// Full seed: ["token_mint", bond_pubkey]
pub const TOKEN_MINT_SEED: &[u8] = b"token_mint";

/// Seed for the reserve vault holding a bond's reserve balance
/// Full seed: ["reserve_vault", bond_pubkey]
pub const RESERVE_VAULT_SEED: &[u8] = b"reserve_vault";

/// Seed for the per-reserve-mint vault holding accrued fees
/// Full seed: ["fee_vault", reserve_mint_pubkey]
pub const FEE_VAULT_SEED: &[u8] = b"fee_vault";

/// Seed for a beneficiary's fee ledger entry
/// Full seed: ["fee_ledger", reserve_mint_pubkey, beneficiary_pubkey]
pub const FEE_LEDGER_SEED: &[u8] = b"fee_ledger";
