// =============================================================================
// Create Curve Instruction
// =============================================================================
// Registers a new bond under the next registry id.
//
// Flow:
// 1. Validate the step table and fee rates
// 2. Create the Bond, its token mint (authority = bond) and reserve vault
// 3. Create the fee vault for the reserve mint if this is its first curve
// 4. If the first step is free, mint its whole range to the creator
//
// After this instruction the bond PDA is the only mint authority of the
// token, so supply can only change through buy and sell.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use crate::constants::*;
use crate::events::CurveCreated;
use crate::math::validate_fee_bps;
use crate::state::{validate_steps, Bond, Registry, Step};

/// Creator-chosen curve configuration
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CurveParams {
    /// Step table, strictly increasing in range_to and price
    pub steps: Vec<Step>,

    /// Must equal the last step's range_to
    pub max_supply: u64,

    pub buy_fee_bps: u16,
    pub sell_fee_bps: u16,
}

/// Accounts required for the create_curve instruction
#[derive(Accounts)]
#[instruction(params: CurveParams)]
pub struct CreateCurve<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// Curve creator: pays rent, earns the creator fee
    #[account(mut)]
    pub creator: Signer<'info>,

    // =========================================================================
    // Registry & Bond
    // =========================================================================

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// The bond to create, at the registry's next id
    ///
    /// Space is capped at MAX_STEPS so an oversized table reaches the
    /// handler's InvalidSteps check instead of failing the allocation.
    #[account(
        init,
        payer = creator,
        space = Bond::space(params.steps.len().min(MAX_STEPS)),
        seeds = [BOND_SEED, registry.bond_count.to_le_bytes().as_ref()],
        bump
    )]
    pub bond: Account<'info, Bond>,

    // =========================================================================
    // Token Mints
    // =========================================================================

    /// Reserve asset buyers will pay in
    pub reserve_mint: Account<'info, Mint>,

    /// The curve token, mintable only by the bond PDA
    #[account(
        init,
        payer = creator,
        mint::decimals = TOKEN_DECIMALS,
        mint::authority = bond,
        seeds = [TOKEN_MINT_SEED, bond.key().as_ref()],
        bump
    )]
    pub token_mint: Account<'info, Mint>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Holds the bond's reserve balance
    #[account(
        init,
        payer = creator,
        token::mint = reserve_mint,
        token::authority = bond,
        seeds = [RESERVE_VAULT_SEED, bond.key().as_ref()],
        bump
    )]
    pub reserve_vault: Account<'info, TokenAccount>,

    /// Holds accrued fees of every curve on this reserve mint
    #[account(
        init_if_needed,
        payer = creator,
        token::mint = reserve_mint,
        token::authority = registry,
        seeds = [FEE_VAULT_SEED, reserve_mint.key().as_ref()],
        bump
    )]
    pub fee_vault: Account<'info, TokenAccount>,

    /// Receives the free allocation, if any
    #[account(
        init_if_needed,
        payer = creator,
        associated_token::mint = token_mint,
        associated_token::authority = creator
    )]
    pub creator_token_account: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

/// Handler for create_curve
///
/// Returns the new bond id.
pub fn handler_create_curve(ctx: Context<CreateCurve>, params: CurveParams) -> Result<u64> {
    // =========================================================================
    // Input Validation
    // =========================================================================

    validate_steps(&params.steps, params.max_supply)?;
    validate_fee_bps(params.buy_fee_bps)?;
    validate_fee_bps(params.sell_fee_bps)?;

    // =========================================================================
    // Register the Bond
    // =========================================================================

    let bond_id = ctx.accounts.registry.next_bond_id()?;
    let clock = Clock::get()?;

    let bond = &mut ctx.accounts.bond;
    bond.bond_id = bond_id;
    bond.creator = ctx.accounts.creator.key();
    bond.reserve_mint = ctx.accounts.reserve_mint.key();
    bond.token_mint = ctx.accounts.token_mint.key();
    bond.reserve_vault = ctx.accounts.reserve_vault.key();
    bond.max_supply = params.max_supply;
    bond.buy_fee_bps = params.buy_fee_bps;
    bond.sell_fee_bps = params.sell_fee_bps;
    bond.reserve_balance = 0;
    bond.created_at = clock.unix_timestamp;
    bond.bump = ctx.bumps.bond;
    bond.token_mint_bump = ctx.bumps.token_mint;
    bond.reserve_vault_bump = ctx.bumps.reserve_vault;
    bond.steps = params.steps;

    let free_allocation = bond.free_allocation();
    let bond_bump = bond.bump;

    // =========================================================================
    // Free Allocation: Mint the zero-priced first step to the creator
    // =========================================================================

    if free_allocation > 0 {
        let bond_id_bytes = bond_id.to_le_bytes();
        let bond_seeds = &[BOND_SEED, bond_id_bytes.as_ref(), &[bond_bump]];
        let signer_seeds = &[&bond_seeds[..]];

        let mint_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.token_mint.to_account_info(),
                to: ctx.accounts.creator_token_account.to_account_info(),
                authority: ctx.accounts.bond.to_account_info(),
            },
            signer_seeds,
        );

        token::mint_to(mint_ctx, free_allocation)?;

        msg!("Free allocation of {} minted to creator", free_allocation);
    }

    // =========================================================================
    // Log Results
    // =========================================================================

    let bond = &ctx.accounts.bond;

    emit!(CurveCreated {
        bond: bond.key(),
        bond_id,
        creator: bond.creator,
        reserve_mint: bond.reserve_mint,
        token_mint: bond.token_mint,
        max_supply: bond.max_supply,
        step_count: bond.steps.len() as u16,
        buy_fee_bps: bond.buy_fee_bps,
        sell_fee_bps: bond.sell_fee_bps,
        free_allocation,
    });

    msg!("Curve created!");
    msg!("Bond: {} (id {})", bond.key(), bond_id);
    msg!("Token mint: {}", bond.token_mint);
    msg!("Reserve mint: {}", bond.reserve_mint);
    msg!("Steps: {}, max supply: {}", bond.steps.len(), bond.max_supply);

    Ok(bond_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::{InstructionData, ToAccountMetas};

    /// Length of a compact-u16 (shortvec) prefix
    fn shortvec_len(n: usize) -> usize {
        match n {
            0..=0x7f => 1,
            0x80..=0x3fff => 2,
            _ => 3,
        }
    }

    /// Legacy transaction size: one signer, create_curve plus the compute
    /// unit limit and price instructions a client usually prepends
    fn transaction_size(step_count: usize) -> usize {
        let steps = (1..=step_count as u64)
            .map(|i| Step::new(i * 1_000, i as u128 * 1_000))
            .collect::<Vec<_>>();
        let params = CurveParams {
            max_supply: step_count as u64 * 1_000,
            steps,
            buy_fee_bps: 100,
            sell_fee_bps: 100,
        };

        let data = crate::instruction::CreateCurve { params }.data();
        let metas = crate::accounts::CreateCurve {
            creator: Pubkey::new_unique(),
            registry: Pubkey::new_unique(),
            bond: Pubkey::new_unique(),
            reserve_mint: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            reserve_vault: Pubkey::new_unique(),
            fee_vault: Pubkey::new_unique(),
            creator_token_account: Pubkey::new_unique(),
            system_program: Pubkey::new_unique(),
            token_program: Pubkey::new_unique(),
            associated_token_program: Pubkey::new_unique(),
        }
        .to_account_metas(None);

        // Every account is distinct, plus this program and the compute budget program
        let keys = metas.len() + 2;

        let signatures = shortvec_len(1) + 64;
        let header = 3;
        let account_keys = shortvec_len(keys) + keys * 32;
        let blockhash = 32;

        let create_curve = 1 + shortvec_len(metas.len()) + metas.len() + shortvec_len(data.len()) + data.len();
        // SetComputeUnitLimit (u8 tag + u32) and SetComputeUnitPrice (u8 tag + u64)
        let compute_unit_limit = 1 + 1 + 1 + 5;
        let compute_unit_price = 1 + 1 + 1 + 9;
        let instructions = shortvec_len(3) + create_curve + compute_unit_limit + compute_unit_price;

        signatures + header + account_keys + blockhash + instructions
    }

    #[test]
    fn test_instruction_data_grows_per_step() {
        let one = crate::instruction::CreateCurve {
            params: CurveParams {
                steps: vec![Step::new(1, 1)],
                max_supply: 1,
                buy_fee_bps: 0,
                sell_fee_bps: 0,
            },
        }
        .data();

        // discriminator + vec prefix + step + max_supply + two fee rates
        assert_eq!(one.len(), 8 + 4 + Step::SIZE + 8 + 2 + 2);
    }

    #[test]
    fn test_largest_table_fits_one_transaction() {
        assert!(transaction_size(MAX_STEPS) <= MAX_TRANSACTION_SIZE);
    }

    #[test]
    fn test_step_cap_is_close_to_the_transaction_limit() {
        // A few more steps would no longer fit, so the cap is not arbitrary
        assert!(transaction_size(MAX_STEPS + 4) > MAX_TRANSACTION_SIZE);
    }
}
