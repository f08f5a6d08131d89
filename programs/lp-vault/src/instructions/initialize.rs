use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Initialize a vault over one AMM pool
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault manager - can change the slippage tolerance
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub manager: Signer<'info>,

    /// Vault state PDA, one per pool
    #[account(
        init,
        payer = manager,
        space = VAULT_STATE_SIZE,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Pool state account of the AMM
    /// CHECK: Must be owned by the AMM program
    #[account(owner = amm_program.key() @ VaultError::InvalidPoolTokens)]
    pub pool: UncheckedAccount<'info>,

    /// CHECK: Executable AMM program, stored in state for CPI address checks
    #[account(executable)]
    pub amm_program: UncheckedAccount<'info>,

    /// Canonical token A (the deposit asset in single-asset mode)
    pub token_a_mint: Account<'info, Mint>,

    /// Canonical token B
    pub token_b_mint: Account<'info, Mint>,

    /// Pool share (LP) mint of the AMM
    pub lp_mint: Account<'info, Mint>,

    /// Share token mint PDA (vault shares)
    /// Security: Mint authority is vault_authority PDA
    #[account(
        init,
        payer = manager,
        seeds = [SHARE_MINT_SEED, pool.key().as_ref()],
        bump,
        mint::decimals = lp_mint.decimals,
        mint::authority = vault_authority,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Vault authority PDA - owns the vault token accounts and the LP position
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = manager,
        associated_token::mint = token_a_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_a: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = manager,
        associated_token::mint = token_b_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_b: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = manager,
        associated_token::mint = lp_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_pool_shares: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    // CHECKS: Distinct token pair
    require_keys_neq!(
        ctx.accounts.token_a_mint.key(),
        ctx.accounts.token_b_mint.key(),
        VaultError::InvalidPoolTokens
    );

    let vault_state = &mut ctx.accounts.vault_state;

    // EFFECTS: Initialize vault state
    vault_state.configure(ctx.accounts.manager.key(), &params)?;
    vault_state.token_a_mint = ctx.accounts.token_a_mint.key();
    vault_state.token_b_mint = ctx.accounts.token_b_mint.key();
    vault_state.share_mint = ctx.accounts.share_mint.key();
    vault_state.pool = ctx.accounts.pool.key();
    vault_state.amm_program = ctx.accounts.amm_program.key();
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.share_bump = ctx.bumps.share_mint;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 64];

    emit!(VaultInitialized {
        vault: vault_state.key(),
        manager: vault_state.manager,
        pool: vault_state.pool,
        token_a_mint: vault_state.token_a_mint,
        token_b_mint: vault_state.token_b_mint,
        share_mint: vault_state.share_mint,
        mode: vault_state.mode,
        slippage_tolerance: vault_state.slippage_tolerance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
