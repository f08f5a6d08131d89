use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{adapters::*, constants::*, errors::*, state::*};

/// Accounts shared by deposit, mint_shares, withdraw and redeem
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault state and authority PDAs validated with seeds
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner of every token account
/// ✅ 8. BUSINESS LOGIC: Pool calls complete before shares are minted or burned
#[derive(Accounts)]
pub struct VaultOperation<'info> {
    /// Caller: funds deposits, burns shares as owner or approved delegate
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.pool.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.pool.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        address = vault_state.share_mint,
    )]
    pub share_mint: Account<'info, Mint>,

    /// Caller's token A account (deposit source)
    #[account(
        mut,
        constraint = user_token_a.mint == vault_state.token_a_mint @ VaultError::InvalidMint,
        constraint = user_token_a.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_token_a: Account<'info, TokenAccount>,

    /// Caller's token B account (deposit source in two-asset mode)
    #[account(
        mut,
        constraint = user_token_b.mint == vault_state.token_b_mint @ VaultError::InvalidMint,
        constraint = user_token_b.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_token_b: Account<'info, TokenAccount>,

    /// Share account: credited on deposit/mint (receiver), debited on
    /// withdraw/redeem (owner)
    #[account(
        mut,
        constraint = share_account.mint == vault_state.share_mint @ VaultError::InvalidMint,
    )]
    pub share_account: Account<'info, TokenAccount>,

    /// Receiver of withdrawn token A
    #[account(
        mut,
        constraint = receiver_token_a.mint == vault_state.token_a_mint @ VaultError::InvalidMint,
    )]
    pub receiver_token_a: Account<'info, TokenAccount>,

    /// Receiver of withdrawn token B (two-asset mode)
    #[account(
        mut,
        constraint = receiver_token_b.mint == vault_state.token_b_mint @ VaultError::InvalidMint,
        constraint = receiver_token_b.owner == receiver_token_a.owner @ VaultError::InvalidOwner,
    )]
    pub receiver_token_b: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_a.mint == vault_state.token_a_mint @ VaultError::InvalidMint,
        constraint = vault_token_a.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_a: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_b.mint == vault_state.token_b_mint @ VaultError::InvalidMint,
        constraint = vault_token_b.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_b: Account<'info, TokenAccount>,

    /// Vault's LP token account
    #[account(
        mut,
        constraint = vault_pool_shares.mint == lp_mint.key() @ VaultError::InvalidMint,
        constraint = vault_pool_shares.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_pool_shares: Account<'info, TokenAccount>,

    /// CHECK: Pool state account, validated by address
    #[account(
        mut,
        address = vault_state.pool,
    )]
    pub pool: UncheckedAccount<'info>,

    /// CHECK: Pool signer, validated by the AMM program
    pub pool_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = pool_token_0.owner == pool_authority.key() @ VaultError::InvalidOwner,
    )]
    pub pool_token_0: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = pool_token_1.owner == pool_authority.key() @ VaultError::InvalidOwner,
    )]
    pub pool_token_1: Account<'info, TokenAccount>,

    #[account(mut)]
    pub lp_mint: Account<'info, Mint>,

    /// CHECK: AMM program, validated by address
    #[account(address = vault_state.amm_program)]
    pub amm_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> VaultOperation<'info> {
    /// Pool adapter with the vault accounts arranged in pool token order
    pub fn cpi_pool<'a>(&self, signer_seeds: &'a [&'a [&'a [u8]]]) -> CpiPool<'a, 'info> {
        let (vault_token_0, vault_token_1) = if self.pool_token_0.mint == self.vault_token_a.mint {
            (self.vault_token_a.clone(), self.vault_token_b.clone())
        } else {
            (self.vault_token_b.clone(), self.vault_token_a.clone())
        };

        CpiPool {
            amm_program: self.amm_program.to_account_info(),
            pool: self.pool.to_account_info(),
            pool_authority: self.pool_authority.to_account_info(),
            pool_token_0: self.pool_token_0.clone(),
            pool_token_1: self.pool_token_1.clone(),
            lp_mint: self.lp_mint.clone(),
            vault_token_0,
            vault_token_1,
            vault_pool_shares: self.vault_pool_shares.clone(),
            vault_authority: self.vault_authority.to_account_info(),
            token_program: self.token_program.to_account_info(),
            signer_seeds,
        }
    }

    pub fn spl_ledger<'a>(&self, signer_seeds: &'a [&'a [&'a [u8]]]) -> SplLedger<'a, 'info> {
        SplLedger {
            token_program: self.token_program.to_account_info(),
            user: self.user.to_account_info(),
            vault_authority: self.vault_authority.to_account_info(),
            share_mint: self.share_mint.to_account_info(),
            user_token_a: self.user_token_a.clone(),
            user_token_b: self.user_token_b.clone(),
            vault_token_a: self.vault_token_a.clone(),
            vault_token_b: self.vault_token_b.clone(),
            receiver_token_a: self.receiver_token_a.clone(),
            receiver_token_b: self.receiver_token_b.clone(),
            share_account: self.share_account.clone(),
            signer_seeds,
        }
    }
}
