use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use anchor_spl::token::{Mint, TokenAccount};

use crate::{
    errors::VaultError,
    pool::{AddLiquidityRequest, Checkpoint, LiquidityAdded, Pool, RemoveLiquidityRequest},
};

/// Anchor discriminator of `global:add_liquidity`
const ADD_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [181, 157, 89, 67, 143, 182, 52, 72];

/// Anchor discriminator of `global:remove_liquidity`
const REMOVE_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [80, 85, 209, 72, 24, 206, 177, 108];

/// Anchor discriminator of `global:swap`
const SWAP_DISCRIMINATOR: [u8; 8] = [248, 198, 158, 145, 225, 117, 135, 200];

/// Constant-product AMM reached through CPI
///
/// Reserves are the pool's token account balances and the share supply is
/// the LP mint supply. Every call uses the account list
/// `[pool, pool_authority, pool_token_0, pool_token_1, lp_mint,
/// vault_token_0, vault_token_1, vault_pool_shares, vault_authority (signer),
/// token_program]`. Amounts are measured as balance deltas on the vault's
/// accounts.
pub struct CpiPool<'a, 'info> {
    pub amm_program: AccountInfo<'info>,
    pub pool: AccountInfo<'info>,
    pub pool_authority: AccountInfo<'info>,
    pub pool_token_0: Account<'info, TokenAccount>,
    pub pool_token_1: Account<'info, TokenAccount>,
    pub lp_mint: Account<'info, Mint>,
    /// Vault account holding pool token 0
    pub vault_token_0: Account<'info, TokenAccount>,
    /// Vault account holding pool token 1
    pub vault_token_1: Account<'info, TokenAccount>,
    pub vault_pool_shares: Account<'info, TokenAccount>,
    pub vault_authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> CpiPool<'a, 'info> {
    fn check_deadline(deadline: i64) -> Result<()> {
        require!(
            Clock::get()?.unix_timestamp <= deadline,
            VaultError::DeadlineExceeded
        );
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        self.pool_token_0.reload()?;
        self.pool_token_1.reload()?;
        self.lp_mint.reload()?;
        self.vault_token_0.reload()?;
        self.vault_token_1.reload()?;
        self.vault_pool_shares.reload()?;
        Ok(())
    }

    fn vault_balances(&self) -> (u64, u64, u64) {
        (
            self.vault_token_0.amount,
            self.vault_token_1.amount,
            self.vault_pool_shares.amount,
        )
    }

    fn invoke_amm(&self, data: Vec<u8>) -> Result<()> {
        let ix = Instruction {
            program_id: *self.amm_program.key,
            accounts: vec![
                AccountMeta::new(*self.pool.key, false),
                AccountMeta::new_readonly(*self.pool_authority.key, false),
                AccountMeta::new(self.pool_token_0.key(), false),
                AccountMeta::new(self.pool_token_1.key(), false),
                AccountMeta::new(self.lp_mint.key(), false),
                AccountMeta::new(self.vault_token_0.key(), false),
                AccountMeta::new(self.vault_token_1.key(), false),
                AccountMeta::new(self.vault_pool_shares.key(), false),
                AccountMeta::new_readonly(*self.vault_authority.key, true),
                AccountMeta::new_readonly(*self.token_program.key, false),
            ],
            data,
        };

        invoke_signed(
            &ix,
            &[
                self.pool.clone(),
                self.pool_authority.clone(),
                self.pool_token_0.to_account_info(),
                self.pool_token_1.to_account_info(),
                self.lp_mint.to_account_info(),
                self.vault_token_0.to_account_info(),
                self.vault_token_1.to_account_info(),
                self.vault_pool_shares.to_account_info(),
                self.vault_authority.clone(),
                self.token_program.clone(),
                self.amm_program.clone(),
            ],
            self.signer_seeds,
        )?;
        Ok(())
    }
}

fn encode(discriminator: [u8; 8], args: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + args.len() * 8 + 1);
    data.extend_from_slice(&discriminator);
    for arg in args {
        data.extend_from_slice(&arg.to_le_bytes());
    }
    data
}

fn spent(before: u64, after: u64) -> Result<u64> {
    before
        .checked_sub(after)
        .ok_or(error!(VaultError::MathOverflow))
}

impl<'a, 'info> Pool for CpiPool<'a, 'info> {
    fn tokens(&self) -> (Pubkey, Pubkey) {
        (self.pool_token_0.mint, self.pool_token_1.mint)
    }

    fn reserves(&self) -> Result<(u64, u64)> {
        Ok((self.pool_token_0.amount, self.pool_token_1.amount))
    }

    fn total_shares(&self) -> Result<u64> {
        Ok(self.lp_mint.supply)
    }

    fn add_liquidity(&mut self, request: AddLiquidityRequest) -> Result<LiquidityAdded> {
        Self::check_deadline(request.deadline)?;
        require_keys_eq!(
            request.recipient,
            *self.vault_authority.key,
            VaultError::InvalidOwner
        );

        self.reload()?;
        let (before_0, before_1, before_shares) = self.vault_balances();

        self.invoke_amm(encode(
            ADD_LIQUIDITY_DISCRIMINATOR,
            &[request.amount_0, request.amount_1, request.min_0, request.min_1],
        ))?;

        self.reload()?;
        let (after_0, after_1, after_shares) = self.vault_balances();

        let added = LiquidityAdded {
            used_0: spent(before_0, after_0)?,
            used_1: spent(before_1, after_1)?,
            pool_shares: spent(after_shares, before_shares)?,
        };
        require!(
            added.used_0 >= request.min_0 && added.used_1 >= request.min_1,
            VaultError::SlippageExceeded
        );
        Ok(added)
    }

    fn remove_liquidity(&mut self, request: RemoveLiquidityRequest) -> Result<(u64, u64)> {
        Self::check_deadline(request.deadline)?;
        require_keys_eq!(
            request.recipient,
            *self.vault_authority.key,
            VaultError::InvalidOwner
        );

        self.reload()?;
        let (before_0, before_1, _) = self.vault_balances();

        self.invoke_amm(encode(
            REMOVE_LIQUIDITY_DISCRIMINATOR,
            &[request.pool_shares, request.min_0, request.min_1],
        ))?;

        self.reload()?;
        let (after_0, after_1, _) = self.vault_balances();

        let received = (spent(after_0, before_0)?, spent(after_1, before_1)?);
        require!(
            received.0 >= request.min_0 && received.1 >= request.min_1,
            VaultError::SlippageExceeded
        );
        Ok(received)
    }

    fn swap_exact_in(
        &mut self,
        amount_in: u64,
        token_in: Pubkey,
        token_out: Pubkey,
    ) -> Result<u64> {
        let zero_for_one = match (token_in, token_out) {
            (t_in, t_out) if t_in == self.pool_token_0.mint && t_out == self.pool_token_1.mint => {
                true
            }
            (t_in, t_out) if t_in == self.pool_token_1.mint && t_out == self.pool_token_0.mint => {
                false
            }
            _ => return err!(VaultError::InvalidPoolTokens),
        };

        self.reload()?;
        let (before_0, before_1, _) = self.vault_balances();

        // No output floor on the rebalancing leg
        let mut data = encode(SWAP_DISCRIMINATOR, &[amount_in, 0]);
        data.push(zero_for_one as u8);
        self.invoke_amm(data)?;

        self.reload()?;
        let (after_0, after_1, _) = self.vault_balances();

        if zero_for_one {
            spent(after_1, before_1)
        } else {
            spent(after_0, before_0)
        }
    }
}

impl<'a, 'info> Checkpoint for CpiPool<'a, 'info> {
    // The runtime reverts every account on a failed transaction
    type Snapshot = ();

    fn checkpoint(&self) -> Self::Snapshot {}

    fn rollback(&mut self, _snapshot: Self::Snapshot) {}
}
