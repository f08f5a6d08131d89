use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{self, Burn, MintTo, TokenAccount, Transfer};

use crate::{
    errors::VaultError,
    ledger::{ShareLedger, TokenLedger},
    pool::Checkpoint,
};

/// Token and share ledgers backed by SPL token CPIs
///
/// Pulls come from the signer's accounts, pushes go to the receiver
/// accounts, and shares are minted to or burned from `share_account`.
pub struct SplLedger<'a, 'info> {
    pub token_program: AccountInfo<'info>,
    pub user: AccountInfo<'info>,
    pub vault_authority: AccountInfo<'info>,
    pub share_mint: AccountInfo<'info>,
    pub user_token_a: Account<'info, TokenAccount>,
    pub user_token_b: Account<'info, TokenAccount>,
    pub vault_token_a: Account<'info, TokenAccount>,
    pub vault_token_b: Account<'info, TokenAccount>,
    pub receiver_token_a: Account<'info, TokenAccount>,
    pub receiver_token_b: Account<'info, TokenAccount>,
    pub share_account: Account<'info, TokenAccount>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

impl<'a, 'info> SplLedger<'a, 'info> {
    /// `(user, vault, receiver)` accounts for `mint`
    fn accounts_for(
        &self,
        mint: &Pubkey,
    ) -> Result<(
        &Account<'info, TokenAccount>,
        &Account<'info, TokenAccount>,
        &Account<'info, TokenAccount>,
    )> {
        if *mint == self.vault_token_a.mint {
            Ok((&self.user_token_a, &self.vault_token_a, &self.receiver_token_a))
        } else if *mint == self.vault_token_b.mint {
            Ok((&self.user_token_b, &self.vault_token_b, &self.receiver_token_b))
        } else {
            err!(VaultError::InvalidMint)
        }
    }
}

impl<'a, 'info> TokenLedger for SplLedger<'a, 'info> {
    fn pull(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*from, *self.user.key, VaultError::InvalidOwner);
        let (user_account, vault_account, _) = self.accounts_for(mint)?;

        let transfer_ctx = CpiContext::new(
            self.token_program.clone(),
            Transfer {
                from: user_account.to_account_info(),
                to: vault_account.to_account_info(),
                authority: self.user.clone(),
            },
        );
        token::transfer(transfer_ctx, amount)
    }

    fn push(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let (_, vault_account, receiver_account) = self.accounts_for(mint)?;
        require_keys_eq!(*to, receiver_account.owner, VaultError::InvalidOwner);

        let transfer_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            Transfer {
                from: vault_account.to_account_info(),
                to: receiver_account.to_account_info(),
                authority: self.vault_authority.clone(),
            },
            self.signer_seeds,
        );
        token::transfer(transfer_ctx, amount)
    }
}

impl<'a, 'info> ShareLedger for SplLedger<'a, 'info> {
    fn mint_shares(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*to, self.share_account.owner, VaultError::InvalidOwner);

        let mint_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            MintTo {
                mint: self.share_mint.clone(),
                to: self.share_account.to_account_info(),
                authority: self.vault_authority.clone(),
            },
            self.signer_seeds,
        );
        token::mint_to(mint_ctx, amount)
    }

    fn burn_shares(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*from, self.share_account.owner, VaultError::InvalidOwner);

        // Signed by the caller: the owner, or a delegate whose allowance the
        // token program decrements
        let burn_ctx = CpiContext::new(
            self.token_program.clone(),
            Burn {
                mint: self.share_mint.clone(),
                from: self.share_account.to_account_info(),
                authority: self.user.clone(),
            },
        );
        token::burn(burn_ctx, amount)
    }

    fn spend_allowance(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(*owner, self.share_account.owner, VaultError::InvalidOwner);
        require!(
            self.share_account.delegate == COption::Some(*spender)
                && self.share_account.delegated_amount >= amount,
            VaultError::InsufficientAllowance
        );
        Ok(())
    }
}

impl<'a, 'info> Checkpoint for SplLedger<'a, 'info> {
    // The runtime reverts every account on a failed transaction
    type Snapshot = ();

    fn checkpoint(&self) -> Self::Snapshot {}

    fn rollback(&mut self, _snapshot: Self::Snapshot) {}
}
