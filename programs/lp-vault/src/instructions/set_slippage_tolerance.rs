use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Change the slippage tolerance applied to liquidity calls
#[derive(Accounts)]
pub struct SetSlippageTolerance<'info> {
    /// Vault manager - only they can change the tolerance
    pub manager: Signer<'info>,

    /// Vault state PDA
    /// Security: has_one constraint validates manager from state
    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.pool.as_ref()],
        bump = vault_state.bump,
        has_one = manager @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

pub fn handler(ctx: Context<SetSlippageTolerance>, tolerance: u16) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    let previous = vault_state.slippage_tolerance;

    vault_state.set_slippage_tolerance(&ctx.accounts.manager.key(), tolerance)?;

    emit!(SlippageToleranceUpdated {
        vault: vault_state.key(),
        manager: vault_state.manager,
        previous,
        current: tolerance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
