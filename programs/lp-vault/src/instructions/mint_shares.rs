use anchor_lang::prelude::*;

use crate::{constants::*, engine::VaultEngine, events::*, instructions::VaultOperation};

/// Mint exactly `shares` to the share account owner, pulling what they cost
pub fn handler(ctx: Context<VaultOperation>, shares: u64) -> Result<()> {
    let accounts = ctx.accounts;
    let now = Clock::get()?.unix_timestamp;

    let pool_key = accounts.vault_state.pool;
    let authority_bump = [accounts.vault_state.authority_bump];
    let authority_seeds: &[&[u8]] = &[VAULT_AUTHORITY_SEED, pool_key.as_ref(), &authority_bump];
    let signer_seeds = &[authority_seeds];

    let mut pool = accounts.cpi_pool(signer_seeds);
    let mut ledger = accounts.spl_ledger(signer_seeds);

    let vault = accounts.vault_state.key();
    let caller = accounts.user.key();
    let receiver = accounts.share_account.owner;
    let vault_authority = accounts.vault_authority.key();

    let mut engine = VaultEngine::new(
        &mut accounts.vault_state,
        &mut pool,
        &mut ledger,
        vault_authority,
        now,
    );
    let assets = engine.mint(&caller, &receiver, shares)?;

    emit!(Deposited {
        vault,
        caller,
        receiver,
        assets,
        shares,
        total_pool_shares: engine.state().total_pool_shares,
        total_shares: engine.state().total_shares,
        timestamp: now,
    });

    Ok(())
}
