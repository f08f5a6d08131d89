use anchor_lang::prelude::*;

use crate::state::VaultMode;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub manager: Pubkey,
    pub pool: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub share_mint: Pubkey,
    pub mode: VaultMode,
    pub slippage_tolerance: u16,
    pub timestamp: i64,
}

/// Event emitted when shares are issued (deposit or mint)
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub total_pool_shares: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are burned (withdraw or redeem)
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub receiver: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub total_pool_shares: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the manager changes the slippage tolerance
#[event]
pub struct SlippageToleranceUpdated {
    pub vault: Pubkey,
    pub manager: Pubkey,
    pub previous: u16,
    pub current: u16,
    pub timestamp: i64,
}
