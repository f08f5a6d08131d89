use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    math::{mul_div, mul_div_up, validate_slippage_tolerance},
};

/// How depositors denominate deposits and withdrawals
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultMode {
    /// Amounts are pool-share amounts, contributed and returned as both tokens
    TwoAsset,
    /// Amounts are token A; deposits are rebalanced through a pool swap
    SingleAsset,
}

/// Parameters fixed at vault creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    pub mode: VaultMode,
    /// Parts per 10000 accepted from every liquidity call
    pub slippage_tolerance: u16,
    /// Seconds added to the current time for liquidity call deadlines
    pub deadline_window: i64,
    /// Swap fee charged by the pool, in basis points
    pub swap_fee_bps: u16,
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self {
            mode: VaultMode::SingleAsset,
            slippage_tolerance: 9_950,
            deadline_window: DEFAULT_DEADLINE_WINDOW,
            swap_fee_bps: DEFAULT_SWAP_FEE_BPS,
        }
    }
}

impl InitializeParams {
    pub fn validate(&self) -> Result<()> {
        validate_slippage_tolerance(self.slippage_tolerance)?;
        require!(self.deadline_window > 0, VaultError::InvalidDeadlineWindow);
        require!(
            (self.swap_fee_bps as u64) < BPS_DENOMINATOR,
            VaultError::InvalidSwapFee
        );
        Ok(())
    }
}

/// Vault state: configuration plus the share/pool-share ledger totals
///
/// Security considerations:
/// - Manager stored in state, set once at initialize
/// - Tolerance only changes through the manager-gated setter
/// - Bumps stored for efficient PDA signing
/// - 64 bytes padding for future upgrades
#[account]
pub struct VaultState {
    /// Manager allowed to change the slippage tolerance
    pub manager: Pubkey,            // 32 bytes

    /// Canonical token A (the nominal asset in single-asset mode)
    pub token_a_mint: Pubkey,       // 32 bytes

    /// Canonical token B
    pub token_b_mint: Pubkey,       // 32 bytes

    /// Mint of the vault share token
    pub share_mint: Pubkey,         // 32 bytes

    /// Pool state account of the underlying AMM
    pub pool: Pubkey,               // 32 bytes

    /// Program id of the underlying AMM
    pub amm_program: Pubkey,        // 32 bytes

    pub mode: VaultMode,            // 1 byte

    /// Parts per 10000, strictly inside (9000, 10000)
    pub slippage_tolerance: u16,    // 2 bytes

    /// Seconds added to the current time for liquidity call deadlines
    pub deadline_window: i64,       // 8 bytes

    /// Swap fee of the underlying pool in basis points
    pub swap_fee_bps: u16,          // 2 bytes

    /// Pool shares held by the vault
    pub total_pool_shares: u64,     // 8 bytes

    /// Vault shares issued to depositors
    pub total_shares: u64,          // 8 bytes

    /// Bump seed for vault state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for share mint PDA
    pub share_bump: u8,             // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 64],        // 64 bytes
}

impl VaultState {
    /// Apply validated creation parameters
    pub fn configure(&mut self, manager: Pubkey, params: &InitializeParams) -> Result<()> {
        params.validate()?;
        self.manager = manager;
        self.mode = params.mode;
        self.slippage_tolerance = params.slippage_tolerance;
        self.deadline_window = params.deadline_window;
        self.swap_fee_bps = params.swap_fee_bps;
        self.total_pool_shares = 0;
        self.total_shares = 0;
        Ok(())
    }

    /// Manager-gated tolerance update
    pub fn set_slippage_tolerance(&mut self, caller: &Pubkey, tolerance: u16) -> Result<()> {
        require_keys_eq!(*caller, self.manager, VaultError::Unauthorized);
        validate_slippage_tolerance(tolerance)?;
        self.slippage_tolerance = tolerance;
        Ok(())
    }

    /// Deadline for a liquidity call issued at `now`
    pub fn deadline(&self, now: i64) -> Result<i64> {
        now.checked_add(self.deadline_window)
            .ok_or(error!(VaultError::MathOverflow))
    }

    /// Vault shares to mint for `pool_shares` added to the position
    ///
    /// ERC-4626 formula:
    /// - If first deposit: shares = pool_shares
    /// - Otherwise: shares = pool_shares * totalShares / totalPoolShares
    pub fn calculate_shares(&self, pool_shares: u64) -> Result<u64> {
        // First deposit: 1:1 ratio
        if self.total_shares == 0 || self.total_pool_shares == 0 {
            return Ok(pool_shares);
        }
        mul_div(pool_shares, self.total_shares, self.total_pool_shares)
    }

    /// Vault shares to burn for `pool_shares` leaving the position
    ///
    /// Rounded up so a withdrawer never burns less than their entitlement.
    pub fn calculate_shares_rounding_up(&self, pool_shares: u64) -> Result<u64> {
        if self.total_shares == 0 || self.total_pool_shares == 0 {
            return Ok(pool_shares);
        }
        mul_div_up(pool_shares, self.total_shares, self.total_pool_shares)
    }

    /// Pool shares backing `shares` vault shares
    ///
    /// ERC-4626 formula: pool_shares = shares * totalPoolShares / totalShares
    pub fn calculate_pool_shares(&self, shares: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(0);
        }
        mul_div(shares, self.total_pool_shares, self.total_shares)
    }

    /// Pool shares a minter must bring in for `shares` vault shares
    pub fn calculate_pool_shares_rounding_up(&self, shares: u64) -> Result<u64> {
        if self.total_shares == 0 || self.total_pool_shares == 0 {
            return Ok(shares);
        }
        mul_div_up(shares, self.total_pool_shares, self.total_shares)
    }

    /// Record pool shares added and vault shares issued
    pub fn record_deposit(&mut self, pool_shares: u64, shares: u64) -> Result<()> {
        self.total_pool_shares = self
            .total_pool_shares
            .checked_add(pool_shares)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Record pool shares removed and vault shares burned
    pub fn record_withdrawal(&mut self, pool_shares: u64, shares: u64) -> Result<()> {
        self.total_pool_shares = self
            .total_pool_shares
            .checked_sub(pool_shares)
            .ok_or(VaultError::ExceedsHoldings)?;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::ExceedsHoldings)?;
        Ok(())
    }
}
