// LP Vault - ERC-4626-style vault over a constant-product AMM position
// Architecture: pure math + engine over Pool/ledger traits, CPI adapters on-chain
// Security: every operation is atomic; shares move only after pool calls succeed

use anchor_lang::prelude::*;

pub mod adapters;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod harvest;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod state;

use instructions::*;
use state::InitializeParams;

declare_id!("LPVau1tqB7rJ2mGx1yN4Lk8HwZcE3dFsUo9PaXeT6Qv");

#[program]
pub mod lp_vault {
    use super::*;

    /// Initialize a vault over an AMM pool
    ///
    /// Security considerations:
    /// - Manager is the signer and is stored in state
    /// - Slippage tolerance, deadline window and pool fee validated
    /// - Share mint authority is the vault authority PDA
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Change the slippage tolerance
    ///
    /// Security considerations:
    /// - Manager-only (has_one constraint)
    /// - Value must lie strictly inside (9000, 10000)
    pub fn set_slippage_tolerance(
        ctx: Context<SetSlippageTolerance>,
        tolerance: u16,
    ) -> Result<()> {
        instructions::set_slippage_tolerance::handler(ctx, tolerance)
    }

    /// Deposit nominal assets and receive vault shares
    ///
    /// Security considerations:
    /// - Validates user token accounts (mint, owner)
    /// - Fails on zero shares
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<VaultOperation>, assets: u64) -> Result<()> {
        instructions::deposit::handler(ctx, assets)
    }

    /// Mint an exact amount of vault shares
    pub fn mint_shares(ctx: Context<VaultOperation>, shares: u64) -> Result<()> {
        instructions::mint_shares::handler(ctx, shares)
    }

    /// Withdraw an exact nominal amount, burning the shares it costs
    ///
    /// Security considerations:
    /// - Third-party callers need an SPL delegate allowance on the share account
    /// - Both liquidity legs bounded by the slippage tolerance
    pub fn withdraw(ctx: Context<VaultOperation>, assets: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, assets)
    }

    /// Redeem an exact amount of vault shares
    pub fn redeem(ctx: Context<VaultOperation>, shares: u64) -> Result<()> {
        instructions::redeem::handler(ctx, shares)
    }
}
