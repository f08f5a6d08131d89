// Constants for the LP Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault authority PDA (owns the vault token accounts and LP position)
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Denominator for every parts-per-10000 value (slippage tolerance, pool fee)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Slippage tolerance must be strictly above this (max 10% slippage)
pub const MIN_SLIPPAGE_TOLERANCE: u16 = 9_000;

/// Slippage tolerance must be strictly below this
pub const MAX_SLIPPAGE_TOLERANCE: u16 = 10_000;

/// Default forward offset applied to liquidity call deadlines, in seconds
pub const DEFAULT_DEADLINE_WINDOW: i64 = 100;

/// Default swap fee of the underlying constant-product pool (0.30%)
pub const DEFAULT_SWAP_FEE_BPS: u16 = 30;

/// Space for VaultState account (8 discriminator + 6 * 32 pubkeys + 1 mode +
/// 2 tolerance + 8 deadline window + 2 swap fee + 8 total_pool_shares +
/// 8 total_shares + 3 bumps + 64 padding)
pub const VAULT_STATE_SIZE: usize = 8 + 6 * 32 + 1 + 2 + 8 + 2 + 8 + 8 + 3 + 64;
