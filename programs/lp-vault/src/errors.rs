use anchor_lang::prelude::*;

/// Custom error codes for the LP Vault program
///
/// Every variant aborts the whole operation; nothing is retried.
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Operation would mint or burn zero shares")]
    ZeroShares,

    #[msg("Operation would move zero assets")]
    ZeroAssets,

    #[msg("Pool output fell below the slippage-guarded minimum")]
    SlippageExceeded,

    #[msg("Liquidity call deadline elapsed before execution")]
    DeadlineExceeded,

    #[msg("Unauthorized - only the vault manager can perform this action")]
    Unauthorized,

    #[msg("Caller allowance does not cover the shares to burn")]
    InsufficientAllowance,

    #[msg("Pool has no liquidity - reserves or share supply are zero")]
    EmptyPool,

    #[msg("Slippage tolerance must be strictly between 9000 and 10000")]
    InvalidSlippageTolerance,

    #[msg("Deadline window must be greater than zero")]
    InvalidDeadlineWindow,

    #[msg("Pool swap fee must be below 10000 basis points")]
    InvalidSwapFee,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Requested amount exceeds the vault's pool position")]
    ExceedsHoldings,

    #[msg("Insufficient token balance for transfer")]
    InsufficientBalance,

    #[msg("Invalid token mint - does not match vault tokens")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,

    #[msg("Pool tokens do not match the vault token pair")]
    InvalidPoolTokens,
}
