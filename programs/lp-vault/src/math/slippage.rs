use anchor_lang::prelude::*;

use super::mul_div;
use crate::{constants::*, errors::VaultError};

/// Check a tolerance against the exclusive (9000, 10000) bound
pub fn validate_slippage_tolerance(tolerance: u16) -> Result<()> {
    require!(
        tolerance > MIN_SLIPPAGE_TOLERANCE && tolerance < MAX_SLIPPAGE_TOLERANCE,
        VaultError::InvalidSlippageTolerance
    );
    Ok(())
}

/// Floor accepted from the pool for a requested `amount`
///
/// `amount * tolerance / 10000`, truncating, so never above `amount`.
pub fn minimum_accepted(amount: u64, tolerance: u16) -> Result<u64> {
    mul_div(amount, tolerance as u64, BPS_DENOMINATOR)
}
