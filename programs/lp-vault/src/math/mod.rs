//! Stateless vault math: pool conversions, slippage floors and the
//! single-sided rebalancing swap.

pub mod conversion;
pub mod rebalance;
pub mod slippage;

pub use conversion::*;
pub use rebalance::*;
pub use slippage::*;

use anchor_lang::prelude::*;
use num_bigint::BigUint;

use crate::errors::VaultError;

/// `value * numerator / denominator`, truncating
///
/// Security: u128 intermediate, checked narrowing back to u64
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    let result = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(error!(VaultError::MathOverflow))?
        .checked_div(denominator as u128)
        .ok_or(error!(VaultError::EmptyPool))?;

    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

/// `value * numerator / denominator`, rounding up
pub fn mul_div_up(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, VaultError::EmptyPool);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(error!(VaultError::MathOverflow))?;
    let denominator = denominator as u128;
    let mut result = product / denominator;
    if product % denominator != 0 {
        result += 1;
    }

    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

/// `value * numerator / denominator` over u128 operands, truncating
///
/// Products that leave u128 are carried in a `BigUint`; only a quotient
/// past u128 is an overflow.
pub fn mul_div_wide(value: u128, numerator: u128, denominator: u128) -> Result<u128> {
    require!(denominator > 0, VaultError::EmptyPool);

    match value.checked_mul(numerator) {
        Some(product) => Ok(product / denominator),
        None => {
            let quotient =
                BigUint::from(value) * BigUint::from(numerator) / BigUint::from(denominator);
            u128::try_from(quotient).map_err(|_| error!(VaultError::MathOverflow))
        }
    }
}
