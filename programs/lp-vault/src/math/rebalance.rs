use anchor_lang::prelude::*;
use num_bigint::BigUint;

use super::{mul_div_wide, PoolState};
use crate::{constants::BPS_DENOMINATOR, errors::VaultError};

/// Outcome of balancing a single-sided token A contribution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapPlan {
    /// Token A sent into the pool swap
    pub swap_in: u64,
    /// Token B expected back at current reserves
    pub swap_out: u64,
    /// Token A left for the liquidity add
    pub remaining_a: u64,
    /// Pool state after the swap, used for the liquidity ratio
    pub post_swap: PoolState,
}

/// Constant-product output with the fee taken on input
///
/// out = in * F * r_out / (r_in * 10000 + in * F), F = 10000 - fee
pub fn get_amount_out(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u16,
) -> Result<u64> {
    require!(reserve_in > 0 && reserve_out > 0, VaultError::EmptyPool);
    require!((fee_bps as u64) < BPS_DENOMINATOR, VaultError::InvalidSwapFee);

    let amount_in_with_fee = amount_in as u128 * (BPS_DENOMINATOR - fee_bps as u64) as u128;
    let denominator = reserve_in as u128 * BPS_DENOMINATOR as u128 + amount_in_with_fee;
    let amount_out = mul_div_wide(amount_in_with_fee, reserve_out as u128, denominator)?;

    u64::try_from(amount_out).map_err(|_| error!(VaultError::MathOverflow))
}

/// Amount of a single-sided deposit to swap so that the remainder and the
/// swap output match the post-swap reserve ratio
///
/// Closed-form root of the quadratic from the constant-product fee formula:
///
/// S = (sqrt(r * (r * (10000 + F)^2 + X * 4 * F * 10000)) - r * (10000 + F)) / (2 * F)
///
/// For a 30 bps pool this is `(sqrt(r * (r * 3988009 + X * 3988000)) - r * 1997) / 1994`
/// scaled by ten.
pub fn get_swap_amount(reserve_in: u64, amount_in: u64, fee_bps: u16) -> Result<u64> {
    require!(reserve_in > 0, VaultError::EmptyPool);
    require!((fee_bps as u64) < BPS_DENOMINATOR, VaultError::InvalidSwapFee);

    let bps = BPS_DENOMINATOR as u128;
    let fee_factor = bps - fee_bps as u128;
    let reserve = reserve_in as u128;
    let sum = bps + fee_factor;

    // Both terms stay below 2^93 for u64 inputs
    let inner = reserve * (sum * sum) + amount_in as u128 * (4 * fee_factor * bps);
    let root = isqrt_product(inner, reserve)?;
    // root >= reserve * sum since the radicand is at least (reserve * sum)^2
    let swap = (root - reserve * sum) / (2 * fee_factor);

    u64::try_from(swap).map_err(|_| error!(VaultError::MathOverflow))
}

/// Plan the token A -> token B swap for a single-sided deposit of `amount`
pub fn plan_single_sided(pool: &PoolState, amount: u64, fee_bps: u16) -> Result<SwapPlan> {
    pool.ensure_liquid()?;

    let swap_in = get_swap_amount(pool.reserve_a, amount, fee_bps)?;
    let swap_out = get_amount_out(swap_in, pool.reserve_a, pool.reserve_b, fee_bps)?;

    let post_swap = PoolState {
        reserve_a: pool
            .reserve_a
            .checked_add(swap_in)
            .ok_or(error!(VaultError::MathOverflow))?,
        reserve_b: pool.reserve_b - swap_out,
        total_pool_shares: pool.total_pool_shares,
    };

    Ok(SwapPlan {
        swap_in,
        swap_out,
        remaining_a: amount - swap_in,
        post_swap,
    })
}

/// Pool shares a single-sided deposit of `amount` would mint at `pool`
pub fn simulate_single_sided(pool: &PoolState, amount: u64, fee_bps: u16) -> Result<u64> {
    let plan = plan_single_sided(pool, amount, fee_bps)?;
    let (used_a, used_b) = plan
        .post_swap
        .matched_contribution(plan.remaining_a, plan.swap_out)?;
    plan.post_swap.assets_to_shares(used_a, used_b)
}

/// Smallest single-sided deposit whose simulated mint covers `pool_shares`
///
/// Exponential search for an upper bound, then bisection.
pub fn single_sided_amount_for_shares(
    pool: &PoolState,
    pool_shares: u64,
    fee_bps: u16,
) -> Result<u64> {
    pool.ensure_liquid()?;

    let mut high = pool.pool_shares_to_nominal(pool_shares)?.max(1);
    while simulate_single_sided(pool, high, fee_bps)? < pool_shares {
        high = high.checked_mul(2).ok_or(error!(VaultError::MathOverflow))?;
    }

    let mut low = high / 2;
    while low < high {
        let mid = low + (high - low) / 2;
        if simulate_single_sided(pool, mid, fee_bps)? >= pool_shares {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    Ok(high)
}

/// `floor(sqrt(a * b))`, widening to `BigUint` when the product leaves u128
pub fn isqrt_product(a: u128, b: u128) -> Result<u128> {
    match a.checked_mul(b) {
        Some(product) => Ok(isqrt(product)),
        None => {
            let root = (BigUint::from(a) * BigUint::from(b)).sqrt();
            u128::try_from(root).map_err(|_| error!(VaultError::MathOverflow))
        }
    }
}

/// Integer square root (floor), Newton iteration
pub fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }

    let mut x = value / 2 + 1;
    let mut y = (x + value / x) / 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}
