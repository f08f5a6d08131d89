use anchor_lang::prelude::*;

use super::{mul_div, mul_div_up};
use crate::errors::VaultError;

/// Snapshot of the pool read at the start of an operation
///
/// Reserves are in canonical (token A, token B) order. Never cached across
/// operations: every quote is computed from a snapshot taken by the same
/// operation that consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolState {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_pool_shares: u64,
}

impl PoolState {
    pub fn new(reserve_a: u64, reserve_b: u64, total_pool_shares: u64) -> Self {
        Self {
            reserve_a,
            reserve_b,
            total_pool_shares,
        }
    }

    /// Fails with `EmptyPool` instead of letting a conversion divide by zero
    pub fn ensure_liquid(&self) -> Result<()> {
        require!(
            self.total_pool_shares > 0 && self.reserve_a > 0 && self.reserve_b > 0,
            VaultError::EmptyPool
        );
        Ok(())
    }

    /// Token amounts backing `pool_shares`, floored per token
    pub fn shares_to_assets(&self, pool_shares: u64) -> Result<(u64, u64)> {
        self.ensure_liquid()?;
        let amount_a = mul_div(self.reserve_a, pool_shares, self.total_pool_shares)?;
        let amount_b = mul_div(self.reserve_b, pool_shares, self.total_pool_shares)?;
        Ok((amount_a, amount_b))
    }

    /// Token amounts a depositor must supply to be owed `pool_shares`
    ///
    /// Rounded up so that `assets_to_shares` of the result is never below
    /// `pool_shares`.
    pub fn shares_to_assets_rounding_up(&self, pool_shares: u64) -> Result<(u64, u64)> {
        self.ensure_liquid()?;
        let amount_a = mul_div_up(self.reserve_a, pool_shares, self.total_pool_shares)?;
        let amount_b = mul_div_up(self.reserve_b, pool_shares, self.total_pool_shares)?;
        Ok((amount_a, amount_b))
    }

    /// Pool shares minted for a two-token contribution
    ///
    /// Only the limiting token counts; the caller is expected to have
    /// balanced the inputs already.
    pub fn assets_to_shares(&self, amount_a: u64, amount_b: u64) -> Result<u64> {
        self.ensure_liquid()?;
        let from_a = mul_div(amount_a, self.total_pool_shares, self.reserve_a)?;
        let from_b = mul_div(amount_b, self.total_pool_shares, self.reserve_b)?;
        Ok(from_a.min(from_b))
    }

    /// Amounts a router-style pool actually takes from an (A, B) offer: the
    /// full side whose optimal counterpart fits, and that counterpart
    pub fn matched_contribution(&self, amount_a: u64, amount_b: u64) -> Result<(u64, u64)> {
        self.ensure_liquid()?;
        let optimal_b = quote(amount_a, self.reserve_a, self.reserve_b)?;
        if optimal_b <= amount_b {
            return Ok((amount_a, optimal_b));
        }
        Ok((quote(amount_b, self.reserve_b, self.reserve_a)?, amount_b))
    }

    /// Smallest (A, B) offer whose matched contribution mints at least
    /// `pool_shares`
    ///
    /// Token A is sized so that both the A leg and the floored B counterpart
    /// clear their per-token share minimums; token B is that counterpart, so
    /// the pool takes the offer whole.
    pub fn contribution_for_shares(&self, pool_shares: u64) -> Result<(u64, u64)> {
        self.ensure_liquid()?;
        let min_a = mul_div_up(pool_shares, self.reserve_a, self.total_pool_shares)?;
        let min_b = mul_div_up(pool_shares, self.reserve_b, self.total_pool_shares)?;

        let amount_a = min_a.max(mul_div_up(min_b, self.reserve_a, self.reserve_b)?);
        let amount_b = quote(amount_a, self.reserve_a, self.reserve_b)?;
        Ok((amount_a, amount_b))
    }

    /// Spot-price value of `amount_b` token B expressed in token A
    pub fn quote_b_in_a(&self, amount_b: u64) -> Result<u64> {
        self.ensure_liquid()?;
        quote(amount_b, self.reserve_b, self.reserve_a)
    }

    /// Value of a pool position expressed in the nominal asset (token A)
    ///
    /// Upper-bound estimate: realising it needs a swap that moves the price.
    /// A position with no token-B leg is valued at zero.
    pub fn pool_shares_to_nominal(&self, pool_shares: u64) -> Result<u64> {
        let (amount_a, amount_b) = self.shares_to_assets(pool_shares)?;
        if amount_b == 0 {
            return Ok(0);
        }

        amount_a
            .checked_add(self.quote_b_in_a(amount_b)?)
            .ok_or(error!(VaultError::MathOverflow))
    }

    /// Smallest pool-share amount, at most `max_pool_shares`, whose nominal
    /// value covers `nominal`
    pub fn nominal_to_pool_shares(&self, nominal: u64, max_pool_shares: u64) -> Result<u64> {
        self.ensure_liquid()?;
        require!(
            self.pool_shares_to_nominal(max_pool_shares)? >= nominal,
            VaultError::ExceedsHoldings
        );

        // pool_shares_to_nominal is non-decreasing in its argument
        let (mut low, mut high) = (0u64, max_pool_shares);
        while low < high {
            let mid = low + (high - low) / 2;
            if self.pool_shares_to_nominal(mid)? >= nominal {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        Ok(high)
    }
}

/// Constant-product spot conversion: `amount * reserve_out / reserve_in`
pub fn quote(amount: u64, reserve_in: u64, reserve_out: u64) -> Result<u64> {
    require!(reserve_in > 0 && reserve_out > 0, VaultError::EmptyPool);
    mul_div(amount, reserve_out, reserve_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportional_withdrawal_exact() {
        let pool = PoolState::new(1000, 2000, 100);
        assert_eq!(pool.shares_to_assets(10).unwrap(), (100, 200));
    }

    #[test]
    fn test_proportional_withdrawal_floors() {
        // 10 * 2001 / 100 = 200.1
        let pool = PoolState::new(1000, 2001, 100);
        assert_eq!(pool.shares_to_assets(10).unwrap(), (100, 200));
        assert_eq!(pool.shares_to_assets_rounding_up(10).unwrap(), (100, 201));
    }

    #[test]
    fn test_assets_to_shares_picks_limiting_token() {
        let pool = PoolState::new(1000, 2000, 100);
        // token B is the binding side: 150 * 100 / 2000 = 7
        assert_eq!(pool.assets_to_shares(100, 150).unwrap(), 7);
        assert_eq!(pool.assets_to_shares(100, 200).unwrap(), 10);
    }

    #[test]
    fn test_empty_pool_guard() {
        let pool = PoolState::new(1000, 2000, 0);
        assert!(pool.shares_to_assets(10).is_err());
        assert!(pool.shares_to_assets_rounding_up(10).is_err());
        assert!(pool.assets_to_shares(10, 10).is_err());
        assert!(pool.pool_shares_to_nominal(10).is_err());
        assert!(pool.quote_b_in_a(10).is_err());
    }

    #[test]
    fn test_matched_contribution_keeps_pool_ratio() {
        let pool = PoolState::new(1000, 2000, 100);
        assert_eq!(pool.matched_contribution(100, 500).unwrap(), (100, 200));
        // B is short: 150 * 1000 / 2000 = 75
        assert_eq!(pool.matched_contribution(100, 150).unwrap(), (75, 150));
    }

    #[test]
    fn test_contribution_for_shares_survives_matching() {
        // Rounding both legs up gives (100, 201), which the pool trims to
        // (100, 200) and mints only 9
        let pool = PoolState::new(1000, 2001, 100);
        let (amount_a, amount_b) = pool.contribution_for_shares(10).unwrap();
        assert_eq!((amount_a, amount_b), (101, 202));

        let (used_a, used_b) = pool.matched_contribution(amount_a, amount_b).unwrap();
        assert_eq!((used_a, used_b), (amount_a, amount_b));
        assert_eq!(pool.assets_to_shares(used_a, used_b).unwrap(), 10);
    }

    #[test]
    fn test_contribution_for_shares_exact_pool() {
        let pool = PoolState::new(1000, 2000, 100);
        assert_eq!(pool.contribution_for_shares(10).unwrap(), (100, 200));
    }

    #[test]
    fn test_nominal_value() {
        let pool = PoolState::new(1000, 2000, 100);
        // (100, 200) -> 100 + 200 * 1000 / 2000
        assert_eq!(pool.pool_shares_to_nominal(10).unwrap(), 200);
    }

    #[test]
    fn test_nominal_value_without_b_leg_is_zero() {
        // 1 share backs (1000, 0) after flooring token B
        let pool = PoolState::new(100_000, 50, 100);
        assert_eq!(pool.shares_to_assets(1).unwrap(), (1000, 0));
        assert_eq!(pool.pool_shares_to_nominal(1).unwrap(), 0);
    }

    #[test]
    fn test_nominal_to_pool_shares_is_minimal() {
        let pool = PoolState::new(1000, 2000, 100);
        let shares = pool.nominal_to_pool_shares(200, 100).unwrap();
        assert_eq!(shares, 10);
        assert!(pool.pool_shares_to_nominal(shares - 1).unwrap() < 200);

        // 201 needs one more share
        assert_eq!(pool.nominal_to_pool_shares(201, 100).unwrap(), 11);
    }

    #[test]
    fn test_nominal_to_pool_shares_respects_holdings() {
        let pool = PoolState::new(1000, 2000, 100);
        assert!(pool.nominal_to_pool_shares(201, 10).is_err());
    }
}
