use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    math::minimum_accepted,
    pool::{AddLiquidityRequest, Orientation, Pool, RemoveLiquidityRequest},
};

/// Liquidity added, in canonical (A, B) order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Provided {
    pub used_a: u64,
    pub used_b: u64,
    pub pool_shares: u64,
}

/// Slippage- and deadline-bounded add/remove liquidity against a pool
pub struct LiquidityProvisioner {
    pub orientation: Orientation,
    pub slippage_tolerance: u16,
    pub recipient: Pubkey,
    pub deadline: i64,
}

impl LiquidityProvisioner {
    pub fn provide<P: Pool>(&self, pool: &mut P, amount_a: u64, amount_b: u64) -> Result<Provided> {
        let min_a = minimum_accepted(amount_a, self.slippage_tolerance)?;
        let min_b = minimum_accepted(amount_b, self.slippage_tolerance)?;

        let (amount_0, amount_1) = self.orientation.order(amount_a, amount_b);
        let (min_0, min_1) = self.orientation.order(min_a, min_b);

        let added = pool.add_liquidity(AddLiquidityRequest {
            amount_0,
            amount_1,
            min_0,
            min_1,
            recipient: self.recipient,
            deadline: self.deadline,
        })?;

        let (used_a, used_b) = self.orientation.order(added.used_0, added.used_1);
        require!(used_a >= min_a && used_b >= min_b, VaultError::SlippageExceeded);

        Ok(Provided {
            used_a,
            used_b,
            pool_shares: added.pool_shares,
        })
    }

    /// Burn `pool_shares` and return the (A, B) amounts received
    pub fn withdraw_liquidity<P: Pool>(
        &self,
        pool: &mut P,
        pool_shares: u64,
        expected_a: u64,
        expected_b: u64,
    ) -> Result<(u64, u64)> {
        let min_a = minimum_accepted(expected_a, self.slippage_tolerance)?;
        let min_b = minimum_accepted(expected_b, self.slippage_tolerance)?;
        let (min_0, min_1) = self.orientation.order(min_a, min_b);

        let (amount_0, amount_1) = pool.remove_liquidity(RemoveLiquidityRequest {
            pool_shares,
            min_0,
            min_1,
            recipient: self.recipient,
            deadline: self.deadline,
        })?;

        let (amount_a, amount_b) = self.orientation.order(amount_0, amount_1);
        require!(amount_a >= min_a && amount_b >= min_b, VaultError::SlippageExceeded);

        Ok((amount_a, amount_b))
    }
}
