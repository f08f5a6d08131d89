use anchor_lang::prelude::*;

use crate::{
    math::{plan_single_sided, PoolState},
    pool::Pool,
};

/// Swaps part of a single-sided token A amount into token B
pub struct SwapRebalancer {
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub swap_fee_bps: u16,
}

impl SwapRebalancer {
    /// Returns `(token A left, token B received)`
    ///
    /// The swap leg carries no output floor; only the following liquidity
    /// add is slippage-bounded.
    pub fn rebalance<P: Pool>(
        &self,
        pool: &mut P,
        pool_state: &PoolState,
        amount: u64,
    ) -> Result<(u64, u64)> {
        let plan = plan_single_sided(pool_state, amount, self.swap_fee_bps)?;
        if plan.swap_in == 0 {
            return Ok((amount, 0));
        }

        let received = pool.swap_exact_in(plan.swap_in, self.token_a, self.token_b)?;
        Ok((plan.remaining_a, received))
    }
}
