use anchor_lang::prelude::*;

use crate::{errors::VaultError, math::PoolState};

/// Add-liquidity request in the pool's own token order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddLiquidityRequest {
    pub amount_0: u64,
    pub amount_1: u64,
    pub min_0: u64,
    pub min_1: u64,
    pub recipient: Pubkey,
    pub deadline: i64,
}

/// Amounts actually consumed by the pool and the pool shares minted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidityAdded {
    pub used_0: u64,
    pub used_1: u64,
    pub pool_shares: u64,
}

/// Remove-liquidity request in the pool's own token order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveLiquidityRequest {
    pub pool_shares: u64,
    pub min_0: u64,
    pub min_1: u64,
    pub recipient: Pubkey,
    pub deadline: i64,
}

/// Constant-product pool the vault provides liquidity to
///
/// Implementations move tokens between the pool and the vault's own
/// accounts and must reject, without side effects, any call whose output
/// falls below the given minimums or that executes after `deadline`.
pub trait Pool {
    /// Token mints in the pool's internal order
    fn tokens(&self) -> (Pubkey, Pubkey);

    /// Reserves in the pool's internal order
    fn reserves(&self) -> Result<(u64, u64)>;

    /// Total pool-share supply
    fn total_shares(&self) -> Result<u64>;

    fn add_liquidity(&mut self, request: AddLiquidityRequest) -> Result<LiquidityAdded>;

    /// Returns the token amounts received, in pool order
    fn remove_liquidity(&mut self, request: RemoveLiquidityRequest) -> Result<(u64, u64)>;

    /// Swap an exact input of `token_in` for the other pool token
    fn swap_exact_in(
        &mut self,
        amount_in: u64,
        token_in: Pubkey,
        token_out: Pubkey,
    ) -> Result<u64>;
}

/// Snapshot and restore for collaborators an operation mutates
///
/// Off-chain this is what makes an operation all-or-nothing; on-chain the
/// runtime reverts the transaction, so adapters use `()` snapshots.
pub trait Checkpoint {
    type Snapshot;

    fn checkpoint(&self) -> Self::Snapshot;

    fn rollback(&mut self, snapshot: Self::Snapshot);
}

/// How the pool orders the vault's canonical (A, B) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Pool token 0 is token A
    Aligned,
    /// Pool token 0 is token B
    Reversed,
}

impl Orientation {
    pub fn detect(
        pool_tokens: (Pubkey, Pubkey),
        token_a: &Pubkey,
        token_b: &Pubkey,
    ) -> Result<Self> {
        match pool_tokens {
            (t0, t1) if t0 == *token_a && t1 == *token_b => Ok(Orientation::Aligned),
            (t0, t1) if t0 == *token_b && t1 == *token_a => Ok(Orientation::Reversed),
            _ => err!(VaultError::InvalidPoolTokens),
        }
    }

    /// Reorder a pair between canonical and pool order (the mapping is its
    /// own inverse)
    pub fn order<T>(self, first: T, second: T) -> (T, T) {
        match self {
            Orientation::Aligned => (first, second),
            Orientation::Reversed => (second, first),
        }
    }
}

/// Reads pool reserves in canonical order
pub struct ReserveOracle<'a, P: Pool> {
    pool: &'a P,
    orientation: Orientation,
}

impl<'a, P: Pool> ReserveOracle<'a, P> {
    pub fn new(pool: &'a P, orientation: Orientation) -> Self {
        Self { pool, orientation }
    }

    /// `(reserve_a, reserve_b)`
    pub fn reserves(&self) -> Result<(u64, u64)> {
        let (reserve_0, reserve_1) = self.pool.reserves()?;
        Ok(self.orientation.order(reserve_0, reserve_1))
    }

    pub fn total_pool_shares(&self) -> Result<u64> {
        self.pool.total_shares()
    }

    /// Fresh snapshot; `EmptyPool` when the pool cannot be quoted against
    pub fn read(&self) -> Result<PoolState> {
        let (reserve_a, reserve_b) = self.reserves()?;
        let state = PoolState::new(reserve_a, reserve_b, self.total_pool_shares()?);
        state.ensure_liquid()?;
        Ok(state)
    }
}
