//! Deterministic in-memory pool and ledgers for engine tests.
#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use anchor_lang::prelude::*;
use lp_vault::{
    constants::*,
    engine::VaultEngine,
    errors::VaultError,
    harvest::{HarvestRoute, RewardHarvester},
    ledger::{ShareLedger, TokenLedger},
    math::get_amount_out,
    pool::{AddLiquidityRequest, Checkpoint, LiquidityAdded, Pool, RemoveLiquidityRequest},
    state::{VaultMode, VaultState},
};

/// Everything the pool and ledgers mutate, shared so one snapshot covers all
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct World {
    /// (mint, owner) -> balance
    pub balances: HashMap<(Pubkey, Pubkey), u64>,
    pub shares: HashMap<Pubkey, u64>,
    pub share_supply: u64,
    /// (owner, spender) -> allowance, u64::MAX is unlimited
    pub allowances: HashMap<(Pubkey, Pubkey), u64>,
    pub reserve_0: u64,
    pub reserve_1: u64,
    pub pool_supply: u64,
    pub clock: i64,
}

impl World {
    pub fn balance(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.balances.get(&(*mint, *owner)).copied().unwrap_or(0)
    }

    fn credit(&mut self, mint: &Pubkey, owner: &Pubkey, amount: u64) {
        *self.balances.entry((*mint, *owner)).or_insert(0) += amount;
    }

    fn debit(&mut self, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Result<()> {
        let balance = self.balances.entry((*mint, *owner)).or_insert(0);
        require!(*balance >= amount, VaultError::InsufficientBalance);
        *balance -= amount;
        Ok(())
    }
}

pub type SharedWorld = Rc<RefCell<World>>;

/// Uniswap-V2-style pool over `World`
pub struct MockPool {
    pub world: SharedWorld,
    pub token_0: Pubkey,
    pub token_1: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_bps: u16,
    /// Adverse execution applied to liquidity outputs, in bps
    pub adverse_bps: u64,
    /// Seconds between quote and execution
    pub execution_delay: i64,
    /// Account swaps settle against
    pub trader: Pubkey,
}

impl MockPool {
    fn check_deadline(&self, deadline: i64) -> Result<()> {
        let executed_at = self.world.borrow().clock + self.execution_delay;
        require!(executed_at <= deadline, VaultError::DeadlineExceeded);
        Ok(())
    }

    fn adverse(&self, amount: u64) -> u64 {
        amount * (BPS_DENOMINATOR - self.adverse_bps) / BPS_DENOMINATOR
    }
}

impl Pool for MockPool {
    fn tokens(&self) -> (Pubkey, Pubkey) {
        (self.token_0, self.token_1)
    }

    fn reserves(&self) -> Result<(u64, u64)> {
        let world = self.world.borrow();
        Ok((world.reserve_0, world.reserve_1))
    }

    fn total_shares(&self) -> Result<u64> {
        Ok(self.world.borrow().pool_supply)
    }

    fn add_liquidity(&mut self, request: AddLiquidityRequest) -> Result<LiquidityAdded> {
        self.check_deadline(request.deadline)?;
        let (r0, r1, supply) = {
            let world = self.world.borrow();
            (world.reserve_0 as u128, world.reserve_1 as u128, world.pool_supply as u128)
        };
        require!(r0 > 0 && r1 > 0 && supply > 0, VaultError::EmptyPool);

        let optimal_1 = (request.amount_0 as u128 * r1 / r0) as u64;
        let (used_0, used_1) = if optimal_1 <= request.amount_1 {
            (request.amount_0, optimal_1)
        } else {
            ((request.amount_1 as u128 * r0 / r1) as u64, request.amount_1)
        };
        let (used_0, used_1) = (self.adverse(used_0), self.adverse(used_1));
        require!(
            used_0 >= request.min_0 && used_1 >= request.min_1,
            VaultError::SlippageExceeded
        );

        let minted = ((used_0 as u128 * supply / r0).min(used_1 as u128 * supply / r1)) as u64;
        require!(minted > 0, VaultError::ZeroShares);

        let mut world = self.world.borrow_mut();
        world.debit(&self.token_0, &request.recipient, used_0)?;
        world.debit(&self.token_1, &request.recipient, used_1)?;
        world.reserve_0 += used_0;
        world.reserve_1 += used_1;
        world.pool_supply += minted;
        world.credit(&self.lp_mint, &request.recipient, minted);

        Ok(LiquidityAdded {
            used_0,
            used_1,
            pool_shares: minted,
        })
    }

    fn remove_liquidity(&mut self, request: RemoveLiquidityRequest) -> Result<(u64, u64)> {
        self.check_deadline(request.deadline)?;
        let mut world = self.world.borrow_mut();
        require!(world.pool_supply > 0, VaultError::EmptyPool);

        let supply = world.pool_supply as u128;
        let shares = request.pool_shares as u128;
        let amount_0 = self.adverse((shares * world.reserve_0 as u128 / supply) as u64);
        let amount_1 = self.adverse((shares * world.reserve_1 as u128 / supply) as u64);
        require!(
            amount_0 >= request.min_0 && amount_1 >= request.min_1,
            VaultError::SlippageExceeded
        );

        world.debit(&self.lp_mint, &request.recipient, request.pool_shares)?;
        world.pool_supply -= request.pool_shares;
        world.reserve_0 -= amount_0;
        world.reserve_1 -= amount_1;
        world.credit(&self.token_0, &request.recipient, amount_0);
        world.credit(&self.token_1, &request.recipient, amount_1);

        Ok((amount_0, amount_1))
    }

    fn swap_exact_in(
        &mut self,
        amount_in: u64,
        token_in: Pubkey,
        token_out: Pubkey,
    ) -> Result<u64> {
        let mut world = self.world.borrow_mut();
        let zero_for_one = token_in == self.token_0;
        let (reserve_in, reserve_out) = if zero_for_one {
            (world.reserve_0, world.reserve_1)
        } else {
            (world.reserve_1, world.reserve_0)
        };
        let amount_out = get_amount_out(amount_in, reserve_in, reserve_out, self.fee_bps)?;

        world.debit(&token_in, &self.trader, amount_in)?;
        world.credit(&token_out, &self.trader, amount_out);
        if zero_for_one {
            world.reserve_0 += amount_in;
            world.reserve_1 -= amount_out;
        } else {
            world.reserve_1 += amount_in;
            world.reserve_0 -= amount_out;
        }
        Ok(amount_out)
    }
}

impl Checkpoint for MockPool {
    type Snapshot = World;

    fn checkpoint(&self) -> World {
        self.world.borrow().clone()
    }

    fn rollback(&mut self, snapshot: World) {
        *self.world.borrow_mut() = snapshot;
    }
}

/// Token and share ledgers over `World`; the vault side is `vault`
pub struct MockLedger {
    pub world: SharedWorld,
    pub vault: Pubkey,
}

impl TokenLedger for MockLedger {
    fn pull(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()> {
        let mut world = self.world.borrow_mut();
        world.debit(mint, from, amount)?;
        world.credit(mint, &self.vault, amount);
        Ok(())
    }

    fn push(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let mut world = self.world.borrow_mut();
        world.debit(mint, &self.vault, amount)?;
        world.credit(mint, to, amount);
        Ok(())
    }
}

impl ShareLedger for MockLedger {
    fn mint_shares(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        let mut world = self.world.borrow_mut();
        *world.shares.entry(*to).or_insert(0) += amount;
        world.share_supply += amount;
        Ok(())
    }

    fn burn_shares(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        let mut world = self.world.borrow_mut();
        let balance = world.shares.entry(*from).or_insert(0);
        require!(*balance >= amount, VaultError::InsufficientBalance);
        *balance -= amount;
        world.share_supply -= amount;
        Ok(())
    }

    fn spend_allowance(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) -> Result<()> {
        let mut world = self.world.borrow_mut();
        let allowance = world.allowances.entry((*owner, *spender)).or_insert(0);
        if *allowance == u64::MAX {
            return Ok(());
        }
        require!(*allowance >= amount, VaultError::InsufficientAllowance);
        *allowance -= amount;
        Ok(())
    }
}

impl Checkpoint for MockLedger {
    type Snapshot = World;

    fn checkpoint(&self) -> World {
        self.world.borrow().clone()
    }

    fn rollback(&mut self, snapshot: World) {
        *self.world.borrow_mut() = snapshot;
    }
}

/// Credits a fixed token A amount to the vault on every harvest
pub struct MockHarvester {
    pub world: SharedWorld,
    pub token_a: Pubkey,
    pub amount: u64,
    /// Rewards claimed so far
    pub claimed: u64,
}

impl MockHarvester {
    pub fn new(h: &Harness, amount: u64) -> Self {
        Self {
            world: h.world.clone(),
            token_a: h.token_a,
            amount,
            claimed: 0,
        }
    }
}

impl RewardHarvester for MockHarvester {
    fn harvest(&mut self, _route: &HarvestRoute, vault: &Pubkey) -> Result<u64> {
        self.world.borrow_mut().credit(&self.token_a, vault, self.amount);
        self.claimed += self.amount;
        Ok(self.amount)
    }
}

impl Checkpoint for MockHarvester {
    type Snapshot = u64;

    fn checkpoint(&self) -> u64 {
        self.claimed
    }

    fn rollback(&mut self, snapshot: u64) {
        self.claimed = snapshot;
    }
}

/// A vault wired to a mock pool seeded with `(reserve_a, reserve_b, supply)`
pub struct Harness {
    pub world: SharedWorld,
    pub pool: MockPool,
    pub ledger: MockLedger,
    pub state: VaultState,
    pub token_a: Pubkey,
    pub token_b: Pubkey,
    pub lp_mint: Pubkey,
    pub manager: Pubkey,
    pub vault_authority: Pubkey,
}

impl Harness {
    pub fn new(mode: VaultMode, reserve_a: u64, reserve_b: u64, supply: u64) -> Self {
        Self::build(mode, reserve_a, reserve_b, supply, false)
    }

    /// Same pool, but the AMM lists token B first
    pub fn reversed(mode: VaultMode, reserve_a: u64, reserve_b: u64, supply: u64) -> Self {
        Self::build(mode, reserve_a, reserve_b, supply, true)
    }

    fn build(mode: VaultMode, reserve_a: u64, reserve_b: u64, supply: u64, reversed: bool) -> Self {
        let token_a = Pubkey::new_unique();
        let token_b = Pubkey::new_unique();
        let lp_mint = Pubkey::new_unique();
        let manager = Pubkey::new_unique();
        let vault_authority = Pubkey::new_unique();

        let (token_0, token_1, reserve_0, reserve_1) = if reversed {
            (token_b, token_a, reserve_b, reserve_a)
        } else {
            (token_a, token_b, reserve_a, reserve_b)
        };

        let world = Rc::new(RefCell::new(World {
            reserve_0,
            reserve_1,
            pool_supply: supply,
            clock: 1_700_000_000,
            ..World::default()
        }));

        let state = VaultState {
            manager,
            token_a_mint: token_a,
            token_b_mint: token_b,
            share_mint: Pubkey::new_unique(),
            pool: Pubkey::new_unique(),
            amm_program: Pubkey::new_unique(),
            mode,
            slippage_tolerance: 9_950,
            deadline_window: DEFAULT_DEADLINE_WINDOW,
            swap_fee_bps: DEFAULT_SWAP_FEE_BPS,
            total_pool_shares: 0,
            total_shares: 0,
            bump: 0,
            share_bump: 0,
            authority_bump: 0,
            _reserved: [0; 64],
        };

        Self {
            pool: MockPool {
                world: world.clone(),
                token_0,
                token_1,
                lp_mint,
                fee_bps: DEFAULT_SWAP_FEE_BPS,
                adverse_bps: 0,
                execution_delay: 0,
                trader: vault_authority,
            },
            ledger: MockLedger {
                world: world.clone(),
                vault: vault_authority,
            },
            world,
            state,
            token_a,
            token_b,
            lp_mint,
            manager,
            vault_authority,
        }
    }

    pub fn engine(&mut self) -> VaultEngine<'_, MockPool, MockLedger> {
        let now = self.world.borrow().clock;
        VaultEngine::new(
            &mut self.state,
            &mut self.pool,
            &mut self.ledger,
            self.vault_authority,
            now,
        )
    }

    pub fn fund(&self, mint: &Pubkey, owner: &Pubkey, amount: u64) {
        self.world.borrow_mut().credit(mint, owner, amount);
    }

    pub fn balance(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.world.borrow().balance(mint, owner)
    }

    pub fn shares_of(&self, owner: &Pubkey) -> u64 {
        self.world.borrow().shares.get(owner).copied().unwrap_or(0)
    }

    pub fn approve(&self, owner: &Pubkey, spender: &Pubkey, amount: u64) {
        self.world
            .borrow_mut()
            .allowances
            .insert((*owner, *spender), amount);
    }

    pub fn snapshot(&self) -> World {
        self.world.borrow().clone()
    }

    /// New user holding `amount_a` token A and `amount_b` token B
    pub fn user(&self, amount_a: u64, amount_b: u64) -> Pubkey {
        let user = Pubkey::new_unique();
        self.fund(&self.token_a, &user, amount_a);
        self.fund(&self.token_b, &user, amount_b);
        user
    }
}

/// Assert `result` failed with `expected`
pub fn assert_vault_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(error)) => {
            assert_eq!(error.error_name, expected.name(), "unexpected vault error");
        }
        other => panic!("expected {}, got {:?}", expected.name(), other),
    }
}
