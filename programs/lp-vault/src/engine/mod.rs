//! Vault operations: deposit, mint, withdraw, redeem, compound.
//!
//! Every operation reads the pool once, quotes against that snapshot, talks
//! to the pool, and only then touches the share ledger. Failures restore the
//! vault state and both collaborators to their pre-operation checkpoint.

pub mod liquidity;
pub mod rebalancer;

pub use liquidity::*;
pub use rebalancer::*;

use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    harvest::{HarvestConfig, RewardHarvester},
    ledger::{ShareLedger, TokenLedger},
    math::{mul_div, simulate_single_sided, single_sided_amount_for_shares, PoolState},
    pool::{Checkpoint, Orientation, Pool, ReserveOracle},
    state::{VaultMode, VaultState},
};

/// Runs vault operations against a pool and the token/share ledgers
///
/// Holds exclusive borrows of everything it mutates, so one engine is one
/// in-flight operation per vault.
pub struct VaultEngine<'a, P, L> {
    state: &'a mut VaultState,
    pool: &'a mut P,
    ledger: &'a mut L,
    vault_authority: Pubkey,
    now: i64,
}

impl<'a, P, L> VaultEngine<'a, P, L>
where
    P: Pool + Checkpoint,
    L: TokenLedger + ShareLedger + Checkpoint,
{
    pub fn new(
        state: &'a mut VaultState,
        pool: &'a mut P,
        ledger: &'a mut L,
        vault_authority: Pubkey,
        now: i64,
    ) -> Self {
        Self {
            state,
            pool,
            ledger,
            vault_authority,
            now,
        }
    }

    pub fn state(&self) -> &VaultState {
        &*self.state
    }

    fn orientation(&self) -> Result<Orientation> {
        Orientation::detect(
            self.pool.tokens(),
            &self.state.token_a_mint,
            &self.state.token_b_mint,
        )
    }

    /// Fresh canonical pool snapshot
    pub fn read_pool(&self) -> Result<PoolState> {
        ReserveOracle::new(&*self.pool, self.orientation()?).read()
    }

    fn provisioner(&self) -> Result<LiquidityProvisioner> {
        Ok(LiquidityProvisioner {
            orientation: self.orientation()?,
            slippage_tolerance: self.state.slippage_tolerance,
            recipient: self.vault_authority,
            deadline: self.state.deadline(self.now)?,
        })
    }

    fn rebalancer(&self) -> SwapRebalancer {
        SwapRebalancer {
            token_a: self.state.token_a_mint,
            token_b: self.state.token_b_mint,
            swap_fee_bps: self.state.swap_fee_bps,
        }
    }

    // ---------------------------------------------------------------------
    // Quotes
    // ---------------------------------------------------------------------

    /// Value of the vault's whole position in nominal units
    pub fn total_assets(&self) -> Result<u64> {
        if self.state.total_pool_shares == 0 {
            return Ok(0);
        }
        match self.state.mode {
            VaultMode::TwoAsset => Ok(self.state.total_pool_shares),
            VaultMode::SingleAsset => self
                .read_pool()?
                .pool_shares_to_nominal(self.state.total_pool_shares),
        }
    }

    pub fn convert_to_shares(&self, assets: u64) -> Result<u64> {
        let total_assets = self.total_assets()?;
        if self.state.total_shares == 0 || total_assets == 0 {
            return Ok(assets);
        }
        mul_div(assets, self.state.total_shares, total_assets)
    }

    pub fn convert_to_assets(&self, shares: u64) -> Result<u64> {
        if self.state.total_shares == 0 {
            return Ok(0);
        }
        mul_div(shares, self.total_assets()?, self.state.total_shares)
    }

    /// Shares `deposit(assets)` would mint at current reserves
    pub fn preview_deposit(&self, assets: u64) -> Result<u64> {
        let pool_state = self.read_pool()?;
        let pool_shares = match self.state.mode {
            VaultMode::TwoAsset => {
                let (amount_a, amount_b) = pool_state.shares_to_assets(assets)?;
                pool_state.assets_to_shares(amount_a, amount_b)?
            }
            VaultMode::SingleAsset => {
                simulate_single_sided(&pool_state, assets, self.state.swap_fee_bps)?
            }
        };
        self.state.calculate_shares(pool_shares)
    }

    /// Nominal amount `mint(shares)` would pull
    pub fn preview_mint(&self, shares: u64) -> Result<u64> {
        let pool_state = self.read_pool()?;
        let pool_shares = self.state.calculate_pool_shares_rounding_up(shares)?;
        self.assets_for_pool_shares(&pool_state, pool_shares)
    }

    /// Shares `withdraw(assets)` would burn
    pub fn preview_withdraw(&self, assets: u64) -> Result<u64> {
        let pool_state = self.read_pool()?;
        let pool_shares = self.pool_shares_for_withdrawal(&pool_state, assets)?;
        self.state.calculate_shares_rounding_up(pool_shares)
    }

    /// Nominal value `redeem(shares)` releases
    pub fn preview_redeem(&self, shares: u64) -> Result<u64> {
        let pool_state = self.read_pool()?;
        let pool_shares = self.state.calculate_pool_shares(shares)?;
        self.nominal_value(&pool_state, pool_shares)
    }

    fn nominal_value(&self, pool_state: &PoolState, pool_shares: u64) -> Result<u64> {
        match self.state.mode {
            VaultMode::TwoAsset => Ok(pool_shares),
            VaultMode::SingleAsset => pool_state.pool_shares_to_nominal(pool_shares),
        }
    }

    fn assets_for_pool_shares(&self, pool_state: &PoolState, pool_shares: u64) -> Result<u64> {
        match self.state.mode {
            VaultMode::TwoAsset => Ok(pool_shares),
            VaultMode::SingleAsset => {
                single_sided_amount_for_shares(pool_state, pool_shares, self.state.swap_fee_bps)
            }
        }
    }

    fn pool_shares_for_withdrawal(&self, pool_state: &PoolState, assets: u64) -> Result<u64> {
        match self.state.mode {
            VaultMode::TwoAsset => {
                require!(
                    assets <= self.state.total_pool_shares,
                    VaultError::ExceedsHoldings
                );
                Ok(assets)
            }
            VaultMode::SingleAsset => {
                pool_state.nominal_to_pool_shares(assets, self.state.total_pool_shares)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Deposit `assets` nominal units from `caller`, minting shares to `receiver`
    pub fn deposit(&mut self, caller: &Pubkey, receiver: &Pubkey, assets: u64) -> Result<u64> {
        require!(assets > 0, VaultError::ZeroAmount);

        self.atomically(|engine| {
            let pool_state = engine.read_pool()?;
            let provided = match engine.state.mode {
                VaultMode::TwoAsset => {
                    let (amount_a, amount_b) = pool_state.shares_to_assets(assets)?;
                    engine.contribute_pair(caller, amount_a, amount_b)?
                }
                VaultMode::SingleAsset => engine.contribute_single(caller, &pool_state, assets)?,
            };

            let shares = engine.state.calculate_shares(provided.pool_shares)?;
            require!(shares > 0, VaultError::ZeroShares);

            engine.state.record_deposit(provided.pool_shares, shares)?;
            engine.ledger.mint_shares(receiver, shares)?;

            msg!(
                "Deposit: {} assets, {} pool shares, {} shares minted",
                assets,
                provided.pool_shares,
                shares
            );
            Ok(shares)
        })
    }

    /// Mint exactly `shares` to `receiver`, pulling the nominal amount they
    /// cost from `caller`; returns that amount
    pub fn mint(&mut self, caller: &Pubkey, receiver: &Pubkey, shares: u64) -> Result<u64> {
        require!(shares > 0, VaultError::ZeroAmount);

        self.atomically(|engine| {
            let pool_state = engine.read_pool()?;
            let pool_shares_needed = engine.state.calculate_pool_shares_rounding_up(shares)?;
            require!(pool_shares_needed > 0, VaultError::ZeroAssets);

            let assets = engine.assets_for_pool_shares(&pool_state, pool_shares_needed)?;
            let provided = match engine.state.mode {
                VaultMode::TwoAsset => {
                    let (amount_a, amount_b) =
                        pool_state.contribution_for_shares(pool_shares_needed)?;
                    engine.contribute_pair(caller, amount_a, amount_b)?
                }
                VaultMode::SingleAsset => engine.contribute_single(caller, &pool_state, assets)?,
            };
            require!(
                provided.pool_shares >= pool_shares_needed,
                VaultError::SlippageExceeded
            );

            engine.state.record_deposit(provided.pool_shares, shares)?;
            engine.ledger.mint_shares(receiver, shares)?;

            msg!("Mint: {} shares for {} assets", shares, assets);
            Ok(assets)
        })
    }

    /// Withdraw `assets` nominal units to `receiver`, burning `owner`'s
    /// shares; returns the shares burned
    ///
    /// Single-asset vaults pay out token A only; the token B leg released
    /// from the pool stays on the vault.
    pub fn withdraw(
        &mut self,
        caller: &Pubkey,
        receiver: &Pubkey,
        owner: &Pubkey,
        assets: u64,
    ) -> Result<u64> {
        require!(assets > 0, VaultError::ZeroAmount);

        self.atomically(|engine| {
            let pool_state = engine.read_pool()?;
            let pool_shares = engine.pool_shares_for_withdrawal(&pool_state, assets)?;
            let shares = engine.state.calculate_shares_rounding_up(pool_shares)?;
            require!(shares > 0, VaultError::ZeroShares);

            if caller != owner {
                engine.ledger.spend_allowance(owner, caller, shares)?;
            }

            let (amount_a, amount_b) = engine.release(&pool_state, pool_shares)?;

            engine.state.record_withdrawal(pool_shares, shares)?;
            engine.ledger.burn_shares(owner, shares)?;

            match engine.state.mode {
                VaultMode::TwoAsset => engine.pay_out_pair(receiver, amount_a, amount_b)?,
                VaultMode::SingleAsset => {
                    let token_a = engine.state.token_a_mint;
                    engine.ledger.push(&token_a, receiver, assets)?;
                }
            }

            msg!("Withdraw: {} assets, {} shares burned", assets, shares);
            Ok(shares)
        })
    }

    /// Burn exactly `shares` of `owner` and pay the released position to
    /// `receiver`; returns the nominal amount paid
    pub fn redeem(
        &mut self,
        caller: &Pubkey,
        receiver: &Pubkey,
        owner: &Pubkey,
        shares: u64,
    ) -> Result<u64> {
        require!(shares > 0, VaultError::ZeroAmount);

        self.atomically(|engine| {
            let pool_state = engine.read_pool()?;
            let pool_shares = engine.state.calculate_pool_shares(shares)?;
            require!(
                engine.nominal_value(&pool_state, pool_shares)? > 0,
                VaultError::ZeroAssets
            );

            if caller != owner {
                engine.ledger.spend_allowance(owner, caller, shares)?;
            }

            let (amount_a, amount_b) = engine.release(&pool_state, pool_shares)?;

            engine.state.record_withdrawal(pool_shares, shares)?;
            engine.ledger.burn_shares(owner, shares)?;

            let assets = match engine.state.mode {
                VaultMode::TwoAsset => {
                    engine.pay_out_pair(receiver, amount_a, amount_b)?;
                    pool_shares
                }
                VaultMode::SingleAsset => {
                    require!(amount_a > 0, VaultError::ZeroAssets);
                    let token_a = engine.state.token_a_mint;
                    engine.ledger.push(&token_a, receiver, amount_a)?;
                    amount_a
                }
            };

            msg!("Redeem: {} shares burned for {} assets", shares, assets);
            Ok(assets)
        })
    }

    /// Fold harvested rewards back into the position without minting shares;
    /// returns the pool shares added. A failed compound also rolls back the
    /// harvester's claim.
    pub fn compound<H: RewardHarvester + Checkpoint>(
        &mut self,
        caller: &Pubkey,
        config: &HarvestConfig,
        harvester: &mut H,
    ) -> Result<u64> {
        require_keys_eq!(*caller, self.state.manager, VaultError::Unauthorized);
        require_keys_eq!(*config.manager(), self.state.manager, VaultError::Unauthorized);
        require!(self.state.total_shares > 0, VaultError::ZeroShares);
        let route = config.route().ok_or(error!(VaultError::InvalidMint))?;

        let claimed = harvester.checkpoint();
        let result = self.atomically(|engine| {
            let harvested = harvester.harvest(route, &engine.vault_authority)?;
            require!(harvested > 0, VaultError::ZeroAssets);

            let pool_state = engine.read_pool()?;
            let provided = engine.provide_single(&pool_state, harvested)?;
            require!(provided.pool_shares > 0, VaultError::ZeroShares);

            engine.state.record_deposit(provided.pool_shares, 0)?;

            msg!(
                "Compound: {} harvested, {} pool shares added",
                harvested,
                provided.pool_shares
            );
            Ok(provided.pool_shares)
        });
        if result.is_err() {
            harvester.rollback(claimed);
        }
        result
    }

    // ---------------------------------------------------------------------
    // Steps
    // ---------------------------------------------------------------------

    fn contribute_pair(
        &mut self,
        caller: &Pubkey,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<Provided> {
        require!(amount_a > 0 && amount_b > 0, VaultError::ZeroAssets);

        let (token_a, token_b) = (self.state.token_a_mint, self.state.token_b_mint);
        self.ledger.pull(&token_a, caller, amount_a)?;
        self.ledger.pull(&token_b, caller, amount_b)?;

        let provisioner = self.provisioner()?;
        provisioner.provide(&mut *self.pool, amount_a, amount_b)
    }

    fn contribute_single(
        &mut self,
        caller: &Pubkey,
        pool_state: &PoolState,
        amount: u64,
    ) -> Result<Provided> {
        let token_a = self.state.token_a_mint;
        self.ledger.pull(&token_a, caller, amount)?;
        self.provide_single(pool_state, amount)
    }

    /// Rebalance token A already held by the vault and add it as liquidity
    fn provide_single(&mut self, pool_state: &PoolState, amount: u64) -> Result<Provided> {
        let (amount_a, amount_b) = self
            .rebalancer()
            .rebalance(&mut *self.pool, pool_state, amount)?;
        require!(amount_a > 0 && amount_b > 0, VaultError::ZeroShares);

        let provisioner = self.provisioner()?;
        provisioner.provide(&mut *self.pool, amount_a, amount_b)
    }

    fn release(&mut self, pool_state: &PoolState, pool_shares: u64) -> Result<(u64, u64)> {
        let (expected_a, expected_b) = pool_state.shares_to_assets(pool_shares)?;
        require!(expected_a > 0 && expected_b > 0, VaultError::ZeroAssets);

        let provisioner = self.provisioner()?;
        provisioner.withdraw_liquidity(&mut *self.pool, pool_shares, expected_a, expected_b)
    }

    fn pay_out_pair(&mut self, receiver: &Pubkey, amount_a: u64, amount_b: u64) -> Result<()> {
        let (token_a, token_b) = (self.state.token_a_mint, self.state.token_b_mint);
        self.ledger.push(&token_a, receiver, amount_a)?;
        self.ledger.push(&token_b, receiver, amount_b)
    }

    /// Run `op`, restoring state, pool and ledgers if it fails
    fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let state = self.state.clone();
        let pool = self.pool.checkpoint();
        let ledger = self.ledger.checkpoint();

        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                *self.state = state;
                self.pool.rollback(pool);
                self.ledger.rollback(ledger);
                msg!("Vault operation rolled back: {}", error);
                Err(error)
            }
        }
    }
}
