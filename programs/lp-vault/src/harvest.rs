use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Swap path that turns a reward token into the vault's token A
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarvestRoute {
    pub reward_mint: Pubkey,
    /// Mints visited after `reward_mint`, ending at token A
    pub path: Vec<Pubkey>,
}

/// Claims rewards earned by the vault's position and delivers them as
/// token A to the vault.
///
/// `compound` also requires `Checkpoint`; a failed compound rolls the claim
/// back. On-chain implementors use a unit snapshot.
pub trait RewardHarvester {
    /// Returns the token A amount credited to `vault`
    fn harvest(&mut self, route: &HarvestRoute, vault: &Pubkey) -> Result<u64>;
}

/// Manager-owned route configuration
pub struct HarvestConfig {
    manager: Pubkey,
    token_a: Pubkey,
    route: Option<HarvestRoute>,
}

impl HarvestConfig {
    pub fn new(manager: Pubkey, token_a: Pubkey) -> Self {
        Self {
            manager,
            token_a,
            route: None,
        }
    }

    pub fn set_route(&mut self, caller: &Pubkey, route: HarvestRoute) -> Result<()> {
        require_keys_eq!(*caller, self.manager, VaultError::Unauthorized);
        require!(
            route.path.last() == Some(&self.token_a),
            VaultError::InvalidMint
        );
        self.route = Some(route);
        Ok(())
    }

    pub fn route(&self) -> Option<&HarvestRoute> {
        self.route.as_ref()
    }

    pub fn manager(&self) -> &Pubkey {
        &self.manager
    }
}
