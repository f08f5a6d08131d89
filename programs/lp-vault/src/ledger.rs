use anchor_lang::prelude::*;

/// Fungible token movements between users and the vault
///
/// The vault side of every transfer is implicit: the vault's own token
/// account for `mint`.
pub trait TokenLedger {
    /// Move `amount` of `mint` from `from` into the vault
    fn pull(&mut self, mint: &Pubkey, from: &Pubkey, amount: u64) -> Result<()>;

    /// Move `amount` of `mint` from the vault to `to`
    fn push(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) -> Result<()>;
}

/// Vault share supply and balances
pub trait ShareLedger {
    fn mint_shares(&mut self, to: &Pubkey, amount: u64) -> Result<()>;

    fn burn_shares(&mut self, from: &Pubkey, amount: u64) -> Result<()>;

    /// Consume `amount` of the allowance `owner` granted `spender`
    ///
    /// Unlimited allowances are left untouched.
    fn spend_allowance(&mut self, owner: &Pubkey, spender: &Pubkey, amount: u64) -> Result<()>;
}
