//! On-chain implementations of the pool and ledger traits.

pub mod cpi_pool;
pub mod spl_ledger;

pub use cpi_pool::*;
pub use spl_ledger::*;
