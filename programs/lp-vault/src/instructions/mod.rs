pub mod deposit;
pub mod initialize;
pub mod mint_shares;
pub mod operation;
pub mod redeem;
pub mod set_slippage_tolerance;
pub mod withdraw;

pub use deposit::*;
pub use initialize::*;
pub use mint_shares::*;
pub use operation::*;
pub use redeem::*;
pub use set_slippage_tolerance::*;
pub use withdraw::*;
