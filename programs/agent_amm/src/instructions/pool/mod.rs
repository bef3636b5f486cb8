//! Pool instructions: creation, liquidity, swapping, fee collection

pub mod add_liquidity;
pub mod collect_fees;
pub mod init_pool;
pub mod remove_liquidity;
pub mod swap;

pub use add_liquidity::*;
pub use collect_fees::*;
pub use init_pool::*;
pub use remove_liquidity::*;
pub use swap::*;
