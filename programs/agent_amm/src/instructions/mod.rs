//! Instruction handlers for the agent-governed AMM
//!
//! Three groups, one per component:
//! - `pool` — swaps, liquidity, fee collection (permissionless)
//! - `registry` — agent bonding and bounded direct parameter updates
//! - `arena` — epoch proposal competition and scorer finalization
//!
//! `initialize` wires the protocol together, including the one-time
//! installation of the pool's controller allow-list.

pub mod arena;
pub mod initialize;
pub mod pool;
pub mod registry;

pub use arena::*;
pub use initialize::*;
pub use pool::*;
pub use registry::*;
