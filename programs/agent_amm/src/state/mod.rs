//! State accounts for the agent-governed AMM

pub mod agent;
pub mod config;
pub mod epoch;
pub mod pool;

pub use agent::*;
pub use config::*;
pub use epoch::*;
pub use pool::*;
