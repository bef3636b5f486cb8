//! Epoch-arena instructions: proposal competition, scorer finalization,
//! reward claims

pub mod claim_reward;
pub mod finalize_epoch;
pub mod init_arena;
pub mod submit_proposal;

pub use claim_reward::*;
pub use finalize_epoch::*;
pub use init_arena::*;
pub use submit_proposal::*;
