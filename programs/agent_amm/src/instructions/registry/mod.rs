//! Agent-registry instructions: registration, bonding, bounded parameter
//! updates, slashing

pub mod admin;
pub mod bond;
pub mod register;
pub mod slash;
pub mod submit_update;

pub use admin::*;
pub use bond::*;
pub use register::*;
pub use slash::*;
pub use submit_update::*;
