//! # Adaptive Pricing Math
//!
//! Pure arithmetic for the adaptive constant-product pool. Nothing in this
//! module touches accounts or issues CPIs, so every function here is unit
//! tested in place.
//!
//! ## The adaptive constant product
//!
//! The pool prices against `x * y = k`, but first passes the incoming amount
//! through one of three curve modes:
//!
//! ```text
//!   Normal              effective = in
//!   Defensive           penalty grows with (in / reserve)²  — whale brake
//!   VolatilityAdaptive  penalty grows with (in / reserve)   — linear damping
//! ```
//!
//! The penalty shrinks the amount *credited for pricing*; custody always
//! moves the full received amount into the vault. That split is what keeps
//! `reserve0 * reserve1` non-decreasing across every swap.

pub mod engine;
pub mod shares;
pub mod twap;

pub use engine::*;
pub use shares::*;
pub use twap::*;
