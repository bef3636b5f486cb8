//! Global Protocol Configuration
//!
//! Protocol-wide settings shared by the pool, the agent registry and the
//! epoch arena.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator with special privileges
    pub admin: Pubkey,

    /// Wallet that receives protocol fees and slashed bonds
    pub treasury: Pubkey,

    /// Circuit breaker: every state-mutating instruction rejects while set
    pub paused: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";
}
