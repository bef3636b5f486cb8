//! Agent Registry State
//!
//! Agents stake a native bond to earn the right to propose pool-parameter
//! changes. Every accepted change is bounded twice over: a per-agent
//! cooldown limits the *rate* of change, and per-parameter delta caps
//! against the pool's current values limit the *magnitude*. Together they
//! put an envelope around adversarial manipulation no matter what an
//! individual agent intends.

use anchor_lang::prelude::*;

use crate::curve::{CurveMode, MAX_FEE_BPS};

/// Per-agent registration record
///
/// Seeds: ["agent", wallet]
#[account]
#[derive(InitSpace)]
pub struct Agent {
    /// The agent's wallet
    pub wallet: Pubkey,

    /// Native bond held in the registry account, lamports
    pub bond_lamports: u64,

    /// Optional fungible-token bond held in the registry vault
    pub token_bond: u64,

    /// Registration timestamp
    pub registered_at: i64,

    /// Timestamp of the last accepted parameter update; 0 before the first
    pub last_update_ts: i64,

    /// Accepted direct parameter updates
    pub update_count: u64,

    /// Lifetime arena score across all finalized epochs (reputation signal)
    pub total_score: u128,

    /// Epochs won
    pub wins: u32,

    /// Proposals submitted across all epochs
    pub proposals_submitted: u32,

    /// Cleared on deregistration. Slashing does NOT clear this flag.
    pub active: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Agent {
    pub const SEED: &'static [u8] = b"agent";
}

/// Registry configuration (singleton PDA)
///
/// `authority` is expected to be a timelock-owned address; bound changes and
/// slashing flow through it.
///
/// Seeds: ["registry"]
#[account]
#[derive(InitSpace)]
pub struct RegistryConfig {
    /// Governance authority (timelock) for bounds and slashing
    pub authority: Pubkey,

    /// Minimum native bond to register, lamports
    pub min_bond: u64,

    /// Minimum seconds between accepted updates per agent
    pub cooldown_seconds: i64,

    /// Largest permitted |new_fee - current_fee| in one update
    pub max_fee_delta: u16,

    /// Largest permitted |new_beta - current_beta| in one update
    pub max_beta_delta: u64,

    /// Mint and vault for the optional token bond
    pub token_bond_mint: Pubkey,
    pub token_bond_vault: Pubkey,

    /// Currently active agents
    pub agent_count: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl RegistryConfig {
    pub const SEED: &'static [u8] = b"registry";
}

/// Validate a proposed parameter update against an agent's cooldown and the
/// registry's bound envelope. Order matters: cooldown, then absolute caps,
/// then deltas against the pool's current values.
pub fn validate_parameter_update(
    now: i64,
    last_update_ts: i64,
    cooldown_seconds: i64,
    current_fee: u16,
    current_beta: u64,
    new_fee: u16,
    new_beta: u64,
    new_mode: u8,
    max_fee_delta: u16,
    max_beta_delta: u64,
) -> Result<()> {
    // an agent's very first update has no cooldown to serve
    if last_update_ts != 0 {
        require!(
            now >= last_update_ts.saturating_add(cooldown_seconds),
            RegistryError::CooldownActive
        );
    }

    require!(new_fee <= MAX_FEE_BPS, RegistryError::FeeTooHigh);
    require!(
        CurveMode::from_u8(new_mode).is_some(),
        RegistryError::InvalidCurveMode
    );

    require!(
        current_fee.abs_diff(new_fee) <= max_fee_delta,
        RegistryError::DeltaExceedsLimit
    );
    require!(
        current_beta.abs_diff(new_beta) <= max_beta_delta,
        RegistryError::DeltaExceedsLimit
    );

    Ok(())
}

#[error_code]
pub enum RegistryError {
    #[msg("Agent is not registered or inactive")]
    NotRegistered,
    #[msg("Agent is already registered")]
    AlreadyRegistered,
    #[msg("Bond below the registry minimum")]
    BondTooLow,
    #[msg("Cooldown has not elapsed since the last accepted update")]
    CooldownActive,
    #[msg("Parameter change exceeds the per-update delta cap")]
    DeltaExceedsLimit,
    #[msg("Fee exceeds the absolute cap")]
    FeeTooHigh,
    #[msg("Unknown curve mode")]
    InvalidCurveMode,
    #[msg("Protocol is paused")]
    Paused,
    #[msg("Slash amount exceeds the agent's bond")]
    InsufficientSlashAmount,
    #[msg("Amount must be positive")]
    ZeroAmount,
    #[msg("Token bond can only be withdrawn after deregistration")]
    StillActive,
    #[msg("Caller is not the registry authority")]
    NotAuthorized,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: i64 = 3_600;

    fn validate(now: i64, last: i64, new_fee: u16, new_beta: u64) -> Result<()> {
        // pool currently at fee 100, beta 10_000; envelope: ±50 fee, ±5_000 beta
        validate_parameter_update(now, last, COOLDOWN, 100, 10_000, new_fee, new_beta, 0, 50, 5_000)
    }

    #[test]
    fn first_update_skips_cooldown() {
        assert!(validate(10, 0, 120, 12_000).is_ok());
    }

    #[test]
    fn cooldown_boundary() {
        let last = 1_000;
        // one second short: rejected
        assert!(validate(last + COOLDOWN - 1, last, 120, 12_000).is_err());
        // exactly the cooldown: accepted
        assert!(validate(last + COOLDOWN, last, 120, 12_000).is_ok());
    }

    #[test]
    fn fee_delta_boundary() {
        // current fee 100, max delta 50
        assert!(validate(10, 0, 150, 10_000).is_ok());
        assert!(validate(10, 0, 151, 10_000).is_err());
        // downward moves are bounded the same way
        assert!(validate(10, 0, 50, 10_000).is_ok());
        assert!(validate(10, 0, 49, 10_000).is_err());
    }

    #[test]
    fn beta_delta_boundary() {
        assert!(validate(10, 0, 100, 15_000).is_ok());
        assert!(validate(10, 0, 100, 15_001).is_err());
    }

    #[test]
    fn absolute_caps_precede_delta_caps() {
        // fee 501 violates the absolute cap even though the delta check
        // would also fail; the error must be FeeTooHigh
        let err = validate_parameter_update(10, 0, COOLDOWN, 490, 0, 501, 0, 0, 50, 0)
            .unwrap_err();
        assert_eq!(err, RegistryError::FeeTooHigh.into());

        let err = validate_parameter_update(10, 0, COOLDOWN, 100, 0, 100, 0, 7, 50, 0)
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidCurveMode.into());
    }

    #[test]
    fn stale_stamp_still_binds_after_reregistration() {
        // registration never writes last_update_ts, so the stamp an agent
        // carried before deregistering still binds on the reused record
        let last = 1_000;
        assert!(validate(last + COOLDOWN - 1, last, 120, 12_000).is_err());
        assert!(validate(last + COOLDOWN, last, 120, 12_000).is_ok());
    }

    #[test]
    fn cooldown_precedes_everything() {
        let err = validate(1_001, 1_000, 501, 99_999).unwrap_err();
        assert_eq!(err, RegistryError::CooldownActive.into());
    }
}
