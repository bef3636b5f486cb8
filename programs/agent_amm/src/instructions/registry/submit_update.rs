//! Direct Parameter Updates
//!
//! The registry path into `Pool::apply_parameters`. Validation order is
//! load-bearing: cooldown, then absolute caps, then delta caps against the
//! pool's *current* values. No single accepted update can move parameters
//! outside the governance envelope, and no agent can move them faster than
//! the cooldown permits.

use anchor_lang::prelude::*;

use crate::state::{
    validate_parameter_update, Agent, Config, Pool, PoolError, RegistryConfig, RegistryError,
};

/// Emitted by the registry when it accepts an agent's update
#[event]
pub struct ParameterUpdateSubmitted {
    pub agent: Pubkey,
    pub fee_bps: u16,
    pub curve_beta: u64,
    pub curve_mode: u8,
    pub update_count: u64,
}

/// Emitted by the pool whenever its parameters change, with the responsible
/// controller and agent for auditability
#[event]
pub struct ParametersUpdated {
    pub source: Pubkey,
    pub agent: Pubkey,
    pub fee_bps: u16,
    pub curve_beta: u64,
    pub curve_mode: u8,
    pub timestamp: i64,
}

#[derive(Accounts)]
pub struct SubmitParameterUpdate<'info> {
    pub wallet: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ RegistryError::Paused,
    )]
    pub config: Account<'info, Config>,

    #[account(seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    #[account(
        mut,
        seeds = [Agent::SEED, wallet.key().as_ref()],
        bump = agent.bump,
        constraint = agent.active @ RegistryError::NotRegistered,
    )]
    pub agent: Account<'info, Agent>,

    /// The registry must be on the pool's controller allow-list
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump,
        constraint = pool.registry == registry.key() @ PoolError::UnauthorizedController,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> SubmitParameterUpdate<'info> {
    pub fn submit_parameter_update(
        &mut self,
        new_fee: u16,
        new_beta: u64,
        new_mode: u8,
    ) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        validate_parameter_update(
            now,
            self.agent.last_update_ts,
            self.registry.cooldown_seconds,
            self.pool.fee_bps,
            self.pool.curve_beta,
            new_fee,
            new_beta,
            new_mode,
            self.registry.max_fee_delta,
            self.registry.max_beta_delta,
        )?;

        self.agent.last_update_ts = now;
        self.agent.update_count += 1;

        let mode = self.pool.apply_parameters(new_fee, new_beta, new_mode)?;

        emit!(ParameterUpdateSubmitted {
            agent: self.wallet.key(),
            fee_bps: new_fee,
            curve_beta: new_beta,
            curve_mode: mode as u8,
            update_count: self.agent.update_count,
        });
        emit!(ParametersUpdated {
            source: self.registry.key(),
            agent: self.wallet.key(),
            fee_bps: new_fee,
            curve_beta: new_beta,
            curve_mode: mode as u8,
            timestamp: now,
        });

        Ok(())
    }
}
