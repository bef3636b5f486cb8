//! Proposal Submission
//!
//! One proposal per active agent per epoch. Only absolute bounds are
//! checked here — a proposal competes on merit and is not applied until the
//! scorer finalizes, so there is no delta bound against the pool's current
//! values at submission time.

use anchor_lang::prelude::*;

use crate::curve::{CurveMode, MAX_FEE_BPS};
use crate::state::{
    Agent, Arena, ArenaError, Config, ProposalEntry, RegistryConfig, RegistryError,
    MAX_PROPOSALS_PER_EPOCH,
};

use super::EpochStarted;

#[event]
pub struct ProposalSubmitted {
    pub epoch_id: u64,
    pub agent: Pubkey,
    pub fee_bps: u16,
    pub curve_beta: u64,
    pub curve_mode: u8,
}

#[derive(Accounts)]
pub struct SubmitProposal<'info> {
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
        constraint = agent.active @ ArenaError::AgentNotRegistered,
    )]
    pub agent: Account<'info, Agent>,

    #[account(mut, seeds = [Arena::SEED], bump = arena.bump)]
    pub arena: Account<'info, Arena>,
}

impl<'info> SubmitProposal<'info> {
    pub fn submit_proposal(&mut self, fee_bps: u16, curve_beta: u64, curve_mode: u8) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        // roll an elapsed empty window forward before judging openness
        if self.arena.ensure_fresh(now) {
            emit!(EpochStarted {
                epoch_id: self.arena.current_epoch_id,
                start_time: self.arena.epoch_start,
                end_time: self.arena.epoch_end,
            });
        }
        require!(self.arena.is_open(now), ArenaError::EpochNotActive);
        require!(
            !self.arena.has_proposed(&self.wallet.key()),
            ArenaError::AlreadyProposed
        );
        require!(
            self.arena.proposals.len() < MAX_PROPOSALS_PER_EPOCH,
            ArenaError::ProposalLimitReached
        );

        require!(fee_bps <= MAX_FEE_BPS, RegistryError::FeeTooHigh);
        require!(
            CurveMode::from_u8(curve_mode).is_some(),
            RegistryError::InvalidCurveMode
        );

        self.arena.proposals.push(ProposalEntry {
            agent: self.wallet.key(),
            fee_bps,
            curve_beta,
            curve_mode,
            submitted_at: now,
        });
        self.arena.total_proposals += 1;
        self.agent.proposals_submitted += 1;

        emit!(ProposalSubmitted {
            epoch_id: self.arena.current_epoch_id,
            agent: self.wallet.key(),
            fee_bps,
            curve_beta,
            curve_mode,
        });

        Ok(())
    }
}
