//! Epoch Finalization
//!
//! The trusted scorer closes an elapsed window in one atomic step: scores
//! are matched against the full proposal set, every proposer's lifetime
//! total is credited (non-winners included — cumulative score is a
//! reputation signal), the winner's exact tuple is applied to the pool, an
//! immutable record is materialized for the reward claim, and the next
//! window opens.
//!
//! Proposer `Agent` PDAs ride in `remaining_accounts`, one per scored agent
//! and in the same order as the `agents` array.

use anchor_lang::prelude::*;

use crate::state::{
    select_winner, Agent, Arena, ArenaError, Config, EpochRecord, Pool, PoolError, RegistryError,
};

use super::EpochStarted;
use crate::instructions::registry::ParametersUpdated;

#[event]
pub struct EpochFinalized {
    pub epoch_id: u64,
    pub winner: Pubkey,
    pub winner_score: u64,
    pub proposal_count: u8,
}

#[derive(Accounts)]
#[instruction(epoch_id: u64)]
pub struct FinalizeEpoch<'info> {
    #[account(
        mut,
        constraint = scorer.key() == arena.scorer @ ArenaError::NotScorer,
    )]
    pub scorer: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ RegistryError::Paused,
    )]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [Arena::SEED], bump = arena.bump)]
    pub arena: Account<'info, Arena>,

    /// The arena must be on the pool's controller allow-list
    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump,
        constraint = pool.arena == arena.key() @ PoolError::UnauthorizedController,
    )]
    pub pool: Account<'info, Pool>,

    /// One-time record; re-finalization fails on the second init
    #[account(
        init,
        payer = scorer,
        space = 8 + EpochRecord::INIT_SPACE,
        seeds = [EpochRecord::SEED, epoch_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub epoch_record: Account<'info, EpochRecord>,

    pub system_program: Program<'info, System>,
}

impl<'info> FinalizeEpoch<'info> {
    pub fn finalize_epoch(
        &mut self,
        epoch_id: u64,
        agents: Vec<Pubkey>,
        scores: Vec<u64>,
        proposer_accounts: &[AccountInfo<'info>],
        bumps: FinalizeEpochBumps,
    ) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        require!(
            epoch_id == self.arena.current_epoch_id,
            ArenaError::AlreadyFinalized
        );
        require!(!self.arena.proposals.is_empty(), ArenaError::NoProposals);
        require!(now >= self.arena.epoch_end, ArenaError::EpochNotEnded);

        let (winner_idx, winner_score) =
            select_winner(&self.arena.proposals, &agents, &scores)?;
        let winner = agents[winner_idx];

        // credit lifetime scores through the proposer PDAs
        require!(
            proposer_accounts.len() == agents.len(),
            ArenaError::InvalidScoreCount
        );
        for (i, info) in proposer_accounts.iter().enumerate() {
            let (expected, _) = Pubkey::find_program_address(
                &[Agent::SEED, agents[i].as_ref()],
                &crate::ID,
            );
            require_keys_eq!(info.key(), expected, ArenaError::AgentNotRegistered);

            let mut agent: Agent = {
                let data = info.try_borrow_data()?;
                let mut slice: &[u8] = &data;
                Agent::try_deserialize(&mut slice)?
            };
            agent.total_score += scores[i] as u128;
            if i == winner_idx {
                agent.wins += 1;
            }
            let mut data = info.try_borrow_mut_data()?;
            let mut cursor: &mut [u8] = &mut data;
            agent.try_serialize(&mut cursor)?;
        }

        // apply the winner's exact tuple
        let proposal = *self
            .arena
            .proposal_for(&winner)
            .ok_or(ArenaError::AgentNotScored)?;
        let mode = self
            .pool
            .apply_parameters(proposal.fee_bps, proposal.curve_beta, proposal.curve_mode)?;

        self.epoch_record.set_inner(EpochRecord {
            epoch_id,
            start_time: self.arena.epoch_start,
            end_time: self.arena.epoch_end,
            winner,
            winner_score,
            proposal_count: self.arena.proposals.len() as u8,
            reward_amount: self.arena.reward_amount,
            reward_claimed: false,
            bump: bumps.epoch_record,
        });

        emit!(EpochFinalized {
            epoch_id,
            winner,
            winner_score,
            proposal_count: self.epoch_record.proposal_count,
        });
        emit!(ParametersUpdated {
            source: self.arena.key(),
            agent: winner,
            fee_bps: proposal.fee_bps,
            curve_beta: proposal.curve_beta,
            curve_mode: mode as u8,
            timestamp: now,
        });

        self.arena.open_next(now);
        emit!(EpochStarted {
            epoch_id: self.arena.current_epoch_id,
            start_time: self.arena.epoch_start,
            end_time: self.arena.epoch_end,
        });

        Ok(())
    }
}
