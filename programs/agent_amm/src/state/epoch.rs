//! Epoch Arena State
//!
//! Fixed time windows in which registered agents submit competing parameter
//! tuples. A trusted scorer finalizes each window after it elapses: exactly
//! one winner is selected, its tuple is applied to the pool, and an
//! immutable [`EpochRecord`] is materialized for reward claims.
//!
//! The *current* epoch lives inline in the [`Arena`] account so that
//! finalization can compare the scorer's arrays against the full proposal
//! set atomically. There is no background clock; every epoch-touching
//! instruction starts by lazily rolling elapsed empty windows forward.

use anchor_lang::prelude::*;

/// Upper bound on proposals per epoch (size of the competitor field).
pub const MAX_PROPOSALS_PER_EPOCH: usize = 16;

/// A single agent's candidate parameter tuple. Immutable once submitted.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug)]
pub struct ProposalEntry {
    pub agent: Pubkey,
    pub fee_bps: u16,
    pub curve_beta: u64,
    pub curve_mode: u8,
    pub submitted_at: i64,
}

/// The competition layer (singleton PDA)
///
/// Seeds: ["arena"]
#[account]
#[derive(InitSpace)]
pub struct Arena {
    /// Trusted scorer allowed to finalize epochs
    pub scorer: Pubkey,

    /// Window length in seconds
    pub epoch_duration: i64,

    /// Reward escrow: mint, vault (arena authority) and per-epoch payout
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub reward_amount: u64,

    /// Strictly increasing, contiguous epoch id
    pub current_epoch_id: u64,

    /// Current window, proposals accepted during [start, end)
    pub epoch_start: i64,
    pub epoch_end: i64,

    /// Proposals for the current epoch, one per agent
    #[max_len(MAX_PROPOSALS_PER_EPOCH)]
    pub proposals: Vec<ProposalEntry>,

    /// Lifetime proposal count across all epochs
    pub total_proposals: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Arena {
    pub const SEED: &'static [u8] = b"arena";

    /// Lazily advance past elapsed windows that collected no proposals.
    /// Returns `true` if a new epoch was opened. Windows with proposals are
    /// never advanced here; they wait for the scorer.
    pub fn ensure_fresh(&mut self, now: i64) -> bool {
        if now >= self.epoch_end && self.proposals.is_empty() {
            self.current_epoch_id += 1;
            self.epoch_start = now;
            self.epoch_end = now.saturating_add(self.epoch_duration);
            true
        } else {
            false
        }
    }

    /// Whether the current window is accepting proposals.
    pub fn is_open(&self, now: i64) -> bool {
        now >= self.epoch_start && now < self.epoch_end
    }

    /// Seconds until the current window closes.
    pub fn time_remaining(&self, now: i64) -> i64 {
        (self.epoch_end - now).max(0)
    }

    pub fn has_proposed(&self, agent: &Pubkey) -> bool {
        self.proposals.iter().any(|p| p.agent == *agent)
    }

    pub fn proposal_for(&self, agent: &Pubkey) -> Option<&ProposalEntry> {
        self.proposals.iter().find(|p| p.agent == *agent)
    }

    /// Close the finalized window and open the next one at `now`.
    pub fn open_next(&mut self, now: i64) {
        self.current_epoch_id += 1;
        self.epoch_start = now;
        self.epoch_end = now.saturating_add(self.epoch_duration);
        self.proposals.clear();
    }
}

/// Immutable record of a finalized epoch, created at finalization
///
/// Seeds: ["epoch", epoch_id]
#[account]
#[derive(InitSpace)]
pub struct EpochRecord {
    pub epoch_id: u64,
    pub start_time: i64,
    pub end_time: i64,
    pub winner: Pubkey,
    pub winner_score: u64,
    pub proposal_count: u8,
    /// Reward snapshot at finalization time
    pub reward_amount: u64,
    pub reward_claimed: bool,
    pub bump: u8,
}

impl EpochRecord {
    pub const SEED: &'static [u8] = b"epoch";

    /// Validate a reward claim and return the payout amount.
    ///
    /// Only the recorded winner may claim, exactly once, and only when the
    /// record carries a non-zero reward. Callers must set `reward_claimed`
    /// before moving any tokens.
    pub fn validate_claim(&self, claimant: &Pubkey) -> Result<u64> {
        require!(self.winner == *claimant, ArenaError::NothingToClaim);
        require!(!self.reward_claimed, ArenaError::NothingToClaim);
        require!(self.reward_amount > 0, ArenaError::NothingToClaim);
        Ok(self.reward_amount)
    }
}

/// Pick the winner from the scorer's arrays.
///
/// Requires `agents` and `scores` to be the same length as the proposal set,
/// every scored agent to be a distinct proposer, and at least one proposal.
/// Returns the winning index into `agents` and its score. Ties resolve to
/// the earliest index in the scorer-provided order — the tie-break is the
/// iteration order of the arrays, nothing else.
pub fn select_winner(
    proposals: &[ProposalEntry],
    agents: &[Pubkey],
    scores: &[u64],
) -> Result<(usize, u64)> {
    require!(!proposals.is_empty(), ArenaError::NoProposals);
    require!(agents.len() == scores.len(), ArenaError::InvalidScoreCount);
    require!(agents.len() == proposals.len(), ArenaError::InvalidScoreCount);

    let mut seen = [false; MAX_PROPOSALS_PER_EPOCH];
    for agent in agents {
        let idx = proposals
            .iter()
            .position(|p| p.agent == *agent)
            .ok_or(ArenaError::AgentNotScored)?;
        require!(!seen[idx], ArenaError::InvalidScoreCount);
        seen[idx] = true;
    }

    let mut winner = 0usize;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[winner] {
            winner = i;
        }
    }
    Ok((winner, scores[winner]))
}

#[error_code]
pub enum ArenaError {
    #[msg("Current epoch is not accepting proposals")]
    EpochNotActive,
    #[msg("Agent already proposed this epoch")]
    AlreadyProposed,
    #[msg("Epoch is already finalized")]
    AlreadyFinalized,
    #[msg("Caller is not the designated scorer")]
    NotScorer,
    #[msg("Epoch has no proposals to score")]
    NoProposals,
    #[msg("Score arrays do not match the epoch's proposal set")]
    InvalidScoreCount,
    #[msg("Scored agent did not propose this epoch")]
    AgentNotScored,
    #[msg("Nothing to claim for this epoch")]
    NothingToClaim,
    #[msg("Agent is not registered")]
    AgentNotRegistered,
    #[msg("Epoch window has not elapsed yet")]
    EpochNotEnded,
    #[msg("Proposal limit for this epoch reached")]
    ProposalLimitReached,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(agent: Pubkey, fee: u16) -> ProposalEntry {
        ProposalEntry {
            agent,
            fee_bps: fee,
            curve_beta: 10_000,
            curve_mode: 0,
            submitted_at: 0,
        }
    }

    fn arena() -> Arena {
        Arena {
            scorer: Pubkey::new_unique(),
            epoch_duration: 600,
            reward_mint: Pubkey::default(),
            reward_vault: Pubkey::default(),
            reward_amount: 0,
            current_epoch_id: 1,
            epoch_start: 1_000,
            epoch_end: 1_600,
            proposals: vec![],
            total_proposals: 0,
            bump: 255,
        }
    }

    #[test]
    fn strict_maximum_wins() {
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let proposals = [proposal(a, 100), proposal(b, 200), proposal(c, 300)];
        let agents = [a, b, c];
        let scores = [5_000, 8_000, 6_000];

        let (idx, score) = select_winner(&proposals, &agents, &scores).unwrap();
        assert_eq!(agents[idx], b);
        assert_eq!(score, 8_000);
    }

    #[test]
    fn tie_resolves_to_first_in_scorer_order() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let proposals = [proposal(a, 100), proposal(b, 200)];

        let (idx, _) = select_winner(&proposals, &[a, b], &[7_000, 7_000]).unwrap();
        assert_eq!(idx, 0);

        // flipping the scorer's order flips the tie-break
        let (idx, _) = select_winner(&proposals, &[b, a], &[7_000, 7_000]).unwrap();
        assert_eq!(idx, 0); // still index 0 of the provided order, i.e. b
    }

    #[test]
    fn rejects_mismatched_or_partial_scoring() {
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let proposals = [proposal(a, 100), proposal(b, 200)];

        // length mismatch
        assert!(select_winner(&proposals, &[a, b], &[1]).is_err());
        // partial scoring
        assert!(select_winner(&proposals, &[a], &[1]).is_err());
        // duplicated agent standing in for a missing one
        assert!(select_winner(&proposals, &[a, a], &[1, 2]).is_err());
        // outsider who never proposed
        assert!(select_winner(&proposals, &[a, Pubkey::new_unique()], &[1, 2]).is_err());
        // empty epoch
        assert!(select_winner(&[], &[], &[]).is_err());
    }

    #[test]
    fn empty_elapsed_window_rolls_forward() {
        let mut ar = arena();
        assert!(!ar.ensure_fresh(1_500)); // still open
        assert!(ar.ensure_fresh(2_000)); // elapsed, no proposals
        assert_eq!(ar.current_epoch_id, 2);
        assert_eq!(ar.epoch_start, 2_000);
        assert_eq!(ar.epoch_end, 2_600);
    }

    #[test]
    fn window_with_proposals_waits_for_the_scorer() {
        let mut ar = arena();
        ar.proposals.push(proposal(Pubkey::new_unique(), 100));
        assert!(!ar.ensure_fresh(5_000));
        assert_eq!(ar.current_epoch_id, 1);
        assert!(!ar.is_open(5_000));
    }

    fn record(winner: Pubkey, reward: u64) -> EpochRecord {
        EpochRecord {
            epoch_id: 1,
            start_time: 1_000,
            end_time: 1_600,
            winner,
            winner_score: 9_000,
            proposal_count: 3,
            reward_amount: reward,
            reward_claimed: false,
            bump: 255,
        }
    }

    #[test]
    fn reward_goes_to_the_winner_exactly_once() {
        let winner = Pubkey::new_unique();
        let mut rec = record(winner, 1_000_000);

        // someone else cannot collect
        assert!(rec.validate_claim(&Pubkey::new_unique()).is_err());

        assert_eq!(rec.validate_claim(&winner).unwrap(), 1_000_000);

        // the second claim finds the flag set
        rec.reward_claimed = true;
        assert!(rec.validate_claim(&winner).is_err());
    }

    #[test]
    fn unfunded_record_has_nothing_to_claim() {
        let winner = Pubkey::new_unique();
        let rec = record(winner, 0);
        assert!(rec.validate_claim(&winner).is_err());
    }

    #[test]
    fn open_next_resets_the_field() {
        let mut ar = arena();
        ar.proposals.push(proposal(Pubkey::new_unique(), 100));
        ar.open_next(2_000);
        assert_eq!(ar.current_epoch_id, 2);
        assert!(ar.proposals.is_empty());
        assert_eq!(ar.time_remaining(2_000), 600);
    }
}
