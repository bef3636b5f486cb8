//! # Agent-Governed Adaptive AMM
//!
//! A constant-product pool whose fee and curve parameters are not static:
//! bonded agents propose changes under strict on-chain safety bounds, and an
//! epoch-based arena lets competing agents submit candidate parameter sets
//! with a trusted scorer picking one winner per window.
//!
//! ## The three layers
//!
//! - **Pool** — reserves, adaptive swap pricing (Normal / Defensive /
//!   VolatilityAdaptive curve modes), LP shares, TWAP accumulators,
//!   protocol-fee skimming.
//! - **Registry** — agents stake a slashable bond for the right to push
//!   parameter updates, each bounded by a cooldown and per-parameter delta
//!   caps. Bounds only change through the registry authority (a timelock).
//! - **Arena** — fixed epochs collect competing proposals; finalization by
//!   the scorer applies exactly one winning tuple and pays a reward.
//!
//! The pool's parameters move *only* through the registry and arena paths;
//! the pool keeps those two addresses as an explicit allow-list.

use anchor_lang::prelude::*;

pub mod curve;
pub mod instructions;
pub mod state;

pub use curve::*;
pub use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Agent-governed AMM program
#[program]
pub mod agent_amm {
    use super::*;

    // ------------------------------------------------------------------
    // Protocol administration
    // ------------------------------------------------------------------

    /// Initialize the global configuration
    pub fn initialize(ctx: Context<Initialize>, treasury: Pubkey) -> Result<()> {
        ctx.accounts.initialize(treasury, ctx.bumps)
    }

    /// Create the pool with its vaults and LP mint
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        fee_bps: u16,
        curve_beta: u64,
        curve_mode: u8,
        protocol_fee_bps: u16,
    ) -> Result<()> {
        ctx.accounts
            .initialize_pool(fee_bps, curve_beta, curve_mode, protocol_fee_bps, ctx.bumps)
    }

    /// Create the agent registry and its token-bond vault
    pub fn initialize_registry(
        ctx: Context<InitializeRegistry>,
        authority: Pubkey,
        min_bond: u64,
        cooldown_seconds: i64,
        max_fee_delta: u16,
        max_beta_delta: u64,
    ) -> Result<()> {
        ctx.accounts.initialize_registry(
            authority,
            min_bond,
            cooldown_seconds,
            max_fee_delta,
            max_beta_delta,
            ctx.bumps,
        )
    }

    /// Create the epoch arena and its reward escrow
    pub fn initialize_arena(
        ctx: Context<InitializeArena>,
        scorer: Pubkey,
        epoch_duration: i64,
        reward_amount: u64,
    ) -> Result<()> {
        ctx.accounts
            .initialize_arena(scorer, epoch_duration, reward_amount, ctx.bumps)
    }

    /// One-time wiring of the pool's parameter controllers
    pub fn set_controllers(ctx: Context<SetControllers>) -> Result<()> {
        ctx.accounts.set_controllers()
    }

    /// Flip the global circuit breaker (admin only)
    pub fn set_paused(ctx: Context<SetPaused>, paused: bool) -> Result<()> {
        ctx.accounts.set_paused(paused)
    }

    // ------------------------------------------------------------------
    // Pool
    // ------------------------------------------------------------------

    /// Deposit both tokens, receive LP shares
    pub fn add_liquidity(ctx: Context<AddLiquidity>, amount0: u64, amount1: u64) -> Result<u64> {
        ctx.accounts.add_liquidity(amount0, amount1)
    }

    /// Burn LP shares, receive a pro-rata slice of both reserves
    pub fn remove_liquidity(ctx: Context<RemoveLiquidity>, liquidity: u64) -> Result<(u64, u64)> {
        ctx.accounts.remove_liquidity(liquidity)
    }

    /// Swap through the adaptive constant product
    pub fn swap(
        ctx: Context<Swap>,
        zero_for_one: bool,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64> {
        ctx.accounts.swap(zero_for_one, amount_in, min_amount_out)
    }

    /// Move accrued protocol fees to the treasury (permissionless crank)
    pub fn collect_protocol_fees(ctx: Context<CollectProtocolFees>) -> Result<()> {
        ctx.accounts.collect_protocol_fees()
    }

    // ------------------------------------------------------------------
    // Agent registry
    // ------------------------------------------------------------------

    /// Stake a native bond and become an active agent
    pub fn register_agent(ctx: Context<RegisterAgent>, bond: u64) -> Result<()> {
        ctx.accounts.register_agent(bond, ctx.bumps)
    }

    /// Exit: returns the remaining native bond, marks inactive
    pub fn deregister_agent(ctx: Context<DeregisterAgent>) -> Result<()> {
        ctx.accounts.deregister_agent()
    }

    /// Add to an active agent's native bond
    pub fn top_up_bond(ctx: Context<TopUpBond>, amount: u64) -> Result<()> {
        ctx.accounts.top_up_bond(amount)
    }

    /// Add to an active agent's token bond
    pub fn deposit_token_bond(ctx: Context<DepositTokenBond>, amount: u64) -> Result<()> {
        ctx.accounts.deposit_token_bond(amount)
    }

    /// Withdraw the full token bond; only after deregistration
    pub fn withdraw_token_bond(ctx: Context<WithdrawTokenBond>) -> Result<()> {
        ctx.accounts.withdraw_token_bond()
    }

    /// Push a cooldown- and delta-bounded parameter update to the pool
    pub fn submit_parameter_update(
        ctx: Context<SubmitParameterUpdate>,
        new_fee: u16,
        new_beta: u64,
        new_mode: u8,
    ) -> Result<()> {
        ctx.accounts.submit_parameter_update(new_fee, new_beta, new_mode)
    }

    /// Deduct from an agent's bond (registry authority only)
    pub fn slash_agent(ctx: Context<SlashAgent>, amount: u64, reason: String) -> Result<()> {
        ctx.accounts.slash_agent(amount, reason)
    }

    /// Adjust the registry safety envelope (registry authority only)
    pub fn set_registry_bounds(
        ctx: Context<SetRegistryBounds>,
        min_bond: u64,
        cooldown_seconds: i64,
        max_fee_delta: u16,
        max_beta_delta: u64,
    ) -> Result<()> {
        ctx.accounts
            .set_registry_bounds(min_bond, cooldown_seconds, max_fee_delta, max_beta_delta)
    }

    // ------------------------------------------------------------------
    // Epoch arena
    // ------------------------------------------------------------------

    /// Submit a candidate parameter tuple for the current epoch
    pub fn submit_proposal(
        ctx: Context<SubmitProposal>,
        fee_bps: u16,
        curve_beta: u64,
        curve_mode: u8,
    ) -> Result<()> {
        ctx.accounts.submit_proposal(fee_bps, curve_beta, curve_mode)
    }

    /// Score an elapsed epoch and apply the winner (scorer only).
    /// Proposer `Agent` PDAs ride in remaining accounts, ordered like
    /// `agents`.
    pub fn finalize_epoch<'info>(
        ctx: Context<'_, '_, 'info, 'info, FinalizeEpoch<'info>>,
        epoch_id: u64,
        agents: Vec<Pubkey>,
        scores: Vec<u64>,
    ) -> Result<()> {
        let remaining = ctx.remaining_accounts;
        ctx.accounts
            .finalize_epoch(epoch_id, agents, scores, remaining, ctx.bumps)
    }

    /// Collect a finalized epoch's reward (winner only, once)
    pub fn claim_reward(ctx: Context<ClaimReward>, epoch_id: u64) -> Result<()> {
        ctx.accounts.claim_reward(epoch_id)
    }

    /// Top up the arena's reward escrow
    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        ctx.accounts.fund_rewards(amount)
    }
}
