//! Pool Creation
//!
//! Creates the single-pair pool: the state PDA, both reserve vaults, the LP
//! share mint and the locked-liquidity sink. The pool starts with an
//! admin-chosen fee/curve and no controllers; `set_controllers` wires the
//! governance layer in afterwards.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::curve::CurveMode;
use crate::state::{Config, Pool, PoolError};

#[event]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub mint0: Pubkey,
    pub mint1: Pubkey,
    pub fee_bps: u16,
    pub curve_beta: u64,
    pub curve_mode: u8,
}

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(
        mut,
        constraint = admin.key() == config.admin @ PoolError::UnauthorizedController,
    )]
    pub admin: Signer<'info>,

    #[account(seeds = [Config::SEED], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    pub mint0: InterfaceAccount<'info, Mint>,
    pub mint1: InterfaceAccount<'info, Mint>,

    /// Reserve vault for token 0
    #[account(
        init,
        payer = admin,
        associated_token::mint = mint0,
        associated_token::authority = pool,
    )]
    pub vault0: InterfaceAccount<'info, TokenAccount>,

    /// Reserve vault for token 1
    #[account(
        init,
        payer = admin,
        associated_token::mint = mint1,
        associated_token::authority = pool,
    )]
    pub vault1: InterfaceAccount<'info, TokenAccount>,

    /// LP share mint, pool authority
    #[account(
        init,
        payer = admin,
        mint::decimals = 6,
        mint::authority = pool,
        seeds = [Pool::LP_MINT_SEED],
        bump,
    )]
    pub lp_mint: InterfaceAccount<'info, Mint>,

    /// Sink for the permanently locked minimum liquidity
    #[account(
        init,
        payer = admin,
        associated_token::mint = lp_mint,
        associated_token::authority = pool,
    )]
    pub lp_lock: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializePool<'info> {
    pub fn initialize_pool(
        &mut self,
        fee_bps: u16,
        curve_beta: u64,
        curve_mode: u8,
        protocol_fee_bps: u16,
        bumps: InitializePoolBumps,
    ) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;

        self.pool.set_inner(Pool {
            mint0: self.mint0.key(),
            mint1: self.mint1.key(),
            vault0: self.vault0.key(),
            vault1: self.vault1.key(),
            lp_mint: self.lp_mint.key(),
            lp_lock: self.lp_lock.key(),
            reserve0: 0,
            reserve1: 0,
            fee_bps: 0,
            curve_beta: 0,
            curve_mode: CurveMode::Normal,
            price0_cumulative_last: 0,
            price1_cumulative_last: 0,
            last_update_ts: now,
            protocol_fee_bps,
            protocol_fee_accum0: 0,
            protocol_fee_accum1: 0,
            registry: Pubkey::default(),
            arena: Pubkey::default(),
            trade_count: 0,
            volume0: 0,
            volume1: 0,
            bump: bumps.pool,
        });

        // runs the same absolute-cap validation every later update goes through
        let mode = self.pool.apply_parameters(fee_bps, curve_beta, curve_mode)?;

        emit!(PoolCreated {
            pool: self.pool.key(),
            mint0: self.mint0.key(),
            mint1: self.mint1.key(),
            fee_bps,
            curve_beta,
            curve_mode: mode as u8,
        });

        msg!("Pool created: {} / {}", self.mint0.key(), self.mint1.key());

        Ok(())
    }
}
