//! Arena Setup & Reward Escrow
//!
//! Creates the competition layer and its reward escrow. Rewards are paid
//! from the vault only, so the escrow must be funded before winners can
//! claim; `fund_rewards` is how it gets topped up.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Arena, Config, PoolError};

#[event]
pub struct EpochStarted {
    pub epoch_id: u64,
    pub start_time: i64,
    pub end_time: i64,
}

#[event]
pub struct RewardsFunded {
    pub funder: Pubkey,
    pub amount: u64,
}

#[derive(Accounts)]
pub struct InitializeArena<'info> {
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
        space = 8 + Arena::INIT_SPACE,
        seeds = [Arena::SEED],
        bump,
    )]
    pub arena: Account<'info, Arena>,

    pub reward_mint: InterfaceAccount<'info, Mint>,

    /// Reward escrow, arena authority
    #[account(
        init,
        payer = admin,
        associated_token::mint = reward_mint,
        associated_token::authority = arena,
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeArena<'info> {
    pub fn initialize_arena(
        &mut self,
        scorer: Pubkey,
        epoch_duration: i64,
        reward_amount: u64,
        bumps: InitializeArenaBumps,
    ) -> Result<()> {
        require!(epoch_duration > 0, PoolError::ZeroAmount);

        let now = Clock::get()?.unix_timestamp;

        self.arena.set_inner(Arena {
            scorer,
            epoch_duration,
            reward_mint: self.reward_mint.key(),
            reward_vault: self.reward_vault.key(),
            reward_amount,
            current_epoch_id: 1,
            epoch_start: now,
            epoch_end: now.saturating_add(epoch_duration),
            proposals: vec![],
            total_proposals: 0,
            bump: bumps.arena,
        });

        emit!(EpochStarted {
            epoch_id: 1,
            start_time: now,
            end_time: self.arena.epoch_end,
        });

        msg!("Arena initialized, scorer {}", scorer);

        Ok(())
    }
}

#[derive(Accounts)]
pub struct FundRewards<'info> {
    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(seeds = [Arena::SEED], bump = arena.bump)]
    pub arena: Account<'info, Arena>,

    #[account(constraint = reward_mint.key() == arena.reward_mint)]
    pub reward_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = reward_mint,
        associated_token::authority = funder,
    )]
    pub funder_token: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = reward_vault.key() == arena.reward_vault)]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> FundRewards<'info> {
    pub fn fund_rewards(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, PoolError::ZeroAmount);

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.funder_token.to_account_info(),
                    mint: self.reward_mint.to_account_info(),
                    to: self.reward_vault.to_account_info(),
                    authority: self.funder.to_account_info(),
                },
            ),
            amount,
            self.reward_mint.decimals,
        )?;

        emit!(RewardsFunded {
            funder: self.funder.key(),
            amount,
        });

        Ok(())
    }
}
