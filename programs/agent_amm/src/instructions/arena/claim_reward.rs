//! Reward Claims
//!
//! A finalized epoch's winner collects the escrowed reward exactly once.
//! The claimed flag flips before the transfer leaves the vault.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::state::{Arena, Config, EpochRecord, PoolError};

#[event]
pub struct RewardClaimed {
    pub epoch_id: u64,
    pub winner: Pubkey,
    pub amount: u64,
}

#[derive(Accounts)]
#[instruction(epoch_id: u64)]
pub struct ClaimReward<'info> {
    #[account(mut)]
    pub winner: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(seeds = [Arena::SEED], bump = arena.bump)]
    pub arena: Account<'info, Arena>,

    #[account(
        mut,
        seeds = [EpochRecord::SEED, epoch_id.to_le_bytes().as_ref()],
        bump = epoch_record.bump,
    )]
    pub epoch_record: Account<'info, EpochRecord>,

    #[account(constraint = reward_mint.key() == arena.reward_mint)]
    pub reward_mint: InterfaceAccount<'info, Mint>,

    #[account(mut, constraint = reward_vault.key() == arena.reward_vault)]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = winner,
        associated_token::mint = reward_mint,
        associated_token::authority = winner,
    )]
    pub winner_token: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> ClaimReward<'info> {
    pub fn claim_reward(&mut self, epoch_id: u64) -> Result<()> {
        let amount = self.epoch_record.validate_claim(&self.winner.key())?;

        self.epoch_record.reward_claimed = true;

        let arena_seeds = &[Arena::SEED, &[self.arena.bump]];
        let signer_seeds = &[&arena_seeds[..]];
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.reward_vault.to_account_info(),
                    mint: self.reward_mint.to_account_info(),
                    to: self.winner_token.to_account_info(),
                    authority: self.arena.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            self.reward_mint.decimals,
        )?;

        emit!(RewardClaimed {
            epoch_id,
            winner: self.winner.key(),
            amount,
        });

        Ok(())
    }
}
