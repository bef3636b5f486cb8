//! Protocol Fee Collection
//!
//! Moves accrued protocol fees from the vaults to the treasury. Permissionless
//! by design: the recipient is fixed in the config, so there is nothing for a
//! caller to redirect.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::{Config, Pool, PoolError};

#[event]
pub struct ProtocolFeesCollected {
    pub amount0: u64,
    pub amount1: u64,
    pub treasury: Pubkey,
}

#[derive(Accounts)]
pub struct CollectProtocolFees<'info> {
    /// Anyone may crank the collection
    pub caller: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [Pool::SEED], bump = pool.bump)]
    pub pool: Account<'info, Pool>,

    #[account(constraint = mint0.key() == pool.mint0)]
    pub mint0: InterfaceAccount<'info, Mint>,

    #[account(constraint = mint1.key() == pool.mint1)]
    pub mint1: InterfaceAccount<'info, Mint>,

    #[account(mut, constraint = vault0.key() == pool.vault0)]
    pub vault0: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = vault1.key() == pool.vault1)]
    pub vault1: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = mint0,
        constraint = treasury_token0.owner == config.treasury,
    )]
    pub treasury_token0: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = mint1,
        constraint = treasury_token1.owner == config.treasury,
    )]
    pub treasury_token1: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> CollectProtocolFees<'info> {
    pub fn collect_protocol_fees(&mut self) -> Result<()> {
        let amount0 = self.pool.protocol_fee_accum0;
        let amount1 = self.pool.protocol_fee_accum1;

        // zero the accruals before anything leaves the vaults
        self.pool.protocol_fee_accum0 = 0;
        self.pool.protocol_fee_accum1 = 0;

        let pool_seeds = &[Pool::SEED, &[self.pool.bump]];
        let signer_seeds = &[&pool_seeds[..]];

        if amount0 > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault0.to_account_info(),
                        mint: self.mint0.to_account_info(),
                        to: self.treasury_token0.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    signer_seeds,
                ),
                amount0,
                self.mint0.decimals,
            )?;
        }
        if amount1 > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault1.to_account_info(),
                        mint: self.mint1.to_account_info(),
                        to: self.treasury_token1.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    signer_seeds,
                ),
                amount1,
                self.mint1.decimals,
            )?;
        }

        emit!(ProtocolFeesCollected {
            amount0,
            amount1,
            treasury: self.config.treasury,
        });

        Ok(())
    }
}
