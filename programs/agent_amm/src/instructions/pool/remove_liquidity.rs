//! Liquidity Withdrawal
//!
//! Burns LP shares for a pro-rata slice of both reserves. Shares are burned
//! and reserves written down before any token leaves the vaults.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::curve::amounts_for_burn;
use crate::state::{Config, Pool, PoolError};

#[event]
pub struct LiquidityRemoved {
    pub provider: Pubkey,
    pub liquidity: u64,
    pub amount0: u64,
    pub amount1: u64,
    pub reserve0: u64,
    pub reserve1: u64,
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

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

    #[account(
        mut,
        associated_token::mint = mint0,
        associated_token::authority = provider,
    )]
    pub provider_token0: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint1,
        associated_token::authority = provider,
    )]
    pub provider_token1: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = vault0.key() == pool.vault0)]
    pub vault0: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = vault1.key() == pool.vault1)]
    pub vault1: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = lp_mint.key() == pool.lp_mint)]
    pub lp_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
    )]
    pub provider_lp: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> RemoveLiquidity<'info> {
    pub fn remove_liquidity(&mut self, liquidity: u64) -> Result<(u64, u64)> {
        require!(liquidity > 0, PoolError::ZeroAmount);
        require!(
            self.provider_lp.amount >= liquidity,
            PoolError::InsufficientLiquidity
        );

        let now = Clock::get()?.unix_timestamp;
        self.pool.update_cumulative_prices(now);

        let (amount0, amount1) = amounts_for_burn(
            liquidity,
            self.pool.reserve0,
            self.pool.reserve1,
            self.lp_mint.supply,
        )?;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.lp_mint.to_account_info(),
                    from: self.provider_lp.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            liquidity,
        )?;

        self.pool.reserve0 -= amount0;
        self.pool.reserve1 -= amount1;

        self.withdraw(&self.vault0, &self.provider_token0, &self.mint0, amount0)?;
        self.withdraw(&self.vault1, &self.provider_token1, &self.mint1, amount1)?;

        emit!(LiquidityRemoved {
            provider: self.provider.key(),
            liquidity,
            amount0,
            amount1,
            reserve0: self.pool.reserve0,
            reserve1: self.pool.reserve1,
        });

        Ok((amount0, amount1))
    }

    fn withdraw(
        &self,
        from: &InterfaceAccount<'info, TokenAccount>,
        to: &InterfaceAccount<'info, TokenAccount>,
        mint: &InterfaceAccount<'info, Mint>,
        amount: u64,
    ) -> Result<()> {
        let pool_seeds = &[Pool::SEED, &[self.pool.bump]];
        let signer_seeds = &[&pool_seeds[..]];
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: from.to_account_info(),
                    mint: mint.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            mint.decimals,
        )
    }
}
