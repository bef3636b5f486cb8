//! Liquidity Provision
//!
//! Deposits are measured by balance diff: reserves grow by what the vaults
//! actually received, not by what the caller asked to send, so
//! transfer-skimming tokens cannot mint unbacked shares.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::curve::{initial_liquidity, liquidity_for_deposit, MINIMUM_LIQUIDITY};
use crate::state::{Config, Pool, PoolError};

#[event]
pub struct LiquidityAdded {
    pub provider: Pubkey,
    pub amount0: u64,
    pub amount1: u64,
    pub liquidity: u64,
    pub reserve0: u64,
    pub reserve1: u64,
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
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

    #[account(mut, constraint = lp_lock.key() == pool.lp_lock)]
    pub lp_lock: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
    )]
    pub provider_lp: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> AddLiquidity<'info> {
    pub fn add_liquidity(&mut self, amount0: u64, amount1: u64) -> Result<u64> {
        require!(amount0 > 0 && amount1 > 0, PoolError::ZeroAmount);

        let now = Clock::get()?.unix_timestamp;
        self.pool.update_cumulative_prices(now);

        // balance-diff receipt measurement
        let pre0 = self.vault0.amount;
        let pre1 = self.vault1.amount;
        self.deposit(&self.provider_token0, &self.vault0, &self.mint0, amount0)?;
        self.deposit(&self.provider_token1, &self.vault1, &self.mint1, amount1)?;
        self.vault0.reload()?;
        self.vault1.reload()?;
        let actual0 = self.vault0.amount - pre0;
        let actual1 = self.vault1.amount - pre1;
        require!(actual0 > 0 && actual1 > 0, PoolError::ZeroAmount);

        let first_deposit = self.lp_mint.supply == 0;
        let liquidity = if first_deposit {
            initial_liquidity(actual0, actual1)?
        } else {
            liquidity_for_deposit(
                actual0,
                actual1,
                self.pool.reserve0,
                self.pool.reserve1,
                self.lp_mint.supply,
            )?
        };

        self.pool.reserve0 = self
            .pool
            .reserve0
            .checked_add(actual0)
            .ok_or(PoolError::Overflow)?;
        self.pool.reserve1 = self
            .pool
            .reserve1
            .checked_add(actual1)
            .ok_or(PoolError::Overflow)?;

        if first_deposit {
            // the locked minimum defends the share price against a
            // zero-supply manipulation
            self.mint_shares(&self.lp_lock, MINIMUM_LIQUIDITY)?;
        }
        self.mint_shares(&self.provider_lp, liquidity)?;

        emit!(LiquidityAdded {
            provider: self.provider.key(),
            amount0: actual0,
            amount1: actual1,
            liquidity,
            reserve0: self.pool.reserve0,
            reserve1: self.pool.reserve1,
        });

        Ok(liquidity)
    }

    fn deposit(
        &self,
        from: &InterfaceAccount<'info, TokenAccount>,
        to: &InterfaceAccount<'info, TokenAccount>,
        mint: &InterfaceAccount<'info, Mint>,
        amount: u64,
    ) -> Result<()> {
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: from.to_account_info(),
                    mint: mint.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            amount,
            mint.decimals,
        )
    }

    fn mint_shares(&self, to: &InterfaceAccount<'info, TokenAccount>, amount: u64) -> Result<()> {
        let pool_seeds = &[Pool::SEED, &[self.pool.bump]];
        let signer_seeds = &[&pool_seeds[..]];
        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.lp_mint.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )
    }
}
