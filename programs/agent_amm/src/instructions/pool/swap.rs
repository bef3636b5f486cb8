//! Swapping
//!
//! The curve adjustment affects pricing only; custody always moves the
//! actual, balance-diff-measured input into the vault. The input reserve
//! therefore grows by the actual amount while the quote was computed on the
//! (possibly damped) effective amount — that asymmetry is what keeps
//! `reserve0 * reserve1` from ever decreasing across a swap.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::curve::quote_swap;
use crate::state::{Config, Pool, PoolError};

#[event]
pub struct SwapExecuted {
    pub trader: Pubkey,
    pub zero_for_one: bool,
    pub amount_in: u64,
    pub effective_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee: u64,
    pub reserve0: u64,
    pub reserve1: u64,
}

#[derive(Accounts)]
pub struct Swap<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

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

    /// Trader's source account; mint checked against the direction in the
    /// handler
    #[account(mut, constraint = trader_source.owner == trader.key())]
    pub trader_source: InterfaceAccount<'info, TokenAccount>,

    /// Trader's destination account; mint checked in the handler
    #[account(mut, constraint = trader_destination.owner == trader.key())]
    pub trader_destination: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = vault0.key() == pool.vault0)]
    pub vault0: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = vault1.key() == pool.vault1)]
    pub vault1: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> Swap<'info> {
    pub fn swap(&mut self, zero_for_one: bool, amount_in: u64, min_amount_out: u64) -> Result<u64> {
        require!(amount_in > 0, PoolError::ZeroAmount);
        require!(
            self.pool.reserve0 > 0 && self.pool.reserve1 > 0,
            PoolError::EmptyReserves
        );

        let (in_mint, out_mint) = if zero_for_one {
            (self.mint0.key(), self.mint1.key())
        } else {
            (self.mint1.key(), self.mint0.key())
        };
        require_keys_eq!(self.trader_source.mint, in_mint);
        require_keys_eq!(self.trader_destination.mint, out_mint);

        let now = Clock::get()?.unix_timestamp;
        self.pool.update_cumulative_prices(now);

        let (reserve_in, reserve_out) = if zero_for_one {
            (self.pool.reserve0, self.pool.reserve1)
        } else {
            (self.pool.reserve1, self.pool.reserve0)
        };

        // measure what the vault actually received
        let (vault_in, mint_in) = if zero_for_one {
            (&self.vault0, &self.mint0)
        } else {
            (&self.vault1, &self.mint1)
        };
        let pre = vault_in.amount;
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.trader_source.to_account_info(),
                    mint: mint_in.to_account_info(),
                    to: vault_in.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            amount_in,
            mint_in.decimals,
        )?;
        let vault_in = if zero_for_one { &mut self.vault0 } else { &mut self.vault1 };
        vault_in.reload()?;
        let actual_in = vault_in.amount - pre;
        require!(actual_in > 0, PoolError::ZeroAmount);

        let quote = quote_swap(
            actual_in,
            reserve_in,
            reserve_out,
            self.pool.fee_bps,
            self.pool.protocol_fee_bps,
            self.pool.curve_mode,
            self.pool.curve_beta,
        )?;
        require!(
            quote.amount_out >= min_amount_out,
            PoolError::InsufficientOutput
        );

        // all bookkeeping settles before the outbound transfer
        let total_out = quote.amount_out + quote.protocol_fee;
        let pool = &mut self.pool;
        if zero_for_one {
            pool.reserve0 = pool.reserve0.checked_add(actual_in).ok_or(PoolError::Overflow)?;
            pool.reserve1 = pool
                .reserve1
                .checked_sub(total_out)
                .ok_or(PoolError::Overflow)?;
            pool.protocol_fee_accum1 = pool
                .protocol_fee_accum1
                .checked_add(quote.protocol_fee)
                .ok_or(PoolError::Overflow)?;
            pool.volume0 += actual_in as u128;
        } else {
            pool.reserve1 = pool.reserve1.checked_add(actual_in).ok_or(PoolError::Overflow)?;
            pool.reserve0 = pool
                .reserve0
                .checked_sub(total_out)
                .ok_or(PoolError::Overflow)?;
            pool.protocol_fee_accum0 = pool
                .protocol_fee_accum0
                .checked_add(quote.protocol_fee)
                .ok_or(PoolError::Overflow)?;
            pool.volume1 += actual_in as u128;
        }
        pool.trade_count += 1;

        // pay out
        let pool_seeds = &[Pool::SEED, &[self.pool.bump]];
        let signer_seeds = &[&pool_seeds[..]];
        let (vault_out, mint_out) = if zero_for_one {
            (&self.vault1, &self.mint1)
        } else {
            (&self.vault0, &self.mint0)
        };
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: vault_out.to_account_info(),
                    mint: mint_out.to_account_info(),
                    to: self.trader_destination.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                signer_seeds,
            ),
            quote.amount_out,
            mint_out.decimals,
        )?;

        emit!(SwapExecuted {
            trader: self.trader.key(),
            zero_for_one,
            amount_in: actual_in,
            effective_in: quote.effective_in,
            amount_out: quote.amount_out,
            fee_amount: quote.fee_amount,
            protocol_fee: quote.protocol_fee,
            reserve0: self.pool.reserve0,
            reserve1: self.pool.reserve1,
        });

        Ok(quote.amount_out)
    }
}
