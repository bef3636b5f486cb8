//! Bond Management
//!
//! Native bond top-ups plus the optional fungible-token bond. Token-bond
//! deposits are balance-diff measured like every other inbound transfer;
//! withdrawal is only possible once the agent has deregistered.

use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer as system_transfer, Transfer as SystemTransfer};
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::state::{Agent, Config, PoolError, RegistryConfig, RegistryError};

#[event]
pub struct BondToppedUp {
    pub agent: Pubkey,
    pub amount: u64,
    pub total_bond: u64,
}

#[event]
pub struct TokenBondDeposited {
    pub agent: Pubkey,
    pub amount: u64,
    pub total_token_bond: u64,
}

#[event]
pub struct TokenBondWithdrawn {
    pub agent: Pubkey,
    pub amount: u64,
}

#[derive(Accounts)]
pub struct TopUpBond<'info> {
    #[account(mut)]
    pub wallet: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    #[account(
        mut,
        seeds = [Agent::SEED, wallet.key().as_ref()],
        bump = agent.bump,
        constraint = agent.active @ RegistryError::NotRegistered,
    )]
    pub agent: Account<'info, Agent>,

    pub system_program: Program<'info, System>,
}

impl<'info> TopUpBond<'info> {
    pub fn top_up_bond(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, RegistryError::ZeroAmount);

        system_transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                SystemTransfer {
                    from: self.wallet.to_account_info(),
                    to: self.registry.to_account_info(),
                },
            ),
            amount,
        )?;

        self.agent.bond_lamports = self
            .agent
            .bond_lamports
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;

        emit!(BondToppedUp {
            agent: self.wallet.key(),
            amount,
            total_bond: self.agent.bond_lamports,
        });

        Ok(())
    }
}

#[derive(Accounts)]
pub struct DepositTokenBond<'info> {
    #[account(mut)]
    pub wallet: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    #[account(
        mut,
        seeds = [Agent::SEED, wallet.key().as_ref()],
        bump = agent.bump,
        constraint = agent.active @ RegistryError::NotRegistered,
    )]
    pub agent: Account<'info, Agent>,

    #[account(constraint = token_bond_mint.key() == registry.token_bond_mint)]
    pub token_bond_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = token_bond_mint,
        associated_token::authority = wallet,
    )]
    pub wallet_token: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = token_bond_vault.key() == registry.token_bond_vault)]
    pub token_bond_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> DepositTokenBond<'info> {
    pub fn deposit_token_bond(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, RegistryError::ZeroAmount);

        let pre = self.token_bond_vault.amount;
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.wallet_token.to_account_info(),
                    mint: self.token_bond_mint.to_account_info(),
                    to: self.token_bond_vault.to_account_info(),
                    authority: self.wallet.to_account_info(),
                },
            ),
            amount,
            self.token_bond_mint.decimals,
        )?;
        self.token_bond_vault.reload()?;
        let actual = self.token_bond_vault.amount - pre;
        require!(actual > 0, RegistryError::ZeroAmount);

        self.agent.token_bond = self
            .agent
            .token_bond
            .checked_add(actual)
            .ok_or(PoolError::Overflow)?;

        emit!(TokenBondDeposited {
            agent: self.wallet.key(),
            amount: actual,
            total_token_bond: self.agent.token_bond,
        });

        Ok(())
    }
}

#[derive(Accounts)]
pub struct WithdrawTokenBond<'info> {
    #[account(mut)]
    pub wallet: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = !config.paused @ PoolError::ProtocolPaused,
    )]
    pub config: Account<'info, Config>,

    #[account(seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    #[account(
        mut,
        seeds = [Agent::SEED, wallet.key().as_ref()],
        bump = agent.bump,
        constraint = !agent.active @ RegistryError::StillActive,
    )]
    pub agent: Account<'info, Agent>,

    #[account(constraint = token_bond_mint.key() == registry.token_bond_mint)]
    pub token_bond_mint: InterfaceAccount<'info, Mint>,

    #[account(
        mut,
        associated_token::mint = token_bond_mint,
        associated_token::authority = wallet,
    )]
    pub wallet_token: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, constraint = token_bond_vault.key() == registry.token_bond_vault)]
    pub token_bond_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> WithdrawTokenBond<'info> {
    pub fn withdraw_token_bond(&mut self) -> Result<()> {
        let amount = self.agent.token_bond;
        require!(amount > 0, RegistryError::ZeroAmount);

        // zero before transferring out
        self.agent.token_bond = 0;

        let registry_seeds = &[RegistryConfig::SEED, &[self.registry.bump]];
        let signer_seeds = &[&registry_seeds[..]];
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.token_bond_vault.to_account_info(),
                    mint: self.token_bond_mint.to_account_info(),
                    to: self.wallet_token.to_account_info(),
                    authority: self.registry.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
            self.token_bond_mint.decimals,
        )?;

        emit!(TokenBondWithdrawn {
            agent: self.wallet.key(),
            amount,
        });

        Ok(())
    }
}
