//! Slashing
//!
//! A penalty, not an expulsion: the slashed agent stays active and may keep
//! submitting updates, even if the remaining bond has fallen below the
//! registration minimum. The minimum is only checked at registration time.

use anchor_lang::prelude::*;

use crate::state::{Agent, Config, RegistryConfig, RegistryError};

#[event]
pub struct AgentSlashed {
    pub agent: Pubkey,
    pub amount: u64,
    pub remaining_bond: u64,
    pub reason: String,
}

#[derive(Accounts)]
pub struct SlashAgent<'info> {
    #[account(
        constraint = authority.key() == registry.authority @ RegistryError::NotAuthorized,
    )]
    pub authority: Signer<'info>,

    #[account(seeds = [Config::SEED], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(mut, seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    #[account(
        mut,
        seeds = [Agent::SEED, agent.wallet.as_ref()],
        bump = agent.bump,
        constraint = agent.active @ RegistryError::NotRegistered,
    )]
    pub agent: Account<'info, Agent>,

    /// Slashed lamports land here
    /// CHECK: fixed by the config, nothing is read from it
    #[account(mut, constraint = treasury.key() == config.treasury)]
    pub treasury: UncheckedAccount<'info>,
}

impl<'info> SlashAgent<'info> {
    pub fn slash_agent(&mut self, amount: u64, reason: String) -> Result<()> {
        require!(amount > 0, RegistryError::ZeroAmount);
        require!(
            amount <= self.agent.bond_lamports,
            RegistryError::InsufficientSlashAmount
        );

        self.agent.bond_lamports -= amount;

        let registry_info = self.registry.to_account_info();
        let treasury_info = self.treasury.to_account_info();
        **registry_info.try_borrow_mut_lamports()? -= amount;
        **treasury_info.try_borrow_mut_lamports()? += amount;

        emit!(AgentSlashed {
            agent: self.agent.wallet,
            amount,
            remaining_bond: self.agent.bond_lamports,
            reason,
        });

        Ok(())
    }
}
