//! Agent Registration
//!
//! Registration stakes a native bond into the registry account; the bond is
//! what slashing bites into. Deregistration zeroes the native bond and
//! returns it, but deliberately leaves the token bond behind: it can only be
//! withdrawn once the agent is inactive, so an agent can never unstake
//! collateral while still eligible to submit updates.

use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::state::{Agent, Config, PoolError, RegistryConfig, RegistryError};

#[event]
pub struct AgentRegistered {
    pub agent: Pubkey,
    pub bond: u64,
    pub timestamp: i64,
}

#[event]
pub struct AgentDeregistered {
    pub agent: Pubkey,
    pub bond_returned: u64,
}

#[derive(Accounts)]
pub struct RegisterAgent<'info> {
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

    /// Reused on re-registration after a deregister; stats and the
    /// cooldown stamp survive.
    #[account(
        init_if_needed,
        payer = wallet,
        space = 8 + Agent::INIT_SPACE,
        seeds = [Agent::SEED, wallet.key().as_ref()],
        bump,
        constraint = !agent.active @ RegistryError::AlreadyRegistered,
    )]
    pub agent: Account<'info, Agent>,

    pub system_program: Program<'info, System>,
}

impl<'info> RegisterAgent<'info> {
    pub fn register_agent(&mut self, bond: u64, bumps: RegisterAgentBumps) -> Result<()> {
        require!(bond >= self.registry.min_bond, RegistryError::BondTooLow);

        let now = Clock::get()?.unix_timestamp;

        transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                Transfer {
                    from: self.wallet.to_account_info(),
                    to: self.registry.to_account_info(),
                },
            ),
            bond,
        )?;

        // `last_update_ts` is deliberately not reset here: on a reused PDA
        // the previous stamp survives, so a deregister/re-register round
        // trip cannot launder an active cooldown. A fresh PDA starts at 0
        // and the first update skips the cooldown as usual.
        let agent = &mut self.agent;
        agent.wallet = self.wallet.key();
        agent.bond_lamports = bond;
        agent.registered_at = now;
        agent.active = true;
        agent.bump = bumps.agent;

        self.registry.agent_count += 1;

        emit!(AgentRegistered {
            agent: self.wallet.key(),
            bond,
            timestamp: now,
        });

        Ok(())
    }
}

#[derive(Accounts)]
pub struct DeregisterAgent<'info> {
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
}

impl<'info> DeregisterAgent<'info> {
    pub fn deregister_agent(&mut self) -> Result<()> {
        let bond = self.agent.bond_lamports;

        // bookkeeping first
        self.agent.bond_lamports = 0;
        self.agent.active = false;
        self.registry.agent_count -= 1;

        // return the remaining native bond from the registry account
        if bond > 0 {
            let registry_info = self.registry.to_account_info();
            let wallet_info = self.wallet.to_account_info();
            **registry_info.try_borrow_mut_lamports()? -= bond;
            **wallet_info.try_borrow_mut_lamports()? += bond;
        }

        emit!(AgentDeregistered {
            agent: self.wallet.key(),
            bond_returned: bond,
        });

        Ok(())
    }
}
