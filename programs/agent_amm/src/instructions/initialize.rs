//! Protocol Initialization & Administration
//!
//! Global config setup, the pause circuit breaker, and the one-time wiring
//! of the pool's controller allow-list. Controllers are wired after
//! construction on purpose: the pool, registry and arena reference each
//! other, and two-phase initialization avoids constructor-time cycles.

use anchor_lang::prelude::*;

use crate::state::{Arena, Config, Pool, PoolError, RegistryConfig};

#[event]
pub struct ControllersWired {
    pub pool: Pubkey,
    pub registry: Pubkey,
    pub arena: Pubkey,
}

#[event]
pub struct PauseToggled {
    pub paused: bool,
    pub admin: Pubkey,
}

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(&mut self, treasury: Pubkey, bumps: InitializeBumps) -> Result<()> {
        self.config.set_inner(Config {
            admin: self.admin.key(),
            treasury,
            paused: false,
            bump: bumps.config,
        });

        msg!("Protocol initialized");
        msg!("Admin: {}", self.admin.key());
        msg!("Treasury: {}", treasury);

        Ok(())
    }
}

/// One-time installation of the pool's parameter controllers
#[derive(Accounts)]
pub struct SetControllers<'info> {
    #[account(
        constraint = admin.key() == config.admin @ PoolError::UnauthorizedController,
    )]
    pub admin: Signer<'info>,

    #[account(seeds = [Config::SEED], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [Pool::SEED],
        bump = pool.bump,
        constraint = pool.registry == Pubkey::default() @ PoolError::ControllersAlreadySet,
    )]
    pub pool: Account<'info, Pool>,

    /// The registry PDA being granted parameter authority
    #[account(seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,

    /// The arena PDA being granted parameter authority
    #[account(seeds = [Arena::SEED], bump = arena.bump)]
    pub arena: Account<'info, Arena>,
}

impl<'info> SetControllers<'info> {
    pub fn set_controllers(&mut self) -> Result<()> {
        self.pool.registry = self.registry.key();
        self.pool.arena = self.arena.key();

        emit!(ControllersWired {
            pool: self.pool.key(),
            registry: self.registry.key(),
            arena: self.arena.key(),
        });

        Ok(())
    }
}

/// Flip the global circuit breaker
#[derive(Accounts)]
pub struct SetPaused<'info> {
    #[account(
        constraint = admin.key() == config.admin @ PoolError::UnauthorizedController,
    )]
    pub admin: Signer<'info>,

    #[account(mut, seeds = [Config::SEED], bump = config.bump)]
    pub config: Account<'info, Config>,
}

impl<'info> SetPaused<'info> {
    pub fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.config.paused = paused;
        emit!(PauseToggled {
            paused,
            admin: self.admin.key(),
        });
        Ok(())
    }
}
