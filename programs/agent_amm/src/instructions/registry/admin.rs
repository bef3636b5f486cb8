//! Registry Setup & Bound Administration
//!
//! The registry's safety envelope (minimum bond, cooldown, per-update delta
//! caps) is only adjustable by the registry authority, which deployments are
//! expected to point at a timelock so every bound change is delayed and
//! publicly visible before it executes.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::state::{Config, PoolError, RegistryConfig, RegistryError};

#[event]
pub struct RegistryBoundsUpdated {
    pub min_bond: u64,
    pub cooldown_seconds: i64,
    pub max_fee_delta: u16,
    pub max_beta_delta: u64,
}

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
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
        space = 8 + RegistryConfig::INIT_SPACE,
        seeds = [RegistryConfig::SEED],
        bump,
    )]
    pub registry: Account<'info, RegistryConfig>,

    /// Mint for the optional token bond
    pub token_bond_mint: InterfaceAccount<'info, Mint>,

    /// Vault holding all token bonds, registry authority
    #[account(
        init,
        payer = admin,
        associated_token::mint = token_bond_mint,
        associated_token::authority = registry,
    )]
    pub token_bond_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeRegistry<'info> {
    #[allow(clippy::too_many_arguments)]
    pub fn initialize_registry(
        &mut self,
        authority: Pubkey,
        min_bond: u64,
        cooldown_seconds: i64,
        max_fee_delta: u16,
        max_beta_delta: u64,
        bumps: InitializeRegistryBumps,
    ) -> Result<()> {
        self.registry.set_inner(RegistryConfig {
            authority,
            min_bond,
            cooldown_seconds,
            max_fee_delta,
            max_beta_delta,
            token_bond_mint: self.token_bond_mint.key(),
            token_bond_vault: self.token_bond_vault.key(),
            agent_count: 0,
            bump: bumps.registry,
        });

        msg!("Registry initialized, authority {}", authority);

        Ok(())
    }
}

#[derive(Accounts)]
pub struct SetRegistryBounds<'info> {
    #[account(
        constraint = authority.key() == registry.authority @ RegistryError::NotAuthorized,
    )]
    pub authority: Signer<'info>,

    #[account(mut, seeds = [RegistryConfig::SEED], bump = registry.bump)]
    pub registry: Account<'info, RegistryConfig>,
}

impl<'info> SetRegistryBounds<'info> {
    pub fn set_registry_bounds(
        &mut self,
        min_bond: u64,
        cooldown_seconds: i64,
        max_fee_delta: u16,
        max_beta_delta: u64,
    ) -> Result<()> {
        let registry = &mut self.registry;
        registry.min_bond = min_bond;
        registry.cooldown_seconds = cooldown_seconds;
        registry.max_fee_delta = max_fee_delta;
        registry.max_beta_delta = max_beta_delta;

        emit!(RegistryBoundsUpdated {
            min_bond,
            cooldown_seconds,
            max_fee_delta,
            max_beta_delta,
        });

        Ok(())
    }
}
