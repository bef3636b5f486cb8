//! Pool State
//!
//! The single-pair invariant engine: reserves, adaptive pricing parameters,
//! TWAP accumulators and protocol-fee accruals.
//!
//! Reserves are mirrors of the vault balances net of protocol-fee accruals;
//! they are mutated only by the swap/liquidity instructions. The pricing
//! parameters are mutated only through [`Pool::apply_parameters`], which is
//! reachable solely from the registry and arena paths — the pool stores
//! those two controller addresses as an explicit allow-list and the
//! instruction contexts check membership before any mutation.

use anchor_lang::prelude::*;

use crate::curve::{accumulate_price, CurveMode, MAX_FEE_BPS};

/// The adaptive constant-product pool (singleton PDA)
///
/// Seeds: ["pool"]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Token mints of the traded pair
    pub mint0: Pubkey,
    pub mint1: Pubkey,

    /// Vault token accounts holding the reserves (pool authority)
    pub vault0: Pubkey,
    pub vault1: Pubkey,

    /// LP share mint (pool authority)
    pub lp_mint: Pubkey,

    /// Sink account holding the permanently locked minimum liquidity
    pub lp_lock: Pubkey,

    /// Reserve mirrors, excluding protocol-fee accruals
    pub reserve0: u64,
    pub reserve1: u64,

    /// Swap fee in basis points, capped at `MAX_FEE_BPS`
    pub fee_bps: u16,

    /// Curve-mode intensity, fixed point at 10_000 (= 1.0)
    pub curve_beta: u64,

    /// Active pricing-adjustment strategy
    pub curve_mode: CurveMode,

    /// TWAP integrals, Q64.64 price-seconds, wrapping at 2^128
    pub price0_cumulative_last: u128,
    pub price1_cumulative_last: u128,

    /// Timestamp of the last TWAP accumulation
    pub last_update_ts: i64,

    /// Share of the swap fee skimmed for the protocol, basis points
    pub protocol_fee_bps: u16,

    /// Accrued protocol fees awaiting collection, per token
    pub protocol_fee_accum0: u64,
    pub protocol_fee_accum1: u64,

    /// Controller allow-list: the only callers that may change parameters.
    /// Wired once post-construction; `Pubkey::default()` until then.
    pub registry: Pubkey,
    pub arena: Pubkey,

    /// Lifetime swap count
    pub trade_count: u64,

    /// Lifetime input volume per token
    pub volume0: u128,
    pub volume1: u128,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";
    pub const LP_MINT_SEED: &'static [u8] = b"lp_mint";

    /// Fold elapsed time into the price integrals using the reserves as
    /// they stand, then stamp the clock. Must run before any reserve
    /// mutation in the same instruction.
    pub fn update_cumulative_prices(&mut self, now: i64) {
        if now > self.last_update_ts && self.reserve0 > 0 && self.reserve1 > 0 {
            let elapsed = (now - self.last_update_ts) as u64;
            self.price0_cumulative_last = accumulate_price(
                self.price0_cumulative_last,
                self.reserve1,
                self.reserve0,
                elapsed,
            );
            self.price1_cumulative_last = accumulate_price(
                self.price1_cumulative_last,
                self.reserve0,
                self.reserve1,
                elapsed,
            );
        }
        self.last_update_ts = now;
    }

    /// Apply a validated parameter tuple. Absolute caps only — cooldown and
    /// delta bounds are the governance layer's job and are enforced before
    /// control ever reaches here.
    pub fn apply_parameters(&mut self, fee_bps: u16, curve_beta: u64, curve_mode: u8) -> Result<CurveMode> {
        require!(fee_bps <= MAX_FEE_BPS, PoolError::FeeTooHigh);
        let mode = CurveMode::from_u8(curve_mode).ok_or(PoolError::InvalidCurveMode)?;

        self.fee_bps = fee_bps;
        self.curve_beta = curve_beta;
        self.curve_mode = mode;
        Ok(mode)
    }
}

#[error_code]
pub enum PoolError {
    #[msg("Fee exceeds the absolute cap")]
    FeeTooHigh,
    #[msg("Unknown curve mode")]
    InvalidCurveMode,
    #[msg("Caller is not an authorized parameter controller")]
    UnauthorizedController,
    #[msg("Amount must be positive")]
    ZeroAmount,
    #[msg("Pool has no liquidity")]
    EmptyReserves,
    #[msg("Output below the requested minimum")]
    InsufficientOutput,
    #[msg("Insufficient liquidity for this operation")]
    InsufficientLiquidity,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Controllers are already wired")]
    ControllersAlreadySet,
    #[msg("Arithmetic overflow")]
    Overflow,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::accumulator_delta;

    fn pool() -> Pool {
        Pool {
            mint0: Pubkey::default(),
            mint1: Pubkey::default(),
            vault0: Pubkey::default(),
            vault1: Pubkey::default(),
            lp_mint: Pubkey::default(),
            lp_lock: Pubkey::default(),
            reserve0: 1_000_000,
            reserve1: 4_000_000,
            fee_bps: 30,
            curve_beta: 10_000,
            curve_mode: CurveMode::Normal,
            price0_cumulative_last: 0,
            price1_cumulative_last: 0,
            last_update_ts: 100,
            protocol_fee_bps: 0,
            protocol_fee_accum0: 0,
            protocol_fee_accum1: 0,
            registry: Pubkey::default(),
            arena: Pubkey::default(),
            trade_count: 0,
            volume0: 0,
            volume1: 0,
            bump: 255,
        }
    }

    #[test]
    fn twap_accumulates_prior_reserves_over_elapsed_time() {
        let mut p = pool();
        p.update_cumulative_prices(160);

        // price0 = reserve1/reserve0 = 4.0 over 60s
        assert_eq!(p.price0_cumulative_last, (4u128 << 64) * 60);
        // price1 = 0.25 over 60s
        assert_eq!(p.price1_cumulative_last, (1u128 << 64) / 4 * 60);
        assert_eq!(p.last_update_ts, 160);
    }

    #[test]
    fn twap_is_nondecreasing_for_increasing_timestamps() {
        let mut p = pool();
        let mut prev = p.price0_cumulative_last;
        for now in [101, 150, 151, 3_600, 86_400] {
            p.update_cumulative_prices(now);
            assert!(accumulator_delta(prev, p.price0_cumulative_last) < u128::MAX / 2);
            assert!(p.price0_cumulative_last >= prev);
            prev = p.price0_cumulative_last;
        }
    }

    #[test]
    fn twap_skips_when_clock_has_not_moved() {
        let mut p = pool();
        p.update_cumulative_prices(100);
        assert_eq!(p.price0_cumulative_last, 0);
    }

    #[test]
    fn apply_parameters_enforces_absolute_caps() {
        let mut p = pool();
        assert!(p.apply_parameters(501, 0, 0).is_err());
        assert!(p.apply_parameters(100, 0, 3).is_err());

        let mode = p.apply_parameters(500, 25_000, 1).unwrap();
        assert_eq!(mode, CurveMode::Defensive);
        assert_eq!(p.fee_bps, 500);
        assert_eq!(p.curve_beta, 25_000);
    }
}
