//! # Curve Engine
//!
//! Curve-mode input adjustment and constant-product swap quoting.
//!
//! ## Whale damping
//!
//! Let `w = amount_in / reserve_in` (the whale ratio, fixed point at 1e4).
//!
//! ```text
//! Defensive:           penalty = beta * w²
//! VolatilityAdaptive:  penalty = beta * w
//!
//! effective_in = amount_in * SCALE / (SCALE + penalty)
//! ```
//!
//! A 1% trade in Defensive mode with beta = 1.0 loses ~0.01% of its priced
//! input; a 10% trade loses ~1%. The quadratic term is what makes a single
//! large trade strictly worse than the same volume split into pieces.
//!
//! All arithmetic is checked in u128; overflow is an error, never a wrap.

use anchor_lang::prelude::*;

/// Fixed-point scale shared by `curve_beta` and the whale ratio (1.0 = 10_000).
pub const BETA_SCALE: u128 = 10_000;

/// Basis-point denominator for fees.
pub const BPS_DENOM: u128 = 10_000;

/// Hard cap on the swap fee (5%).
pub const MAX_FEE_BPS: u16 = 500;

/// Errors raised by the pure pricing math
#[error_code]
pub enum CurveError {
    #[msg("Amount must be positive")]
    ZeroAmount,
    #[msg("Pool has no reserves on one side")]
    EmptyReserves,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Computed output would not leave the pool solvent")]
    ExcessiveOutput,
}

/// Pricing-adjustment strategy applied before constant-product math
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum CurveMode {
    /// Plain constant product
    #[default]
    Normal,
    /// Quadratic whale penalty
    Defensive,
    /// Linear size penalty
    VolatilityAdaptive,
}

impl CurveMode {
    /// Decode the wire representation; `None` for anything above 2.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CurveMode::Normal),
            1 => Some(CurveMode::Defensive),
            2 => Some(CurveMode::VolatilityAdaptive),
            _ => None,
        }
    }
}

/// Everything a swap needs to know about pricing, before custody moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Input credited for pricing after the curve adjustment
    pub effective_in: u64,
    /// Swap fee taken out of the effective input
    pub fee_amount: u64,
    /// Slice of the fee accrued to the protocol, in output-token units
    pub protocol_fee: u64,
    /// Constant-product output owed to the trader
    pub amount_out: u64,
}

/// Apply the curve-mode penalty to an incoming amount.
///
/// Returns the amount credited for pricing. Always `<= amount_in`; equality
/// holds in Normal mode and for `beta == 0`.
pub fn apply_curve(
    amount_in: u64,
    reserve_in: u64,
    mode: CurveMode,
    beta: u64,
) -> Result<u64> {
    require!(amount_in > 0, CurveError::ZeroAmount);
    require!(reserve_in > 0, CurveError::EmptyReserves);

    let penalty: u128 = match mode {
        CurveMode::Normal => 0,
        CurveMode::Defensive => {
            let w = whale_ratio(amount_in, reserve_in)?;
            let w_sq = w.checked_mul(w).ok_or(CurveError::Overflow)?;
            (beta as u128)
                .checked_mul(w_sq)
                .ok_or(CurveError::Overflow)?
                / (BETA_SCALE * BETA_SCALE)
        }
        CurveMode::VolatilityAdaptive => {
            let w = whale_ratio(amount_in, reserve_in)?;
            (beta as u128).checked_mul(w).ok_or(CurveError::Overflow)? / BETA_SCALE
        }
    };

    let denom = BETA_SCALE.checked_add(penalty).ok_or(CurveError::Overflow)?;
    let effective = (amount_in as u128)
        .checked_mul(BETA_SCALE)
        .ok_or(CurveError::Overflow)?
        / denom;

    Ok(effective as u64)
}

/// Trade size relative to the reserve, fixed point at `BETA_SCALE`.
fn whale_ratio(amount_in: u64, reserve_in: u64) -> Result<u128> {
    Ok((amount_in as u128)
        .checked_mul(BETA_SCALE)
        .ok_or(CurveError::Overflow)?
        / (reserve_in as u128))
}

/// Quote a swap end to end: curve adjustment, fee split, constant-product
/// output. `amount_in` must be the *actually received* amount (balance-diff
/// measured); the caller is responsible for custody.
pub fn quote_swap(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u16,
    protocol_fee_bps: u16,
    mode: CurveMode,
    beta: u64,
) -> Result<SwapQuote> {
    require!(reserve_in > 0 && reserve_out > 0, CurveError::EmptyReserves);

    let effective_in = apply_curve(amount_in, reserve_in, mode, beta)?;
    require!(effective_in > 0, CurveError::ZeroAmount);

    let fee_amount = (effective_in as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(CurveError::Overflow)?
        / BPS_DENOM;
    let protocol_fee = fee_amount
        .checked_mul(protocol_fee_bps as u128)
        .ok_or(CurveError::Overflow)?
        / BPS_DENOM;

    let net_in = (effective_in as u128) - fee_amount;
    require!(net_in > 0, CurveError::ZeroAmount);

    // x * y = k on the net effective input
    let amount_out = (reserve_out as u128)
        .checked_mul(net_in)
        .ok_or(CurveError::Overflow)?
        / ((reserve_in as u128)
            .checked_add(net_in)
            .ok_or(CurveError::Overflow)?);

    // The output reserve funds both the trade and the protocol skim.
    let total_out = amount_out
        .checked_add(protocol_fee)
        .ok_or(CurveError::Overflow)?;
    require!(total_out < reserve_out as u128, CurveError::ExcessiveOutput);

    Ok(SwapQuote {
        effective_in,
        fee_amount: fee_amount as u64,
        protocol_fee: protocol_fee as u64,
        amount_out: amount_out as u64,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const R: u64 = 1_000_000_000; // 1000 tokens at 6 decimals

    fn ratio(amount_in: u64, quote: &SwapQuote) -> f64 {
        quote.amount_out as f64 / amount_in as f64
    }

    #[test]
    fn normal_mode_is_identity() {
        assert_eq!(apply_curve(12_345, R, CurveMode::Normal, 50_000).unwrap(), 12_345);
    }

    #[test]
    fn zero_beta_is_identity_in_every_mode() {
        for mode in [CurveMode::Defensive, CurveMode::VolatilityAdaptive] {
            assert_eq!(apply_curve(12_345, R, mode, 0).unwrap(), 12_345);
        }
    }

    #[test]
    fn defensive_penalty_is_quadratic() {
        // beta = 1.0. A 1% trade should lose ~0.01% of priced input,
        // a 10% trade ~1%.
        let small = apply_curve(R / 100, R, CurveMode::Defensive, 10_000).unwrap();
        let large = apply_curve(R / 10, R, CurveMode::Defensive, 10_000).unwrap();

        let small_loss = 1.0 - small as f64 / (R / 100) as f64;
        let large_loss = 1.0 - large as f64 / (R / 10) as f64;

        assert!(small_loss < 0.0002, "small loss {small_loss}");
        assert!(large_loss > 0.008 && large_loss < 0.012, "large loss {large_loss}");
    }

    #[test]
    fn adaptive_penalty_is_linear() {
        let small = apply_curve(R / 100, R, CurveMode::VolatilityAdaptive, 10_000).unwrap();
        let large = apply_curve(R / 10, R, CurveMode::VolatilityAdaptive, 10_000).unwrap();

        let small_loss = 1.0 - small as f64 / (R / 100) as f64;
        let large_loss = 1.0 - large as f64 / (R / 10) as f64;

        // 10x the size, ~10x the relative loss
        let factor = large_loss / small_loss;
        assert!(factor > 8.0 && factor < 12.0, "factor {factor}");
    }

    #[test]
    fn effective_never_exceeds_actual() {
        for amount in [1u64, R / 1000, R / 10, R, 5 * R] {
            for mode in [CurveMode::Normal, CurveMode::Defensive, CurveMode::VolatilityAdaptive] {
                let eff = apply_curve(amount, R, mode, 25_000).unwrap();
                assert!(eff <= amount);
            }
        }
    }

    #[test]
    fn rejects_zero_and_empty() {
        assert!(apply_curve(0, R, CurveMode::Normal, 0).is_err());
        assert!(apply_curve(100, 0, CurveMode::Normal, 0).is_err());
    }

    #[test]
    fn curve_mode_wire_decoding() {
        assert_eq!(CurveMode::from_u8(0), Some(CurveMode::Normal));
        assert_eq!(CurveMode::from_u8(1), Some(CurveMode::Defensive));
        assert_eq!(CurveMode::from_u8(2), Some(CurveMode::VolatilityAdaptive));
        assert_eq!(CurveMode::from_u8(3), None);
    }

    #[test]
    fn whale_ordering_in_defensive_mode() {
        // A 2x trade must see a worse execution ratio than a 1x trade, by
        // more than the plain price-impact difference in Normal mode.
        let x = R / 20;

        let n1 = quote_swap(x, R, R, 30, 0, CurveMode::Normal, 10_000).unwrap();
        let n2 = quote_swap(2 * x, R, R, 30, 0, CurveMode::Normal, 10_000).unwrap();
        let d1 = quote_swap(x, R, R, 30, 0, CurveMode::Defensive, 10_000).unwrap();
        let d2 = quote_swap(2 * x, R, R, 30, 0, CurveMode::Defensive, 10_000).unwrap();

        let normal_gap = ratio(x, &n1) - ratio(2 * x, &n2);
        let defensive_gap = ratio(x, &d1) - ratio(2 * x, &d2);

        assert!(normal_gap > 0.0);
        assert!(defensive_gap > normal_gap, "defensive {defensive_gap} vs normal {normal_gap}");
    }

    #[test]
    fn constant_product_never_decreases() {
        // Custody adds the actual input; the quote prices the damped input.
        // k must be non-decreasing across a mixed sequence of swaps.
        let mut r0: u64 = R;
        let mut r1: u64 = 2 * R;
        let trades: [(bool, u64); 6] = [
            (true, R / 50),
            (false, R / 9),
            (true, R / 4),
            (false, R / 100),
            (true, 3_333_337),
            (false, R / 2),
        ];

        for (i, (zero_for_one, amount)) in trades.into_iter().enumerate() {
            let k_before = r0 as u128 * r1 as u128;
            let (rin, rout) = if zero_for_one { (r0, r1) } else { (r1, r0) };
            let q = quote_swap(amount, rin, rout, 30, 0, CurveMode::Defensive, 20_000).unwrap();
            if zero_for_one {
                r0 += amount;
                r1 -= q.amount_out;
            } else {
                r1 += amount;
                r0 -= q.amount_out;
            }
            let k_after = r0 as u128 * r1 as u128;
            assert!(k_after >= k_before, "k decreased on trade {i}");
        }
    }

    #[test]
    fn fee_and_protocol_split() {
        let q = quote_swap(1_000_000, R, R, 100, 2_000, CurveMode::Normal, 0).unwrap();
        // 1% fee of 1_000_000 effective
        assert_eq!(q.fee_amount, 10_000);
        // 20% of the fee goes to the protocol
        assert_eq!(q.protocol_fee, 2_000);
        assert!(q.amount_out < 1_000_000);
    }

    #[test]
    fn cannot_drain_output_reserve() {
        // Tiny output side: a huge trade must not quote the reserve away.
        let res = quote_swap(u64::MAX / 4, 1_000, 1_000, 0, 0, CurveMode::Normal, 0);
        match res {
            Ok(q) => assert!(q.amount_out < 1_000),
            Err(_) => {}
        }
    }
}
