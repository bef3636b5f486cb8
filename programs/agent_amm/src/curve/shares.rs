//! # LP Share Math
//!
//! Minting and burning of the fungible claim on pool reserves.
//!
//! First deposit mints `floor(sqrt(a0 * a1)) - MINIMUM_LIQUIDITY` to the
//! provider; the `MINIMUM_LIQUIDITY` shares are minted to a pool-owned sink
//! and can never be burned. Subsequent deposits mint on the stricter of the
//! two reserve ratios, so an imbalanced deposit donates the excess to the
//! pool instead of extracting it.

use anchor_lang::prelude::*;

/// Shares permanently locked on the first deposit.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

#[error_code]
pub enum ShareError {
    #[msg("Deposit or withdrawal would mint or return zero")]
    InsufficientLiquidity,
    #[msg("Arithmetic overflow")]
    Overflow,
}

/// Shares minted to the first depositor (the locked minimum is excluded).
pub fn initial_liquidity(actual0: u64, actual1: u64) -> Result<u64> {
    let product = (actual0 as u128)
        .checked_mul(actual1 as u128)
        .ok_or(ShareError::Overflow)?;
    let shares = sqrt(product);
    let minted = shares
        .checked_sub(MINIMUM_LIQUIDITY as u128)
        .ok_or(ShareError::InsufficientLiquidity)?;
    require!(minted > 0, ShareError::InsufficientLiquidity);
    u64::try_from(minted).map_err(|_| ShareError::Overflow.into())
}

/// Shares minted for a follow-up deposit: `min` of the two reserve ratios.
pub fn liquidity_for_deposit(
    actual0: u64,
    actual1: u64,
    reserve0: u64,
    reserve1: u64,
    lp_supply: u64,
) -> Result<u64> {
    require!(reserve0 > 0 && reserve1 > 0, ShareError::InsufficientLiquidity);

    let by0 = (actual0 as u128)
        .checked_mul(lp_supply as u128)
        .ok_or(ShareError::Overflow)?
        / (reserve0 as u128);
    let by1 = (actual1 as u128)
        .checked_mul(lp_supply as u128)
        .ok_or(ShareError::Overflow)?
        / (reserve1 as u128);

    let minted = by0.min(by1);
    require!(minted > 0, ShareError::InsufficientLiquidity);
    u64::try_from(minted).map_err(|_| ShareError::Overflow.into())
}

/// Pro-rata reserve amounts released for burning `liquidity` shares.
pub fn amounts_for_burn(
    liquidity: u64,
    reserve0: u64,
    reserve1: u64,
    lp_supply: u64,
) -> Result<(u64, u64)> {
    require!(liquidity > 0, ShareError::InsufficientLiquidity);
    require!(lp_supply > 0, ShareError::InsufficientLiquidity);

    let amount0 = (liquidity as u128)
        .checked_mul(reserve0 as u128)
        .ok_or(ShareError::Overflow)?
        / (lp_supply as u128);
    let amount1 = (liquidity as u128)
        .checked_mul(reserve1 as u128)
        .ok_or(ShareError::Overflow)?
        / (lp_supply as u128);

    require!(amount0 > 0 && amount1 > 0, ShareError::InsufficientLiquidity);
    Ok((
        u64::try_from(amount0).map_err(|_| ShareError::Overflow)?,
        u64::try_from(amount1).map_err(|_| ShareError::Overflow)?,
    ))
}

/// Integer square root using Newton's method, floor(√x).
pub fn sqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }
    let mut z = (x + 1) / 2;
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }
    y
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(0), 0);
        assert_eq!(sqrt(1), 1);
        assert_eq!(sqrt(4), 2);
        assert_eq!(sqrt(10), 3);
        assert_eq!(sqrt(1_000_000), 1_000);
        assert!(sqrt(u128::from(u64::MAX)).pow(2) <= u128::from(u64::MAX));
    }

    #[test]
    fn first_deposit_locks_minimum() {
        // sqrt(4e12) = 2e6 shares, 1000 locked
        let minted = initial_liquidity(2_000_000, 2_000_000).unwrap();
        assert_eq!(minted, 2_000_000 - MINIMUM_LIQUIDITY);
    }

    #[test]
    fn dust_first_deposit_rejected() {
        // sqrt(900) = 30 < MINIMUM_LIQUIDITY
        assert!(initial_liquidity(30, 30).is_err());
        // exactly the minimum still mints nothing spendable
        assert!(initial_liquidity(1_000, 1_000).is_err());
    }

    #[test]
    fn follow_up_deposit_takes_stricter_ratio() {
        // Pool 1000/1000 with 1000 shares. Deposit 100/500: only the 100
        // side counts; the surplus 400 is donated.
        let minted = liquidity_for_deposit(100, 500, 1_000, 1_000, 1_000).unwrap();
        assert_eq!(minted, 100);
    }

    #[test]
    fn share_proportionality_round_trip() {
        let (r0, r1, supply) = (5_000_000u64, 20_000_000u64, 9_000_000u64);
        let minted = liquidity_for_deposit(500_000, 2_000_000, r0, r1, supply).unwrap();

        // minted shares never exceed supply * min(a0/r0, a1/r1)
        assert!(minted as u128 <= supply as u128 * 500_000 / r0 as u128);

        // burning them immediately returns no more than was deposited
        let (out0, out1) =
            amounts_for_burn(minted, r0 + 500_000, r1 + 2_000_000, supply + minted).unwrap();
        assert!(out0 <= 500_000);
        assert!(out1 <= 2_000_000);
        // and within rounding of it
        assert!(out0 >= 499_000);
        assert!(out1 >= 1_996_000);
    }

    #[test]
    fn burn_of_zero_or_dust_rejected() {
        assert!(amounts_for_burn(0, 1_000, 1_000, 1_000).is_err());
        // 1 share of a huge supply rounds both sides to zero
        assert!(amounts_for_burn(1, 10, 10, 1_000_000).is_err());
    }
}
