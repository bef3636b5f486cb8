//! # TWAP Accumulation
//!
//! Time-weighted price integrals in the Uniswap-v2 style: on every
//! reserve-mutating call the pool adds `price * elapsed` to a wide
//! accumulator, using the reserves *before* the mutation.
//!
//! Prices are Q64.64 fixed point (`(reserve_num << 64) / reserve_den`, which
//! fits in u128 for any u64 reserves). The accumulator wraps at 2^128 by
//! design; consumers take differences between two observations, so the
//! wraparound cancels. This file is the only place in the crate where
//! wrapping arithmetic is permitted.

/// Fixed-point shift for TWAP prices (Q64.64).
pub const TWAP_PRICE_SHIFT: u32 = 64;

/// Spot price of the numerator reserve in terms of the denominator reserve,
/// Q64.64. Caller guarantees `reserve_den > 0`.
pub fn price_q64(reserve_num: u64, reserve_den: u64) -> u128 {
    ((reserve_num as u128) << TWAP_PRICE_SHIFT) / (reserve_den as u128)
}

/// Fold `elapsed` seconds of the current spot price into an accumulator.
///
/// Wraps at 2^128 on purpose; do not replace the wrapping ops with checked
/// ones.
pub fn accumulate_price(acc: u128, reserve_num: u64, reserve_den: u64, elapsed: u64) -> u128 {
    let weighted = price_q64(reserve_num, reserve_den).wrapping_mul(elapsed as u128);
    acc.wrapping_add(weighted)
}

/// Observed price delta between two accumulator readings, tolerant of a
/// single wraparound in between.
pub fn accumulator_delta(earlier: u128, later: u128) -> u128 {
    later.wrapping_sub(earlier)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_q64() {
        // Equal reserves price at exactly 1.0
        assert_eq!(price_q64(1_000, 1_000), 1u128 << TWAP_PRICE_SHIFT);
        // 2:1 reserves price at 2.0
        assert_eq!(price_q64(2_000, 1_000), 2u128 << TWAP_PRICE_SHIFT);
    }

    #[test]
    fn accumulator_is_monotonic_without_wrap() {
        let mut acc = 0u128;
        let mut prev = acc;
        for elapsed in [1u64, 7, 60, 3_600] {
            acc = accumulate_price(acc, 3_000, 1_000, elapsed);
            assert!(acc >= prev);
            prev = acc;
        }
    }

    #[test]
    fn accumulation_weights_by_time() {
        let one_hour = accumulate_price(0, 5_000, 1_000, 3_600);
        let two_hours = accumulate_price(0, 5_000, 1_000, 7_200);
        assert_eq!(two_hours, one_hour * 2);
    }

    #[test]
    fn delta_survives_wraparound() {
        let near_max = u128::MAX - 10;
        let wrapped = accumulate_price(near_max, 1_000, 1_000, 2);
        // absolute comparison would say the accumulator went backwards
        assert!(wrapped < near_max);
        // difference arithmetic still yields the true integral
        assert_eq!(
            accumulator_delta(near_max, wrapped),
            2 * (1u128 << TWAP_PRICE_SHIFT)
        );
    }

    #[test]
    fn extreme_reserves_do_not_panic() {
        let acc = accumulate_price(0, u64::MAX, 1, u64::MAX);
        // wraps rather than aborting
        let _ = accumulator_delta(0, acc);
    }
}
