//! Chaikin Oscillator and the Chande Kroll Stop.

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema;
use crate::indicators::volatility::atr::atr;
use crate::indicators::volume::accumulation::adl;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::traits::{validate_fast_slow, validate_period, validate_positive, SeriesElement};
use crate::utils::subtract;

/// Computes the Chaikin Oscillator: `EMA(ADL, fast) - EMA(ADL, slow)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or `fast >= slow`,
/// or `Error::ShapeMismatch` on unequal role lengths.
pub fn cho<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
    fast_period: usize,
    slow_period: usize,
) -> Result<Vec<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    let line = adl(high, low, close, volume)?;
    Ok(subtract(&ema(&line, fast_period)?, &ema(&line, slow_period)?))
}

/// Long and short Chande Kroll stop lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CkStopOutput<T> {
    /// `LL(LL(p) + x·ATR(p), q)`.
    pub long_stop: Vec<T>,
    /// `HH(HH(p) - x·ATR(p), q)`.
    pub short_stop: Vec<T>,
}

/// Computes the Chande Kroll Stop.
///
/// The first stop of each line is at `p - 1 + q - 1`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or `multiplier` is
/// not positive, or `Error::ShapeMismatch` on unequal role lengths.
pub fn ckstop<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    atr_period: usize,
    multiplier: f64,
    stop_period: usize,
) -> Result<CkStopOutput<T>> {
    validate_period("stop_period", stop_period)?;
    validate_positive("multiplier", multiplier)?;
    let x = T::from_f64(multiplier)?;
    let range = atr(high, low, close, atr_period)?;
    let hh = rolling_max(high, atr_period)?;
    let ll = rolling_min(low, atr_period)?;
    let first_high: Vec<T> = hh.iter().zip(&range).map(|(&h, &a)| h - x * a).collect();
    let first_low: Vec<T> = ll.iter().zip(&range).map(|(&l, &a)| l + x * a).collect();
    Ok(CkStopOutput {
        long_stop: rolling_min(&first_low, stop_period)?,
        short_stop: rolling_max(&first_high, stop_period)?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_cho_warmup_and_flat_flow() {
        let high = vec![11.0_f64; 40];
        let low = vec![9.0_f64; 40];
        let close = vec![10.0_f64; 40];
        let volume = vec![100.0_f64; 40];
        let out = cho(&high, &low, &close, &volume, 3, 10).unwrap();
        assert_eq!(count_nan_prefix(&out), 9);
        assert!(out[9..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_ckstop_constant_range() {
        let high = vec![12.0_f64; 40];
        let low = vec![8.0_f64; 40];
        let close = vec![10.0_f64; 40];
        let out = ckstop(&high, &low, &close, 10, 1.0, 9).unwrap();
        assert_eq!(count_nan_prefix(&out.long_stop), 9 + 8);
        assert!(approx_eq(out.short_stop[30], 12.0 - 4.0, 1e-12));
        assert!(approx_eq(out.long_stop[30], 8.0 + 4.0, 1e-12));
    }
}
