//! Moving Average Convergence Divergence.
//!
//! # Formula
//!
//! ```text
//! MACD      = EMA(close, fast) - EMA(close, slow)
//! Signal    = EMA(MACD, signal)
//! Histogram = MACD - Signal
//! ```
//!
//! The MACD line is first defined at `slow - 1`, the signal and histogram at
//! `slow + signal - 2`. The signal EMA seeds over the first `signal` finite
//! MACD values, so the slow warm-up never poisons it.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::momentum::macd;
//!
//! let data: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
//! let out = macd(&data, 12, 26, 9).unwrap();
//! assert!(out.macd[24].is_nan());
//! assert!(!out.macd[25].is_nan());
//! assert!(!out.signal[33].is_nan());
//! ```

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema;
use crate::traits::{validate_fast_slow, validate_period, SeriesElement};
use crate::utils::subtract;

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput<T> {
    /// Fast EMA minus slow EMA.
    pub macd: Vec<T>,
    /// EMA of the MACD line.
    pub signal: Vec<T>,
    /// MACD minus signal.
    pub histogram: Vec<T>,
}

/// Index of the first defined MACD value.
#[inline]
#[must_use]
pub const fn macd_line_lookback(slow_period: usize) -> usize {
    slow_period.saturating_sub(1)
}

/// Index of the first defined signal/histogram value.
#[inline]
#[must_use]
pub const fn macd_signal_lookback(slow_period: usize, signal_period: usize) -> usize {
    macd_line_lookback(slow_period) + signal_period.saturating_sub(1)
}

/// Computes MACD.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero or if
/// `fast_period >= slow_period`.
pub fn macd<T: SeriesElement>(
    data: &[T],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdOutput<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    validate_period("signal_period", signal_period)?;
    let fast = ema(data, fast_period)?;
    let slow = ema(data, slow_period)?;
    let line = subtract(&fast, &slow);
    let signal = ema(&line, signal_period)?;
    let histogram = subtract(&line, &signal);
    Ok(MacdOutput {
        macd: line,
        signal,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 50.0 + (i as f64 * 0.25).sin() * 3.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn test_macd_warmups() {
        let out = macd(&wave(100), 12, 26, 9).unwrap();
        assert_eq!(count_nan_prefix(&out.macd), macd_line_lookback(26));
        assert_eq!(count_nan_prefix(&out.signal), macd_signal_lookback(26, 9));
        assert_eq!(count_nan_prefix(&out.histogram), 33);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let out = macd(&wave(80), 5, 10, 4).unwrap();
        for i in 20..80 {
            assert!(approx_eq(out.histogram[i], out.macd[i] - out.signal[i], 1e-12));
        }
    }

    #[test]
    fn test_macd_constant_is_zero() {
        let out = macd(&vec![7.0_f64; 60], 12, 26, 9).unwrap();
        assert!(out.macd[25..].iter().all(|&v| v.abs() < 1e-12));
        assert!(out.histogram[33..].iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_macd_rejects_fast_not_below_slow() {
        let data = wave(50);
        assert!(matches!(
            macd(&data, 26, 26, 9),
            Err(Error::InvalidParameter { ref name, .. }) if name == "fast_period"
        ));
        assert!(macd(&data, 30, 26, 9).is_err());
    }

    #[test]
    fn test_macd_short_input_all_nan() {
        let out = macd(&wave(10), 12, 26, 9).unwrap();
        assert_eq!(out.macd.len(), 10);
        assert!(out.signal.iter().all(|v| v.is_nan()));
    }
}
