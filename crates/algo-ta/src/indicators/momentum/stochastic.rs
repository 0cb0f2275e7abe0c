//! Stochastic oscillator and Williams %R.
//!
//! # Formula
//!
//! ```text
//! raw %K = 100 × (close - LL(k)) / (HH(k) - LL(k))
//! %K     = SMA(raw %K, smooth_k)
//! %D     = SMA(%K, d)
//! %R     = -100 × (HH(n) - close) / (HH(n) - LL(n))
//! ```
//!
//! A flat window (`HH == LL`) is mid-range: raw %K is 50 and %R is -50.

use crate::error::Result;
use crate::indicators::trend::moving_averages::sma;
use crate::kernels::rolling_extrema::rolling_extrema;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::ratio_or;

/// Smoothed %K and its %D signal.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutput<T> {
    /// Smoothed %K line.
    pub k: Vec<T>,
    /// SMA of %K.
    pub d: Vec<T>,
}

/// Index of the first defined %D value.
#[inline]
#[must_use]
pub const fn stochastic_lookback(k_period: usize, smooth_k: usize, d_period: usize) -> usize {
    k_period.saturating_sub(1) + smooth_k.saturating_sub(1) + d_period.saturating_sub(1)
}

/// Raw %K: close position inside the trailing high/low range, in percent.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn stochastic_raw<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("k_period", period)?;
    validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let range = rolling_extrema(high, low, period)?;
    Ok(close
        .iter()
        .zip(range.max.iter().zip(&range.min))
        .map(|(&c, (&hh, &ll))| T::hundred() * ratio_or(c - ll, hh - ll, T::constant(0.5)))
        .collect())
}

/// Computes the slow stochastic oscillator.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn stochastic<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    k_period: usize,
    smooth_k: usize,
    d_period: usize,
) -> Result<StochasticOutput<T>> {
    validate_period("smooth_k", smooth_k)?;
    validate_period("d_period", d_period)?;
    let raw = stochastic_raw(high, low, close, k_period)?;
    let k = sma(&raw, smooth_k)?;
    let d = sma(&k, d_period)?;
    Ok(StochasticOutput { k, d })
}

/// Computes Williams %R on the `[-100, 0]` scale.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn williams_r<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let range = rolling_extrema(high, low, period)?;
    Ok(close
        .iter()
        .zip(range.max.iter().zip(&range.min))
        .map(|(&c, (&hh, &ll))| -T::hundred() * ratio_or(hh - c, hh - ll, T::constant(0.5)))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn bars(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 20.0 + (i as f64 * 0.4).sin() * 4.0).collect();
        let high = close.iter().map(|c| c + 1.0).collect();
        let low = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn test_stochastic_warmup_and_bounds() {
        let (h, l, c) = bars(120);
        let out = stochastic(&h, &l, &c, 14, 3, 3).unwrap();
        assert_eq!(count_nan_prefix(&out.k), 15);
        assert_eq!(count_nan_prefix(&out.d), stochastic_lookback(14, 3, 3));
        assert!(out.d[17..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let high: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 3.0).collect();
        let out = stochastic_raw(&high, &low, &high, 5).unwrap();
        assert!(out[4..].iter().all(|&v| approx_eq(v, 100.0, 1e-12)));
    }

    #[test]
    fn test_flat_window_sentinels() {
        let flat = vec![5.0_f64; 10];
        assert!(stochastic_raw(&flat, &flat, &flat, 3).unwrap()[2..].iter().all(|&v| v == 50.0));
        assert!(williams_r(&flat, &flat, &flat, 3).unwrap()[2..].iter().all(|&v| v == -50.0));
    }

    #[test]
    fn test_williams_r_matches_raw_k() {
        let (h, l, c) = bars(60);
        let raw = stochastic_raw(&h, &l, &c, 14).unwrap();
        let wr = williams_r(&h, &l, &c, 14).unwrap();
        for i in 13..60 {
            assert!(approx_eq(wr[i], raw[i] - 100.0, 1e-9));
        }
    }
}
