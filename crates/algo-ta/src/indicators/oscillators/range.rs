//! Range-position oscillators: Choppiness Index, Aroon and Balance of Power.
//!
//! # Formula
//!
//! ```text
//! CHOP       = 100 × log10(Σ TR(n) / (HH(n) - LL(n))) / log10(n)
//! Aroon Up   = 100 × (n - bars since HH(n + 1)) / n
//! Aroon Down = 100 × (n - bars since LL(n + 1)) / n
//! BOP        = (close - open) / (high - low)
//! ```
//!
//! Aroon looks at `n + 1` bars, so its first value is at index `n`.

use crate::error::{Error, Result};
use crate::indicators::volatility::atr::true_range;
use crate::kernels::rolling_extrema::{bars_since_max, bars_since_min, rolling_extrema};
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::ratio_or;

/// Computes the Choppiness Index.
///
/// A flat window yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period < 2`, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn chop<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    if period < 2 {
        return Err(Error::invalid_parameter("period", period, "must be at least 2"));
    }
    let tr = true_range(high, low, close)?;
    let tr_sum = rolling_sum(&tr, period)?;
    let range = rolling_extrema(high, low, period)?;
    let scale = T::from_usize(period)?.log10();
    Ok((0..high.len())
        .map(|i| {
            let ratio = ratio_or(tr_sum[i], range.max[i] - range.min[i], T::zero());
            if ratio > T::zero() {
                T::hundred() * ratio.log10() / scale
            } else {
                ratio
            }
        })
        .collect())
}

/// Aroon up and down lines.
#[derive(Debug, Clone, PartialEq)]
pub struct AroonOutput<T> {
    /// Recency of the highest high, 0..=100.
    pub up: Vec<T>,
    /// Recency of the lowest low, 0..=100.
    pub down: Vec<T>,
}

/// Lookback for Aroon: `period`.
#[inline]
#[must_use]
pub const fn aroon_lookback(period: usize) -> usize {
    period
}

/// Computes Aroon up/down.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn aroon<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<AroonOutput<T>> {
    validate_period("period", period)?;
    validate_same_length(&[("high", high), ("low", low)])?;
    let p = T::from_usize(period)?;
    let to_line = |since: Vec<T>| -> Vec<T> { since.into_iter().map(|b| T::hundred() * (p - b) / p).collect() };
    Ok(AroonOutput {
        up: to_line(bars_since_max(high, period.saturating_add(1))?),
        down: to_line(bars_since_min(low, period.saturating_add(1))?),
    })
}

/// Computes the Aroon oscillator `up - down`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn aroon_oscillator<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<Vec<T>> {
    let lines = aroon(high, low, period)?;
    Ok(lines.up.iter().zip(&lines.down).map(|(&u, &d)| u - d).collect())
}

/// Computes Balance of Power. A flat bar yields 0.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn bop<T: SeriesElement>(open: &[T], high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    validate_same_length(&[("open", open), ("high", high), ("low", low), ("close", close)])?;
    Ok((0..open.len())
        .map(|i| ratio_or(close[i] - open[i], high[i] - low[i], T::zero()))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_chop_trend_vs_range() {
        // steady trend: TR sum equals the window range, CHOP near its floor
        let close: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let out = chop(&close, &close, &close, 14).unwrap();
        assert_eq!(count_nan_prefix(&out), 13);
        let expected = 100.0 * (14.0_f64 / 13.0).log10() / 14.0_f64.log10();
        assert!(approx_eq(out[20], expected, 1e-9));
        // alternating: TR sum far exceeds the range
        let zig: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.0 } else { 2.0 }).collect();
        let choppy = chop(&zig, &zig, &zig, 14).unwrap();
        assert!(approx_eq(choppy[20], 100.0, 1e-9));
    }

    #[test]
    fn test_chop_rejects_period_one() {
        let x = vec![1.0_f64; 5];
        assert!(matches!(chop(&x, &x, &x, 1), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_aroon_trend() {
        let high: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let low = high.clone();
        let out = aroon(&high, &low, 25).unwrap();
        assert_eq!(count_nan_prefix(&out.up), aroon_lookback(25));
        assert!(out.up[25..].iter().all(|&v| v == 100.0));
        assert!(out.down[25..].iter().all(|&v| v == 0.0));
        let osc = aroon_oscillator(&high, &low, 25).unwrap();
        assert_eq!(osc[30], 100.0);
    }

    #[test]
    fn test_bop() {
        let out = bop(&[1.0_f64, 2.0], &[3.0, 2.0], &[1.0, 2.0], &[2.0, 2.0]).unwrap();
        assert!(approx_eq(out[0], 0.5, 1e-12));
        assert_eq!(out[1], 0.0);
    }
}
