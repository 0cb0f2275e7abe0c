//! Ultimate Oscillator.
//!
//! ```text
//! BP  = close - min(low, prev_close)
//! TR  = max(high, prev_close) - min(low, prev_close)
//! Ak  = Σ BP(pk) / Σ TR(pk)
//! UO  = 100 × (4·A1 + 2·A2 + A3) / 7
//! ```
//!
//! Buying pressure needs a previous close, so the first value lands at
//! `max(p1, p2, p3)`.

use crate::error::Result;
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Index of the first defined value.
#[inline]
#[must_use]
pub const fn ultimate_oscillator_lookback(p1: usize, p2: usize, p3: usize) -> usize {
    let a = if p1 > p2 { p1 } else { p2 };
    if a > p3 {
        a
    } else {
        p3
    }
}

/// Computes the Ultimate Oscillator over three averaging windows.
///
/// A zero true-range sum makes that window's average 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn ultimate_oscillator<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period1: usize,
    period2: usize,
    period3: usize,
) -> Result<Vec<T>> {
    validate_period("period1", period1)?;
    validate_period("period2", period2)?;
    validate_period("period3", period3)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let mut bp = nan_vec(n);
    let mut tr = nan_vec(n);
    for i in 1..n {
        let prev = close[i - 1];
        let floor = low[i].min(prev);
        bp[i] = close[i] - floor;
        tr[i] = high[i].max(prev) - floor;
        if prev.is_nan() || low[i].is_nan() || high[i].is_nan() {
            bp[i] = T::nan();
            tr[i] = T::nan();
        }
    }
    let average = |period: usize| -> Result<Vec<T>> {
        let num = rolling_sum(&bp, period)?;
        let den = rolling_sum(&tr, period)?;
        Ok(num.iter().zip(&den).map(|(&a, &b)| ratio_or(a, b, T::zero())).collect())
    };
    let (a1, a2, a3) = (average(period1)?, average(period2)?, average(period3)?);
    let four = T::constant(4.0);
    let seven = T::constant(7.0);
    Ok((0..n)
        .map(|i| T::hundred() * (four * a1[i] + T::two() * a2[i] + a3[i]) / seven)
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_uo_warmup() {
        let close: Vec<f64> = (0..60).map(|i| 30.0 + (i as f64 * 0.5).cos()).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.5).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
        let out = ultimate_oscillator(&high, &low, &close, 7, 14, 28).unwrap();
        assert_eq!(count_nan_prefix(&out), ultimate_oscillator_lookback(7, 14, 28));
        assert!(out[28..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_uo_close_at_high() {
        // close always at the high and above the previous close
        let high: Vec<f64> = (0..40).map(|i| 10.0 + i as f64).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 2.0).collect();
        let out = ultimate_oscillator(&high, &low, &high, 3, 5, 7).unwrap();
        assert!(approx_eq(out[20], 100.0, 1e-9));
    }

    #[test]
    fn test_uo_flat_sentinel() {
        let flat = vec![1.0_f64; 20];
        let out = ultimate_oscillator(&flat, &flat, &flat, 2, 3, 4).unwrap();
        assert!(out[4..].iter().all(|&v| v == 0.0));
    }
}
