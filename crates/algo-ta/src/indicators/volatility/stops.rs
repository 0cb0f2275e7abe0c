//! ATR-offset extremes: Chandelier Exit and the Random Walk Index.

use crate::error::Result;
use crate::indicators::volatility::atr::atr;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::traits::{validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Long and short exit levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChandelierOutput<T> {
    /// `HH(period) - m × ATR`: stop for long positions.
    pub long_stop: Vec<T>,
    /// `LL(period) + m × ATR`: stop for short positions.
    pub short_stop: Vec<T>,
}

/// Computes the Chandelier Exit.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `multiplier` is
/// not positive, or `Error::ShapeMismatch` on unequal role lengths.
pub fn chandelier_exit<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
    multiplier: f64,
) -> Result<ChandelierOutput<T>> {
    validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    validate_period("period", period)?;
    validate_positive("multiplier", multiplier)?;
    let m = T::from_f64(multiplier)?;
    let atr = atr(high, low, close, period)?;
    let hh = rolling_max(high, period)?;
    let ll = rolling_min(low, period)?;
    Ok(ChandelierOutput {
        long_stop: hh.iter().zip(&atr).map(|(&h, &a)| h - m * a).collect(),
        short_stop: ll.iter().zip(&atr).map(|(&l, &a)| l + m * a).collect(),
    })
}

/// High and low Random Walk Index lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RwiOutput<T> {
    /// `(high - low[n]) / (ATR × √n)`.
    pub high: Vec<T>,
    /// `(high[n] - low) / (ATR × √n)`.
    pub low: Vec<T>,
}

/// Computes the Random Walk Index.
///
/// A zero ATR yields 0 for both lines. The first defined index is `period`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn rwi<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<RwiOutput<T>> {
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    validate_period("period", period)?;
    let atr = atr(high, low, close, period)?;
    let root = T::from_usize(period)?.sqrt();
    let mut out = RwiOutput {
        high: nan_vec(n),
        low: nan_vec(n),
    };
    for i in period..n {
        let den = atr[i] * root;
        out.high[i] = ratio_or(high[i] - low[i - period], den, T::zero());
        out.low[i] = ratio_or(high[i - period] - low[i], den, T::zero());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_chandelier_constant_range() {
        let high = vec![11.0_f64; 30];
        let low = vec![9.0_f64; 30];
        let close = vec![10.0_f64; 30];
        let out = chandelier_exit(&high, &low, &close, 22, 3.0).unwrap();
        assert_eq!(count_nan_prefix(&out.long_stop), 21);
        assert!(approx_eq(out.long_stop[25], 11.0 - 6.0, 1e-12));
        assert!(approx_eq(out.short_stop[25], 9.0 + 6.0, 1e-12));
    }

    #[test]
    fn test_rwi_trend_dominates() {
        let close: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let out = rwi(&high, &low, &close, 14).unwrap();
        assert_eq!(count_nan_prefix(&out.high), 14);
        assert!(out.high[30] > 1.0);
        assert!(out.low[30] < 0.0);
    }

    #[test]
    fn test_rwi_zero_atr_sentinel() {
        let flat = vec![3.0_f64; 20];
        let out = rwi(&flat, &flat, &flat, 5).unwrap();
        assert!(out.high[5..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unequal_lengths_are_rejected() {
        let a = vec![1.0_f64; 10];
        let b = vec![1.0_f64; 9];
        assert!(matches!(
            chandelier_exit(&a, &a, &b, 3, 3.0),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(rwi(&a, &b, &a, 3), Err(Error::ShapeMismatch { .. })));
    }
}
