//! Relative Vigor Index.
//!
//! Canonical signature: `(open, high, low, close, period)`.
//!
//! # Formula
//!
//! ```text
//! swma(x)[i] = (x[i-3] + 2·x[i-2] + 2·x[i-1] + x[i]) / 6
//! RVI        = Σ swma(close - open)(n) / Σ swma(high - low)(n)
//! signal     = swma(RVI)
//! ```
//!
//! A zero range sum yields 0. RVI is first defined at index `period + 2`,
//! the signal at `period + 5`.

use crate::error::Result;
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// RVI line and its symmetric-weighted signal.
#[derive(Debug, Clone, PartialEq)]
pub struct RviOutput<T> {
    /// Vigor ratio.
    pub rvi: Vec<T>,
    /// Four-bar symmetric weighted average of `rvi`.
    pub signal: Vec<T>,
}

/// Four-bar symmetric weighted moving average with weights 1-2-2-1.
#[must_use]
pub fn swma<T: SeriesElement>(data: &[T]) -> Vec<T> {
    let six = T::constant(6.0);
    let mut out = nan_vec(data.len());
    for i in 3..data.len() {
        out[i] = (data[i - 3] + T::two() * (data[i - 2] + data[i - 1]) + data[i]) / six;
    }
    out
}

/// Computes the Relative Vigor Index.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn rvi<T: SeriesElement>(
    open: &[T],
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
) -> Result<RviOutput<T>> {
    validate_period("period", period)?;
    validate_same_length(&[("open", open), ("high", high), ("low", low), ("close", close)])?;
    let body: Vec<T> = close.iter().zip(open).map(|(&c, &o)| c - o).collect();
    let range: Vec<T> = high.iter().zip(low).map(|(&h, &l)| h - l).collect();
    let num = rolling_sum(&swma(&body), period)?;
    let den = rolling_sum(&swma(&range), period)?;
    let rvi: Vec<T> = num
        .iter()
        .zip(&den)
        .map(|(&a, &b)| ratio_or(a, b, T::zero()))
        .collect();
    let signal = swma(&rvi);
    Ok(RviOutput { rvi, signal })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_swma_weights() {
        let out = swma(&[1.0_f64, 2.0, 3.0, 4.0]);
        assert!(approx_eq(out[3], (1.0 + 4.0 + 6.0 + 4.0) / 6.0, 1e-12));
    }

    #[test]
    fn test_rvi_bullish_bars() {
        let n = 30;
        let open: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
        let close: Vec<f64> = open.iter().map(|o| o + 1.0).collect();
        let high: Vec<f64> = open.iter().map(|o| o + 2.0).collect();
        let low = open.clone();
        let out = rvi(&open, &high, &low, &close, 10).unwrap();
        assert_eq!(count_nan_prefix(&out.rvi), 12);
        assert_eq!(count_nan_prefix(&out.signal), 15);
        assert!(approx_eq(out.rvi[20], 0.5, 1e-12));
        assert!(approx_eq(out.signal[20], 0.5, 1e-12));
    }

    #[test]
    fn test_rvi_flat_sentinel() {
        let flat = vec![1.0_f64; 20];
        let out = rvi(&flat, &flat, &flat, &flat, 4).unwrap();
        assert!(out.rvi[6..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rvi_shape_mismatch() {
        let a = vec![1.0_f64; 10];
        let b = vec![1.0_f64; 9];
        assert!(matches!(rvi(&a, &a, &b, &a, 4), Err(Error::ShapeMismatch { .. })));
    }
}
