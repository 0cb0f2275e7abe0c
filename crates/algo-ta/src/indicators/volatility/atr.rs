//! True Range, Average True Range and normalized ATR.
//!
//! # Formula
//!
//! ```text
//! TR[0] = high[0] - low[0]
//! TR[i] = max(high - low, |high - close[i-1]|, |low - close[i-1]|)
//! ATR   = Wilder smoothing of TR over `period` (SMA seed at index period-1)
//! NATR  = 100 × ATR / close
//! ```
//!
//! The first bar has no previous close, so its range stands in for TR. This
//! keeps ATR defined from index `period - 1`.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::volatility::{atr, true_range};
//!
//! let high = vec![10.0_f64, 11.0, 12.0];
//! let low = vec![9.0_f64, 10.0, 10.5];
//! let close = vec![9.5_f64, 10.5, 11.0];
//! let tr = true_range(&high, &low, &close).unwrap();
//! assert_eq!(tr, vec![1.0, 1.5, 1.5]);
//! let out = atr(&high, &low, &close, 2).unwrap();
//! assert!(out[0].is_nan());
//! assert_eq!(out[1], 1.25);
//! ```

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema_wilder;
use crate::traits::{validate_same_length, SeriesElement};
use crate::utils::ratio_or;

/// Lookback for ATR: `period - 1`.
#[inline]
#[must_use]
pub const fn atr_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes the True Range.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn true_range<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let range = high[i] - low[i];
        if i == 0 {
            out.push(range);
            continue;
        }
        let pc = close[i - 1];
        out.push(range.max((high[i] - pc).abs()).max((low[i] - pc).abs()));
    }
    Ok(out)
}

/// Computes the Average True Range with Wilder smoothing.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn atr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    crate::traits::validate_period("period", period)?;
    ema_wilder(&true_range(high, low, close)?, period)
}

/// Computes ATR as a percentage of the close.
///
/// A zero close yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn natr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    let atr = atr(high, low, close, period)?;
    Ok(atr
        .iter()
        .zip(close)
        .map(|(&a, &c)| T::hundred() * ratio_or(a, c, T::zero()))
        .collect())
}
