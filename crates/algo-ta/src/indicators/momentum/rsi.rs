//! Relative Strength Index and Connors RSI.
//!
//! # Algorithm
//!
//! RSI smooths gains and losses with Wilder's average (SMA seed over the first
//! `period` changes), so the first value lands at index `period`.
//!
//! # Formula
//!
//! ```text
//! RSI = 100                                when avg_loss = 0
//!     = 100 - 100 / (1 + avg_gain / avg_loss)  otherwise
//! CRSI = (RSI(close, 3) + RSI(streak, 2) + PercentRank(ROC(close, 1), 100)) / 3
//! ```
//!
//! The streak is a signed run length: `+k` after `k` consecutive up closes,
//! `-k` after `k` consecutive down closes, `0` on an unchanged close.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::momentum::rsi;
//!
//! let rising: Vec<f64> = (0..50).map(|i| i as f64).collect();
//! let out = rsi(&rising, 14).unwrap();
//! assert!(out[..14].iter().all(|v| v.is_nan()));
//! assert!(out[14..].iter().all(|&v| v == 100.0));
//! ```

use crate::error::Result;
use crate::indicators::statistics::order::percent_rank;
use crate::indicators::trend::moving_averages::ema_wilder;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::nan_vec;

/// Lookback for RSI: `period` (one change per sample after the first).
#[inline]
#[must_use]
pub const fn rsi_lookback(period: usize) -> usize {
    period
}

/// Computes Wilder's Relative Strength Index.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rsi<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let mut gains = nan_vec(n);
    let mut losses = nan_vec(n);
    for i in 1..n {
        let change = data[i] - data[i - 1];
        gains[i] = change.max(T::zero());
        losses[i] = (-change).max(T::zero());
        if change.is_nan() {
            gains[i] = change;
            losses[i] = change;
        }
    }
    let avg_gain = ema_wilder(&gains, period)?;
    let avg_loss = ema_wilder(&losses, period)?;
    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if g.is_nan() || l.is_nan() {
                T::nan()
            } else if l == T::zero() {
                T::hundred()
            } else {
                T::hundred() - T::hundred() / (T::one() + g / l)
            }
        })
        .collect())
}

/// Running up/down streak threaded forward through the series.
#[derive(Debug, Clone, Copy, Default)]
struct Streak {
    run: i64,
}

impl Streak {
    fn advance<T: SeriesElement>(&mut self, prev: T, cur: T) -> i64 {
        self.run = if cur > prev {
            if self.run > 0 {
                self.run + 1
            } else {
                1
            }
        } else if cur < prev {
            if self.run < 0 {
                self.run - 1
            } else {
                -1
            }
        } else {
            0
        };
        self.run
    }
}

/// Computes the signed up/down streak length of a series.
///
/// Index 0 and any NaN comparison reset the streak to 0.
///
/// # Errors
///
/// Returns `Error::NumericConversion` if a run length cannot be represented.
pub fn streak<T: SeriesElement>(data: &[T]) -> Result<Vec<T>> {
    let mut state = Streak::default();
    let mut out = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let run = if i == 0 { 0 } else { state.advance(data[i - 1], data[i]) };
        out.push(T::from_f64(run as f64)?);
    }
    Ok(out)
}

/// Computes Connors RSI.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero.
pub fn crsi<T: SeriesElement>(
    data: &[T],
    rsi_period: usize,
    streak_period: usize,
    rank_period: usize,
) -> Result<Vec<T>> {
    validate_period("rsi_period", rsi_period)?;
    validate_period("streak_period", streak_period)?;
    validate_period("rank_period", rank_period)?;
    let price_rsi = rsi(data, rsi_period)?;
    let streak_rsi = rsi(&streak(data)?, streak_period)?;
    let n = data.len();
    let mut roc = nan_vec(n);
    for i in 1..n {
        let prev = data[i - 1];
        roc[i] = if prev == T::zero() {
            T::zero()
        } else {
            T::hundred() * (data[i] - prev) / prev
        };
    }
    let rank = percent_rank(&roc, rank_period)?;
    let three = T::constant(3.0);
    Ok((0..n)
        .map(|i| (price_rsi[i] + streak_rsi[i] + rank[i]) / three)
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_rsi_non_decreasing_is_exactly_100() {
        let data: Vec<f64> = (0..50).map(|i| (i / 3) as f64).collect();
        let out = rsi(&data, 14).unwrap();
        assert_eq!(count_nan_prefix(&out), rsi_lookback(14));
        assert!(out[14..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_rsi_falling_is_zero() {
        let data: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&data, 5).unwrap();
        assert!(out[5..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rsi_alternating_is_fifty() {
        let data: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
        let out = rsi(&data, 2).unwrap();
        // equal gain and loss within each two-change seed window
        assert!(approx_eq(out[2], 50.0, 1e-12));
    }

    #[test]
    fn test_rsi_known_value() {
        let data = vec![1.0_f64, 2.0, 1.0, 3.0];
        let out = rsi(&data, 2).unwrap();
        // gains [_,1,0,2] losses [_,0,1,0]; seed at 2: g=.5 l=.5 -> 50
        assert!(approx_eq(out[2], 50.0, 1e-12));
        // g = .5 + .5*(2-.5) = 1.25, l = .25 -> 100 - 100/6
        assert!(approx_eq(out[3], 100.0 - 100.0 / 6.0, 1e-12));
    }

    #[test]
    fn test_streak_runs() {
        let data = vec![1.0_f64, 2.0, 3.0, 3.0, 2.0, 1.0, 2.0];
        assert_eq!(streak(&data).unwrap(), vec![0.0, 1.0, 2.0, 0.0, -1.0, -2.0, 1.0]);
    }

    #[test]
    fn test_crsi_range_and_warmup() {
        let data: Vec<f64> = (0..300)
            .map(|i| 100.0 + ((i as f64) * 0.2).sin() * 5.0 + ((i * 7) % 5) as f64)
            .collect();
        let out = crsi(&data, 3, 2, 100).unwrap();
        assert_eq!(count_nan_prefix(&out), 101);
        assert!(out[101..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }
}
