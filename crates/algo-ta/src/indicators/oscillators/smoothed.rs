//! Oscillators of oscillators: Stochastic RSI, True Strength Index and the
//! Schaff Trend Cycle.

use crate::error::Result;
use crate::indicators::momentum::rsi::rsi;
use crate::indicators::momentum::stochastic::stochastic_raw;
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::kernels::rolling_extrema::rolling_extrema;
use crate::traits::{validate_fast_slow, validate_period, SeriesElement};
use crate::utils::{nan_vec, ratio_or, subtract};

/// Smoothed %K and %D of the stochastic RSI.
#[derive(Debug, Clone, PartialEq)]
pub struct StochRsiOutput<T> {
    /// `SMA(stoch(RSI), k)`.
    pub k: Vec<T>,
    /// `SMA(k, d)`.
    pub d: Vec<T>,
}

/// Computes the Stochastic RSI.
///
/// A flat RSI window is mid-range (50), as for the plain stochastic.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero.
pub fn stochrsi<T: SeriesElement>(
    data: &[T],
    rsi_period: usize,
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
) -> Result<StochRsiOutput<T>> {
    validate_period("stoch_period", stoch_period)?;
    validate_period("k_period", k_period)?;
    validate_period("d_period", d_period)?;
    let strength = rsi(data, rsi_period)?;
    let raw = stochastic_raw(&strength, &strength, &strength, stoch_period)?;
    let k = sma(&raw, k_period)?;
    let d = sma(&k, d_period)?;
    Ok(StochRsiOutput { k, d })
}

/// True Strength Index and its EMA signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TsiOutput<T> {
    /// Double-smoothed momentum over double-smoothed absolute momentum, ×100.
    pub tsi: Vec<T>,
    /// EMA of `tsi`.
    pub signal: Vec<T>,
}

/// Computes the True Strength Index.
///
/// ```text
/// m   = x - x[1]
/// TSI = 100 × EMA(EMA(m, long), short) / EMA(EMA(|m|, long), short)
/// ```
///
/// A zero denominator yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero.
pub fn tsi<T: SeriesElement>(
    data: &[T],
    long_period: usize,
    short_period: usize,
    signal_period: usize,
) -> Result<TsiOutput<T>> {
    validate_period("long_period", long_period)?;
    validate_period("short_period", short_period)?;
    validate_period("signal_period", signal_period)?;
    let n = data.len();
    let mut momentum = nan_vec(n);
    for i in 1..n {
        momentum[i] = data[i] - data[i - 1];
    }
    let magnitude: Vec<T> = momentum.iter().map(|m| m.abs()).collect();
    let num = ema(&ema(&momentum, long_period)?, short_period)?;
    let den = ema(&ema(&magnitude, long_period)?, short_period)?;
    let line: Vec<T> = num
        .iter()
        .zip(&den)
        .map(|(&a, &b)| T::hundred() * ratio_or(a, b, T::zero()))
        .collect();
    let signal = ema(&line, signal_period)?;
    Ok(TsiOutput { tsi: line, signal })
}

/// Stochastic that carries its last value forward where undefined.
///
/// Incomplete, NaN-bearing or flat windows repeat the previous value
/// (0 before any value exists), so the output is always finite.
fn carried_stochastic<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let range = rolling_extrema(data, data, period)?;
    let mut last = T::zero();
    Ok(data
        .iter()
        .zip(range.max.iter().zip(&range.min))
        .map(|(&x, (&hh, &ll))| {
            let span = hh - ll;
            if !x.is_nan() && !span.is_nan() && span > T::zero() {
                last = T::hundred() * (x - ll) / span;
            }
            last
        })
        .collect())
}

/// Computes the Schaff Trend Cycle.
///
/// ```text
/// macd = EMA(x, fast) - EMA(x, slow)
/// k    = stoch(macd, cycle)            (carried forward, 0 at the start)
/// d    = EMA(k, d1)
/// kd   = stoch(d, cycle)               (carried forward, 0 at the start)
/// STC  = clamp(EMA(kd, d2), 0, 100)
/// ```
///
/// Because both stochastic stages are carried, the line is defined from
/// index `d1 + d2 - 2` and reads 0 until the MACD warms up.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or `fast >= slow`.
pub fn stc<T: SeriesElement>(
    data: &[T],
    fast_period: usize,
    slow_period: usize,
    cycle: usize,
    d1: usize,
    d2: usize,
) -> Result<Vec<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    validate_period("cycle", cycle)?;
    validate_period("d1", d1)?;
    validate_period("d2", d2)?;
    let macd = subtract(&ema(data, fast_period)?, &ema(data, slow_period)?);
    let k = carried_stochastic(&macd, cycle)?;
    let d = ema(&k, d1)?;
    let kd = carried_stochastic(&d, cycle)?;
    let mut out = ema(&kd, d2)?;
    let first = d1 + d2 - 2;
    for (i, v) in out.iter_mut().enumerate() {
        if i < first {
            *v = T::nan();
        } else if !v.is_nan() {
            *v = v.max(T::zero()).min(T::hundred());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.15).sin() * 8.0).collect()
    }

    #[test]
    fn test_stochrsi_warmup_and_range() {
        let out = stochrsi(&wave(200), 14, 14, 3, 3).unwrap();
        // rsi at 14, raw stoch at 27, k at 29, d at 31
        assert_eq!(count_nan_prefix(&out.k), 29);
        assert_eq!(count_nan_prefix(&out.d), 31);
        assert!(out.d[31..].iter().all(|&v| (0.0..=100.0).contains(&v)));
    }

    #[test]
    fn test_tsi_monotonic_is_100() {
        let data: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
        let out = tsi(&data, 25, 13, 13).unwrap();
        assert_eq!(count_nan_prefix(&out.tsi), 1 + 24 + 12);
        assert!(out.tsi[37..].iter().all(|&v| approx_eq(v, 100.0, 1e-9)));
        assert_eq!(count_nan_prefix(&out.signal), 37 + 12);
    }

    #[test]
    fn test_stc_bounded() {
        let out = stc(&wave(300), 23, 50, 10, 3, 3).unwrap();
        assert_eq!(count_nan_prefix(&out), 4);
        assert!(out[4..].iter().all(|&v| (0.0..=100.0).contains(&v)));
        // MACD still warming up
        assert_eq!(out[10], 0.0);
    }

    #[test]
    fn test_carried_stochastic_flat_holds() {
        let data = vec![1.0_f64, 2.0, 3.0, 3.0, 3.0, 3.0];
        let out = carried_stochastic(&data, 2).unwrap();
        assert_eq!(out, vec![0.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
    }
}
