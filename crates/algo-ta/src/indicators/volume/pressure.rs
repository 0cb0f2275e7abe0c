//! Volume oscillators: Klinger, Ease of Movement, Force Index, volume
//! oscillator and volume rate of change.

use crate::error::Result;
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::traits::{validate_fast_slow, validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::{hl2, hlc3, nan_vec, ratio_or, subtract};

/// Klinger line and its EMA trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct KvoOutput<T> {
    /// Fast minus slow EMA of the trend-signed volume.
    pub kvo: Vec<T>,
    /// EMA of `kvo`.
    pub signal: Vec<T>,
}

/// Computes the Klinger Volume Oscillator.
///
/// ```text
/// trend = +100·volume if hlc3 rises (and at the first bar), else -100·volume
/// KVO   = EMA(trend, fast) - EMA(trend, slow)
/// ```
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or
/// `fast_period >= slow_period`, or `Error::ShapeMismatch` on unequal role lengths.
pub fn kvo<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    volume: &[T],
    trigger_period: usize,
    fast_period: usize,
    slow_period: usize,
) -> Result<KvoOutput<T>> {
    validate_period("trigger_period", trigger_period)?;
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close), ("volume", volume)])?;
    let tp = hlc3(high, low, close);
    let mut trend = nan_vec(n);
    for i in 0..n {
        let signed = T::hundred() * volume[i];
        trend[i] = if i == 0 || tp[i] > tp[i - 1] { signed } else { -signed };
        if tp[i].is_nan() || (i > 0 && tp[i - 1].is_nan()) {
            trend[i] = T::nan();
        }
    }
    let line = subtract(&ema(&trend, fast_period)?, &ema(&trend, slow_period)?);
    let signal = ema(&line, trigger_period)?;
    Ok(KvoOutput { kvo: line, signal })
}

/// Computes Ease of Movement.
///
/// ```text
/// raw = divisor × Δhl2 × (high - low) / volume     (0 on zero volume)
/// EMV = SMA(raw, length)
/// ```
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero or `divisor` is not
/// positive, or `Error::ShapeMismatch` on unequal role lengths.
pub fn emv<T: SeriesElement>(high: &[T], low: &[T], volume: &[T], length: usize, divisor: f64) -> Result<Vec<T>> {
    validate_period("length", length)?;
    validate_positive("divisor", divisor)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("volume", volume)])?;
    let div = T::from_f64(divisor)?;
    let mid = hl2(high, low);
    let mut raw = nan_vec(n);
    for i in 1..n {
        raw[i] = ratio_or(div * (mid[i] - mid[i - 1]) * (high[i] - low[i]), volume[i], T::zero());
    }
    sma(&raw, length)
}

/// Computes the Force Index: `EMA((close - prev_close) × volume, period)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn force_index<T: SeriesElement>(close: &[T], volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("close", close), ("volume", volume)])?;
    let mut raw = nan_vec(n);
    for i in 1..n {
        raw[i] = (close[i] - close[i - 1]) * volume[i];
    }
    ema(&raw, period)
}

/// Computes the volume oscillator `100 × (EMA_fast - EMA_slow) / EMA_slow`.
///
/// A zero slow average yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or
/// `fast_period >= slow_period`.
pub fn volosc<T: SeriesElement>(volume: &[T], fast_period: usize, slow_period: usize) -> Result<Vec<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    let fast = ema(volume, fast_period)?;
    let slow = ema(volume, slow_period)?;
    Ok(fast
        .iter()
        .zip(&slow)
        .map(|(&f, &s)| T::hundred() * ratio_or(f - s, s, T::zero()))
        .collect())
}

/// Computes the volume rate of change `100 × (v - v[n]) / v[n]`.
///
/// A zero lagged volume yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn vroc<T: SeriesElement>(volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(volume.len());
    for i in period..volume.len() {
        let base = volume[i - period];
        out[i] = T::hundred() * ratio_or(volume[i] - base, base, T::zero());
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
    fn test_kvo_constant_uptrend_is_zero() {
        let price: Vec<f64> = (0..120).map(|i| 50.0 + i as f64).collect();
        let volume = vec![1000.0_f64; 120];
        let out = kvo(&price, &price, &price, &volume, 13, 34, 55).unwrap();
        assert_eq!(count_nan_prefix(&out.kvo), 54);
        assert_eq!(count_nan_prefix(&out.signal), 54 + 12);
        assert!(out.kvo[54..].iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_kvo_rejects_inverted_periods() {
        let x = vec![1.0_f64; 10];
        assert!(matches!(kvo(&x, &x, &x, &x, 13, 55, 34), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_emv_known_value() {
        let high = vec![10.0_f64, 12.0, 14.0];
        let low = vec![8.0_f64, 10.0, 12.0];
        let volume = vec![1.0_f64, 10000.0, 20000.0];
        let out = emv(&high, &low, &volume, 1, 10000.0).unwrap();
        assert!(out[0].is_nan());
        // Δhl2 = 2, range = 2
        assert!(approx_eq(out[1], 4.0, 1e-12));
        assert!(approx_eq(out[2], 2.0, 1e-12));
    }

    #[test]
    fn test_emv_zero_volume() {
        let high = vec![10.0_f64, 12.0, 14.0];
        let low = vec![8.0_f64, 10.0, 12.0];
        let out = emv(&high, &low, &[1.0, 0.0, 0.0], 2, 10000.0).unwrap();
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn test_force_index() {
        let close = vec![10.0_f64, 11.0, 10.0];
        let volume = vec![5.0_f64, 5.0, 5.0];
        let out = force_index(&close, &volume, 1).unwrap();
        assert_eq!(out[1], 5.0);
        assert_eq!(out[2], -5.0);
    }

    #[test]
    fn test_volosc_and_vroc() {
        let volume: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let osc = volosc(&volume, 5, 10).unwrap();
        assert_eq!(count_nan_prefix(&osc), 9);
        assert!(osc[20] > 0.0);
        let roc = vroc(&volume, 4).unwrap();
        assert_eq!(count_nan_prefix(&roc), 4);
        assert!(approx_eq(roc[4], 400.0, 1e-12));
        assert_eq!(vroc(&[0.0_f64, 5.0], 1).unwrap()[1], 0.0);
    }
}
