//! Moving averages: simple, exponential, weighted and their composites.
//!
//! # Seeding
//!
//! Every exponential smoother seeds with the simple average of its first
//! `period` finite inputs, placed at index `period - 1` of that run. A NaN
//! input after the seed emits NaN and restarts seeding, so composites such as
//! DEMA can feed a smoother the NaN-prefixed output of another.
//!
//! # Formula
//!
//! ```text
//! SMA[i]  = mean(x[i-p+1..=i])
//! EMA[i]  = EMA[i-1] + α × (x[i] - EMA[i-1]),  α = 2 / (p + 1)
//! RMA[i]  = EMA with α = 1 / p (Wilder)
//! WMA[i]  = Σ k·x[i-p+k] / (p(p+1)/2),  k = 1..p
//! DEMA    = 2·EMA - EMA(EMA)
//! TEMA    = 3·EMA - 3·EMA(EMA) + EMA(EMA(EMA))
//! HMA     = WMA(2·WMA(x, p/2) - WMA(x, p), ⌊√p⌋)
//! ZLEMA   = EMA(2·x[i] - x[i - (p-1)/2], p)
//! ```
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::trend::{ema, sma, wma};
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0];
//! assert_eq!(sma(&data, 3).unwrap()[2], 2.0);
//! assert_eq!(ema(&data, 3).unwrap()[2], 2.0); // seeded with the SMA
//! assert!((wma(&data, 3).unwrap()[2] - 14.0 / 6.0).abs() < 1e-12);
//! ```

use crate::error::Result;
use crate::kernels::rolling_moments::{rolling_mean, RollingSum, REBASE_INTERVAL};
use crate::traits::{validate_non_negative, validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::nan_vec;

/// Lookback for SMA: `period - 1`.
#[inline]
#[must_use]
pub const fn sma_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Lookback for EMA over a NaN-free series: `period - 1`.
#[inline]
#[must_use]
pub const fn ema_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Lookback for DEMA: `2 × (period - 1)`.
#[inline]
#[must_use]
pub const fn dema_lookback(period: usize) -> usize {
    period.saturating_sub(1).saturating_mul(2)
}

/// Lookback for TEMA: `3 × (period - 1)`.
#[inline]
#[must_use]
pub const fn tema_lookback(period: usize) -> usize {
    3 * period.saturating_sub(1)
}

/// Computes the Simple Moving Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
///
/// # Performance
///
/// O(n) with a compensated running sum.
pub fn sma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_mean(data, period)
}

/// Exponential smoothing with an explicit `alpha` and an SMA seed of `period` samples.
///
/// This is the shared core of [`ema`], [`ema_wilder`] and every composite built
/// from them.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn ema_with_alpha<T: SeriesElement>(data: &[T], period: usize, alpha: T) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let p = T::from_usize(period)?;
    let mut out = nan_vec(data.len());
    let mut prev: Option<T> = None;
    let mut seed_sum = T::zero();
    let mut seed_count = 0_usize;

    for (i, &x) in data.iter().enumerate() {
        if x.is_nan() {
            prev = None;
            seed_sum = T::zero();
            seed_count = 0;
            continue;
        }
        let value = match prev {
            Some(p_val) => p_val + alpha * (x - p_val),
            None => {
                seed_sum += x;
                seed_count += 1;
                if seed_count < period {
                    continue;
                }
                seed_sum / p
            }
        };
        out[i] = value;
        prev = Some(value);
    }
    Ok(out)
}

/// Computes the Exponential Moving Average, `α = 2 / (period + 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn ema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let alpha = T::two() / (T::from_usize(period)? + T::one());
    ema_with_alpha(data, period, alpha)
}

/// Computes Wilder's smoothed moving average (RMA/SMMA), `α = 1 / period`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn ema_wilder<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let alpha = T::one() / T::from_usize(period)?;
    ema_with_alpha(data, period, alpha)
}

/// Computes the linearly Weighted Moving Average in O(n).
///
/// The window weight and sum are updated incrementally and recomputed from the
/// window after a NaN clears or every few thousand steps.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn wma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let p = T::from_usize(period)?;
    let denom = p * (p + T::one()) / T::two();
    let mut out = nan_vec(n);
    let mut last_nan: Option<usize> = None;
    let mut state: Option<(T, T)> = None;

    for i in 0..n {
        let x = data[i];
        if x.is_nan() {
            last_nan = Some(i);
            state = None;
            continue;
        }
        if i + 1 < period || last_nan.is_some_and(|j| i - j < period) {
            continue;
        }
        let (sum, weighted) = match state {
            Some((sum, weighted)) if i % REBASE_INTERVAL != 0 => {
                let leaving = data[i - period];
                (sum - leaving + x, weighted - sum + p * x)
            }
            _ => {
                let window = &data[i + 1 - period..=i];
                let mut sum = T::zero();
                let mut weighted = T::zero();
                for (k, &v) in window.iter().enumerate() {
                    sum += v;
                    weighted += T::from_usize(k + 1)? * v;
                }
                (sum, weighted)
            }
        };
        state = Some((sum, weighted));
        out[i] = weighted / denom;
    }
    Ok(out)
}

/// Computes the Double Exponential Moving Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn dema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let e1 = ema(data, period)?;
    let e2 = ema(&e1, period)?;
    Ok(e1.iter().zip(&e2).map(|(&a, &b)| T::two() * a - b).collect())
}

/// Computes the Triple Exponential Moving Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn tema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let e1 = ema(data, period)?;
    let e2 = ema(&e1, period)?;
    let e3 = ema(&e2, period)?;
    let three = T::constant(3.0);
    Ok((0..data.len())
        .map(|i| three * e1[i] - three * e2[i] + e3[i])
        .collect())
}

/// Computes the Triangular Moving Average (an SMA of an SMA).
///
/// Odd periods use two passes of `(p + 1) / 2`; even periods use `p / 2` then
/// `p / 2 + 1`. Either way the lookback is `period - 1`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn trima<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let (first, second) = if period % 2 == 1 {
        ((period + 1) / 2, (period + 1) / 2)
    } else {
        (period / 2, period / 2 + 1)
    };
    sma(&sma(data, first)?, second)
}

/// Computes the Hull Moving Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn hma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let half = (period / 2).max(1);
    // floor(sqrt(p)) without a float round trip
    let mut root = 1;
    while (root + 1) * (root + 1) <= period {
        root += 1;
    }
    let w_half = wma(data, half)?;
    let w_full = wma(data, period)?;
    let raw: Vec<T> = w_half
        .iter()
        .zip(&w_full)
        .map(|(&h, &f)| T::two() * h - f)
        .collect();
    wma(&raw, root)
}

/// Computes the Zero-Lag Exponential Moving Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn zlema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let lag = (period - 1) / 2;
    let mut adjusted = nan_vec(data.len());
    for i in lag..data.len() {
        adjusted[i] = T::two() * data[i] - data[i - lag];
    }
    ema(&adjusted, period)
}

/// Computes the Arnaud Legoux Moving Average.
///
/// Gaussian weights centred at `offset × (period - 1)` with width
/// `period / sigma`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, `offset` is negative
/// or `sigma` is not positive.
pub fn alma<T: SeriesElement>(data: &[T], period: usize, offset: f64, sigma: f64) -> Result<Vec<T>> {
    validate_period("period", period)?;
    validate_non_negative("offset", offset)?;
    validate_positive("sigma", sigma)?;
    if period > data.len() {
        return Ok(nan_vec(data.len()));
    }
    let m = offset * (period as f64 - 1.0);
    let s = period as f64 / sigma;
    let raw: Vec<f64> = (0..period)
        .map(|k| (-((k as f64 - m).powi(2)) / (2.0 * s * s)).exp())
        .collect();
    let norm: f64 = raw.iter().sum();
    let weights: Vec<T> = raw
        .iter()
        .map(|&w| T::from_f64(w / norm))
        .collect::<Result<_>>()?;

    let mut out = nan_vec(data.len());
    for i in period.saturating_sub(1)..data.len() {
        let window = &data[i + 1 - period..=i];
        out[i] = window.iter().zip(&weights).map(|(&x, &w)| x * w).sum();
    }
    Ok(out)
}

/// Computes Tillson's T3 moving average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `v_factor` is negative.
pub fn t3<T: SeriesElement>(data: &[T], period: usize, v_factor: f64) -> Result<Vec<T>> {
    validate_non_negative("v_factor", v_factor)?;
    let e1 = ema(data, period)?;
    let e2 = ema(&e1, period)?;
    let e3 = ema(&e2, period)?;
    let e4 = ema(&e3, period)?;
    let e5 = ema(&e4, period)?;
    let e6 = ema(&e5, period)?;

    let a = v_factor;
    let c1 = T::from_f64(-a * a * a)?;
    let c2 = T::from_f64(3.0 * a * a + 3.0 * a * a * a)?;
    let c3 = T::from_f64(-6.0 * a * a - 3.0 * a - 3.0 * a * a * a)?;
    let c4 = T::from_f64(1.0 + 3.0 * a + a * a * a + 3.0 * a * a)?;
    Ok((0..data.len())
        .map(|i| c1 * e6[i] + c2 * e5[i] + c3 * e4[i] + c4 * e3[i])
        .collect())
}

/// Computes the Volume-Weighted Moving Average `Σ(x·v) / Σv`.
///
/// A window with zero total volume falls back to the plain window mean.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` if `volume` differs in length from `data`.
pub fn vwma<T: SeriesElement>(data: &[T], volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("data", data), ("volume", volume)])?;
    let p = T::from_usize(period)?;
    let mut out = nan_vec(n);
    let mut pv = RollingSum::new();
    let mut vol = RollingSum::new();
    let mut px = RollingSum::new();

    for i in 0..n {
        pv.push(data[i] * volume[i]);
        vol.push(volume[i]);
        px.push(data[i]);
        if i >= period {
            let j = i - period;
            pv.pop(data[j] * volume[j]);
            vol.pop(volume[j]);
            px.pop(data[j]);
        }
        if i + 1 >= period {
            let v = vol.value();
            out[i] = if v == T::zero() { px.value() / p } else { pv.value() / v };
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_sma_basic() {
        let out = sma(&ramp(5), 3).unwrap();
        assert_eq!(count_nan_prefix(&out), 2);
        assert_eq!(&out[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_short_input_all_nan() {
        let out = sma(&[1.0_f64, 2.0], 20).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(sma(&ramp(5), 0), Err(Error::InvalidParameter { .. })));
        assert!(matches!(ema(&ramp(5), 0), Err(Error::InvalidParameter { .. })));
        assert!(matches!(wma::<f64>(&[], 0), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_ema_seed_and_recursion() {
        let data = ramp(6);
        let out = ema(&data, 3).unwrap();
        assert_eq!(count_nan_prefix(&out), 2);
        assert!(approx_eq(out[2], 2.0, 1e-12));
        // alpha = 0.5
        assert!(approx_eq(out[3], 3.0, 1e-12));
        assert!(approx_eq(out[5], 5.0, 1e-12));
    }

    #[test]
    fn test_ema_period_one_is_identity() {
        let data = vec![3.0_f64, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(ema(&data, 1).unwrap(), data);
    }

    #[test]
    fn test_ema_reseeds_after_nan() {
        let data = vec![1.0_f64, 2.0, f64::NAN, 4.0, 6.0, 8.0];
        let out = ema(&data, 2).unwrap();
        assert!(approx_eq(out[1], 1.5, 1e-12));
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(approx_eq(out[4], 5.0, 1e-12));
    }

    #[test]
    fn test_ema_wilder_alpha() {
        let data = vec![2.0_f64, 4.0, 8.0];
        let out = ema_wilder(&data, 2).unwrap();
        assert!(approx_eq(out[1], 3.0, 1e-12));
        assert!(approx_eq(out[2], 5.5, 1e-12));
    }

    #[test]
    fn test_wma_matches_direct_formula() {
        let data: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.21).cos() * 5.0 + 50.0).collect();
        let out = wma(&data, 10).unwrap();
        for i in 9..data.len() {
            let mut num = 0.0;
            for k in 0..10 {
                num += (k + 1) as f64 * data[i - 9 + k];
            }
            assert!(approx_eq(out[i], num / 55.0, 1e-9), "index {i}");
        }
    }

    #[test]
    fn test_wma_nan_window() {
        let data = vec![1.0_f64, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let out = wma(&data, 2).unwrap();
        assert!(out[2].is_nan() && out[3].is_nan());
        assert!(approx_eq(out[4], (4.0 + 10.0) / 3.0, 1e-12));
    }

    #[test]
    fn test_dema_tema_on_linear_series() {
        let data = ramp(100);
        let d = dema(&data, 5).unwrap();
        let t = tema(&data, 5).unwrap();
        assert_eq!(count_nan_prefix(&d), dema_lookback(5));
        assert_eq!(count_nan_prefix(&t), tema_lookback(5));
        // lag-compensated averages track a ramp almost exactly once settled
        assert!((d[99] - 100.0).abs() < 0.1);
        assert!((t[99] - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_trima_lookback() {
        for period in [4, 5, 20, 21] {
            let out = trima(&ramp(60), period).unwrap();
            assert_eq!(count_nan_prefix(&out), period - 1, "period {period}");
        }
    }

    #[test]
    fn test_hma_lookback() {
        let out = hma(&ramp(60), 16).unwrap();
        // wma(16) lookback 15, then wma(4) adds 3
        assert_eq!(count_nan_prefix(&out), 18);
    }

    #[test]
    fn test_zlema_lookback() {
        let out = zlema(&ramp(40), 9).unwrap();
        assert_eq!(count_nan_prefix(&out), 4 + 8);
    }

    #[test]
    fn test_alma_constant_series() {
        let data = vec![7.0_f64; 30];
        let out = alma(&data, 9, 0.85, 6.0).unwrap();
        assert_eq!(count_nan_prefix(&out), 8);
        assert!(out[8..].iter().all(|&v| approx_eq(v, 7.0, 1e-12)));
    }

    #[test]
    fn test_alma_rejects_bad_sigma() {
        assert!(alma(&ramp(10), 5, 0.85, 0.0).is_err());
    }

    #[test]
    fn test_t3_constant_series() {
        let data = vec![3.0_f64; 80];
        let out = t3(&data, 5, 0.7).unwrap();
        assert_eq!(count_nan_prefix(&out), 6 * 4);
        assert!(approx_eq(out[79], 3.0, 1e-9));
    }

    #[test]
    fn test_vwma_weights_by_volume() {
        let data = vec![10.0_f64, 20.0, 30.0];
        let volume = vec![1.0_f64, 1.0, 2.0];
        let out = vwma(&data, &volume, 2).unwrap();
        assert!(approx_eq(out[2], (20.0 + 60.0) / 3.0, 1e-12));
    }

    #[test]
    fn test_vwma_zero_volume_falls_back_to_mean() {
        let data = vec![10.0_f64, 20.0];
        let volume = vec![0.0_f64, 0.0];
        let out = vwma(&data, &volume, 2).unwrap();
        assert_eq!(out[1], 15.0);
    }

    #[test]
    fn test_vwma_shape_mismatch() {
        assert!(matches!(
            vwma(&[1.0_f64, 2.0], &[1.0], 1),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
