//! Adaptive-alpha smoothers: KAMA, VIDYA, McGinley Dynamic and FRAMA.
//!
//! KAMA, VIDYA and FRAMA share one recursion driver: the output seeds with the
//! raw input at the first index whose trailing window is complete and free of
//! NaN, then follows `y[i] = y[i-1] + sc[i] × (x[i] - y[i-1])` where the
//! smoothing constant `sc` is derived from the trailing window.
//!
//! # Formula
//!
//! ```text
//! KAMA:  ER = |x[i] - x[i-n]| / Σ|Δx|,   sc = (ER·(fast_sc - slow_sc) + slow_sc)²
//! VIDYA: CMO = (Σup - Σdown) / (Σup + Σdown),  sc = α·|CMO|
//! FRAMA: D = (ln(N1 + N2) - ln N3) / ln 2,  sc = clamp(exp(-4.6·(D - 1)), 0.01, 1)
//! McGinley: MD[i] = MD[i-1] + (x - MD[i-1]) / (n · (x / MD[i-1])⁴)
//! ```
//!
//! Degenerate windows (no movement) give `ER = 0` and `CMO = 0`; FRAMA falls
//! back to `D = 0` when any range is zero.

use crate::error::{Error, Result};
use crate::indicators::trend::moving_averages::ema;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_fast_slow, validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::{hl2, nan_vec};

fn adaptive_recursion<T: SeriesElement>(
    src: &[T],
    window: usize,
    smoothing: impl Fn(usize) -> T,
) -> Vec<T> {
    let mut out = nan_vec(src.len());
    let mut last_nan: Option<usize> = None;
    let mut prev: Option<T> = None;

    for (i, &x) in src.iter().enumerate() {
        if x.is_nan() {
            last_nan = Some(i);
            prev = None;
            continue;
        }
        if i + 1 < window || last_nan.is_some_and(|j| i - j < window) {
            continue;
        }
        let value = match prev {
            None => x,
            Some(p) => {
                let sc = smoothing(i);
                if sc.is_nan() {
                    prev = None;
                    continue;
                }
                p + sc * (x - p)
            }
        };
        out[i] = value;
        prev = Some(value);
    }
    out
}

fn abs_changes<T: SeriesElement>(data: &[T]) -> Vec<T> {
    let mut out = nan_vec(data.len());
    for i in 1..data.len() {
        out[i] = (data[i] - data[i - 1]).abs();
    }
    out
}

/// Computes Kaufman's Adaptive Moving Average.
///
/// The first output (index `length - 1`) is the raw input.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any period is zero or `fast >= slow`.
pub fn kama<T: SeriesElement>(data: &[T], length: usize, fast: usize, slow: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    validate_fast_slow("fast", fast, "slow", slow)?;
    let fast_sc = T::two() / (T::from_usize(fast)? + T::one());
    let slow_sc = T::two() / (T::from_usize(slow)? + T::one());
    let volatility = rolling_sum(&abs_changes(data), length)?;

    Ok(adaptive_recursion(data, length, |i| {
        let change = (data[i] - data[i - length]).abs();
        let vol = volatility[i];
        let er = if vol == T::zero() { T::zero() } else { change / vol };
        let sc = er * (fast_sc - slow_sc) + slow_sc;
        sc * sc
    }))
}

/// Computes Chande's Variable Index Dynamic Average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `alpha` is not positive.
pub fn vidya<T: SeriesElement>(data: &[T], period: usize, alpha: f64) -> Result<Vec<T>> {
    validate_period("period", period)?;
    validate_positive("alpha", alpha)?;
    let alpha = T::from_f64(alpha)?;
    let n = data.len();
    let mut up = nan_vec(n);
    let mut down = nan_vec(n);
    for i in 1..n {
        let d = data[i] - data[i - 1];
        up[i] = d.max(T::zero());
        down[i] = (-d).max(T::zero());
    }
    let sum_up = rolling_sum(&up, period)?;
    let sum_down = rolling_sum(&down, period)?;

    Ok(adaptive_recursion(data, period, |i| {
        let total = sum_up[i] + sum_down[i];
        let cmo = if total == T::zero() {
            T::zero()
        } else {
            (sum_up[i] - sum_down[i]) / total
        };
        alpha * cmo.abs()
    }))
}

/// Computes the McGinley Dynamic.
///
/// Seeds with the EMA seed (the SMA of the first `period` values). A zero
/// previous value leaves the line unchanged for that bar.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn mcginley<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let seed = ema(data, period)?;
    let p = T::from_usize(period)?;
    let mut out = nan_vec(data.len());
    let mut prev: Option<T> = None;

    for (i, &x) in data.iter().enumerate() {
        if x.is_nan() {
            prev = None;
            continue;
        }
        let value = match prev {
            None => {
                if seed[i].is_nan() {
                    continue;
                }
                seed[i]
            }
            Some(md) if md == T::zero() => md,
            Some(md) => {
                let ratio = x / md;
                let denom = p * ratio.powi(4);
                if denom == T::zero() || !denom.is_finite() {
                    md
                } else {
                    md + (x - md) / denom
                }
            }
        };
        out[i] = value;
        prev = Some(value);
    }
    Ok(out)
}

/// Computes Ehlers' Fractal Adaptive Moving Average on the median price.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is smaller than 2 or odd, or
/// `Error::ShapeMismatch` if `high` and `low` differ in length.
pub fn frama<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<Vec<T>> {
    if period < 2 || period % 2 != 0 {
        return Err(Error::invalid_parameter("period", period, "must be an even number of at least 2"));
    }
    let n = validate_same_length(&[("high", high), ("low", low)])?;
    let half = period / 2;
    let price = hl2(high, low);
    let hh = rolling_max(high, period)?;
    let ll = rolling_min(low, period)?;
    let hh_half = rolling_max(high, half)?;
    let ll_half = rolling_min(low, half)?;
    let p = T::from_usize(period)?;
    let h = T::from_usize(half)?;
    let ln2 = T::two().ln();
    let floor = T::constant(0.01);
    let k = T::constant(-4.6);

    let mut smoothing = nan_vec(n);
    for i in (period - 1)..n {
        let n3 = (hh[i] - ll[i]) / p;
        let n2 = (hh_half[i] - ll_half[i]) / h;
        let n1 = (hh_half[i - half] - ll_half[i - half]) / h;
        if n1.is_nan() || n2.is_nan() || n3.is_nan() {
            continue;
        }
        let dim = if n1 > T::zero() && n2 > T::zero() && n3 > T::zero() {
            ((n1 + n2).ln() - n3.ln()) / ln2
        } else {
            T::zero()
        };
        smoothing[i] = (k * (dim - T::one())).exp().max(floor).min(T::one());
    }

    Ok(adaptive_recursion(&price, period, |i| smoothing[i]))
}
