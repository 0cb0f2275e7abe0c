//! Range and return dispersion: historical volatility, Chaikin volatility,
//! Mass Index and relative volume.

use crate::error::Result;
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::kernels::rolling_moments::{rolling_stddev, rolling_sum};
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Computes annualized historical volatility in percent.
///
/// ```text
/// r[i] = ln(close[i] / close[i-1])
/// HV   = 100 × σ(r, length) × sqrt(annual / per)
/// ```
///
/// A non-positive price contributes a zero return.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a zero `length` or `per`, or a zero `annual`.
pub fn hv<T: SeriesElement>(close: &[T], length: usize, annual: usize, per: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    validate_period("annual", annual)?;
    validate_period("per", per)?;
    let n = close.len();
    let mut returns = nan_vec(n);
    for i in 1..n {
        let (prev, cur) = (close[i - 1], close[i]);
        returns[i] = if prev > T::zero() && cur > T::zero() {
            (cur / prev).ln()
        } else if prev.is_nan() || cur.is_nan() {
            T::nan()
        } else {
            T::zero()
        };
    }
    let scale = T::hundred() * (T::from_usize(annual)? / T::from_usize(per)?).sqrt();
    Ok(rolling_stddev(&returns, length)?
        .into_iter()
        .map(|s| s * scale)
        .collect())
}

/// Computes Chaikin volatility: the rate of change of an EMA of the bar range.
///
/// A zero lagged average yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn chaikin_volatility<T: SeriesElement>(
    high: &[T],
    low: &[T],
    ema_period: usize,
    roc_period: usize,
) -> Result<Vec<T>> {
    validate_period("roc_period", roc_period)?;
    let n = validate_same_length(&[("high", high), ("low", low)])?;
    let range: Vec<T> = high.iter().zip(low).map(|(&h, &l)| h - l).collect();
    let smoothed = ema(&range, ema_period)?;
    let mut out = nan_vec(n);
    for i in roc_period..n {
        let base = smoothed[i - roc_period];
        out[i] = T::hundred() * ratio_or(smoothed[i] - base, base, T::zero());
    }
    Ok(out)
}

/// Computes the Mass Index: a rolling sum of the single/double EMA range ratio.
///
/// A zero double-smoothed range yields a ratio of 1.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn massindex<T: SeriesElement>(
    high: &[T],
    low: &[T],
    length: usize,
    ema_length: usize,
) -> Result<Vec<T>> {
    validate_period("length", length)?;
    validate_same_length(&[("high", high), ("low", low)])?;
    let range: Vec<T> = high.iter().zip(low).map(|(&h, &l)| h - l).collect();
    let single = ema(&range, ema_length)?;
    let double = ema(&single, ema_length)?;
    let ratio: Vec<T> = single
        .iter()
        .zip(&double)
        .map(|(&s, &d)| ratio_or(s, d, T::one()))
        .collect();
    rolling_sum(&ratio, length)
}

/// Computes relative volume: volume over its `period` average.
///
/// A zero average yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rvol<T: SeriesElement>(volume: &[T], period: usize) -> Result<Vec<T>> {
    let avg = sma(volume, period)?;
    Ok(volume
        .iter()
        .zip(&avg)
        .map(|(&v, &a)| ratio_or(v, a, T::zero()))
        .collect())
}
