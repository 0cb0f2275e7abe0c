//! Price channels: Bollinger, Keltner, Donchian and STARC bands.
//!
//! Bollinger bands use the population standard deviation, maintained in O(n)
//! by [`RollingMoments`](crate::kernels::rolling_moments::RollingMoments).
//!
//! # Formula
//!
//! ```text
//! Bollinger: middle = SMA(p), upper/lower = middle ± k × σ(p)
//! %B       = (x - lower) / (upper - lower)            (0.5 when the bands touch)
//! width    = (upper - lower) / middle                  (0 when middle is 0)
//! Keltner:  middle = EMA(close, p), upper/lower = middle ± m × ATR(q)
//! Donchian: upper = HH(p), lower = LL(p), middle = (upper + lower) / 2
//! STARC:    middle = SMA(close, p), upper/lower = middle ± m × ATR(q)
//! ```

use crate::error::Result;
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::indicators::volatility::atr::atr;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::kernels::rolling_moments::rolling_stddev;
use crate::traits::{validate_non_negative, validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::ratio_or;

/// Upper, middle and lower lines of a price channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BandOutput<T> {
    /// Upper band.
    pub upper: Vec<T>,
    /// Centre line.
    pub middle: Vec<T>,
    /// Lower band.
    pub lower: Vec<T>,
}

impl<T: SeriesElement> BandOutput<T> {
    fn around(middle: Vec<T>, width: &[T], k: T) -> Self {
        let upper = middle.iter().zip(width).map(|(&m, &w)| m + k * w).collect();
        let lower = middle.iter().zip(width).map(|(&m, &w)| m - k * w).collect();
        Self { upper, middle, lower }
    }
}

/// Lookback for Bollinger bands: `period - 1`.
#[inline]
#[must_use]
pub const fn bbands_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes Bollinger Bands.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `std_dev` is negative.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::volatility::bbands;
///
/// let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// let out = bbands(&data, 8, 2.0).unwrap();
/// assert!((out.middle[7] - 5.0).abs() < 1e-12);
/// assert!((out.upper[7] - 9.0).abs() < 1e-12);
/// assert!((out.lower[7] - 1.0).abs() < 1e-12);
/// ```
pub fn bbands<T: SeriesElement>(data: &[T], period: usize, std_dev: f64) -> Result<BandOutput<T>> {
    validate_period("period", period)?;
    validate_non_negative("std_dev", std_dev)?;
    let middle = sma(data, period)?;
    let sigma = rolling_stddev(data, period)?;
    Ok(BandOutput::around(middle, &sigma, T::from_f64(std_dev)?))
}

/// Computes Bollinger %B, the position of price inside the bands.
///
/// # Errors
///
/// Same as [`bbands`].
pub fn bbpercent<T: SeriesElement>(data: &[T], period: usize, std_dev: f64) -> Result<Vec<T>> {
    let bands = bbands(data, period, std_dev)?;
    let half = T::constant(0.5);
    Ok((0..data.len())
        .map(|i| ratio_or(data[i] - bands.lower[i], bands.upper[i] - bands.lower[i], half))
        .collect())
}

/// Computes Bollinger band width relative to the middle band.
///
/// # Errors
///
/// Same as [`bbands`].
pub fn bbwidth<T: SeriesElement>(data: &[T], period: usize, std_dev: f64) -> Result<Vec<T>> {
    let bands = bbands(data, period, std_dev)?;
    Ok((0..data.len())
        .map(|i| ratio_or(bands.upper[i] - bands.lower[i], bands.middle[i], T::zero()))
        .collect())
}

/// Computes Keltner Channels: EMA centre, ATR width.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for zero periods or a non-positive
/// multiplier, or `Error::ShapeMismatch` on unequal role lengths.
pub fn keltner<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    ema_period: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<BandOutput<T>> {
    validate_period("ema_period", ema_period)?;
    validate_period("atr_period", atr_period)?;
    validate_positive("multiplier", multiplier)?;
    let width = atr(high, low, close, atr_period)?;
    Ok(BandOutput::around(ema(close, ema_period)?, &width, T::from_f64(multiplier)?))
}

/// Computes Donchian Channels.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn donchian<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<BandOutput<T>> {
    validate_period("period", period)?;
    validate_same_length(&[("high", high), ("low", low)])?;
    let upper = rolling_max(high, period)?;
    let lower = rolling_min(low, period)?;
    let middle = upper
        .iter()
        .zip(&lower)
        .map(|(&u, &l)| (u + l) / T::two())
        .collect();
    Ok(BandOutput { upper, middle, lower })
}

/// Computes Stoller Average Range Channel bands: SMA centre, ATR width.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for zero periods or a non-positive
/// multiplier, or `Error::ShapeMismatch` on unequal role lengths.
pub fn starc<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    ma_period: usize,
    atr_period: usize,
    multiplier: f64,
) -> Result<BandOutput<T>> {
    validate_period("ma_period", ma_period)?;
    validate_period("atr_period", atr_period)?;
    validate_positive("multiplier", multiplier)?;
    let width = atr(high, low, close, atr_period)?;
    Ok(BandOutput::around(sma(close, ma_period)?, &width, T::from_f64(multiplier)?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_bbands_constant_series_collapses() {
        let data = vec![10.0_f64; 30];
        let out = bbands(&data, 20, 2.0).unwrap();
        assert_eq!(count_nan_prefix(&out.upper), bbands_lookback(20));
        assert_eq!(out.upper[25], 10.0);
        assert_eq!(out.lower[25], 10.0);
    }

    #[test]
    fn test_bbpercent_sentinel_when_bands_touch() {
        let data = vec![10.0_f64; 30];
        let out = bbpercent(&data, 20, 2.0).unwrap();
        assert!(out[18].is_nan());
        assert_eq!(out[25], 0.5);
    }

    #[test]
    fn test_bbpercent_and_width_values() {
        let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let pct = bbpercent(&data, 8, 2.0).unwrap();
        // upper 9, lower 1, price 9
        assert!(approx_eq(pct[7], 1.0, 1e-12));
        let width = bbwidth(&data, 8, 2.0).unwrap();
        assert!(approx_eq(width[7], 8.0 / 5.0, 1e-12));
    }

    #[test]
    fn test_donchian() {
        let high = vec![3.0_f64, 5.0, 4.0, 2.0];
        let low = vec![1.0_f64, 2.0, 0.5, 1.5];
        let out = donchian(&high, &low, 3).unwrap();
        assert_eq!(out.upper[2], 5.0);
        assert_eq!(out.lower[2], 0.5);
        assert_eq!(out.middle[2], 2.75);
        assert_eq!(out.upper[3], 5.0);
    }

    #[test]
    fn test_keltner_and_starc_are_symmetric() {
        let close: Vec<f64> = (0..60).map(|i| 100.0 + ((i as f64) * 0.4).sin()).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 0.5).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 0.5).collect();
        for out in [
            keltner(&high, &low, &close, 20, 10, 2.0).unwrap(),
            starc(&high, &low, &close, 5, 15, 1.33).unwrap(),
        ] {
            for i in 20..60 {
                assert!(approx_eq(out.upper[i] - out.middle[i], out.middle[i] - out.lower[i], 1e-9));
                assert!(out.upper[i] > out.lower[i]);
            }
        }
    }

    #[test]
    fn test_invalid_std_dev() {
        assert!(matches!(
            bbands(&[1.0_f64; 5], 3, -1.0),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
