//! Rolling least-squares line fits: LINREG, LRSLOPE and TSF.
//!
//! Each window is fitted against `x = 0..period-1` (oldest sample at 0).
//!
//! # Formula
//!
//! ```text
//! slope     = Σ (x - x̄)(y - ȳ) / Σ (x - x̄)²
//! intercept = ȳ - slope · x̄
//! LINREG    = intercept + slope · (period - 1)      (fitted value at the current bar)
//! TSF       = intercept + slope · period            (one-bar forecast)
//! LRSLOPE   = (LINREG[i] - LINREG[i-1]) / interval
//! ```

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::nan_vec;

/// Least-squares fit of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LineFit<T> {
    slope: T,
    intercept: T,
}

impl<T: SeriesElement> LineFit<T> {
    fn of(window: &[T]) -> Result<Self> {
        let n = T::from_usize(window.len())?;
        let x_mean = (n - T::one()) / T::two();
        let y_mean = window.iter().copied().sum::<T>() / n;
        let mut sxy = T::zero();
        let mut sxx = T::zero();
        for (k, &y) in window.iter().enumerate() {
            let dx = T::from_usize(k)? - x_mean;
            sxy += dx * (y - y_mean);
            sxx += dx * dx;
        }
        let slope = if sxx == T::zero() { T::zero() } else { sxy / sxx };
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    fn at(&self, x: T) -> T {
        self.intercept + self.slope * x
    }
}

fn fitted<T: SeriesElement>(data: &[T], period: usize, x: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let at = T::from_usize(x)?;
    let mut out = nan_vec(data.len());
    for i in period.saturating_sub(1)..data.len() {
        out[i] = LineFit::of(&data[i + 1 - period..=i])?.at(at);
    }
    Ok(out)
}

/// Computes the linear regression value at the current bar.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn linreg<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    fitted(data, period, period.saturating_sub(1))
}

/// Computes the time-series forecast: the regression line extended one bar.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn tsf<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    fitted(data, period, period)
}

/// Computes the bar-to-bar change of [`linreg`] per `interval`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` or `interval` is zero.
pub fn lrslope<T: SeriesElement>(data: &[T], period: usize, interval: usize) -> Result<Vec<T>> {
    validate_period("interval", interval)?;
    let line = linreg(data, period)?;
    let step = T::from_usize(interval)?;
    let mut out = nan_vec(data.len());
    for i in 1..line.len() {
        out[i] = (line[i] - line[i - 1]) / step;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_linreg_exact_on_line() {
        let data: Vec<f64> = (0..30).map(|i| 3.0 + 2.0 * i as f64).collect();
        let out = linreg(&data, 14).unwrap();
        assert_eq!(count_nan_prefix(&out), 13);
        for i in 13..30 {
            assert!(approx_eq(out[i], data[i], 1e-9));
        }
        let forecast = tsf(&data, 14).unwrap();
        assert!(approx_eq(forecast[20], data[21], 1e-9));
    }

    #[test]
    fn test_lrslope_on_line() {
        let data: Vec<f64> = (0..40).map(|i| 1.5 * i as f64).collect();
        let out = lrslope(&data, 10, 1).unwrap();
        assert_eq!(count_nan_prefix(&out), 10);
        assert!(out[10..].iter().all(|&v| approx_eq(v, 1.5, 1e-9)));
        let halved = lrslope(&data, 10, 2).unwrap();
        assert!(approx_eq(halved[20], 0.75, 1e-9));
    }

    #[test]
    fn test_single_sample_window() {
        let data = vec![4.0_f64, 5.0];
        assert_eq!(linreg(&data, 1).unwrap(), vec![4.0, 5.0]);
    }

    #[test]
    fn test_nan_window() {
        let data = vec![1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
        let out = linreg(&data, 2).unwrap();
        assert!(out[1].is_nan() && out[2].is_nan());
        assert!(approx_eq(out[3], 4.0, 1e-12));
    }
}
