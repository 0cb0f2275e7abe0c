//! Commodity Channel Index.
//!
//! ```text
//! TP  = (high + low + close) / 3
//! CCI = (TP - SMA(TP, n)) / (0.015 × MeanDev(TP, n))
//! ```
//!
//! A zero mean deviation yields 0.

use crate::error::Result;
use crate::indicators::trend::moving_averages::sma;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{hlc3, nan_vec, ratio_or};

/// Computes the Commodity Channel Index.
///
/// The mean absolute deviation is taken against each window's own mean, which
/// makes this O(n·period).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn cci<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let tp = hlc3(high, low, close);
    let mean = sma(&tp, period)?;
    let p = T::from_usize(period)?;
    let scale = T::constant(0.015);
    let mut out = nan_vec(n);
    for i in period.saturating_sub(1)..n {
        if mean[i].is_nan() {
            continue;
        }
        let dev: T = tp[i + 1 - period..=i].iter().map(|&x| (x - mean[i]).abs()).sum::<T>() / p;
        out[i] = ratio_or(tp[i] - mean[i], scale * dev, T::zero());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_cci_known_value() {
        let tp = [1.0_f64, 2.0, 3.0];
        let out = cci(&tp, &tp, &tp, 3).unwrap();
        // mean 2, mean deviation 2/3
        assert_eq!(count_nan_prefix(&out), 2);
        assert!(approx_eq(out[2], 1.0 / (0.015 * 2.0 / 3.0), 1e-9));
    }

    #[test]
    fn test_cci_flat_sentinel() {
        let flat = vec![4.0_f64; 25];
        let out = cci(&flat, &flat, &flat, 20).unwrap();
        assert!(out[19..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_cci_nan_window() {
        let mut data: Vec<f64> = (0..30).map(|i| i as f64).collect();
        data[15] = f64::NAN;
        let out = cci(&data, &data, &data, 5).unwrap();
        assert!(out[15..20].iter().all(|v| v.is_nan()));
        assert!(!out[20].is_nan());
    }
}
