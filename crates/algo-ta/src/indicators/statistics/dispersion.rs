//! Windowed variance and standard deviation, with selectable input transform.
//!
//! `variance` maintains shifted, compensated moments in O(n);
//! [`variance_naive`] recomputes every window and is the equivalence reference.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::kernels::rolling_moments::{rolling_stddev, rolling_variance, rolling_variance_naive};
use crate::traits::SeriesElement;
use crate::utils::{nan_vec, ratio_or};

/// What the variance is taken of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceMode {
    /// Raw values.
    #[default]
    Pr,
    /// Log returns `ln(x / x[1])`.
    Lr,
    /// Percent returns `100 × (x - x[1]) / x[1]`.
    Pct,
}

impl VarianceMode {
    /// Accepted selector names.
    pub const NAMES: &'static [&'static str] = &["PR", "LR", "PCT"];

    /// Maps the input series into the series whose variance is reported.
    #[must_use]
    pub fn transform<T: SeriesElement>(self, data: &[T]) -> Vec<T> {
        match self {
            Self::Pr => data.to_vec(),
            Self::Lr | Self::Pct => {
                let mut out = nan_vec(data.len());
                for i in 1..data.len() {
                    let (prev, cur) = (data[i - 1], data[i]);
                    out[i] = if self == Self::Lr {
                        if prev > T::zero() && cur > T::zero() {
                            (cur / prev).ln()
                        } else if prev.is_nan() || cur.is_nan() {
                            T::nan()
                        } else {
                            T::zero()
                        }
                    } else {
                        T::hundred() * ratio_or(cur - prev, prev, T::zero())
                    };
                }
                out
            }
        }
    }
}

impl FromStr for VarianceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PR" => Ok(Self::Pr),
            "LR" => Ok(Self::Lr),
            "PCT" => Ok(Self::Pct),
            _ => Err(Error::invalid_parameter("mode", s, "expected PR, LR or PCT")),
        }
    }
}

impl fmt::Display for VarianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pr => "PR",
            Self::Lr => "LR",
            Self::Pct => "PCT",
        })
    }
}

/// Computes the trailing population variance of the transformed series.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn variance<T: SeriesElement>(data: &[T], period: usize, mode: VarianceMode) -> Result<Vec<T>> {
    rolling_variance(&mode.transform(data), period)
}

/// O(n·k) reference for [`variance`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn variance_naive<T: SeriesElement>(data: &[T], period: usize, mode: VarianceMode) -> Result<Vec<T>> {
    rolling_variance_naive(&mode.transform(data), period)
}

/// Computes the trailing population standard deviation.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn stdev<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_stddev(data, period)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_variance_price_mode() {
        let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = variance(&data, 8, VarianceMode::Pr).unwrap();
        assert!(approx_eq(out[7], 4.0, 1e-12));
        assert!(approx_eq(stdev(&data, 8).unwrap()[7], 2.0, 1e-12));
    }

    #[test]
    fn test_return_modes_warmup() {
        let data: Vec<f64> = (1..=30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let lr = variance(&data, 10, VarianceMode::Lr).unwrap();
        let pct = variance(&data, 10, VarianceMode::Pct).unwrap();
        assert_eq!(count_nan_prefix(&lr), 10);
        assert_eq!(count_nan_prefix(&pct), 10);
        // constant growth: returns are constant
        assert!(lr[10..].iter().all(|v| v.abs() < 1e-12));
        assert!(pct[10..].iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_variance_matches_naive() {
        let data: Vec<f64> = (0..500).map(|i| 1e4 + ((i * 37) % 101) as f64 * 0.01).collect();
        for mode in [VarianceMode::Pr, VarianceMode::Lr, VarianceMode::Pct] {
            let fast = variance(&data, 20, mode).unwrap();
            let slow = variance_naive(&data, 20, mode).unwrap();
            for (a, b) in fast.iter().zip(&slow) {
                assert!(approx_eq(*a, *b, 1e-9), "{mode}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("pct".parse::<VarianceMode>().unwrap(), VarianceMode::Pct);
        assert!(matches!("std".parse::<VarianceMode>(), Err(Error::InvalidParameter { .. })));
    }
}
