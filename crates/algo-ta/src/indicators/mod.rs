//! Technical analysis indicator kernels.
//!
//! Kernels are pure functions over equal-length input slices. They are grouped
//! by category, and each category module re-exports its kernels:
//!
//! - [`trend`]: moving averages, adaptive smoothers, Supertrend, Ichimoku, Alligator
//! - [`momentum`]: RSI, MACD, stochastic, CCI, Williams %R, Fisher, Elder ray
//! - [`volatility`]: ATR, bands and channels, historical volatility, vortex, RVI
//! - [`volume`]: OBV, VWAP, MFI, accumulation/distribution, Klinger, EMV
//! - [`oscillators`]: ROC, TRIX, PPO, DPO, Aroon, STC, KST, Hilbert trendline
//! - [`statistics`]: regression, variance, correlation, beta, order statistics
//! - [`hybrid`]: ADX/DMI, parabolic SAR, pivots, fractals, zigzag, Gator
//! - [`utility`]: crossovers, highest/lowest, signal combinators
//!
//! # Output shape
//!
//! Every output has the input's length. Positions before the kernel's lookback
//! hold NaN, and an input shorter than the lookback yields an all-NaN output
//! rather than an error. Multi-output kernels return a named struct that
//! implements [`IndicatorOutput`], which the registry uses to flatten results
//! into named columns.
//!
//! # Example
//!
//! ```
//! use algo_ta::indicators::{momentum::rsi, trend::sma};
//!
//! let prices = vec![44.0_f64, 44.5, 43.5, 44.5, 44.0, 43.0, 42.5, 43.5, 44.5, 45.0];
//!
//! let sma_result = sma(&prices, 5).unwrap();
//! assert_eq!(sma_result.len(), prices.len());
//! assert!(sma_result[3].is_nan());
//!
//! let short = rsi(&prices[..3], 14).unwrap();
//! assert!(short.iter().all(|v| v.is_nan()));
//! ```
//!
//! # Degenerate ratios
//!
//! A zero denominator never produces NaN or infinity. Each kernel documents the
//! sentinel it returns instead (commonly 0, 50 or 100).

use crate::traits::SeriesElement;

/// A kernel result that can be flattened into named, equal-length columns.
pub trait IndicatorOutput<T> {
    /// Column names in output order.
    const FIELDS: &'static [&'static str];

    /// Length of every column.
    fn len(&self) -> usize;

    /// Returns `true` when the columns are empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the output, yielding columns in [`FIELDS`](Self::FIELDS) order.
    fn into_columns(self) -> Vec<Vec<T>>;
}

impl<T: SeriesElement> IndicatorOutput<T> for Vec<T> {
    const FIELDS: &'static [&'static str] = &["value"];

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn into_columns(self) -> Vec<Vec<T>> {
        vec![self]
    }
}

/// A boolean kernel result, flattened to a single 0/1 column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags(pub Vec<bool>);

/// Converts flags to a numeric 0/1 column.
#[must_use]
pub fn flags_to_column<T: SeriesElement>(flags: Vec<bool>) -> Vec<T> {
    flags
        .into_iter()
        .map(|b| if b { T::one() } else { T::zero() })
        .collect()
}

impl<T: SeriesElement> IndicatorOutput<T> for Flags {
    const FIELDS: &'static [&'static str] = &["value"];

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_columns(self) -> Vec<Vec<T>> {
        vec![flags_to_column(self.0)]
    }
}

/// Implements [`IndicatorOutput`] for a struct of `Vec<T>` fields.
macro_rules! indicator_output {
    ($name:ident { $($field:ident),+ $(,)? }) => {
        impl<T: $crate::traits::SeriesElement> $crate::indicators::IndicatorOutput<T> for $name<T> {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn len(&self) -> usize {
                [$(self.$field.len()),+][0]
            }

            fn into_columns(self) -> Vec<Vec<T>> {
                vec![$(self.$field),+]
            }
        }
    };
}

pub mod hybrid;
pub mod momentum;
pub mod oscillators;
pub mod statistics;
pub mod trend;
pub mod utility;
pub mod volatility;
pub mod volume;

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::indicators::momentum::MacdOutput;

    #[test]
    fn test_vec_output_columns() {
        let out = vec![1.0_f64, 2.0];
        assert_eq!(<Vec<f64> as IndicatorOutput<f64>>::FIELDS, &["value"]);
        assert_eq!(IndicatorOutput::<f64>::into_columns(out), vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_bool_output_columns() {
        let cols: Vec<Vec<f64>> = IndicatorOutput::<f64>::into_columns(Flags(vec![true, false]));
        assert_eq!(cols, vec![vec![1.0, 0.0]]);
    }

    #[test]
    fn test_struct_output_columns() {
        let out = MacdOutput {
            macd: vec![1.0_f64],
            signal: vec![2.0],
            histogram: vec![3.0],
        };
        assert_eq!(<MacdOutput<f64> as IndicatorOutput<f64>>::FIELDS, &["macd", "signal", "histogram"]);
        assert_eq!(IndicatorOutput::<f64>::len(&out), 1);
        assert_eq!(out.into_columns(), vec![vec![1.0], vec![2.0], vec![3.0]]);
    }
}
