//! Gator Oscillator: the spread between Alligator lines as a two-sided histogram.
//!
//! ```text
//! upper = |jaw - teeth|
//! lower = -|teeth - lips|
//! ```
//!
//! The Alligator is built on `hl2` with the standard 8/5/3 forward shifts.

use crate::error::Result;
use crate::indicators::trend::ichimoku::alligator;
use crate::traits::{validate_same_length, SeriesElement};
use crate::utils::hl2;

/// Upper and lower Gator histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct GatorOutput<T> {
    /// Jaw/teeth distance, non-negative.
    pub upper: Vec<T>,
    /// Negated teeth/lips distance, non-positive.
    pub lower: Vec<T>,
}

/// Computes the Gator Oscillator.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn gator_oscillator<T: SeriesElement>(
    high: &[T],
    low: &[T],
    jaw_period: usize,
    teeth_period: usize,
    lips_period: usize,
) -> Result<GatorOutput<T>> {
    validate_same_length(&[("high", high), ("low", low)])?;
    let lines = alligator(&hl2(high, low), jaw_period, 8, teeth_period, 5, lips_period, 3)?;
    Ok(GatorOutput {
        upper: lines
            .jaw
            .iter()
            .zip(&lines.teeth)
            .map(|(&j, &t)| (j - t).abs())
            .collect(),
        lower: lines
            .teeth
            .iter()
            .zip(&lines.lips)
            .map(|(&t, &l)| -(t - l).abs())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::count_nan_prefix;

    #[test]
    fn test_gator_warmup_and_signs() {
        let high: Vec<f64> = (0..80).map(|i| 20.0 + (i as f64 * 0.2).sin() * 3.0).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 1.0).collect();
        let out = gator_oscillator(&high, &low, 13, 8, 5).unwrap();
        // jaw: 12 warm-up + 8 shift
        assert_eq!(count_nan_prefix(&out.upper), 20);
        assert_eq!(count_nan_prefix(&out.lower), 12);
        assert!(out.upper[20..].iter().all(|&v| v >= 0.0));
        assert!(out.lower[12..].iter().all(|&v| v <= 0.0));
    }

    #[test]
    fn test_gator_flat_is_zero() {
        let high = vec![5.0_f64; 40];
        let out = gator_oscillator(&high, &high, 13, 8, 5).unwrap();
        assert!(out.upper[20..].iter().all(|&v| v == 0.0));
    }
}
