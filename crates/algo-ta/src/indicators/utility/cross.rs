//! Two-series comparisons and trailing-window helpers.
//!
//! All boolean outputs are `false` wherever a comparison involves NaN or the
//! window is not yet full.

use crate::error::Result;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::nan_vec;

fn transitions<T: SeriesElement>(
    a: &[T],
    b: &[T],
    fired: impl Fn(T, T, T, T) -> bool,
) -> Result<Vec<bool>> {
    let n = validate_same_length(&[("a", a), ("b", b)])?;
    let mut out = vec![false; n];
    for i in 1..n {
        out[i] = fired(a[i], b[i], a[i - 1], b[i - 1]);
    }
    Ok(out)
}

/// `true` where `a` moves from at-or-below `b` to strictly above it.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` if the series differ in length.
pub fn crossover<T: SeriesElement>(a: &[T], b: &[T]) -> Result<Vec<bool>> {
    transitions(a, b, |a, b, a1, b1| a > b && a1 <= b1)
}

/// `true` where `a` moves from at-or-above `b` to strictly below it.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` if the series differ in length.
pub fn crossunder<T: SeriesElement>(a: &[T], b: &[T]) -> Result<Vec<bool>> {
    transitions(a, b, |a, b, a1, b1| a < b && a1 >= b1)
}

/// `true` on a transition in either direction.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` if the series differ in length.
pub fn cross<T: SeriesElement>(a: &[T], b: &[T]) -> Result<Vec<bool>> {
    transitions(a, b, |a, b, a1, b1| {
        (a > b && a1 <= b1) || (a < b && a1 >= b1)
    })
}

/// Highest value over the trailing `period` samples.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn highest<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_max(data, period)
}

/// Lowest value over the trailing `period` samples.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn lowest<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_min(data, period)
}

/// Difference from `length` samples ago.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn change<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    let mut out = nan_vec(data.len());
    for i in length..data.len() {
        out[i] = data[i] - data[i - length];
    }
    Ok(out)
}

fn strict_run<T: SeriesElement>(
    data: &[T],
    length: usize,
    step: impl Fn(T, T) -> bool,
) -> Result<Vec<bool>> {
    validate_period("length", length)?;
    let mut out = vec![false; data.len()];
    // samples in the current strict run; NaN breaks it
    let mut run = 0_usize;
    for (i, &x) in data.iter().enumerate() {
        run = if x.is_nan() {
            0
        } else if i > 0 && step(data[i - 1], x) {
            run + 1
        } else {
            1
        };
        out[i] = run >= length;
    }
    Ok(out)
}

/// `true` when the last `length` samples are strictly increasing.
///
/// With `length == 1` every non-NaN sample qualifies.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn rising<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<bool>> {
    strict_run(data, length, |prev, cur| cur > prev)
}

/// `true` when the last `length` samples are strictly decreasing.
///
/// With `length == 1` every non-NaN sample qualifies.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn falling<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<bool>> {
    strict_run(data, length, |prev, cur| cur < prev)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_crossover_single_transition() {
        let a = [1.0_f64, 2.0, 3.0, 2.0, 1.0];
        let b = [2.0_f64; 5];
        assert_eq!(crossover(&a, &b).unwrap(), vec![false, false, true, false, false]);
        assert_eq!(crossunder(&a, &b).unwrap(), vec![false, false, false, false, true]);
        assert_eq!(cross(&a, &b).unwrap(), vec![false, false, true, false, true]);
    }

    #[test]
    fn test_crossover_nan_is_false() {
        let a = [1.0_f64, f64::NAN, 3.0];
        let b = [2.0_f64; 3];
        assert_eq!(crossover(&a, &b).unwrap(), vec![false; 3]);
    }

    #[test]
    fn test_crossover_shape_mismatch() {
        assert!(matches!(
            crossover(&[1.0_f64, 2.0], &[1.0]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_change() {
        let out = change(&[1.0_f64, 4.0, 9.0, 16.0], 2).unwrap();
        assert!(out[1].is_nan());
        assert_eq!(&out[2..], &[8.0, 12.0]);
    }

    #[test]
    fn test_highest_lowest() {
        let data = [3.0_f64, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(highest(&data, 3).unwrap()[4], 5.0);
        assert_eq!(lowest(&data, 3).unwrap()[4], 1.0);
    }

    #[test]
    fn test_rising_falling() {
        let data = [1.0_f64, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0];
        assert_eq!(
            rising(&data, 2).unwrap(),
            vec![false, true, true, true, false, false, false]
        );
        assert_eq!(
            falling(&data, 2).unwrap(),
            vec![false, false, false, false, false, true, true]
        );
        assert_eq!(
            rising(&data, 4).unwrap(),
            vec![false, false, false, true, false, false, false]
        );
        assert!(rising(&data, 0).is_err());
    }

    #[test]
    fn test_rising_counts_samples_not_changes() {
        assert_eq!(rising(&[1.0_f64, 2.0, 3.0], 2).unwrap(), vec![false, true, true]);
        assert_eq!(rising(&[1.0_f64, 2.0, 3.0], 3).unwrap(), vec![false, false, true]);
        assert_eq!(falling(&[3.0_f64, 2.0, 1.0], 3).unwrap(), vec![false, false, true]);
    }

    #[test]
    fn test_single_sample_run_and_nan() {
        let data = [1.0_f64, f64::NAN, 2.0, 3.0];
        assert_eq!(rising(&data, 1).unwrap(), vec![true, false, true, true]);
        assert_eq!(rising(&data, 2).unwrap(), vec![false, false, false, true]);
    }

    #[test]
    fn test_rising_huge_length_is_false() {
        assert_eq!(rising(&[1.0_f64, 2.0, 3.0], 1 << 40).unwrap(), vec![false; 3]);
    }
}
