//! Order statistics over a trailing window: median, histogram mode and
//! percent rank. A window containing NaN yields NaN.

use std::cmp::Ordering;

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::nan_vec;

fn finite_window<T: SeriesElement>(window: &[T]) -> bool {
    window.iter().all(|v| !v.is_nan())
}

fn by_value<T: SeriesElement>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Computes the rolling median. Even windows average the two middle values.
///
/// Each window is partially ordered with `select_nth_unstable_by`, so a
/// step costs O(period).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn median<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(data.len());
    if period > data.len() {
        return Ok(out);
    }
    let mut scratch = Vec::with_capacity(period);
    let mid = period / 2;
    for i in period.saturating_sub(1)..data.len() {
        let window = &data[i + 1 - period..=i];
        if !finite_window(window) {
            continue;
        }
        scratch.clear();
        scratch.extend_from_slice(window);
        let (lower, &mut upper, _) = scratch.select_nth_unstable_by(mid, by_value);
        out[i] = if period % 2 == 1 {
            upper
        } else {
            let below = lower.iter().copied().fold(T::neg_infinity(), T::max);
            (below + upper) / T::two()
        };
    }
    Ok(out)
}

/// Computes the rolling histogram mode.
///
/// The window range is split into `bins` equal bins; the centre of the
/// fullest bin is returned, the lowest bin winning ties. A flat window
/// returns its value.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` or `bins` is zero.
pub fn mode<T: SeriesElement>(data: &[T], period: usize, bins: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    validate_period("bins", bins)?;
    let bin_count = T::from_usize(bins)?;
    let half = T::constant(0.5);
    let mut out = nan_vec(data.len());
    if period > data.len() {
        return Ok(out);
    }
    // Bin indices of the window, sorted; at most `period` bins are occupied.
    let mut slots: Vec<usize> = Vec::with_capacity(period);
    for i in period - 1..data.len() {
        let window = &data[i + 1 - period..=i];
        if !finite_window(window) {
            continue;
        }
        let lo = window.iter().copied().fold(T::infinity(), T::min);
        let hi = window.iter().copied().fold(T::neg_infinity(), T::max);
        if hi == lo {
            out[i] = lo;
            continue;
        }
        let width = (hi - lo) / bin_count;
        slots.clear();
        slots.extend(
            window
                .iter()
                .map(|&x| ((x - lo) / width).floor().to_usize().unwrap_or(0).min(bins - 1)),
        );
        slots.sort_unstable();
        let (mut best, mut best_count) = (slots[0], 0);
        let mut start = 0;
        while start < slots.len() {
            let slot = slots[start];
            let end = start + slots[start..].iter().take_while(|&&s| s == slot).count();
            if end - start > best_count {
                best = slot;
                best_count = end - start;
            }
            start = end;
        }
        out[i] = lo + (T::from_usize(best)? + half) * width;
    }
    Ok(out)
}

/// Computes percent rank: the share of the previous `length` values that are
/// less than or equal to the current value, in percent.
///
/// The first value is at index `length`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn percent_rank<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    let len = T::from_usize(length)?;
    let mut out = nan_vec(data.len());
    for i in length..data.len() {
        let window = &data[i - length..=i];
        if !finite_window(window) {
            continue;
        }
        let current = data[i];
        let at_or_below = window[..length].iter().filter(|&&v| v <= current).count();
        out[i] = T::hundred() * T::from_usize(at_or_below)? / len;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_median_odd_and_even() {
        let data = vec![5.0_f64, 1.0, 3.0, 9.0, 7.0];
        let odd = median(&data, 3).unwrap();
        assert_eq!(count_nan_prefix(&odd), 2);
        assert_eq!(odd[2..], [3.0, 3.0, 7.0]);
        let even = median(&data, 4).unwrap();
        assert_eq!(even[3], 4.0);
        assert_eq!(even[4], 5.0);
    }

    #[test]
    fn test_median_nan_window() {
        let data = vec![1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
        let out = median(&data, 3).unwrap();
        assert!(out[2].is_nan() && out[3].is_nan());
        assert_eq!(out[4], 4.0);
    }

    #[test]
    fn test_mode_picks_dense_bin() {
        let data = vec![1.0_f64, 1.1, 1.2, 1.15, 10.0];
        let out = mode(&data, 5, 3).unwrap();
        // range 9, width 3: bin 0 holds four values
        assert!(approx_eq(out[4], 2.5, 1e-12));
    }

    #[test]
    fn test_mode_ties_and_flat() {
        let data = vec![0.0_f64, 10.0];
        assert!(approx_eq(mode(&data, 2, 2).unwrap()[1], 2.5, 1e-12));
        assert_eq!(mode(&[4.0_f64, 4.0, 4.0], 3, 10).unwrap()[2], 4.0);
    }

    #[test]
    fn test_percent_rank() {
        let data = vec![1.0_f64, 2.0, 3.0, 2.0, 5.0];
        let out = percent_rank(&data, 3).unwrap();
        assert_eq!(count_nan_prefix(&out), 3);
        // previous [1, 2, 3] vs 2: two at or below
        assert!(approx_eq(out[3], 200.0 / 3.0, 1e-12));
        assert_eq!(out[4], 100.0);
    }

    #[test]
    fn test_huge_window_on_short_input_is_all_nan() {
        let data = [1.0_f64, 2.0, 3.0];
        let huge = 1_usize << 40;
        assert!(median(&data, huge).unwrap().iter().all(|v| v.is_nan()));
        assert!(mode(&data, huge, 10).unwrap().iter().all(|v| v.is_nan()));
        assert!(percent_rank(&data, huge).unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_mode_with_huge_bin_count() {
        let data = vec![0.0_f64, 0.0, 10.0];
        let out = mode(&data, 3, 1 << 40).unwrap();
        // the two zeros share the lowest bin
        assert!(out[2] < 1e-6);
    }
}
