//! Small numeric helpers shared by kernels and tests.

use std::ops::Range;

use crate::traits::SeriesElement;

/// Default tolerance for exact-arithmetic comparisons.
pub const EPSILON: f64 = 1e-10;

/// Tolerance for comparisons involving recursive smoothers.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Compares two values, treating two NaNs as equal.
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, epsilon: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= epsilon
}

/// Compares two values relative to their magnitude, treating two NaNs as equal.
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, epsilon: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    let scale = a.abs().max(b.abs()).max(T::one());
    (a - b).abs() <= epsilon * scale
}

/// Counts NaN values in a series.
#[must_use]
pub fn count_nans<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Counts the leading run of NaN values.
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Allocates an all-NaN output of length `n`.
///
/// This is the value returned when a series is shorter than a kernel's lookback.
#[inline]
#[must_use]
pub fn nan_vec<T: SeriesElement>(n: usize) -> Vec<T> {
    vec![T::nan(); n]
}

/// Divides `num` by `den`, returning `sentinel` when the denominator is zero.
///
/// NaN operands still propagate; only the degenerate zero denominator is mapped.
#[inline]
#[must_use]
pub fn ratio_or<T: SeriesElement>(num: T, den: T, sentinel: T) -> T {
    if num.is_nan() || den.is_nan() {
        T::nan()
    } else if den == T::zero() {
        sentinel
    } else {
        num / den
    }
}

/// Element-wise `a - b`.
#[must_use]
pub fn subtract<T: SeriesElement>(a: &[T], b: &[T]) -> Vec<T> {
    a.iter().zip(b).map(|(&x, &y)| x - y).collect()
}

/// Median price `(high + low) / 2`.
#[must_use]
pub fn hl2<T: SeriesElement>(high: &[T], low: &[T]) -> Vec<T> {
    let two = T::two();
    high.iter().zip(low).map(|(&h, &l)| (h + l) / two).collect()
}

/// Typical price `(high + low + close) / 3`.
#[must_use]
pub fn hlc3<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Vec<T> {
    let three = T::constant(3.0);
    high.iter()
        .zip(low)
        .zip(close)
        .map(|((&h, &l), &c)| (h + l + c) / three)
        .collect()
}

/// Shifts a series forward by `offset` positions (`out[i] = data[i - offset]`).
///
/// Positions with nothing to shift into are NaN; nothing is read past the bounds.
#[must_use]
pub fn shift_forward<T: SeriesElement>(data: &[T], offset: usize) -> Vec<T> {
    let n = data.len();
    let mut out = nan_vec(n);
    if offset < n {
        out[offset..].copy_from_slice(&data[..n - offset]);
    }
    out
}

/// Shifts a series backward by `offset` positions (`out[i] = data[i + offset]`).
///
/// The trailing `offset` positions are NaN.
#[must_use]
pub fn shift_backward<T: SeriesElement>(data: &[T], offset: usize) -> Vec<T> {
    let n = data.len();
    let mut out = nan_vec(n);
    if offset < n {
        out[..n - offset].copy_from_slice(&data[offset..]);
    }
    out
}

/// Maximal index ranges over which every column is finite (non-NaN).
///
/// Stateful filters that cannot carry state across a gap run once per range.
#[must_use]
pub fn finite_runs<T: SeriesElement>(columns: &[&[T]]) -> Vec<Range<usize>> {
    let n = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..n {
        let finite = columns.iter().all(|c| !c[i].is_nan());
        match (finite, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..n);
    }
    runs
}
