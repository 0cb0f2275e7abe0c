//! Incremental rolling sum and sum-of-squares accumulators.
//!
//! # Algorithm
//!
//! Each step adds the value entering the trailing window and subtracts the
//! value leaving it. Two measures keep long runs from drifting:
//!
//! - Neumaier compensated summation on every accumulator, so the running error
//!   does not grow with the series length.
//! - Shifted data for second moments: squares are taken of `x - K` where `K`
//!   is a recent window value, avoiding the catastrophic cancellation of
//!   `E[x²] - E[x]²` on large price levels. The free functions rebase `K` and
//!   recompute from the live window every [`REBASE_INTERVAL`] steps.
//!
//! NaN handling: the accumulators count NaN values in the window and report
//! NaN while any is present; sums recover once the NaN leaves.
//!
//! # Example
//!
//! ```
//! use algo_ta::kernels::rolling_moments::{rolling_mean, rolling_variance};
//!
//! let data = vec![2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! let mean = rolling_mean(&data, 8).unwrap();
//! let var = rolling_variance(&data, 8).unwrap();
//! assert!((mean[7] - 5.0).abs() < 1e-12);
//! assert!((var[7] - 4.0).abs() < 1e-12);
//! ```

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::nan_vec;

/// Steps between full recomputations of a shifted moment accumulator.
pub const REBASE_INTERVAL: usize = 4096;

/// A Neumaier-compensated running sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum<T> {
    sum: T,
    compensation: T,
}

impl<T: SeriesElement> CompensatedSum<T> {
    /// Creates a zero sum.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sum: T::zero(),
            compensation: T::zero(),
        }
    }

    /// Adds `value` with error compensation.
    #[inline]
    pub fn add(&mut self, value: T) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Subtracts `value` with error compensation.
    #[inline]
    pub fn sub(&mut self, value: T) {
        self.add(-value);
    }

    /// Returns the compensated total.
    #[inline]
    #[must_use]
    pub fn value(&self) -> T {
        self.sum + self.compensation
    }
}

/// A rolling sum over a trailing window with NaN tracking.
#[derive(Debug, Clone, Default)]
pub struct RollingSum<T> {
    total: CompensatedSum<T>,
    nan_count: usize,
}

impl<T: SeriesElement> RollingSum<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: CompensatedSum::new(),
            nan_count: 0,
        }
    }

    /// Adds a value entering the window.
    #[inline]
    pub fn push(&mut self, value: T) {
        if value.is_nan() {
            self.nan_count += 1;
        } else {
            self.total.add(value);
        }
    }

    /// Removes a value leaving the window.
    #[inline]
    pub fn pop(&mut self, value: T) {
        if value.is_nan() {
            self.nan_count = self.nan_count.saturating_sub(1);
        } else {
            self.total.sub(value);
        }
    }

    /// Current window sum, NaN while the window holds a NaN.
    #[inline]
    #[must_use]
    pub fn value(&self) -> T {
        if self.nan_count > 0 {
            T::nan()
        } else {
            self.total.value()
        }
    }
}

/// Rolling first and second moments over shifted data.
#[derive(Debug, Clone)]
pub struct RollingMoments<T> {
    shift: Option<T>,
    sum: CompensatedSum<T>,
    sum_sq: CompensatedSum<T>,
    count: usize,
    nan_count: usize,
}

impl<T: SeriesElement> Default for RollingMoments<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> RollingMoments<T> {
    /// Creates an empty accumulator; the shift is taken from the first finite push.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shift: None,
            sum: CompensatedSum::new(),
            sum_sq: CompensatedSum::new(),
            count: 0,
            nan_count: 0,
        }
    }

    /// Adds a value entering the window.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.count += 1;
        if value.is_nan() {
            self.nan_count += 1;
            return;
        }
        let shift = *self.shift.get_or_insert(value);
        let d = value - shift;
        self.sum.add(d);
        self.sum_sq.add(d * d);
    }

    /// Removes a value leaving the window.
    #[inline]
    pub fn pop(&mut self, value: T) {
        self.count = self.count.saturating_sub(1);
        if value.is_nan() {
            self.nan_count = self.nan_count.saturating_sub(1);
            return;
        }
        if let Some(shift) = self.shift {
            let d = value - shift;
            self.sum.sub(d);
            self.sum_sq.sub(d * d);
        }
    }

    /// Discards the accumulated state and refills it from `window`.
    pub fn rebase(&mut self, window: &[T]) {
        *self = Self::new();
        self.shift = window.iter().rev().copied().find(|v| !v.is_nan());
        for &value in window {
            self.push(value);
        }
    }

    /// Number of samples in the window, NaN included.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Window mean, NaN while empty or holding a NaN.
    #[must_use]
    pub fn mean(&self) -> T {
        if self.count == 0 || self.nan_count > 0 {
            return T::nan();
        }
        let n = T::from_usize(self.count).unwrap_or_else(|_| T::nan());
        self.shift.unwrap_or_else(T::zero) + self.sum.value() / n
    }

    /// Population variance, clamped at zero.
    #[must_use]
    pub fn variance(&self) -> T {
        if self.count == 0 || self.nan_count > 0 {
            return T::nan();
        }
        let n = T::from_usize(self.count).unwrap_or_else(|_| T::nan());
        let s = self.sum.value();
        let var = (self.sum_sq.value() - s * s / n) / n;
        var.max(T::zero())
    }

    /// Population standard deviation.
    #[must_use]
    pub fn stddev(&self) -> T {
        self.variance().sqrt()
    }
}

/// Lookback of every fixed window in this module: `period - 1` leading NaNs.
#[inline]
#[must_use]
pub const fn rolling_window_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes the trailing `period`-sample sum in O(n).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_sum<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(data.len());
    let mut acc = RollingSum::new();
    for (i, &value) in data.iter().enumerate() {
        acc.push(value);
        if i >= period {
            acc.pop(data[i - period]);
        }
        if i + 1 >= period {
            out[i] = acc.value();
        }
    }
    Ok(out)
}

/// Computes the trailing `period`-sample arithmetic mean in O(n).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_mean<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let p = T::from_usize(period.max(1))?;
    let mut out = rolling_sum(data, period)?;
    for v in &mut out {
        *v /= p;
    }
    Ok(out)
}

fn rolling_moment_series<T: SeriesElement>(
    data: &[T],
    period: usize,
    read: impl Fn(&RollingMoments<T>) -> T,
) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(data.len());
    let mut acc = RollingMoments::new();
    for (i, &value) in data.iter().enumerate() {
        acc.push(value);
        if i >= period {
            acc.pop(data[i - period]);
        }
        if i + 1 >= period {
            if i % REBASE_INTERVAL == 0 {
                acc.rebase(&data[i + 1 - period..=i]);
            }
            out[i] = read(&acc);
        }
    }
    Ok(out)
}

/// Computes the trailing population variance in O(n).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_variance<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment_series(data, period, RollingMoments::variance)
}

/// Computes the trailing population standard deviation in O(n).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_stddev<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment_series(data, period, RollingMoments::stddev)
}

fn naive_window<T: SeriesElement>(
    data: &[T],
    period: usize,
    reduce: impl Fn(&[T]) -> Result<T>,
) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(data.len());
    for i in period.saturating_sub(1)..data.len() {
        out[i] = reduce(&data[i + 1 - period..=i])?;
    }
    Ok(out)
}

/// O(n·k) reference for [`rolling_sum`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_sum_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window(data, period, |w| Ok(w.iter().copied().sum()))
}

/// O(n·k) reference for [`rolling_variance`] (two-pass per window).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_variance_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window(data, period, |w| {
        let n = T::from_usize(w.len())?;
        let mean = w.iter().copied().sum::<T>() / n;
        Ok(w.iter().map(|&x| (x - mean) * (x - mean)).sum::<T>() / n)
    })
}
