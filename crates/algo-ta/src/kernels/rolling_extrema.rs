//! Rolling extrema using a monotonic deque for O(n) rolling max/min.
//!
//! # Algorithm
//!
//! The deque holds `(index, value)` pairs whose values are monotonically
//! ordered: decreasing for a rolling maximum, increasing for a rolling minimum.
//! The front is always the current extremum. A new value evicts every back
//! entry it dominates (ties included, so the most recent extreme wins), and
//! entries older than the window are dropped from the front.
//!
//! # Complexity
//!
//! - Time: O(n), amortized O(1) per element
//! - Space: O(k) for the deque, where k is the period
//!
//! # NaN policy
//!
//! A window containing NaN yields NaN. The deque itself never stores NaN, so
//! the output recovers as soon as the NaN leaves the window.
//!
//! # Example
//!
//! ```
//! use algo_ta::kernels::rolling_extrema::{rolling_max, rolling_min};
//!
//! let data = vec![3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//!
//! let max = rolling_max(&data, 3).unwrap();
//! assert_eq!(max[2], 4.0); // max of [3, 1, 4]
//! assert_eq!(max[5], 9.0); // max of [1, 5, 9]
//!
//! let min = rolling_min(&data, 3).unwrap();
//! assert_eq!(min[2], 1.0); // min of [3, 1, 4]
//! ```

use std::collections::VecDeque;

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::nan_vec;

/// Which extremum a [`MonotonicDeque`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    /// Rolling maximum.
    Max,
    /// Rolling minimum.
    Min,
}

impl Extremum {
    #[inline]
    fn dominates<T: SeriesElement>(self, candidate: T, incumbent: T) -> bool {
        match self {
            Self::Max => candidate >= incumbent,
            Self::Min => candidate <= incumbent,
        }
    }
}

/// A monotonic deque for tracking a rolling extremum.
#[derive(Debug, Clone)]
pub struct MonotonicDeque<T> {
    deque: VecDeque<(usize, T)>,
    period: usize,
    kind: Extremum,
}

impl<T: SeriesElement> MonotonicDeque<T> {
    /// Creates an empty deque for a window of `period` samples.
    ///
    /// Storage grows with the candidates actually held, never with `period`.
    #[must_use]
    pub const fn new(period: usize, kind: Extremum) -> Self {
        Self {
            deque: VecDeque::new(),
            period,
            kind,
        }
    }

    /// Returns the window size.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Returns true if no candidate is held.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    /// Clears all candidates.
    #[inline]
    pub fn clear(&mut self) {
        self.deque.clear();
    }

    /// Pushes the value observed at `index`, then expires stale candidates.
    ///
    /// NaN values are not stored; callers track NaN windows separately.
    #[inline]
    pub fn push(&mut self, index: usize, value: T) {
        if !value.is_nan() {
            while let Some(&(_, back)) = self.deque.back() {
                if self.kind.dominates(value, back) {
                    self.deque.pop_back();
                } else {
                    break;
                }
            }
            self.deque.push_back((index, value));
        }
        while let Some(&(front, _)) = self.deque.front() {
            if index.saturating_sub(front) >= self.period {
                self.deque.pop_front();
            } else {
                break;
            }
        }
    }

    /// Returns the `(index, value)` of the current extremum.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<(usize, T)> {
        self.deque.front().copied()
    }

    /// Returns the current extremum, or NaN when empty.
    #[inline]
    #[must_use]
    pub fn extremum(&self) -> T {
        self.front().map_or_else(T::nan, |(_, v)| v)
    }
}

/// Rolling maximum and minimum computed in one pass.
#[derive(Debug, Clone)]
pub struct RollingExtremaOutput<T> {
    /// Rolling maximum values.
    pub max: Vec<T>,
    /// Rolling minimum values.
    pub min: Vec<T>,
}

/// Lookback of a rolling extremum: `period - 1` leading NaN values.
#[inline]
#[must_use]
pub const fn rolling_extrema_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

fn rolling_extremum<T: SeriesElement>(data: &[T], period: usize, kind: Extremum) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let mut out = nan_vec(n);
    if period > n {
        return Ok(out);
    }
    let mut deque = MonotonicDeque::new(period, kind);
    let mut last_nan: Option<usize> = None;
    for (i, &value) in data.iter().enumerate() {
        if value.is_nan() {
            last_nan = Some(i);
        }
        deque.push(i, value);
        if i + 1 >= period && last_nan.map_or(true, |j| i - j >= period) {
            out[i] = deque.extremum();
        }
    }
    Ok(out)
}

/// Computes the trailing `period`-sample maximum.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_max<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_extremum(data, period, Extremum::Max)
}

/// Computes the trailing `period`-sample minimum.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_min<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_extremum(data, period, Extremum::Min)
}

/// Computes the rolling maximum of `high` and minimum of `low` together.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_extrema<T: SeriesElement>(
    high: &[T],
    low: &[T],
    period: usize,
) -> Result<RollingExtremaOutput<T>> {
    Ok(RollingExtremaOutput {
        max: rolling_max(high, period)?,
        min: rolling_min(low, period)?,
    })
}

fn bars_since_extremum<T: SeriesElement>(
    data: &[T],
    period: usize,
    kind: Extremum,
) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let mut out = nan_vec(n);
    if period > n {
        return Ok(out);
    }
    let mut deque = MonotonicDeque::new(period, kind);
    let mut last_nan: Option<usize> = None;
    for (i, &value) in data.iter().enumerate() {
        if value.is_nan() {
            last_nan = Some(i);
        }
        deque.push(i, value);
        if i + 1 >= period && last_nan.map_or(true, |j| i - j >= period) {
            if let Some((idx, _)) = deque.front() {
                out[i] = T::from_usize(i - idx)?;
            }
        }
    }
    Ok(out)
}

/// Bars elapsed since the highest value of the trailing window (0 = current bar).
///
/// Ties resolve to the most recent occurrence.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn bars_since_max<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    bars_since_extremum(data, period, Extremum::Max)
}

/// Bars elapsed since the lowest value of the trailing window (0 = current bar).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn bars_since_min<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    bars_since_extremum(data, period, Extremum::Min)
}

fn naive_window_scan<T: SeriesElement>(
    data: &[T],
    period: usize,
    kind: Extremum,
    position: bool,
) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let mut out = nan_vec(n);
    for i in (period.saturating_sub(1))..n {
        let window = &data[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mut best = 0;
        for (j, &v) in window.iter().enumerate() {
            if kind.dominates(v, window[best]) {
                best = j;
            }
        }
        out[i] = if position {
            T::from_usize(period - 1 - best)?
        } else {
            window[best]
        };
    }
    Ok(out)
}

/// O(n·k) reference for [`rolling_max`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_max_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window_scan(data, period, Extremum::Max, false)
}

/// O(n·k) reference for [`rolling_min`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn rolling_min_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window_scan(data, period, Extremum::Min, false)
}

/// O(n·k) reference for [`bars_since_max`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn bars_since_max_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window_scan(data, period, Extremum::Max, true)
}

/// O(n·k) reference for [`bars_since_min`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn bars_since_min_naive<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    naive_window_scan(data, period, Extremum::Min, true)
}
