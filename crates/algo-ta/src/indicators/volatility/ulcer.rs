//! Ulcer Index: root-mean-square percentage drawdown from the trailing peak.
//!
//! # Algorithm
//!
//! The trailing peak comes from a monotonic deque and the mean of squared
//! drawdowns from a compensated rolling sum, so the whole kernel is O(n).
//! [`ulcer_index_naive`] recomputes both per window for equivalence testing.
//!
//! # Formula
//!
//! ```text
//! peak[i] = max(x[i-n+1..=i])
//! dd[i]   = 100 × (x[i] - peak[i]) / peak[i]          (0 when the peak is 0)
//! UI[i]   = sqrt(mean(dd[i-n+1..=i]²))
//! ```
//!
//! The first defined index is `2n - 2`.

use crate::error::Result;
use crate::kernels::rolling_extrema::rolling_max;
use crate::kernels::rolling_moments::RollingSum;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Lookback for the Ulcer Index: `2 × (length - 1)`.
#[inline]
#[must_use]
pub const fn ulcer_index_lookback(length: usize) -> usize {
    length.saturating_sub(1).saturating_mul(2)
}

fn squared_drawdown<T: SeriesElement>(x: T, peak: T) -> T {
    let dd = T::hundred() * ratio_or(x - peak, peak, T::zero());
    dd * dd
}

/// Computes the Ulcer Index in O(n).
///
/// Windows holding no drawdown at all report exactly 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn ulcer_index<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    let n = data.len();
    let len_t = T::from_usize(length)?;
    let peak = rolling_max(data, length)?;
    let dd_sq: Vec<T> = data
        .iter()
        .zip(&peak)
        .map(|(&x, &p)| squared_drawdown(x, p))
        .collect();

    let mut out = nan_vec(n);
    let mut acc = RollingSum::new();
    let mut nonzero = 0_usize;
    for i in 0..n {
        acc.push(dd_sq[i]);
        if dd_sq[i] != T::zero() {
            nonzero += 1;
        }
        if i >= length {
            let leaving = dd_sq[i - length];
            acc.pop(leaving);
            if leaving != T::zero() {
                nonzero -= 1;
            }
        }
        if i + 1 < length {
            continue;
        }
        let sum = acc.value();
        out[i] = if sum.is_nan() {
            sum
        } else if nonzero == 0 || sum < T::zero() {
            T::zero()
        } else {
            (sum / len_t).sqrt()
        };
    }
    Ok(out)
}

/// Window-by-window O(n·length) reference for [`ulcer_index`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero.
pub fn ulcer_index_naive<T: SeriesElement>(data: &[T], length: usize) -> Result<Vec<T>> {
    validate_period("length", length)?;
    let n = data.len();
    let mut dd_sq = nan_vec(n);
    for i in (length - 1)..n {
        let window = &data[i + 1 - length..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let peak = window.iter().copied().fold(T::neg_infinity(), T::max);
        dd_sq[i] = squared_drawdown(data[i], peak);
    }
    let mut out = nan_vec(n);
    let len_t = T::from_usize(length)?;
    for i in length.saturating_sub(1).saturating_mul(2)..n {
        let window = &dd_sq[i + 1 - length..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = (window.iter().copied().sum::<T>() / len_t).sqrt();
    }
    Ok(out)
}
