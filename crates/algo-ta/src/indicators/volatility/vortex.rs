//! Vortex Indicator (VI+ / VI-).
//!
//! # Formula
//!
//! ```text
//! VM+[i] = |high[i] - low[i-1]|
//! VM-[i] = |low[i] - high[i-1]|
//! VI+    = Σ VM+(n) / Σ TR(n)
//! VI-    = Σ VM-(n) / Σ TR(n)
//! ```
//!
//! The three window sums are maintained incrementally; [`vortex_naive`]
//! re-sums every window. A zero true-range sum yields 0 for both lines.
//! The first defined index is `n`.

use crate::error::Result;
use crate::kernels::rolling_moments::RollingSum;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Positive and negative vortex lines.
#[derive(Debug, Clone, PartialEq)]
pub struct VortexOutput<T> {
    /// VI+.
    pub plus: Vec<T>,
    /// VI-.
    pub minus: Vec<T>,
}

/// Lookback for the Vortex Indicator: `period`.
#[inline]
#[must_use]
pub const fn vortex_lookback(period: usize) -> usize {
    period
}

struct Movements<T> {
    plus: Vec<T>,
    minus: Vec<T>,
    tr: Vec<T>,
}

fn movements<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Movements<T>> {
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let mut m = Movements {
        plus: nan_vec(n),
        minus: nan_vec(n),
        tr: nan_vec(n),
    };
    for i in 1..n {
        m.plus[i] = (high[i] - low[i - 1]).abs();
        m.minus[i] = (low[i] - high[i - 1]).abs();
        let pc = close[i - 1];
        m.tr[i] = (high[i] - low[i])
            .max((high[i] - pc).abs())
            .max((low[i] - pc).abs());
    }
    Ok(m)
}

/// Computes the Vortex Indicator in O(n).
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn vortex<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
) -> Result<VortexOutput<T>> {
    validate_period("period", period)?;
    let m = movements(high, low, close)?;
    let n = m.tr.len();
    let mut out = VortexOutput {
        plus: nan_vec(n),
        minus: nan_vec(n),
    };
    let (mut sp, mut sm, mut st) = (RollingSum::new(), RollingSum::new(), RollingSum::new());
    for i in 1..n {
        sp.push(m.plus[i]);
        sm.push(m.minus[i]);
        st.push(m.tr[i]);
        if i > period {
            let j = i - period;
            sp.pop(m.plus[j]);
            sm.pop(m.minus[j]);
            st.pop(m.tr[j]);
        }
        if i >= period {
            let tr = st.value();
            out.plus[i] = ratio_or(sp.value(), tr, T::zero());
            out.minus[i] = ratio_or(sm.value(), tr, T::zero());
        }
    }
    Ok(out)
}

/// Window-by-window O(n·period) reference for [`vortex`].
///
/// # Errors
///
/// Same as [`vortex`].
pub fn vortex_naive<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
) -> Result<VortexOutput<T>> {
    validate_period("period", period)?;
    let m = movements(high, low, close)?;
    let n = m.tr.len();
    let mut out = VortexOutput {
        plus: nan_vec(n),
        minus: nan_vec(n),
    };
    for i in period..n {
        let range = i + 1 - period..=i;
        let tr: T = m.tr[range.clone()].iter().copied().sum();
        out.plus[i] = ratio_or(m.plus[range.clone()].iter().copied().sum(), tr, T::zero());
        out.minus[i] = ratio_or(m.minus[range].iter().copied().sum(), tr, T::zero());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n)
            .map(|i| 50.0 + ((i as f64) * 0.31).sin() * 4.0 + ((i * 5) % 3) as f64)
            .collect();
        let high = close.iter().enumerate().map(|(i, c)| c + 0.5 + (i % 4) as f64 * 0.1).collect();
        let low = close.iter().enumerate().map(|(i, c)| c - 0.5 - (i % 3) as f64 * 0.1).collect();
        (high, low, close)
    }

    #[test]
    fn test_warmup() {
        let (h, l, c) = series(50);
        let out = vortex(&h, &l, &c, 14).unwrap();
        assert_eq!(count_nan_prefix(&out.plus), vortex_lookback(14));
        assert_eq!(count_nan_prefix(&out.minus), 14);
    }

    #[test]
    fn test_hand_computed() {
        let h = vec![10.0_f64, 12.0, 13.0];
        let l = vec![9.0_f64, 10.0, 11.0];
        let c = vec![9.5_f64, 11.0, 12.0];
        let out = vortex(&h, &l, &c, 2).unwrap();
        // VM+ = [_, 3, 3], VM- = [_, 0, 1], TR = [_, 2.5, 2]
        assert!(approx_eq(out.plus[2], 6.0 / 4.5, 1e-12));
        assert!(approx_eq(out.minus[2], 1.0 / 4.5, 1e-12));
    }

    #[test]
    fn test_flat_bars_sentinel() {
        let flat = vec![5.0_f64; 10];
        let out = vortex(&flat, &flat, &flat, 3).unwrap();
        assert!(out.plus[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_matches_naive() {
        let (h, l, c) = series(500);
        for period in [1, 2, 14, 40] {
            let fast = vortex(&h, &l, &c, period).unwrap();
            let slow = vortex_naive(&h, &l, &c, period).unwrap();
            for i in 0..h.len() {
                assert!(approx_eq(fast.plus[i], slow.plus[i], 1e-9));
                assert!(approx_eq(fast.minus[i], slow.minus[i], 1e-9));
            }
        }
    }
}
