//! Cumulative volume-flow lines: OBV, PVT, NVI, PVI and the
//! Accumulation/Distribution line.
//!
//! All of these are running totals. A bar with a NaN input emits NaN and
//! leaves the running state untouched, so the line resumes at the next
//! finite bar.

use crate::error::Result;
use crate::traits::{validate_positive, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Running state shared by the close/volume accumulators.
#[derive(Debug, Clone, Copy)]
struct Accumulator<T> {
    total: T,
    prev_close: T,
    prev_volume: T,
}

/// Threads `step(state, close, volume)` through the series.
///
/// The first finite bar seeds `prev_close`/`prev_volume` and emits `initial`.
fn accumulate<T, F>(close: &[T], volume: &[T], initial: T, mut step: F) -> Result<Vec<T>>
where
    T: SeriesElement,
    F: FnMut(&Accumulator<T>, T, T) -> T,
{
    let n = validate_same_length(&[("close", close), ("volume", volume)])?;
    let mut out = nan_vec(n);
    let mut state: Option<Accumulator<T>> = None;
    for i in 0..n {
        let (c, v) = (close[i], volume[i]);
        if c.is_nan() || v.is_nan() {
            continue;
        }
        let total = match &state {
            Some(s) => step(s, c, v),
            None => initial,
        };
        out[i] = total;
        state = Some(Accumulator {
            total,
            prev_close: c,
            prev_volume: v,
        });
    }
    Ok(out)
}

/// Computes On-Balance Volume, starting from 0.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn obv<T: SeriesElement>(close: &[T], volume: &[T]) -> Result<Vec<T>> {
    accumulate(close, volume, T::zero(), |s, c, v| {
        if c > s.prev_close {
            s.total + v
        } else if c < s.prev_close {
            s.total - v
        } else {
            s.total
        }
    })
}

/// Computes the Price-Volume Trend, starting from 0.
///
/// A zero previous close contributes nothing.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn pvt<T: SeriesElement>(close: &[T], volume: &[T]) -> Result<Vec<T>> {
    accumulate(close, volume, T::zero(), |s, c, v| {
        s.total + v * ratio_or(c - s.prev_close, s.prev_close, T::zero())
    })
}

/// Computes the Negative Volume Index: the index only moves on bars whose
/// volume falls.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a non-positive `initial`, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn nvi<T: SeriesElement>(close: &[T], volume: &[T], initial: f64) -> Result<Vec<T>> {
    validate_positive("initial", initial)?;
    accumulate(close, volume, T::from_f64(initial)?, |s, c, v| {
        if v < s.prev_volume {
            s.total * (T::one() + ratio_or(c - s.prev_close, s.prev_close, T::zero()))
        } else {
            s.total
        }
    })
}

/// Computes the Positive Volume Index: the index only moves on bars whose
/// volume rises.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a non-positive `initial`, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn pvi<T: SeriesElement>(close: &[T], volume: &[T], initial: f64) -> Result<Vec<T>> {
    validate_positive("initial", initial)?;
    accumulate(close, volume, T::from_f64(initial)?, |s, c, v| {
        if v > s.prev_volume {
            s.total * (T::one() + ratio_or(c - s.prev_close, s.prev_close, T::zero()))
        } else {
            s.total
        }
    })
}

/// Close location value weighted by volume:
/// `((close - low) - (high - close)) / (high - low) × volume`, 0 on a flat bar.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn money_flow_volume<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T]) -> Result<Vec<T>> {
    validate_same_length(&[("high", high), ("low", low), ("close", close), ("volume", volume)])?;
    Ok((0..high.len())
        .map(|i| {
            let (h, l, c) = (high[i], low[i], close[i]);
            ratio_or((c - l) - (h - c), h - l, T::zero()) * volume[i]
        })
        .collect())
}

/// Computes the Accumulation/Distribution line.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn adl<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T]) -> Result<Vec<T>> {
    let flow = money_flow_volume(high, low, close, volume)?;
    let mut total = T::zero();
    Ok(flow
        .into_iter()
        .map(|f| {
            if f.is_nan() {
                return f;
            }
            total += f;
            total
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::utils::approx_eq;

    #[test]
    fn test_obv_sequence() {
        let close = vec![10.0_f64, 11.0, 10.5, 10.5, 12.0];
        let volume = vec![100.0_f64, 200.0, 150.0, 50.0, 300.0];
        assert_eq!(obv(&close, &volume).unwrap(), vec![0.0, 200.0, 50.0, 50.0, 350.0]);
    }

    #[test]
    fn test_obv_skips_nan_bar() {
        let close = vec![10.0_f64, f64::NAN, 11.0];
        let volume = vec![100.0_f64, 100.0, 40.0];
        let out = obv(&close, &volume).unwrap();
        assert!(out[1].is_nan());
        assert_eq!(out[2], 40.0);
    }

    #[test]
    fn test_pvt() {
        let close = vec![100.0_f64, 110.0, 99.0];
        let volume = vec![1.0_f64, 50.0, 100.0];
        let out = pvt(&close, &volume).unwrap();
        assert!(approx_eq(out[1], 5.0, 1e-12));
        assert!(approx_eq(out[2], 5.0 - 10.0, 1e-12));
    }

    #[test]
    fn test_nvi_pvi_move_on_their_volume_side() {
        let close = vec![100.0_f64, 110.0, 121.0];
        let volume = vec![100.0_f64, 50.0, 80.0];
        let n = nvi(&close, &volume, 1000.0).unwrap();
        let p = pvi(&close, &volume, 100.0).unwrap();
        assert!(approx_eq(n[1], 1100.0, 1e-9));
        assert!(approx_eq(n[2], 1100.0, 1e-9));
        assert!(approx_eq(p[1], 100.0, 1e-9));
        assert!(approx_eq(p[2], 110.0, 1e-9));
        assert!(matches!(nvi(&close, &volume, 0.0), Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_adl() {
        let high = vec![10.0_f64, 12.0, 5.0];
        let low = vec![8.0_f64, 10.0, 5.0];
        let close = vec![10.0_f64, 10.0, 5.0];
        let volume = vec![100.0_f64, 50.0, 70.0];
        // clv = +1, -1, flat bar 0
        assert_eq!(adl(&high, &low, &close, &volume).unwrap(), vec![100.0, 50.0, 50.0]);
    }
}
