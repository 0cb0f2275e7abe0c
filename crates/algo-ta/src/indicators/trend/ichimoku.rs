//! Displaced composites: the Ichimoku cloud and the Williams Alligator.
//!
//! Both build primitive lines and then shift legs by a `displacement`:
//!
//! ```text
//! conversion = (HH(9) + LL(9)) / 2
//! base       = (HH(26) + LL(26)) / 2
//! leading_a  = ((conversion + base) / 2) shifted forward by displacement
//! leading_b  = ((HH(52) + LL(52)) / 2) shifted forward by displacement
//! lagging    = close shifted backward by displacement
//! ```
//!
//! Output keeps the input length. A forward shift leaves the first
//! `displacement` positions NaN and drops the last `displacement` unshifted
//! values; a backward shift leaves the tail NaN. Nothing is read out of bounds.

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema_wilder;
use crate::kernels::rolling_extrema::{rolling_max, rolling_min};
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{shift_backward, shift_forward};

/// The five Ichimoku lines.
#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuOutput<T> {
    /// Tenkan-sen.
    pub conversion: Vec<T>,
    /// Kijun-sen.
    pub base: Vec<T>,
    /// Senkou span A (displaced forward).
    pub leading_a: Vec<T>,
    /// Senkou span B (displaced forward).
    pub leading_b: Vec<T>,
    /// Chikou span (displaced backward).
    pub lagging: Vec<T>,
}

/// The three Alligator lines.
#[derive(Debug, Clone, PartialEq)]
pub struct AlligatorOutput<T> {
    /// Slowest line.
    pub jaw: Vec<T>,
    /// Middle line.
    pub teeth: Vec<T>,
    /// Fastest line.
    pub lips: Vec<T>,
}

fn midline<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<Vec<T>> {
    let hh = rolling_max(high, period)?;
    let ll = rolling_min(low, period)?;
    Ok(hh.iter().zip(&ll).map(|(&h, &l)| (h + l) / T::two()).collect())
}

/// Computes the Ichimoku cloud.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
///
/// # Example
///
/// ```
/// use algo_ta::indicators::trend::ichimoku;
///
/// let high: Vec<f64> = (0..20).map(|i| 11.0 + i as f64).collect();
/// let low: Vec<f64> = (0..20).map(|i| 9.0 + i as f64).collect();
/// let close: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
/// let out = ichimoku(&high, &low, &close, 2, 3, 4, 5).unwrap();
/// assert!(out.leading_a[..5].iter().all(|v| v.is_nan()));
/// assert_eq!(out.lagging[0], close[5]);
/// ```
pub fn ichimoku<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    conversion_period: usize,
    base_period: usize,
    span_b_period: usize,
    displacement: usize,
) -> Result<IchimokuOutput<T>> {
    validate_period("conversion_period", conversion_period)?;
    validate_period("base_period", base_period)?;
    validate_period("span_b_period", span_b_period)?;
    validate_same_length(&[("high", high), ("low", low), ("close", close)])?;

    let conversion = midline(high, low, conversion_period)?;
    let base = midline(high, low, base_period)?;
    let span_a: Vec<T> = conversion
        .iter()
        .zip(&base)
        .map(|(&c, &b)| (c + b) / T::two())
        .collect();
    let span_b = midline(high, low, span_b_period)?;

    Ok(IchimokuOutput {
        conversion,
        base,
        leading_a: shift_forward(&span_a, displacement),
        leading_b: shift_forward(&span_b, displacement),
        lagging: shift_backward(close, displacement),
    })
}

/// Computes the Williams Alligator: three Wilder-smoothed lines shifted forward.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero.
#[allow(clippy::too_many_arguments)]
pub fn alligator<T: SeriesElement>(
    data: &[T],
    jaw_period: usize,
    jaw_shift: usize,
    teeth_period: usize,
    teeth_shift: usize,
    lips_period: usize,
    lips_shift: usize,
) -> Result<AlligatorOutput<T>> {
    validate_period("jaw_period", jaw_period)?;
    validate_period("teeth_period", teeth_period)?;
    validate_period("lips_period", lips_period)?;
    Ok(AlligatorOutput {
        jaw: shift_forward(&ema_wilder(data, jaw_period)?, jaw_shift),
        teeth: shift_forward(&ema_wilder(data, teeth_period)?, teeth_shift),
        lips: shift_forward(&ema_wilder(data, lips_period)?, lips_shift),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::count_nan_prefix;

    fn hlc(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 50.0 + ((i as f64) * 0.5).sin() * 3.0).collect();
        let high = close.iter().map(|c| c + 1.0).collect();
        let low = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn test_displacement_five_over_twenty_samples() {
        let (h, l, c) = hlc(20);
        let out = ichimoku(&h, &l, &c, 2, 3, 4, 5).unwrap();
        let unshifted = midline(&h, &l, 4).unwrap();
        assert_eq!(out.leading_b.len(), 20);
        assert!(out.leading_b[..5].iter().all(|v| v.is_nan()));
        for i in 5..20 {
            let expected = unshifted[i - 5];
            assert!(expected.is_nan() && out.leading_b[i].is_nan() || expected == out.leading_b[i]);
        }
        // the last five unshifted values never appear
        assert_eq!(out.leading_b[19], unshifted[14]);
        assert!(out.lagging[15..].iter().all(|v| v.is_nan()));
        assert_eq!(out.lagging[0], c[5]);
    }

    #[test]
    fn test_default_periods_lookbacks() {
        let (h, l, c) = hlc(120);
        let out = ichimoku(&h, &l, &c, 9, 26, 52, 26).unwrap();
        assert_eq!(count_nan_prefix(&out.conversion), 8);
        assert_eq!(count_nan_prefix(&out.base), 25);
        assert_eq!(count_nan_prefix(&out.leading_a), 25 + 26);
        assert_eq!(count_nan_prefix(&out.leading_b), 51 + 26);
    }

    #[test]
    fn test_zero_displacement_is_unshifted() {
        let (h, l, c) = hlc(30);
        let out = ichimoku(&h, &l, &c, 3, 5, 7, 0).unwrap();
        assert_eq!(out.lagging, c);
    }

    #[test]
    fn test_alligator_shifts() {
        let data: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let out = alligator(&data, 13, 8, 8, 5, 5, 3).unwrap();
        assert_eq!(count_nan_prefix(&out.jaw), 12 + 8);
        assert_eq!(count_nan_prefix(&out.teeth), 7 + 5);
        assert_eq!(count_nan_prefix(&out.lips), 4 + 3);
    }
}
