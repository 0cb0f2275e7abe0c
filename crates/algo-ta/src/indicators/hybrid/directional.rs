//! Directional Movement: DMI and the Average Directional Index.
//!
//! # Algorithm
//!
//! Directional movement and true range are taken from bar 1 onward, each
//! smoothed with Wilder's RMA, so the DI lines start at index `period` and
//! ADX at `2·period - 1`.
//!
//! # Formula
//!
//! ```text
//! up   = high - high[1]        down = low[1] - low
//! +DM  = up   if up > down and up > 0,   else 0
//! -DM  = down if down > up and down > 0, else 0
//! +DI  = 100 × RMA(+DM, n) / RMA(TR, n)      (0 on zero range)
//! -DI  = 100 × RMA(-DM, n) / RMA(TR, n)
//! ADX  = 100 × RMA(|+DI - -DI| / S, n),  S = +DI + -DI, or 1 when S = 0
//! ```

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema_wilder;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Directional indicator lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DmiOutput<T> {
    /// Positive directional indicator.
    pub di_plus: Vec<T>,
    /// Negative directional indicator.
    pub di_minus: Vec<T>,
}

/// Directional indicator lines plus ADX.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput<T> {
    /// Positive directional indicator.
    pub di_plus: Vec<T>,
    /// Negative directional indicator.
    pub di_minus: Vec<T>,
    /// Average Directional Index.
    pub adx: Vec<T>,
}

/// Index of the first defined ADX value.
#[inline]
#[must_use]
pub const fn adx_lookback(period: usize) -> usize {
    period.saturating_mul(2).saturating_sub(1)
}

/// Computes the +DI/-DI pair.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn dmi<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<DmiOutput<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let mut plus_dm = nan_vec(n);
    let mut minus_dm = nan_vec(n);
    let mut tr = nan_vec(n);
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        if up.is_nan() || down.is_nan() {
            continue;
        }
        plus_dm[i] = if up > down && up > T::zero() { up } else { T::zero() };
        minus_dm[i] = if down > up && down > T::zero() { down } else { T::zero() };
        let prev = close[i - 1];
        tr[i] = (high[i] - low[i])
            .max((high[i] - prev).abs())
            .max((low[i] - prev).abs());
        if prev.is_nan() {
            tr[i] = prev;
        }
    }
    let smoothed_tr = ema_wilder(&tr, period)?;
    let line = |dm: &[T]| -> Result<Vec<T>> {
        Ok(ema_wilder(dm, period)?
            .iter()
            .zip(&smoothed_tr)
            .map(|(&d, &r)| T::hundred() * ratio_or(d, r, T::zero()))
            .collect())
    };
    Ok(DmiOutput {
        di_plus: line(&plus_dm)?,
        di_minus: line(&minus_dm)?,
    })
}

/// Computes ADX together with its DI lines.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn adx<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<AdxOutput<T>> {
    let DmiOutput { di_plus, di_minus } = dmi(high, low, close, period)?;
    let spread: Vec<T> = di_plus
        .iter()
        .zip(&di_minus)
        .map(|(&p, &m)| {
            let sum = p + m;
            let sum = if sum == T::zero() { T::one() } else { sum };
            (p - m).abs() / sum
        })
        .collect();
    let adx = ema_wilder(&spread, period)?
        .into_iter()
        .map(|v| v * T::hundred())
        .collect();
    Ok(AdxOutput { di_plus, di_minus, adx })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn uptrend(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let high = close.iter().map(|c| c + 0.5).collect();
        let low = close.iter().map(|c| c - 0.5).collect();
        (high, low, close)
    }

    #[test]
    fn test_dmi_pure_uptrend() {
        let (h, l, c) = uptrend(40);
        let out = dmi(&h, &l, &c, 14).unwrap();
        assert_eq!(count_nan_prefix(&out.di_plus), 14);
        // +DM = 1, TR = 1.5 on every bar
        assert!(out.di_plus[14..].iter().all(|&v| approx_eq(v, 100.0 / 1.5, 1e-9)));
        assert!(out.di_minus[14..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_adx_pure_uptrend_is_100() {
        let (h, l, c) = uptrend(60);
        let out = adx(&h, &l, &c, 14).unwrap();
        assert_eq!(count_nan_prefix(&out.adx), adx_lookback(14));
        assert!(out.adx[27..].iter().all(|&v| approx_eq(v, 100.0, 1e-9)));
    }

    #[test]
    fn test_adx_flat_market() {
        let flat = vec![10.0_f64; 40];
        let out = adx(&flat, &flat, &flat, 5).unwrap();
        assert!(out.di_plus[5..].iter().all(|&v| v == 0.0));
        assert!(out.adx[9..].iter().all(|&v| v == 0.0));
    }
}
