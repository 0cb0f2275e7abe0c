//! Elder Ray Index: bull and bear power around an EMA of the close.

use crate::error::Result;
use crate::indicators::trend::moving_averages::ema;
use crate::traits::{validate_same_length, SeriesElement};
use crate::utils::subtract;

/// Bull and bear power.
#[derive(Debug, Clone, PartialEq)]
pub struct ElderRayOutput<T> {
    /// `high - EMA(close, period)`.
    pub bull_power: Vec<T>,
    /// `low - EMA(close, period)`.
    pub bear_power: Vec<T>,
}

/// Computes the Elder Ray Index.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn elderray<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<ElderRayOutput<T>> {
    validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let average = ema(close, period)?;
    Ok(ElderRayOutput {
        bull_power: subtract(high, &average),
        bear_power: subtract(low, &average),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::count_nan_prefix;

    #[test]
    fn test_elderray_constant_close() {
        let close = vec![10.0_f64; 20];
        let high = vec![12.0_f64; 20];
        let low = vec![9.0_f64; 20];
        let out = elderray(&high, &low, &close, 13).unwrap();
        assert_eq!(count_nan_prefix(&out.bull_power), 12);
        assert_eq!(out.bull_power[15], 2.0);
        assert_eq!(out.bear_power[15], -1.0);
    }
}
