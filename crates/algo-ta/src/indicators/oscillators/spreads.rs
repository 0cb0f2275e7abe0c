//! Moving-average spread oscillators: PPO, price oscillator, DPO and the
//! Awesome/Accelerator pair.

use crate::error::Result;
use crate::indicators::trend::envelopes::MaType;
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::traits::{validate_fast_slow, validate_period, validate_same_length, SeriesElement};
use crate::utils::{hl2, nan_vec, ratio_or, subtract};

/// Percentage Price Oscillator with signal and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct PpoOutput<T> {
    /// `100 × (EMA_fast - EMA_slow) / EMA_slow`.
    pub ppo: Vec<T>,
    /// EMA of `ppo`.
    pub signal: Vec<T>,
    /// `ppo - signal`.
    pub histogram: Vec<T>,
}

fn percent_spread<T: SeriesElement>(fast: &[T], slow: &[T]) -> Vec<T> {
    fast.iter()
        .zip(slow)
        .map(|(&f, &s)| T::hundred() * ratio_or(f - s, s, T::zero()))
        .collect()
}

/// Computes the Percentage Price Oscillator.
///
/// A zero slow average yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or
/// `fast_period >= slow_period`.
pub fn ppo<T: SeriesElement>(
    data: &[T],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<PpoOutput<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    validate_period("signal_period", signal_period)?;
    let line = percent_spread(&ema(data, fast_period)?, &ema(data, slow_period)?);
    let signal = ema(&line, signal_period)?;
    let histogram = subtract(&line, &signal);
    Ok(PpoOutput {
        ppo: line,
        signal,
        histogram,
    })
}

/// Computes the price oscillator: the percentage spread of two averages of
/// the selected kind.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or
/// `fast_period >= slow_period`.
pub fn po<T: SeriesElement>(data: &[T], fast_period: usize, slow_period: usize, ma_type: MaType) -> Result<Vec<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    Ok(percent_spread(
        &ma_type.apply(data, fast_period)?,
        &ma_type.apply(data, slow_period)?,
    ))
}

/// Displacement used by DPO: `period / 2 + 1`.
#[inline]
#[must_use]
pub const fn dpo_displacement(period: usize) -> usize {
    period / 2 + 1
}

/// Computes the Detrended Price Oscillator.
///
/// Non-centered: `x - SMA[i - d]`. Centered: `x[i - d] - SMA`. Neither form
/// reads past the current bar.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn dpo<T: SeriesElement>(data: &[T], period: usize, centered: bool) -> Result<Vec<T>> {
    let average = sma(data, period)?;
    let shift = dpo_displacement(period);
    let mut out = nan_vec(data.len());
    for i in shift..data.len() {
        out[i] = if centered {
            data[i - shift] - average[i]
        } else {
            data[i] - average[i - shift]
        };
    }
    Ok(out)
}

/// Computes the Awesome Oscillator: `SMA(hl2, fast) - SMA(hl2, slow)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if a period is zero or `fast >= slow`,
/// or `Error::ShapeMismatch` on unequal role lengths.
pub fn awesome_oscillator<T: SeriesElement>(
    high: &[T],
    low: &[T],
    fast_period: usize,
    slow_period: usize,
) -> Result<Vec<T>> {
    validate_fast_slow("fast_period", fast_period, "slow_period", slow_period)?;
    validate_same_length(&[("high", high), ("low", low)])?;
    let mid = hl2(high, low);
    Ok(subtract(&sma(&mid, fast_period)?, &sma(&mid, slow_period)?))
}

/// Computes the Accelerator Oscillator: `AO(5, 34) - SMA(AO, period)`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn accelerator_oscillator<T: SeriesElement>(high: &[T], low: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let ao = awesome_oscillator(high, low, 5, 34)?;
    let average = sma(&ao, period)?;
    Ok(subtract(&ao, &average))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    fn ramp(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_ppo_constant_is_zero() {
        let out = ppo(&vec![20.0_f64; 60], 12, 26, 9).unwrap();
        assert_eq!(count_nan_prefix(&out.ppo), 25);
        assert_eq!(count_nan_prefix(&out.signal), 33);
        assert!(out.ppo[25..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_po_sma_known_value() {
        let data = ramp(10);
        let out = po(&data, 2, 4, MaType::Sma).unwrap();
        // sma2 at 3 = 3.5, sma4 = 2.5
        assert!(approx_eq(out[3], 40.0, 1e-12));
        assert_eq!(count_nan_prefix(&po(&data, 2, 4, MaType::Ema).unwrap()), 3);
    }

    #[test]
    fn test_dpo_forms() {
        let data = ramp(30);
        let plain = dpo(&data, 10, false).unwrap();
        let centered = dpo(&data, 10, true).unwrap();
        // displacement 6; value at i is i + 1, so sma10 at i is i - 3.5
        assert_eq!(count_nan_prefix(&plain), 9 + 6);
        assert!(approx_eq(plain[20], 21.0 - (14.0 - 3.5), 1e-12));
        assert_eq!(count_nan_prefix(&centered), 9);
        assert!(approx_eq(centered[20], 15.0 - (20.0 - 3.5), 1e-12));
    }

    #[test]
    fn test_awesome_and_accelerator() {
        let high: Vec<f64> = ramp(80).iter().map(|v| v + 1.0).collect();
        let low: Vec<f64> = ramp(80).iter().map(|v| v - 1.0).collect();
        let ao = awesome_oscillator(&high, &low, 5, 34).unwrap();
        assert_eq!(count_nan_prefix(&ao), 33);
        // linear trend: spread of window centers = (34 - 5) / 2
        assert!(approx_eq(ao[50], 14.5, 1e-9));
        let ac = accelerator_oscillator(&high, &low, 5).unwrap();
        assert_eq!(count_nan_prefix(&ac), 37);
        assert!(ac[50].abs() < 1e-9);
    }
}
