//! Rate-of-change oscillators: ROC, CMO, TRIX, Coppock curve and KST.
//!
//! # Formula
//!
//! ```text
//! ROC     = 100 × (x - x[n]) / x[n]                       (0 when x[n] = 0)
//! CMO     = 100 × (ΣU - ΣD) / (ΣU + ΣD)                    (0 when flat)
//! TRIX    = ROC(EMA(EMA(EMA(x, n), n), n), 1)
//! Coppock = WMA(ROC(x, long) + ROC(x, short), wma_length)
//! KST     = Σ k × SMA(ROC(x, r_k), s_k),  k = 1..4
//! ```

use crate::error::Result;
use crate::indicators::trend::moving_averages::{ema, sma, wma};
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_period, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Lookback for ROC: `period`.
#[inline]
#[must_use]
pub const fn roc_lookback(period: usize) -> usize {
    period
}

/// Computes the percentage Rate of Change.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn roc<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let mut out = nan_vec(data.len());
    for i in period..data.len() {
        let base = data[i - period];
        out[i] = T::hundred() * ratio_or(data[i] - base, base, T::zero());
    }
    Ok(out)
}

/// Computes the Chande Momentum Oscillator.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn cmo<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = data.len();
    let mut up = nan_vec(n);
    let mut down = nan_vec(n);
    for i in 1..n {
        let change = data[i] - data[i - 1];
        if change.is_nan() {
            continue;
        }
        up[i] = change.max(T::zero());
        down[i] = (-change).max(T::zero());
    }
    let su = rolling_sum(&up, period)?;
    let sd = rolling_sum(&down, period)?;
    Ok(su
        .iter()
        .zip(&sd)
        .map(|(&u, &d)| T::hundred() * ratio_or(u - d, u + d, T::zero()))
        .collect())
}

/// Lookback for TRIX: three EMA warm-ups plus one change.
#[inline]
#[must_use]
pub const fn trix_lookback(period: usize) -> usize {
    3 * period.saturating_sub(1) + 1
}

/// Computes TRIX, the one-bar percent change of a triple EMA.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
pub fn trix<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    let triple = ema(&ema(&ema(data, period)?, period)?, period)?;
    roc(&triple, 1)
}

/// Computes the Coppock curve.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any length is zero.
pub fn coppock<T: SeriesElement>(
    data: &[T],
    wma_length: usize,
    long_roc: usize,
    short_roc: usize,
) -> Result<Vec<T>> {
    validate_period("wma_length", wma_length)?;
    validate_period("long_roc", long_roc)?;
    validate_period("short_roc", short_roc)?;
    let long = roc(data, long_roc)?;
    let short = roc(data, short_roc)?;
    let sum: Vec<T> = long.iter().zip(&short).map(|(&a, &b)| a + b).collect();
    wma(&sum, wma_length)
}

/// Know Sure Thing line and its SMA signal.
#[derive(Debug, Clone, PartialEq)]
pub struct KstOutput<T> {
    /// Weighted sum of four smoothed ROCs.
    pub kst: Vec<T>,
    /// SMA of `kst`.
    pub signal: Vec<T>,
}

/// ROC and SMA lengths of the four KST components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KstLengths {
    /// ROC lookbacks, shortest first.
    pub roc: [usize; 4],
    /// SMA lengths applied to each ROC.
    pub sma: [usize; 4],
}

impl Default for KstLengths {
    fn default() -> Self {
        Self {
            roc: [10, 15, 20, 30],
            sma: [10, 10, 10, 15],
        }
    }
}

/// Computes the Know Sure Thing oscillator.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if any length is zero.
pub fn kst<T: SeriesElement>(data: &[T], lengths: KstLengths, signal_period: usize) -> Result<KstOutput<T>> {
    validate_period("signal", signal_period)?;
    let mut line = vec![T::zero(); data.len()];
    for (k, (&r, &s)) in lengths.roc.iter().zip(&lengths.sma).enumerate() {
        let weight = T::from_usize(k + 1)?;
        let component = sma(&roc(data, r)?, s)?;
        for (acc, c) in line.iter_mut().zip(component) {
            *acc += weight * c;
        }
    }
    let signal = sma(&line, signal_period)?;
    Ok(KstOutput { kst: line, signal })
}
