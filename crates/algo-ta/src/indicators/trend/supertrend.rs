//! Supertrend: an ATR band that ratchets with the trend and flips on a close through it.
//!
//! # Algorithm
//!
//! ```text
//! basic_upper = hl2 + m × ATR      basic_lower = hl2 - m × ATR
//! upper = basic_upper if basic_upper < upper[i-1] or close[i-1] > upper[i-1] else upper[i-1]
//! lower = basic_lower if basic_lower > lower[i-1] or close[i-1] < lower[i-1] else lower[i-1]
//! ```
//!
//! While the line sits on the upper band (downtrend) a close above the new
//! upper band flips to an uptrend; while it sits on the lower band a close
//! below the new lower band flips to a downtrend.
//!
//! # Direction convention
//!
//! `direction` is `-1` in an uptrend (line below price) and `+1` in a
//! downtrend (line above price), the convention of the common charting
//! platforms. The first defined bar starts in a downtrend.

use crate::error::Result;
use crate::indicators::volatility::atr::atr;
use crate::traits::{validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::nan_vec;

/// Supertrend line and trend direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SupertrendOutput<T> {
    /// The active band: lower band in an uptrend, upper band in a downtrend.
    pub supertrend: Vec<T>,
    /// `-1` for uptrend, `+1` for downtrend, NaN during warm-up.
    pub direction: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct BandState<T> {
    upper: T,
    lower: T,
    trend: Trend,
}

/// Lookback for Supertrend: the ATR lookback, `period - 1`.
#[inline]
#[must_use]
pub const fn supertrend_lookback(period: usize) -> usize {
    period.saturating_sub(1)
}

/// Computes Supertrend over ATR(`period`) bands scaled by `multiplier`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `multiplier` is not
/// positive, or `Error::ShapeMismatch` on unequal role lengths.
pub fn supertrend<T: SeriesElement>(
    high: &[T],
    low: &[T],
    close: &[T],
    period: usize,
    multiplier: f64,
) -> Result<SupertrendOutput<T>> {
    validate_period("period", period)?;
    validate_positive("multiplier", multiplier)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let m = T::from_f64(multiplier)?;
    let atr = atr(high, low, close, period)?;

    let mut line = nan_vec(n);
    let mut direction = nan_vec(n);
    let mut state: Option<BandState<T>> = None;

    for i in 0..n {
        if atr[i].is_nan() {
            state = None;
            continue;
        }
        let mid = (high[i] + low[i]) / T::two();
        let basic_upper = mid + m * atr[i];
        let basic_lower = mid - m * atr[i];

        let next = match state {
            None => BandState {
                upper: basic_upper,
                lower: basic_lower,
                trend: Trend::Down,
            },
            Some(prev) => {
                let prev_close = close[i - 1];
                let upper = if basic_upper < prev.upper || prev_close > prev.upper {
                    basic_upper
                } else {
                    prev.upper
                };
                let lower = if basic_lower > prev.lower || prev_close < prev.lower {
                    basic_lower
                } else {
                    prev.lower
                };
                let trend = match prev.trend {
                    Trend::Down if close[i] > upper => Trend::Up,
                    Trend::Up if close[i] < lower => Trend::Down,
                    unchanged => unchanged,
                };
                BandState { upper, lower, trend }
            }
        };

        let (value, dir) = match next.trend {
            Trend::Up => (next.lower, -T::one()),
            Trend::Down => (next.upper, T::one()),
        };
        line[i] = value;
        direction[i] = dir;
        state = Some(next);
    }

    Ok(SupertrendOutput {
        supertrend: line,
        direction,
    })
}
