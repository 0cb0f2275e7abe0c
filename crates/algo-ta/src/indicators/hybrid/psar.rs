//! Parabolic Stop and Reverse.
//!
//! # Formula
//!
//! ```text
//! SAR[i] = SAR[i-1] + AF × (EP - SAR[i-1])
//! ```
//!
//! `EP` is the extreme point of the current trend (highest high in an uptrend,
//! lowest low in a downtrend). `AF` starts at `acceleration`, grows by
//! `acceleration` on every new extreme and is capped at `maximum`. In an
//! uptrend the SAR may not rise above the two previous lows (mirrored for a
//! downtrend); penetration reverses the trend and the SAR jumps to the old EP.
//!
//! The initial trend is up when `high[1] > high[0]`. The first value is at
//! index 1; each NaN-free run of input restarts the recursion.

use crate::error::{Error, Result};
use crate::traits::{validate_positive, validate_same_length, SeriesElement};
use crate::utils::{finite_runs, nan_vec};

/// Lookback for PSAR: one bar.
#[inline]
#[must_use]
pub const fn psar_lookback() -> usize {
    1
}

#[derive(Debug, Clone, Copy)]
struct SarState<T> {
    rising: bool,
    sar: T,
    extreme: T,
    af: T,
}

fn psar_run<T: SeriesElement>(high: &[T], low: &[T], out: &mut [T], step: T, maximum: T) {
    if high.len() < 2 {
        return;
    }
    let rising = high[1] > high[0];
    let mut state = SarState {
        rising,
        sar: if rising { low[0] } else { high[0] },
        extreme: if rising { high[1] } else { low[1] },
        af: step,
    };
    out[1] = state.sar;

    for i in 2..high.len() {
        let mut sar = state.sar + state.af * (state.extreme - state.sar);
        if state.rising {
            sar = sar.min(low[i - 1]).min(low[i - 2]);
            if low[i] < sar {
                state = SarState {
                    rising: false,
                    sar: state.extreme,
                    extreme: low[i],
                    af: step,
                };
                out[i] = state.sar;
                continue;
            }
            if high[i] > state.extreme {
                state.extreme = high[i];
                state.af = (state.af + step).min(maximum);
            }
        } else {
            sar = sar.max(high[i - 1]).max(high[i - 2]);
            if high[i] > sar {
                state = SarState {
                    rising: true,
                    sar: state.extreme,
                    extreme: high[i],
                    af: step,
                };
                out[i] = state.sar;
                continue;
            }
            if low[i] < state.extreme {
                state.extreme = low[i];
                state.af = (state.af + step).min(maximum);
            }
        }
        state.sar = sar;
        out[i] = sar;
    }
}

/// Computes the Parabolic SAR.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `acceleration` or `maximum` is not
/// positive or `acceleration > maximum`, or `Error::ShapeMismatch` on unequal
/// role lengths.
pub fn psar<T: SeriesElement>(high: &[T], low: &[T], acceleration: f64, maximum: f64) -> Result<Vec<T>> {
    validate_positive("acceleration", acceleration)?;
    validate_positive("maximum", maximum)?;
    if acceleration > maximum {
        return Err(Error::invalid_parameter(
            "acceleration",
            acceleration,
            format!("must not exceed maximum ({maximum})"),
        ));
    }
    let n = validate_same_length(&[("high", high), ("low", low)])?;
    let (step, cap) = (T::from_f64(acceleration)?, T::from_f64(maximum)?);
    let mut out = nan_vec(n);
    for run in finite_runs(&[high, low]) {
        psar_run(&high[run.clone()], &low[run.clone()], &mut out[run], step, cap);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_psar_uptrend_stays_below_lows() {
        let high: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let low: Vec<f64> = high.iter().map(|h| h - 1.0).collect();
        let out = psar(&high, &low, 0.02, 0.2).unwrap();
        assert_eq!(count_nan_prefix(&out), psar_lookback());
        assert_eq!(out[1], low[0]);
        for i in 1..30 {
            assert!(out[i] <= low[i]);
        }
    }

    #[test]
    fn test_psar_first_steps() {
        let high = vec![10.0_f64, 11.0, 12.0, 13.0];
        let low = vec![9.0_f64, 10.0, 11.0, 12.0];
        let out = psar(&high, &low, 0.02, 0.2).unwrap();
        // 9.04 is capped by low[0]
        assert_eq!(out[2], 9.0);
        // new extreme 12 raised AF to 0.04
        assert!(approx_eq(out[3], 9.0 + 0.04 * 3.0, 1e-12));
    }

    #[test]
    fn test_psar_reversal_jumps_to_extreme() {
        let high = vec![10.0_f64, 11.0, 12.0, 13.0, 8.0];
        let low = vec![9.0_f64, 10.0, 11.0, 12.0, 7.0];
        let out = psar(&high, &low, 0.02, 0.2).unwrap();
        assert_eq!(out[4], 13.0);
    }

    #[test]
    fn test_psar_parameter_validation() {
        let x = vec![1.0_f64; 5];
        assert!(matches!(psar(&x, &x, 0.3, 0.2), Err(Error::InvalidParameter { .. })));
        assert!(matches!(psar(&x, &x, 0.0, 0.2), Err(Error::InvalidParameter { .. })));
    }
}
