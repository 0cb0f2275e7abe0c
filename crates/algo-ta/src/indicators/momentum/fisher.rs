//! Ehlers Fisher Transform.
//!
//! # Algorithm
//!
//! The median price `hl2` is normalized into its trailing `length` range,
//! smoothed, clamped away from ±1 and passed through the inverse hyperbolic
//! tangent. Both recursions start from 0 at the first complete window and
//! restart after a NaN.
//!
//! # Formula
//!
//! ```text
//! norm   = (hl2 - LL) / (HH - LL)             (0.5 on a flat window)
//! value  = clamp(0.66·(norm - 0.5) + 0.67·value[i-1], -0.999, 0.999)
//! fisher = 0.5·ln((1 + value) / (1 - value)) + 0.5·fisher[i-1]
//! trigger[i] = fisher[i-1]
//! ```

use crate::error::Result;
use crate::kernels::rolling_extrema::rolling_extrema;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{hl2, nan_vec, ratio_or, shift_forward};

/// Fisher line and its one-bar lagged trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct FisherOutput<T> {
    /// Fisher transform of the normalized price.
    pub fisher: Vec<T>,
    /// `fisher` delayed by one bar.
    pub trigger: Vec<T>,
}

#[derive(Debug, Clone, Copy)]
struct FisherState<T> {
    value: T,
    fisher: T,
}

/// Computes the Fisher Transform of `hl2`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `length` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn fisher<T: SeriesElement>(high: &[T], low: &[T], length: usize) -> Result<FisherOutput<T>> {
    validate_period("length", length)?;
    let n = validate_same_length(&[("high", high), ("low", low)])?;
    let price = hl2(high, low);
    let range = rolling_extrema(&price, &price, length)?;
    let half = T::constant(0.5);
    let (w_norm, w_prev) = (T::constant(0.66), T::constant(0.67));
    let bound = T::constant(0.999);
    let mut out = nan_vec(n);
    let mut state: Option<FisherState<T>> = None;

    for i in 0..n {
        let (hh, ll) = (range.max[i], range.min[i]);
        if price[i].is_nan() || hh.is_nan() || ll.is_nan() {
            state = None;
            continue;
        }
        let prev = state.unwrap_or(FisherState {
            value: T::zero(),
            fisher: T::zero(),
        });
        let norm = ratio_or(price[i] - ll, hh - ll, half);
        let value = (w_norm * (norm - half) + w_prev * prev.value).max(-bound).min(bound);
        let fisher = half * ((T::one() + value) / (T::one() - value)).ln() + half * prev.fisher;
        out[i] = fisher;
        state = Some(FisherState { value, fisher });
    }

    let trigger = shift_forward(&out, 1);
    Ok(FisherOutput { fisher: out, trigger })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_fisher_flat_is_zero() {
        let flat = vec![2.0_f64; 20];
        let out = fisher(&flat, &flat, 9).unwrap();
        assert_eq!(count_nan_prefix(&out.fisher), 8);
        assert!(out.fisher[8..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fisher_first_value() {
        // rising series: hl2 always at the window high, norm = 1
        let high: Vec<f64> = (0..12).map(|i| 1.0 + i as f64).collect();
        let out = fisher(&high, &high, 3).unwrap();
        let v: f64 = 0.33;
        assert!(approx_eq(out.fisher[2], 0.5 * ((1.0 + v) / (1.0 - v)).ln(), 1e-12));
        assert!(out.fisher[11] > out.fisher[2]);
    }

    #[test]
    fn test_fisher_trigger_lags() {
        let price: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin()).collect();
        let out = fisher(&price, &price, 9).unwrap();
        assert_eq!(count_nan_prefix(&out.trigger), 9);
        for i in 9..50 {
            assert_eq!(out.trigger[i], out.fisher[i - 1]);
        }
    }
}
