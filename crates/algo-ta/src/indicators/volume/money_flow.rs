//! Price-weighted volume averages and flow ratios: VWAP, MFI and CMF.

use crate::error::Result;
use crate::indicators::volume::accumulation::money_flow_volume;
use crate::kernels::rolling_moments::rolling_sum;
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{hlc3, nan_vec, ratio_or};

/// Computes the cumulative Volume-Weighted Average Price of `hlc3`.
///
/// Until any volume has traded the typical price itself is returned.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn vwap<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T]) -> Result<Vec<T>> {
    validate_same_length(&[("high", high), ("low", low), ("close", close), ("volume", volume)])?;
    let tp = hlc3(high, low, close);
    let mut pv = T::zero();
    let mut vol = T::zero();
    Ok(tp
        .iter()
        .zip(volume)
        .map(|(&p, &v)| {
            if p.is_nan() || v.is_nan() {
                return T::nan();
            }
            pv += p * v;
            vol += v;
            ratio_or(pv, vol, p)
        })
        .collect())
}

/// Computes the Money Flow Index.
///
/// ```text
/// raw  = TP × volume, signed by the direction of TP
/// MFI  = 100 - 100 / (1 + Σ positive(n) / Σ negative(n))
/// ```
///
/// No negative flow in the window yields 100. The first value is at `period`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn mfi<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close), ("volume", volume)])?;
    let tp = hlc3(high, low, close);
    let mut positive = nan_vec(n);
    let mut negative = nan_vec(n);
    for i in 1..n {
        let flow = tp[i] * volume[i];
        if flow.is_nan() || tp[i - 1].is_nan() {
            continue;
        }
        let (pos, neg) = if tp[i] > tp[i - 1] {
            (flow, T::zero())
        } else if tp[i] < tp[i - 1] {
            (T::zero(), flow)
        } else {
            (T::zero(), T::zero())
        };
        positive[i] = pos;
        negative[i] = neg;
    }
    let pos_sum = rolling_sum(&positive, period)?;
    let neg_sum = rolling_sum(&negative, period)?;
    Ok(pos_sum
        .iter()
        .zip(&neg_sum)
        .map(|(&p, &q)| {
            if p.is_nan() || q.is_nan() {
                T::nan()
            } else if q == T::zero() {
                T::hundred()
            } else {
                T::hundred() - T::hundred() / (T::one() + p / q)
            }
        })
        .collect())
}

/// Computes Chaikin Money Flow: windowed money-flow volume over windowed volume.
///
/// A zero volume sum yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn cmf<T: SeriesElement>(high: &[T], low: &[T], close: &[T], volume: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let flow = money_flow_volume(high, low, close, volume)?;
    let flow_sum = rolling_sum(&flow, period)?;
    let vol_sum = rolling_sum(volume, period)?;
    Ok(flow_sum
        .iter()
        .zip(&vol_sum)
        .map(|(&f, &v)| ratio_or(f, v, T::zero()))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::{approx_eq, count_nan_prefix};

    #[test]
    fn test_vwap_cumulative() {
        let price = vec![10.0_f64, 20.0, 30.0];
        let volume = vec![1.0_f64, 1.0, 2.0];
        let out = vwap(&price, &price, &price, &volume).unwrap();
        assert_eq!(out[0], 10.0);
        assert!(approx_eq(out[1], 15.0, 1e-12));
        assert!(approx_eq(out[2], 22.5, 1e-12));
    }

    #[test]
    fn test_vwap_zero_volume_prefix() {
        let price = vec![5.0_f64, 6.0, 7.0];
        let volume = vec![0.0_f64, 0.0, 3.0];
        let out = vwap(&price, &price, &price, &volume).unwrap();
        assert_eq!(out[..2], [5.0, 6.0]);
        assert_eq!(out[2], 7.0);
    }

    #[test]
    fn test_mfi_all_rising_is_100() {
        let price: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let volume = vec![1000.0_f64; 30];
        let out = mfi(&price, &price, &price, &volume, 14).unwrap();
        assert_eq!(count_nan_prefix(&out), 14);
        assert!(out[14..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_mfi_balanced() {
        let price = vec![10.0_f64, 11.0, 10.0, 11.0, 10.0];
        let volume = vec![10.0_f64, 10.0, 11.0, 10.0, 11.0];
        let out = mfi(&price, &price, &price, &volume, 2).unwrap();
        // pos 110, neg 110 over bars 1..=2
        assert!(approx_eq(out[2], 50.0, 1e-9));
    }

    #[test]
    fn test_cmf_close_at_high() {
        let high = vec![12.0_f64; 25];
        let low = vec![10.0_f64; 25];
        let out = cmf(&high, &low, &high, &vec![500.0; 25], 20).unwrap();
        assert_eq!(count_nan_prefix(&out), 19);
        assert!(out[19..].iter().all(|&v| approx_eq(v, 1.0, 1e-12)));
        let zero = cmf(&high, &low, &high, &vec![0.0; 25], 20).unwrap();
        assert!(zero[19..].iter().all(|&v| v == 0.0));
    }
}
