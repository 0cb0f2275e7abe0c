//! Swing structure: floor pivot points, Williams fractals and ZigZag.
//!
//! Fractals and ZigZag only report a swing once it is confirmed, at the
//! confirming bar. Nothing here reads bars after the current one.

use crate::error::{Error, Result};
use crate::traits::{validate_period, validate_positive, validate_same_length, SeriesElement};
use crate::utils::nan_vec;

/// Classic floor-trader pivot levels of each bar.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotOutput<T> {
    /// `(H + L + C) / 3`.
    pub pivot: Vec<T>,
    /// `2P - L`.
    pub r1: Vec<T>,
    /// `2P - H`.
    pub s1: Vec<T>,
    /// `P + (H - L)`.
    pub r2: Vec<T>,
    /// `P - (H - L)`.
    pub s2: Vec<T>,
    /// `H + 2(P - L)`.
    pub r3: Vec<T>,
    /// `L - 2(H - P)`.
    pub s3: Vec<T>,
}

/// Computes pivot levels from each bar's own high, low and close.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` on unequal role lengths.
pub fn pivot_points<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<PivotOutput<T>> {
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let three = T::constant(3.0);
    let mut out = PivotOutput {
        pivot: Vec::with_capacity(n),
        r1: Vec::with_capacity(n),
        s1: Vec::with_capacity(n),
        r2: Vec::with_capacity(n),
        s2: Vec::with_capacity(n),
        r3: Vec::with_capacity(n),
        s3: Vec::with_capacity(n),
    };
    for i in 0..n {
        let (h, l) = (high[i], low[i]);
        let p = (h + l + close[i]) / three;
        out.pivot.push(p);
        out.r1.push(T::two() * p - l);
        out.s1.push(T::two() * p - h);
        out.r2.push(p + (h - l));
        out.s2.push(p - (h - l));
        out.r3.push(h + T::two() * (p - l));
        out.s3.push(l - T::two() * (h - p));
    }
    Ok(out)
}

/// Confirmed fractal flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractalsOutput {
    /// A fractal high centred `periods` bars back was confirmed at this bar.
    pub up: Vec<bool>,
    /// A fractal low centred `periods` bars back was confirmed at this bar.
    pub down: Vec<bool>,
}

/// Computes Williams fractals.
///
/// The bar `c = i - periods` is a fractal high when its high is strictly
/// greater than every other high in `c - periods ..= c + periods`; the flag is
/// set at `i`, the first bar where that is known. Lows mirror this.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `periods` is zero, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn fractals<T: SeriesElement>(high: &[T], low: &[T], periods: usize) -> Result<FractalsOutput> {
    validate_period("periods", periods)?;
    let n = validate_same_length(&[("high", high), ("low", low)])?;
    let mut out = FractalsOutput {
        up: vec![false; n],
        down: vec![false; n],
    };
    let span = 2 * periods;
    for i in span..n {
        let c = i - periods;
        let neighbours = (i - span..=i).filter(|&j| j != c);
        let (h, l) = (high[c], low[c]);
        out.up[i] = !h.is_nan() && neighbours.clone().all(|j| high[j] < h);
        out.down[i] = !l.is_nan() && neighbours.clone().all(|j| low[j] > l);
    }
    Ok(out)
}

/// ZigZag step line and leg direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ZigzagOutput<T> {
    /// Price of the most recently confirmed pivot.
    pub line: Vec<T>,
    /// `+1` while in an up leg (last pivot was a low), `-1` in a down leg.
    pub direction: Vec<T>,
}

#[derive(Debug, Clone, Copy)]
enum Leg<T> {
    Searching { high: T, low: T },
    Up { extreme: T },
    Down { extreme: T },
}

/// Computes ZigZag with a percentage reversal threshold.
///
/// Extremes are tracked on high/low; a reversal is confirmed when the close
/// retraces `deviation` percent from the running extreme, and the extreme
/// becomes the new pivot. Both outputs are NaN until the first pivot and on
/// bars with a NaN input.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `deviation` is not in `(0, 100)`, or
/// `Error::ShapeMismatch` on unequal role lengths.
pub fn zigzag<T: SeriesElement>(high: &[T], low: &[T], close: &[T], deviation: f64) -> Result<ZigzagOutput<T>> {
    validate_positive("deviation", deviation)?;
    if deviation >= 100.0 {
        return Err(Error::invalid_parameter("deviation", deviation, "must be below 100"));
    }
    let n = validate_same_length(&[("high", high), ("low", low), ("close", close)])?;
    let fraction = T::from_f64(deviation / 100.0)?;
    let (down_trigger, up_trigger) = (T::one() - fraction, T::one() + fraction);
    let mut out = ZigzagOutput {
        line: nan_vec(n),
        direction: nan_vec(n),
    };
    let mut leg: Option<Leg<T>> = None;
    let mut pivot: Option<(T, T)> = None;

    for i in 0..n {
        let (h, l, c) = (high[i], low[i], close[i]);
        if h.is_nan() || l.is_nan() || c.is_nan() {
            continue;
        }
        leg = Some(match leg {
            None => Leg::Searching { high: h, low: l },
            Some(Leg::Searching { high: hh, low: ll }) => {
                let (hh, ll) = (hh.max(h), ll.min(l));
                if c <= hh * down_trigger {
                    pivot = Some((hh, -T::one()));
                    Leg::Down { extreme: l }
                } else if c >= ll * up_trigger {
                    pivot = Some((ll, T::one()));
                    Leg::Up { extreme: h }
                } else {
                    Leg::Searching { high: hh, low: ll }
                }
            }
            Some(Leg::Up { extreme }) => {
                let extreme = extreme.max(h);
                if c <= extreme * down_trigger {
                    pivot = Some((extreme, -T::one()));
                    Leg::Down { extreme: l }
                } else {
                    Leg::Up { extreme }
                }
            }
            Some(Leg::Down { extreme }) => {
                let extreme = extreme.min(l);
                if c >= extreme * up_trigger {
                    pivot = Some((extreme, T::one()));
                    Leg::Up { extreme: h }
                } else {
                    Leg::Down { extreme }
                }
            }
        });
        if let Some((price, direction)) = pivot {
            out.line[i] = price;
            out.direction[i] = direction;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::approx_eq;

    #[test]
    fn test_pivot_levels() {
        let out = pivot_points(&[12.0_f64], &[8.0], &[10.0]).unwrap();
        assert_eq!(out.pivot[0], 10.0);
        assert_eq!(out.r1[0], 12.0);
        assert_eq!(out.s1[0], 8.0);
        assert_eq!(out.r2[0], 14.0);
        assert_eq!(out.s2[0], 6.0);
        assert_eq!(out.r3[0], 16.0);
        assert_eq!(out.s3[0], 4.0);
    }

    #[test]
    fn test_fractal_confirmed_late() {
        let high = vec![1.0_f64, 2.0, 5.0, 2.0, 1.0, 1.0];
        let low = vec![1.0_f64, 0.5, 3.0, 0.5, 0.8, 0.9];
        let out = fractals(&high, &low, 2).unwrap();
        // peak at bar 2 is only known at bar 4
        assert_eq!(out.up, vec![false, false, false, false, true, false]);
        assert!(out.down.iter().all(|&f| !f));
    }

    #[test]
    fn test_fractal_ties_are_not_fractals() {
        let high = vec![1.0_f64, 5.0, 5.0, 1.0, 1.0];
        let low = vec![1.0_f64; 5];
        let out = fractals(&high, &low, 1).unwrap();
        assert!(out.up.iter().all(|&f| !f));
    }

    #[test]
    fn test_zigzag_swings() {
        let close = vec![100.0_f64, 104.0, 110.0, 108.0, 103.0, 101.0, 107.0];
        let out = zigzag(&close, &close, &close, 5.0).unwrap();
        // 104 is short of 105; 110 confirms the low of 100
        assert!(out.line[1].is_nan());
        assert_eq!(out.line[2], 100.0);
        assert_eq!(out.direction[2], 1.0);
        // 103 <= 110 × 0.95 confirms the high at bar 4
        assert_eq!(out.line[3], 100.0);
        assert_eq!(out.line[4], 110.0);
        assert_eq!(out.direction[4], -1.0);
        // 107 >= 101 × 1.05 confirms the low at bar 6
        assert!(approx_eq(out.line[6], 101.0, 1e-12));
        assert_eq!(out.direction[6], 1.0);
    }

    #[test]
    fn test_zigzag_rejects_bad_deviation() {
        let x = vec![1.0_f64; 3];
        assert!(zigzag(&x, &x, &x, 0.0).is_err());
        assert!(zigzag(&x, &x, &x, 100.0).is_err());
    }
}
