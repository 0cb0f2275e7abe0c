//! Two-series window statistics: Pearson correlation and beta.
//!
//! # Algorithm
//!
//! [`RollingCoMoments`] keeps compensated sums of `x`, `y`, `x²`, `y²` and `xy`
//! over data shifted by a recent pair, the bivariate analogue of
//! `RollingMoments`. It is rebuilt from the live window every
//! [`REBASE_INTERVAL`] steps. A window holding a NaN in either series is NaN.

use crate::error::Result;
use crate::kernels::rolling_moments::{CompensatedSum, REBASE_INTERVAL};
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::{nan_vec, ratio_or};

/// Rolling shifted co-moments of a pair of series.
#[derive(Debug, Clone, Default)]
pub struct RollingCoMoments<T> {
    shift: Option<(T, T)>,
    sx: CompensatedSum<T>,
    sy: CompensatedSum<T>,
    sxx: CompensatedSum<T>,
    syy: CompensatedSum<T>,
    sxy: CompensatedSum<T>,
    count: usize,
    nan_count: usize,
}

/// Population covariance and variances of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoMoments<T> {
    /// `cov(x, y)`.
    pub covariance: T,
    /// `var(x)`.
    pub var_x: T,
    /// `var(y)`.
    pub var_y: T,
}

impl<T: SeriesElement> RollingCoMoments<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shift: None,
            sx: CompensatedSum::new(),
            sy: CompensatedSum::new(),
            sxx: CompensatedSum::new(),
            syy: CompensatedSum::new(),
            sxy: CompensatedSum::new(),
            count: 0,
            nan_count: 0,
        }
    }

    fn update(&mut self, x: T, y: T, sign: bool) {
        let Some((kx, ky)) = self.shift else {
            return;
        };
        let (dx, dy) = (x - kx, y - ky);
        let terms = [
            (&mut self.sx, dx),
            (&mut self.sy, dy),
            (&mut self.sxx, dx * dx),
            (&mut self.syy, dy * dy),
            (&mut self.sxy, dx * dy),
        ];
        for (acc, v) in terms {
            if sign {
                acc.add(v);
            } else {
                acc.sub(v);
            }
        }
    }

    /// Adds a pair entering the window.
    pub fn push(&mut self, x: T, y: T) {
        self.count += 1;
        if x.is_nan() || y.is_nan() {
            self.nan_count += 1;
            return;
        }
        self.shift.get_or_insert((x, y));
        self.update(x, y, true);
    }

    /// Removes a pair leaving the window.
    pub fn pop(&mut self, x: T, y: T) {
        self.count = self.count.saturating_sub(1);
        if x.is_nan() || y.is_nan() {
            self.nan_count = self.nan_count.saturating_sub(1);
            return;
        }
        self.update(x, y, false);
    }

    /// Rebuilds the sums from the live window, shifted by its newest finite pair.
    pub fn rebase(&mut self, xs: &[T], ys: &[T]) {
        *self = Self::new();
        self.shift = xs
            .iter()
            .zip(ys)
            .rev()
            .find(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(&x, &y)| (x, y));
        for (&x, &y) in xs.iter().zip(ys) {
            self.push(x, y);
        }
    }

    /// Current co-moments, `None` while empty or holding a NaN.
    #[must_use]
    pub fn moments(&self) -> Option<CoMoments<T>> {
        if self.count == 0 || self.nan_count > 0 {
            return None;
        }
        let n = T::from_usize(self.count).ok()?;
        let (sx, sy) = (self.sx.value(), self.sy.value());
        Some(CoMoments {
            covariance: (self.sxy.value() - sx * sy / n) / n,
            var_x: ((self.sxx.value() - sx * sx / n) / n).max(T::zero()),
            var_y: ((self.syy.value() - sy * sy / n) / n).max(T::zero()),
        })
    }
}

fn rolling_pair<T: SeriesElement>(
    x: &[T],
    y: &[T],
    period: usize,
    read: impl Fn(CoMoments<T>) -> T,
) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = x.len();
    let mut out = nan_vec(n);
    let mut acc = RollingCoMoments::new();
    for i in 0..n {
        acc.push(x[i], y[i]);
        if i >= period {
            acc.pop(x[i - period], y[i - period]);
        }
        if i + 1 >= period {
            if i % REBASE_INTERVAL == 0 {
                acc.rebase(&x[i + 1 - period..=i], &y[i + 1 - period..=i]);
            }
            if let Some(m) = acc.moments() {
                out[i] = read(m);
            }
        }
    }
    Ok(out)
}

/// Computes the rolling Pearson correlation of two series.
///
/// A window where either series is constant yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal lengths.
pub fn correlation<T: SeriesElement>(a: &[T], b: &[T], period: usize) -> Result<Vec<T>> {
    validate_same_length(&[("data", a), ("reference", b)])?;
    rolling_pair(a, b, period, |m| {
        let den = (m.var_x * m.var_y).sqrt();
        ratio_or(m.covariance, den, T::zero()).max(-T::one()).min(T::one())
    })
}

fn simple_returns<T: SeriesElement>(data: &[T]) -> Vec<T> {
    let mut out = nan_vec(data.len());
    for i in 1..data.len() {
        out[i] = ratio_or(data[i] - data[i - 1], data[i - 1], T::zero());
    }
    out
}

/// Computes rolling beta: `cov(r_asset, r_market) / var(r_market)` over
/// simple returns. The first value is at `period`.
///
/// A constant market window yields 0.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal lengths.
pub fn beta<T: SeriesElement>(asset: &[T], market: &[T], period: usize) -> Result<Vec<T>> {
    validate_same_length(&[("asset", asset), ("market", market)])?;
    rolling_pair(&simple_returns(asset), &simple_returns(market), period, |m| {
        ratio_or(m.covariance, m.var_y, T::zero())
    })
}

/// O(n·k) two-pass reference for [`correlation`].
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero, or
/// `Error::ShapeMismatch` on unequal lengths.
pub fn correlation_naive<T: SeriesElement>(a: &[T], b: &[T], period: usize) -> Result<Vec<T>> {
    validate_period("period", period)?;
    let n = validate_same_length(&[("data", a), ("reference", b)])?;
    let p = T::from_usize(period)?;
    let mut out = nan_vec(n);
    for i in period.saturating_sub(1)..n {
        let (xs, ys) = (&a[i + 1 - period..=i], &b[i + 1 - period..=i]);
        let mx = xs.iter().copied().sum::<T>() / p;
        let my = ys.iter().copied().sum::<T>() / p;
        let (mut cov, mut vx, mut vy) = (T::zero(), T::zero(), T::zero());
        for (&x, &y) in xs.iter().zip(ys) {
            cov += (x - mx) * (y - my);
            vx += (x - mx) * (x - mx);
            vy += (y - my) * (y - my);
        }
        out[i] = ratio_or(cov, (vx * vy).sqrt(), T::zero());
    }
    Ok(out)
}
