//! Hilbert Transform instantaneous trendline.
//!
//! # Algorithm
//!
//! Ehlers' homodyne discriminator estimates the dominant cycle period from a
//! 4-bar smoothed price:
//!
//! 1. Detrend the smoothed price with the Hilbert FIR (`0.0962`, `0.5769`),
//!    scaled by `0.075 × period[i-1] + 0.54`.
//! 2. Derive the in-phase and quadrature components, advance both by 90°,
//!    and smooth the phasor sums with `α = 0.2`.
//! 3. The period is `2π / atan(Im / Re)`, limited to `[0.67, 1.5] × previous`
//!    and `[6, 50]`, then smoothed twice (`0.2`, then `0.33`).
//! 4. The instantaneous trend is the mean of the last `round(smooth_period)`
//!    prices; the trendline is its 4-3-2-1 weighted average.
//!
//! # NaN handling
//!
//! The filter runs independently over each NaN-free run of input. The first
//! [`ht_lookback`] bars of every run are warm-up and emit NaN.

use crate::error::Result;
use crate::traits::SeriesElement;
use crate::utils::{finite_runs, nan_vec};

/// Warm-up bars at the start of each NaN-free run.
#[inline]
#[must_use]
pub const fn ht_lookback() -> usize {
    63
}

/// Filter coefficients, converted once per call.
struct Coefficients<T> {
    a: T,
    b: T,
    alpha: T,
    period_alpha: T,
    two_pi: T,
    floor: T,
    ceiling: T,
    four: T,
    three: T,
    ten: T,
}

impl<T: SeriesElement> Coefficients<T> {
    fn new() -> Self {
        Self {
            a: T::constant(0.0962),
            b: T::constant(0.5769),
            alpha: T::constant(0.2),
            period_alpha: T::constant(0.33),
            two_pi: T::constant(std::f64::consts::TAU),
            floor: T::constant(6.0),
            ceiling: T::constant(50.0),
            four: T::constant(4.0),
            three: T::constant(3.0),
            ten: T::constant(10.0),
        }
    }

    /// 4-3-2-1 weighted average ending at `i` (fewer terms near the start).
    fn weighted4(&self, x: &[T], i: usize) -> T {
        if i < 3 {
            return x[i];
        }
        (self.four * x[i] + self.three * x[i - 1] + T::two() * x[i - 2] + x[i - 3]) / self.ten
    }

    /// Hilbert FIR over positions `i, i-2, i-4, i-6`.
    fn fir(&self, x: &[T], i: usize, gain: T) -> T {
        (self.a * x[i] + self.b * x[i - 2] - self.b * x[i - 4] - self.a * x[i - 6]) * gain
    }
}

/// Runs the trendline filter over one NaN-free run, writing into `out`.
fn trendline_run<T: SeriesElement>(data: &[T], out: &mut [T], c: &Coefficients<T>) -> Result<()> {
    let n = data.len();
    let zeros = || vec![T::zero(); n];
    let (mut smooth, mut detrender, mut i1, mut q1) = (zeros(), zeros(), zeros(), zeros());
    let (mut i2, mut q2, mut re, mut im) = (zeros(), zeros(), zeros(), zeros());
    let mut period = vec![c.floor; n];
    let mut smooth_period = vec![c.floor; n];
    let mut instant = zeros();
    let one = T::one();
    let (lower, upper) = (T::constant(0.67), T::constant(1.5));

    for i in 0..n {
        smooth[i] = c.weighted4(data, i);
        if i >= 6 {
            let gain = T::constant(0.075) * period[i - 1] + T::constant(0.54);
            detrender[i] = c.fir(&smooth, i, gain);
            q1[i] = c.fir(&detrender, i, gain);
            i1[i] = detrender[i - 3];
            let ji = c.fir(&i1, i, gain);
            let jq = c.fir(&q1, i, gain);
            i2[i] = c.alpha * (i1[i] - jq) + (one - c.alpha) * i2[i - 1];
            q2[i] = c.alpha * (q1[i] + ji) + (one - c.alpha) * q2[i - 1];
            let raw_re = i2[i] * i2[i - 1] + q2[i] * q2[i - 1];
            let raw_im = i2[i] * q2[i - 1] - q2[i] * i2[i - 1];
            re[i] = c.alpha * raw_re + (one - c.alpha) * re[i - 1];
            im[i] = c.alpha * raw_im + (one - c.alpha) * im[i - 1];

            let prev = period[i - 1];
            let mut p = if im[i] != T::zero() && re[i] != T::zero() {
                c.two_pi / (im[i] / re[i]).atan()
            } else {
                prev
            };
            p = p.min(upper * prev).max(lower * prev).max(c.floor).min(c.ceiling);
            period[i] = c.alpha * p + (one - c.alpha) * prev;
            smooth_period[i] = c.period_alpha * period[i] + (one - c.period_alpha) * smooth_period[i - 1];
        }

        let span = smooth_period[i]
            .round()
            .to_usize()
            .unwrap_or(1)
            .clamp(1, i + 1);
        let window = &data[i + 1 - span..=i];
        instant[i] = window.iter().copied().sum::<T>() / T::from_usize(span)?;
        if i >= ht_lookback() {
            out[i] = c.weighted4(&instant, i);
        }
    }
    Ok(())
}

/// Computes the Hilbert Transform instantaneous trendline.
///
/// # Errors
///
/// Returns `Error::NumericConversion` if a window length cannot be represented in `T`.
pub fn ht<T: SeriesElement>(data: &[T]) -> Result<Vec<T>> {
    let n = data.len();
    let mut out = nan_vec(n);
    let coefficients = Coefficients::new();
    for run in finite_runs(&[data]) {
        trendline_run(&data[run.clone()], &mut out[run], &coefficients)?;
    }
    Ok(out)
}
