//! Independent reference formulas.
//!
//! Each formula recomputes a kernel the slow, obvious way: every window is
//! re-summed or re-scanned from scratch, so the cost is O(N·period). Recursive
//! smoothers (EMA, Wilder) are recursive by definition and are written out
//! directly. Formulas read their parameters from the same resolved
//! [`ParameterSet`] the kernel receives, so both sides always agree on the
//! configuration under test.
//!
//! Windows containing a NaN produce NaN. Warm-up positions are NaN.

use algo_ta::{ParameterSet, Result};

use crate::data::Ohlcv;

/// Named output columns of a reference formula.
pub type Columns = Vec<(&'static str, Vec<f64>)>;

type Formula = fn(&Ohlcv, &ParameterSet) -> Result<Columns>;

/// A reference formula for one catalogue kernel.
#[derive(Clone, Copy)]
pub struct Reference {
    /// Canonical catalogue name of the kernel.
    pub kernel: &'static str,
    formula: Formula,
}

impl Reference {
    /// Evaluates the formula over `data` with already-resolved parameters.
    ///
    /// # Errors
    ///
    /// Returns `algo_ta::Error` if a parameter the formula needs is missing or
    /// has the wrong type.
    pub fn evaluate(&self, data: &Ohlcv, params: &ParameterSet) -> Result<Columns> {
        (self.formula)(data, params)
    }
}

impl std::fmt::Debug for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference").field("kernel", &self.kernel).finish_non_exhaustive()
    }
}

macro_rules! references {
    ($($kernel:literal => $formula:ident),+ $(,)?) => {
        static REFERENCES: &[Reference] = &[$(Reference { kernel: $kernel, formula: $formula }),+];
    };
}

references! {
    "sma" => sma,
    "ema" => ema,
    "wma" => wma,
    "hma" => hma,
    "alma" => alma,
    "rsi" => rsi,
    "macd" => macd,
    "bbands" => bbands,
    "atr" => atr,
    "stdev" => stdev,
    "variance" => variance,
    "cci" => cci,
    "williams_r" => williams_r,
    "roc" => roc,
    "dpo" => dpo,
    "supertrend" => supertrend,
    "obv" => obv,
    "vwma" => vwma,
    "ulcerindex" => ulcer_index,
    "vi" => vortex,
    "donchian" => donchian,
    "highest" => highest,
    "lowest" => lowest,
    "mfi" => mfi,
}

/// Every reference formula.
#[must_use]
pub fn references() -> &'static [Reference] {
    REFERENCES
}

/// The reference for a canonical kernel name, if one exists.
#[must_use]
pub fn find(kernel: &str) -> Option<&'static Reference> {
    REFERENCES.iter().find(|r| r.kernel == kernel)
}

// ---------------------------------------------------------------------------
// building blocks
// ---------------------------------------------------------------------------

fn nan(n: usize) -> Vec<f64> {
    vec![f64::NAN; n]
}

/// Applies `f` to every complete, NaN-free trailing window.
fn rolling(data: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut out = nan(data.len());
    if period == 0 {
        return out;
    }
    for i in period.saturating_sub(1)..data.len() {
        let window = &data[i + 1 - period..=i];
        if window.iter().all(|v| !v.is_nan()) {
            out[i] = f(window);
        }
    }
    out
}

fn mean(w: &[f64]) -> f64 {
    w.iter().sum::<f64>() / w.len() as f64
}

fn population_variance(w: &[f64]) -> f64 {
    let m = mean(w);
    w.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / w.len() as f64
}

fn max_of(w: &[f64]) -> f64 {
    w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn min_of(w: &[f64]) -> f64 {
    w.iter().copied().fold(f64::INFINITY, f64::min)
}

fn linear_weighted(w: &[f64]) -> f64 {
    let p = w.len() as f64;
    let weighted: f64 = w.iter().enumerate().map(|(k, x)| (k + 1) as f64 * x).sum();
    weighted / (p * (p + 1.0) / 2.0)
}

/// Exponential smoothing seeded with the mean of the first `period` values
/// after any NaN prefix.
fn smooth(data: &[f64], period: usize, alpha: f64) -> Vec<f64> {
    let n = data.len();
    let mut out = nan(n);
    let Some(start) = data.iter().position(|v| !v.is_nan()) else {
        return out;
    };
    let seed_at = start + period - 1;
    if period == 0 || seed_at >= n {
        return out;
    }
    let mut prev = mean(&data[start..=seed_at]);
    out[seed_at] = prev;
    for i in seed_at + 1..n {
        prev += alpha * (data[i] - prev);
        out[i] = prev;
    }
    out
}

fn ema_of(data: &[f64], period: usize) -> Vec<f64> {
    smooth(data, period, 2.0 / (period as f64 + 1.0))
}

fn wilder_of(data: &[f64], period: usize) -> Vec<f64> {
    smooth(data, period, 1.0 / period as f64)
}

fn true_range(d: &Ohlcv) -> Vec<f64> {
    (0..d.len())
        .map(|i| {
            let range = d.high[i] - d.low[i];
            if i == 0 {
                range
            } else {
                let pc = d.close[i - 1];
                range.max((d.high[i] - pc).abs()).max((d.low[i] - pc).abs())
            }
        })
        .collect()
}

fn typical_price(d: &Ohlcv) -> Vec<f64> {
    (0..d.len()).map(|i| (d.high[i] + d.low[i] + d.close[i]) / 3.0).collect()
}

fn zip_map(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

fn one(name: &'static str, values: Vec<f64>) -> Columns {
    vec![(name, values)]
}

// ---------------------------------------------------------------------------
// formulas
// ---------------------------------------------------------------------------

fn sma(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", rolling(&d.close, p.period("period")?, mean)))
}

fn ema(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", ema_of(&d.close, p.period("period")?)))
}

fn wma(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", rolling(&d.close, p.period("period")?, linear_weighted)))
}

fn hma(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let half = (period / 2).max(1);
    let root = ((period as f64).sqrt().floor() as usize).max(1);
    let raw = zip_map(
        &rolling(&d.close, half, linear_weighted),
        &rolling(&d.close, period, linear_weighted),
        |h, f| 2.0 * h - f,
    );
    Ok(one("value", rolling(&raw, root, linear_weighted)))
}

fn alma(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let offset = p.float("offset")?;
    let sigma = p.float("sigma")?;
    let m = offset * (period as f64 - 1.0);
    let s = period as f64 / sigma;
    let weights: Vec<f64> = (0..period)
        .map(|k| (-(k as f64 - m).powi(2) / (2.0 * s * s)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    Ok(one(
        "value",
        rolling(&d.close, period, |w| {
            w.iter().zip(&weights).map(|(x, wt)| x * wt).sum::<f64>() / total
        }),
    ))
}

fn rsi(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let n = d.len();
    let mut gains = nan(n);
    let mut losses = nan(n);
    for i in 1..n {
        let change = d.close[i] - d.close[i - 1];
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }
    let out = zip_map(&wilder_of(&gains, period), &wilder_of(&losses, period), |g, l| {
        if g.is_nan() || l.is_nan() {
            f64::NAN
        } else if l == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        }
    });
    Ok(one("value", out))
}

fn macd(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let line = zip_map(
        &ema_of(&d.close, p.period("fast_period")?),
        &ema_of(&d.close, p.period("slow_period")?),
        |f, s| f - s,
    );
    let signal = ema_of(&line, p.period("signal_period")?);
    let histogram = zip_map(&line, &signal, |l, s| l - s);
    Ok(vec![("macd", line), ("signal", signal), ("histogram", histogram)])
}

fn bbands(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let k = p.float("std_dev")?;
    let middle = rolling(&d.close, period, mean);
    let sd = rolling(&d.close, period, |w| population_variance(w).sqrt());
    let upper = zip_map(&middle, &sd, |m, s| m + k * s);
    let lower = zip_map(&middle, &sd, |m, s| m - k * s);
    Ok(vec![("upper", upper), ("middle", middle), ("lower", lower)])
}

fn atr(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", wilder_of(&true_range(d), p.period("period")?)))
}

fn stdev(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one(
        "value",
        rolling(&d.close, p.period("period")?, |w| population_variance(w).sqrt()),
    ))
}

fn variance(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let lookback = p.period("lookback")?;
    let mode = p.choice::<String>("mode")?.to_ascii_uppercase();
    let series: Vec<f64> = match mode.as_str() {
        "LR" | "PCT" => (0..d.len())
            .map(|i| {
                if i == 0 {
                    return f64::NAN;
                }
                let (prev, cur) = (d.close[i - 1], d.close[i]);
                if mode == "LR" {
                    (cur / prev).ln()
                } else {
                    100.0 * (cur - prev) / prev
                }
            })
            .collect(),
        _ => d.close.clone(),
    };
    Ok(one("value", rolling(&series, lookback, population_variance)))
}

fn cci(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let tp = typical_price(d);
    let out = rolling(&tp, period, |w| {
        let m = mean(w);
        let deviation = w.iter().map(|x| (x - m).abs()).sum::<f64>() / w.len() as f64;
        let last = w[w.len() - 1];
        if deviation == 0.0 {
            0.0
        } else {
            (last - m) / (0.015 * deviation)
        }
    });
    Ok(one("value", out))
}

fn williams_r(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let hh = rolling(&d.high, period, max_of);
    let ll = rolling(&d.low, period, min_of);
    let out = (0..d.len())
        .map(|i| {
            let range = hh[i] - ll[i];
            if range.is_nan() {
                f64::NAN
            } else if range == 0.0 {
                -50.0
            } else {
                -100.0 * (hh[i] - d.close[i]) / range
            }
        })
        .collect();
    Ok(one("value", out))
}

fn roc(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let length = p.period("length")?;
    let mut out = nan(d.len());
    for i in length..d.len() {
        let base = d.close[i - length];
        out[i] = if base == 0.0 { 0.0 } else { 100.0 * (d.close[i] - base) / base };
    }
    Ok(one("value", out))
}

fn dpo(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let centered = p.flag("is_centered")?;
    let shift = period / 2 + 1;
    let average = rolling(&d.close, period, mean);
    let mut out = nan(d.len());
    for i in shift..d.len() {
        out[i] = if centered {
            d.close[i - shift] - average[i]
        } else {
            d.close[i] - average[i - shift]
        };
    }
    Ok(one("value", out))
}

fn supertrend(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let multiplier = p.float("multiplier")?;
    let atr = wilder_of(&true_range(d), period);
    let n = d.len();
    let mut line = nan(n);
    let mut direction = nan(n);
    // (upper, lower, uptrend)
    let mut prev: Option<(f64, f64, bool)> = None;
    for i in 0..n {
        if atr[i].is_nan() {
            prev = None;
            continue;
        }
        let mid = (d.high[i] + d.low[i]) / 2.0;
        let mut upper = mid + multiplier * atr[i];
        let mut lower = mid - multiplier * atr[i];
        let mut uptrend = false;
        if let Some((pu, pl, was_up)) = prev {
            let pc = d.close[i - 1];
            if !(upper < pu || pc > pu) {
                upper = pu;
            }
            if !(lower > pl || pc < pl) {
                lower = pl;
            }
            uptrend = if was_up { d.close[i] >= lower } else { d.close[i] > upper };
        }
        line[i] = if uptrend { lower } else { upper };
        direction[i] = if uptrend { -1.0 } else { 1.0 };
        prev = Some((upper, lower, uptrend));
    }
    Ok(vec![("supertrend", line), ("direction", direction)])
}

fn obv(d: &Ohlcv, _: &ParameterSet) -> Result<Columns> {
    let mut out = Vec::with_capacity(d.len());
    let mut total = 0.0;
    for i in 0..d.len() {
        if i > 0 {
            if d.close[i] > d.close[i - 1] {
                total += d.volume[i];
            } else if d.close[i] < d.close[i - 1] {
                total -= d.volume[i];
            }
        }
        out.push(total);
    }
    Ok(one("value", out))
}

fn vwma(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let mut out = nan(d.len());
    for i in period.saturating_sub(1)..d.len() {
        let range = i + 1 - period..=i;
        let volume: f64 = d.volume[range.clone()].iter().sum();
        out[i] = if volume == 0.0 {
            mean(&d.close[range])
        } else {
            range.map(|j| d.close[j] * d.volume[j]).sum::<f64>() / volume
        };
    }
    Ok(one("value", out))
}

fn ulcer_index(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let length = p.period("length")?;
    let peaks = rolling(&d.close, length, max_of);
    let squared: Vec<f64> = zip_map(&d.close, &peaks, |x, peak| {
        let dd = if peak == 0.0 { 0.0 } else { 100.0 * (x - peak) / peak };
        dd * dd
    });
    Ok(one("value", rolling(&squared, length, |w| mean(w).sqrt())))
}

fn vortex(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let n = d.len();
    let tr = true_range(d);
    let mut plus = nan(n);
    let mut minus = nan(n);
    for i in period..n {
        let range = i + 1 - period..=i;
        let tr_sum: f64 = tr[range.clone()].iter().sum();
        let vm_plus: f64 = range.clone().map(|j| (d.high[j] - d.low[j - 1]).abs()).sum();
        let vm_minus: f64 = range.map(|j| (d.low[j] - d.high[j - 1]).abs()).sum();
        if tr_sum == 0.0 {
            plus[i] = 0.0;
            minus[i] = 0.0;
        } else {
            plus[i] = vm_plus / tr_sum;
            minus[i] = vm_minus / tr_sum;
        }
    }
    Ok(vec![("plus", plus), ("minus", minus)])
}

fn donchian(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let upper = rolling(&d.high, period, max_of);
    let lower = rolling(&d.low, period, min_of);
    let middle = zip_map(&upper, &lower, |u, l| (u + l) / 2.0);
    Ok(vec![("upper", upper), ("middle", middle), ("lower", lower)])
}

fn highest(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", rolling(&d.close, p.period("period")?, max_of)))
}

fn lowest(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    Ok(one("value", rolling(&d.close, p.period("period")?, min_of)))
}

fn mfi(d: &Ohlcv, p: &ParameterSet) -> Result<Columns> {
    let period = p.period("period")?;
    let tp = typical_price(d);
    let mut out = nan(d.len());
    for i in period..d.len() {
        let (mut positive, mut negative) = (0.0, 0.0);
        for j in i + 1 - period..=i {
            let flow = tp[j] * d.volume[j];
            if tp[j] > tp[j - 1] {
                positive += flow;
            } else if tp[j] < tp[j - 1] {
                negative += flow;
            }
        }
        out[i] = if negative == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + positive / negative)
        };
    }
    Ok(one("value", out))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    fn bars(closes: &[f64]) -> Ohlcv {
        Ohlcv::new(
            None,
            closes.to_vec(),
            closes.iter().map(|c| c + 1.0).collect(),
            closes.iter().map(|c| c - 1.0).collect(),
            closes.to_vec(),
            vec![100.0; closes.len()],
        )
        .unwrap()
    }

    fn defaults(kernel: &str) -> ParameterSet {
        let spec = algo_ta::lookup(kernel).unwrap();
        ParameterSet::new().resolve(spec.params).unwrap()
    }

    #[test]
    fn test_every_reference_names_a_catalogue_kernel() {
        for r in references() {
            let spec = algo_ta::lookup(r.kernel).unwrap();
            assert_eq!(spec.name, r.kernel, "references use canonical names");
        }
    }

    #[test]
    fn test_reference_columns_exist_in_kernel_output() {
        let data = bars(&(0..120).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0).collect::<Vec<_>>());
        for r in references() {
            let spec = algo_ta::lookup(r.kernel).unwrap();
            let columns = r.evaluate(&data, &defaults(r.kernel)).unwrap();
            for (name, values) in columns {
                assert!(spec.outputs.contains(&name), "{}.{name}", r.kernel);
                assert_eq!(values.len(), 120);
            }
        }
    }

    #[test]
    fn test_rolling_mean_known_values() {
        let data = bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = sma(&data, &ParameterSet::new().with("period", 3)).unwrap();
        let values = &out[0].1;
        assert!(values[0].is_nan() && values[1].is_nan());
        assert_eq!(&values[2..], &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_smooth_skips_nan_prefix() {
        let out = smooth(&[f64::NAN, f64::NAN, 2.0, 4.0, 6.0], 2, 0.5);
        assert!(out[2].is_nan());
        assert_eq!(out[3], 3.0);
        assert_eq!(out[4], 4.5);
    }

    #[test]
    fn test_obv_reference() {
        let data = bars(&[10.0, 11.0, 11.0, 9.0]);
        let out = obv(&data, &ParameterSet::new()).unwrap();
        assert_eq!(out[0].1, vec![0.0, 100.0, 100.0, 0.0]);
    }

    #[test]
    fn test_find() {
        assert!(find("sma").is_some());
        assert!(find("kst").is_none());
    }
}
