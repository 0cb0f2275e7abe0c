//! Kernel catalogue: names, input roles, parameters and output columns.
//!
//! Every kernel in [`crate::indicators`] has one [`KernelSpec`] here. The
//! catalogue drives the dynamic [`compute`](crate::engine::compute) entry
//! point: roles are checked against [`Inputs`], parameters are resolved
//! against the kernel's [`ParamSpec`] table, and the kernel's output struct is
//! flattened into an [`IndicatorResult`] whose column names are the kernel's
//! `outputs`.
//!
//! ```
//! use algo_ta::registry::{lookup, Category};
//!
//! let spec = lookup("parabolic_sar").unwrap();
//! assert_eq!(spec.name, "psar");
//! assert_eq!(spec.category, Category::Hybrid);
//! ```

use std::fmt;

use crate::error::{Error, Result};
use crate::indicators::hybrid::{
    adx, dmi, fractals, gator_oscillator, pivot_points, psar, zigzag,
};
use crate::indicators::momentum::{
    cci, crsi, elderray, fisher, macd, rsi, stochastic, ultimate_oscillator, williams_r,
};
use crate::indicators::oscillators::{
    accelerator_oscillator, aroon, aroon_oscillator, awesome_oscillator, bop, cho, ckstop, cmo,
    chop, coppock, dpo, ht, kst, po, ppo, roc, stc, stochrsi, trix, tsi, KstLengths,
};
use crate::indicators::statistics::{
    beta, correlation, linreg, lrslope, median, mode, percent_rank, stdev, tsf, variance,
};
use crate::indicators::trend::{
    alligator, alma, dema, ema, frama, hma, ichimoku, kama, ma_envelopes, mcginley, sma,
    supertrend, t3, tema, trima, vidya, vwma, wma, zlema,
};
use crate::indicators::utility::{
    change, cross, crossover, crossunder, exrem, falling, flip, highest, lowest, rising, to_flags,
    valuewhen,
};
use crate::indicators::volatility::{
    atr, bbands, bbpercent, bbwidth, chaikin_volatility, chandelier_exit, donchian, hv, keltner,
    massindex, natr, rvi, rvol, rwi, starc, true_range, ulcer_index, vortex,
};
use crate::indicators::volume::{
    adl, cmf, emv, force_index, kvo, mfi, nvi, obv, pvi, pvt, volosc, vroc, vwap,
};
use crate::indicators::{Flags, IndicatorOutput};
use crate::inputs::{Inputs, Role};
use crate::params::{Domain, ParamSpec, ParameterSet};
use crate::traits::SeriesElement;

/// Catalogue grouping of a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Moving averages and trend composites.
    Trend,
    /// Momentum oscillators.
    Momentum,
    /// Ranges, bands and dispersion.
    Volatility,
    /// Volume-weighted and cumulative volume lines.
    Volume,
    /// Rate-of-change and spread oscillators.
    Oscillator,
    /// Regression, dispersion and order statistics.
    Statistics,
    /// Multi-line systems and swing structure.
    Hybrid,
    /// Comparisons and signal combinators.
    Utility,
}

impl Category {
    /// Every category, in catalogue order.
    pub const ALL: [Self; 8] = [
        Self::Trend,
        Self::Momentum,
        Self::Volatility,
        Self::Volume,
        Self::Oscillator,
        Self::Statistics,
        Self::Hybrid,
        Self::Utility,
    ];

    /// Lower-case category name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::Momentum => "momentum",
            Self::Volatility => "volatility",
            Self::Volume => "volume",
            Self::Oscillator => "oscillator",
            Self::Statistics => "statistics",
            Self::Hybrid => "hybrid",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one catalogue kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelSpec {
    /// Stable identity, used as the cache key.
    pub id: KernelId,
    /// Canonical lower-case name.
    pub name: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Catalogue group.
    pub category: Category,
    /// Required input roles, in kernel argument order.
    pub roles: &'static [Role],
    /// Declared parameters with defaults.
    pub params: &'static [ParamSpec],
    /// Output column names.
    pub outputs: &'static [&'static str],
}

impl KernelSpec {
    /// Returns `true` for kernels producing more than one column.
    #[must_use]
    pub fn is_multi_output(&self) -> bool {
        self.outputs.len() > 1
    }
}

/// Ordered, named output columns of one kernel call.
///
/// Every column has the input length. Boolean kernels report 0/1.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorResult<T> {
    columns: Vec<(&'static str, Vec<T>)>,
}

impl<T: SeriesElement> IndicatorResult<T> {
    /// Flattens a kernel output.
    pub fn from_output<O: IndicatorOutput<T>>(output: O) -> Self {
        Self {
            columns: O::FIELDS
                .iter()
                .copied()
                .zip(output.into_columns())
                .collect(),
        }
    }

    /// Column names in output order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(n, _)| *n)
    }

    /// The column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[T]> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c.as_slice())
    }

    /// The first column.
    #[must_use]
    pub fn primary(&self) -> &[T] {
        self.columns.first().map_or(&[] as &[T], |(_, c)| c.as_slice())
    }

    /// Iterates over `(name, column)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[T])> + '_ {
        self.columns.iter().map(|(n, c)| (*n, c.as_slice()))
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Length shared by every column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Returns `true` if the columns are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the result, yielding its columns.
    #[must_use]
    pub fn into_columns(self) -> Vec<(&'static str, Vec<T>)> {
        self.columns
    }
}

/// Monomorphized kernel entry point.
pub type KernelFn<T> = fn(&Inputs<'_, T>, &ParameterSet) -> Result<IndicatorResult<T>>;

fn finish<T: SeriesElement, O: IndicatorOutput<T>>(output: O) -> Result<IndicatorResult<T>> {
    Ok(IndicatorResult::from_output(output))
}

const VALUE: &[&str] = &["value"];
const BANDS: &[&str] = &["upper", "middle", "lower"];
const STOPS: &[&str] = &["long_stop", "short_stop"];

const P_DATA: &[Role] = &[Role::Data];
const P_HL: &[Role] = &[Role::High, Role::Low];
const P_HLC: &[Role] = &[Role::High, Role::Low, Role::Close];
const P_HLCV: &[Role] = &[Role::High, Role::Low, Role::Close, Role::Volume];
const P_OHLC: &[Role] = &[Role::Open, Role::High, Role::Low, Role::Close];
const P_CV: &[Role] = &[Role::Close, Role::Volume];
const P_PAIR: &[Role] = &[Role::Data, Role::Reference];
const P_SIGNALS: &[Role] = &[Role::Primary, Role::Secondary];

macro_rules! catalogue {
    ($(
        $id:ident => $name:literal, $title:literal, $cat:ident, $roles:expr,
        [$($param:expr),* $(,)?], $outputs:expr;
    )+) => {
        /// Identity of a catalogue kernel.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[allow(missing_docs)]
        pub enum KernelId {
            $($id),+
        }

        static CATALOG: &[KernelSpec] = &[$(
            KernelSpec {
                id: KernelId::$id,
                name: $name,
                title: $title,
                category: Category::$cat,
                roles: $roles,
                params: &[$($param),*],
                outputs: $outputs,
            }
        ),+];
    };
}

catalogue! {
    // trend
    Sma => "sma", "Simple Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Ema => "ema", "Exponential Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Wma => "wma", "Weighted Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Dema => "dema", "Double Exponential Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Tema => "tema", "Triple Exponential Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Hma => "hma", "Hull Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Vwma => "vwma", "Volume Weighted Moving Average", Trend, &[Role::Data, Role::Volume],
        [ParamSpec::period("period", 20)], VALUE;
    Alma => "alma", "Arnaud Legoux Moving Average", Trend, P_DATA, [
        ParamSpec::period("period", 21),
        ParamSpec::float("offset", 0.85, Domain::Closed(0.0, 1.0)),
        ParamSpec::float("sigma", 6.0, Domain::Positive),
    ], VALUE;
    Kama => "kama", "Kaufman Adaptive Moving Average", Trend, P_DATA, [
        ParamSpec::period("length", 14),
        ParamSpec::period("fast_length", 2),
        ParamSpec::period("slow_length", 30),
    ], VALUE;
    Zlema => "zlema", "Zero Lag Exponential Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    T3 => "t3", "T3 Moving Average", Trend, P_DATA, [
        ParamSpec::period("period", 21),
        ParamSpec::float("v_factor", 0.7, Domain::NonNegative),
    ], VALUE;
    Frama => "frama", "Fractal Adaptive Moving Average", Trend, P_HL, [ParamSpec::period("period", 26)], VALUE;
    Trima => "trima", "Triangular Moving Average", Trend, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Vidya => "vidya", "Variable Index Dynamic Average", Trend, P_DATA, [
        ParamSpec::period("period", 14),
        ParamSpec::float("alpha", 0.2, Domain::Positive),
    ], VALUE;
    Mcginley => "mcginley", "McGinley Dynamic", Trend, P_DATA, [ParamSpec::period("period", 14)], VALUE;
    Supertrend => "supertrend", "Supertrend", Trend, P_HLC, [
        ParamSpec::period("period", 10),
        ParamSpec::float("multiplier", 3.0, Domain::Positive),
    ], &["supertrend", "direction"];
    Ichimoku => "ichimoku", "Ichimoku Cloud", Trend, P_HLC, [
        ParamSpec::period("conversion_periods", 9),
        ParamSpec::period("base_periods", 26),
        ParamSpec::period("lagging_span2_periods", 52),
        ParamSpec::count("displacement", 26),
    ], &["conversion", "base", "leading_a", "leading_b", "lagging"];
    Alligator => "alligator", "Williams Alligator", Trend, P_DATA, [
        ParamSpec::period("jaw_period", 13),
        ParamSpec::count("jaw_shift", 8),
        ParamSpec::period("teeth_period", 8),
        ParamSpec::count("teeth_shift", 5),
        ParamSpec::period("lips_period", 5),
        ParamSpec::count("lips_shift", 3),
    ], &["jaw", "teeth", "lips"];
    MaEnvelopes => "ma_envelopes", "Moving Average Envelopes", Trend, P_DATA, [
        ParamSpec::period("period", 20),
        ParamSpec::float("percentage", 2.5, Domain::NonNegative),
        ParamSpec::choice("ma_type", "SMA", &["SMA", "EMA"]),
    ], BANDS;

    // momentum
    Rsi => "rsi", "Relative Strength Index", Momentum, P_DATA, [ParamSpec::period("period", 14)], VALUE;
    Macd => "macd", "Moving Average Convergence Divergence", Momentum, P_DATA, [
        ParamSpec::period("fast_period", 12),
        ParamSpec::period("slow_period", 26),
        ParamSpec::period("signal_period", 9),
    ], &["macd", "signal", "histogram"];
    Stochastic => "stochastic", "Stochastic Oscillator", Momentum, P_HLC, [
        ParamSpec::period("k_period", 14),
        ParamSpec::period("smooth_k", 3),
        ParamSpec::period("d_period", 3),
    ], &["k", "d"];
    Cci => "cci", "Commodity Channel Index", Momentum, P_HLC, [ParamSpec::period("period", 20)], VALUE;
    WilliamsR => "williams_r", "Williams %R", Momentum, P_HLC, [ParamSpec::period("period", 14)], VALUE;
    UltimateOscillator => "ultimate_oscillator", "Ultimate Oscillator", Momentum, P_HLC, [
        ParamSpec::period("period1", 7),
        ParamSpec::period("period2", 14),
        ParamSpec::period("period3", 28),
    ], VALUE;
    Crsi => "crsi", "Connors RSI", Momentum, P_DATA, [
        ParamSpec::period("lenrsi", 3),
        ParamSpec::period("lenupdown", 2),
        ParamSpec::period("lenroc", 100),
    ], VALUE;
    Fisher => "fisher", "Fisher Transform", Momentum, P_HL, [ParamSpec::period("length", 9)], &["fisher", "trigger"];
    ElderRay => "elderray", "Elder Ray Index", Momentum, P_HLC, [ParamSpec::period("period", 13)],
        &["bull_power", "bear_power"];

    // volatility
    Atr => "atr", "Average True Range", Volatility, P_HLC, [ParamSpec::period("period", 14)], VALUE;
    Natr => "natr", "Normalized Average True Range", Volatility, P_HLC, [ParamSpec::period("period", 14)], VALUE;
    TrueRange => "true_range", "True Range", Volatility, P_HLC, [], VALUE;
    Bbands => "bbands", "Bollinger Bands", Volatility, P_DATA, [
        ParamSpec::period("period", 20),
        ParamSpec::float("std_dev", 2.0, Domain::NonNegative),
    ], BANDS;
    Bbpercent => "bbpercent", "Bollinger Bands %B", Volatility, P_DATA, [
        ParamSpec::period("period", 20),
        ParamSpec::float("std_dev", 2.0, Domain::NonNegative),
    ], VALUE;
    Bbwidth => "bbwidth", "Bollinger Bands Width", Volatility, P_DATA, [
        ParamSpec::period("period", 20),
        ParamSpec::float("std_dev", 2.0, Domain::NonNegative),
    ], VALUE;
    Keltner => "keltner", "Keltner Channel", Volatility, P_HLC, [
        ParamSpec::period("ema_period", 20),
        ParamSpec::period("atr_period", 10),
        ParamSpec::float("multiplier", 2.0, Domain::Positive),
    ], BANDS;
    Donchian => "donchian", "Donchian Channel", Volatility, P_HL, [ParamSpec::period("period", 20)], BANDS;
    Starc => "starc", "STARC Bands", Volatility, P_HLC, [
        ParamSpec::period("ma_period", 5),
        ParamSpec::period("atr_period", 15),
        ParamSpec::float("multiplier", 1.33, Domain::Positive),
    ], BANDS;
    UlcerIndex => "ulcerindex", "Ulcer Index", Volatility, P_DATA, [ParamSpec::period("length", 14)], VALUE;
    Hv => "hv", "Historical Volatility", Volatility, &[Role::Close], [
        ParamSpec::period("length", 10),
        ParamSpec::period("annual", 365),
        ParamSpec::period("per", 1),
    ], VALUE;
    ChandelierExit => "chandelier_exit", "Chandelier Exit", Volatility, P_HLC, [
        ParamSpec::period("period", 22),
        ParamSpec::float("multiplier", 3.0, Domain::Positive),
    ], STOPS;
    MassIndex => "massindex", "Mass Index", Volatility, P_HL, [
        ParamSpec::period("length", 10),
        ParamSpec::period("ema_length", 9),
    ], VALUE;
    ChaikinVolatility => "chaikin", "Chaikin Volatility", Volatility, P_HL, [
        ParamSpec::period("ema_period", 10),
        ParamSpec::period("roc_period", 10),
    ], VALUE;
    Rvol => "rvol", "Relative Volume", Volatility, &[Role::Volume], [ParamSpec::period("period", 20)], VALUE;
    Rvi => "rvi", "Relative Vigor Index", Volatility, P_OHLC, [ParamSpec::period("period", 10)], &["rvi", "signal"];
    Vortex => "vi", "Vortex Indicator", Volatility, P_HLC, [ParamSpec::period("period", 14)], &["plus", "minus"];
    Rwi => "rwi", "Random Walk Index", Volatility, P_HLC, [ParamSpec::period("period", 14)], &["high", "low"];

    // volume
    Obv => "obv", "On Balance Volume", Volume, P_CV, [], VALUE;
    Vwap => "vwap", "Volume Weighted Average Price", Volume, P_HLCV, [], VALUE;
    Mfi => "mfi", "Money Flow Index", Volume, P_HLCV, [ParamSpec::period("period", 14)], VALUE;
    Adl => "adl", "Accumulation/Distribution Line", Volume, P_HLCV, [], VALUE;
    Cmf => "cmf", "Chaikin Money Flow", Volume, P_HLCV, [ParamSpec::period("period", 20)], VALUE;
    Kvo => "kvo", "Klinger Volume Oscillator", Volume, P_HLCV, [
        ParamSpec::period("trig_len", 13),
        ParamSpec::period("fast_x", 34),
        ParamSpec::period("slow_x", 55),
    ], &["kvo", "signal"];
    Emv => "emv", "Ease of Movement", Volume, &[Role::High, Role::Low, Role::Volume], [
        ParamSpec::period("length", 14),
        ParamSpec::float("divisor", 10000.0, Domain::Positive),
    ], VALUE;
    ForceIndex => "force_index", "Force Index", Volume, P_CV, [ParamSpec::period("length", 13)], VALUE;
    Nvi => "nvi", "Negative Volume Index", Volume, P_CV, [
        ParamSpec::float("initial_value", 1000.0, Domain::Positive),
    ], VALUE;
    Pvi => "pvi", "Positive Volume Index", Volume, P_CV, [
        ParamSpec::float("initial_value", 100.0, Domain::Positive),
    ], VALUE;
    Pvt => "pvt", "Price Volume Trend", Volume, P_CV, [], VALUE;
    Volosc => "volosc", "Volume Oscillator", Volume, &[Role::Volume], [
        ParamSpec::period("short_length", 5),
        ParamSpec::period("long_length", 10),
    ], VALUE;
    Vroc => "vroc", "Volume Rate of Change", Volume, &[Role::Volume], [ParamSpec::period("period", 25)], VALUE;

    // oscillators
    Roc => "roc", "Rate of Change", Oscillator, P_DATA, [ParamSpec::period("length", 10)], VALUE;
    Cmo => "cmo", "Chande Momentum Oscillator", Oscillator, P_DATA, [ParamSpec::period("period", 14)], VALUE;
    Trix => "trix", "TRIX", Oscillator, P_DATA, [ParamSpec::period("length", 18)], VALUE;
    Ppo => "ppo", "Percentage Price Oscillator", Oscillator, P_DATA, [
        ParamSpec::period("fast_period", 12),
        ParamSpec::period("slow_period", 26),
        ParamSpec::period("signal_period", 9),
    ], &["ppo", "signal", "histogram"];
    Po => "po", "Price Oscillator", Oscillator, P_DATA, [
        ParamSpec::period("fast_period", 12),
        ParamSpec::period("slow_period", 26),
        ParamSpec::choice("ma_type", "SMA", &["SMA", "EMA"]),
    ], VALUE;
    Dpo => "dpo", "Detrended Price Oscillator", Oscillator, P_DATA, [
        ParamSpec::period("period", 21),
        ParamSpec::flag("is_centered", false),
    ], VALUE;
    AwesomeOscillator => "awesome_oscillator", "Awesome Oscillator", Oscillator, P_HL, [
        ParamSpec::period("fast_period", 5),
        ParamSpec::period("slow_period", 34),
    ], VALUE;
    AcceleratorOscillator => "accelerator_oscillator", "Accelerator Oscillator", Oscillator, P_HL,
        [ParamSpec::period("period", 5)], VALUE;
    StochRsi => "stochrsi", "Stochastic RSI", Oscillator, P_DATA, [
        ParamSpec::period("rsi_period", 14),
        ParamSpec::period("stoch_period", 14),
        ParamSpec::period("k_period", 3),
        ParamSpec::period("d_period", 3),
    ], &["k", "d"];
    Tsi => "tsi", "True Strength Index", Oscillator, P_DATA, [
        ParamSpec::period("long_period", 25),
        ParamSpec::period("short_period", 13),
        ParamSpec::period("signal_period", 13),
    ], &["tsi", "signal"];
    Chop => "chop", "Choppiness Index", Oscillator, P_HLC, [ParamSpec::period("period", 14)], VALUE;
    Aroon => "aroon", "Aroon", Oscillator, P_HL, [ParamSpec::period("period", 25)], &["up", "down"];
    AroonOscillator => "aroon_oscillator", "Aroon Oscillator", Oscillator, P_HL, [ParamSpec::period("period", 25)], VALUE;
    Bop => "bop", "Balance of Power", Oscillator, P_OHLC, [], VALUE;
    Ht => "ht", "Hilbert Transform Instantaneous Trendline", Oscillator, P_DATA, [], VALUE;
    Cho => "cho", "Chaikin Oscillator", Oscillator, P_HLCV, [
        ParamSpec::period("fast_period", 3),
        ParamSpec::period("slow_period", 10),
    ], VALUE;
    CkStop => "ckstop", "Chande Kroll Stop", Oscillator, P_HLC, [
        ParamSpec::period("p", 10),
        ParamSpec::float("x", 1.0, Domain::Positive),
        ParamSpec::period("q", 9),
    ], STOPS;
    Kst => "kst", "Know Sure Thing", Oscillator, P_DATA, [
        ParamSpec::period("roclen1", 10),
        ParamSpec::period("roclen2", 15),
        ParamSpec::period("roclen3", 20),
        ParamSpec::period("roclen4", 30),
        ParamSpec::period("smalen1", 10),
        ParamSpec::period("smalen2", 10),
        ParamSpec::period("smalen3", 10),
        ParamSpec::period("smalen4", 15),
        ParamSpec::period("siglen", 9),
    ], &["kst", "signal"];
    Stc => "stc", "Schaff Trend Cycle", Oscillator, P_DATA, [
        ParamSpec::period("fast_length", 23),
        ParamSpec::period("slow_length", 50),
        ParamSpec::period("cycle_length", 10),
        ParamSpec::period("d1_length", 3),
        ParamSpec::period("d2_length", 3),
    ], VALUE;
    Coppock => "coppock", "Coppock Curve", Oscillator, P_DATA, [
        ParamSpec::period("wma_length", 10),
        ParamSpec::period("long_roc_length", 14),
        ParamSpec::period("short_roc_length", 11),
    ], VALUE;

    // statistics
    Linreg => "linreg", "Linear Regression", Statistics, P_DATA, [ParamSpec::period("period", 14)], VALUE;
    Lrslope => "lrslope", "Linear Regression Slope", Statistics, P_DATA, [
        ParamSpec::period("period", 100),
        ParamSpec::period("interval", 1),
    ], VALUE;
    Correlation => "correlation", "Correlation", Statistics, P_PAIR, [ParamSpec::period("period", 20)], VALUE;
    Beta => "beta", "Beta Coefficient", Statistics, P_PAIR, [ParamSpec::period("period", 252)], VALUE;
    Variance => "variance", "Variance", Statistics, P_DATA, [
        ParamSpec::period("lookback", 20),
        ParamSpec::choice("mode", "PR", &["PR", "LR", "PCT"]),
    ], VALUE;
    Stdev => "stdev", "Standard Deviation", Statistics, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Tsf => "tsf", "Time Series Forecast", Statistics, P_DATA, [ParamSpec::period("period", 14)], VALUE;
    Median => "median", "Median", Statistics, P_DATA, [ParamSpec::period("period", 3)], VALUE;
    Mode => "mode", "Mode", Statistics, P_DATA, [
        ParamSpec::period("period", 20),
        ParamSpec::period("bins", 10),
    ], VALUE;
    PercentRank => "percent_rank", "Percent Rank", Statistics, P_DATA, [ParamSpec::period("length", 100)], VALUE;

    // hybrid
    Adx => "adx", "Average Directional Index", Hybrid, P_HLC, [ParamSpec::period("period", 14)],
        &["di_plus", "di_minus", "adx"];
    Dmi => "dmi", "Directional Movement Index", Hybrid, P_HLC, [ParamSpec::period("period", 14)],
        &["di_plus", "di_minus"];
    Psar => "psar", "Parabolic SAR", Hybrid, P_HL, [
        ParamSpec::float("acceleration", 0.02, Domain::Positive),
        ParamSpec::float("maximum", 0.2, Domain::Positive),
    ], VALUE;
    PivotPoints => "pivot_points", "Pivot Points", Hybrid, P_HLC, [],
        &["pivot", "r1", "s1", "r2", "s2", "r3", "s3"];
    Fractals => "fractals", "Williams Fractals", Hybrid, P_HL, [ParamSpec::period("periods", 2)], &["up", "down"];
    Zigzag => "zigzag", "Zig Zag", Hybrid, P_HLC, [
        ParamSpec::float("deviation", 5.0, Domain::Open(0.0, 100.0)),
    ], &["line", "direction"];
    GatorOscillator => "gator_oscillator", "Gator Oscillator", Hybrid, P_HL, [
        ParamSpec::period("jaw_period", 13),
        ParamSpec::period("teeth_period", 8),
        ParamSpec::period("lips_period", 5),
    ], &["upper", "lower"];

    // utility
    Crossover => "crossover", "Crossover", Utility, P_PAIR, [], VALUE;
    Crossunder => "crossunder", "Crossunder", Utility, P_PAIR, [], VALUE;
    Cross => "cross", "Cross", Utility, P_PAIR, [], VALUE;
    Highest => "highest", "Highest", Utility, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Lowest => "lowest", "Lowest", Utility, P_DATA, [ParamSpec::period("period", 20)], VALUE;
    Change => "change", "Change", Utility, P_DATA, [ParamSpec::period("length", 1)], VALUE;
    Rising => "rising", "Rising", Utility, P_DATA, [ParamSpec::period("length", 5)], VALUE;
    Falling => "falling", "Falling", Utility, P_DATA, [ParamSpec::period("length", 5)], VALUE;
    Exrem => "exrem", "Excess Removal", Utility, P_SIGNALS, [], VALUE;
    Flip => "flip", "Flip", Utility, P_SIGNALS, [], VALUE;
    ValueWhen => "valuewhen", "Value When", Utility, &[Role::Condition, Role::Data],
        [ParamSpec::period("n", 1)], VALUE;
}

const ALIASES: &[(&str, &str)] = &[
    ("stddev", "stdev"),
    ("parabolic_sar", "psar"),
    ("roc_oscillator", "roc"),
    ("uo_oscillator", "ultimate_oscillator"),
    ("adx_system", "adx"),
];

/// Every catalogue kernel, grouped by category.
#[must_use]
pub fn catalog() -> &'static [KernelSpec] {
    CATALOG
}

/// Finds a kernel by name or alias, ignoring ASCII case.
///
/// # Errors
///
/// Returns `Error::UnknownIndicator` if nothing matches.
pub fn lookup(name: &str) -> Result<&'static KernelSpec> {
    let key = name.trim().to_ascii_lowercase();
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key.as_str(), |(_, target)| *target);
    CATALOG
        .iter()
        .find(|s| s.name == canonical)
        .ok_or_else(|| Error::UnknownIndicator {
            name: name.to_string(),
        })
}

impl KernelId {
    /// The catalogue entry for this kernel.
    #[must_use]
    pub fn spec(self) -> &'static KernelSpec {
        // CATALOG is generated in declaration order.
        &CATALOG[self as usize]
    }
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// Resolves the monomorphized entry point for `id`.
#[allow(clippy::too_many_lines)]
pub(crate) fn entry<T: SeriesElement>(id: KernelId) -> KernelFn<T> {
    match id {
        KernelId::Sma => |i, p| finish(sma(i.data()?, p.period("period")?)?),
        KernelId::Ema => |i, p| finish(ema(i.data()?, p.period("period")?)?),
        KernelId::Wma => |i, p| finish(wma(i.data()?, p.period("period")?)?),
        KernelId::Dema => |i, p| finish(dema(i.data()?, p.period("period")?)?),
        KernelId::Tema => |i, p| finish(tema(i.data()?, p.period("period")?)?),
        KernelId::Hma => |i, p| finish(hma(i.data()?, p.period("period")?)?),
        KernelId::Vwma => |i, p| finish(vwma(i.data()?, i.volume()?, p.period("period")?)?),
        KernelId::Alma => |i, p| {
            finish(alma(
                i.data()?,
                p.period("period")?,
                p.float("offset")?,
                p.float("sigma")?,
            )?)
        },
        KernelId::Kama => |i, p| {
            finish(kama(
                i.data()?,
                p.period("length")?,
                p.period("fast_length")?,
                p.period("slow_length")?,
            )?)
        },
        KernelId::Zlema => |i, p| finish(zlema(i.data()?, p.period("period")?)?),
        KernelId::T3 => |i, p| finish(t3(i.data()?, p.period("period")?, p.float("v_factor")?)?),
        KernelId::Frama => |i, p| finish(frama(i.high()?, i.low()?, p.period("period")?)?),
        KernelId::Trima => |i, p| finish(trima(i.data()?, p.period("period")?)?),
        KernelId::Vidya => |i, p| finish(vidya(i.data()?, p.period("period")?, p.float("alpha")?)?),
        KernelId::Mcginley => |i, p| finish(mcginley(i.data()?, p.period("period")?)?),
        KernelId::Supertrend => |i, p| {
            finish(supertrend(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("period")?,
                p.float("multiplier")?,
            )?)
        },
        KernelId::Ichimoku => |i, p| {
            finish(ichimoku(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("conversion_periods")?,
                p.period("base_periods")?,
                p.period("lagging_span2_periods")?,
                p.usize("displacement")?,
            )?)
        },
        KernelId::Alligator => |i, p| {
            finish(alligator(
                i.data()?,
                p.period("jaw_period")?,
                p.usize("jaw_shift")?,
                p.period("teeth_period")?,
                p.usize("teeth_shift")?,
                p.period("lips_period")?,
                p.usize("lips_shift")?,
            )?)
        },
        KernelId::MaEnvelopes => |i, p| {
            finish(ma_envelopes(
                i.data()?,
                p.period("period")?,
                p.float("percentage")?,
                p.choice("ma_type")?,
            )?)
        },

        KernelId::Rsi => |i, p| finish(rsi(i.data()?, p.period("period")?)?),
        KernelId::Macd => |i, p| {
            finish(macd(
                i.data()?,
                p.period("fast_period")?,
                p.period("slow_period")?,
                p.period("signal_period")?,
            )?)
        },
        KernelId::Stochastic => |i, p| {
            finish(stochastic(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("k_period")?,
                p.period("smooth_k")?,
                p.period("d_period")?,
            )?)
        },
        KernelId::Cci => |i, p| finish(cci(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::WilliamsR => |i, p| {
            finish(williams_r(i.high()?, i.low()?, i.close()?, p.period("period")?)?)
        },
        KernelId::UltimateOscillator => |i, p| {
            finish(ultimate_oscillator(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("period1")?,
                p.period("period2")?,
                p.period("period3")?,
            )?)
        },
        KernelId::Crsi => |i, p| {
            finish(crsi(
                i.data()?,
                p.period("lenrsi")?,
                p.period("lenupdown")?,
                p.period("lenroc")?,
            )?)
        },
        KernelId::Fisher => |i, p| finish(fisher(i.high()?, i.low()?, p.period("length")?)?),
        KernelId::ElderRay => |i, p| {
            finish(elderray(i.high()?, i.low()?, i.close()?, p.period("period")?)?)
        },

        KernelId::Atr => |i, p| finish(atr(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::Natr => |i, p| finish(natr(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::TrueRange => |i, _| finish(true_range(i.high()?, i.low()?, i.close()?)?),
        KernelId::Bbands => |i, p| {
            finish(bbands(i.data()?, p.period("period")?, p.float("std_dev")?)?)
        },
        KernelId::Bbpercent => |i, p| {
            finish(bbpercent(i.data()?, p.period("period")?, p.float("std_dev")?)?)
        },
        KernelId::Bbwidth => |i, p| {
            finish(bbwidth(i.data()?, p.period("period")?, p.float("std_dev")?)?)
        },
        KernelId::Keltner => |i, p| {
            finish(keltner(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("ema_period")?,
                p.period("atr_period")?,
                p.float("multiplier")?,
            )?)
        },
        KernelId::Donchian => |i, p| finish(donchian(i.high()?, i.low()?, p.period("period")?)?),
        KernelId::Starc => |i, p| {
            finish(starc(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("ma_period")?,
                p.period("atr_period")?,
                p.float("multiplier")?,
            )?)
        },
        KernelId::UlcerIndex => |i, p| finish(ulcer_index(i.data()?, p.period("length")?)?),
        KernelId::Hv => |i, p| {
            finish(hv(
                i.close()?,
                p.period("length")?,
                p.period("annual")?,
                p.period("per")?,
            )?)
        },
        KernelId::ChandelierExit => |i, p| {
            finish(chandelier_exit(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("period")?,
                p.float("multiplier")?,
            )?)
        },
        KernelId::MassIndex => |i, p| {
            finish(massindex(
                i.high()?,
                i.low()?,
                p.period("length")?,
                p.period("ema_length")?,
            )?)
        },
        KernelId::ChaikinVolatility => |i, p| {
            finish(chaikin_volatility(
                i.high()?,
                i.low()?,
                p.period("ema_period")?,
                p.period("roc_period")?,
            )?)
        },
        KernelId::Rvol => |i, p| finish(rvol(i.volume()?, p.period("period")?)?),
        KernelId::Rvi => |i, p| {
            finish(rvi(i.open()?, i.high()?, i.low()?, i.close()?, p.period("period")?)?)
        },
        KernelId::Vortex => |i, p| finish(vortex(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::Rwi => |i, p| finish(rwi(i.high()?, i.low()?, i.close()?, p.period("period")?)?),

        KernelId::Obv => |i, _| finish(obv(i.close()?, i.volume()?)?),
        KernelId::Vwap => |i, _| finish(vwap(i.high()?, i.low()?, i.close()?, i.volume()?)?),
        KernelId::Mfi => |i, p| {
            finish(mfi(i.high()?, i.low()?, i.close()?, i.volume()?, p.period("period")?)?)
        },
        KernelId::Adl => |i, _| finish(adl(i.high()?, i.low()?, i.close()?, i.volume()?)?),
        KernelId::Cmf => |i, p| {
            finish(cmf(i.high()?, i.low()?, i.close()?, i.volume()?, p.period("period")?)?)
        },
        KernelId::Kvo => |i, p| {
            finish(kvo(
                i.high()?,
                i.low()?,
                i.close()?,
                i.volume()?,
                p.period("trig_len")?,
                p.period("fast_x")?,
                p.period("slow_x")?,
            )?)
        },
        KernelId::Emv => |i, p| {
            finish(emv(
                i.high()?,
                i.low()?,
                i.volume()?,
                p.period("length")?,
                p.float("divisor")?,
            )?)
        },
        KernelId::ForceIndex => |i, p| {
            finish(force_index(i.close()?, i.volume()?, p.period("length")?)?)
        },
        KernelId::Nvi => |i, p| finish(nvi(i.close()?, i.volume()?, p.float("initial_value")?)?),
        KernelId::Pvi => |i, p| finish(pvi(i.close()?, i.volume()?, p.float("initial_value")?)?),
        KernelId::Pvt => |i, _| finish(pvt(i.close()?, i.volume()?)?),
        KernelId::Volosc => |i, p| {
            finish(volosc(
                i.volume()?,
                p.period("short_length")?,
                p.period("long_length")?,
            )?)
        },
        KernelId::Vroc => |i, p| finish(vroc(i.volume()?, p.period("period")?)?),

        KernelId::Roc => |i, p| finish(roc(i.data()?, p.period("length")?)?),
        KernelId::Cmo => |i, p| finish(cmo(i.data()?, p.period("period")?)?),
        KernelId::Trix => |i, p| finish(trix(i.data()?, p.period("length")?)?),
        KernelId::Ppo => |i, p| {
            finish(ppo(
                i.data()?,
                p.period("fast_period")?,
                p.period("slow_period")?,
                p.period("signal_period")?,
            )?)
        },
        KernelId::Po => |i, p| {
            finish(po(
                i.data()?,
                p.period("fast_period")?,
                p.period("slow_period")?,
                p.choice("ma_type")?,
            )?)
        },
        KernelId::Dpo => |i, p| {
            finish(dpo(i.data()?, p.period("period")?, p.flag("is_centered")?)?)
        },
        KernelId::AwesomeOscillator => |i, p| {
            finish(awesome_oscillator(
                i.high()?,
                i.low()?,
                p.period("fast_period")?,
                p.period("slow_period")?,
            )?)
        },
        KernelId::AcceleratorOscillator => |i, p| {
            finish(accelerator_oscillator(i.high()?, i.low()?, p.period("period")?)?)
        },
        KernelId::StochRsi => |i, p| {
            finish(stochrsi(
                i.data()?,
                p.period("rsi_period")?,
                p.period("stoch_period")?,
                p.period("k_period")?,
                p.period("d_period")?,
            )?)
        },
        KernelId::Tsi => |i, p| {
            finish(tsi(
                i.data()?,
                p.period("long_period")?,
                p.period("short_period")?,
                p.period("signal_period")?,
            )?)
        },
        KernelId::Chop => |i, p| finish(chop(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::Aroon => |i, p| finish(aroon(i.high()?, i.low()?, p.period("period")?)?),
        KernelId::AroonOscillator => |i, p| {
            finish(aroon_oscillator(i.high()?, i.low()?, p.period("period")?)?)
        },
        KernelId::Bop => |i, _| finish(bop(i.open()?, i.high()?, i.low()?, i.close()?)?),
        KernelId::Ht => |i, _| finish(ht(i.data()?)?),
        KernelId::Cho => |i, p| {
            finish(cho(
                i.high()?,
                i.low()?,
                i.close()?,
                i.volume()?,
                p.period("fast_period")?,
                p.period("slow_period")?,
            )?)
        },
        KernelId::CkStop => |i, p| {
            finish(ckstop(
                i.high()?,
                i.low()?,
                i.close()?,
                p.period("p")?,
                p.float("x")?,
                p.period("q")?,
            )?)
        },
        KernelId::Kst => |i, p| {
            let lengths = KstLengths {
                roc: [
                    p.period("roclen1")?,
                    p.period("roclen2")?,
                    p.period("roclen3")?,
                    p.period("roclen4")?,
                ],
                sma: [
                    p.period("smalen1")?,
                    p.period("smalen2")?,
                    p.period("smalen3")?,
                    p.period("smalen4")?,
                ],
            };
            finish(kst(i.data()?, lengths, p.period("siglen")?)?)
        },
        KernelId::Stc => |i, p| {
            finish(stc(
                i.data()?,
                p.period("fast_length")?,
                p.period("slow_length")?,
                p.period("cycle_length")?,
                p.period("d1_length")?,
                p.period("d2_length")?,
            )?)
        },
        KernelId::Coppock => |i, p| {
            finish(coppock(
                i.data()?,
                p.period("wma_length")?,
                p.period("long_roc_length")?,
                p.period("short_roc_length")?,
            )?)
        },

        KernelId::Linreg => |i, p| finish(linreg(i.data()?, p.period("period")?)?),
        KernelId::Lrslope => |i, p| {
            finish(lrslope(i.data()?, p.period("period")?, p.period("interval")?)?)
        },
        KernelId::Correlation => |i, p| {
            finish(correlation(i.data()?, i.role(Role::Reference)?, p.period("period")?)?)
        },
        KernelId::Beta => |i, p| {
            finish(beta(i.data()?, i.role(Role::Reference)?, p.period("period")?)?)
        },
        KernelId::Variance => |i, p| {
            finish(variance(i.data()?, p.period("lookback")?, p.choice("mode")?)?)
        },
        KernelId::Stdev => |i, p| finish(stdev(i.data()?, p.period("period")?)?),
        KernelId::Tsf => |i, p| finish(tsf(i.data()?, p.period("period")?)?),
        KernelId::Median => |i, p| finish(median(i.data()?, p.period("period")?)?),
        KernelId::Mode => |i, p| finish(mode(i.data()?, p.period("period")?, p.period("bins")?)?),
        KernelId::PercentRank => |i, p| finish(percent_rank(i.data()?, p.period("length")?)?),

        KernelId::Adx => |i, p| finish(adx(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::Dmi => |i, p| finish(dmi(i.high()?, i.low()?, i.close()?, p.period("period")?)?),
        KernelId::Psar => |i, p| {
            finish(psar(
                i.high()?,
                i.low()?,
                p.float("acceleration")?,
                p.float("maximum")?,
            )?)
        },
        KernelId::PivotPoints => |i, _| finish(pivot_points(i.high()?, i.low()?, i.close()?)?),
        KernelId::Fractals => |i, p| finish(fractals(i.high()?, i.low()?, p.period("periods")?)?),
        KernelId::Zigzag => |i, p| {
            finish(zigzag(i.high()?, i.low()?, i.close()?, p.float("deviation")?)?)
        },
        KernelId::GatorOscillator => |i, p| {
            finish(gator_oscillator(
                i.high()?,
                i.low()?,
                p.period("jaw_period")?,
                p.period("teeth_period")?,
                p.period("lips_period")?,
            )?)
        },

        KernelId::Crossover => |i, _| finish(Flags(crossover(i.data()?, i.role(Role::Reference)?)?)),
        KernelId::Crossunder => |i, _| finish(Flags(crossunder(i.data()?, i.role(Role::Reference)?)?)),
        KernelId::Cross => |i, _| finish(Flags(cross(i.data()?, i.role(Role::Reference)?)?)),
        KernelId::Highest => |i, p| finish(highest(i.data()?, p.period("period")?)?),
        KernelId::Lowest => |i, p| finish(lowest(i.data()?, p.period("period")?)?),
        KernelId::Change => |i, p| finish(change(i.data()?, p.period("length")?)?),
        KernelId::Rising => |i, p| finish(Flags(rising(i.data()?, p.period("length")?)?)),
        KernelId::Falling => |i, p| finish(Flags(falling(i.data()?, p.period("length")?)?)),
        KernelId::Exrem => |i, _| {
            let primary = to_flags(i.role(Role::Primary)?);
            let secondary = to_flags(i.role(Role::Secondary)?);
            finish(Flags(exrem(&primary, &secondary)?))
        },
        KernelId::Flip => |i, _| {
            let primary = to_flags(i.role(Role::Primary)?);
            let secondary = to_flags(i.role(Role::Secondary)?);
            finish(Flags(flip(&primary, &secondary)?))
        },
        KernelId::ValueWhen => |i, p| {
            let condition = to_flags(i.role(Role::Condition)?);
            finish(valuewhen(&condition, i.data()?, p.period("n")?)?)
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_matches_ids() {
        for (i, spec) in catalog().iter().enumerate() {
            assert_eq!(spec.id as usize, i, "{}", spec.name);
            assert_eq!(spec.id.spec().name, spec.name);
        }
    }

    #[test]
    fn test_catalog_names_unique() {
        let names: HashSet<_> = catalog().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), catalog().len());
        assert!(catalog().len() >= 100);
    }

    #[test]
    fn test_every_category_populated() {
        for cat in Category::ALL {
            assert!(catalog().iter().any(|s| s.category == cat), "{cat}");
        }
    }

    #[test]
    fn test_lookup_aliases_and_case() {
        assert_eq!(lookup("STDDEV").unwrap().name, "stdev");
        assert_eq!(lookup("parabolic_sar").unwrap().name, "psar");
        assert_eq!(lookup("roc_oscillator").unwrap().name, "roc");
        assert_eq!(lookup("uo_oscillator").unwrap().name, "ultimate_oscillator");
        assert_eq!(lookup(" adx_system ").unwrap().name, "adx");
        assert_eq!(lookup("Sma").unwrap().id, KernelId::Sma);
        assert!(matches!(lookup("nope"), Err(Error::UnknownIndicator { .. })));
    }

    #[test]
    fn test_defaults_resolve_for_every_kernel() {
        for spec in catalog() {
            ParameterSet::new()
                .resolve(spec.params)
                .unwrap_or_else(|e| panic!("{}: {e}", spec.name));
        }
    }
}
