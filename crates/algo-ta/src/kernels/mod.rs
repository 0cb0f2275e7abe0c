//! Rolling-window building blocks shared by the indicator kernels.
//!
//! # Kernels
//!
//! - [`rolling_moments`]: compensated rolling sum, mean, variance and standard deviation
//! - [`rolling_extrema`]: monotonic-deque rolling max/min and bars-since-extreme
//!
//! Every incremental routine ships with an O(n·k) `*_naive` counterpart used
//! by the equivalence tests.

pub mod rolling_extrema;
pub mod rolling_moments;

pub use rolling_extrema::{
    bars_since_max, bars_since_max_naive, bars_since_min, bars_since_min_naive, rolling_extrema,
    rolling_extrema_lookback, rolling_max, rolling_max_naive, rolling_min, rolling_min_naive,
    Extremum, MonotonicDeque, RollingExtremaOutput,
};
pub use rolling_moments::{
    rolling_mean, rolling_stddev, rolling_sum, rolling_sum_naive, rolling_variance,
    rolling_variance_naive, rolling_window_lookback, CompensatedSum, RollingMoments, RollingSum,
    REBASE_INTERVAL,
};
