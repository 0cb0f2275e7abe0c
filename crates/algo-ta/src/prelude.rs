//! Common imports.
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! let close: Vec<f64> = (1..=40).map(f64::from).collect();
//! let direct = rsi(&close, 14).unwrap();
//! let named = compute("rsi", &Inputs::new().with(Role::Close, &close), &ParameterSet::new()).unwrap();
//! assert_eq!(direct[39], named.primary()[39]);
//! ```

pub use crate::adapter::{compute_formatted, with_format, Formatted, Series};
pub use crate::batch::{compute_batch, BatchProcessor, BatchRequest};
pub use crate::engine::{compute, compute_spec};
pub use crate::error::{Error, Result};
pub use crate::indicators::IndicatorOutput;
pub use crate::inputs::{Inputs, Role};
pub use crate::params::{ParamValue, ParameterSet};
pub use crate::registry::{catalog, lookup, Category, IndicatorResult, KernelId, KernelSpec};
pub use crate::traits::SeriesElement;

pub use crate::indicators::momentum::{macd, rsi, stochastic, MacdOutput, StochasticOutput};
pub use crate::indicators::trend::{ema, sma, wma};
pub use crate::indicators::utility::{crossover, crossunder, exrem};
pub use crate::indicators::volatility::{atr, bbands, BandOutput};
