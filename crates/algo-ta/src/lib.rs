//! algo-ta: a catalogue of technical-analysis kernels over numeric series.
//!
//! Every kernel is a pure function from equal-length input slices and scalar
//! parameters to one or more output columns of the same length. Values that
//! cannot be computed yet (warm-up) are NaN; too little history is never an
//! error.
//!
//! # Two ways in
//!
//! Typed calls, straight to the kernel:
//!
//! ```
//! use algo_ta::indicators::trend::sma;
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! let out = sma(&data, 3).unwrap();
//! assert!(out[0].is_nan() && out[1].is_nan());
//! assert!((out[2] - 2.0).abs() < 1e-12);
//! ```
//!
//! Dynamic calls by name, with role-tagged inputs and a parameter map, served
//! by a process-wide compiled-kernel cache:
//!
//! ```
//! use algo_ta::prelude::*;
//!
//! let high = vec![10.0_f64, 11.0, 12.0, 11.5, 12.5, 13.0];
//! let low = vec![9.0_f64, 10.0, 10.5, 10.0, 11.0, 12.0];
//! let close = vec![9.5_f64, 10.5, 11.5, 11.0, 12.0, 12.5];
//! let inputs = Inputs::new()
//!     .with(Role::High, &high)
//!     .with(Role::Low, &low)
//!     .with(Role::Close, &close);
//!
//! let atr = compute("atr", &inputs, &ParameterSet::new().with("period", 3)).unwrap();
//! assert_eq!(atr.len(), 6);
//! ```
//!
//! # Modules
//!
//! - [`indicators`]: the kernels, grouped by category
//! - [`kernels`]: rolling-window building blocks
//! - [`registry`]: the named catalogue and its metadata
//! - [`engine`]: validated dynamic dispatch
//! - [`cache`]: per-kernel, per-dtype compiled entry points
//! - [`adapter`]: labelled and list input with format-preserving output
//! - [`batch`]: many calls at once, in parallel with the `parallel` feature
//!
//! # Errors
//!
//! Validation happens before any computation:
//!
//! ```
//! use algo_ta::indicators::trend::sma;
//! use algo_ta::Error;
//!
//! assert!(matches!(sma(&[1.0_f64, 2.0], 0), Err(Error::InvalidParameter { .. })));
//! // Short input is not an error.
//! assert!(sma(&[1.0_f64, 2.0], 10).unwrap().iter().all(|v| v.is_nan()));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_arguments)]

pub mod adapter;
pub mod batch;
pub mod cache;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod inputs;
pub mod kernels;
pub mod params;
pub mod prelude;
pub mod registry;
pub mod traits;
pub mod utils;

pub use engine::compute;
pub use error::{Error, Result};
pub use inputs::{Inputs, Role};
pub use params::{ParamValue, ParameterSet};
pub use registry::{catalog, lookup, IndicatorResult, KernelId, KernelSpec};
pub use traits::SeriesElement;
