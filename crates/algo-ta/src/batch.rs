//! Many kernels, or many series, in one call.
//!
//! With the default `parallel` feature the work is spread over Rayon's global
//! pool; without it the same functions run sequentially and return identical
//! results.
//!
//! ```
//! use algo_ta::batch::{compute_batch, BatchRequest};
//! use algo_ta::inputs::{Inputs, Role};
//! use algo_ta::params::ParameterSet;
//!
//! let close: Vec<f64> = (0..100).map(|i| 100.0 + (i as f64).sin()).collect();
//! let inputs = Inputs::new().with(Role::Close, &close);
//!
//! let requests = vec![
//!     BatchRequest::new("sma", inputs, ParameterSet::new().with("period", 10)),
//!     BatchRequest::new("rsi", inputs, ParameterSet::new()),
//!     BatchRequest::new("nope", inputs, ParameterSet::new()),
//! ];
//! let results = compute_batch(&requests);
//! assert!(results[0].is_ok() && results[1].is_ok());
//! assert!(results[2].is_err());
//! ```

use crate::engine::compute;
use crate::error::Result;
use crate::inputs::Inputs;
use crate::params::ParameterSet;
use crate::registry::IndicatorResult;
use crate::traits::SeriesElement;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One named kernel call.
#[derive(Debug, Clone)]
pub struct BatchRequest<'a, T> {
    /// Kernel name or alias.
    pub name: String,
    /// Bound input roles.
    pub inputs: Inputs<'a, T>,
    /// Parameter overrides.
    pub params: ParameterSet,
}

impl<'a, T: SeriesElement> BatchRequest<'a, T> {
    /// Builds a request.
    #[must_use]
    pub fn new(name: impl Into<String>, inputs: Inputs<'a, T>, params: ParameterSet) -> Self {
        Self {
            name: name.into(),
            inputs,
            params,
        }
    }

    /// Runs this request on the calling thread.
    ///
    /// # Errors
    ///
    /// As [`compute`].
    pub fn run(&self) -> Result<IndicatorResult<T>> {
        compute(&self.name, &self.inputs, &self.params)
    }
}

/// Runs every request; each result is independent of the others' failures.
///
/// Results are returned in request order.
#[cfg(feature = "parallel")]
#[must_use]
pub fn compute_batch<T>(requests: &[BatchRequest<'_, T>]) -> Vec<Result<IndicatorResult<T>>>
where
    T: SeriesElement + Send + Sync,
{
    requests.par_iter().map(BatchRequest::run).collect()
}

/// Runs every request; each result is independent of the others' failures.
#[cfg(not(feature = "parallel"))]
#[must_use]
pub fn compute_batch<T: SeriesElement>(
    requests: &[BatchRequest<'_, T>],
) -> Vec<Result<IndicatorResult<T>>> {
    requests.iter().map(BatchRequest::run).collect()
}

/// Applies one indicator function across many series.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Below this many series the work stays on the calling thread.
    min_parallel_threshold: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Processor with a threshold of 8 series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_threshold: 8,
        }
    }

    /// Sets the minimum number of series that triggers parallel execution.
    #[must_use]
    pub const fn min_parallel_threshold(mut self, threshold: usize) -> Self {
        self.min_parallel_threshold = threshold;
        self
    }

    /// Applies `indicator_fn` to every series, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `indicator_fn`.
    #[cfg(feature = "parallel")]
    pub fn process<T, F, R>(&self, series: &[&[T]], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement + Send + Sync,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        if series.len() < self.min_parallel_threshold {
            series.iter().map(|s| indicator_fn(s)).collect()
        } else {
            series.par_iter().map(|s| indicator_fn(s)).collect()
        }
    }

    /// Applies `indicator_fn` to every series, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `indicator_fn`.
    #[cfg(not(feature = "parallel"))]
    pub fn process<T, F, R>(&self, series: &[&[T]], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R>,
    {
        series.iter().map(|s| indicator_fn(s)).collect()
    }

    /// Computes the named kernel once per input set.
    ///
    /// # Errors
    ///
    /// Returns the first failure, e.g. an unknown name or invalid parameter.
    #[cfg(feature = "parallel")]
    pub fn process_named<T>(
        &self,
        name: &str,
        inputs: &[Inputs<'_, T>],
        params: &ParameterSet,
    ) -> Result<Vec<IndicatorResult<T>>>
    where
        T: SeriesElement + Send + Sync,
    {
        if inputs.len() < self.min_parallel_threshold {
            inputs.iter().map(|i| compute(name, i, params)).collect()
        } else {
            inputs.par_iter().map(|i| compute(name, i, params)).collect()
        }
    }

    /// Computes the named kernel once per input set.
    ///
    /// # Errors
    ///
    /// Returns the first failure, e.g. an unknown name or invalid parameter.
    #[cfg(not(feature = "parallel"))]
    pub fn process_named<T: SeriesElement>(
        &self,
        name: &str,
        inputs: &[Inputs<'_, T>],
        params: &ParameterSet,
    ) -> Result<Vec<IndicatorResult<T>>> {
        inputs.iter().map(|i| compute(name, i, params)).collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::error::Error;
    use crate::indicators::trend::sma;
    use crate::inputs::Role;

    fn ramps(count: usize, len: usize) -> Vec<Vec<f64>> {
        (0..count)
            .map(|i| (0..len).map(|j| (i * len + j) as f64).collect())
            .collect()
    }

    #[test]
    fn test_process_sequential_and_parallel_agree() {
        let data = ramps(40, 30);
        let series: Vec<&[f64]> = data.iter().map(Vec::as_slice).collect();
        let seq = BatchProcessor::new()
            .min_parallel_threshold(usize::MAX)
            .process(&series, |s| sma(s, 3))
            .unwrap();
        let par = BatchProcessor::new()
            .min_parallel_threshold(1)
            .process(&series, |s| sma(s, 3))
            .unwrap();
        assert_eq!(seq.len(), 40);
        for (a, b) in seq.iter().zip(&par) {
            assert_eq!(a.len(), 30);
            assert_eq!(a[2..], b[2..]);
        }
        assert!((seq[0][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_process_propagates_errors() {
        let data = ramps(3, 10);
        let series: Vec<&[f64]> = data.iter().map(Vec::as_slice).collect();
        let result = BatchProcessor::new().process(&series, |s| sma(s, 0));
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn test_process_named_matches_direct_calls() {
        let data = ramps(12, 50);
        let inputs: Vec<Inputs<'_, f64>> = data
            .iter()
            .map(|s| Inputs::new().with(Role::Close, s))
            .collect();
        let params = ParameterSet::new().with("period", 5);
        let results = BatchProcessor::new()
            .min_parallel_threshold(2)
            .process_named("ema", &inputs, &params)
            .unwrap();
        for (res, s) in results.iter().zip(&data) {
            let direct = crate::indicators::trend::ema(s, 5).unwrap();
            assert_eq!(res.primary()[4..], direct[4..]);
        }
    }

    #[test]
    fn test_compute_batch_keeps_order_and_isolates_failures() {
        let close: Vec<f64> = (0..80).map(|i| 10.0 + (i as f64 * 0.3).cos()).collect();
        let inputs = Inputs::new().with(Role::Close, &close);
        let requests = vec![
            BatchRequest::new("sma", inputs, ParameterSet::new().with("period", 4)),
            BatchRequest::new("sma", inputs, ParameterSet::new().with("period", 0)),
            BatchRequest::new("atr", inputs, ParameterSet::new()),
            BatchRequest::new("wma", inputs, ParameterSet::new().with("period", 4)),
        ];
        let results = compute_batch(&requests);
        assert_eq!(results.len(), 4);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::InvalidParameter { .. })));
        assert!(matches!(results[2], Err(Error::MissingArgument { .. })));
        let wma = results[3].as_ref().unwrap();
        assert_eq!(wma.primary()[3..], crate::indicators::trend::wma(&close, 4).unwrap()[3..]);
    }
}
