//! Cold/warm performance runner.
//!
//! For each dataset size every selected kernel is called twice on the same
//! data. The first call ("cold") pays for compiling the kernel's cache entry
//! if nothing has requested it yet; the second ("warm") is served from the
//! cache. Both calls are timed with [`Instant`] and their outputs must agree,
//! bit for bit or within tolerance.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use algo_ta::engine::compute_spec;
use algo_ta::{cache, catalog, IndicatorResult, KernelSpec, ParameterSet};

use crate::config::HarnessConfig;
use crate::correctness::{guarded, Failure, Stage};
use crate::data::{HistoricalDataProvider, Ohlcv};

/// Timings of one kernel at one dataset size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingRecord {
    /// Canonical kernel name.
    pub kernel: &'static str,
    /// Catalogue category.
    pub category: String,
    /// Rows in the dataset.
    pub rows: usize,
    /// Whether the cache entry already existed before the cold call.
    pub precompiled: bool,
    /// First call, seconds.
    pub cold_secs: f64,
    /// Second call, seconds.
    pub warm_secs: f64,
    /// `cold / warm`.
    pub speedup: f64,
    /// Cold and warm outputs agreed.
    pub deterministic: bool,
}

/// Outcome of a performance run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Where the bars came from.
    pub source: String,
    /// One record per kernel and size that ran to completion.
    pub records: Vec<TimingRecord>,
    /// Named failures.
    pub failures: Vec<Failure>,
}

impl PerformanceReport {
    /// Returns `true` if no kernel failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

fn speedup(cold: Duration, warm: Duration) -> f64 {
    cold.as_secs_f64() / warm.as_secs_f64().max(1e-9)
}

/// Returns `true` if two results hold the same columns with values that are
/// bit-identical, both NaN, or within `tolerance`.
#[must_use]
pub fn same_output(a: &IndicatorResult<f64>, b: &IndicatorResult<f64>, tolerance: f64) -> bool {
    a.width() == b.width()
        && a.iter().zip(b.iter()).all(|((na, ca), (nb, cb))| {
            na == nb
                && ca.len() == cb.len()
                && ca.iter().zip(cb).all(|(&x, &y)| {
                    x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan()) || (x - y).abs() <= tolerance
                })
        })
}

fn timed(spec: &KernelSpec, data: &Ohlcv) -> algo_ta::Result<(Duration, IndicatorResult<f64>)> {
    let inputs = data.inputs();
    let params = ParameterSet::new();
    let start = Instant::now();
    let out = compute_spec(spec, &inputs, &params)?;
    Ok((start.elapsed(), out))
}

fn measure(spec: &'static KernelSpec, data: &Ohlcv, tolerance: f64) -> Result<TimingRecord, (Stage, String)> {
    let precompiled = cache::is_compiled::<f64>(spec.id);
    let run = || guarded(|| timed(spec, data));
    let (cold, first) = match run() {
        Ok(Ok(v)) => v,
        Ok(Err(err)) => return Err((Stage::Error, err.to_string())),
        Err(msg) => return Err((Stage::Panic, msg)),
    };
    let (warm, second) = match run() {
        Ok(Ok(v)) => v,
        Ok(Err(err)) => return Err((Stage::Error, err.to_string())),
        Err(msg) => return Err((Stage::Panic, msg)),
    };
    Ok(TimingRecord {
        kernel: spec.name,
        category: spec.category.to_string(),
        rows: data.len(),
        precompiled,
        cold_secs: cold.as_secs_f64(),
        warm_secs: warm.as_secs_f64(),
        speedup: speedup(cold, warm),
        deterministic: same_output(&first, &second, tolerance),
    })
}

/// Times every selected kernel at every configured size.
///
/// A size whose data cannot be loaded is recorded as a [`Stage::Load`]
/// failure and skipped.
#[must_use]
pub fn benchmark(provider: &dyn HistoricalDataProvider, config: &HarnessConfig) -> PerformanceReport {
    let mut report = PerformanceReport {
        source: provider.describe(),
        records: Vec::new(),
        failures: Vec::new(),
    };
    let specs: Vec<&'static KernelSpec> = catalog().iter().filter(|s| config.selects(s.name)).collect();

    for &rows in &config.sizes {
        let data = match provider.load(rows) {
            Ok(data) => data,
            Err(err) => {
                warn!(rows, error = %err, "skipping dataset");
                report.failures.push(Failure {
                    kernel: report.source.clone(),
                    rows,
                    stage: Stage::Load,
                    message: err.to_string(),
                });
                continue;
            }
        };
        info!(rows, kernels = specs.len(), source = %report.source, "benchmarking");

        for &spec in &specs {
            match measure(spec, &data, config.tolerance) {
                Ok(record) => {
                    debug!(
                        kernel = record.kernel,
                        rows,
                        cold = record.cold_secs,
                        warm = record.warm_secs,
                        "timed"
                    );
                    if !record.deterministic {
                        warn!(kernel = record.kernel, rows, "cold and warm outputs differ");
                        report.failures.push(Failure {
                            kernel: record.kernel.to_string(),
                            rows,
                            stage: Stage::Determinism,
                            message: "cold and warm outputs differ".to_string(),
                        });
                    }
                    report.records.push(record);
                }
                Err((stage, message)) => {
                    warn!(kernel = spec.name, rows, %message, "benchmark failed");
                    report.failures.push(Failure {
                        kernel: spec.name.to_string(),
                        rows,
                        stage,
                        message,
                    });
                }
            }
        }
    }
    report
}
