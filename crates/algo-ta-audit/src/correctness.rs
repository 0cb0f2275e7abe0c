//! Correctness comparator: catalogue kernels against the reference formulas.
//!
//! Errors are measured only where both sides are finite. A kernel passes when
//! the mean absolute error of every compared column stays within tolerance.
//! An error, a panic or a breach is recorded as a named [`Failure`] and the
//! run moves on to the next kernel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, info, warn};

use algo_ta::engine::compute_spec;
use algo_ta::{lookup, ParameterSet};

use crate::config::HarnessConfig;
use crate::data::Ohlcv;
use crate::reference::{references, Reference};

/// Where a kernel's run went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Scenario data could not be loaded.
    Load,
    /// The kernel (or reference) returned an error.
    Error,
    /// The kernel (or reference) panicked.
    Panic,
    /// MAE exceeded the tolerance.
    Tolerance,
    /// Kernel and reference share no finite position.
    NoOverlap,
    /// Two calls on the same input disagreed.
    Determinism,
}

/// A named failure; it never stops the remaining kernels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Kernel (or data source, for [`Stage::Load`]).
    pub kernel: String,
    /// Dataset size the failure occurred at.
    pub rows: usize,
    /// What failed.
    pub stage: Stage,
    /// Human-readable detail.
    pub message: String,
}

/// Error statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ErrorStats {
    /// Mean absolute error.
    pub mae: f64,
    /// Maximum absolute error.
    pub max_ae: f64,
    /// Positions where both values were finite.
    pub compared: usize,
    /// Positions where exactly one side was NaN.
    pub nan_mismatches: usize,
}

/// MAE and MaxAE of `actual` against `expected` over positions where both are finite.
///
/// ```
/// use algo_ta_audit::correctness::error_stats;
///
/// let stats = error_stats(&[1.0, 2.0, f64::NAN, 4.5], &[1.0, 2.5, 3.0, 4.0]);
/// assert_eq!(stats.compared, 3);
/// assert_eq!(stats.nan_mismatches, 1);
/// assert!((stats.mae - 1.0 / 3.0).abs() < 1e-12);
/// assert_eq!(stats.max_ae, 0.5);
/// ```
#[must_use]
pub fn error_stats(actual: &[f64], expected: &[f64]) -> ErrorStats {
    let mut stats = ErrorStats::default();
    let mut total = 0.0;
    for (&a, &e) in actual.iter().zip(expected) {
        if a.is_finite() && e.is_finite() {
            let err = (a - e).abs();
            total += err;
            stats.max_ae = stats.max_ae.max(err);
            stats.compared += 1;
        } else if a.is_nan() != e.is_nan() {
            stats.nan_mismatches += 1;
        }
    }
    if stats.compared > 0 {
        stats.mae = total / stats.compared as f64;
    }
    stats
}

/// Accuracy of one output column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnAccuracy {
    /// Output column name.
    pub column: &'static str,
    /// Error statistics.
    #[serde(flatten)]
    pub stats: ErrorStats,
}

/// Accuracy of one kernel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyRecord {
    /// Canonical kernel name.
    pub kernel: &'static str,
    /// Rows in the dataset.
    pub rows: usize,
    /// Per-column statistics.
    pub columns: Vec<ColumnAccuracy>,
    /// `true` when every column's MAE is within tolerance.
    pub passed: bool,
}

impl AccuracyRecord {
    /// Largest column MAE.
    #[must_use]
    pub fn worst_mae(&self) -> f64 {
        self.columns.iter().map(|c| c.stats.mae).fold(0.0, f64::max)
    }

    /// Largest column MaxAE.
    #[must_use]
    pub fn worst_max_ae(&self) -> f64 {
        self.columns.iter().map(|c| c.stats.max_ae).fold(0.0, f64::max)
    }
}

/// Outcome of a correctness run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectnessReport {
    /// MAE tolerance applied.
    pub tolerance: f64,
    /// Rows in the dataset.
    pub rows: usize,
    /// One record per kernel that produced comparable output.
    pub records: Vec<AccuracyRecord>,
    /// Named failures.
    pub failures: Vec<Failure>,
}

impl CorrectnessReport {
    /// Returns `true` if no kernel failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs `f`, turning a panic into an error message.
pub(crate) fn guarded<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with a non-string payload".to_string())
}

enum Outcome {
    Record(AccuracyRecord),
    Failed(Stage, String),
}

fn compare(reference: &Reference, data: &Ohlcv, tolerance: f64) -> algo_ta::Result<Outcome> {
    let spec = lookup(reference.kernel)?;
    let params = ParameterSet::new().resolve(spec.params)?;
    let output = compute_spec(spec, &data.inputs(), &params)?;
    let expected = reference.evaluate(data, &params)?;

    let mut columns = Vec::with_capacity(expected.len());
    for (name, want) in &expected {
        let Some(got) = output.column(name) else {
            return Ok(Outcome::Failed(Stage::Error, format!("kernel has no '{name}' column")));
        };
        let stats = error_stats(got, want);
        if stats.compared == 0 {
            return Ok(Outcome::Failed(
                Stage::NoOverlap,
                format!("column '{name}' has no finite position on both sides"),
            ));
        }
        columns.push(ColumnAccuracy { column: name, stats });
    }
    let passed = columns.iter().all(|c| c.stats.mae <= tolerance);
    Ok(Outcome::Record(AccuracyRecord {
        kernel: spec.name,
        rows: data.len(),
        columns,
        passed,
    }))
}

/// Compares every selected kernel that has a reference formula.
#[must_use]
pub fn validate(data: &Ohlcv, config: &HarnessConfig) -> CorrectnessReport {
    let mut report = CorrectnessReport {
        tolerance: config.tolerance,
        rows: data.len(),
        records: Vec::new(),
        failures: Vec::new(),
    };
    info!(rows = data.len(), tolerance = config.tolerance, "validating kernels against reference formulas");

    for reference in references().iter().filter(|r| config.selects(r.kernel)) {
        let failure = |stage, message: String| Failure {
            kernel: reference.kernel.to_string(),
            rows: data.len(),
            stage,
            message,
        };
        match guarded(|| compare(reference, data, config.tolerance)) {
            Ok(Ok(Outcome::Record(record))) => {
                if record.passed {
                    debug!(kernel = record.kernel, mae = record.worst_mae(), "within tolerance");
                } else {
                    warn!(kernel = record.kernel, mae = record.worst_mae(), "tolerance breach");
                    report.failures.push(failure(
                        Stage::Tolerance,
                        format!("MAE {:e} exceeds {:e}", record.worst_mae(), config.tolerance),
                    ));
                }
                report.records.push(record);
            }
            Ok(Ok(Outcome::Failed(stage, message))) => {
                warn!(kernel = reference.kernel, %message, "comparison failed");
                report.failures.push(failure(stage, message));
            }
            Ok(Err(err)) => {
                warn!(kernel = reference.kernel, error = %err, "kernel error");
                report.failures.push(failure(Stage::Error, err.to_string()));
            }
            Err(message) => {
                warn!(kernel = reference.kernel, %message, "kernel panicked");
                report.failures.push(failure(Stage::Panic, message));
            }
        }
    }
    info!(
        compared = report.records.len(),
        failures = report.failures.len(),
        "validation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::data::{HistoricalDataProvider, SyntheticProvider};

    #[test]
    fn test_error_stats_ignores_shared_nan() {
        let stats = error_stats(&[f64::NAN, 1.0], &[f64::NAN, 1.0]);
        assert_eq!(stats.compared, 1);
        assert_eq!(stats.nan_mismatches, 0);
        assert_eq!(stats.mae, 0.0);
    }

    #[test]
    fn test_error_stats_empty() {
        let stats = error_stats(&[], &[]);
        assert_eq!(stats, ErrorStats::default());
    }

    #[test]
    fn test_every_reference_matches_within_default_tolerance() {
        let data = SyntheticProvider::new(42).load(3_000).unwrap();
        let report = validate(&data, &HarnessConfig::default());
        assert!(report.passed(), "{:#?}", report.failures);
        assert_eq!(report.records.len(), references().len());
        for record in &report.records {
            assert!(record.worst_mae() <= 1e-5, "{}", record.kernel);
        }
    }

    #[test]
    fn test_filter_limits_the_run() {
        let data = SyntheticProvider::new(1).load(500).unwrap();
        let config = HarnessConfig {
            filter: vec!["rsi".into(), "MACD".into()],
            ..HarnessConfig::default()
        };
        let report = validate(&data, &config);
        let names: Vec<_> = report.records.iter().map(|r| r.kernel).collect();
        assert_eq!(names, vec!["rsi", "macd"]);
    }

    #[test]
    fn test_short_data_is_a_named_failure_not_an_abort() {
        let data = SyntheticProvider::new(2).load(5).unwrap();
        let report = validate(&data, &HarnessConfig::default());
        assert!(!report.passed());
        assert!(report.failures.iter().all(|f| f.stage == Stage::NoOverlap));
        // kernels with short warm-ups still compare
        assert!(report.records.iter().any(|r| r.kernel == "obv"));
    }

    #[test]
    fn test_guarded_catches_panics() {
        let err = guarded(|| -> i32 { panic!("boom") }).unwrap_err();
        assert_eq!(err, "boom");
        assert_eq!(guarded(|| 7).unwrap(), 7);
    }
}
