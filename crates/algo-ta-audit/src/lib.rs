//! Validation and benchmark harness for the algo-ta kernel catalogue.
//!
//! Two measurements, each tolerant of individual kernel failures:
//!
//! - [`correctness::validate`] compares kernels against the independent
//!   formulas in [`reference`] and reports mean and maximum absolute error;
//! - [`performance::benchmark`] times a cold and a warm call of every kernel at
//!   each dataset size and checks the two outputs agree.
//!
//! Bars come from a [`data::HistoricalDataProvider`]; results are written by
//! [`report`].

pub mod args;
pub mod config;
pub mod correctness;
pub mod data;
pub mod error;
pub mod performance;
pub mod reference;
pub mod report;

pub use error::{AuditError, Result};

use crate::config::HarnessConfig;
use crate::data::{CsvProvider, HistoricalDataProvider, SyntheticProvider};
use crate::report::AuditSummary;

/// Which measurements to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Correctness only.
    Validate,
    /// Performance only.
    Bench,
    /// Both.
    Audit,
}

/// The provider `config` asks for: its CSV file, or seeded synthetic bars.
#[must_use]
pub fn provider(config: &HarnessConfig) -> Box<dyn HistoricalDataProvider> {
    match &config.data_file {
        Some(path) => Box::new(CsvProvider::new(path.clone())),
        None => Box::new(SyntheticProvider::new(config.seed)),
    }
}

/// Runs the requested measurements.
///
/// # Errors
///
/// Returns an error only if the validation dataset cannot be loaded; kernel
/// failures are recorded in the summary instead.
pub fn run(mode: Mode, config: &HarnessConfig) -> Result<AuditSummary> {
    let provider = provider(config);
    let correctness = match mode {
        Mode::Validate | Mode::Audit => {
            let data = provider.load(config.validation_rows)?;
            Some(correctness::validate(&data, config))
        }
        Mode::Bench => None,
    };
    let performance = match mode {
        Mode::Bench | Mode::Audit => Some(performance::benchmark(provider.as_ref(), config)),
        Mode::Validate => None,
    };
    Ok(AuditSummary {
        source: provider.describe(),
        correctness,
        performance,
    })
}
