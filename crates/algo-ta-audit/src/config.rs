//! Harness configuration.
//!
//! A [`HarnessConfig`] can be loaded from a JSON file; any field left out takes
//! its default. Command-line flags are applied on top afterwards.
//!
//! ```
//! use algo_ta_audit::config::HarnessConfig;
//!
//! let config: HarnessConfig = serde_json::from_str(r#"{ "tolerance": 1e-6, "sizes": [500] }"#).unwrap();
//! assert_eq!(config.sizes, vec![500]);
//! assert_eq!(config.seed, 42);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Default MAE tolerance for the correctness comparator.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Default dataset sizes for the performance runner.
pub const DEFAULT_SIZES: [usize; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Default seed for synthetic data.
pub const DEFAULT_SEED: u64 = 42;

/// Settings shared by the correctness and performance runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Largest acceptable mean absolute error against a reference formula.
    pub tolerance: f64,
    /// Row counts of the benchmark datasets.
    pub sizes: Vec<usize>,
    /// Seed of the synthetic data generator.
    pub seed: u64,
    /// Directory receiving report files.
    pub output_dir: PathBuf,
    /// Kernel names to run; empty means every kernel.
    pub filter: Vec<String>,
    /// Historical data to use instead of synthetic bars.
    pub data_file: Option<PathBuf>,
    /// Rows used by the correctness comparator.
    pub validation_rows: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            sizes: DEFAULT_SIZES.to_vec(),
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from("audit-reports"),
            filter: Vec::new(),
            data_file: None,
            validation_rows: 10_000,
        }
    }
}

impl HarnessConfig {
    /// Loads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Io` if the file cannot be read, `AuditError::Json`
    /// if it is malformed, or `AuditError::Config` if a value is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AuditError::io(e, path))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Config` naming the first unusable setting.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AuditError::config("tolerance", format!("{} is not a positive number", self.tolerance))
                .suggest(format!("The default is {DEFAULT_TOLERANCE:e}")));
        }
        if self.sizes.is_empty() || self.sizes.contains(&0) {
            return Err(AuditError::config("sizes", "every dataset needs at least one row")
                .suggest("Try 1000,10000,100000"));
        }
        if self.validation_rows == 0 {
            return Err(AuditError::config("validation_rows", "must be at least 1"));
        }
        for name in &self.filter {
            algo_ta::lookup(name).map_err(|_| {
                AuditError::config("filter", format!("unknown indicator '{name}'"))
                    .suggest("Run `algo-ta-audit list` for the catalogue")
            })?;
        }
        Ok(())
    }

    /// Returns `true` if `name` passes the indicator filter.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.filter.is_empty()
            || self
                .filter
                .iter()
                .any(|f| algo_ta::lookup(f).is_ok_and(|spec| spec.name == name))
    }
}
