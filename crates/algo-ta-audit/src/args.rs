//! Command-line interface.
//!
//! ```bash
//! # compare every kernel that has a reference formula
//! algo-ta-audit validate
//!
//! # cold/warm timings for two kernels at 10K and 1M rows
//! algo-ta-audit bench -i sma,rsi --sizes 10k,1m
//!
//! # both, on historical bars, reports into ./out
//! algo-ta-audit audit --data bars.csv --rows 5000 --sizes 1000,5000 -o out
//!
//! # the catalogue
//! algo-ta-audit list --category volume
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::HarnessConfig;
use crate::error::{AuditError, Result};

/// Correctness and performance audit for the algo-ta kernel catalogue.
#[derive(Parser, Debug)]
#[command(name = "algo-ta-audit", author, version, about)]
pub struct Args {
    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to run
    #[command(subcommand)]
    pub command: Command,
}

/// Harness modes.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compare kernels against independent reference formulas
    Validate(RunArgs),
    /// Time cold and warm kernel calls at each dataset size
    Bench(RunArgs),
    /// Validate, then benchmark
    Audit(RunArgs),
    /// Print the kernel catalogue
    List {
        /// Only kernels of this category (trend, momentum, ...)
        #[arg(long)]
        category: Option<String>,
    },
}

/// Flags shared by the run modes.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Largest acceptable mean absolute error
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Dataset sizes, comma separated; `k` and `m` suffixes allowed
    #[arg(long, value_delimiter = ',', value_parser = parse_size)]
    pub sizes: Option<Vec<usize>>,

    /// Rows used for validation
    #[arg(long)]
    pub rows: Option<usize>,

    /// Seed for synthetic bars
    #[arg(long)]
    pub seed: Option<u64>,

    /// Kernels to run, comma separated (default: all)
    #[arg(short = 'i', long = "indicator", value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Historical bars to use instead of synthetic data
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Report directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the summary without writing report files
    #[arg(long)]
    pub no_write: bool,
}

impl RunArgs {
    /// Overlays the flags that were given onto `config`.
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(sizes) = &self.sizes {
            config.sizes.clone_from(sizes);
        }
        if let Some(rows) = self.rows {
            config.validation_rows = rows;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if !self.indicators.is_empty() {
            config.filter.clone_from(&self.indicators);
        }
        if let Some(data) = &self.data {
            config.data_file = Some(data.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
    }
}

impl Args {
    /// Loads `--config` (or the defaults), applies the run flags and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or the
    /// merged configuration is invalid.
    pub fn resolve_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        if let Command::Validate(run) | Command::Bench(run) | Command::Audit(run) = &self.command {
            run.apply(&mut config);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parses a row count such as `1000`, `10k` or `1m`.
///
/// # Errors
///
/// Returns `AuditError::Config` if the text is not a positive count.
pub fn parse_size(text: &str) -> Result<usize> {
    let trimmed = text.trim().to_ascii_lowercase();
    let (digits, scale) = match trimmed.strip_suffix('k') {
        Some(d) => (d, 1_000),
        None => match trimmed.strip_suffix('m') {
            Some(d) => (d, 1_000_000),
            None => (trimmed.as_str(), 1),
        },
    };
    let invalid = || {
        AuditError::config("sizes", format!("cannot parse '{text}' as a row count"))
            .suggest("Use a positive integer, optionally suffixed with k or m (e.g. 10k)")
    };
    let count = digits.trim().parse::<usize>().map_err(|_| invalid())?;
    match count.checked_mul(scale) {
        Some(n) if n > 0 => Ok(n),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1000").unwrap(), 1_000);
        assert_eq!(parse_size("10k").unwrap(), 10_000);
        assert_eq!(parse_size(" 1M ").unwrap(), 1_000_000);
        assert!(parse_size("0").is_err());
        assert!(parse_size("ten").is_err());
        assert!(parse_size("").is_err());
    }

    #[test]
    fn test_parse_validate_defaults() {
        let args = Args::try_parse_from(["algo-ta-audit", "validate"]).unwrap();
        assert_eq!(args.command, Command::Validate(RunArgs::default()));
        let config = args.resolve_config().unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "algo-ta-audit",
            "bench",
            "--sizes",
            "1k,5k",
            "-i",
            "sma,rsi",
            "--seed",
            "7",
            "--tolerance",
            "1e-6",
            "-o",
            "out",
        ])
        .unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.sizes, vec![1_000, 5_000]);
        assert_eq!(config.filter, vec!["sma".to_string(), "rsi".to_string()]);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_indicator_is_rejected_at_resolve() {
        let args = Args::try_parse_from(["algo-ta-audit", "audit", "-i", "nope"]).unwrap();
        assert!(matches!(args.resolve_config(), Err(AuditError::Config { .. })));
    }

    #[test]
    fn test_bad_size_is_a_parse_error() {
        assert!(Args::try_parse_from(["algo-ta-audit", "bench", "--sizes", "1k,abc"]).is_err());
    }

    #[test]
    fn test_list_with_category() {
        let args = Args::try_parse_from(["algo-ta-audit", "list", "--category", "volume"]).unwrap();
        assert_eq!(
            args.command,
            Command::List {
                category: Some("volume".into())
            }
        );
    }
}
