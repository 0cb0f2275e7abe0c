//! Report writers: CSV tables, a JSON document and a Markdown summary.
//!
//! Every writer takes an `impl Write`, so reports can go to a file, to stdout
//! or into a buffer. NaN statistics are written as empty CSV cells.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use algo_ta::catalog;
use algo_ta::registry::Category;

use crate::correctness::{CorrectnessReport, Failure};
use crate::error::{AuditError, Result};
use crate::performance::PerformanceReport;
use crate::reference;

/// Everything one harness invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    /// Where the bars came from.
    pub source: String,
    /// Correctness results, if validation ran.
    pub correctness: Option<CorrectnessReport>,
    /// Timing results, if benchmarking ran.
    pub performance: Option<PerformanceReport>,
}

impl AuditSummary {
    /// All named failures, correctness first.
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.correctness
            .iter()
            .flat_map(|c| &c.failures)
            .chain(self.performance.iter().flat_map(|p| &p.failures))
    }

    /// Returns `true` if no stage recorded a failure.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[derive(Serialize)]
struct AccuracyRow<'a> {
    kernel: &'a str,
    column: &'a str,
    rows: usize,
    compared: usize,
    nan_mismatches: usize,
    mae: Option<f64>,
    max_ae: Option<f64>,
    passed: bool,
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Writes one CSV row per kernel output column.
///
/// # Errors
///
/// Returns `AuditError::Csv` or `AuditError::Io` if writing fails.
pub fn write_accuracy_csv<W: Write>(report: &CorrectnessReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in &report.records {
        for column in &record.columns {
            writer.serialize(AccuracyRow {
                kernel: record.kernel,
                column: column.column,
                rows: record.rows,
                compared: column.stats.compared,
                nan_mismatches: column.stats.nan_mismatches,
                mae: finite(column.stats.mae),
                max_ae: finite(column.stats.max_ae),
                passed: column.stats.mae <= report.tolerance,
            })?;
        }
    }
    writer.flush().map_err(|e| AuditError::io(e, "accuracy csv"))?;
    Ok(())
}

/// Writes one CSV row per kernel and dataset size.
///
/// # Errors
///
/// Returns `AuditError::Csv` or `AuditError::Io` if writing fails.
pub fn write_timing_csv<W: Write>(report: &PerformanceReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in &report.records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| AuditError::io(e, "timing csv"))?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns `AuditError::Json` if serialization fails.
pub fn write_json<W: Write, S: Serialize>(value: &S, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, value)?;
    Ok(())
}

fn md_err(e: std::io::Error) -> AuditError {
    AuditError::io(e, "markdown summary")
}

/// Writes a human-readable Markdown summary.
///
/// # Errors
///
/// Returns `AuditError::Io` if writing fails.
pub fn write_markdown<W: Write>(summary: &AuditSummary, mut out: W) -> Result<()> {
    let status = if summary.passed() { "PASS" } else { "FAIL" };
    writeln!(out, "# algo-ta audit: {status}\n").map_err(md_err)?;
    writeln!(out, "Data source: `{}`\n", summary.source).map_err(md_err)?;

    if let Some(c) = &summary.correctness {
        writeln!(out, "## Correctness ({} rows, MAE tolerance {:e})\n", c.rows, c.tolerance).map_err(md_err)?;
        writeln!(out, "| kernel | MAE | MaxAE | compared | result |").map_err(md_err)?;
        writeln!(out, "|---|---:|---:|---:|---|").map_err(md_err)?;
        for r in &c.records {
            let compared: usize = r.columns.iter().map(|col| col.stats.compared).sum();
            writeln!(
                out,
                "| {} | {:.3e} | {:.3e} | {} | {} |",
                r.kernel,
                r.worst_mae(),
                r.worst_max_ae(),
                compared,
                if r.passed { "ok" } else { "breach" }
            )
            .map_err(md_err)?;
        }
        writeln!(out).map_err(md_err)?;
    }

    if let Some(p) = &summary.performance {
        writeln!(out, "## Performance\n").map_err(md_err)?;
        writeln!(out, "| kernel | rows | cold (ms) | warm (ms) | speedup | deterministic |").map_err(md_err)?;
        writeln!(out, "|---|---:|---:|---:|---:|---|").map_err(md_err)?;
        for r in &p.records {
            writeln!(
                out,
                "| {} | {} | {:.3} | {:.3} | {:.2}x | {} |",
                r.kernel,
                r.rows,
                r.cold_secs * 1e3,
                r.warm_secs * 1e3,
                r.speedup,
                if r.deterministic { "yes" } else { "NO" }
            )
            .map_err(md_err)?;
        }
        writeln!(out).map_err(md_err)?;
    }

    let failures: Vec<&Failure> = summary.failures().collect();
    if !failures.is_empty() {
        writeln!(out, "## Failures\n").map_err(md_err)?;
        for f in failures {
            writeln!(out, "- `{}` ({} rows, {:?}): {}", f.kernel, f.rows, f.stage, f.message).map_err(md_err)?;
        }
    }
    Ok(())
}

/// Writes the kernel catalogue, one kernel per line, optionally limited to a category.
///
/// Kernels with a reference formula are marked `*`.
///
/// # Errors
///
/// Returns `AuditError::Config` for an unknown category, or `AuditError::Io`
/// if writing fails.
pub fn write_catalog<W: Write>(category: Option<&str>, mut out: W) -> Result<()> {
    let wanted = match category {
        Some(name) => {
            let key = name.trim().to_ascii_lowercase();
            let found = Category::ALL.into_iter().find(|c| c.name() == key).ok_or_else(|| {
                let known: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
                AuditError::config("category", format!("unknown category '{name}'"))
                    .suggest(format!("One of: {}", known.join(", ")))
            })?;
            Some(found)
        }
        None => None,
    };
    let err = |e: std::io::Error| AuditError::io(e, "catalogue listing");
    for spec in catalog().iter().filter(|s| wanted.map_or(true, |c| s.category == c)) {
        let roles: Vec<String> = spec.roles.iter().map(ToString::to_string).collect();
        let params: Vec<String> = spec.params.iter().map(|p| format!("{}={}", p.name, p.default)).collect();
        writeln!(
            out,
            "{}{:<18} {:<11} [{}] ({}) -> {}",
            if reference::find(spec.name).is_some() { '*' } else { ' ' },
            spec.name,
            spec.category,
            roles.join(", "),
            params.join(", "),
            spec.outputs.join(", ")
        )
        .map_err(err)?;
    }
    Ok(())
}

fn create(dir: &Path, name: &str) -> Result<(PathBuf, BufWriter<File>)> {
    let path = dir.join(name);
    let file = File::create(&path).map_err(|e| AuditError::io(e, &path))?;
    Ok((path, BufWriter::new(file)))
}

/// Writes every report file into `dir`, creating it if needed.
///
/// Returns the paths written.
///
/// # Errors
///
/// Returns `AuditError::Io` if the directory or a file cannot be created, or
/// a serialization error from the individual writers.
pub fn write_reports(summary: &AuditSummary, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| AuditError::io(e, dir))?;
    let mut written = Vec::new();

    if let Some(c) = &summary.correctness {
        let (path, file) = create(dir, "accuracy.csv")?;
        write_accuracy_csv(c, file)?;
        written.push(path);
    }
    if let Some(p) = &summary.performance {
        let (path, file) = create(dir, "performance.csv")?;
        write_timing_csv(p, file)?;
        written.push(path);
    }

    let (path, mut file) = create(dir, "audit.json")?;
    write_json(summary, &mut file)?;
    file.flush().map_err(|e| AuditError::io(e, &path))?;
    written.push(path);

    let (path, mut file) = create(dir, "summary.md")?;
    write_markdown(summary, &mut file)?;
    file.flush().map_err(|e| AuditError::io(e, &path))?;
    written.push(path);

    Ok(written)
}
