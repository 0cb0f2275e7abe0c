//! Historical data providers.
//!
//! A provider yields an [`Ohlcv`] table of a requested length. Loading is
//! never timed and fails fast: a provider that cannot deliver the rows asked
//! for returns an error instead of a shorter table.
//!
//! # CSV column detection
//!
//! Headers are matched case-insensitively:
//! - `close`, `price`, `adj close`, `adjusted close` → close
//! - `open`, `high`, `low` → the matching price
//! - `volume`, `vol` → volume
//! - `date`, `time`, `datetime`, `timestamp`, `dt` → row labels
//!
//! Empty cells parse as NaN.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::ReaderBuilder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use algo_ta::{Inputs, Role};

use crate::error::{AuditError, Result};

/// Bar data with the derived series every catalogue kernel can bind.
#[derive(Debug, Clone, PartialEq)]
pub struct Ohlcv {
    /// Row labels, when the source had a date column.
    pub dates: Option<Arc<[String]>>,
    /// Open prices.
    pub open: Vec<f64>,
    /// High prices.
    pub high: Vec<f64>,
    /// Low prices.
    pub low: Vec<f64>,
    /// Close prices.
    pub close: Vec<f64>,
    /// Traded volume.
    pub volume: Vec<f64>,
    /// Close lagged by one bar, the second series of two-series statistics.
    pub reference: Vec<f64>,
    /// `1` on bars closing above their open.
    pub up_bars: Vec<f64>,
    /// `1` on bars closing below their open.
    pub down_bars: Vec<f64>,
}

impl Ohlcv {
    /// Builds a table from price columns, deriving the signal and reference series.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Csv` if the columns (or labels) differ in length.
    pub fn new(
        dates: Option<Arc<[String]>>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
        volume: Vec<f64>,
    ) -> Result<Self> {
        let n = close.len();
        let lengths = [
            ("open", open.len()),
            ("high", high.len()),
            ("low", low.len()),
            ("volume", volume.len()),
            ("dates", dates.as_ref().map_or(n, |d| d.len())),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != n) {
            return Err(AuditError::csv(format!("column '{name}' has {len} rows, close has {n}")));
        }
        let reference = std::iter::once(f64::NAN)
            .chain(close.iter().copied())
            .take(n)
            .collect();
        let flag = |keep: fn(f64, f64) -> bool| -> Vec<f64> {
            open.iter()
                .zip(&close)
                .map(|(&o, &c)| if keep(o, c) { 1.0 } else { 0.0 })
                .collect()
        };
        let up_bars = flag(|o, c| c > o);
        let down_bars = flag(|o, c| c < o);
        Ok(Self {
            dates,
            open,
            high,
            low,
            close,
            volume,
            reference,
            up_bars,
            down_bars,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// The first `rows` rows.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Csv` if fewer rows are available.
    pub fn head(&self, rows: usize) -> Result<Self> {
        if rows > self.len() {
            return Err(AuditError::csv(format!(
                "{rows} rows requested but only {} are available",
                self.len()
            )));
        }
        Self::new(
            self.dates.as_ref().map(|d| d[..rows].iter().cloned().collect()),
            self.open[..rows].to_vec(),
            self.high[..rows].to_vec(),
            self.low[..rows].to_vec(),
            self.close[..rows].to_vec(),
            self.volume[..rows].to_vec(),
        )
    }

    /// Binds every role a catalogue kernel may ask for.
    #[must_use]
    pub fn inputs(&self) -> Inputs<'_, f64> {
        Inputs::ohlcv(&self.open, &self.high, &self.low, &self.close, &self.volume)
            .with(Role::Reference, &self.reference)
            .with(Role::Primary, &self.up_bars)
            .with(Role::Secondary, &self.down_bars)
            .with(Role::Condition, &self.up_bars)
    }
}

/// A source of bar data for the harness.
pub trait HistoricalDataProvider {
    /// Short description for logs and reports.
    fn describe(&self) -> String;

    /// Loads exactly `rows` bars.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot supply `rows` valid bars.
    fn load(&self, rows: usize) -> Result<Ohlcv>;
}

/// Seeded random-walk bars.
///
/// Log returns are uniform with drift 0.001 and standard deviation 0.02. The
/// log price is reflected off the `[1, 10_000]` price band so million-row
/// walks stay finite. High/low/open are drawn as ratios of the close and then widened so the
/// high is never below, and the low never above, the open or close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    /// Half-width of the uniform return distribution: `0.02 × √3`.
    const RETURN_SPREAD: f64 = 0.034_641_016_151_377_54;
    const LOG_FLOOR: f64 = 0.0;
    /// `ln(10_000)`.
    const LOG_CEILING: f64 = 9.210_340_371_976_184;

    /// Creates a provider; equal seeds give equal data.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl HistoricalDataProvider for SyntheticProvider {
    fn describe(&self) -> String {
        format!("synthetic(seed={})", self.seed)
    }

    fn load(&self, rows: usize) -> Result<Ohlcv> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut open = Vec::with_capacity(rows);
        let mut high = Vec::with_capacity(rows);
        let mut low = Vec::with_capacity(rows);
        let mut close = Vec::with_capacity(rows);
        let mut volume = Vec::with_capacity(rows);
        let mut log_price = 100.0_f64.ln();
        for _ in 0..rows {
            log_price += 0.001 + rng.gen_range(-Self::RETURN_SPREAD..Self::RETURN_SPREAD);
            if log_price > Self::LOG_CEILING {
                log_price = 2.0 * Self::LOG_CEILING - log_price;
            } else if log_price < Self::LOG_FLOOR {
                log_price = 2.0 * Self::LOG_FLOOR - log_price;
            }
            let c = log_price.exp();
            let o = c * rng.gen_range(0.995..1.005);
            let h = (c * rng.gen_range(1.005..1.03)).max(o);
            let l = (c * rng.gen_range(0.97..0.995)).min(o);
            open.push(o);
            high.push(h);
            low.push(l);
            close.push(c);
            volume.push(f64::from(rng.gen_range(10_000_u32..1_000_000)));
        }
        Ohlcv::new(None, open, high, low, close, volume)
    }
}

/// Bars read from a CSV file with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    /// Creates a provider for `path`; nothing is read until [`load`](HistoricalDataProvider::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Io` if the file cannot be opened, or
    /// `AuditError::Csv` if it is malformed or lacks a required column.
    pub fn load_all(&self) -> Result<Ohlcv> {
        let file = File::open(&self.path).map_err(|e| AuditError::io(e, &self.path))?;
        parse_ohlcv(BufReader::new(file))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoricalDataProvider for CsvProvider {
    fn describe(&self) -> String {
        format!("csv({})", self.path.display())
    }

    fn load(&self, rows: usize) -> Result<Ohlcv> {
        self.load_all()?.head(rows)
    }
}

/// Columns of a parsed CSV, keyed by normalized header.
#[derive(Debug, Clone, Default)]
struct ParsedCsv {
    columns: HashMap<String, Vec<f64>>,
    dates: Option<Vec<String>>,
}

impl ParsedCsv {
    fn take_any(&mut self, names: &[&str]) -> Result<Vec<f64>> {
        names
            .iter()
            .find_map(|name| self.columns.remove(*name))
            .ok_or_else(|| AuditError::csv(format!("no '{}' column found", names[0])))
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

fn is_date_column(normalized: &str) -> bool {
    matches!(normalized, "date" | "time" | "datetime" | "timestamp" | "dt")
}

fn parse_value(value: &str, line: usize) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| AuditError::Csv {
        message: format!("cannot parse '{trimmed}' as number"),
        line: Some(line),
    })
}

fn parse_csv<R: Read>(reader: R) -> Result<ParsedCsv> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(String::is_empty) {
        return Err(AuditError::Csv {
            message: "missing header row".to_string(),
            line: Some(1),
        });
    }

    let date_idx = headers.iter().position(|h| is_date_column(h));
    let mut parsed = ParsedCsv {
        dates: date_idx.map(|_| Vec::new()),
        ..ParsedCsv::default()
    };
    let numeric: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| Some(*i) != date_idx && !h.is_empty())
        .collect();
    for &(_, name) in &numeric {
        parsed.columns.insert(name.clone(), Vec::new());
    }

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = row + 2;
        if let (Some(idx), Some(dates)) = (date_idx, parsed.dates.as_mut()) {
            dates.push(record.get(idx).unwrap_or_default().to_string());
        }
        for &(idx, name) in &numeric {
            let value = parse_value(record.get(idx).unwrap_or_default(), line)?;
            if let Some(column) = parsed.columns.get_mut(name.as_str()) {
                column.push(value);
            }
        }
    }
    Ok(parsed)
}

/// Parses OHLCV bars from CSV text with a header row.
///
/// # Errors
///
/// Returns `AuditError::Csv` for malformed rows, non-numeric cells or a
/// missing open/high/low/close/volume column.
pub fn parse_ohlcv<R: Read>(reader: R) -> Result<Ohlcv> {
    let mut parsed = parse_csv(reader)?;
    let open = parsed.take_any(&["open"])?;
    let high = parsed.take_any(&["high"])?;
    let low = parsed.take_any(&["low"])?;
    let close = parsed.take_any(&["close", "price", "adj close", "adjusted close"])?;
    let volume = parsed.take_any(&["volume", "vol"])?;
    let dates = parsed.dates.map(Arc::from);
    Ohlcv::new(dates, open, high, low, close, volume)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    const SAMPLE: &str = "Date,Open,High,Low,Close,Volume\n\
        2024-01-01,10,11,9,10.5,1000\n\
        2024-01-02,10.5,12,10,11.5,1500\n\
        2024-01-03,11.5,11.8,10.2,10.4,\n";

    #[test]
    fn test_parse_ohlcv_with_dates() {
        let data = parse_ohlcv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.close, vec![10.5, 11.5, 10.4]);
        assert_eq!(data.dates.as_deref().unwrap()[1], "2024-01-02");
        assert!(data.volume[2].is_nan());
        assert_eq!(data.up_bars, vec![1.0, 1.0, 0.0]);
        assert_eq!(data.down_bars, vec![0.0, 0.0, 1.0]);
        assert!(data.reference[0].is_nan());
        assert_eq!(data.reference[1], 10.5);
    }

    #[test]
    fn test_header_aliases() {
        let text = "timestamp,OPEN,high,low,Adj Close,vol\n1,1,2,0.5,1.5,10\n";
        let data = parse_ohlcv(text.as_bytes()).unwrap();
        assert_eq!(data.close, vec![1.5]);
        assert_eq!(data.volume, vec![10.0]);
    }

    #[test]
    fn test_missing_column() {
        let err = parse_ohlcv("open,high,low,close\n1,2,0,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let text = "open,high,low,close,volume\n1,2,0,1,5\n1,2,x,1,5\n";
        match parse_ohlcv(text.as_bytes()).unwrap_err() {
            AuditError::Csv { line, message } => {
                assert_eq!(line, Some(3));
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_synthetic_is_seeded_and_consistent() {
        let a = SyntheticProvider::new(42).load(2_000).unwrap();
        let b = SyntheticProvider::new(42).load(2_000).unwrap();
        let c = SyntheticProvider::new(43).load(2_000).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.close, c.close);
        for i in 0..a.len() {
            assert!(a.high[i] >= a.close[i] && a.high[i] >= a.open[i]);
            assert!(a.low[i] <= a.close[i] && a.low[i] <= a.open[i]);
            assert!(a.close[i] > 0.0);
            assert!((10_000.0..1_000_000.0).contains(&a.volume[i]));
        }
    }

    #[test]
    fn test_head_is_fail_fast() {
        let data = SyntheticProvider::new(1).load(50).unwrap();
        assert_eq!(data.head(20).unwrap().len(), 20);
        assert!(data.head(51).is_err());
    }

    #[test]
    fn test_csv_provider_missing_file() {
        let provider = CsvProvider::new("/no/such/bars.csv");
        assert!(matches!(provider.load(10), Err(AuditError::Io { .. })));
        assert!(provider.describe().contains("bars.csv"));
    }

    #[test]
    fn test_inputs_bind_every_role() {
        let data = SyntheticProvider::new(3).load(10).unwrap();
        let inputs = data.inputs();
        for role in Role::ALL {
            assert_eq!(inputs.role(role).unwrap().len(), 10, "{role:?}");
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_synthetic_bars_are_well_formed(seed in 0u64..1_000, rows in 1usize..400) {
            let data = SyntheticProvider::new(seed).load(rows).unwrap();
            proptest::prop_assert_eq!(data.len(), rows);
            for i in 0..rows {
                proptest::prop_assert!(data.low[i] <= data.open[i] && data.open[i] <= data.high[i]);
                proptest::prop_assert!(data.low[i] <= data.close[i] && data.close[i] <= data.high[i]);
                proptest::prop_assert!(data.low[i] > 0.0);
            }
        }
    }
}
