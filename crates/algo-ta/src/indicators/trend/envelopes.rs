//! Moving-average envelopes and the moving-average selector they share with
//! the price oscillator.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::indicators::trend::moving_averages::{ema, sma};
use crate::traits::{validate_non_negative, SeriesElement};

/// Moving-average flavour selectable by name (`"SMA"` or `"EMA"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaType {
    /// Simple moving average.
    #[default]
    Sma,
    /// Exponential moving average.
    Ema,
}

impl MaType {
    /// All accepted selector names.
    pub const NAMES: &'static [&'static str] = &["SMA", "EMA"];

    /// Applies the selected average.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `period` is zero.
    pub fn apply<T: SeriesElement>(self, data: &[T], period: usize) -> Result<Vec<T>> {
        match self {
            Self::Sma => sma(data, period),
            Self::Ema => ema(data, period),
        }
    }
}

impl FromStr for MaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(Self::Sma),
            "EMA" => Ok(Self::Ema),
            _ => Err(Error::invalid_parameter("ma_type", s, "expected SMA or EMA")),
        }
    }
}

impl fmt::Display for MaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
        })
    }
}

/// Upper, middle and lower envelope lines.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeOutput<T> {
    /// Middle × (1 + pct/100).
    pub upper: Vec<T>,
    /// The moving average.
    pub middle: Vec<T>,
    /// Middle × (1 - pct/100).
    pub lower: Vec<T>,
}

/// Computes percentage envelopes around a moving average.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero or `percentage` is negative.
pub fn ma_envelopes<T: SeriesElement>(
    data: &[T],
    period: usize,
    percentage: f64,
    ma_type: MaType,
) -> Result<EnvelopeOutput<T>> {
    validate_non_negative("percentage", percentage)?;
    let middle = ma_type.apply(data, period)?;
    let k = T::from_f64(percentage / 100.0)?;
    let upper = middle.iter().map(|&m| m * (T::one() + k)).collect();
    let lower = middle.iter().map(|&m| m * (T::one() - k)).collect();
    Ok(EnvelopeOutput { upper, middle, lower })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use crate::utils::approx_eq;

    #[test]
    fn test_ma_type_parse() {
        assert_eq!("sma".parse::<MaType>().unwrap(), MaType::Sma);
        assert_eq!(" EMA ".parse::<MaType>().unwrap(), MaType::Ema);
        assert!(matches!("WMA".parse::<MaType>(), Err(Error::InvalidParameter { .. })));
        assert_eq!(MaType::Ema.to_string(), "EMA");
    }

    #[test]
    fn test_envelopes_scale_middle() {
        let data = vec![100.0_f64; 25];
        let out = ma_envelopes(&data, 20, 2.5, MaType::Sma).unwrap();
        assert!(out.middle[18].is_nan());
        assert!(approx_eq(out.upper[19], 102.5, 1e-9));
        assert!(approx_eq(out.lower[19], 97.5, 1e-9));
    }

    #[test]
    fn test_envelopes_negative_percentage_rejected() {
        assert!(ma_envelopes(&[1.0_f64; 5], 2, -1.0, MaType::Ema).is_err());
    }
}
