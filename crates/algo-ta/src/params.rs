//! Named kernel parameters with defaults and validity domains.
//!
//! A [`ParameterSet`] carries whatever the caller supplied. Before a kernel
//! runs it is resolved against the kernel's [`ParamSpec`] table: defaults fill
//! the gaps, unknown names are rejected and every value is checked against its
//! [`Domain`].
//!
//! ```
//! use algo_ta::params::ParameterSet;
//!
//! let params = ParameterSet::new().with("period", 10).with("multiplier", 2.5);
//! assert_eq!(params.usize("period").unwrap(), 10);
//! assert_eq!(params.float("multiplier").unwrap(), 2.5);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean switch.
    Bool(bool),
    /// Integer (periods, lengths, shifts).
    Int(i64),
    /// Real number (multipliers, factors, percentages).
    Float(f64),
    /// One of a fixed set of names (smoothing modes).
    Choice(Cow<'static, str>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Choice(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        Self::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Choice(Cow::Owned(v.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Choice(Cow::Owned(v))
    }
}

/// Validity domain of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Integer ≥ 1.
    Period,
    /// Integer ≥ 0.
    Count,
    /// Real > 0.
    Positive,
    /// Real ≥ 0.
    NonNegative,
    /// Real strictly between the bounds.
    Open(f64, f64),
    /// Real within the bounds, inclusive.
    Closed(f64, f64),
    /// Boolean switch.
    Flag,
    /// One of the listed names, case-insensitive.
    OneOf(&'static [&'static str]),
}

impl Domain {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Period => "must be an integer >= 1",
            Self::Count => "must be an integer >= 0",
            Self::Positive => "must be > 0",
            Self::NonNegative => "must be >= 0",
            Self::Open(..) => "must lie strictly inside its range",
            Self::Closed(..) => "must lie inside its range",
            Self::Flag => "must be a boolean",
            Self::OneOf(_) => "must be one of the listed choices",
        }
    }

    /// Checks `value` and normalizes it to the domain's representation.
    fn check(&self, name: &str, value: &ParamValue) -> Result<ParamValue> {
        let reject = || Error::invalid_parameter(name, value, self.describe());
        match (self, value) {
            (Self::Period | Self::Count, _) => {
                let v = match *value {
                    ParamValue::Int(v) => v,
                    ParamValue::Float(v) if v.fract() == 0.0 && v.is_finite() => v as i64,
                    _ => return Err(reject()),
                };
                let min = if matches!(self, Self::Period) { 1 } else { 0 };
                if v < min {
                    return Err(reject());
                }
                Ok(ParamValue::Int(v))
            }
            (Self::Flag, ParamValue::Bool(_)) => Ok(value.clone()),
            (Self::Flag, _) => Err(reject()),
            (Self::OneOf(options), ParamValue::Choice(v)) => options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(v))
                .map(|o| ParamValue::Choice(Cow::Borrowed(*o)))
                .ok_or_else(reject),
            (Self::OneOf(_), _) => Err(reject()),
            (_, ParamValue::Int(_) | ParamValue::Float(_)) => {
                let v = match *value {
                    ParamValue::Int(v) => v as f64,
                    ParamValue::Float(v) => v,
                    _ => return Err(reject()),
                };
                let ok = v.is_finite()
                    && match *self {
                        Self::Positive => v > 0.0,
                        Self::NonNegative => v >= 0.0,
                        Self::Open(lo, hi) => v > lo && v < hi,
                        Self::Closed(lo, hi) => v >= lo && v <= hi,
                        _ => false,
                    };
                if ok {
                    Ok(ParamValue::Float(v))
                } else {
                    Err(reject())
                }
            }
            _ => Err(reject()),
        }
    }
}

/// Declared parameter of a kernel: name, default and validity domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name as accepted by [`ParameterSet`].
    pub name: &'static str,
    /// Value used when the caller omits the parameter.
    pub default: ParamValue,
    /// Accepted values.
    pub domain: Domain,
}

impl ParamSpec {
    /// An integer period (≥ 1).
    #[must_use]
    pub const fn period(name: &'static str, default: i64) -> Self {
        Self {
            name,
            default: ParamValue::Int(default),
            domain: Domain::Period,
        }
    }

    /// An integer count or shift (≥ 0).
    #[must_use]
    pub const fn count(name: &'static str, default: i64) -> Self {
        Self {
            name,
            default: ParamValue::Int(default),
            domain: Domain::Count,
        }
    }

    /// A real-valued parameter.
    #[must_use]
    pub const fn float(name: &'static str, default: f64, domain: Domain) -> Self {
        Self {
            name,
            default: ParamValue::Float(default),
            domain,
        }
    }

    /// A boolean switch.
    #[must_use]
    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            default: ParamValue::Bool(default),
            domain: Domain::Flag,
        }
    }

    /// A named choice among `options`.
    #[must_use]
    pub const fn choice(
        name: &'static str,
        default: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            default: ParamValue::Choice(Cow::Borrowed(default)),
            domain: Domain::OneOf(options),
        }
    }
}

/// Caller-supplied parameters, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    /// An empty set; every parameter takes its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name` to `value` in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merges this set over the defaults in `specs`, validating every value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for an unknown name or a value outside
    /// its domain.
    pub fn resolve(&self, specs: &[ParamSpec]) -> Result<Self> {
        if let Some(name) = self
            .values
            .keys()
            .find(|k| !specs.iter().any(|s| s.name == k.as_str()))
        {
            return Err(Error::invalid_parameter(
                name.as_str(),
                &self.values[name],
                "unknown parameter",
            ));
        }
        let mut resolved = Self::new();
        for spec in specs {
            let raw = self.values.get(spec.name).unwrap_or(&spec.default);
            resolved.insert(spec.name, spec.domain.check(spec.name, raw)?);
        }
        Ok(resolved)
    }

    fn require(&self, name: &str) -> Result<&ParamValue> {
        self.values.get(name).ok_or_else(|| Error::missing(name))
    }

    /// Integer parameter as `usize`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if absent, or `Error::InvalidParameter`
    /// if it is not a non-negative integer.
    pub fn usize(&self, name: &str) -> Result<usize> {
        match *self.require(name)? {
            ParamValue::Int(v) => {
                usize::try_from(v).map_err(|_| Error::invalid_parameter(name, v, "must be >= 0"))
            }
            ref other => Err(Error::invalid_parameter(name, other, "must be an integer")),
        }
    }

    /// Integer parameter that must be at least 1.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if absent, or `Error::InvalidParameter`
    /// if it is not a positive integer.
    pub fn period(&self, name: &str) -> Result<usize> {
        let v = self.usize(name)?;
        if v == 0 {
            return Err(Error::invalid_parameter(name, v, "must be >= 1"));
        }
        Ok(v)
    }

    /// Real-valued parameter; integers are widened.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if absent, or `Error::InvalidParameter`
    /// if it is not numeric.
    pub fn float(&self, name: &str) -> Result<f64> {
        match *self.require(name)? {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f64),
            ref other => Err(Error::invalid_parameter(name, other, "must be a number")),
        }
    }

    /// Boolean parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if absent, or `Error::InvalidParameter`
    /// if it is not a boolean.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match *self.require(name)? {
            ParamValue::Bool(v) => Ok(v),
            ref other => Err(Error::invalid_parameter(name, other, "must be a boolean")),
        }
    }

    /// Choice parameter, parsed into `C`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if absent, or `Error::InvalidParameter`
    /// if it is not a choice or does not parse.
    pub fn choice<C>(&self, name: &str) -> Result<C>
    where
        C: std::str::FromStr,
    {
        match self.require(name)? {
            ParamValue::Choice(v) => v
                .parse()
                .map_err(|_| Error::invalid_parameter(name, v, "unrecognized choice")),
            other => Err(Error::invalid_parameter(name, other, "must be a choice")),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::period("period", 14),
        ParamSpec::float("multiplier", 3.0, Domain::Positive),
        ParamSpec::flag("centered", false),
        ParamSpec::choice("mode", "PR", &["PR", "LR", "PCT"]),
        ParamSpec::float("deviation", 5.0, Domain::Open(0.0, 100.0)),
    ];

    #[test]
    fn test_resolve_fills_defaults() {
        let p = ParameterSet::new().resolve(SPECS).unwrap();
        assert_eq!(p.period("period").unwrap(), 14);
        assert_eq!(p.float("multiplier").unwrap(), 3.0);
        assert!(!p.flag("centered").unwrap());
        assert_eq!(p.get("mode"), Some(&ParamValue::Choice(Cow::Borrowed("PR"))));
    }

    #[test]
    fn test_resolve_overrides_and_normalizes() {
        let p = ParameterSet::new()
            .with("period", 20.0)
            .with("multiplier", 2)
            .with("mode", "lr")
            .resolve(SPECS)
            .unwrap();
        assert_eq!(p.get("period"), Some(&ParamValue::Int(20)));
        assert_eq!(p.get("multiplier"), Some(&ParamValue::Float(2.0)));
        assert_eq!(p.get("mode"), Some(&ParamValue::Choice(Cow::Borrowed("LR"))));
    }

    #[test]
    fn test_resolve_rejects_unknown_name() {
        let err = ParameterSet::new().with("length", 5).resolve(SPECS).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { ref name, .. } if name == "length"));
    }

    #[test]
    fn test_resolve_rejects_out_of_domain() {
        for bad in [
            ParameterSet::new().with("period", 0),
            ParameterSet::new().with("period", -3),
            ParameterSet::new().with("period", 2.5),
            ParameterSet::new().with("multiplier", 0.0),
            ParameterSet::new().with("multiplier", f64::NAN),
            ParameterSet::new().with("centered", 1),
            ParameterSet::new().with("mode", "log"),
            ParameterSet::new().with("deviation", 100.0),
        ] {
            assert!(
                matches!(bad.resolve(SPECS), Err(Error::InvalidParameter { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_getters_report_missing() {
        let p = ParameterSet::new();
        assert!(matches!(p.period("period"), Err(Error::MissingArgument { .. })));
    }

    #[test]
    fn test_deserialize_untagged() {
        let p: ParameterSet =
            serde_json::from_str(r#"{"period": 9, "multiplier": 1.5, "mode": "PCT", "centered": true}"#)
                .unwrap();
        assert_eq!(p.usize("period").unwrap(), 9);
        assert_eq!(p.float("multiplier").unwrap(), 1.5);
        assert!(p.flag("centered").unwrap());
        assert_eq!(p.len(), 4);
    }
}
