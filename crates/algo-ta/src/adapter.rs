//! Input-format preservation.
//!
//! Callers hand series over in one of three shapes: a bare numeric array, a
//! loosely-typed list (as decoded from JSON), or an array carrying row labels.
//! [`with_format`] unwraps whatever it is given into plain slices, runs the
//! kernel, and wraps the result back in the caller's shape: labelled input
//! gives labelled output with the *same* label sequence, anything else gives a
//! bare array.
//!
//! Bare arrays are borrowed, never copied. Lists are converted element-wise:
//! `null` becomes NaN, booleans become 1 and 0, and anything else that is not
//! a number is a type error.
//!
//! ```
//! use std::sync::Arc;
//! use algo_ta::adapter::{compute_formatted, Formatted, Series};
//! use algo_ta::inputs::Role;
//! use algo_ta::params::ParameterSet;
//!
//! let labels: Arc<[String]> = (1..=5).map(|d| format!("2024-01-0{d}")).collect();
//! let close = Series::labeled(vec![1.0_f64, 2.0, 3.0, 4.0, 5.0], Arc::clone(&labels));
//!
//! let out = compute_formatted("sma", &[(Role::Close, close)], &ParameterSet::new().with("period", 2))
//!     .unwrap();
//! assert!(Arc::ptr_eq(out.labels().unwrap(), &labels));
//! assert_eq!(out.data().primary()[4], 4.5);
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::engine::compute;
use crate::error::{Error, Result};
use crate::inputs::{Inputs, Role};
use crate::params::ParameterSet;
use crate::registry::IndicatorResult;
use crate::traits::SeriesElement;

/// An input series in one of the accepted shapes.
#[derive(Debug, Clone)]
pub enum Series<'a, T: Clone> {
    /// Plain numeric array.
    Array(Cow<'a, [T]>),
    /// Untyped list, converted element-wise.
    List(Vec<Value>),
    /// Numeric array with one label per row.
    Labeled {
        /// Row values.
        values: Cow<'a, [T]>,
        /// Row labels, shared with the output.
        labels: Arc<[String]>,
    },
}

impl<'a, T: SeriesElement> Series<'a, T> {
    /// Borrows a numeric slice.
    #[must_use]
    pub fn array(values: &'a [T]) -> Self {
        Self::Array(Cow::Borrowed(values))
    }

    /// Wraps values with row labels.
    #[must_use]
    pub fn labeled(values: impl Into<Cow<'a, [T]>>, labels: Arc<[String]>) -> Self {
        Self::Labeled {
            values: values.into(),
            labels,
        }
    }

    /// The label sequence, for labelled series.
    #[must_use]
    pub fn labels(&self) -> Option<&Arc<[String]>> {
        match self {
            Self::Labeled { labels, .. } => Some(labels),
            _ => None,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(v) | Self::Labeled { values: v, .. } => v.len(),
            Self::List(items) => items.len(),
        }
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_numeric(&self, role: Role) -> Result<Cow<'_, [T]>> {
        match self {
            Self::Array(v) | Self::Labeled { values: v, .. } => Ok(Cow::Borrowed(v.as_ref())),
            Self::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| element(role, index, item))
                .collect::<Result<Vec<T>>>()
                .map(Cow::Owned),
        }
    }
}

impl<'a, T: SeriesElement> From<&'a [T]> for Series<'a, T> {
    fn from(values: &'a [T]) -> Self {
        Self::array(values)
    }
}

impl<T: SeriesElement> From<Vec<T>> for Series<'_, T> {
    fn from(values: Vec<T>) -> Self {
        Self::Array(Cow::Owned(values))
    }
}

fn element<T: SeriesElement>(role: Role, index: usize, item: &Value) -> Result<T> {
    let found = match item {
        Value::Null => return Ok(T::nan()),
        Value::Bool(b) => return Ok(if *b { T::one() } else { T::zero() }),
        Value::Number(n) => match n.as_f64() {
            Some(v) => return T::from_f64(v),
            None => "number",
        },
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(Error::TypeError {
        role: role.name().to_string(),
        index,
        found: found.to_string(),
    })
}

/// A result in the caller's input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatted<O> {
    /// No labelled input was seen.
    Array(O),
    /// At least one input was labelled; `labels` is that input's sequence.
    Labeled {
        /// Row labels copied by reference from the input.
        labels: Arc<[String]>,
        /// Kernel output.
        data: O,
    },
}

impl<O> Formatted<O> {
    /// The wrapped output.
    #[must_use]
    pub fn data(&self) -> &O {
        match self {
            Self::Array(data) | Self::Labeled { data, .. } => data,
        }
    }

    /// Unwraps the output, dropping labels.
    #[must_use]
    pub fn into_data(self) -> O {
        match self {
            Self::Array(data) | Self::Labeled { data, .. } => data,
        }
    }

    /// The labels, if the input was labelled.
    #[must_use]
    pub fn labels(&self) -> Option<&Arc<[String]>> {
        match self {
            Self::Labeled { labels, .. } => Some(labels),
            Self::Array(_) => None,
        }
    }

    /// Transforms the output, keeping the shape.
    pub fn map<U>(self, f: impl FnOnce(O) -> U) -> Formatted<U> {
        match self {
            Self::Array(data) => Formatted::Array(f(data)),
            Self::Labeled { labels, data } => Formatted::Labeled {
                labels,
                data: f(data),
            },
        }
    }
}

impl<T: SeriesElement> Formatted<IndicatorResult<T>> {
    /// Splits a multi-column result into one formatted series per field, every
    /// one sharing the input's labels.
    #[must_use]
    pub fn split(self) -> Vec<(&'static str, Formatted<Vec<T>>)> {
        match self {
            Self::Array(result) => result
                .into_columns()
                .into_iter()
                .map(|(name, col)| (name, Formatted::Array(col)))
                .collect(),
            Self::Labeled { labels, data } => data
                .into_columns()
                .into_iter()
                .map(|(name, col)| {
                    let labels = Arc::clone(&labels);
                    (name, Formatted::Labeled { labels, data: col })
                })
                .collect(),
        }
    }
}

/// Finds the first label sequence and checks every labelled input against it.
fn detect_labels<T: SeriesElement>(inputs: &[(Role, Series<'_, T>)]) -> Result<Option<Arc<[String]>>> {
    let mut found: Option<&Arc<[String]>> = None;
    for (role, series) in inputs {
        let Some(labels) = series.labels() else {
            continue;
        };
        if labels.len() != series.len() {
            return Err(Error::shape_mismatch(role.name(), labels.len(), series.len()));
        }
        match found {
            None => found = Some(labels),
            Some(first) if first.len() != labels.len() => {
                return Err(Error::shape_mismatch(role.name(), first.len(), labels.len()));
            }
            Some(_) => {}
        }
    }
    Ok(found.cloned())
}

/// Unwraps `inputs`, runs `kernel` on plain slices and rewraps the output.
///
/// # Errors
///
/// - `Error::ShapeMismatch` if labelled inputs disagree in length, or a
///   labelled input has a different number of labels than values
/// - `Error::TypeError` if a list holds a non-numeric element
/// - anything `kernel` returns
pub fn with_format<T, O, F>(inputs: &[(Role, Series<'_, T>)], kernel: F) -> Result<Formatted<O>>
where
    T: SeriesElement,
    F: FnOnce(&Inputs<'_, T>) -> Result<O>,
{
    let labels = detect_labels(inputs)?;
    let buffers = inputs
        .iter()
        .map(|(role, series)| Ok((*role, series.to_numeric(*role)?)))
        .collect::<Result<Vec<_>>>()?;
    let mut bound = Inputs::new();
    for (role, values) in &buffers {
        bound.set(*role, values);
    }
    let data = kernel(&bound)?;
    Ok(match labels {
        Some(labels) => Formatted::Labeled { labels, data },
        None => Formatted::Array(data),
    })
}

/// [`compute`] with input-format preservation.
///
/// # Errors
///
/// As [`with_format`] and [`compute`].
pub fn compute_formatted<T: SeriesElement>(
    name: &str,
    inputs: &[(Role, Series<'_, T>)],
    params: &ParameterSet,
) -> Result<Formatted<IndicatorResult<T>>> {
    with_format(inputs, |bound| compute(name, bound, params))
}
