//! Core traits for algo-ta numeric operations.
//!
//! The primary trait is [`SeriesElement`], which abstracts kernels over `f32`
//! and `f64`. The module also hosts the eager validation helpers every kernel
//! calls before touching its input.
//!
//! # Example
//!
//! ```
//! use algo_ta::traits::{validate_period, SeriesElement};
//!
//! fn trailing_mean<T: SeriesElement>(data: &[T], period: usize) -> algo_ta::Result<T> {
//!     validate_period("period", period)?;
//!     let window = &data[data.len().saturating_sub(period)..];
//!     let sum: T = window.iter().copied().sum();
//!     Ok(sum / T::from_usize(window.len())?)
//! }
//!
//! let data = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];
//! assert!((trailing_mean(&data, 3).unwrap() - 4.0).abs() < 1e-10);
//! ```

use std::fmt::Debug;
use std::iter::Sum;

use num_traits::{Float, NumAssign, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in a price series.
///
/// # Type Bounds
///
/// - `Float` + `NumAssign`: floating-point arithmetic, NaN handling, compound assignment
/// - `Sum`: iterator summation for window reductions
/// - `NumCast`: conversion of periods and parameters
/// - `Send + Sync + 'static`: kernels may run on any thread and be cached process-wide
pub trait SeriesElement:
    Float + NumAssign + NumCast + Sum + Copy + Default + Debug + Send + Sync + 'static
{
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Converts a compile-time constant to this type.
    ///
    /// Every literal used by the kernels is finite and well inside `f32` range,
    /// so the conversion cannot fail for the float types this trait admits; a
    /// failed cast would surface as NaN rather than a panic.
    #[inline]
    #[must_use]
    fn constant(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }

    /// Converts to `f64` for reporting and comparison.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// The constant 2, used by `alpha = 2 / (period + 1)`.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// The constant 100, used for percentage scaling.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        Self::constant(100.0)
    }

    /// The constant 50, the neutral midpoint of 0..100 oscillators.
    #[inline]
    #[must_use]
    fn fifty() -> Self {
        Self::constant(50.0)
    }

    /// Short dtype tag used in kernel-cache signatures and reports.
    #[must_use]
    fn dtype_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl<T> SeriesElement for T where
    T: Float + NumAssign + NumCast + Sum + Copy + Default + Debug + Send + Sync + 'static
{
}

/// Validates that a period-like parameter is at least 1.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `period` is zero.
#[inline]
pub fn validate_period(name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::invalid_parameter(name, period, "must be at least 1"));
    }
    Ok(())
}

/// Validates that `fast` is strictly shorter than `slow`.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` naming `fast_name` when `fast >= slow`,
/// or when either period is zero.
pub fn validate_fast_slow(
    fast_name: &str,
    fast: usize,
    slow_name: &str,
    slow: usize,
) -> Result<()> {
    validate_period(fast_name, fast)?;
    validate_period(slow_name, slow)?;
    if fast >= slow {
        return Err(Error::invalid_parameter(
            fast_name,
            fast,
            format!("must be less than {slow_name} ({slow})"),
        ));
    }
    Ok(())
}

/// Validates that a float parameter is finite and strictly positive.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` otherwise.
pub fn validate_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_parameter(
            name,
            value,
            "must be a finite positive number",
        ));
    }
    Ok(())
}

/// Validates that a float parameter is finite and non-negative.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` otherwise.
pub fn validate_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_parameter(
            name,
            value,
            "must be a finite non-negative number",
        ));
    }
    Ok(())
}

/// Validates that every `(role, series)` pair has the length of the first.
///
/// Returns the common length.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` naming the first role that disagrees.
pub fn validate_same_length<T>(roles: &[(&str, &[T])]) -> Result<usize> {
    let Some((_, first)) = roles.first() else {
        return Ok(0);
    };
    let expected = first.len();
    for (role, series) in &roles[1..] {
        if series.len() != expected {
            return Err(Error::shape_mismatch(*role, expected, series.len()));
        }
    }
    Ok(expected)
}
