//! Signal combinators over boolean series.

use crate::error::{Error, Result};
use crate::traits::{validate_period, validate_same_length, SeriesElement};
use crate::utils::nan_vec;

/// Reads a numeric series as flags: non-zero and non-NaN is `true`.
#[must_use]
pub fn to_flags<T: SeriesElement>(data: &[T]) -> Vec<bool> {
    data.iter().map(|&v| !v.is_nan() && v != T::zero()).collect()
}

/// Removes repeated `primary` signals.
///
/// After a `primary` is accepted, later ones are suppressed until a
/// `secondary` has fired. A `secondary` re-arms from the bar after it
/// has been observed, so a `primary` on the bar right after it is still
/// suppressed.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` if the series differ in length.
pub fn exrem(primary: &[bool], secondary: &[bool]) -> Result<Vec<bool>> {
    let n = validate_same_length(&[("primary", primary), ("secondary", secondary)])?;
    let mut out = vec![false; n];
    let mut armed = true;
    for i in 0..n {
        if armed {
            if primary[i] {
                out[i] = true;
                armed = false;
            }
        } else if i > 0 && secondary[i - 1] {
            armed = true;
        }
    }
    Ok(out)
}

/// Latching state: set by `primary`, cleared by `secondary`.
///
/// When both fire on the same bar the `secondary` wins.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` if the series differ in length.
pub fn flip(primary: &[bool], secondary: &[bool]) -> Result<Vec<bool>> {
    let n = validate_same_length(&[("primary", primary), ("secondary", secondary)])?;
    let mut state = false;
    Ok((0..n)
        .map(|i| {
            if secondary[i] {
                state = false;
            } else if primary[i] {
                state = true;
            }
            state
        })
        .collect())
}

/// Value of `values` at the `n`-th most recent bar where `condition` held,
/// counting the current bar.
///
/// NaN until `condition` has fired `n` times.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `n` is zero, or
/// `Error::ShapeMismatch` if the series differ in length.
pub fn valuewhen<T: SeriesElement>(condition: &[bool], values: &[T], n: usize) -> Result<Vec<T>> {
    validate_period("n", n)?;
    let len = validate_same_length(&[("condition", condition)])?;
    if values.len() != len {
        return Err(Error::shape_mismatch("values", len, values.len()));
    }
    let mut hits: Vec<usize> = Vec::new();
    let mut out = nan_vec(len);
    for i in 0..len {
        if condition[i] {
            hits.push(i);
        }
        if hits.len() >= n {
            out[i] = values[hits[hits.len() - n]];
        }
    }
    Ok(out)
}
