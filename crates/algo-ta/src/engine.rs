//! Dynamic entry point: compute any catalogue kernel by name.
//!
//! A call is validated eagerly, in this order, before any kernel runs:
//!
//! 1. the name (or alias) must be in the catalogue,
//! 2. every role the kernel needs must be bound, with equal lengths,
//! 3. parameters are merged over the defaults and checked against their domains.
//!
//! The kernel itself is served by the [compiled-kernel cache](crate::cache).
//!
//! ```
//! use algo_ta::engine::compute;
//! use algo_ta::inputs::{Inputs, Role};
//! use algo_ta::params::ParameterSet;
//!
//! let close: Vec<f64> = (1..=30).map(f64::from).collect();
//! let inputs = Inputs::new().with(Role::Close, &close);
//! let params = ParameterSet::new().with("period", 5);
//!
//! let result = compute("sma", &inputs, &params).unwrap();
//! assert_eq!(result.names().collect::<Vec<_>>(), vec!["value"]);
//! assert_eq!(result.primary()[4], 3.0);
//! ```

use tracing::trace;

use crate::cache;
use crate::error::Result;
use crate::inputs::Inputs;
use crate::params::ParameterSet;
use crate::registry::{entry, lookup, IndicatorResult, KernelSpec};
use crate::traits::SeriesElement;

/// Computes the kernel called `name` (aliases and any ASCII case accepted).
///
/// # Errors
///
/// - `Error::UnknownIndicator` if the name is not in the catalogue
/// - `Error::MissingArgument` if a required role is unbound
/// - `Error::ShapeMismatch` if bound roles differ in length
/// - `Error::InvalidParameter` for unknown or out-of-domain parameters
pub fn compute<T: SeriesElement>(
    name: &str,
    inputs: &Inputs<'_, T>,
    params: &ParameterSet,
) -> Result<IndicatorResult<T>> {
    compute_spec(lookup(name)?, inputs, params)
}

/// Computes the kernel described by `spec`.
///
/// # Errors
///
/// As [`compute`], minus the name lookup.
pub fn compute_spec<T: SeriesElement>(
    spec: &KernelSpec,
    inputs: &Inputs<'_, T>,
    params: &ParameterSet,
) -> Result<IndicatorResult<T>> {
    let rows = inputs.validate(spec.roles)?;
    let resolved = params.resolve(spec.params)?;
    trace!(kernel = spec.name, rows, dtype = T::dtype_name(), "dispatch");
    cache::compiled::<T>(spec.id).call(inputs, &resolved)
}

/// Computes the kernel without touching the cache.
///
/// Used to check that caching never alters outputs.
///
/// # Errors
///
/// As [`compute_spec`].
pub fn compute_uncached<T: SeriesElement>(
    spec: &KernelSpec,
    inputs: &Inputs<'_, T>,
    params: &ParameterSet,
) -> Result<IndicatorResult<T>> {
    inputs.validate(spec.roles)?;
    let resolved = params.resolve(spec.params)?;
    entry::<T>(spec.id)(inputs, &resolved)
}
