//! Error types for algo-ta.
//!
//! Validation is eager: every failure below is raised before any kernel touches
//! its input. Two conditions are deliberately *not* errors:
//!
//! - too little history for the requested parameters, which yields an all-NaN
//!   output of the input's length, and
//! - zero-denominator ratios, which resolve to the kernel's documented sentinel.

use thiserror::Error;

/// The main error type for algo-ta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A mandatory input role or parameter was not supplied.
    #[error("missing argument: {role}")]
    MissingArgument {
        /// Name of the absent role (`close`, `volume`, ...) or parameter.
        role: String,
    },

    /// Two role series (or a series and its label sequence) differ in length.
    #[error("shape mismatch for {role}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        /// The role whose length disagrees with the first role seen.
        role: String,
        /// Length established by the first role.
        expected: usize,
        /// Length of the offending role.
        actual: usize,
    },

    /// A parameter is outside its validity domain.
    ///
    /// Raised regardless of input length: a zero period is invalid even for an
    /// empty series.
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Rendered value that was rejected.
        value: String,
        /// Human-readable domain description.
        reason: String,
    },

    /// A role contained a value that is not a number.
    #[error("type error in {role} at index {index}: expected a number, found {found}")]
    TypeError {
        /// Role being unwrapped.
        role: String,
        /// Position of the first offending element.
        index: usize,
        /// Short description of what was found instead.
        found: String,
    },

    /// The requested indicator is not in the catalogue.
    #[error("unknown indicator: {name}")]
    UnknownIndicator {
        /// Name as supplied by the caller.
        name: String,
    },

    /// Failed to convert a numeric value to the target element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::ShapeMismatch`].
    pub fn shape_mismatch(role: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            role: role.into(),
            expected,
            actual,
        }
    }

    /// Shorthand for [`Error::MissingArgument`].
    pub fn missing(role: impl Into<String>) -> Self {
        Self::MissingArgument { role: role.into() }
    }
}

/// Convenience type alias for Results using the algo-ta Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_display() {
        let err = Error::missing("volume");
        assert_eq!(err.to_string(), "missing argument: volume");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = Error::shape_mismatch("low", 100, 99);
        assert_eq!(
            err.to_string(),
            "shape mismatch for low: expected length 100, got 99"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = Error::invalid_parameter("period", 0, "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid parameter period=0: must be at least 1"
        );
    }

    #[test]
    fn test_type_error_display() {
        let err = Error::TypeError {
            role: "close".to_string(),
            index: 3,
            found: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "type error in close at index 3: expected a number, found string"
        );
    }

    #[test]
    fn test_unknown_indicator_display() {
        let err = Error::UnknownIndicator {
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "unknown indicator: foo");
    }

    #[test]
    fn test_error_is_clone_and_eq() {
        let err = Error::NumericConversion {
            context: "usize to series element",
        };
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_error_implements_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&Error::missing("close"));
    }
}
