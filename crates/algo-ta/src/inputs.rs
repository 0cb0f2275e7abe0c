//! Role-tagged input slices for dynamic kernel calls.

use std::fmt;

use crate::error::{Error, Result};
use crate::traits::SeriesElement;

/// The part an input series plays in a kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Bar open.
    Open,
    /// Bar high.
    High,
    /// Bar low.
    Low,
    /// Bar close.
    Close,
    /// Bar volume.
    Volume,
    /// Generic single-series input; falls back to [`Role::Close`].
    Data,
    /// Second series of a two-series statistic or comparison.
    Reference,
    /// Triggering signal of a combinator.
    Primary,
    /// Resetting signal of a combinator.
    Secondary,
    /// Boolean condition selecting samples.
    Condition,
}

impl Role {
    /// Number of roles.
    pub const COUNT: usize = 10;

    /// Every role, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
        Self::Data,
        Self::Reference,
        Self::Primary,
        Self::Secondary,
        Self::Condition,
    ];

    /// Lower-case role name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Data => "data",
            Self::Reference => "reference",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Condition => "condition",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed input series, at most one per [`Role`].
#[derive(Clone, Copy)]
pub struct Inputs<'a, T> {
    slots: [Option<&'a [T]>; Role::COUNT],
}

impl<T> fmt::Debug for Inputs<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for role in Role::ALL {
            if let Some(s) = self.slots[role.slot()] {
                map.entry(&role.name(), &s.len());
            }
        }
        map.finish()
    }
}

impl<T> Default for Inputs<'_, T> {
    fn default() -> Self {
        Self {
            slots: [None; Role::COUNT],
        }
    }
}

impl<'a, T: SeriesElement> Inputs<'a, T> {
    /// No inputs bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the five OHLCV roles.
    #[must_use]
    pub fn ohlcv(open: &'a [T], high: &'a [T], low: &'a [T], close: &'a [T], volume: &'a [T]) -> Self {
        Self::new()
            .with(Role::Open, open)
            .with(Role::High, high)
            .with(Role::Low, low)
            .with(Role::Close, close)
            .with(Role::Volume, volume)
    }

    /// Binds `series` to `role`, replacing any previous binding.
    #[must_use]
    pub fn with(mut self, role: Role, series: &'a [T]) -> Self {
        self.slots[role.slot()] = Some(series);
        self
    }

    /// Binds `series` to `role` in place.
    pub fn set(&mut self, role: Role, series: &'a [T]) {
        self.slots[role.slot()] = Some(series);
    }

    /// The series bound to `role`, honouring the `Data` → `Close` fallback.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&'a [T]> {
        match (self.slots[role.slot()], role) {
            (Some(s), _) => Some(s),
            (None, Role::Data) => self.slots[Role::Close.slot()],
            (None, _) => None,
        }
    }

    /// The series bound to `role`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if nothing is bound.
    pub fn role(&self, role: Role) -> Result<&'a [T]> {
        self.get(role).ok_or_else(|| Error::missing(role.name()))
    }

    /// Checks that every role in `roles` is bound and all share one length.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` for the first unbound role, or
    /// `Error::ShapeMismatch` for the first role whose length differs.
    pub fn validate(&self, roles: &[Role]) -> Result<usize> {
        let mut expected: Option<usize> = None;
        for &role in roles {
            let len = self.role(role)?.len();
            match expected {
                None => expected = Some(len),
                Some(e) if e != len => return Err(Error::shape_mismatch(role.name(), e, len)),
                Some(_) => {}
            }
        }
        Ok(expected.unwrap_or(0))
    }

    /// Shorthand for the `Data` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if neither `data` nor `close` is bound.
    pub fn data(&self) -> Result<&'a [T]> {
        self.role(Role::Data)
    }

    /// Shorthand for the `Open` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if unbound.
    pub fn open(&self) -> Result<&'a [T]> {
        self.role(Role::Open)
    }

    /// Shorthand for the `High` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if unbound.
    pub fn high(&self) -> Result<&'a [T]> {
        self.role(Role::High)
    }

    /// Shorthand for the `Low` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if unbound.
    pub fn low(&self) -> Result<&'a [T]> {
        self.role(Role::Low)
    }

    /// Shorthand for the `Close` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if unbound.
    pub fn close(&self) -> Result<&'a [T]> {
        self.role(Role::Close)
    }

    /// Shorthand for the `Volume` role.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArgument` if unbound.
    pub fn volume(&self) -> Result<&'a [T]> {
        self.role(Role::Volume)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;

    #[test]
    fn test_role_slots_match_all() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.slot(), i);
        }
    }

    #[test]
    fn test_data_falls_back_to_close() {
        let close = [1.0_f64, 2.0];
        let inputs = Inputs::new().with(Role::Close, &close);
        assert_eq!(inputs.data().unwrap(), &close);
        let data = [5.0_f64, 6.0];
        let inputs = inputs.with(Role::Data, &data);
        assert_eq!(inputs.data().unwrap(), &data);
    }

    #[test]
    fn test_validate_reports_missing_and_mismatch() {
        let a = [1.0_f64; 4];
        let b = [1.0_f64; 3];
        let inputs = Inputs::new().with(Role::High, &a);
        assert!(matches!(
            inputs.validate(&[Role::High, Role::Low]),
            Err(Error::MissingArgument { ref role }) if role == "low"
        ));
        let inputs = inputs.with(Role::Low, &b);
        assert!(matches!(
            inputs.validate(&[Role::High, Role::Low]),
            Err(Error::ShapeMismatch { expected: 4, actual: 3, .. })
        ));
    }
}
