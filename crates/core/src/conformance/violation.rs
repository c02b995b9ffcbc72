//! Structured validation failures.

use core::fmt;

use serde::Serialize;

use crate::types::bounds::OutOfBounds;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    Required,
    NotANumber,
    Negative,
    NotAnInteger,
    NotAFlag,
    BelowMin,
    ExceedsMax,
    IncompatibleUnit,
    UnknownCategory,
}

impl From<OutOfBounds> for ViolationReason {
    fn from(out: OutOfBounds) -> Self {
        match out {
            OutOfBounds::BelowMin => Self::BelowMin,
            OutOfBounds::AboveMax => Self::ExceedsMax,
            OutOfBounds::Incomparable => Self::IncompatibleUnit,
        }
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::NotANumber => "not a number",
            Self::Negative => "must not be negative",
            Self::NotAnInteger => "not a whole number",
            Self::NotAFlag => "not a yes/no value",
            Self::BelowMin => "below min",
            Self::ExceedsMax => "exceeds max",
            Self::IncompatibleUnit => "incompatible unit",
            Self::UnknownCategory => "unknown category",
        })
    }
}

/// A single `{field, reason}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Violation {
    pub field: String,
    pub reason: ViolationReason,
}

impl Violation {
    #[must_use]
    pub fn new(field: impl Into<String>, reason: ViolationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A non-empty list of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Wrap a list, returning `None` when it is empty.
    #[must_use]
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self(violations))
    }

    /// `Ok(())` for an empty list, `Err` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the violations when there is at least one.
    pub fn into_result(violations: Vec<Violation>) -> Result<(), Self> {
        Self::from_vec(violations).map_or(Ok(()), Err)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, field: &str, reason: ViolationReason) -> bool {
        self.0.iter().any(|v| v.field == field && v.reason == reason)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_not_violations() {
        assert!(Violations::from_vec(Vec::new()).is_none());
        assert_eq!(Violations::into_result(Vec::new()), Ok(()));
    }

    #[test]
    fn test_display_joins_pairs() {
        let violations = Violations::from_vec(vec![
            Violation::new("disk_space", ViolationReason::ExceedsMax),
            Violation::new("plan_name", ViolationReason::Required),
        ]);
        assert_eq!(
            violations.map(|v| v.to_string()).as_deref(),
            Some("disk_space: exceeds max; plan_name: required")
        );
    }
}
