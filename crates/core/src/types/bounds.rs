//! `{min, max, default}` triples for resource specs and validation rules.
//!
//! A [`Bounds`] can only be constructed when its components are ordered, so
//! an out-of-order triple is rejected both by [`Bounds::new`] and during
//! deserialization. Values are never clamped.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::quantity::Quantity;

/// Values that can be ordered against each other, possibly partially.
pub trait Measure: Clone + fmt::Display {
    /// Compare two values. `None` means the values are not comparable.
    fn compare(&self, other: &Self) -> Option<Ordering>;
}

impl Measure for Quantity {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Self::compare(self, other)
    }
}

impl Measure for u32 {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Errors raised when a triple is out of order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    /// `min` is greater than `max`.
    #[error("min {min} is greater than max {max}")]
    MinAboveMax { min: String, max: String },
    /// `default` is below `min`.
    #[error("default {default} is below min {min}")]
    DefaultBelowMin { default: String, min: String },
    /// `default` is above `max`.
    #[error("default {default} exceeds max {max}")]
    DefaultAboveMax { default: String, max: String },
    /// Two components use units that cannot be compared.
    #[error("{left} and {right} use incompatible units")]
    Incomparable { left: String, right: String },
}

/// How a value falls outside a [`Bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBounds {
    BelowMin,
    AboveMax,
    /// The value's unit cannot be compared with the bound.
    Incomparable,
}

/// Resource spec: quantities such as "2 vCPU".
pub type ResourceSpec = Bounds<Quantity>;

/// Validation rule: integer limits such as number of websites.
pub type ValidationRule = Bounds<u32>;

/// An ordered `{min, max, default}` triple. Every component is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bounds<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<T>,
}

impl<T: Measure> Bounds<T> {
    /// Build a triple, rejecting it unless `min ≤ default ≤ max` holds.
    ///
    /// Ordering is only enforced when both `min` and `max` are present; a
    /// default next to a single bound is taken as authored.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundsError`] naming the first out-of-order pair.
    pub fn new(min: Option<T>, max: Option<T>, default: Option<T>) -> Result<Self, BoundsError> {
        if let (Some(lower), Some(upper)) = (&min, &max) {
            if ordered(lower, upper)? == Ordering::Greater {
                return Err(BoundsError::MinAboveMax {
                    min: lower.to_string(),
                    max: upper.to_string(),
                });
            }

            if let Some(default) = &default {
                if ordered(default, lower)? == Ordering::Less {
                    return Err(BoundsError::DefaultBelowMin {
                        default: default.to_string(),
                        min: lower.to_string(),
                    });
                }
                if ordered(default, upper)? == Ordering::Greater {
                    return Err(BoundsError::DefaultAboveMax {
                        default: default.to_string(),
                        max: upper.to_string(),
                    });
                }
            }
        }

        Ok(Self { min, max, default })
    }

    /// Build a triple known to be ordered. Only used for built-in data, which
    /// is covered by tests.
    pub(crate) const fn ordered_unchecked(min: Option<T>, max: Option<T>, default: Option<T>) -> Self {
        Self { min, max, default }
    }

    /// A triple with only a default (unbounded resource).
    #[must_use]
    pub const fn unbounded(default: T) -> Self {
        Self {
            min: None,
            max: None,
            default: Some(default),
        }
    }

    /// Check that `value` lies within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns how the value falls outside the bounds.
    pub fn check(&self, value: &T) -> Result<(), OutOfBounds> {
        if let Some(min) = &self.min {
            match value.compare(min) {
                None => return Err(OutOfBounds::Incomparable),
                Some(Ordering::Less) => return Err(OutOfBounds::BelowMin),
                Some(_) => {}
            }
        }
        if let Some(max) = &self.max {
            match value.compare(max) {
                None => return Err(OutOfBounds::Incomparable),
                Some(Ordering::Greater) => return Err(OutOfBounds::AboveMax),
                Some(_) => {}
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn min(&self) -> Option<&T> {
        self.min.as_ref()
    }

    #[must_use]
    pub const fn max(&self) -> Option<&T> {
        self.max.as_ref()
    }

    #[must_use]
    pub const fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// True when neither `min` nor `max` is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

fn ordered<T: Measure>(left: &T, right: &T) -> Result<Ordering, BoundsError> {
    left.compare(right).ok_or_else(|| BoundsError::Incomparable {
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[derive(Deserialize)]
struct RawBounds<T> {
    min: Option<T>,
    max: Option<T>,
    default: Option<T>,
}

impl<'de, T> Deserialize<'de> for Bounds<T>
where
    T: Measure + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBounds::<T>::deserialize(deserializer)?;
        Self::new(raw.min, raw.max, raw.default).map_err(serde::de::Error::custom)
    }
}
