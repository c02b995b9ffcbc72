//! Resource quantities such as "2 vCPU", "4 GB" or "Unlimited".
//!
//! Category resource specs are authored as human-readable strings. A
//! [`Quantity`] keeps the original unit for display and normalizes the
//! magnitude within a unit family so "512 MB" and "1 GB" compare correctly.

use core::cmp::Ordering;
use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input string is empty.
    #[error("quantity cannot be empty")]
    Empty,
    /// The magnitude is negative.
    #[error("quantity cannot be negative: {0}")]
    Negative(String),
    /// The numeric part could not be parsed.
    #[error("invalid quantity magnitude: {0}")]
    InvalidMagnitude(String),
}

/// Unit attached to a measured quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Virtual CPU cores.
    Vcpu,
    Megabytes,
    Gigabytes,
    Terabytes,
    Mbps,
    Gbps,
    /// A bare number with no unit.
    Count,
    /// Any unit outside the known families, kept verbatim.
    Other(String),
}

/// Unit family; only quantities of the same family are comparable.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Family<'a> {
    Compute,
    Storage,
    Throughput,
    Count,
    Other(&'a str),
}

impl Unit {
    /// Parse a unit suffix (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Self::Count,
            "vcpu" | "vcpus" | "cpu" | "cpus" | "core" | "cores" | "vcore" | "vcores" => {
                Self::Vcpu
            }
            "mb" | "mib" => Self::Megabytes,
            "gb" | "gib" => Self::Gigabytes,
            "tb" | "tib" => Self::Terabytes,
            "mbps" | "mbit/s" => Self::Mbps,
            "gbps" | "gbit/s" => Self::Gbps,
            _ => Self::Other(raw.trim().to_owned()),
        }
    }

    fn family(&self) -> Family<'_> {
        match self {
            Self::Vcpu => Family::Compute,
            Self::Megabytes | Self::Gigabytes | Self::Terabytes => Family::Storage,
            Self::Mbps | Self::Gbps => Family::Throughput,
            Self::Count => Family::Count,
            Self::Other(unit) => Family::Other(unit),
        }
    }

    /// Multiplier to the family's canonical unit (cores, GB, Mbps).
    fn factor(&self) -> Decimal {
        match self {
            Self::Megabytes => Decimal::ONE / Decimal::from(1024),
            Self::Terabytes => Decimal::from(1024),
            Self::Gbps => Decimal::from(1000),
            _ => Decimal::ONE,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vcpu => f.write_str("vCPU"),
            Self::Megabytes => f.write_str("MB"),
            Self::Gigabytes => f.write_str("GB"),
            Self::Terabytes => f.write_str("TB"),
            Self::Mbps => f.write_str("Mbps"),
            Self::Gbps => f.write_str("Gbps"),
            Self::Count => Ok(()),
            Self::Other(unit) => f.write_str(unit),
        }
    }
}

/// A resource quantity.
///
/// ## Examples
///
/// ```
/// use hostdeck_core::Quantity;
///
/// let ram: Quantity = "4 GB".parse().unwrap();
/// let small: Quantity = "512 MB".parse().unwrap();
/// assert!(small.compare(&ram).is_some_and(|o| o.is_lt()));
///
/// let bandwidth: Quantity = "Unlimited".parse().unwrap();
/// assert!(bandwidth.is_unmetered());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantity {
    /// A non-negative magnitude with a unit.
    Measured {
        /// Magnitude as authored (not normalized).
        magnitude: Decimal,
        /// Unit as authored.
        unit: Unit,
    },
    /// A label with no magnitude, such as "Unlimited". Greater than every
    /// measured quantity.
    Unmetered(String),
}

impl Quantity {
    /// Create a measured quantity.
    #[must_use]
    pub const fn measured(magnitude: Decimal, unit: Unit) -> Self {
        Self::Measured { magnitude, unit }
    }

    /// Whole CPU cores.
    #[must_use]
    pub fn cores(count: u32) -> Self {
        Self::measured(Decimal::from(count), Unit::Vcpu)
    }

    /// Whole gigabytes.
    #[must_use]
    pub fn gigabytes(count: u32) -> Self {
        Self::measured(Decimal::from(count), Unit::Gigabytes)
    }

    /// Returns true for label-only quantities such as "Unlimited".
    #[must_use]
    pub const fn is_unmetered(&self) -> bool {
        matches!(self, Self::Unmetered(_))
    }

    /// Magnitude converted to the canonical unit of its family.
    ///
    /// `None` for unmetered quantities and for magnitudes too large to
    /// convert.
    #[must_use]
    pub fn canonical_magnitude(&self) -> Option<Decimal> {
        match self {
            Self::Measured { magnitude, unit } => magnitude.checked_mul(unit.factor()),
            Self::Unmetered(_) => None,
        }
    }

    /// Compare two quantities.
    ///
    /// Returns `None` when the units belong to different families or a
    /// magnitude overflows its canonical unit.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Unmetered(_), Self::Unmetered(_)) => Some(Ordering::Equal),
            (Self::Unmetered(_), Self::Measured { .. }) => Some(Ordering::Greater),
            (Self::Measured { .. }, Self::Unmetered(_)) => Some(Ordering::Less),
            (
                Self::Measured { unit: left, .. },
                Self::Measured { unit: right, .. },
            ) => {
                if left.family() != right.family() {
                    return None;
                }
                let lhs = self.canonical_magnitude()?;
                let rhs = other.canonical_magnitude()?;
                Some(lhs.cmp(&rhs))
            }
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }
        if s.starts_with('-') {
            return Err(QuantityError::Negative(s.to_owned()));
        }

        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);

        if number.is_empty() {
            return Ok(Self::Unmetered(s.to_owned()));
        }

        let magnitude = Decimal::from_str(number)
            .map_err(|_| QuantityError::InvalidMagnitude(s.to_owned()))?;

        Ok(Self::measured(magnitude, Unit::parse(unit)))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measured {
                magnitude,
                unit: Unit::Count,
            } => write!(f, "{magnitude}"),
            Self::Measured { magnitude, unit } => write!(f, "{magnitude} {unit}"),
            Self::Unmetered(label) => f.write_str(label),
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Integer(u64),
            Float(f64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Integer(n) => n.to_string(),
            Raw::Float(n) => n.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}
