//! Plan type keys linking a plan to its category's `(type, sub_type)`.

use core::fmt;
use std::str::FromStr;

use super::category::{CategoryType, SubType};

/// A parsed plan type key such as `ssd_shared`.
///
/// Canonical form is `<sub_type>_<type>`. `<type>_<sub_type>` and a bare
/// `<type>` (meaning [`SubType::Standard`]) are accepted too. Keys that match
/// none of these are legacy types with no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanTypeKey {
    pub category_type: CategoryType,
    pub sub_type: SubType,
}

impl PlanTypeKey {
    #[must_use]
    pub const fn new(category_type: CategoryType, sub_type: SubType) -> Self {
        Self {
            category_type,
            sub_type,
        }
    }

    /// Parse a key, returning `None` for legacy or unknown keys.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();

        for category_type in CategoryType::ALL {
            for alias in category_type.aliases() {
                if key == *alias {
                    return Some(Self::new(category_type, SubType::Standard));
                }
                for sub_type in SubType::ALL {
                    let sub = sub_type.as_str();
                    if key == format!("{sub}_{alias}") || key == format!("{alias}_{sub}") {
                        return Some(Self::new(category_type, sub_type));
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for PlanTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}_{}", self.sub_type, self.category_type))
    }
}

impl FromStr for PlanTypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unrecognized plan type: {s}"))
    }
}
