//! Service categories: the schema every plan conforms to.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bounds::{ResourceSpec, ValidationRule};
use super::field::FieldId;
use super::id::CategoryId;
use super::plan_type::PlanTypeKey;
use crate::conformance::{Violation, ViolationReason, Violations};

/// Service family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Shared,
    Vps,
    Gameserver,
    Dedicated,
}

impl CategoryType {
    pub const ALL: [Self; 4] = [Self::Shared, Self::Vps, Self::Gameserver, Self::Dedicated];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Vps => "vps",
            Self::Gameserver => "gameserver",
            Self::Dedicated => "dedicated",
        }
    }

    /// Spellings accepted inside plan type keys.
    pub(crate) const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Shared => &["shared"],
            Self::Vps => &["vps"],
            Self::Gameserver => &["gameserver", "game_server", "game"],
            Self::Dedicated => &["dedicated"],
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.aliases().contains(&s))
            .ok_or_else(|| format!("invalid category type: {s}"))
    }
}

/// Storage/performance tier within a family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    #[default]
    Standard,
    Ssd,
    Hdd,
    Performance,
    Premium,
}

impl SubType {
    pub const ALL: [Self; 5] = [
        Self::Standard,
        Self::Ssd,
        Self::Hdd,
        Self::Performance,
        Self::Premium,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Ssd => "ssd",
            Self::Hdd => "hdd",
            Self::Performance => "performance",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SubType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str() == s)
            .ok_or_else(|| format!("invalid category sub type: {s}"))
    }
}

/// A category as stored by the backend.
///
/// Resource and validation triples are checked on deserialization, so a
/// `Category` value always satisfies `min ≤ default ≤ max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub sub_type: SubType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resource_specs: BTreeMap<String, ResourceSpec>,
    #[serde(default)]
    pub validation_rules: BTreeMap<String, ValidationRule>,
    #[serde(default)]
    pub category_fields: BTreeSet<FieldId>,
    #[serde(default)]
    pub supports_wordpress: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

const fn default_true() -> bool {
    true
}

impl Category {
    /// The plan type key plans use to reference this category.
    #[must_use]
    pub const fn plan_type_key(&self) -> PlanTypeKey {
        PlanTypeKey::new(self.category_type, self.sub_type)
    }

    /// Whether a plan type key refers to this category.
    #[must_use]
    pub fn matches(&self, key: PlanTypeKey) -> bool {
        self.plan_type_key() == key
    }

    /// Validation rules only apply to shared hosting.
    #[must_use]
    pub fn effective_validation_rules(&self) -> Option<&BTreeMap<String, ValidationRule>> {
        (self.category_type == CategoryType::Shared).then_some(&self.validation_rules)
    }

    /// Editable copy without the backend identifier.
    #[must_use]
    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone(),
            category_type: self.category_type,
            sub_type: self.sub_type,
            description: self.description.clone(),
            resource_specs: self.resource_specs.clone(),
            validation_rules: self.validation_rules.clone(),
            category_fields: self.category_fields.clone(),
            supports_wordpress: self.supports_wordpress,
            is_active: self.is_active,
            display_order: self.display_order,
        }
    }
}

/// Sort categories for presentation: `display_order`, then `id`.
pub fn sort_for_display(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Body sent when creating or updating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub sub_type: SubType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resource_specs: BTreeMap<String, ResourceSpec>,
    #[serde(default)]
    pub validation_rules: BTreeMap<String, ValidationRule>,
    #[serde(default)]
    pub category_fields: BTreeSet<FieldId>,
    #[serde(default)]
    pub supports_wordpress: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl CategoryDraft {
    /// Check the draft before it is saved.
    ///
    /// Triples are already ordered by construction; this covers the remaining
    /// save-time rules.
    ///
    /// # Errors
    ///
    /// Returns every violation found.
    pub fn check(&self) -> Result<(), Violations> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(Violation::new("name", ViolationReason::Required));
        }
        for resource in self.resource_specs.keys() {
            if resource.trim().is_empty() {
                violations.push(Violation::new("resource_specs", ViolationReason::Required));
            }
        }
        for rule in self.validation_rules.keys() {
            if rule.trim().is_empty() {
                violations.push(Violation::new("validation_rules", ViolationReason::Required));
            }
        }

        Violations::into_result(violations)
    }
}
