//! Built-in categories served while the backend listing is unavailable.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::types::bounds::{ResourceSpec, ValidationRule};
use crate::types::category::{Category, CategoryType, SubType};
use crate::types::field::FieldId;
use crate::types::id::CategoryId;
use crate::types::quantity::{Quantity, Unit};

fn gb(n: u32) -> Quantity {
    Quantity::gigabytes(n)
}

fn rule(min: u32, max: u32, default: u32) -> ValidationRule {
    ValidationRule::ordered_unchecked(Some(min), Some(max), Some(default))
}

fn spec(min: Quantity, max: Quantity, default: Quantity) -> ResourceSpec {
    ResourceSpec::ordered_unchecked(Some(min), Some(max), Some(default))
}

/// SSD shared hosting and standard VPS.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    vec![shared_ssd(), standard_vps()]
}

fn shared_ssd() -> Category {
    Category {
        id: CategoryId::new("builtin-ssd-shared"),
        name: "SSD Shared Hosting".to_string(),
        category_type: CategoryType::Shared,
        sub_type: SubType::Ssd,
        description: "Shared hosting on SSD storage".to_string(),
        resource_specs: BTreeMap::from([
            ("disk_space".to_string(), spec(gb(5), gb(100), gb(10))),
            (
                "bandwidth".to_string(),
                ResourceSpec::unbounded(Quantity::Unmetered("Unlimited".to_string())),
            ),
        ]),
        validation_rules: BTreeMap::from([
            ("websites".to_string(), rule(1, 100, 1)),
            ("databases".to_string(), rule(1, 100, 5)),
            ("email_accounts".to_string(), rule(1, 500, 10)),
        ]),
        category_fields: BTreeSet::from([
            FieldId::Websites,
            FieldId::Subdomains,
            FieldId::Databases,
            FieldId::EmailAccounts,
            FieldId::SslCertificate,
            FieldId::WordpressSupport,
        ]),
        supports_wordpress: true,
        is_active: true,
        display_order: 0,
    }
}

fn standard_vps() -> Category {
    Category {
        id: CategoryId::new("builtin-standard-vps"),
        name: "VPS Hosting".to_string(),
        category_type: CategoryType::Vps,
        sub_type: SubType::Standard,
        description: "Virtual private servers with dedicated resources".to_string(),
        resource_specs: BTreeMap::from([
            (
                "cpu".to_string(),
                spec(Quantity::cores(1), Quantity::cores(16), Quantity::cores(2)),
            ),
            ("ram".to_string(), spec(gb(1), gb(64), gb(4))),
            ("disk_space".to_string(), spec(gb(20), gb(500), gb(40))),
            (
                "bandwidth".to_string(),
                ResourceSpec::unbounded(Quantity::measured(Decimal::ONE, Unit::Terabytes)),
            ),
        ]),
        validation_rules: BTreeMap::new(),
        category_fields: BTreeSet::from([
            FieldId::RootAccess,
            FieldId::OsChoice,
            FieldId::BackupIncluded,
        ]),
        supports_wordpress: false,
        is_active: true,
        display_order: 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::bounds::Bounds;
    use crate::types::bounds::Measure;

    fn assert_ordered<T: Measure + PartialEq + core::fmt::Debug>(bounds: &Bounds<T>) {
        let rebuilt = Bounds::new(
            bounds.min().cloned(),
            bounds.max().cloned(),
            bounds.default_value().cloned(),
        )
        .unwrap();
        assert_eq!(&rebuilt, bounds);
    }

    #[test]
    fn test_builtin_triples_are_ordered() {
        for category in default_categories() {
            category.resource_specs.values().for_each(assert_ordered);
            category.validation_rules.values().for_each(assert_ordered);
        }
    }

    #[test]
    fn test_builtin_categories_survive_serde() {
        for category in default_categories() {
            let json = serde_json::to_string(&category).unwrap();
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_builtin_keys() {
        let keys: Vec<_> = default_categories()
            .iter()
            .map(|c| c.plan_type_key().to_string())
            .collect();
        assert_eq!(keys, vec!["ssd_shared", "standard_vps"]);
    }
}
