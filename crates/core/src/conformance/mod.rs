//! Plan conformance: which editor fields a category exposes, and whether a
//! plan draft satisfies the category's ranges.
//!
//! Everything here is a pure function of its inputs. [`validate`] is total:
//! it returns either a normalized [`PlanInput`] or every violation it found,
//! never a partial result.

mod draft;
mod violation;

use core::fmt;
use std::collections::BTreeMap;

pub use draft::PlanDraft;
pub use violation::{Violation, ViolationReason, Violations};

use crate::types::bounds::ResourceSpec;
use crate::types::category::{Category, CategoryType};
use crate::types::field::{FieldId, FieldValue};
use crate::types::plan::PlanInput;
use crate::types::plan_type::PlanTypeKey;
use crate::types::quantity::Quantity;

/// Resources with a dedicated plan field, in editor order.
const CANONICAL_RESOURCES: [&str; 4] = ["cpu", "ram", "disk_space", "bandwidth"];

/// An input shown in the plan editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorField {
    PlanName,
    BasePrice,
    /// A resource present in the category's `resource_specs`.
    Resource(String),
    /// A togglable category field.
    Field(FieldId),
}

impl EditorField {
    /// The name used for this field in violations and payloads.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::PlanName => "plan_name",
            Self::BasePrice => "base_price",
            Self::Resource(name) => name,
            Self::Field(field) => field.as_str(),
        }
    }
}

impl fmt::Display for EditorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanName => f.write_str("Plan name"),
            Self::BasePrice => f.write_str("Base price"),
            Self::Resource(name) => f.write_str(name),
            Self::Field(field) => f.write_str(field.label()),
        }
    }
}

/// Ordered editor fields for `category`.
///
/// Core fields come first, then resources (cpu, ram, disk_space, bandwidth,
/// then any others by name), then category fields in vocabulary order.
#[must_use]
pub fn fields_for(category: &Category) -> Vec<EditorField> {
    let mut fields = vec![EditorField::PlanName, EditorField::BasePrice];

    fields.extend(
        CANONICAL_RESOURCES
            .iter()
            .filter(|name| category.resource_specs.contains_key(**name))
            .map(|name| EditorField::Resource((*name).to_owned())),
    );
    fields.extend(
        category
            .resource_specs
            .keys()
            .filter(|name| !CANONICAL_RESOURCES.contains(&name.as_str()))
            .map(|name| EditorField::Resource(name.clone())),
    );
    fields.extend(category.category_fields.iter().copied().map(EditorField::Field));

    fields
}

/// Find the active category a plan type key refers to.
///
/// `None` means no schema constraints are available for the key.
#[must_use]
pub fn schema_for<'a>(categories: &'a [Category], plan_type: &str) -> Option<&'a Category> {
    let key = PlanTypeKey::parse(plan_type)?;
    categories
        .iter()
        .find(|category| category.is_active && category.matches(key))
}

/// Check that a new plan references an active category.
///
/// Only applied when creating plans; updates of legacy plans whose category
/// no longer exists stay unconstrained.
///
/// # Errors
///
/// Returns a `plan_type` violation when the key is empty or resolves to no
/// active category.
pub fn check_plan_type(categories: &[Category], draft: &PlanDraft) -> Result<(), Violations> {
    let plan_type = draft.plan_type.trim();
    let reason = if plan_type.is_empty() {
        ViolationReason::Required
    } else if schema_for(categories, plan_type).is_none() {
        ViolationReason::UnknownCategory
    } else {
        return Ok(());
    };
    Violations::into_result(vec![Violation::new("plan_type", reason)])
}

/// Coerce and validate a draft against an optional category.
///
/// With no category every coerced payload is accepted.
///
/// # Errors
///
/// Returns every violation found; nothing is normalized on failure.
pub fn validate(category: Option<&Category>, draft: &PlanDraft) -> Result<PlanInput, Violations> {
    let mut violations = Vec::new();

    let plan_name = draft.plan_name.trim();
    if plan_name.is_empty() {
        violations.push(Violation::new("plan_name", ViolationReason::Required));
    }
    let plan_type = draft.plan_type.trim();
    if plan_type.is_empty() {
        violations.push(Violation::new("plan_type", ViolationReason::Required));
    }

    let base_price = draft::parse_price(&draft.base_price)
        .map_err(|reason| violations.push(Violation::new("base_price", reason)))
        .ok();

    let mut count = |field: &str, raw: &str| {
        draft::parse_optional_count(raw)
            .map_err(|reason| violations.push(Violation::new(field, reason)))
            .ok()
            .flatten()
    };
    let cpu_cores = count("cpu_cores", &draft.cpu_cores);
    let memory_gb = count("memory_gb", &draft.memory_gb);
    let disk_gb = count("disk_gb", &draft.disk_gb);

    let attributes = coerce_attributes(category, &draft.attributes, &mut violations);

    if let Some(category) = category {
        let resources = [
            ("cpu", cpu_cores.map(Quantity::cores)),
            ("ram", memory_gb.map(Quantity::gigabytes)),
            ("disk_space", disk_gb.map(Quantity::gigabytes)),
        ];
        for (resource, value) in resources {
            if let (Some(spec), Some(value)) = (category.resource_specs.get(resource), value) {
                check_resource(resource, spec, &value, &mut violations);
            }
        }

        if let Some(rules) = category.effective_validation_rules() {
            for (name, rule) in rules {
                let Ok(field) = name.parse::<FieldId>() else {
                    continue;
                };
                if let Some(FieldValue::Count(value)) = attributes.get(&field)
                    && let Err(out) = rule.check(value)
                {
                    violations.push(Violation::new(name.as_str(), out.into()));
                }
            }
        }
    }

    Violations::into_result(violations)?;

    let keeps_games = category.is_none_or(|c| c.category_type == CategoryType::Gameserver);
    let supported_games = Some(draft::split_lines(&draft.supported_games))
        .filter(|games| keeps_games && !games.is_empty());

    Ok(PlanInput {
        plan_name: plan_name.to_owned(),
        plan_type: plan_type.to_owned(),
        base_price: base_price.unwrap_or_default(),
        cpu_cores,
        memory_gb,
        disk_gb,
        features: draft::split_lines(&draft.features),
        supported_games,
        popular: draft.popular,
        attributes,
    })
}

fn check_resource(
    resource: &str,
    spec: &ResourceSpec,
    value: &Quantity,
    violations: &mut Vec<Violation>,
) {
    if let Err(out) = spec.check(value) {
        violations.push(Violation::new(resource, out.into()));
    }
}

/// Parse attributes, dropping those the category does not expose.
fn coerce_attributes(
    category: Option<&Category>,
    raw: &BTreeMap<FieldId, String>,
    violations: &mut Vec<Violation>,
) -> BTreeMap<FieldId, FieldValue> {
    let mut attributes = BTreeMap::new();
    for (&field, value) in raw {
        if category.is_some_and(|c| !c.category_fields.contains(&field)) {
            continue;
        }
        match draft::parse_attribute(field, value) {
            Ok(Some(value)) => {
                attributes.insert(field, value);
            }
            Ok(None) => {}
            Err(reason) => violations.push(Violation::new(field.as_str(), reason)),
        }
    }
    attributes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::bootstrap::default_categories;
    use crate::types::category::SubType;

    fn shared_ssd() -> Category {
        serde_json::from_str(
            r#"{
                "id": "cat-ssd",
                "name": "SSD Shared Hosting",
                "type": "shared",
                "sub_type": "ssd",
                "resource_specs": {
                    "disk_space": {"min": "5 GB", "max": "100 GB", "default": "10 GB"},
                    "bandwidth": {"default": "Unlimited"},
                    "inodes": {"max": "250000"}
                },
                "validation_rules": {"websites": {"min": 1, "max": 50, "default": 1}},
                "category_fields": ["ssl_certificate", "websites", "databases"]
            }"#,
        )
        .unwrap()
    }

    fn draft(disk_gb: &str) -> PlanDraft {
        PlanDraft {
            plan_name: "Starter".to_string(),
            plan_type: "ssd_shared".to_string(),
            base_price: "4.99".to_string(),
            disk_gb: disk_gb.to_string(),
            ..PlanDraft::default()
        }
    }

    #[test]
    fn test_fields_for_orders_core_resources_then_fields() {
        let fields = fields_for(&shared_ssd());
        let keys: Vec<_> = fields.iter().map(EditorField::key).collect();
        assert_eq!(
            keys,
            vec![
                "plan_name",
                "base_price",
                "disk_space",
                "bandwidth",
                "inodes",
                "websites",
                "databases",
                "ssl_certificate",
            ]
        );
    }

    #[test]
    fn test_fields_for_is_idempotent() {
        let category = shared_ssd();
        assert_eq!(fields_for(&category), fields_for(&category));
    }

    #[test]
    fn test_disk_above_max_is_rejected() {
        let violations = validate(Some(&shared_ssd()), &draft("150")).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations.contains("disk_space", ViolationReason::ExceedsMax));
    }

    #[test]
    fn test_disk_within_range_is_accepted() {
        let input = validate(Some(&shared_ssd()), &draft("10")).unwrap();
        assert_eq!(input.disk_gb, Some(10));
        assert_eq!(input.base_price, Decimal::new(499, 2));
    }

    #[test]
    fn test_disk_below_min_is_rejected() {
        let violations = validate(Some(&shared_ssd()), &draft("1")).unwrap_err();
        assert!(violations.contains("disk_space", ViolationReason::BelowMin));
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut bad = draft("150");
        bad.plan_name = String::new();
        bad.base_price = "abc".to_string();
        bad.cpu_cores = "-2".to_string();
        let violations = validate(Some(&shared_ssd()), &bad).unwrap_err();

        assert!(violations.contains("plan_name", ViolationReason::Required));
        assert!(violations.contains("base_price", ViolationReason::NotANumber));
        assert!(violations.contains("cpu_cores", ViolationReason::Negative));
        assert!(violations.contains("disk_space", ViolationReason::ExceedsMax));
    }

    #[test]
    fn test_validation_rules_apply_to_attributes() {
        let mut over = draft("10");
        over.attributes.insert(FieldId::Websites, "51".to_string());
        let violations = validate(Some(&shared_ssd()), &over).unwrap_err();
        assert!(violations.contains("websites", ViolationReason::ExceedsMax));

        over.attributes.insert(FieldId::Websites, "0".to_string());
        let violations = validate(Some(&shared_ssd()), &over).unwrap_err();
        assert!(violations.contains("websites", ViolationReason::BelowMin));
    }

    #[test]
    fn test_validation_rules_ignored_outside_shared() {
        let mut category = shared_ssd();
        category.category_type = CategoryType::Vps;
        let mut over = draft("10");
        over.plan_type = "ssd_vps".to_string();
        over.attributes.insert(FieldId::Websites, "500".to_string());
        assert!(validate(Some(&category), &over).is_ok());
    }

    #[test]
    fn test_unexposed_attributes_are_stripped() {
        let mut extra = draft("10");
        extra.attributes.insert(FieldId::RootAccess, "yes".to_string());
        extra.attributes.insert(FieldId::SslCertificate, "yes".to_string());
        let input = validate(Some(&shared_ssd()), &extra).unwrap();

        assert!(!input.attributes.contains_key(&FieldId::RootAccess));
        assert_eq!(
            input.attributes.get(&FieldId::SslCertificate),
            Some(&FieldValue::Flag(true))
        );
    }

    #[test]
    fn test_supported_games_only_kept_for_gameserver() {
        let mut games = draft("10");
        games.supported_games = "Minecraft\nValheim".to_string();
        let input = validate(Some(&shared_ssd()), &games).unwrap();
        assert_eq!(input.supported_games, None);

        let mut category = shared_ssd();
        category.category_type = CategoryType::Gameserver;
        category.sub_type = SubType::Standard;
        games.plan_type = "game_server".to_string();
        let input = validate(Some(&category), &games).unwrap();
        assert_eq!(
            input.supported_games,
            Some(vec!["Minecraft".to_string(), "Valheim".to_string()])
        );
    }

    #[test]
    fn test_empty_resource_is_not_zero() {
        let input = validate(Some(&shared_ssd()), &draft("")).unwrap();
        assert_eq!(input.disk_gb, None);

        let violations = validate(Some(&shared_ssd()), &draft("0")).unwrap_err();
        assert!(violations.contains("disk_space", ViolationReason::BelowMin));
    }

    #[test]
    fn test_price_is_rounded_half_away_from_zero() {
        let mut priced = draft("10");
        priced.base_price = "2.345".to_string();
        let input = validate(Some(&shared_ssd()), &priced).unwrap();
        assert_eq!(input.base_price, Decimal::new(235, 2));
    }

    #[test]
    fn test_accepted_plan_round_trips() {
        let mut full = draft("20");
        full.cpu_cores = "2".to_string();
        full.features = "Free SSL\n\nDaily backups\nFree SSL".to_string();
        full.attributes.insert(FieldId::Websites, "10".to_string());
        full.attributes.insert(FieldId::SslCertificate, "on".to_string());
        full.popular = true;

        let category = shared_ssd();
        let first = validate(Some(&category), &full).unwrap();
        let second = validate(Some(&category), &PlanDraft::from(&first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.features.len(), 3);
    }

    #[test]
    fn test_absent_schema_accepts_coerced_payload() {
        let categories = default_categories();
        assert!(schema_for(&categories, "legacy_type").is_none());

        let mut legacy = draft("9999");
        legacy.plan_type = "legacy_type".to_string();
        legacy.attributes.insert(FieldId::RootAccess, "no".to_string());
        let input = validate(None, &legacy).unwrap();
        assert_eq!(input.disk_gb, Some(9999));
        assert_eq!(
            input.attributes.get(&FieldId::RootAccess),
            Some(&FieldValue::Flag(false))
        );
    }

    #[test]
    fn test_validate_is_total() {
        let category = shared_ssd();
        let drafts = [
            PlanDraft::default(),
            draft("10"),
            draft("150"),
            draft("ten"),
        ];
        for candidate in &drafts {
            match validate(Some(&category), candidate) {
                Ok(input) => assert!(!input.plan_name.is_empty()),
                Err(violations) => assert!(!violations.is_empty()),
            }
        }
    }

    #[test]
    fn test_schema_for_skips_inactive_categories() {
        let mut categories = vec![shared_ssd()];
        assert!(schema_for(&categories, "ssd_shared").is_some());
        assert!(schema_for(&categories, "shared_ssd").is_some());
        categories[0].is_active = false;
        assert!(schema_for(&categories, "ssd_shared").is_none());
    }

    #[test]
    fn test_check_plan_type_for_creation() {
        let categories = default_categories();
        assert!(check_plan_type(&categories, &draft("10")).is_ok());

        let mut unknown = draft("10");
        unknown.plan_type = "premium_dedicated".to_string();
        let violations = check_plan_type(&categories, &unknown).unwrap_err();
        assert!(violations.contains("plan_type", ViolationReason::UnknownCategory));

        unknown.plan_type = " ".to_string();
        let violations = check_plan_type(&categories, &unknown).unwrap_err();
        assert!(violations.contains("plan_type", ViolationReason::Required));
    }
}
