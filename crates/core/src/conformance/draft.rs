//! Raw plan editor input and the coercion rules applied to it.
//!
//! Every editor input arrives as text. Numbers, flags and lists are only
//! interpreted during validation so a bad value becomes a violation instead of
//! a parse failure.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use super::violation::ViolationReason;
use crate::types::field::{FieldId, FieldKind, FieldValue};
use crate::types::plan::{Plan, PlanInput};

/// Plan editor input as typed by the operator.
///
/// Deserializes leniently from YAML or JSON: scalar fields accept numbers and
/// booleans, list fields accept either a newline-delimited string or a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDraft {
    #[serde(default, deserialize_with = "text")]
    pub plan_name: String,
    #[serde(default, deserialize_with = "text")]
    pub plan_type: String,
    #[serde(default, deserialize_with = "text")]
    pub base_price: String,
    #[serde(default, deserialize_with = "text")]
    pub cpu_cores: String,
    #[serde(default, deserialize_with = "text")]
    pub memory_gb: String,
    #[serde(default, deserialize_with = "text")]
    pub disk_gb: String,
    #[serde(default, deserialize_with = "lines")]
    pub features: String,
    #[serde(default, deserialize_with = "lines")]
    pub supported_games: String,
    #[serde(default)]
    pub popular: bool,
    #[serde(default, deserialize_with = "text_map")]
    pub attributes: BTreeMap<FieldId, String>,
}

impl From<&PlanInput> for PlanDraft {
    fn from(input: &PlanInput) -> Self {
        fn opt(value: Option<u32>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            plan_name: input.plan_name.clone(),
            plan_type: input.plan_type.clone(),
            base_price: input.base_price.to_string(),
            cpu_cores: opt(input.cpu_cores),
            memory_gb: opt(input.memory_gb),
            disk_gb: opt(input.disk_gb),
            features: input.features.join("\n"),
            supported_games: input
                .supported_games
                .as_ref()
                .map(|games| games.join("\n"))
                .unwrap_or_default(),
            popular: input.popular,
            attributes: input
                .attributes
                .iter()
                .map(|(field, value)| (*field, value.to_string()))
                .collect(),
        }
    }
}

impl From<&Plan> for PlanDraft {
    fn from(plan: &Plan) -> Self {
        Self::from(&plan.input())
    }
}

/// Parse a price: required, non-negative, rounded to two decimals.
pub(crate) fn parse_price(raw: &str) -> Result<Decimal, ViolationReason> {
    let raw = raw.trim().trim_start_matches('$').trim();
    if raw.is_empty() {
        return Err(ViolationReason::Required);
    }
    let price = Decimal::from_str(raw).map_err(|_| ViolationReason::NotANumber)?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ViolationReason::Negative);
    }
    let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    Ok(price)
}

/// Parse an optional non-negative integer. Empty input means "not applicable".
pub(crate) fn parse_optional_count(raw: &str) -> Result<Option<u32>, ViolationReason> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = raw.strip_prefix('-')
        && !rest.is_empty()
        && rest.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ViolationReason::Negative);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| ViolationReason::NotAnInteger)
}

/// Split newline-delimited input, dropping blank lines. Order and duplicates
/// are kept.
pub(crate) fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool, ViolationReason> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ViolationReason::NotAFlag),
    }
}

/// Parse an attribute according to its field kind. Empty input is absent.
pub(crate) fn parse_attribute(
    field: FieldId,
    raw: &str,
) -> Result<Option<FieldValue>, ViolationReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match field.kind() {
        FieldKind::Count => parse_optional_count(trimmed).map(|n| n.map(FieldValue::Count)),
        FieldKind::Flag => parse_flag(trimmed).map(|b| Some(FieldValue::Flag(b))),
        FieldKind::Text => Ok(Some(FieldValue::Text(trimmed.to_owned()))),
    }
}

// =============================================================================
// Lenient deserializers
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Null(()),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Bool(b) => b.to_string(),
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Null(()) => String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultiLine {
    Lines(Vec<Scalar>),
    Single(Scalar),
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn lines<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match MultiLine::deserialize(deserializer)? {
        MultiLine::Lines(items) => items
            .into_iter()
            .map(Scalar::into_text)
            .collect::<Vec<_>>()
            .join("\n"),
        MultiLine::Single(scalar) => scalar.into_text(),
    })
}

fn text_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<FieldId, String>, D::Error> {
    let raw = BTreeMap::<FieldId, Scalar>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(field, value)| (field, value.into_text()))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_rounds_to_cents() {
        assert_eq!(parse_price("9.999"), Ok(Decimal::new(1000, 2)));
        assert_eq!(parse_price("$4.5"), Ok(Decimal::new(450, 2)));
        assert_eq!(parse_price("0"), Ok(Decimal::new(0, 2)));
        assert_eq!(parse_price("0.005"), Ok(Decimal::new(1, 2)));
    }

    #[test]
    fn test_parse_price_errors() {
        assert_eq!(parse_price(""), Err(ViolationReason::Required));
        assert_eq!(parse_price("free"), Err(ViolationReason::NotANumber));
        assert_eq!(parse_price("-1"), Err(ViolationReason::Negative));
    }

    #[test]
    fn test_empty_count_is_not_zero() {
        assert_eq!(parse_optional_count(""), Ok(None));
        assert_eq!(parse_optional_count("0"), Ok(Some(0)));
        assert_eq!(parse_optional_count(" 12 "), Ok(Some(12)));
        assert_eq!(parse_optional_count("-3"), Err(ViolationReason::Negative));
        assert_eq!(parse_optional_count("2.5"), Err(ViolationReason::NotAnInteger));
    }

    #[test]
    fn test_split_lines_keeps_order_and_duplicates() {
        let lines = split_lines("Free SSL\n\n  Daily backups \nFree SSL\n");
        assert_eq!(lines, vec!["Free SSL", "Daily backups", "Free SSL"]);
    }

    #[test]
    fn test_parse_attribute_by_kind() {
        assert_eq!(
            parse_attribute(FieldId::Websites, "10"),
            Ok(Some(FieldValue::Count(10)))
        );
        assert_eq!(
            parse_attribute(FieldId::RootAccess, "yes"),
            Ok(Some(FieldValue::Flag(true)))
        );
        assert_eq!(
            parse_attribute(FieldId::RootAccess, "maybe"),
            Err(ViolationReason::NotAFlag)
        );
        assert_eq!(parse_attribute(FieldId::OsChoice, "  "), Ok(None));
    }

    #[test]
    fn test_draft_deserializes_leniently() {
        let draft: PlanDraft = serde_json::from_str(
            r#"{
                "plan_name": "Starter",
                "plan_type": "ssd_shared",
                "base_price": 4.99,
                "disk_gb": 10,
                "features": ["Free SSL", "Daily backups"],
                "attributes": {"websites": 3, "ssl_certificate": true}
            }"#,
        )
        .unwrap();

        assert_eq!(draft.base_price, "4.99");
        assert_eq!(draft.disk_gb, "10");
        assert_eq!(draft.cpu_cores, "");
        assert_eq!(draft.features, "Free SSL\nDaily backups");
        assert_eq!(draft.attributes.get(&FieldId::Websites).map(String::as_str), Some("3"));
        assert_eq!(
            draft.attributes.get(&FieldId::SslCertificate).map(String::as_str),
            Some("true")
        );
    }
}
