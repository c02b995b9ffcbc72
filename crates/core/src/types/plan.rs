//! Concrete hosting plans.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{FieldId, FieldValue};
use super::id::PlanId;
use super::plan_type::PlanTypeKey;

/// A plan as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(alias = "_id")]
    pub id: PlanId,
    pub plan_name: String,
    pub plan_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(default)]
    pub cpu_cores: Option<u32>,
    #[serde(default)]
    pub memory_gb: Option<u32>,
    #[serde(default)]
    pub disk_gb: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub supported_games: Option<Vec<String>>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<FieldId, FieldValue>,
}

impl Plan {
    /// The normalized payload of this plan, without its identifier.
    #[must_use]
    pub fn input(&self) -> PlanInput {
        PlanInput {
            plan_name: self.plan_name.clone(),
            plan_type: self.plan_type.clone(),
            base_price: self.base_price,
            cpu_cores: self.cpu_cores,
            memory_gb: self.memory_gb,
            disk_gb: self.disk_gb,
            features: self.features.clone(),
            supported_games: self.supported_games.clone(),
            popular: self.popular,
            attributes: self.attributes.clone(),
        }
    }

    /// The category key this plan references, if it is a recognized one.
    #[must_use]
    pub fn plan_type_key(&self) -> Option<PlanTypeKey> {
        PlanTypeKey::parse(&self.plan_type)
    }
}

/// A validated plan payload ready to be sent to the backend.
///
/// Only produced by [`crate::conformance::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInput {
    pub plan_name: String,
    pub plan_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub cpu_cores: Option<u32>,
    pub memory_gb: Option<u32>,
    pub disk_gb: Option<u32>,
    pub features: Vec<String>,
    pub supported_games: Option<Vec<String>>,
    pub popular: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<FieldId, FieldValue>,
}
