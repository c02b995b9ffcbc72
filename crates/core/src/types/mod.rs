//! Core catalog types for Hostdeck.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod bounds;
pub mod category;
pub mod company;
pub mod field;
pub mod id;
pub mod plan;
pub mod plan_type;
pub mod public;
pub mod quantity;

pub use bounds::{Bounds, BoundsError, Measure, OutOfBounds, ResourceSpec, ValidationRule};
pub use category::{Category, CategoryDraft, CategoryType, SubType, sort_for_display};
pub use company::CompanyInfo;
pub use field::{FieldId, FieldKind, FieldValue};
pub use id::*;
pub use plan::{Plan, PlanInput};
pub use plan_type::PlanTypeKey;
pub use public::{ContactMessage, LegalContent, LegalDocument, PromoCode, ServiceState, SystemStatus};
pub use quantity::{Quantity, QuantityError, Unit};
