//! Hostdeck Core - Catalog types and the plan conformance engine.
//!
//! This crate provides the types shared by every Hostdeck component:
//! - `admin` - Session, schema registry and admin gateway library
//! - `cli` - The `hostdeck` operator console
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no caches. Everything here is deterministic given its inputs,
//! which keeps schema checks testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Categories, plans, quantities, bounds and field identifiers
//! - [`conformance`] - Editor field derivation and plan validation
//! - [`bootstrap`] - Built-in categories used when the backend is unavailable

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod conformance;
pub mod types;

pub use conformance::{EditorField, Violation, ViolationReason, Violations};
pub use types::*;
