//! Hostdeck Admin library.
//!
//! Everything the operator console needs to talk to the catalog backend:
//! - [`config`] - Environment configuration
//! - [`api`] - JSON transport over `reqwest`
//! - [`session`] - Bearer token lifecycle and persistence
//! - [`registry`] - Category schemas with a built-in fallback
//! - [`cache`] - Catalog cache with stale-fetch protection
//! - [`gateway`] - Authenticated category, plan and company operations
//! - [`public`] - Unauthenticated read endpoints
//!
//! # Security
//!
//! The bearer token authorizes catalog mutations. It is held as a
//! `SecretString`, redacted from `Debug` output, marked sensitive in request
//! headers, and persisted with owner-only permissions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod public;
pub mod registry;
pub mod session;

pub use config::{ConfigError, ConsoleConfig};
pub use error::AdminError;
pub use gateway::{AdminGateway, DeletionConfirmed};
pub use public::PublicClient;
pub use registry::{CatalogSource, CategoryListing, EmptyCatalogPolicy, SchemaUnavailable};
pub use session::{FileTokenStore, MemoryTokenStore, SessionStore, TokenStore, TokenStoreError};
