//! Read-only types served by the public endpoints.
//!
//! These are consumed at the boundary only; the console displays them but
//! never edits them.

use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A promotional code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub discount: Option<String>,
    /// Where the code may be shown (e.g. `homepage`, `vps`).
    #[serde(default)]
    pub placement: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    /// Whether the code should be shown at `placement` at time `now`.
    #[must_use]
    pub fn is_visible_at(&self, placement: &str, now: DateTime<Utc>) -> bool {
        self.is_active
            && self
                .placement
                .as_deref()
                .is_some_and(|p| p.eq_ignore_ascii_case(placement))
            && self.expires_at.is_none_or(|expires| expires > now)
    }
}

/// Status of a single monitored service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceState {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub uptime: Option<String>,
}

/// Overall system status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub overall: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceState>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Legal documents served by `/content/{type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalDocument {
    Terms,
    Privacy,
}

impl LegalDocument {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terms => "terms",
            Self::Privacy => "privacy",
        }
    }
}

impl fmt::Display for LegalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalDocument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terms" => Ok(Self::Terms),
            "privacy" => Ok(Self::Privacy),
            _ => Err(format!("invalid legal document: {s} (expected terms or privacy)")),
        }
    }
}

/// Body of a legal document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}
