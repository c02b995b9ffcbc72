//! Togglable category fields and their values.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Field identifiers a category can expose in the plan editor.
///
/// Declaration order is the editor's presentation order; `Ord` follows it so
/// a `BTreeSet<FieldId>` iterates in vocabulary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Websites,
    Subdomains,
    Databases,
    EmailAccounts,
    ParkedDomains,
    AddonDomains,
    RootAccess,
    OsChoice,
    BackupIncluded,
    SslCertificate,
    WordpressSupport,
}

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer limit.
    Count,
    /// Yes/no capability.
    Flag,
    /// Free text.
    Text,
}

impl FieldId {
    /// Every field in vocabulary order.
    pub const ALL: [Self; 11] = [
        Self::Websites,
        Self::Subdomains,
        Self::Databases,
        Self::EmailAccounts,
        Self::ParkedDomains,
        Self::AddonDomains,
        Self::RootAccess,
        Self::OsChoice,
        Self::BackupIncluded,
        Self::SslCertificate,
        Self::WordpressSupport,
    ];

    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Websites => "websites",
            Self::Subdomains => "subdomains",
            Self::Databases => "databases",
            Self::EmailAccounts => "email_accounts",
            Self::ParkedDomains => "parked_domains",
            Self::AddonDomains => "addon_domains",
            Self::RootAccess => "root_access",
            Self::OsChoice => "os_choice",
            Self::BackupIncluded => "backup_included",
            Self::SslCertificate => "ssl_certificate",
            Self::WordpressSupport => "wordpress_support",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Websites
            | Self::Subdomains
            | Self::Databases
            | Self::EmailAccounts
            | Self::ParkedDomains
            | Self::AddonDomains => FieldKind::Count,
            Self::RootAccess
            | Self::BackupIncluded
            | Self::SslCertificate
            | Self::WordpressSupport => FieldKind::Flag,
            Self::OsChoice => FieldKind::Text,
        }
    }

    /// Human-readable editor label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Websites => "Websites",
            Self::Subdomains => "Subdomains",
            Self::Databases => "Databases",
            Self::EmailAccounts => "Email accounts",
            Self::ParkedDomains => "Parked domains",
            Self::AddonDomains => "Addon domains",
            Self::RootAccess => "Root access",
            Self::OsChoice => "OS choice",
            Self::BackupIncluded => "Backups included",
            Self::SslCertificate => "SSL certificate",
            Self::WordpressSupport => "WordPress support",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown category field: {s}"))
    }
}

/// A field value stored on a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Count(u32),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(value) => write!(f, "{value}"),
            Self::Count(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_from_str_round_trips_every_field() {
        for field in FieldId::ALL {
            assert_eq!(field.as_str().parse::<FieldId>(), Ok(field));
        }
        assert!("ftp_accounts".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_set_iterates_in_vocabulary_order() {
        let set: BTreeSet<FieldId> = [FieldId::OsChoice, FieldId::Websites, FieldId::RootAccess]
            .into_iter()
            .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![FieldId::Websites, FieldId::RootAccess, FieldId::OsChoice]
        );
    }

    #[test]
    fn test_field_value_untagged_serde() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[true, 10, "Ubuntu 24.04"]"#).unwrap_or_default();
        assert_eq!(
            values,
            vec![
                FieldValue::Flag(true),
                FieldValue::Count(10),
                FieldValue::Text("Ubuntu 24.04".to_string())
            ]
        );
    }
}
