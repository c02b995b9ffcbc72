//! Company information shown on the public site.

use serde::{Deserialize, Serialize};

/// Company contact details.
///
/// Fields the console does not know about are kept in `extra` so an update
/// never drops data another client wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
