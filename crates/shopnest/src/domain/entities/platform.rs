//! PlatformInfo - Static Platform Facts
//!
//! Loaded once at startup and shared read-only for the process lifetime.

use serde::{Deserialize, Serialize};

/// Facts about the storefront used to ground provider answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub return_policy: String,
    pub payment_methods: String,
    pub customer_support: String,
}

impl PlatformInfo {
    /// Parse platform facts from their JSON representation
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
