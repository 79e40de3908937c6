//! Template package wire format.
//!
//! Authored content and generated content share this camelCase JSON shape:
//! `packageId`, `version`, `generatedAt`, `sceneTemplates`.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use chronicle_core::error::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::templates::SceneTemplate;

/// A bundle of scene templates as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePackage {
    pub package_id: String,
    /// Content version. Stamped with the SHA-256 of the source when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub scene_templates: Vec<SceneTemplate>,
}

impl TemplatePackage {
    /// Parses package JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentDefect` if the JSON is malformed.
    pub fn parse(json: &str) -> Result<Self, DomainError> {
        let mut package: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::ContentDefect(format!("malformed template package: {e}")))?;
        if package.version.is_none() {
            package.version = Some(content_hash(json.as_bytes()));
        }
        Ok(package)
    }

    /// Serializes the package to JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Infrastructure(format!("package serialization failed: {e}")))
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}
