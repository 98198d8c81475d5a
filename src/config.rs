//! Host-supplied cache settings.
//!
//! The host environment hands the cache a small settings object at startup:
//!
//! ```json
//! {
//!   "siteId": 1,
//!   "networkId": 1,
//!   "isMultisite": false,
//!   "i18n": { "noImplementationSet": "No cache implementation set." }
//! }
//! ```
//!
//! [`Settings`] can be parsed from that JSON object or loaded from a TOML file
//! using the same field names. Missing fields fall back to single-site defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;

/// Result of settings validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Settings consumed by the cache facade and its backends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_id")]
    pub site_id: u64,
    #[serde(default = "default_id")]
    pub network_id: u64,
    #[serde(default)]
    pub is_multisite: bool,
    #[serde(default)]
    pub i18n: Messages,
}

/// Translated messages used in log output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    #[serde(default = "default_no_implementation_set")]
    pub no_implementation_set: String,
}

fn default_id() -> u64 {
    1
}

fn default_no_implementation_set() -> String {
    constants::NO_IMPLEMENTATION_MESSAGE.to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_implementation_set: default_no_implementation_set(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_id: default_id(),
            network_id: default_id(),
            is_multisite: false,
            i18n: Messages::default(),
        }
    }
}

impl Settings {
    /// Settings for a multisite install, starting in the given site and network.
    pub fn multisite(site_id: u64, network_id: u64) -> Self {
        Self {
            site_id,
            network_id,
            is_multisite: true,
            ..Self::default()
        }
    }

    /// Parse the settings object supplied by the host as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or a field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse cache settings JSON")
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - A field has an invalid type
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Validate settings.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the site or network id is 0.
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.site_id == 0 {
            errors.push("siteId must be a positive integer".to_string());
        }
        if self.network_id == 0 {
            errors.push("networkId must be a positive integer".to_string());
        }

        if self.i18n.no_implementation_set.trim().is_empty() {
            warnings.push(
                "i18n.noImplementationSet is empty; missing-backend warnings will be blank"
                    .to_string(),
            );
        }

        if !self.is_multisite && (self.site_id != 1 || self.network_id != 1) {
            warnings.push(format!(
                "isMultisite is false but siteId={} networkId={}; switching is disabled",
                self.site_id, self.network_id
            ));
        }

        if !errors.is_empty() {
            anyhow::bail!("Invalid cache settings:\n  - {}", errors.join("\n  - "));
        }

        Ok(ValidationResult { warnings })
    }
}
