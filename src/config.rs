//! Registry Configuration
//!
//! [`RegistryConfig`] controls what happens to an entry after its native
//! resource is released, and how teardown reports leaked references.
//!
//! ```rust,ignore
//! use devres::config::{RegistryConfig, TombstonePolicy};
//!
//! // Default: entries are evicted as soon as they are released.
//! let config = RegistryConfig::default();
//!
//! // Keep released entries around so late misuse is diagnosed precisely.
//! let config = RegistryConfig::default()
//!     .with_tombstones(TombstonePolicy::Retain)
//!     .with_label_prefix("session-a/");
//!
//! // Or from JSON; missing fields take their defaults.
//! let config = RegistryConfig::from_json_str(r#"{ "tombstones": "retain" }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// What the registry keeps after an entry's native resource is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TombstonePolicy {
    /// Remove the entry once it is released and no references remain.
    /// Later calls with its id report `NotFound`.
    #[default]
    Evict,
    /// Keep released entries until [`purge_tombstones`](crate::registry::HandleRegistry::purge_tombstones).
    /// Later calls report `AlreadyReleased` / `UnderRelease` instead of `NotFound`.
    Retain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub tombstones: TombstonePolicy,
    /// Log a warning for every entry still referenced at teardown.
    pub warn_on_leaks: bool,
    /// When set, entries registered without a label get `"{prefix}{kind}-{n}"`.
    pub label_prefix: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tombstones: TombstonePolicy::Evict,
            warn_on_leaks: true,
            label_prefix: None,
        }
    }
}

impl RegistryConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.label_prefix
            && prefix.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "label_prefix must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_tombstones(mut self, policy: TombstonePolicy) -> Self {
        self.tombstones = policy;
        self
    }

    #[must_use]
    pub fn with_leak_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_leaks = enabled;
        self
    }

    #[must_use]
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = Some(prefix.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn retains_tombstones(&self) -> bool {
        self.tombstones == TombstonePolicy::Retain
    }
}
