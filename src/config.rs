// MIT License - Copyright (c) 2026 Peter Wright
// Integration configuration

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Experimental settings, all off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExperimentalConfig {
    /// Re-publish entity state on every refresh, even when unchanged.
    #[serde(default)]
    pub force_update: bool,
}

/// Process-wide settings shared by every entity of the integration.
///
/// Passed explicitly to the coordinator at construction; entities read it
/// through the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub experimental: ExperimentalConfig,
}

impl IntegrationConfig {
    pub fn force_update(&self) -> bool {
        self.experimental.force_update
    }
}

/// A configured alarm system (one config entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryConfig {
    /// Stable id of the entry; prefix of every unique id.
    pub entry_id: String,
    /// Optional user-facing name of the alarm system.
    #[serde(default)]
    pub system_name: Option<String>,
    /// Account username, used for entity ids when no system name is set.
    #[serde(default)]
    pub username: Option<String>,
}

impl EntryConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> EntryConfigBuilder {
        EntryConfigBuilder::default()
    }

    /// Name used as entity id prefix: system name, else username.
    pub fn display_prefix(&self) -> Option<&str> {
        self.system_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.entry_id.trim().is_empty() {
            return Err(BridgeError::Config {
                details: "entry_id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for EntryConfig.
#[derive(Debug, Clone, Default)]
pub struct EntryConfigBuilder {
    config: EntryConfig,
}

impl EntryConfigBuilder {
    pub fn entry_id(mut self, id: impl Into<String>) -> Self {
        self.config.entry_id = id.into();
        self
    }

    pub fn system_name(mut self, name: impl Into<String>) -> Self {
        self.config.system_name = Some(name.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    pub fn build(self) -> EntryConfig {
        self.config
    }
}
