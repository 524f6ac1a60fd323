//! Configuration Management
//!
//! Handles persistent configuration storage for vmscout.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::azure;
use crate::fanout;
use crate::gcp;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Azure management-plane endpoint override
    #[serde(default)]
    pub azure_base_url: Option<String>,
    /// Compute Engine endpoint override
    #[serde(default)]
    pub gcp_compute_base_url: Option<String>,
    /// Resource Manager endpoint override
    #[serde(default)]
    pub gcp_resource_manager_base_url: Option<String>,
    /// Cap on concurrently running fan-out scope tasks
    #[serde(default)]
    pub fanout_concurrency: Option<usize>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vmscout").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    pub fn effective_azure_base_url(&self) -> &str {
        self.azure_base_url
            .as_deref()
            .unwrap_or(azure::client::DEFAULT_BASE_URL)
    }

    pub fn effective_gcp_compute_base_url(&self) -> &str {
        self.gcp_compute_base_url
            .as_deref()
            .unwrap_or(gcp::client::DEFAULT_COMPUTE_BASE_URL)
    }

    pub fn effective_gcp_resource_manager_base_url(&self) -> &str {
        self.gcp_resource_manager_base_url
            .as_deref()
            .unwrap_or(gcp::client::DEFAULT_RESOURCE_MANAGER_BASE_URL)
    }

    pub fn effective_fanout_concurrency(&self) -> usize {
        self.fanout_concurrency.unwrap_or(fanout::DEFAULT_CONCURRENCY)
    }
}
