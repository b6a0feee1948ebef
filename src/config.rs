// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, validation, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! Environment-based configuration management

use crate::constants::{defaults, env_config};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// FitWell backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Bearer token attached to every request, when present
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.into(),
            auth_token: None,
            timeout_secs: defaults::UPLOAD_TIMEOUT_SECS,
        }
    }
}

/// Health Connect bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Bridge base URL, e.g. `http://localhost:9080`
    pub base_url: String,
    /// Request timeout in seconds, applied per record read
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BRIDGE_BASE_URL.into(),
            timeout_secs: defaults::FETCH_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration for one sync deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Health Connect bridge settings
    pub bridge: BridgeConfig,
    /// How many days of history one sync covers
    pub window_days: u32,
    /// Per-metric fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            bridge: BridgeConfig::default(),
            window_days: defaults::SYNC_WINDOW_DAYS,
            fetch_timeout_secs: defaults::FETCH_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a configured value fails validation
    pub fn from_env() -> Result<Self> {
        let config = Self {
            api: ApiConfig {
                base_url: env_config::api_base_url(),
                auth_token: env_config::api_token(),
                timeout_secs: env_config::upload_timeout_secs(),
            },
            bridge: BridgeConfig {
                base_url: env_config::bridge_base_url(),
                timeout_secs: env_config::fetch_timeout_secs(),
            },
            window_days: env_config::sync_window_days(),
            fetch_timeout_secs: env_config::fetch_timeout_secs(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable base URLs or a zero-length window
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)
            .with_context(|| format!("FITWELL_API_URL is not a valid URL: {}", self.api.base_url))?;
        Url::parse(&self.bridge.base_url).with_context(|| {
            format!("HEALTH_BRIDGE_URL is not a valid URL: {}", self.bridge.base_url)
        })?;

        anyhow::ensure!(self.window_days >= 1, "SYNC_WINDOW_DAYS must be at least 1");
        anyhow::ensure!(
            self.fetch_timeout_secs >= 1,
            "SYNC_FETCH_TIMEOUT_SECS must be at least 1"
        );
        anyhow::ensure!(
            self.api.timeout_secs >= 1,
            "FITWELL_API_TIMEOUT_SECS must be at least 1"
        );

        Ok(())
    }

    /// One-line summary safe for logging (the token is elided)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "api={} bridge={} window_days={} token={}",
            self.api.base_url,
            self.bridge.base_url,
            self.window_days,
            if self.api.auth_token.is_some() {
                "set"
            } else {
                "unset"
            }
        )
    }
}
