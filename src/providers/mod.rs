// ABOUTME: Health data provider adapters for the platform health store and synthetic fallback
// ABOUTME: Unifies record access behind the HealthProvider trait so the orchestrator stays source-agnostic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

use crate::config::BridgeConfig;
use crate::constants::provider_names;
use anyhow::Result;

pub mod core;
pub mod health_connect;
pub mod synthetic;

pub use self::core::HealthProvider;
pub use health_connect::HealthConnectProvider;
pub use synthetic::SyntheticProvider;

/// Create a health provider instance based on the provider name
///
/// # Errors
///
/// Returns an error if the provider name is not supported
pub fn create_provider(
    name: &str,
    bridge: &BridgeConfig,
) -> Result<Box<dyn HealthProvider>> {
    match name.to_lowercase().as_str() {
        provider_names::HEALTH_CONNECT => Ok(Box::new(HealthConnectProvider::new(bridge))),
        provider_names::SYNTHETIC => Ok(Box::new(SyntheticProvider::new())),
        _ => Err(anyhow::anyhow!(
            "Unknown provider: {name}. Currently supported: health_connect, synthetic"
        )),
    }
}
