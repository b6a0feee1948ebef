// ABOUTME: System-wide constants and configuration values for the FitWell sync core
// ABOUTME: Contains provider record types, defaults, and environment variable configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! This module provides both hardcoded constants and environment variable helpers.

/// Service identity constants
pub mod service {
    /// Service name used in structured logs
    pub const NAME: &str = "fitwell-sync";

    /// Service version from Cargo.toml
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Health data provider names
pub mod provider_names {
    /// Live Health Connect bridge provider
    pub const HEALTH_CONNECT: &str = "health_connect";

    /// Deterministic synthetic sample-data provider
    pub const SYNTHETIC: &str = "synthetic";
}

/// Provider record type identifiers, as exposed by the Health Connect bridge
pub mod record_types {
    pub const STEPS: &str = "Steps";
    pub const DISTANCE: &str = "Distance";
    pub const TOTAL_CALORIES: &str = "TotalCaloriesBurned";
    pub const ACTIVE_CALORIES: &str = "ActiveCaloriesBurned";
    pub const HEART_RATE: &str = "HeartRate";
    pub const SLEEP_SESSION: &str = "SleepSession";
    pub const EXERCISE_SESSION: &str = "ExerciseSession";
}

/// Default configuration values
pub mod defaults {
    /// Default FitWell backend base URL
    pub const API_BASE_URL: &str = "http://localhost:8000/api";

    /// Default Health Connect bridge base URL
    pub const BRIDGE_BASE_URL: &str = "http://localhost:9080";

    /// Default sync window in days
    pub const SYNC_WINDOW_DAYS: u32 = 7;

    /// Default timeout for a single metric read
    pub const FETCH_TIMEOUT_SECS: u64 = 10;

    /// Default timeout for the payload upload
    pub const UPLOAD_TIMEOUT_SECS: u64 = 30;

    /// Default TCP connect timeout for outbound HTTP clients
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Sleep quality duration thresholds in hours
pub mod sleep_thresholds {
    /// Lower bound of the excellent band (inclusive)
    pub const EXCELLENT_MIN_HOURS: f64 = 7.0;

    /// Upper bound of the excellent band (inclusive)
    pub const EXCELLENT_MAX_HOURS: f64 = 9.0;

    /// Lower bound of the good band (inclusive)
    pub const GOOD_MIN_HOURS: f64 = 6.0;

    /// Lower bound of the fair band (inclusive)
    pub const FAIR_MIN_HOURS: f64 = 5.0;
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Get the FitWell backend base URL from environment or default
    #[must_use]
    pub fn api_base_url() -> String {
        env::var("FITWELL_API_URL").unwrap_or_else(|_| super::defaults::API_BASE_URL.into())
    }

    /// Get the bearer token for the FitWell backend, if configured
    #[must_use]
    pub fn api_token() -> Option<String> {
        env::var("FITWELL_API_TOKEN").ok().filter(|t| !t.is_empty())
    }

    /// Get the Health Connect bridge base URL from environment or default
    #[must_use]
    pub fn bridge_base_url() -> String {
        env::var("HEALTH_BRIDGE_URL").unwrap_or_else(|_| super::defaults::BRIDGE_BASE_URL.into())
    }

    /// Get the sync window in days from environment or default
    #[must_use]
    pub fn sync_window_days() -> u32 {
        env::var("SYNC_WINDOW_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(super::defaults::SYNC_WINDOW_DAYS)
    }

    /// Get the per-metric fetch timeout in seconds from environment or default
    #[must_use]
    pub fn fetch_timeout_secs() -> u64 {
        env::var("SYNC_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(super::defaults::FETCH_TIMEOUT_SECS)
    }

    /// Get the upload timeout in seconds from environment or default
    #[must_use]
    pub fn upload_timeout_secs() -> u64 {
        env::var("FITWELL_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(super::defaults::UPLOAD_TIMEOUT_SECS)
    }
}
