// ABOUTME: Main library entry point for the FitWell health-data sync core
// ABOUTME: Fetches device health records, aggregates daily summaries, and uploads them to the backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

#![deny(unsafe_code)]

//! # FitWell Sync
//!
//! The health-data synchronization core of the FitWell fitness platform.
//! One sync reads raw records (steps, distance, calories, heart rate,
//! sleep, exercise) from a health data provider, aggregates them into
//! per-day summaries and derived entities, and uploads the payload to the
//! FitWell backend.
//!
//! ## Features
//!
//! - **Pluggable providers**: the live Health Connect bridge or a
//!   deterministic synthetic generator, behind one trait
//! - **Pure aggregation**: order-independent daily rollups, sleep
//!   categorization, and workout mapping
//! - **Tagged failure taxonomy**: every failed attempt surfaces a typed
//!   reason so callers can branch to fallbacks
//! - **Single in-flight sync**: concurrent attempts are rejected, never
//!   interleaved
//!
//! ## Example
//!
//! ```rust,no_run
//! use fitwell_sync::api::ApiClient;
//! use fitwell_sync::config::SyncConfig;
//! use fitwell_sync::providers::SyntheticProvider;
//! use fitwell_sync::sync::SyncOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SyncConfig::from_env()?;
//!     let api = ApiClient::new(&config.api);
//!     let orchestrator = SyncOrchestrator::new(SyntheticProvider::new(), api, &config);
//!
//!     let report = orchestrator.sync().await?;
//!     println!("Synced {} days", report.days);
//!     Ok(())
//! }
//! ```

/// Pure aggregation from raw records into upload entities
pub mod aggregate;

/// HTTP client for the FitWell backend REST API
pub mod api;

/// Environment-based configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Unified error taxonomy for sync attempts and provider operations
pub mod errors;

/// Logging configuration and structured logging utilities
pub mod logging;

/// Shared data model for records, summaries, and the sync payload
pub mod models;

/// Health data provider adapters
pub mod providers;

/// Sync orchestration state machine
pub mod sync;
