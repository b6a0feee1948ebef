// ABOUTME: Core provider trait for unified health data access
// ABOUTME: Defines the foundational abstraction implemented by the live and synthetic providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Health Provider Contract
//!
//! The [`HealthProvider`] trait is the single seam between the sync
//! orchestrator and a health data source. Two implementations ship with
//! the crate: [`crate::providers::HealthConnectProvider`] reads from the
//! platform health store through a local bridge, and
//! [`crate::providers::SyntheticProvider`] generates deterministic sample
//! data for development and fallback.
//!
//! ## Failure semantics
//!
//! Providers degrade rather than propagate: an unavailable service reports
//! `false` from [`HealthProvider::check_availability`], and a failed read
//! yields an empty record collection after logging. The one exception is
//! [`HealthProvider::request_permissions`], which surfaces denial as a
//! boolean so the caller can branch to a fallback path, and reserves its
//! error channel for transport failures.
//!
//! ## Thread safety
//!
//! All implementations must be `Send + Sync`; the orchestrator issues the
//! per-metric reads concurrently against one shared instance.

use crate::errors::ProviderError;
use crate::models::{HealthRecord, MetricKind, TimeWindow};
use async_trait::async_trait;

/// Source of raw health records for one sync pass
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Provider name (e.g. "health_connect", "synthetic")
    fn name(&self) -> &'static str;

    /// Whether the backing health service is installed and compatible
    ///
    /// Never errors; any failure to determine availability reports `false`.
    async fn check_availability(&self) -> bool;

    /// Request read permissions for the given metric kinds
    ///
    /// Idempotent; safe to call when permissions were already granted.
    /// Returns whether ALL requested permissions are granted; denial is
    /// `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` only for transport-level failures reaching
    /// the permission surface, never for denial itself.
    async fn request_permissions(&self, kinds: &[MetricKind]) -> Result<bool, ProviderError>;

    /// Read raw records of one kind inside `[window.start, window.end)`
    ///
    /// Ordering is not guaranteed. Retrieval failures degrade to an empty
    /// collection after logging; malformed records are skipped per record.
    async fn read_records(&self, kind: MetricKind, window: TimeWindow) -> Vec<HealthRecord>;
}
