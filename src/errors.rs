// ABOUTME: Unified error taxonomy for sync attempts and provider operations
// ABOUTME: Every failure is surfaced as a tagged result so callers can branch to fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Error Handling
//!
//! Two error layers: [`SyncError`] is the terminal outcome of one sync
//! attempt, surfaced to the caller as a tagged result (never a panic) so
//! the caller can decide whether to retry or fall back to sample data.
//! [`ProviderError`] covers adapter internals; apart from permission
//! transport failures it is absorbed into empty result sets at the
//! adapter boundary and never crosses it.

use thiserror::Error;

/// Terminal outcome of one failed sync attempt
///
/// No variant is retried internally; the caller owns retry policy.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The platform health service is not installed or incompatible
    #[error("health data provider is unavailable")]
    ProviderUnavailable,

    /// The user declined one or more read permissions
    #[error("health data read permissions were denied")]
    PermissionDenied,

    /// Every metric kind came back empty for the requested window
    #[error("no health data found in the requested window")]
    NoDataFound,

    /// The backend rejected the payload or the upload failed in transit
    #[error("failed to upload health data")]
    UploadError {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A sync was already running on this orchestrator
    #[error("a sync is already in progress")]
    SyncInProgress,

    /// Configuration failed validation before the sync could start
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Stable tag used in structured logs
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "provider_unavailable",
            Self::PermissionDenied => "permission_denied",
            Self::NoDataFound => "no_data_found",
            Self::UploadError { .. } => "upload_error",
            Self::SyncInProgress => "sync_in_progress",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// Whether re-running with the synthetic sample-data provider is a
    /// sensible fallback for this failure
    #[must_use]
    pub const fn sample_data_fallback(&self) -> bool {
        matches!(self, Self::ProviderUnavailable | Self::NoDataFound)
    }
}

/// Errors raised inside a provider adapter
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider's backing service could not be reached or is unhealthy
    #[error("provider {provider} is unavailable: {details}")]
    Unavailable { provider: String, details: String },

    /// An HTTP request to the provider failed
    #[error("provider {provider} request failed")]
    Http {
        provider: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A record could not be decoded into the shared model
    ///
    /// Non-fatal: the adapter logs the record and continues the batch.
    #[error("provider {provider} returned a malformed {record_type} record: {details}")]
    MalformedRecord {
        provider: String,
        record_type: &'static str,
        details: String,
    },

    /// The provider does not expose the requested record type
    #[error("provider {provider} does not support record type {record_type}")]
    UnsupportedRecordType {
        provider: String,
        record_type: String,
    },
}
