// ABOUTME: Sync orchestrator driving availability, permissions, concurrent fetch, aggregation, and upload
// ABOUTME: Enforces the single-in-flight invariant and the at-most-once upload guarantee
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Sync Orchestration
//!
//! One [`SyncOrchestrator::sync`] call is one end-to-end attempt:
//!
//! ```text
//! Idle -> CheckingAvailability -> RequestingPermission -> Fetching
//!      -> Aggregating -> Uploading -> Succeeded | Failed
//! ```
//!
//! Transitions are strictly linear; a retry is a fresh call starting from
//! `Idle`, optionally with the synthetic provider when the failure
//! supports a sample-data fallback (see
//! [`SyncError::sample_data_fallback`]).
//!
//! The six metric reads run concurrently and are joined before
//! aggregation. The upload happens only after the full payload is built,
//! so cancelling a sync mid-flight can never produce a partial upload.
//! Only one sync may be in flight per orchestrator; concurrent calls are
//! rejected with [`SyncError::SyncInProgress`], and the guard releases on
//! completion and on cancellation alike.

use crate::aggregate;
use crate::api::HealthApi;
use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::logging::SyncLogger;
use crate::models::{FetchedRecords, HealthRecord, MetricKind, TimeWindow};
use crate::providers::HealthProvider;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

/// Observable phase of the sync state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SyncPhase {
    Idle = 0,
    CheckingAvailability = 1,
    RequestingPermission = 2,
    Fetching = 3,
    Aggregating = 4,
    Uploading = 5,
    Succeeded = 6,
    Failed = 7,
}

impl SyncPhase {
    /// Stable string form used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingAvailability => "checking_availability",
            Self::RequestingPermission => "requesting_permission",
            Self::Fetching => "fetching",
            Self::Aggregating => "aggregating",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::CheckingAvailability,
            2 => Self::RequestingPermission,
            3 => Self::Fetching,
            4 => Self::Aggregating,
            5 => Self::Uploading,
            6 => Self::Succeeded,
            7 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

/// Summary of one successful sync attempt
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Correlation id for this attempt's log lines
    pub run_id: Uuid,
    /// Provider the records came from
    pub provider: &'static str,
    /// Window the attempt covered
    pub window: TimeWindow,
    /// Daily summaries uploaded
    pub days: usize,
    /// Heart-rate samples uploaded
    pub heart_rate_samples: usize,
    /// Sleep sessions uploaded
    pub sleep_sessions: usize,
    /// Workout sessions uploaded
    pub workouts: usize,
}

/// Resets the in-flight flag when a sync finishes or is cancelled
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drives one end-to-end synchronization attempt at a time
pub struct SyncOrchestrator<P, A> {
    provider: P,
    api: A,
    window_days: u32,
    fetch_timeout: Duration,
    in_flight: AtomicBool,
    phase: AtomicU8,
}

impl<P, A> SyncOrchestrator<P, A>
where
    P: HealthProvider,
    A: HealthApi,
{
    /// Create an orchestrator over the given provider and API client
    #[must_use]
    pub fn new(provider: P, api: A, config: &SyncConfig) -> Self {
        Self {
            provider,
            api,
            window_days: config.window_days,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            in_flight: AtomicBool::new(false),
            phase: AtomicU8::new(SyncPhase::Idle as u8),
        }
    }

    /// The phase the current (or last) attempt is in
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        SyncPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
        debug!(sync.phase = %phase.as_str(), "Sync phase transition");
    }

    /// Run one sync attempt
    ///
    /// At most one attempt runs per orchestrator at a time; a concurrent
    /// call returns [`SyncError::SyncInProgress`] without touching the
    /// provider. No step is retried internally; the caller owns retry
    /// policy, including the sample-data fallback.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`SyncError`] for the attempt; see the module
    /// docs for the transition rules.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SyncError::SyncInProgress);
        }
        let _guard = InFlightGuard {
            flag: &self.in_flight,
        };

        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let result = self.run(run_id).await;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => {
                self.set_phase(SyncPhase::Succeeded);
                SyncLogger::log_sync_outcome(
                    &run_id.to_string(),
                    self.provider.name(),
                    "succeeded",
                    duration_ms,
                );
            }
            Err(e) => {
                self.set_phase(SyncPhase::Failed);
                SyncLogger::log_sync_outcome(
                    &run_id.to_string(),
                    self.provider.name(),
                    e.tag(),
                    duration_ms,
                );
            }
        }

        result
    }

    async fn run(&self, run_id: Uuid) -> Result<SyncReport, SyncError> {
        self.set_phase(SyncPhase::CheckingAvailability);
        if !self.provider.check_availability().await {
            return Err(SyncError::ProviderUnavailable);
        }

        self.set_phase(SyncPhase::RequestingPermission);
        let granted = match self.provider.request_permissions(&MetricKind::ALL).await {
            Ok(granted) => granted,
            Err(e) => {
                warn!(error = %e, "Permission request failed; treating as denied");
                false
            }
        };
        if !granted {
            return Err(SyncError::PermissionDenied);
        }

        self.set_phase(SyncPhase::Fetching);
        let window = TimeWindow::last_days(self.window_days);
        let (steps, calories, distance, heart_rate, sleep, exercise) = tokio::join!(
            self.read_kind(MetricKind::Steps, window),
            self.read_kind(MetricKind::Calories, window),
            self.read_kind(MetricKind::Distance, window),
            self.read_kind(MetricKind::HeartRate, window),
            self.read_kind(MetricKind::Sleep, window),
            self.read_kind(MetricKind::Exercise, window),
        );
        let fetched = FetchedRecords {
            steps,
            calories,
            distance,
            heart_rate,
            sleep,
            exercise,
        };

        if fetched.is_empty() {
            return Err(SyncError::NoDataFound);
        }
        debug!(records = fetched.total(), "Fetch phase complete");

        self.set_phase(SyncPhase::Aggregating);
        let payload = aggregate::build_payload(&fetched);

        self.set_phase(SyncPhase::Uploading);
        let upload_started = Instant::now();
        let upload_ms = |start: Instant| u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        match self.api.sync_health_data(&payload).await {
            Ok(()) => {
                SyncLogger::log_upload(payload.health_data.len(), true, upload_ms(upload_started));
            }
            Err(e) => {
                SyncLogger::log_upload(payload.health_data.len(), false, upload_ms(upload_started));
                return Err(SyncError::UploadError { source: e.into() });
            }
        }

        Ok(SyncReport {
            run_id,
            provider: self.provider.name(),
            window,
            days: payload.health_data.len(),
            heart_rate_samples: payload.heart_rate_data.len(),
            sleep_sessions: payload.sleep_data.len(),
            workouts: payload.workout_sessions.len(),
        })
    }

    /// Read one metric kind under the configured timeout
    ///
    /// A timed-out read degrades to the kind's empty-result path, exactly
    /// like a provider-side read failure.
    async fn read_kind(&self, kind: MetricKind, window: TimeWindow) -> Vec<HealthRecord> {
        let started = Instant::now();
        let records = match timeout(self.fetch_timeout, self.provider.read_records(kind, window))
            .await
        {
            Ok(records) => records,
            Err(_) => {
                warn!(
                    record_type = %kind,
                    timeout_secs = self.fetch_timeout.as_secs(),
                    "Metric read timed out; treating as empty"
                );
                Vec::new()
            }
        };

        SyncLogger::log_provider_read(
            self.provider.name(),
            kind.record_type(),
            records.len(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        records
    }
}
