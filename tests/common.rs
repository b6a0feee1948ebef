// ABOUTME: Shared fixtures for integration tests - scripted providers and a recording API
// ABOUTME: Lets orchestrator tests run without a network or a real health store

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use fitwell_sync::api::HealthApi;
use fitwell_sync::config::SyncConfig;
use fitwell_sync::errors::ProviderError;
use fitwell_sync::models::{
    FetchedRecords, HealthRecord, HeartRateReading, MetricKind, RecordValue, SyncPayload,
    TimeWindow,
};
use fitwell_sync::providers::HealthProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Timestamp helper: 2024-01-`day` at `hour`:00 UTC
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

pub fn steps_record(day: u32, count: u64) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::Steps,
        start_time: at(day, 9),
        end_time: at(day, 20),
        value: RecordValue::Count(count),
    }
}

pub fn calories_record(day: u32, kcal: f64) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::Calories,
        start_time: at(day, 9),
        end_time: at(day, 20),
        value: RecordValue::Kilocalories(kcal),
    }
}

pub fn distance_record(day: u32, km: f64) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::Distance,
        start_time: at(day, 9),
        end_time: at(day, 20),
        value: RecordValue::Kilometers(km),
    }
}

pub fn heart_rate_record(day: u32, bpm: u32) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::HeartRate,
        start_time: at(day, 9),
        end_time: at(day, 10),
        value: RecordValue::HeartRate(vec![HeartRateReading {
            time: at(day, 9),
            bpm,
        }]),
    }
}

pub fn sleep_record(day: u32, hours: i64) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::Sleep,
        start_time: at(day, 22),
        end_time: at(day, 22) + chrono::Duration::hours(hours),
        value: RecordValue::Sleep,
    }
}

pub fn exercise_record(day: u32, exercise_type: &str, minutes: i64) -> HealthRecord {
    HealthRecord {
        kind: MetricKind::Exercise,
        start_time: at(day, 17),
        end_time: at(day, 17) + chrono::Duration::minutes(minutes),
        value: RecordValue::Exercise {
            exercise_type: exercise_type.to_owned(),
            title: Some("Evening session".to_owned()),
            distance_km: Some(4.2),
        },
    }
}

/// A small but fully populated record set
pub fn sample_records() -> FetchedRecords {
    FetchedRecords {
        steps: vec![steps_record(1, 3000), steps_record(1, 1200), steps_record(2, 5000)],
        calories: vec![calories_record(1, 320.0), calories_record(2, 410.5)],
        distance: vec![distance_record(1, 2.4), distance_record(3, 5.1)],
        heart_rate: vec![heart_rate_record(1, 72), heart_rate_record(2, 65)],
        sleep: vec![sleep_record(1, 8), sleep_record(2, 5)],
        exercise: vec![exercise_record(2, "RUNNING", 45)],
    }
}

pub fn test_config() -> SyncConfig {
    SyncConfig {
        window_days: 7,
        fetch_timeout_secs: 10,
        ..SyncConfig::default()
    }
}

/// API double that records every upload and optionally rejects them
#[derive(Clone)]
pub struct RecordingApi {
    uploads: Arc<Mutex<Vec<SyncPayload>>>,
    fail: bool,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn last_upload(&self) -> Option<SyncPayload> {
        self.uploads.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HealthApi for RecordingApi {
    async fn sync_health_data(&self, payload: &SyncPayload) -> anyhow::Result<()> {
        self.uploads.lock().unwrap().push(payload.clone());
        if self.fail {
            anyhow::bail!("backend rejected the payload");
        }
        Ok(())
    }
}

/// Provider double serving scripted record sets
///
/// Clones share their counters and gate, so a test can keep one handle
/// while the orchestrator owns another.
#[derive(Clone)]
pub struct ScriptedProvider {
    available: bool,
    grant: bool,
    records: Arc<FetchedRecords>,
    reads: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    pub fn new(records: FetchedRecords) -> Self {
        Self {
            available: true,
            grant: true,
            records: Arc::new(records),
            reads: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    pub fn unavailable(records: FetchedRecords) -> Self {
        Self {
            available: false,
            ..Self::new(records)
        }
    }

    pub fn denying(records: FetchedRecords) -> Self {
        Self {
            grant: false,
            ..Self::new(records)
        }
    }

    /// Block every read until the semaphore hands out permits
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn request_permissions(&self, _kinds: &[MetricKind]) -> Result<bool, ProviderError> {
        Ok(self.grant)
    }

    async fn read_records(&self, kind: MetricKind, _window: TimeWindow) -> Vec<HealthRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            // Permit is dropped immediately so every gated read can pass
            // once the test releases enough permits
            let _permit = gate.acquire().await;
        }

        match kind {
            MetricKind::Steps => self.records.steps.clone(),
            MetricKind::Calories => self.records.calories.clone(),
            MetricKind::Distance => self.records.distance.clone(),
            MetricKind::HeartRate => self.records.heart_rate.clone(),
            MetricKind::Sleep => self.records.sleep.clone(),
            MetricKind::Exercise => self.records.exercise.clone(),
        }
    }
}
