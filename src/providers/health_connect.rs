// ABOUTME: Live health data adapter speaking JSON/HTTP to the local Health Connect bridge
// ABOUTME: Handles availability checks, permission requests, and degrade-to-empty record reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

use super::core::HealthProvider;
use crate::config::BridgeConfig;
use crate::constants::{defaults, provider_names};
use crate::errors::ProviderError;
use crate::logging::SyncLogger;
use crate::models::{HealthRecord, HeartRateReading, MetricKind, RecordValue, TimeWindow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Bridge service status values
const STATUS_AVAILABLE: &str = "available";
const STATUS_UPDATE_REQUIRED: &str = "update_required";

/// Permission request entry, as the bridge expects it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionRequest {
    access_type: &'static str,
    record_type: &'static str,
}

/// Bridge response for a permission request
#[derive(Debug, Deserialize)]
struct PermissionResponse {
    granted: bool,
}

/// Bridge response for the status probe
#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

/// Time-range filter in the bridge's wire format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeRangeFilter {
    operator: &'static str,
    start_time: String,
    end_time: String,
}

/// Record read request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadRecordsRequest {
    record_type: &'static str,
    time_range_filter: TimeRangeFilter,
}

/// Record read response envelope
#[derive(Debug, Deserialize)]
struct ReadRecordsResponse {
    #[serde(default)]
    records: Vec<BridgeRecord>,
}

/// Raw record as the bridge serializes it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeRecord {
    start_time: Option<String>,
    end_time: Option<String>,
    count: Option<u64>,
    energy: Option<BridgeEnergy>,
    distance: Option<BridgeDistance>,
    samples: Option<Vec<BridgeSample>>,
    exercise_type: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeEnergy {
    in_kilocalories: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeDistance {
    in_kilometers: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeSample {
    time: Option<String>,
    beats_per_minute: u32,
}

/// Live provider reading from the platform health store via the bridge
pub struct HealthConnectProvider {
    base_url: String,
    client: Client,
}

impl HealthConnectProvider {
    /// Create a provider for the configured bridge
    #[must_use]
    pub fn new(config: &BridgeConfig) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Parse a bridge ISO-8601 timestamp
    fn parse_time(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert one bridge record into the shared model
    ///
    /// Records without a parseable start time cannot be bucketed and are
    /// rejected as malformed.
    fn convert_record(
        kind: MetricKind,
        record: BridgeRecord,
    ) -> Result<HealthRecord, ProviderError> {
        let malformed = |details: String| ProviderError::MalformedRecord {
            provider: provider_names::HEALTH_CONNECT.to_owned(),
            record_type: kind.record_type(),
            details,
        };

        let start_raw = record
            .start_time
            .as_deref()
            .ok_or_else(|| malformed("missing startTime".to_owned()))?;
        let start_time = Self::parse_time(start_raw)
            .map_err(|e| malformed(format!("unparsable startTime {start_raw:?}: {e}")))?;

        let end_time = match record.end_time.as_deref() {
            Some(raw) => Self::parse_time(raw)
                .map_err(|e| malformed(format!("unparsable endTime {raw:?}: {e}")))?,
            None => start_time,
        };

        let value = match kind {
            MetricKind::Steps => RecordValue::Count(record.count.unwrap_or(0)),
            MetricKind::Calories => {
                RecordValue::Kilocalories(record.energy.map_or(0.0, |e| e.in_kilocalories))
            }
            MetricKind::Distance => {
                RecordValue::Kilometers(record.distance.map_or(0.0, |d| d.in_kilometers))
            }
            MetricKind::HeartRate => {
                let readings = record
                    .samples
                    .unwrap_or_default()
                    .into_iter()
                    .map(|sample| HeartRateReading {
                        time: sample
                            .time
                            .as_deref()
                            .and_then(|raw| Self::parse_time(raw).ok())
                            .unwrap_or(start_time),
                        bpm: sample.beats_per_minute,
                    })
                    .collect();
                RecordValue::HeartRate(readings)
            }
            MetricKind::Sleep => RecordValue::Sleep,
            MetricKind::Exercise => RecordValue::Exercise {
                exercise_type: record.exercise_type.unwrap_or_default(),
                title: record.title,
                distance_km: record.distance.map(|d| d.in_kilometers),
            },
        };

        Ok(HealthRecord {
            kind,
            start_time,
            end_time,
            value,
        })
    }
}

#[async_trait]
impl HealthProvider for HealthConnectProvider {
    fn name(&self) -> &'static str {
        provider_names::HEALTH_CONNECT
    }

    async fn check_availability(&self) -> bool {
        let response = match self.client.get(self.url("/status")).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Health Connect availability check failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "Health Connect bridge returned an error status"
            );
            return false;
        }

        match response.json::<StatusResponse>().await {
            Ok(status) if status.status == STATUS_AVAILABLE => true,
            Ok(status) => {
                if status.status == STATUS_UPDATE_REQUIRED {
                    warn!("Health Connect requires an update");
                } else {
                    warn!(status = %status.status, "Health Connect is not available");
                }
                false
            }
            Err(e) => {
                warn!(error = %e, "Health Connect status response could not be decoded");
                false
            }
        }
    }

    async fn request_permissions(&self, kinds: &[MetricKind]) -> Result<bool, ProviderError> {
        let permissions: Vec<PermissionRequest> = kinds
            .iter()
            .map(|kind| PermissionRequest {
                access_type: "read",
                record_type: kind.record_type(),
            })
            .collect();

        debug!(count = permissions.len(), "Requesting Health Connect permissions");

        let response = self
            .client
            .post(self.url("/permissions"))
            .json(&permissions)
            .send()
            .await
            .map_err(|e| ProviderError::Http {
                provider: provider_names::HEALTH_CONNECT.to_owned(),
                source: e.into(),
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Http {
                provider: provider_names::HEALTH_CONNECT.to_owned(),
                source: anyhow::anyhow!(
                    "permission request failed with status {}",
                    response.status()
                )
                .into(),
            });
        }

        let granted = response
            .json::<PermissionResponse>()
            .await
            .map_err(|e| ProviderError::Http {
                provider: provider_names::HEALTH_CONNECT.to_owned(),
                source: e.into(),
            })?
            .granted;

        debug!(granted, "Health Connect permission result");
        Ok(granted)
    }

    async fn read_records(&self, kind: MetricKind, window: TimeWindow) -> Vec<HealthRecord> {
        let request = ReadRecordsRequest {
            record_type: kind.record_type(),
            time_range_filter: TimeRangeFilter {
                operator: "between",
                start_time: window.start.to_rfc3339(),
                end_time: window.end.to_rfc3339(),
            },
        };

        let response = match self
            .client
            .post(self.url("/records"))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(record_type = %kind, error = %e, "Failed to read records");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(
                record_type = %kind,
                status = %response.status(),
                "Record read returned an error status"
            );
            return Vec::new();
        }

        let body = match response.json::<ReadRecordsResponse>().await {
            Ok(body) => body,
            Err(e) => {
                warn!(record_type = %kind, error = %e, "Record read response could not be decoded");
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(body.records.len());
        for raw in body.records {
            match Self::convert_record(kind, raw) {
                Ok(record) => records.push(record),
                Err(e) => SyncLogger::log_malformed_record(
                    provider_names::HEALTH_CONNECT,
                    kind.record_type(),
                    &e.to_string(),
                ),
            }
        }

        debug!(record_type = %kind, count = records.len(), "Records read");
        records
    }
}
