// ABOUTME: Deterministic synthetic health data provider for development and fallback
// ABOUTME: Generates a stable per-day sample dataset without requiring the platform health store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Synthetic Health Provider
//!
//! A sample-data provider used when the platform health store is
//! unavailable or empty, and in tests. Unlike the live provider it:
//!
//! - is always available and always granted
//! - generates records locally, seeded per calendar day, so the same
//!   seed and window always produce the same dataset
//! - exercises the full pipeline (steps, calories, distance, heart rate,
//!   sleep, exercise) rather than short-circuiting to a canned payload

use super::core::HealthProvider;
use crate::constants::provider_names;
use crate::errors::ProviderError;
use crate::models::{HealthRecord, HeartRateReading, MetricKind, RecordValue, TimeWindow};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default generator seed; override with [`SyntheticProvider::with_seed`]
const DEFAULT_SEED: u64 = 0x5EED_F00D;

/// Exercise-type codes the generator cycles through
const EXERCISE_TYPES: [&str; 5] = [
    "RUNNING",
    "WALKING",
    "CYCLING",
    "YOGA",
    "STRENGTH_TRAINING",
];

/// Deterministic sample-data provider
pub struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    /// Create a provider with the default seed
    #[must_use]
    pub const fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a provider with a custom seed
    ///
    /// Two providers with the same seed generate identical records for
    /// identical windows.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    /// Per-day, per-kind generator so a day's values do not depend on the
    /// window that requested them
    fn day_rng(&self, kind: MetricKind, date: NaiveDate) -> ChaCha8Rng {
        let kind_part = (kind as u64) << 48;
        let day_part = u64::try_from(date.num_days_from_ce()).unwrap_or(0);
        ChaCha8Rng::seed_from_u64(self.seed ^ kind_part ^ day_part)
    }

    /// Generate the record(s) of one kind for one calendar day
    fn day_records(&self, kind: MetricKind, date: NaiveDate) -> Vec<HealthRecord> {
        let mut rng = self.day_rng(kind, date);

        let at = |d: NaiveDate, hour: u32, minute: u32| {
            d.and_hms_opt(hour, minute, 0)
                .map(|naive| Utc.from_utc_datetime(&naive))
        };
        let (Some(morning), Some(evening)) = (at(date, 8, 0), at(date, 20, 0)) else {
            return Vec::new();
        };

        match kind {
            MetricKind::Steps => vec![HealthRecord {
                kind,
                start_time: morning,
                end_time: evening,
                value: RecordValue::Count(rng.gen_range(2000..10_000)),
            }],
            MetricKind::Calories => vec![HealthRecord {
                kind,
                start_time: morning,
                end_time: evening,
                value: RecordValue::Kilocalories(f64::from(rng.gen_range(150_u32..550))),
            }],
            MetricKind::Distance => {
                let km: f64 = rng.gen_range(1.0..6.0);
                vec![HealthRecord {
                    kind,
                    start_time: morning,
                    end_time: evening,
                    value: RecordValue::Kilometers((km * 100.0).round() / 100.0),
                }]
            }
            MetricKind::HeartRate => {
                let readings = [9_u32, 12, 15, 18]
                    .iter()
                    .filter_map(|&hour| {
                        Some(HeartRateReading {
                            time: at(date, hour, 0)?,
                            bpm: rng.gen_range(60..100),
                        })
                    })
                    .collect();
                let Some(end) = at(date, 18, 0) else {
                    return Vec::new();
                };
                vec![HealthRecord {
                    kind,
                    start_time: morning,
                    end_time: end,
                    value: RecordValue::HeartRate(readings),
                }]
            }
            MetricKind::Sleep => {
                let Some(bedtime) = at(date - Duration::days(1), 23, 0) else {
                    return Vec::new();
                };
                let minutes = rng.gen_range(330..540);
                vec![HealthRecord {
                    kind,
                    start_time: bedtime,
                    end_time: bedtime + Duration::minutes(minutes),
                    value: RecordValue::Sleep,
                }]
            }
            MetricKind::Exercise => {
                // A workout every other day keeps the dataset realistic
                if date.num_days_from_ce() % 2 != 0 {
                    return Vec::new();
                }
                let Some(start) = at(date, 17, 0) else {
                    return Vec::new();
                };
                let exercise_type = EXERCISE_TYPES[rng.gen_range(0..EXERCISE_TYPES.len())];
                let minutes = rng.gen_range(30..60);
                let distance_km = match exercise_type {
                    "RUNNING" | "WALKING" | "CYCLING" => {
                        let km: f64 = rng.gen_range(2.0..12.0);
                        Some((km * 100.0).round() / 100.0)
                    }
                    _ => None,
                };
                vec![HealthRecord {
                    kind,
                    start_time: start,
                    end_time: start + Duration::minutes(minutes),
                    value: RecordValue::Exercise {
                        exercise_type: exercise_type.to_owned(),
                        title: None,
                        distance_km,
                    },
                }]
            }
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        provider_names::SYNTHETIC
    }

    async fn check_availability(&self) -> bool {
        true
    }

    async fn request_permissions(&self, _kinds: &[MetricKind]) -> Result<bool, ProviderError> {
        Ok(true)
    }

    async fn read_records(&self, kind: MetricKind, window: TimeWindow) -> Vec<HealthRecord> {
        let mut records = Vec::new();
        let mut date = window.start.date_naive();
        let last = window.end.date_naive();

        while date <= last {
            records.extend(self.day_records(kind, date));
            date += Duration::days(1);
        }

        records.retain(|record| window.contains(record.start_time));
        records
    }
}
