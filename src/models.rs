// ABOUTME: Shared data model for health records, daily summaries, and the sync payload
// ABOUTME: Wire-format types match the FitWell backend and the Health Connect bridge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Data Models
//!
//! Common data structures shared by the provider adapters, the aggregator,
//! and the API client. The serialized field names of the payload types
//! (`DailySummary`, `HeartRateSample`, `SleepSummary`, `WorkoutSession`,
//! `SyncPayload`) are the FitWell backend's wire format and must not drift
//! from it.

use crate::constants::record_types;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Health data categories handled by one sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Steps,
    Distance,
    Calories,
    HeartRate,
    Sleep,
    Exercise,
}

impl MetricKind {
    /// Every metric kind fetched by a sync, in fetch order
    pub const ALL: [Self; 6] = [
        Self::Steps,
        Self::Distance,
        Self::Calories,
        Self::HeartRate,
        Self::Sleep,
        Self::Exercise,
    ];

    /// The provider record type this kind reads
    #[must_use]
    pub const fn record_type(self) -> &'static str {
        match self {
            Self::Steps => record_types::STEPS,
            Self::Distance => record_types::DISTANCE,
            Self::Calories => record_types::TOTAL_CALORIES,
            Self::HeartRate => record_types::HEART_RATE,
            Self::Sleep => record_types::SLEEP_SESSION,
            Self::Exercise => record_types::EXERCISE_SESSION,
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.record_type())
    }
}

/// Inclusive-exclusive time window `[start, end)` for record reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start (inclusive)
    pub start: DateTime<Utc>,
    /// Window end (exclusive)
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window covering the last `days` days, ending now
    #[must_use]
    pub fn last_days(days: u32) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    /// Whether a timestamp falls inside the window
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// A single heart-rate reading inside a raw heart-rate record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateReading {
    /// When the reading was taken
    pub time: DateTime<Utc>,
    /// Beats per minute
    pub bpm: u32,
}

/// Kind-shaped value carried by a raw health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordValue {
    /// Step count (steps records)
    Count(u64),
    /// Energy burned in kilocalories (calorie records)
    Kilocalories(f64),
    /// Distance covered in kilometers (distance records)
    Kilometers(f64),
    /// Nested reading list (heart-rate records)
    HeartRate(Vec<HeartRateReading>),
    /// Sleep session bounded by the record's start/end times
    Sleep,
    /// Exercise session metadata
    Exercise {
        /// Provider-specific exercise type code (e.g. `RUNNING`)
        exercise_type: String,
        /// Session title, if the recording app set one
        title: Option<String>,
        /// Distance covered during the session in kilometers
        distance_km: Option<f64>,
    },
}

/// Raw, immutable health record as read from a provider
///
/// Lives for the duration of one sync pass; never mutated after the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Metric category the record belongs to
    pub kind: MetricKind,
    /// Record start time
    pub start_time: DateTime<Utc>,
    /// Record end time
    pub end_time: DateTime<Utc>,
    /// Kind-shaped value
    pub value: RecordValue,
}

/// Per-kind record collections produced by the fetch phase
///
/// Each fetch writes its own slot; slots are only read together at the
/// aggregation join point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedRecords {
    pub steps: Vec<HealthRecord>,
    pub calories: Vec<HealthRecord>,
    pub distance: Vec<HealthRecord>,
    pub heart_rate: Vec<HealthRecord>,
    pub sleep: Vec<HealthRecord>,
    pub exercise: Vec<HealthRecord>,
}

impl FetchedRecords {
    /// True when every metric kind came back empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
            && self.calories.is_empty()
            && self.distance.is_empty()
            && self.heart_rate.is_empty()
            && self.sleep.is_empty()
            && self.exercise.is_empty()
    }

    /// Total record count across all kinds
    #[must_use]
    pub fn total(&self) -> usize {
        self.steps.len()
            + self.calories.len()
            + self.distance.len()
            + self.heart_rate.len()
            + self.sleep.len()
            + self.exercise.len()
    }
}

/// Per-calendar-day rollup merging all aggregated metric kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar day (UTC) the summary covers
    pub date: NaiveDate,
    /// Total steps for the day
    pub steps: u64,
    /// Total energy burned in kilocalories
    pub calories_burned: f64,
    /// Total distance covered in kilometers
    #[serde(rename = "distance")]
    pub distance_km: f64,
    /// Active minutes for the day
    pub active_minutes: u32,
}

impl DailySummary {
    /// A zero-filled summary for the given day
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            calories_burned: 0.0,
            distance_km: 0.0,
            active_minutes: 0,
        }
    }
}

/// A single uploaded heart-rate measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    /// When the measurement was taken
    pub timestamp: DateTime<Utc>,
    /// Beats per minute
    #[serde(rename = "heart_rate")]
    pub bpm: u32,
}

/// Sleep quality category derived from session duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SleepQuality {
    /// Stable string form used in logs and the wire format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// One sleep session rollup, one per raw sleep record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    /// Calendar day (UTC) the session started on
    pub date: NaiveDate,
    /// Session duration in hours
    #[serde(rename = "sleep_duration")]
    pub duration_hours: f64,
    /// Duration-derived quality category
    #[serde(rename = "sleep_quality")]
    pub quality: SleepQuality,
}

/// Workout categories recognized by the FitWell backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Walking,
    Cycling,
    Swimming,
    Yoga,
    Gym,
    Other,
}

impl WorkoutType {
    /// Map a provider exercise-type code to a workout category
    ///
    /// Unrecognized codes map to [`WorkoutType::Other`]. Matching is
    /// case-insensitive because bridge payloads have shipped both
    /// `RUNNING` and `running` over time.
    #[must_use]
    pub fn from_provider_code(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "RUNNING" => Self::Running,
            "WALKING" => Self::Walking,
            "CYCLING" => Self::Cycling,
            "SWIMMING" => Self::Swimming,
            "YOGA" => Self::Yoga,
            "STRENGTH_TRAINING" | "WORKOUT" => Self::Gym,
            _ => Self::Other,
        }
    }
}

/// One workout session, mapped one-to-one from a raw exercise record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Workout category
    pub workout_type: WorkoutType,
    /// Session start
    pub start_time: DateTime<Utc>,
    /// Session end
    pub end_time: DateTime<Utc>,
    /// Session length in minutes, rounded to the nearest minute
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Energy burned during the session in kilocalories
    pub calories_burned: f64,
    /// Distance covered in kilometers, when the session recorded one
    #[serde(rename = "distance")]
    pub distance_km: Option<f64>,
    /// Free-form session notes (the recording app's title)
    pub notes: String,
}

/// Upload unit handed to the API client, built fresh per sync
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Daily rollups, one per calendar day, ascending
    pub health_data: Vec<DailySummary>,
    /// Flattened heart-rate measurements
    pub heart_rate_data: Vec<HeartRateSample>,
    /// Sleep session rollups
    pub sleep_data: Vec<SleepSummary>,
    /// Workout sessions
    pub workout_sessions: Vec<WorkoutSession>,
}

impl SyncPayload {
    /// True when the payload carries no data at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.health_data.is_empty()
            && self.heart_rate_data.is_empty()
            && self.sleep_data.is_empty()
            && self.workout_sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn workout_type_mapping_covers_known_codes() {
        assert_eq!(WorkoutType::from_provider_code("RUNNING"), WorkoutType::Running);
        assert_eq!(WorkoutType::from_provider_code("walking"), WorkoutType::Walking);
        assert_eq!(WorkoutType::from_provider_code("CYCLING"), WorkoutType::Cycling);
        assert_eq!(WorkoutType::from_provider_code("SWIMMING"), WorkoutType::Swimming);
        assert_eq!(WorkoutType::from_provider_code("Yoga"), WorkoutType::Yoga);
        assert_eq!(WorkoutType::from_provider_code("STRENGTH_TRAINING"), WorkoutType::Gym);
        assert_eq!(WorkoutType::from_provider_code("WORKOUT"), WorkoutType::Gym);
    }

    #[test]
    fn workout_type_mapping_defaults_to_other() {
        assert_eq!(WorkoutType::from_provider_code("HIGH_INTENSITY_INTERVAL_TRAINING"), WorkoutType::Other);
        assert_eq!(WorkoutType::from_provider_code(""), WorkoutType::Other);
    }

    #[test]
    fn time_window_is_inclusive_exclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let window = TimeWindow { start, end };

        assert!(window.contains(start));
        assert!(window.contains(end - Duration::seconds(1)));
        assert!(!window.contains(end));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn sleep_quality_strings_match_the_wire_format() {
        for quality in [
            SleepQuality::Excellent,
            SleepQuality::Good,
            SleepQuality::Fair,
            SleepQuality::Poor,
        ] {
            let json = serde_json::to_value(quality).unwrap();
            assert_eq!(json, quality.as_str());
        }
    }

    #[test]
    fn daily_summary_decodes_a_backend_row() {
        // Backend rows carry bookkeeping fields the client ignores
        let row = serde_json::json!({
            "id": 17,
            "date": "2024-01-05",
            "steps": 8100,
            "calories_burned": 402.5,
            "distance": 6.3,
            "active_minutes": 55,
            "created_at": "2024-01-05T22:00:00Z"
        });

        let summary: DailySummary = serde_json::from_value(row).unwrap();
        assert_eq!(summary.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(summary.steps, 8100);
        assert_eq!(summary.distance_km, 6.3);
        assert_eq!(summary.active_minutes, 55);
    }

    #[test]
    fn payload_wire_format_matches_backend() {
        let payload = SyncPayload {
            health_data: vec![DailySummary {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                steps: 4200,
                calories_burned: 320.5,
                distance_km: 3.2,
                active_minutes: 40,
            }],
            heart_rate_data: vec![HeartRateSample {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
                bpm: 72,
            }],
            sleep_data: vec![SleepSummary {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                duration_hours: 7.5,
                quality: SleepQuality::Excellent,
            }],
            workout_sessions: vec![],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["health_data"][0]["date"], "2024-01-01");
        assert_eq!(json["health_data"][0]["distance"], 3.2);
        assert_eq!(json["health_data"][0]["active_minutes"], 40);
        assert_eq!(json["heart_rate_data"][0]["heart_rate"], 72);
        assert_eq!(json["sleep_data"][0]["sleep_duration"], 7.5);
        assert_eq!(json["sleep_data"][0]["sleep_quality"], "excellent");
    }
}
