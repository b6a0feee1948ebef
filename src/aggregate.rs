// ABOUTME: Pure, stateless aggregation from raw health records into upload entities
// ABOUTME: Daily rollups, heart-rate flattening, sleep categorization, and workout mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

//! # Aggregation Module
//!
//! Pure functions that turn per-kind record collections into the entities
//! uploaded to the FitWell backend. Every function here is a stateless
//! fold: the same input multiset always yields the same output, regardless
//! of record order.
//!
//! Calendar-day bucketing uses the UTC date of each record's start time.
//! Records that cannot contribute (kind mismatch, inverted time span) are
//! logged once and skipped; they never abort the batch.

use crate::constants::sleep_thresholds;
use crate::models::{
    DailySummary, FetchedRecords, HealthRecord, HeartRateSample, MetricKind, RecordValue,
    SleepQuality, SleepSummary, SyncPayload, WorkoutSession, WorkoutType,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Group records of one kind by UTC calendar day and sum the kind's
/// numeric projection (count for steps, kilocalories for calories,
/// kilometers for distance)
///
/// Order-independent: the grouping key ignores input order and the
/// summation is commutative.
#[must_use]
pub fn aggregate_daily(records: &[HealthRecord], kind: MetricKind) -> BTreeMap<NaiveDate, f64> {
    let mut daily = BTreeMap::new();

    for record in records {
        let Some(value) = numeric_projection(kind, record) else {
            continue;
        };
        let date = record.start_time.date_naive();
        *daily.entry(date).or_insert(0.0) += value;
    }

    daily
}

/// The numeric contribution of one record to a daily total
#[allow(clippy::cast_precision_loss)]
fn numeric_projection(kind: MetricKind, record: &HealthRecord) -> Option<f64> {
    match (kind, &record.value) {
        (MetricKind::Steps, RecordValue::Count(count)) => Some(*count as f64),
        (MetricKind::Calories, RecordValue::Kilocalories(kcal)) => Some(*kcal),
        (MetricKind::Distance, RecordValue::Kilometers(km)) => Some(*km),
        _ => {
            warn!(
                expected = %kind,
                actual = %record.kind,
                "Record does not project onto the requested metric; skipping"
            );
            None
        }
    }
}

/// Outer-join the per-metric daily maps into unified summaries
///
/// A date present in any one map appears in the output, zero-filled for
/// the metrics absent on that date. Output is sorted ascending by date.
#[must_use]
pub fn merge_daily(
    steps: &BTreeMap<NaiveDate, f64>,
    calories: &BTreeMap<NaiveDate, f64>,
    distance: &BTreeMap<NaiveDate, f64>,
) -> Vec<DailySummary> {
    let dates: BTreeSet<NaiveDate> = steps
        .keys()
        .chain(calories.keys())
        .chain(distance.keys())
        .copied()
        .collect();

    dates
        .into_iter()
        .map(|date| {
            // Step sums are integral by construction; the cast is lossless
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let day_steps = steps.get(&date).copied().unwrap_or(0.0).round() as u64;

            DailySummary {
                steps: day_steps,
                calories_burned: calories.get(&date).copied().unwrap_or(0.0),
                distance_km: distance.get(&date).copied().unwrap_or(0.0),
                ..DailySummary::empty(date)
            }
        })
        .collect()
}

/// Flatten raw heart-rate records into uploadable samples, one per record
///
/// Takes each record's first reading; a record with no readings still
/// produces a sample (zero bpm, record start time), matching what the
/// backend historically received.
#[must_use]
pub fn heart_rate_samples(records: &[HealthRecord]) -> Vec<HeartRateSample> {
    records
        .iter()
        .filter_map(|record| match &record.value {
            RecordValue::HeartRate(readings) => Some(readings.first().map_or(
                HeartRateSample {
                    timestamp: record.start_time,
                    bpm: 0,
                },
                |reading| HeartRateSample {
                    timestamp: reading.time,
                    bpm: reading.bpm,
                },
            )),
            _ => {
                warn!(actual = %record.kind, "Expected a heart-rate record; skipping");
                None
            }
        })
        .collect()
}

/// Roll up raw sleep records into per-session summaries
#[must_use]
pub fn sleep_summaries(records: &[HealthRecord]) -> Vec<SleepSummary> {
    records
        .iter()
        .filter_map(|record| {
            if !matches!(record.value, RecordValue::Sleep) {
                warn!(actual = %record.kind, "Expected a sleep record; skipping");
                return None;
            }
            if record.end_time < record.start_time {
                warn!(
                    start = %record.start_time,
                    end = %record.end_time,
                    "Sleep record ends before it starts; skipping"
                );
                return None;
            }

            #[allow(clippy::cast_precision_loss)]
            let duration_hours =
                (record.end_time - record.start_time).num_seconds() as f64 / 3600.0;

            Some(SleepSummary {
                date: record.start_time.date_naive(),
                duration_hours,
                quality: categorize_sleep(duration_hours),
            })
        })
        .collect()
}

/// Map raw exercise records one-to-one onto workout sessions
#[must_use]
pub fn workout_sessions(records: &[HealthRecord]) -> Vec<WorkoutSession> {
    records
        .iter()
        .filter_map(|record| {
            let RecordValue::Exercise {
                exercise_type,
                title,
                distance_km,
            } = &record.value
            else {
                warn!(actual = %record.kind, "Expected an exercise record; skipping");
                return None;
            };
            if record.end_time < record.start_time {
                warn!(
                    start = %record.start_time,
                    end = %record.end_time,
                    "Exercise record ends before it starts; skipping"
                );
                return None;
            }

            #[allow(clippy::cast_precision_loss)]
            let minutes = (record.end_time - record.start_time).num_seconds() as f64 / 60.0;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let duration_minutes = minutes.round() as u32;

            Some(WorkoutSession {
                workout_type: WorkoutType::from_provider_code(exercise_type),
                start_time: record.start_time,
                end_time: record.end_time,
                duration_minutes,
                // TODO: cross-reference ActiveCaloriesBurned records so sessions carry real energy
                calories_burned: 0.0,
                distance_km: *distance_km,
                notes: title.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Categorize a sleep session by duration
///
/// Total over all inputs; non-positive durations map to [`SleepQuality::Poor`].
#[must_use]
pub fn categorize_sleep(duration_hours: f64) -> SleepQuality {
    if duration_hours >= sleep_thresholds::EXCELLENT_MIN_HOURS
        && duration_hours <= sleep_thresholds::EXCELLENT_MAX_HOURS
    {
        SleepQuality::Excellent
    } else if duration_hours >= sleep_thresholds::GOOD_MIN_HOURS
        && duration_hours < sleep_thresholds::EXCELLENT_MIN_HOURS
    {
        SleepQuality::Good
    } else if duration_hours >= sleep_thresholds::FAIR_MIN_HOURS
        && duration_hours < sleep_thresholds::GOOD_MIN_HOURS
    {
        SleepQuality::Fair
    } else {
        SleepQuality::Poor
    }
}

/// Build the upload payload from one fetch pass
#[must_use]
pub fn build_payload(fetched: &FetchedRecords) -> SyncPayload {
    let steps = aggregate_daily(&fetched.steps, MetricKind::Steps);
    let calories = aggregate_daily(&fetched.calories, MetricKind::Calories);
    let distance = aggregate_daily(&fetched.distance, MetricKind::Distance);

    SyncPayload {
        health_data: merge_daily(&steps, &calories, &distance),
        heart_rate_data: heart_rate_samples(&fetched.heart_rate),
        sleep_data: sleep_summaries(&fetched.sleep),
        workout_sessions: workout_sessions(&fetched.exercise),
    }
}
