// ABOUTME: Integration tests for the synthetic provider and its end-to-end pipeline fit
// ABOUTME: Determinism across instances and a full sample-data sync through the orchestrator

mod common;

use chrono::{TimeZone, Utc};
use common::{test_config, RecordingApi};
use fitwell_sync::aggregate::build_payload;
use fitwell_sync::models::{FetchedRecords, MetricKind, TimeWindow};
use fitwell_sync::providers::{HealthProvider, SyntheticProvider};
use fitwell_sync::sync::SyncOrchestrator;

fn fixed_window() -> TimeWindow {
    TimeWindow {
        start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
    }
}

async fn fetch_all(provider: &SyntheticProvider, window: TimeWindow) -> FetchedRecords {
    FetchedRecords {
        steps: provider.read_records(MetricKind::Steps, window).await,
        calories: provider.read_records(MetricKind::Calories, window).await,
        distance: provider.read_records(MetricKind::Distance, window).await,
        heart_rate: provider.read_records(MetricKind::HeartRate, window).await,
        sleep: provider.read_records(MetricKind::Sleep, window).await,
        exercise: provider.read_records(MetricKind::Exercise, window).await,
    }
}

#[tokio::test]
async fn two_instances_with_one_seed_build_identical_payloads() {
    let first = fetch_all(&SyntheticProvider::with_seed(99), fixed_window()).await;
    let second = fetch_all(&SyntheticProvider::with_seed(99), fixed_window()).await;

    assert_eq!(first, second);
    assert_eq!(build_payload(&first), build_payload(&second));
}

#[tokio::test]
async fn sample_data_covers_every_day_of_the_window() {
    let provider = SyntheticProvider::new();
    let fetched = fetch_all(&provider, fixed_window()).await;
    let payload = build_payload(&fetched);

    // One daily summary per day with steps, calories, and distance filled
    assert_eq!(payload.health_data.len(), 7);
    for day in &payload.health_data {
        assert!(day.steps >= 2000, "steps below the sample floor: {}", day.steps);
        assert!(day.steps < 10_000);
        assert!(day.calories_burned >= 150.0);
        assert!(day.distance_km >= 1.0);
    }
    assert!(!payload.heart_rate_data.is_empty());
    assert!(!payload.sleep_data.is_empty());
}

#[tokio::test]
async fn synthetic_sync_succeeds_end_to_end() {
    let api = RecordingApi::new();
    let orchestrator =
        SyncOrchestrator::new(SyntheticProvider::new(), api.clone(), &test_config());

    let report = orchestrator.sync().await.expect("sample sync succeeds");

    assert_eq!(report.provider, "synthetic");
    assert!(report.days >= 7);
    assert_eq!(api.upload_count(), 1);

    let payload = api.last_upload().expect("payload recorded");
    assert_eq!(payload.health_data.len(), report.days);
    // Dates stay unique and sorted through the live pipeline
    let mut dates: Vec<_> = payload.health_data.iter().map(|d| d.date).collect();
    let sorted = {
        let mut copy = dates.clone();
        copy.sort_unstable();
        copy
    };
    assert_eq!(dates, sorted);
    dates.dedup();
    assert_eq!(dates.len(), payload.health_data.len());
}
