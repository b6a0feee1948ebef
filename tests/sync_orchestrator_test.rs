// ABOUTME: Integration tests for the sync orchestrator state machine
// ABOUTME: Failure taxonomy, single-in-flight rejection, and at-most-once upload

mod common;

use common::{sample_records, test_config, RecordingApi, ScriptedProvider};
use fitwell_sync::errors::SyncError;
use fitwell_sync::models::FetchedRecords;
use fitwell_sync::sync::{SyncOrchestrator, SyncPhase};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[tokio::test]
async fn successful_sync_uploads_once_and_reports() {
    let provider = ScriptedProvider::new(sample_records());
    let api = RecordingApi::new();
    let orchestrator = SyncOrchestrator::new(provider.clone(), api.clone(), &test_config());

    let report = orchestrator.sync().await.expect("sync should succeed");

    assert_eq!(api.upload_count(), 1);
    assert_eq!(report.days, 3);
    assert_eq!(report.heart_rate_samples, 2);
    assert_eq!(report.sleep_sessions, 2);
    assert_eq!(report.workouts, 1);
    assert_eq!(report.provider, "scripted");
    assert_eq!(orchestrator.phase(), SyncPhase::Succeeded);

    let payload = api.last_upload().expect("payload was recorded");
    assert_eq!(payload.health_data.len(), 3);
}

#[tokio::test]
async fn unavailable_provider_fails_without_upload() {
    let provider = ScriptedProvider::unavailable(sample_records());
    let api = RecordingApi::new();
    let orchestrator = SyncOrchestrator::new(provider.clone(), api.clone(), &test_config());

    let err = orchestrator.sync().await.unwrap_err();

    assert!(matches!(err, SyncError::ProviderUnavailable));
    assert!(err.sample_data_fallback());
    assert_eq!(api.upload_count(), 0);
    assert_eq!(provider.read_count(), 0);
    assert_eq!(orchestrator.phase(), SyncPhase::Failed);
}

#[tokio::test]
async fn permission_denial_never_reads_records() {
    let provider = ScriptedProvider::denying(sample_records());
    let api = RecordingApi::new();
    let orchestrator = SyncOrchestrator::new(provider.clone(), api.clone(), &test_config());

    let err = orchestrator.sync().await.unwrap_err();

    assert!(matches!(err, SyncError::PermissionDenied));
    assert_eq!(provider.read_count(), 0);
    assert_eq!(api.upload_count(), 0);
}

#[tokio::test]
async fn empty_window_fails_with_no_data_found() {
    let provider = ScriptedProvider::new(FetchedRecords::default());
    let api = RecordingApi::new();
    let orchestrator = SyncOrchestrator::new(provider.clone(), api.clone(), &test_config());

    let err = orchestrator.sync().await.unwrap_err();

    assert!(matches!(err, SyncError::NoDataFound));
    assert!(err.sample_data_fallback());
    assert_eq!(provider.read_count(), 6);
    assert_eq!(api.upload_count(), 0);
}

#[tokio::test]
async fn upload_failure_is_surfaced_and_not_retried() {
    let provider = ScriptedProvider::new(sample_records());
    let api = RecordingApi::failing();
    let orchestrator = SyncOrchestrator::new(provider, api.clone(), &test_config());

    let err = orchestrator.sync().await.unwrap_err();

    assert!(matches!(err, SyncError::UploadError { .. }));
    assert_eq!(api.upload_count(), 1);
    assert_eq!(orchestrator.phase(), SyncPhase::Failed);
}

#[tokio::test]
async fn guard_releases_after_a_failed_attempt() {
    let provider = ScriptedProvider::new(sample_records());
    let api = RecordingApi::failing();
    let orchestrator = SyncOrchestrator::new(provider, api.clone(), &test_config());

    let first = orchestrator.sync().await.unwrap_err();
    assert!(matches!(first, SyncError::UploadError { .. }));

    // A fresh attempt re-enters the pipeline instead of being rejected
    let second = orchestrator.sync().await.unwrap_err();
    assert!(matches!(second, SyncError::UploadError { .. }));
    assert_eq!(api.upload_count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_sync_is_rejected_while_one_is_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let provider = ScriptedProvider::new(sample_records()).gated(Arc::clone(&gate));
    let api = RecordingApi::new();
    let orchestrator = Arc::new(SyncOrchestrator::new(
        provider.clone(),
        api.clone(),
        &test_config(),
    ));

    let first = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.sync().await }
    });

    // Wait until all six fetches of the first attempt are parked on the gate
    while provider.read_count() < 6 {
        tokio::task::yield_now().await;
    }
    assert_eq!(orchestrator.phase(), SyncPhase::Fetching);

    let second = orchestrator.sync().await;
    assert!(matches!(second, Err(SyncError::SyncInProgress)));
    // The rejected call must not have started a second fetch pass
    assert_eq!(provider.read_count(), 6);

    gate.add_permits(6);
    let report = first
        .await
        .expect("task completes")
        .expect("gated sync succeeds");
    assert_eq!(report.days, 3);
    assert_eq!(api.upload_count(), 1);

    // With the guard released, a new attempt is accepted again
    let third = orchestrator.sync().await;
    assert!(third.is_ok());
}
