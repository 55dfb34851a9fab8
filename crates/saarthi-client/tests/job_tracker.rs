//! Tracker merge and offline fallback against a live server and a temp-dir cache.

mod common;

use chrono::{Duration, Utc};
use saarthi_client::{FileTrackerCache, JobTracker, SaarthiClient, TrackerCache};
use saarthi_jobs::marketplace::domain::{ApplicationForm, JobApplication};
use serde_json::json;

use common::*;

fn local_only_record(job_id: &str, days_ago: i64) -> JobApplication {
    let applied = Utc::now() - Duration::days(days_ago);
    serde_json::from_value(json!({
        "id": format!("local-{job_id}"),
        "jobId": job_id,
        "applicantEmail": APPLICANT_EMAIL,
        "applicantId": "usr-local",
        "jobTitle": "Data Analyst",
        "company": "Offline Co",
        "location": "Remote",
        "jobDescription": "",
        "status": "interview",
        "appliedAt": applied,
        "lastUpdated": applied
    }))
    .expect("local record")
}

#[tokio::test]
async fn backend_records_merge_with_local_ones() {
    let base_url = spawn_marketplace().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileTrackerCache::new(dir.path().join("tracker").join("applications.json"));
    cache
        .store(&[local_only_record("external-42", 3)])
        .expect("seed cache");

    let tracker = JobTracker::new(signed_in_applicant(&base_url).await, cache.clone());
    let recorded = tracker
        .record(&ApplicationForm {
            job_id: Some("jsearch-abc".to_string()),
            job_title: Some("Rust Developer".to_string()),
            company: Some("Globex".to_string()),
            ..ApplicationForm::default()
        })
        .await
        .expect("record");

    let records = tracker.load().await.expect("load");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, recorded.id, "newest first");
    assert_eq!(records[1].job_id.as_str(), "external-42");

    let cached = cache.load().expect("read cache").expect("cache written");
    assert_eq!(cached, records);
}

#[tokio::test]
async fn backend_record_replaces_cached_copy_of_same_job() {
    let base_url = spawn_marketplace().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileTrackerCache::new(dir.path().join("applications.json"));
    cache
        .store(&[local_only_record("jsearch-abc", 1)])
        .expect("seed cache");

    let tracker = JobTracker::new(signed_in_applicant(&base_url).await, cache);
    tracker
        .record(&ApplicationForm {
            job_id: Some("jsearch-abc".to_string()),
            job_title: Some("Rust Developer".to_string()),
            company: Some("Globex".to_string()),
            ..ApplicationForm::default()
        })
        .await
        .expect("record");

    let records = tracker.load().await.expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].company, "Globex");
    assert_eq!(records[0].status.as_str(), "pending");
}

#[tokio::test]
async fn unreachable_backend_serves_the_cache() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileTrackerCache::new(dir.path().join("applications.json"));
    cache
        .store(&[
            local_only_record("older", 5),
            local_only_record("newer", 1),
        ])
        .expect("seed cache");

    let client = SaarthiClient::new(dead_address().await).expect("client");
    let tracker = JobTracker::new(client, cache);
    let records = tracker.load().await.expect("cached records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].job_id.as_str(), "newer");
}

#[tokio::test]
async fn unreachable_backend_without_cache_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = FileTrackerCache::new(dir.path().join("missing.json"));
    let client = SaarthiClient::new(dead_address().await).expect("client");

    let err = JobTracker::new(client, cache)
        .load()
        .await
        .expect_err("no fallback");
    assert!(matches!(err, saarthi_client::ClientError::Http(_)));
}
