use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use storage_glue_aws::adapters::memory::{CapturingNotifier, InMemoryObjectStore};
use storage_glue_aws::handlers::bootstrap::{run_bootstrap, BootstrapConfig};
use storage_glue_aws::handlers::notifier::{handle_storage_event, NotifierError};
use storage_glue_core::contract::{Destination, StorageEvent};
use storage_glue_core::storage_keys::KeyStrategy;

fn object_created(bucket: &str, key: &str, size: u64) -> StorageEvent {
    serde_json::from_value(json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "eu-west-1",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "s3SchemaVersion": "1.0",
                "bucket": {"name": bucket, "arn": format!("arn:aws:s3:::{bucket}")},
                "object": {"key": key, "size": size, "sequencer": "0A1B2C3D4E5F678901"}
            }
        }]
    }))
    .expect("event should parse")
}

#[tokio::test]
async fn bootstrap_upload_triggers_one_notification() {
    let store = InMemoryObjectStore::new();
    let notifier = CapturingNotifier::new();
    let destination = Destination::TopicArn("arn:aws:sns:eu-west-1:123456789012:uploads".into());
    let config = BootstrapConfig {
        bucket: "b1".to_string(),
        key_strategy: KeyStrategy::Timestamp,
    };
    let now = Utc
        .with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
        .single()
        .expect("valid timestamp");

    let report = run_bootstrap(
        &store,
        &config,
        now,
        &mut StdRng::seed_from_u64(9),
        &mut Vec::new(),
    )
    .await
    .expect("bootstrap");

    let content_type = handle_storage_event(
        &object_created("b1", &report.uploaded_key, 19),
        &destination,
        &store,
        &notifier,
    )
    .await
    .expect("notification");

    assert_eq!(content_type.as_deref(), Some("text/plain"));
    let published = notifier.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].message,
        format!("{} - 19 Bytes", report.uploaded_key)
    );
    assert_eq!(published[0].destination, destination);
}

#[tokio::test]
async fn event_for_deleted_object_reports_bucket_and_key() {
    let store = InMemoryObjectStore::new();
    store.seed_object("b1", "kept.txt", b"kept", "text/plain");
    let notifier = CapturingNotifier::new();

    let error = handle_storage_event(
        &object_created("b1", "removed.txt", 7),
        &Destination::PhoneNumber("+15550100".to_string()),
        &store,
        &notifier,
    )
    .await
    .expect_err("missing object should fail");

    assert!(matches!(error, NotifierError::Metadata { .. }));
    assert!(error.to_string().contains("removed.txt"));
    assert!(error.to_string().contains("from bucket b1;"));
    assert!(notifier.published().is_empty());
}

#[tokio::test]
async fn lambda_payload_without_records_is_a_no_op() {
    let store = InMemoryObjectStore::new();
    let notifier = CapturingNotifier::new();
    let event: StorageEvent =
        serde_json::from_value(json!({"Records": []})).expect("event should parse");

    let result = handle_storage_event(
        &event,
        &Destination::PhoneNumber("+15550100".to_string()),
        &store,
        &notifier,
    )
    .await
    .expect("empty event should succeed");

    assert_eq!(result, None);
    assert!(store.calls().is_empty());
    assert!(notifier.published().is_empty());
}
