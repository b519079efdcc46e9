use std::io::Write;

use chrono::{DateTime, Utc};
use rand::Rng;
use storage_glue_core::contract::{listing_line, BucketStatus, ObjectSummary};
use storage_glue_core::error::ServiceError;
use storage_glue_core::storage_keys::{
    sample_object_key, KeyStrategy, SAMPLE_CONTENT_TYPE, SAMPLE_OBJECT_BODY,
};
use thiserror::Error;
use tracing::info;

use crate::adapters::object_store::ObjectStore;

const COMPONENT: &str = "bucket_bootstrap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub bucket: String,
    pub key_strategy: KeyStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub bucket: String,
    pub bucket_status: BucketStatus,
    pub uploaded_key: String,
    pub objects: Vec<ObjectSummary>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to create bucket '{bucket}'")]
    EnsureBucket {
        bucket: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to upload '{key}' to bucket '{bucket}'")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to list objects in bucket '{bucket}'")]
    List {
        bucket: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to write console output")]
    Output(#[from] std::io::Error),
}

/// Creates the bucket unless the caller already owns it.
pub async fn ensure_bucket(
    store: &impl ObjectStore,
    bucket: &str,
) -> Result<BucketStatus, BootstrapError> {
    let status = store
        .create_bucket(bucket)
        .await
        .map_err(|source| BootstrapError::EnsureBucket {
            bucket: bucket.to_string(),
            source,
        })?;
    info!(component = COMPONENT, bucket, status = %status, "bucket ensured");
    Ok(status)
}

/// Uploads the fixed sample body under a freshly generated key and returns
/// the key.
pub async fn upload_sample(
    store: &impl ObjectStore,
    bucket: &str,
    key_strategy: KeyStrategy,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<String, BootstrapError> {
    let key = sample_object_key(key_strategy, now, rng);
    store
        .put_object(
            bucket,
            &key,
            SAMPLE_OBJECT_BODY.as_bytes(),
            SAMPLE_CONTENT_TYPE,
        )
        .await
        .map_err(|source| BootstrapError::Upload {
            bucket: bucket.to_string(),
            key: key.clone(),
            source,
        })?;
    info!(
        component = COMPONENT,
        bucket,
        key = %key,
        size = SAMPLE_OBJECT_BODY.len(),
        "sample object uploaded"
    );
    Ok(key)
}

/// Lists the first page of the bucket and prints one line per object.
pub async fn list_objects(
    store: &impl ObjectStore,
    bucket: &str,
    out: &mut impl Write,
) -> Result<Vec<ObjectSummary>, BootstrapError> {
    let objects = store
        .list_objects(bucket)
        .await
        .map_err(|source| BootstrapError::List {
            bucket: bucket.to_string(),
            source,
        })?;
    for object in &objects {
        writeln!(out, "{}", listing_line(object))?;
    }
    info!(
        component = COMPONENT,
        bucket,
        object_count = objects.len(),
        "bucket listed"
    );
    Ok(objects)
}

/// Runs ensure → upload → list; the first failure aborts the rest.
pub async fn run_bootstrap(
    store: &impl ObjectStore,
    config: &BootstrapConfig,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
    out: &mut impl Write,
) -> Result<BootstrapReport, BootstrapError> {
    let bucket = config.bucket.as_str();

    writeln!(out, "Creating bucket {bucket} if doesn't exist...")?;
    let bucket_status = ensure_bucket(store, bucket).await?;
    writeln!(out, "Result: {bucket_status}")?;

    let uploaded_key = upload_sample(store, bucket, config.key_strategy, now, rng).await?;
    writeln!(out, "Uploaded {uploaded_key}")?;

    let objects = list_objects(store, bucket, out).await?;

    Ok(BootstrapReport {
        bucket: bucket.to_string(),
        bucket_status,
        uploaded_key,
        objects,
    })
}
