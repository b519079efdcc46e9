//! In-memory doubles for the storage and notification adapters.
//!
//! These back the unit and integration tests; they follow the observable
//! behavior of the real services closely enough for the handlers (bucket
//! ownership, missing keys, unaddressable names) and record every call so tests can
//! assert that nothing was sent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use storage_glue_core::contract::{
    BucketStatus, Destination, NotificationMessage, ObjectMetadata, ObjectSummary,
    PublishReceipt,
};
use storage_glue_core::error::{ErrorKind, ServiceError};

use crate::adapters::notify::Notifier;
use crate::adapters::object_store::ObjectStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    buckets: Mutex<BTreeMap<String, BTreeMap<String, StoredObject>>>,
    foreign_buckets: Mutex<BTreeSet<String>>,
    failures: Mutex<BTreeMap<&'static str, ServiceError>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a bucket name as owned by another account.
    pub fn with_foreign_bucket(self, bucket: &str) -> Self {
        self.foreign_buckets
            .lock()
            .expect("poisoned mutex")
            .insert(bucket.to_string());
        self
    }

    /// Makes every later call to `operation` fail with `error`.
    pub fn fail_operation(&self, operation: &'static str, error: ServiceError) {
        self.failures
            .lock()
            .expect("poisoned mutex")
            .insert(operation, error);
    }

    pub fn seed_object(&self, bucket: &str, key: &str, body: &[u8], content_type: &str) {
        self.buckets
            .lock()
            .expect("poisoned mutex")
            .entry(bucket.to_string())
            .or_default()
            .insert(
                key.to_string(),
                StoredObject {
                    body: body.to_vec(),
                    content_type: content_type.to_string(),
                },
            );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.buckets
            .lock()
            .expect("poisoned mutex")
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    pub fn bucket_exists(&self, bucket: &str) -> bool {
        self.buckets
            .lock()
            .expect("poisoned mutex")
            .contains_key(bucket)
    }

    /// Operations invoked so far, formatted as `operation:bucket[/key]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record(&self, operation: &'static str, target: String) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .expect("poisoned mutex")
            .push(format!("{operation}:{target}"));
        match self.failures.lock().expect("poisoned mutex").get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn no_such_bucket(operation: &'static str, bucket: &str) -> ServiceError {
    ServiceError::new(
        ErrorKind::NotFound,
        operation,
        format!("The specified bucket does not exist: {bucket}"),
    )
    .with_code("NoSuchBucket")
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<BucketStatus, ServiceError> {
        self.record("create_bucket", bucket.to_string())?;

        // Naming rules beyond addressability are left to the real service.
        if bucket.is_empty() || bucket.contains('/') {
            return Err(ServiceError::new(
                ErrorKind::Unknown,
                "create_bucket",
                "The specified bucket is not valid",
            )
            .with_code("InvalidBucketName"));
        }
        if self
            .foreign_buckets
            .lock()
            .expect("poisoned mutex")
            .contains(bucket)
        {
            return Err(ServiceError::new(
                ErrorKind::Unknown,
                "create_bucket",
                "The requested bucket name is not available",
            )
            .with_code("BucketAlreadyExists"));
        }

        let mut buckets = self.buckets.lock().expect("poisoned mutex");
        if buckets.contains_key(bucket) {
            return Ok(BucketStatus::AlreadyOwned);
        }
        buckets.insert(bucket.to_string(), BTreeMap::new());
        Ok(BucketStatus::Created)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError> {
        self.record("put_object", format!("{bucket}/{key}"))?;

        let mut buckets = self.buckets.lock().expect("poisoned mutex");
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket("put_object", bucket))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, ServiceError> {
        self.record("list_objects", bucket.to_string())?;

        let buckets = self.buckets.lock().expect("poisoned mutex");
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| no_such_bucket("list_objects", bucket))?;
        Ok(objects
            .iter()
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size: object.body.len() as u64,
            })
            .collect())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, ServiceError> {
        self.record("head_object", format!("{bucket}/{key}"))?;

        let buckets = self.buckets.lock().expect("poisoned mutex");
        let object = buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .ok_or_else(|| {
                ServiceError::new(ErrorKind::NotFound, "head_object", "Not Found")
                    .with_code("NotFound")
            })?;
        Ok(ObjectMetadata {
            content_type: Some(object.content_type.clone()),
            content_length: Some(object.body.len() as u64),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedNotification {
    pub message: String,
    pub destination: Destination,
}

#[derive(Default)]
pub struct CapturingNotifier {
    published: Mutex<Vec<PublishedNotification>>,
    failure: Mutex<Option<ServiceError>>,
}

impl CapturingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            failure: Mutex::new(Some(error)),
        }
    }

    pub fn published(&self) -> Vec<PublishedNotification> {
        self.published.lock().expect("poisoned mutex").clone()
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn publish(
        &self,
        message: &NotificationMessage,
        destination: &Destination,
    ) -> Result<PublishReceipt, ServiceError> {
        if let Some(error) = self.failure.lock().expect("poisoned mutex").clone() {
            return Err(error);
        }

        let mut published = self.published.lock().expect("poisoned mutex");
        published.push(PublishedNotification {
            message: message.as_str().to_string(),
            destination: destination.clone(),
        });
        Ok(PublishReceipt {
            message_id: Some(format!("msg-{}", published.len())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_bucket_is_idempotent_for_the_owner() {
        let store = InMemoryObjectStore::new();

        assert_eq!(
            store.create_bucket("b1").await,
            Ok(BucketStatus::Created)
        );
        assert_eq!(
            store.create_bucket("b1").await,
            Ok(BucketStatus::AlreadyOwned)
        );
    }

    #[tokio::test]
    async fn foreign_and_unaddressable_bucket_names_are_rejected() {
        let store = InMemoryObjectStore::new().with_foreign_bucket("taken-bucket");

        let error = store
            .create_bucket("taken-bucket")
            .await
            .expect_err("foreign bucket should fail");
        assert_eq!(error.code.as_deref(), Some("BucketAlreadyExists"));

        let error = store
            .create_bucket("nested/name")
            .await
            .expect_err("invalid name should fail");
        assert_eq!(error.code.as_deref(), Some("InvalidBucketName"));
        assert!(!store.bucket_exists("nested/name"));
    }

    #[tokio::test]
    async fn put_requires_an_existing_bucket() {
        let store = InMemoryObjectStore::new();

        let error = store
            .put_object("missing", "a.txt", b"abc", "text/plain")
            .await
            .expect_err("missing bucket should fail");
        assert!(error.is_not_found());
    }

    #[tokio::test]
    async fn injected_failures_are_recorded_and_returned() {
        let store = InMemoryObjectStore::new();
        store.fail_operation(
            "list_objects",
            ServiceError::new(ErrorKind::AccessDenied, "list_objects", "Access Denied"),
        );

        let error = store
            .list_objects("anything")
            .await
            .expect_err("injected failure should surface");
        assert_eq!(error.kind, ErrorKind::AccessDenied);
        assert_eq!(store.calls(), vec!["list_objects:anything".to_string()]);
    }

    #[tokio::test]
    async fn capturing_notifier_assigns_message_ids() {
        let notifier = CapturingNotifier::new();
        let destination = Destination::PhoneNumber("+15550100".to_string());

        let receipt = notifier
            .publish(&NotificationMessage::for_object("a.txt", 3), &destination)
            .await
            .expect("publish should succeed");

        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));
        assert_eq!(
            notifier.published(),
            vec![PublishedNotification {
                message: "a.txt - 3 Bytes".to_string(),
                destination,
            }]
        );
    }
}
