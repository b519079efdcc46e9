use async_trait::async_trait;
use storage_glue_core::contract::{BucketStatus, ObjectMetadata, ObjectSummary};
use storage_glue_core::error::ServiceError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Succeeds with `AlreadyOwned` when the caller already owns the bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<BucketStatus, ServiceError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError>;

    /// First page of the listing only.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, ServiceError>;

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, ServiceError>;
}
