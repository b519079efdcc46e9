use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use storage_glue_core::contract::{BucketStatus, ObjectMetadata, ObjectSummary};
use storage_glue_core::error::{ErrorKind, ServiceError};

use crate::adapters::object_store::ObjectStore;
use crate::adapters::sdk_error::map_sdk_error;
use crate::config::AwsSettings;

/// Region that rejects an explicit location constraint.
///
/// Here a create-bucket call for a bucket the caller already owns succeeds
/// instead of failing with `BucketAlreadyOwnedByYou`, so ownership is checked
/// with a head-bucket call first.
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    region: Option<String>,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, settings: &AwsSettings) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(settings.force_path_style)
            .build();
        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            region: sdk_config.region().map(|region| region.to_string()),
        }
    }
}

fn in_default_region(region: Option<&str>) -> bool {
    region.map_or(true, |region| region == DEFAULT_REGION)
}

fn location_constraint(region: Option<&str>) -> Option<CreateBucketConfiguration> {
    let region = region.filter(|region| *region != DEFAULT_REGION)?;
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn create_bucket(&self, bucket: &str) -> Result<BucketStatus, ServiceError> {
        if in_default_region(self.region.as_deref()) {
            let probe = self
                .client
                .head_bucket()
                .bucket(bucket)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| map_sdk_error("head_bucket", error));
            if let Some(status) = status_from_head_bucket(probe)? {
                return Ok(status);
            }
        }

        let result = self
            .client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(location_constraint(self.region.as_deref()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(BucketStatus::Created),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_bucket_already_owned_by_you()) =>
            {
                Ok(BucketStatus::AlreadyOwned)
            }
            Err(error) => Err(map_sdk_error("create_bucket", error)),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body.to_vec()))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| map_sdk_error("put_object", error))
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, ServiceError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|error| map_sdk_error("list_objects", error))?;

        Ok(output
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size: object
                    .size()
                    .and_then(|size| u64::try_from(size).ok())
                    .unwrap_or(0),
            })
            .collect())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, ServiceError> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|error| map_sdk_error("head_object", error))?;

        Ok(ObjectMetadata {
            content_type: output.content_type().map(str::to_string),
            content_length: output
                .content_length()
                .and_then(|length| u64::try_from(length).ok()),
        })
    }
}

/// `Some` when the head-bucket probe settles the outcome. Missing or
/// inaccessible buckets go on to the create call, which reports collisions.
fn status_from_head_bucket(
    probe: Result<(), ServiceError>,
) -> Result<Option<BucketStatus>, ServiceError> {
    match probe {
        Ok(()) => Ok(Some(BucketStatus::AlreadyOwned)),
        Err(error) if matches!(error.kind, ErrorKind::NotFound | ErrorKind::AccessDenied) => {
            Ok(None)
        }
        Err(error) => Err(error),
    }
}
