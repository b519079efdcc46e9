use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a bucket listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// Metadata returned by a head request against a single object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BucketStatus {
    Created,
    AlreadyOwned,
}

impl BucketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::AlreadyOwned => "AlreadyOwned",
        }
    }
}

impl fmt::Display for BucketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a notification is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum Destination {
    PhoneNumber(String),
    TopicArn(String),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhoneNumber(number) => write!(f, "sms:{number}"),
            Self::TopicArn(arn) => write!(f, "topic:{arn}"),
        }
    }
}

/// Receipt for a published notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

/// Storage "object created" notification as delivered to the function.
///
/// Only the fields the notifier reads are modelled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Option<Vec<StorageEventRecord>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageEventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub s3: StorageEventEntity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageEventEntity {
    #[serde(default)]
    pub bucket: StorageEventBucket,
    #[serde(default)]
    pub object: StorageEventObject,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageEventBucket {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageEventObject {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event record is missing the bucket name")]
    MissingBucket,
    #[error("event record is missing the object key")]
    MissingKey,
    #[error("object key '{key}' is not valid URL encoding: {reason}")]
    InvalidKeyEncoding { key: String, reason: String },
}

/// The single object a notifier invocation works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub bucket: String,
    pub key: String,
    pub event_size: Option<u64>,
    /// e.g. `ObjectCreated:Put`; absent in hand-built test events.
    pub event_name: Option<String>,
}

impl StorageEvent {
    /// Reads record 0. `Ok(None)` when the event carries no records.
    pub fn first_notification(&self) -> Result<Option<NotificationEvent>, EventError> {
        let Some(record) = self.records.as_deref().and_then(|records| records.first()) else {
            return Ok(None);
        };

        let bucket = record
            .s3
            .bucket
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(EventError::MissingBucket)?;
        let raw_key = record
            .s3
            .object
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(EventError::MissingKey)?;

        Ok(Some(NotificationEvent {
            bucket: bucket.to_string(),
            key: decode_object_key(raw_key)?,
            event_size: record.s3.object.size,
            event_name: record.event_name.clone(),
        }))
    }
}

/// Object keys in storage events are form encoded: spaces arrive as `+`.
pub fn decode_object_key(raw: &str) -> Result<String, EventError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|error| EventError::InvalidKeyEncoding {
            key: raw.to_string(),
            reason: error.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage(String);

impl NotificationMessage {
    pub fn for_object(key: &str, size: u64) -> Self {
        Self(format!("{key} - {size} Bytes"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line printed for each listed object by the bootstrap program.
pub fn listing_line(object: &ObjectSummary) -> String {
    format!("{} - {}", object.key, object.size)
}
