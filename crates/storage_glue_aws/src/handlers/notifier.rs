use storage_glue_core::contract::{
    Destination, EventError, NotificationEvent, NotificationMessage, StorageEvent,
};
use storage_glue_core::error::{error_chain, ServiceError};
use thiserror::Error;
use tracing::{error, info};

use crate::adapters::notify::Notifier;
use crate::adapters::object_store::ObjectStore;

const COMPONENT: &str = "event_notifier";

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("invalid storage event")]
    InvalidEvent(#[from] EventError),
    #[error(
        "error getting object {key} from bucket {bucket}; make sure they exist and the bucket \
         is in the same region as this function"
    )]
    Metadata {
        bucket: String,
        key: String,
        #[source]
        source: ServiceError,
    },
    #[error("failed to publish notification for object {key} from bucket {bucket}")]
    Publish {
        bucket: String,
        key: String,
        #[source]
        source: ServiceError,
    },
}

/// Handles one storage notification.
///
/// Returns `Ok(None)` without touching either service when the event has no
/// records, otherwise the content type reported for the object.
pub async fn handle_storage_event(
    event: &StorageEvent,
    destination: &Destination,
    store: &impl ObjectStore,
    notifier: &impl Notifier,
) -> Result<Option<String>, NotifierError> {
    let notification = match event.first_notification() {
        Ok(Some(notification)) => notification,
        Ok(None) => {
            info!(component = COMPONENT, "event carried no records");
            return Ok(None);
        }
        Err(invalid) => {
            let failure = NotifierError::from(invalid);
            error!(
                component = COMPONENT,
                error = %failure,
                trace = ?error_chain(&failure),
                "rejected storage event"
            );
            return Err(failure);
        }
    };

    notify_object(&notification, destination, store, notifier)
        .await
        .map_err(|failure| {
            error!(
                component = COMPONENT,
                bucket = %notification.bucket,
                key = %notification.key,
                error = %failure,
                trace = ?error_chain(&failure),
                "failed to notify about stored object"
            );
            failure
        })
}

async fn notify_object(
    notification: &NotificationEvent,
    destination: &Destination,
    store: &impl ObjectStore,
    notifier: &impl Notifier,
) -> Result<Option<String>, NotifierError> {
    let metadata = store
        .head_object(&notification.bucket, &notification.key)
        .await
        .map_err(|source| NotifierError::Metadata {
            bucket: notification.bucket.clone(),
            key: notification.key.clone(),
            source,
        })?;

    let size = metadata
        .content_length
        .or(notification.event_size)
        .unwrap_or(0);
    let message = NotificationMessage::for_object(&notification.key, size);
    info!(
        component = COMPONENT,
        event = notification.event_name.as_deref().unwrap_or("<unknown>"),
        notification = %message,
        "notification prepared"
    );

    let receipt = notifier
        .publish(&message, destination)
        .await
        .map_err(|source| NotifierError::Publish {
            bucket: notification.bucket.clone(),
            key: notification.key.clone(),
            source,
        })?;
    info!(
        component = COMPONENT,
        destination = %destination,
        message_id = receipt.message_id.as_deref().unwrap_or("<none>"),
        "notification published"
    );

    Ok(metadata.content_type)
}
