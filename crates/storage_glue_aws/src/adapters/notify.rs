use async_trait::async_trait;
use storage_glue_core::contract::{Destination, NotificationMessage, PublishReceipt};
use storage_glue_core::error::ServiceError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(
        &self,
        message: &NotificationMessage,
        destination: &Destination,
    ) -> Result<PublishReceipt, ServiceError>;
}
