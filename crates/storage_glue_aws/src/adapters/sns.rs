use async_trait::async_trait;
use aws_config::SdkConfig;
use storage_glue_core::contract::{Destination, NotificationMessage, PublishReceipt};
use storage_glue_core::error::ServiceError;

use crate::adapters::notify::Notifier;
use crate::adapters::sdk_error::map_sdk_error;

#[derive(Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(
        &self,
        message: &NotificationMessage,
        destination: &Destination,
    ) -> Result<PublishReceipt, ServiceError> {
        let request = self.client.publish().message(message.as_str());
        let request = match destination {
            Destination::PhoneNumber(number) => request.phone_number(number),
            Destination::TopicArn(arn) => request.topic_arn(arn),
        };

        let output = request
            .send()
            .await
            .map_err(|error| map_sdk_error("publish", error))?;

        Ok(PublishReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }
}
