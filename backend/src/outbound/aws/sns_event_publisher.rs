//! SNS-backed event publisher.

use async_trait::async_trait;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::{DisplayErrorContext, SdkError};
use tracing::debug;

use crate::domain::ports::{EventPublishError, EventPublisher};

/// [`EventPublisher`] sending messages to SNS topics by ARN.
#[derive(Debug, Clone)]
pub struct SnsEventPublisher {
    client: Client,
}

impl SnsEventPublisher {
    /// Create a publisher using `client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventPublisher for SnsEventPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), EventPublishError> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(payload)
            .send()
            .await
            .map_err(|err| {
                let message = DisplayErrorContext(&err).to_string();
                match err {
                    SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
                        EventPublishError::unavailable(message)
                    }
                    _ => EventPublishError::rejected(message),
                }
            })?;
        debug!(topic, message_id = output.message_id().unwrap_or_default(), "published event");
        Ok(())
    }
}
