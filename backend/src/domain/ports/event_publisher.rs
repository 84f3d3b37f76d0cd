//! Port abstraction for publishing domain events to a topic.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event publisher adapters.
    pub enum EventPublishError {
        /// The topic could not be reached.
        Unavailable { message: String } => "event topic is unavailable: {message}",
        /// The broker refused the message.
        Rejected { message: String } => "event was rejected: {message}",
    }
}

/// Fire-and-forget publication of serialised events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` to `topic`.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), EventPublishError>;
}
