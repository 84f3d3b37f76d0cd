//! Topic that records published messages.

use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{EventPublishError, EventPublisher};

/// A message captured by [`InMemoryEventPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    /// Destination topic.
    pub topic: String,
    /// Serialised payload.
    pub payload: String,
}

/// [`EventPublisher`] that keeps published messages for inspection.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<PublishedEvent>>,
    next_failure: Mutex<Option<EventPublishError>>,
}

impl InMemoryEventPublisher {
    /// Create a publisher with no recorded messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `publish` fail with `error`.
    pub fn fail_next(&self, error: EventPublishError) {
        *lock(&self.next_failure) = Some(error);
    }

    /// Messages published so far, oldest first.
    pub fn published(&self) -> Vec<PublishedEvent> {
        lock(&self.published).clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), EventPublishError> {
        if let Some(error) = lock(&self.next_failure).take() {
            return Err(error);
        }
        lock(&self.published).push(PublishedEvent {
            topic: topic.to_owned(),
            payload: payload.to_owned(),
        });
        Ok(())
    }
}
