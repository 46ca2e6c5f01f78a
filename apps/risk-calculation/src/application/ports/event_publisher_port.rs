//! Event Publisher Port (Driven Port)
//!
//! Interface for handing domain events to the outside world.

use async_trait::async_trait;

use crate::domain::RiskCalculationEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Connection error.
    #[error("Event publish connection error: {message}")]
    ConnectionError { message: String },

    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed { message: String },
}

/// Port for publishing domain events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish events in order.
    async fn publish_events(
        &self,
        events: Vec<RiskCalculationEvent>,
    ) -> Result<(), EventPublishError>;

    /// Publish a single event.
    async fn publish_event(&self, event: RiskCalculationEvent) -> Result<(), EventPublishError> {
        self.publish_events(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_events(
        &self,
        _events: Vec<RiskCalculationEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}
