//! Event publisher that keeps published events in memory.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::RiskCalculationEvent;

/// Records every published event in order.
///
/// Used by tests and by callers that drain events after a calculation.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    events: Mutex<Vec<RiskCalculationEvent>>,
}

impl InMemoryEventPublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the published events.
    #[must_use]
    pub fn events(&self) -> Vec<RiskCalculationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the published events.
    pub fn drain(&self) -> Vec<RiskCalculationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Events serialized as JSON lines.
    ///
    /// # Errors
    ///
    /// Returns error if an event cannot be serialized.
    pub fn to_json_lines(&self) -> Result<String, EventPublishError> {
        let events = self.events();
        let mut lines = String::new();
        for event in &events {
            let line =
                serde_json::to_string(event).map_err(|e| EventPublishError::SerializationError {
                    message: e.to_string(),
                })?;
            lines.push_str(&line);
            lines.push('\n');
        }
        Ok(lines)
    }
}

#[async_trait]
impl EventPublisherPort for InMemoryEventPublisher {
    async fn publish_events(
        &self,
        events: Vec<RiskCalculationEvent>,
    ) -> Result<(), EventPublishError> {
        for event in &events {
            debug!(event_type = event.event_type(), "Publishing event");
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::PortfolioAnalysis;
    use crate::domain::parameters::RiskParameters;
    use crate::domain::shared::{BankId, BatchId};

    #[tokio::test]
    async fn records_events_in_order() {
        let publisher = InMemoryEventPublisher::new();
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-1"), &[]).unwrap();
        let mut params = RiskParameters::create_default(BankId::new("BANK-1"), "admin");

        publisher
            .publish_event(analysis.completion_event().into())
            .await
            .unwrap();
        publisher
            .publish_events(
                params
                    .pull_domain_events()
                    .into_iter()
                    .map(RiskCalculationEvent::from)
                    .collect(),
            )
            .await
            .unwrap();

        let types: Vec<&str> = publisher
            .events()
            .iter()
            .map(RiskCalculationEvent::event_type)
            .collect();
        assert_eq!(types, vec!["PORTFOLIO_ANALYSIS_COMPLETED", "RISK_PARAMETERS_CREATED"]);
    }

    #[tokio::test]
    async fn json_lines_and_drain() {
        let publisher = InMemoryEventPublisher::new();
        let analysis = PortfolioAnalysis::analyze(BatchId::new("BATCH-1"), &[]).unwrap();
        publisher
            .publish_event(analysis.completion_event().into())
            .await
            .unwrap();

        let lines = publisher.to_json_lines().unwrap();
        assert_eq!(lines.lines().count(), 1);
        assert!(lines.contains("\"type\":\"PORTFOLIO_ANALYSIS_COMPLETED\""));
        assert!(lines.contains("BATCH-1"));

        assert_eq!(publisher.drain().len(), 1);
        assert!(publisher.events().is_empty());
    }
}
