//! Alert delivery through the mail transport
//!
//! One delivery attempt per intent, surfaced as a bool. At-most-once and
//! best-effort: failures are logged and reported, never retried here, and
//! never propagated into the analytics pipeline. Callers on a request path
//! should `tokio::spawn` the dispatch so transport latency cannot block the
//! response.

use tracing::{info, warn};

use crate::mail::{MailClient, OutgoingEmail};

use super::templates::TemplateTable;
use super::AlertIntent;

/// Renders alert intents and hands them to the mail transport
///
/// Construct once at process start and share by handle; the template table
/// and transport are both cheap to clone but carry process-wide config.
#[derive(Clone)]
pub struct AlertDispatcher {
    transport: MailClient,
    templates: TemplateTable,
    from: String,
}

impl AlertDispatcher {
    pub fn new(transport: MailClient, from: impl Into<String>) -> Self {
        Self {
            transport,
            templates: TemplateTable::new(),
            from: from.into(),
        }
    }

    /// Create from environment variables
    ///
    /// Requires a configured mail transport; `MAIL_FROM` defaults to a
    /// no-reply sender.
    pub fn from_env() -> Option<Self> {
        let transport = MailClient::from_env()?;
        let from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "no-reply@energyai.local".to_string());
        Some(Self::new(transport, from))
    }

    /// Transport endpoint (for logging)
    pub fn host(&self) -> &str {
        self.transport.host()
    }

    /// Check if the transport is reachable
    pub async fn health_check(&self) -> bool {
        self.transport.health_check().await
    }

    /// Render and deliver a single alert; true means the transport accepted it
    ///
    /// False covers both "nothing to send" (the intent's payload cannot fill
    /// its template) and a transport failure.
    pub async fn dispatch(&self, to: &str, intent: &AlertIntent) -> bool {
        let Some(rendered) = self.templates.render(intent) else {
            warn!(kind = %intent.kind, "Alert intent payload incomplete, not sending");
            return false;
        };

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: to.to_string(),
            subject: rendered.subject,
            html: rendered.html,
        };

        match self.transport.send(&email).await {
            Ok(()) => {
                info!(kind = %intent.kind, to = %to, "Alert email sent");
                true
            }
            Err(e) => {
                warn!(kind = %intent.kind, to = %to, error = %e, "Alert email failed");
                false
            }
        }
    }

    /// Deliver several intents, returning how many the transport accepted
    ///
    /// No ordering guarantee is promised; delivery stays sequential here only
    /// because alert volume per prediction is at most two.
    pub async fn dispatch_all(&self, to: &str, intents: &[AlertIntent]) -> usize {
        let mut accepted = 0;
        for intent in intents {
            if self.dispatch(to, intent).await {
                accepted += 1;
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertKind;
    use crate::mail::MockMailBackend;

    fn dispatcher(mock: MockMailBackend) -> AlertDispatcher {
        AlertDispatcher::new(MailClient::Mock(mock), "alerts@energyai.local")
    }

    fn cost_intent() -> AlertIntent {
        AlertIntent::new(AlertKind::CostThreshold)
            .with_field("cost", 60.0)
            .with_field("threshold", 50.0)
    }

    #[tokio::test]
    async fn test_dispatch_sends_rendered_template() {
        let mock = MockMailBackend::new();
        let dispatcher = dispatcher(mock.clone());

        assert!(dispatcher.dispatch("user@example.com", &cost_intent()).await);

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "alerts@energyai.local");
        assert_eq!(sent[0].to, "user@example.com");
        assert_eq!(sent[0].subject, "💰 Energy Cost Threshold Exceeded");
        assert!(sent[0].html.contains("$60"));
    }

    #[tokio::test]
    async fn test_incomplete_payload_returns_false_without_sending() {
        let mock = MockMailBackend::new();
        let dispatcher = dispatcher(mock.clone());

        let intent = AlertIntent::new(AlertKind::HighConsumption);
        assert!(!dispatcher.dispatch("user@example.com", &intent).await);
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_returns_false() {
        let dispatcher = dispatcher(MockMailBackend::failing());
        assert!(!dispatcher.dispatch("user@example.com", &cost_intent()).await);
    }

    #[tokio::test]
    async fn test_dispatch_all_counts_accepted() {
        let mock = MockMailBackend::new();
        let dispatcher = dispatcher(mock.clone());

        let intents = vec![
            cost_intent(),
            AlertIntent::new(AlertKind::HighConsumption)
                .with_field("consumption", 250.0)
                .with_field("percentage", 67.0),
            // Incomplete: dropped without delivery
            AlertIntent::new(AlertKind::AnomalyDetected),
        ];

        let accepted = dispatcher.dispatch_all("user@example.com", &intents).await;
        assert_eq!(accepted, 2);
        assert_eq!(mock.sent().len(), 2);
    }
}
