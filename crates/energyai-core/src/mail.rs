//! Mail transport collaborator
//!
//! Backend-agnostic interface for delivering alert emails. The transport owns
//! credentials, retry policy and rate limiting; callers get a single
//! at-most-once delivery attempt per send.
//!
//! # Configuration
//!
//! - `MAIL_BACKEND`: backend to use (relay, mock). Default: relay
//! - `MAIL_RELAY_URL`: HTTP mail relay base URL (required for relay backend)
//! - `MAIL_RELAY_TOKEN`: bearer token for the relay (optional)

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// An email ready for delivery
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait defining the interface for mail transports
#[async_trait]
pub trait MailBackend: Send + Sync {
    /// Attempt a single delivery; Ok means the transport accepted the message
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;

    /// Check if the transport is reachable
    async fn health_check(&self) -> bool;

    /// Transport endpoint (for logging)
    fn host(&self) -> &str;
}

/// HTTP mail relay backend
///
/// POSTs the message as JSON to `{base}/send`; any non-success status counts
/// as a delivery failure.
#[derive(Clone)]
pub struct HttpRelayBackend {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRelayBackend {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        }
    }

    /// Create from environment variables; None when `MAIL_RELAY_URL` is unset
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("MAIL_RELAY_URL").ok()?;
        let token = std::env::var("MAIL_RELAY_TOKEN").ok();
        Some(Self::new(&base_url, token.as_deref()))
    }
}

#[async_trait]
impl MailBackend for HttpRelayBackend {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let mut request = self
            .http_client
            .post(format!("{}/send", self.base_url))
            .json(email);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::Mail(format!(
                "Relay rejected message: {}",
                response.status()
            )));
        }

        debug!(to = %email.to, subject = %email.subject, "Mail accepted by relay");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// Mock mail transport for testing
///
/// Records every sent message; can be configured to refuse delivery.
#[derive(Clone, Default)]
pub struct MockMailBackend {
    /// When true, every send fails
    pub fail: bool,
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MockMailBackend {
    /// Create a new mock transport that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock transport that refuses every message
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("mock mail lock").clone()
    }
}

#[async_trait]
impl MailBackend for MockMailBackend {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        if self.fail {
            return Err(Error::Mail("Mock transport configured to fail".to_string()));
        }
        self.sent.lock().expect("mock mail lock").push(email.clone());
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    fn host(&self) -> &str {
        "mock"
    }
}

/// Concrete mail client providing Clone + compile-time dispatch
#[derive(Clone)]
pub enum MailClient {
    Relay(HttpRelayBackend),
    Mock(MockMailBackend),
}

impl MailClient {
    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("MAIL_BACKEND").unwrap_or_else(|_| "relay".to_string());
        match backend.as_str() {
            "mock" => Some(Self::Mock(MockMailBackend::new())),
            _ => HttpRelayBackend::from_env().map(Self::Relay),
        }
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        match self {
            Self::Relay(backend) => backend.send(email).await,
            Self::Mock(backend) => backend.send(email).await,
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Self::Relay(backend) => backend.health_check().await,
            Self::Mock(backend) => backend.health_check().await,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            Self::Relay(backend) => backend.host(),
            Self::Mock(backend) => backend.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "alerts@energyai.local".to_string(),
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            html: "<p>Hello</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_sent_messages() {
        let mock = MockMailBackend::new();
        mock.send(&email()).await.unwrap();
        mock.send(&email()).await.unwrap();

        let sent = mock.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "user@example.com");
    }

    #[tokio::test]
    async fn test_failing_mock_rejects() {
        let mock = MockMailBackend::failing();
        assert!(mock.send(&email()).await.is_err());
        assert!(mock.sent().is_empty());
        assert!(!mock.health_check().await);
    }

    #[tokio::test]
    async fn test_client_dispatches_to_mock() {
        let client = MailClient::Mock(MockMailBackend::new());
        client.send(&email()).await.unwrap();
        assert_eq!(client.host(), "mock");
    }
}
