//! Outbound email seam.
//!
//! Provides the transport abstraction the decision notifier sends through.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors raised by an email transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Transport not configured: {0}")]
    NotConfigured(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Provider rejected message: {0}")]
    Rejected(String),
}

/// A rendered email ready for dispatch. The sender address is owned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// What a transport did with an accepted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to a provider or sink.
    Dispatched,
    /// Accepted but dropped because delivery is switched off.
    Suppressed,
}

/// Email transport trait for sending transactional email.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: OutboundEmail) -> Result<Delivery, TransportError>;
}

/// Mock transport for development and testing.
///
/// Records every message instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailTransport {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    /// Whether to simulate provider failures.
    pub simulate_failure: bool,
    /// Whether to behave like a transport with delivery switched off.
    pub simulate_disabled: bool,
}

impl MockEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// A transport that accepts every message and dispatches none.
    pub fn disabled() -> Self {
        Self {
            simulate_disabled: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far, oldest first.
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailTransport for MockEmailTransport {
    async fn send(&self, message: OutboundEmail) -> Result<Delivery, TransportError> {
        if self.simulate_failure {
            tracing::warn!(
                to = ?message.to,
                subject = %message.subject,
                "Mock email transport simulating failure"
            );
            return Err(TransportError::SendFailed("Simulated failure".to_string()));
        }
        if self.simulate_disabled {
            tracing::info!(subject = %message.subject, "Mock: delivery disabled, dropping email");
            return Ok(Delivery::Suppressed);
        }

        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Mock: recorded outbound email"
        );
        self.sent.lock().await.push(message);
        Ok(Delivery::Dispatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> OutboundEmail {
        OutboundEmail {
            to: vec!["farmer@example.com".to_string()],
            subject: "Equipment Rental Request Approved".to_string(),
            html: "<p>ok</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_messages() {
        let transport = MockEmailTransport::new();
        assert_eq!(transport.send(message()).await.unwrap(), Delivery::Dispatched);
        transport.send(message()).await.unwrap();
        assert_eq!(transport.sent().await.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_records_nothing() {
        let transport = MockEmailTransport::failing();
        assert!(transport.send(message()).await.is_err());
        assert!(transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_mock_suppresses() {
        let transport = MockEmailTransport::disabled();
        assert_eq!(transport.send(message()).await.unwrap(), Delivery::Suppressed);
        assert!(transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_outbox() {
        let transport = MockEmailTransport::new();
        let clone = transport.clone();
        clone.send(message()).await.unwrap();
        assert_eq!(transport.sent().await, vec![message()]);
    }
}
