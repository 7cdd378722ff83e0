//! Outbound email delivery.
//!
//! Supports two providers:
//! - `console`: logs messages instead of sending them (development)
//! - `resend`: posts to the Resend HTTP API

use std::time::Duration;

use async_trait::async_trait;
use domain::services::{Delivery, EmailTransport, OutboundEmail, TransportError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email provider not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}

impl From<EmailError> for TransportError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::NotConfigured(msg) => TransportError::NotConfigured(msg),
            EmailError::SendFailed(msg) => TransportError::SendFailed(msg),
            EmailError::Provider { status, body } => {
                TransportError::Rejected(format!("status {}: {}", status, body))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
    from: String,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmailError::NotConfigured(e.to_string()))?;

        Ok(Self {
            from: format!("{} <{}>", config.sender_name, config.sender_email),
            config,
            client,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The `From` header value, e.g. `CropMate <onboarding@resend.dev>`.
    pub fn from_address(&self) -> &str {
        &self.from
    }

    /// Sends through the configured provider.
    ///
    /// Returns [`Delivery::Suppressed`] without contacting anything when
    /// email is disabled.
    pub async fn deliver(&self, message: &OutboundEmail) -> Result<Delivery, EmailError> {
        if !self.config.enabled {
            info!(
                to = ?message.to,
                subject = %message.subject,
                "Email disabled, message not sent"
            );
            return Ok(Delivery::Suppressed);
        }

        match self.config.provider.as_str() {
            "console" => {
                self.send_console(message);
                Ok(Delivery::Dispatched)
            }
            "resend" => self.send_resend(message).await.map(|_| Delivery::Dispatched),
            provider => Err(EmailError::NotConfigured(format!(
                "unknown provider {}",
                provider
            ))),
        }
    }

    fn send_console(&self, message: &OutboundEmail) {
        info!(
            from = %self.from,
            to = ?message.to,
            subject = %message.subject,
            html_len = message.html.len(),
            "Email (console provider)"
        );
    }

    async fn send_resend(&self, message: &OutboundEmail) -> Result<(), EmailError> {
        if self.config.resend_api_key.is_empty() {
            return Err(EmailError::NotConfigured("missing Resend API key".into()));
        }

        let url = format!("{}/emails", self.config.resend_base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.resend_api_key)
            .json(&ResendPayload {
                from: &self.from,
                to: &message.to,
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("Resend request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(to = ?message.to, subject = %message.subject, "Email sent via Resend");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, error = %body, "Resend API error");
        Err(EmailError::Provider {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl EmailTransport for EmailService {
    async fn send(&self, message: OutboundEmail) -> Result<Delivery, TransportError> {
        self.deliver(&message).await.map_err(Into::into)
    }
}
