//! Domain error types.

use thiserror::Error;

use crate::services::notification::TransportError;
use crate::services::store::StoreError;

/// Errors returned by workflow and notifier operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Email dispatch failed: {0}")]
    Notification(#[from] TransportError),
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
            })
            .collect();

        WorkflowError::Validation(messages.join("; "))
    }
}
