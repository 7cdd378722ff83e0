//! Records an admin decision and emails the requester about it.
//!
//! Each call writes the row and sends a fresh email; nothing is
//! deduplicated and a failed send does not roll the row back.

use std::sync::Arc;

use uuid::Uuid;

use super::change_feed::{ChangeFeed, RequestChange};
use super::decision_email::render_decision_email;
use super::notification::{Delivery, EmailTransport, OutboundEmail};
use super::store::{ProfileStore, ProviderApplicationStore, RentalRequestStore};
use crate::error::WorkflowError;
use crate::models::{
    AdminCapability, Decision, DecisionStatus, DecisionSubject, RequestDecision, RequestKind,
};

/// What happened after the row was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    /// The requester has no email on file.
    NoEmail,
    /// Rendered but not dispatched; email delivery is switched off.
    Suppressed,
}

#[derive(Clone)]
pub struct DecisionNotifier {
    rentals: Arc<dyn RentalRequestStore>,
    providers: Arc<dyn ProviderApplicationStore>,
    profiles: Arc<dyn ProfileStore>,
    transport: Arc<dyn EmailTransport>,
    changes: ChangeFeed,
}

impl DecisionNotifier {
    pub fn new(
        rentals: Arc<dyn RentalRequestStore>,
        providers: Arc<dyn ProviderApplicationStore>,
        profiles: Arc<dyn ProfileStore>,
        transport: Arc<dyn EmailTransport>,
        changes: ChangeFeed,
    ) -> Self {
        Self {
            rentals,
            providers,
            profiles,
            transport,
            changes,
        }
    }

    /// Applies the decision to the rental or provider row, then notifies its owner.
    pub async fn handle(
        &self,
        admin: &AdminCapability,
        input: RequestDecision,
    ) -> Result<NotificationOutcome, WorkflowError> {
        tracing::info!(
            admin_id = %admin.admin_id(),
            request_type = %input.request_type,
            request_id = %input.request_id,
            status = %input.status,
            "Processing request decision"
        );

        let decision = Decision::now(input.status, input.admin_notes);

        let (user_id, subject, new_status) = match input.request_type {
            RequestKind::Rental => {
                let row = self
                    .rentals
                    .record_decision(input.request_id, &decision)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound("Rental request".to_string()))?;
                (
                    row.user_id,
                    DecisionSubject::Rental {
                        equipment_name: row.equipment_name,
                        equipment_price: row.equipment_price,
                    },
                    row.status,
                )
            }
            RequestKind::Provider => {
                let row = self
                    .providers
                    .record_decision(input.request_id, &decision)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound("Provider application".to_string()))?;
                (
                    row.user_id,
                    DecisionSubject::Provider {
                        company_name: row.company_name,
                    },
                    row.status,
                )
            }
        };

        self.changes.publish(RequestChange {
            kind: input.request_type,
            request_id: input.request_id,
            user_id,
            status: new_status,
        });

        self.notify(
            user_id,
            &subject,
            decision.status,
            decision.admin_notes.as_deref(),
        )
        .await
    }

    /// Emails the owner of an already-decided request.
    ///
    /// Fails with `NotFound` when the owner has no profile.
    pub async fn notify(
        &self,
        user_id: Uuid,
        subject: &DecisionSubject,
        status: DecisionStatus,
        admin_notes: Option<&str>,
    ) -> Result<NotificationOutcome, WorkflowError> {
        let profile = self
            .profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Requester profile".to_string()))?;

        let Some(email) = profile.email.filter(|e| !e.trim().is_empty()) else {
            tracing::info!(user_id = %user_id, "No email on file, skipping notification");
            return Ok(NotificationOutcome::NoEmail);
        };

        let rendered =
            render_decision_email(subject, status, profile.full_name.as_deref(), admin_notes);

        let delivery = self
            .transport
            .send(OutboundEmail {
                to: vec![email],
                subject: rendered.subject,
                html: rendered.html,
            })
            .await?;

        match delivery {
            Delivery::Dispatched => {
                tracing::info!(user_id = %user_id, kind = %subject.kind(), "Decision email sent");
                Ok(NotificationOutcome::Sent)
            }
            Delivery::Suppressed => {
                tracing::info!(
                    user_id = %user_id,
                    kind = %subject.kind(),
                    "Email delivery disabled, decision email not sent"
                );
                Ok(NotificationOutcome::Suppressed)
            }
        }
    }
}
