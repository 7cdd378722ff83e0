//! Admin decision models shared by the review workflow and the decision notifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Target status of a decision. A decision can never move a request back to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Approved,
    Rejected,
}

impl DecisionStatus {
    /// Title-case label used in notices and email copy.
    pub fn label(self) -> &'static str {
        match self {
            DecisionStatus::Approved => "Approved",
            DecisionStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionStatus::Approved => write!(f, "approved"),
            DecisionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Which relation a decision applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Rental,
    Provider,
}

impl RequestKind {
    /// Human-readable request type used in email subjects.
    pub fn display_name(self) -> &'static str {
        match self {
            RequestKind::Rental => "Equipment Rental",
            RequestKind::Provider => "Provider Registration",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestKind::Rental => write!(f, "rental"),
            RequestKind::Provider => write!(f, "provider"),
        }
    }
}

/// Values written to a request row when it is decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub status: DecisionStatus,
    pub admin_notes: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// A decision stamped with the current time. Blank notes are dropped.
    pub fn now(status: DecisionStatus, admin_notes: Option<String>) -> Self {
        Self {
            status,
            admin_notes: shared::validation::non_blank(admin_notes),
            decided_at: Utc::now(),
        }
    }
}

/// Body accepted by the decision notifier endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDecision {
    pub request_id: Uuid,
    pub request_type: RequestKind,
    pub status: DecisionStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// What was decided, in the terms the requester is told about.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionSubject {
    Rental {
        equipment_name: String,
        equipment_price: f64,
    },
    Provider {
        company_name: String,
    },
}

impl DecisionSubject {
    pub fn kind(&self) -> RequestKind {
        match self {
            DecisionSubject::Rental { .. } => RequestKind::Rental,
            DecisionSubject::Provider { .. } => RequestKind::Provider,
        }
    }
}
