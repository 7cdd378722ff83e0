//! Rental request domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::decision::DecisionStatus;

/// Lifecycle state shared by rental requests and provider applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// True once an admin has approved or rejected the request.
    pub fn is_decided(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl From<DecisionStatus> for RequestStatus {
    fn from(status: DecisionStatus) -> Self {
        match status {
            DecisionStatus::Approved => RequestStatus::Approved,
            DecisionStatus::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A renter's request to hire a piece of equipment.
///
/// Name and price are copied from the catalog at request time and do not
/// follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RentalRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub equipment_name: String,
    pub equipment_price: f64,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

/// Daily rate as sent by a client: a plain number or the catalog's display string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Amount(f64),
    Display(String),
}

impl PriceInput {
    /// Numeric daily rate, if one can be read.
    pub fn amount(&self) -> Option<f64> {
        match self {
            PriceInput::Amount(v) if v.is_finite() => Some(*v),
            PriceInput::Amount(_) => None,
            PriceInput::Display(s) => shared::validation::parse_daily_rate(s),
        }
    }
}

/// Request body for submitting a rental request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitRentalRequest {
    #[validate(length(min = 1, max = 200, message = "Equipment name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub equipment_name: String,
    pub equipment_price: PriceInput,
}

/// Validated equipment descriptor captured on a new request.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentDescriptor {
    pub name: String,
    pub price: f64,
}

/// Row to insert for a new rental request.
#[derive(Debug, Clone)]
pub struct NewRentalRequest {
    pub user_id: Uuid,
    pub equipment: EquipmentDescriptor,
    pub requested_at: DateTime<Utc>,
}

/// Request body for an admin decision on a rental request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DecideRentalRequest {
    pub status: DecisionStatus,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Admin notes too long"))]
    pub admin_notes: Option<String>,
}

/// Contact details of the requester shown to the admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Requester {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Rental request joined with its requester's contact details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalRequestWithRequester {
    #[serde(flatten)]
    pub request: RentalRequest,
    pub requester: Requester,
}

/// Admin view of all rental requests, split by whether they await a decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewQueue {
    pub pending: Vec<RentalRequestWithRequester>,
    pub processed: Vec<RentalRequestWithRequester>,
}

impl ReviewQueue {
    /// Builds the queue, newest `request_date` first in both halves.
    pub fn from_requests(mut requests: Vec<RentalRequestWithRequester>) -> Self {
        requests.sort_by(|a, b| b.request.request_date.cmp(&a.request.request_date));

        let (processed, pending) = requests
            .into_iter()
            .partition(|r| r.request.status.is_decided());

        Self { pending, processed }
    }
}
