//! Provider application domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::rental_request::RequestStatus;

/// An application to list equipment on the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    pub response_date: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

/// Request body for submitting a provider application.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitProviderApplication {
    #[validate(length(min = 1, max = 200, message = "Company name must be 1-200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub company_name: String,
}

/// Row to insert for a new provider application.
#[derive(Debug, Clone)]
pub struct NewProviderApplication {
    pub user_id: Uuid,
    pub company_name: String,
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_name_must_not_be_blank() {
        let blank = SubmitProviderApplication {
            company_name: " \t ".into(),
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("company_name"));

        let named = SubmitProviderApplication {
            company_name: "Green Fields Co-op".into(),
        };
        assert!(named.validate().is_ok());
    }
}
