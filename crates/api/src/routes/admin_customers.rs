//! Admin customer directory.

use axum::{extract::State, Json};
use domain::models::Profile;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub customers: Vec<Profile>,
    pub total: usize,
}

/// GET /api/v1/admin/customers
///
/// All profiles, newest first.
pub async fn list_customers(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<CustomersResponse>, ApiError> {
    let admin = session.admin()?;
    let customers = state.workflow.customers(&admin).await?;

    Ok(Json(CustomersResponse {
        total: customers.len(),
        customers,
    }))
}
