//! HTTP route handlers.

pub mod admin_customers;
pub mod admin_rental_requests;
pub mod auth;
pub mod health;
pub mod me;
pub mod provider_applications;
pub mod rental_requests;
pub mod request_decisions;
