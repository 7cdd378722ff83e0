//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod profile;
pub mod provider_application;
pub mod rental_request;
pub mod session;

pub use profile::*;
pub use provider_application::*;
pub use rental_request::*;
pub use session::*;
