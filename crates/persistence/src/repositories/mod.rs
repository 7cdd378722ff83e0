//! Repository implementations for database operations.

pub mod profile;
pub mod provider_application;
pub mod rental_request;
pub mod session;

pub use profile::ProfileRepository;
pub use provider_application::ProviderApplicationRepository;
pub use rental_request::RentalRequestRepository;
pub use session::SessionRepository;
