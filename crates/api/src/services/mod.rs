//! Application services wired into the HTTP layer.

pub mod auth;
pub mod email;

pub use auth::{AuthError, AuthResult, AuthService, Registration};
pub use email::{EmailError, EmailService};
