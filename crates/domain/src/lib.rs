//! Domain layer for the CropMate rentals backend.
//!
//! This crate contains:
//! - Domain models (rental requests, provider applications, profiles, sessions)
//! - Store and transport seams implemented by the outer crates
//! - The rental-request workflow and the decision notifier

pub mod error;
pub mod models;
pub mod services;
