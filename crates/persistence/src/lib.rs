//! Persistence layer for the CropMate rentals backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain store traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
