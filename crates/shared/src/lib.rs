//! Shared utilities for the CropMate rentals backend.
//!
//! - Session token signing and validation (RS256 JWT)
//! - Password hashing with Argon2id
//! - Input normalization and validation helpers

pub mod jwt;
pub mod password;
pub mod validation;
