//! Shared utilities and common types for the Bloodlink backend.
//!
//! This crate provides functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT access token issue/verify
//! - Domain field validation (phone, national id, blood type strings)

pub mod jwt;
pub mod password;
pub mod validation;
