//! Credential and session management core.
//!
//! Validates login input, hashes and verifies passwords, signs access tokens,
//! and creates and rotates refresh sessions through the store contracts in
//! [`store`]. Transport and storage backends live in other crates.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;
