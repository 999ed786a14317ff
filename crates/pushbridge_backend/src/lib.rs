//! Application-backend integration for Pushbridge
//!
//! This crate provides the HTTP client for the registration API that binds a
//! channel token to a tenant identity, plus the `RegistrationService` adapter
//! the engines consume.

pub mod client;
pub mod models;
pub mod service;

pub use client::{BackendClient, BackendError};
pub use service::HttpRegistrationService;
