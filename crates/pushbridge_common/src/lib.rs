//! Shared abstractions for the Pushbridge SDK.
//!
//! This crate holds the pieces every other Pushbridge crate agrees on: the
//! collaborator traits consumed by the registration engines, the registration
//! data model, and logging initialization helpers.

pub mod logging; // Logging utilities
pub mod models; // Registration data model
pub mod services; // Service abstractions

// Re-export the service seam types for easier access
pub use services::{
    BoxFuture, BoxedError, ChannelService, RegistrationService, RegistrationStateStore,
    ServiceFactory, VersionProvider,
};

pub use models::{RegistrationParameters, RegistrationSnapshot};
