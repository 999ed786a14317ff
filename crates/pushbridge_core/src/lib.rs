//! Registration reconciliation engines for Pushbridge
//!
//! This crate decides and executes the minimal sequence of remote operations
//! needed to bring two backend systems into a consistent state for one
//! device: the channel provider that issues the push routing token, and the
//! application backend that binds that token to a tenant identity.
//!
//! The engines are crash-safe by construction: every successful remote step
//! is persisted through the state store before the next step starts, the
//! stored snapshot is only ever read once per attempt, and re-running an
//! attempt after any partial failure performs exactly the missing steps.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pushbridge_core::RegistrationEngine;
//! use pushbridge_common::models::RegistrationParameters;
//! # use pushbridge_common::services::*;
//! # use std::sync::Arc;
//!
//! # async fn example(
//! #     channel: Arc<dyn ChannelService<Error = BoxedError>>,
//! #     backend: Arc<dyn RegistrationService<Error = BoxedError>>,
//! #     store: Arc<dyn RegistrationStateStore<Error = BoxedError>>,
//! #     versions: Arc<dyn VersionProvider>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let parameters = RegistrationParameters::new(
//!     "tenant-id",
//!     "tenant-secret",
//!     "https://push.example.com",
//!     "com.example.app",
//! )
//! .with_sender_id("sender-1");
//!
//! // One engine per attempt: the engine captures the previous snapshot at
//! // construction and is consumed by the registration call.
//! let engine = RegistrationEngine::new(channel, backend, store, versions).await?;
//! let outcome = engine.register_device(parameters).await?;
//! println!("device reachable under {}", outcome.channel_token);
//! # Ok(())
//! # }
//! ```

pub mod comparator;
#[cfg(test)]
mod comparator_proptest;
#[cfg(test)]
mod comparator_test;
pub mod error;
pub mod phase;
pub mod registration;
pub mod unregistration;

pub use comparator::{classify, ChangeClassification};
pub use error::RegistrationError;
pub use phase::{EnginePhase, TerminalState};
pub use registration::{BackendOperation, RegistrationEngine, RegistrationOutcome};
pub use unregistration::UnregistrationEngine;
