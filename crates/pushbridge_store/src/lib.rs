//! Durable registration state persistence for Pushbridge
//!
//! This crate owns the `RegistrationSnapshot` on disk: a database-backed
//! store (sqlite by default, postgres behind a feature) whose field setters
//! are each independently durable, plus an in-memory store for database-less
//! configurations.

pub mod client;
pub mod error;
pub mod memory;
pub mod sql;

pub use client::DbClient;
pub use error::StoreError;
pub use memory::MemoryRegistrationStateStore;
pub use sql::SqlRegistrationStateStore;
