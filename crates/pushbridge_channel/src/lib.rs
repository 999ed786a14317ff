//! Channel-provider integration for Pushbridge
//!
//! This crate provides the client for the platform push-messaging service
//! that issues the per-device channel token, plus the `ChannelService`
//! adapter the registration engines consume.

pub mod client;
pub mod service;

pub use client::{FcmChannelClient, FcmError};
pub use service::FcmChannelService;
