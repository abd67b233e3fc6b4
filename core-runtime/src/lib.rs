//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the playback session core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Session events and the broadcast event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the session core depends on.
//! It establishes the logging conventions, the fail-fast configuration builder
//! and the event types reported to applications.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
