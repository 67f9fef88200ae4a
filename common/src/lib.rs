//! Shared utilities for the admin tooling workspace
//!
//! This crate provides the plumbing every tool needs:
//! - Structured logging initialization
//! - Environment variable parsing helpers

pub mod config;
pub mod logging;

pub use config::ConfigExt;
pub use logging::init_logging;
