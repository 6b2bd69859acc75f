//! Shared library for the anime portal workspace.
//!
//! This crate provides common functionality used across the portal crates:
//! - Configuration management
//! - Logging infrastructure
//! - Catalog, episode and API response models

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{CachePolicy, Config, Environment};
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
