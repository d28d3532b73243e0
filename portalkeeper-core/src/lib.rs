//! Portalkeeper Core Library
//!
//! This crate provides the fundamental types and error handling for
//! Portalkeeper: account credentials, the zone/settings model, login
//! outcomes, and local network discovery.

pub mod config;
pub mod credentials;
pub mod error;
pub mod net;
pub mod outcome;

// Re-export commonly used types
pub use config::{Settings, SettingsHandle, Zone, ZoneConfig};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use outcome::LoginOutcome;
