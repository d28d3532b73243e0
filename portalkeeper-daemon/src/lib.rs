//! Keep-alive daemon for Portalkeeper
//!
//! This crate drives the portal session: the connectivity prober detects
//! captivity, the session controller dispatches to the configured login
//! strategy, and the daemon context/handle pair gives the loop cooperative
//! cancellation with bounded shutdown latency.

pub mod context;
pub mod controller;
pub mod probe;

// Re-export commonly used types
pub use context::{spawn_keep_alive, DaemonContext, DaemonHandle};
pub use controller::SessionController;
