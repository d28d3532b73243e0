//! HTTP transport toward the portal
//!
//! The portal endpoints are literal, possibly private, addresses; a
//! system-level proxy would either break them or leak the credentials
//! elsewhere, so every client bypasses the proxy configuration. Every
//! request inherits a mandatory timeout.

use portalkeeper_core::{Error, Result};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

/// Build the client used for login and challenge requests.
pub fn portal_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .no_proxy()
        .user_agent(user_agent)
        .build()
        .map_err(|e| Error::transport(e.to_string()))
}

/// Build the client used for connectivity probes.
///
/// Redirects stay disabled: a captive portal answers the probe with a
/// redirect to its login page, which must classify as offline.
pub fn probe_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .no_proxy()
        .redirect(Policy::none())
        .user_agent(user_agent)
        .build()
        .map_err(|e| Error::transport(e.to_string()))
}
