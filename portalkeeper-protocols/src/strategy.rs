//! Login strategy abstraction

use async_trait::async_trait;
use portalkeeper_core::{Credentials, LoginOutcome, ZoneConfig};
use std::net::IpAddr;

/// Inputs for a single login attempt.
///
/// A snapshot taken before the attempt starts; nothing in here is
/// re-read while the attempt is in flight.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub credentials: Credentials,
    pub ip: IpAddr,
    pub config: ZoneConfig,
}

/// A zone-specific portal login flow.
///
/// Implementations own their full request/response contract and convert
/// transport and parse errors into a [`LoginOutcome`] instead of letting
/// them escape the attempt boundary. Retry policy belongs to the caller.
#[async_trait]
pub trait LoginStrategy: Send + Sync {
    /// Short strategy name used in logs
    fn name(&self) -> &'static str;

    /// Run one login attempt to a terminal outcome
    async fn login(&self, attempt: &LoginAttempt) -> LoginOutcome;
}
