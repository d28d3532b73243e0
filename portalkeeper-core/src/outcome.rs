//! Login attempt outcomes

use crate::{Error, Result};

/// Terminal result of one login attempt.
///
/// Strategies produce exactly one outcome per attempt; transport and
/// parse failures are folded in here rather than propagated, so a bad
/// attempt never unwinds past the attempt boundary.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Portal acknowledged the login
    Success { message: String },
    /// Portal explicitly rejected the attempt
    Failure { reason: String },
    /// The attempt never reached a portal verdict
    TransportError { cause: Error },
}

impl LoginOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        LoginOutcome::Success {
            message: message.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        LoginOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }

    /// Convert into a `Result`, mapping portal rejections to
    /// [`Error::AuthFailure`].
    pub fn into_result(self) -> Result<String> {
        match self {
            LoginOutcome::Success { message } => Ok(message),
            LoginOutcome::Failure { reason } => Err(Error::AuthFailure(reason)),
            LoginOutcome::TransportError { cause } => Err(cause),
        }
    }
}
