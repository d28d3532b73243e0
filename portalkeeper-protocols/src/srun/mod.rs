//! SRUN challenge/response portal family
//!
//! The teaching zone portal requires a per-attempt challenge token, an
//! encrypted info blob, and a checksum chain over the request fields.
//! The flow runs challenge -> payload -> login request -> classification.

pub mod challenge;
pub mod cipher;
pub mod payload;
pub mod strategy;

pub use challenge::{Challenge, ChallengeClient};
pub use payload::{EncryptedPayload, INFO_MARKER};
pub use strategy::SrunStrategy;

use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond timestamp used for JSONP callback names and cache busting
pub(crate) fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
