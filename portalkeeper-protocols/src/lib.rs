//! Portal protocol implementations for Portalkeeper
//!
//! Two incompatible portal families live behind the common
//! [`LoginStrategy`] trait:
//!
//! - `srun`: challenge/response portal with an encrypted info payload and
//!   checksum chain (teaching zone)
//! - `drcom`: direct-GET portal with clear query parameters (dorm zone)
//!
//! Each family owns its full request/response contract; the only shared
//! surface is the strategy trait and the [`LoginOutcome`] result type.
//!
//! [`LoginOutcome`]: portalkeeper_core::LoginOutcome

pub mod drcom;
pub mod jsonp;
pub mod srun;
pub mod strategy;
pub mod transport;

// Re-export commonly used types
pub use drcom::DrcomStrategy;
pub use srun::{Challenge, ChallengeClient, EncryptedPayload, SrunStrategy};
pub use strategy::{LoginAttempt, LoginStrategy};
