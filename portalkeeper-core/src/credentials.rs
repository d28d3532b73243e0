//! Portal account credentials

use crate::{Error, Result};
use std::fmt;

/// Portal account credentials.
///
/// The password is redacted from `Debug` output so credentials never leak
/// into logs. Both fields can only be changed through the validated
/// constructor or [`Credentials::update`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting empty or blank values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        validate("username", &username)?;
        validate("password", &password)?;
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Replace both fields with validated values.
    pub fn update(&mut self, username: &str, password: &str) -> Result<()> {
        *self = Credentials::new(username, password)?;
        Ok(())
    }
}

fn validate(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
