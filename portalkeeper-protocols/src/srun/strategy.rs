//! Challenge/response login flow for the SRUN portal
//!
//! One attempt walks challenge -> payload -> login request and classifies
//! the JSONP body. The portal reports success or failure in the body
//! text, not the HTTP status.

use super::challenge::ChallengeClient;
use super::payload;
use crate::jsonp;
use crate::strategy::{LoginAttempt, LoginStrategy};
use async_trait::async_trait;
use portalkeeper_core::{Error, LoginOutcome, Result};
use reqwest::Client;
use tracing::debug;

/// Callback name prefix mimicking the portal's own web client
const CALLBACK_PREFIX: &str = "jQuery11240645308969735664";
/// Fixed client metadata the portal expects on every login request
const OS_FIELD: &str = "windows+10";
const OS_NAME_FIELD: &str = "windows";

/// Login strategy for the SRUN (teaching zone) portal
pub struct SrunStrategy {
    http: Client,
}

impl SrunStrategy {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn attempt(&self, attempt: &LoginAttempt) -> Result<LoginOutcome> {
        let username = attempt.credentials.username();
        let config = &attempt.config;

        let challenge = ChallengeClient::new(self.http.clone(), config.challenge_url.clone())
            .get_challenge(username, attempt.ip)
            .await?;
        let payload = payload::build(&attempt.credentials, attempt.ip, &challenge, config)?;

        let timestamp = super::now_millis().to_string();
        let callback = format!("{CALLBACK_PREFIX}_{timestamp}");
        let password = format!("{{MD5}}{}", payload.password_digest);
        let ip_text = attempt.ip.to_string();

        debug!("sending login request");
        let response = self
            .http
            .get(&config.portal_url)
            .query(&[
                ("callback", callback.as_str()),
                ("action", "login"),
                ("username", username),
                ("password", password.as_str()),
                ("ac_id", config.ac_id.as_str()),
                ("ip", ip_text.as_str()),
                ("chksum", payload.checksum.as_str()),
                ("info", payload.info.as_str()),
                ("n", config.n.as_str()),
                ("type", config.client_type.as_str()),
                ("os", OS_FIELD),
                ("name", OS_NAME_FIELD),
                ("double_stack", "0"),
                ("_", timestamp.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!("portal returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Ok(classify(&body))
    }
}

fn classify(body: &str) -> LoginOutcome {
    if let Some(message) = jsonp::extract_field(body, "suc_msg") {
        return LoginOutcome::success(message);
    }
    if let Some(reason) = jsonp::extract_field(body, "error_msg") {
        return LoginOutcome::failure(reason);
    }
    LoginOutcome::failure("portal response carried no success or error marker")
}

#[async_trait]
impl LoginStrategy for SrunStrategy {
    fn name(&self) -> &'static str {
        "srun"
    }

    async fn login(&self, attempt: &LoginAttempt) -> LoginOutcome {
        match self.attempt(attempt).await {
            Ok(outcome) => outcome,
            Err(cause) => LoginOutcome::TransportError { cause },
        }
    }
}
