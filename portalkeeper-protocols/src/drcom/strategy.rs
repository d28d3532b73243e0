//! Direct-GET login flow for the Dr.COM portal
//!
//! A single request against the portal's fixed private-network address.
//! The portal returns 200 even on failure, so only the body text decides
//! the outcome.

use crate::jsonp;
use crate::strategy::{LoginAttempt, LoginStrategy};
use async_trait::async_trait;
use portalkeeper_core::{Error, LoginOutcome, Result};
use reqwest::Client;
use tracing::debug;

/// Fixed JSONP callback name the portal expects
const CALLBACK: &str = "dr1003";
/// Portal web client version tag
const JS_VERSION: &str = "4.1.3";

/// Explicit success flag in the response body
const SUCCESS_FLAG: &str = r#""result":1"#;
/// Localized "success" message
const SUCCESS_MSG: &str = r#""msg":"成功""#;
/// "Already online" message; logging in again is a no-op, so it counts
/// as success
const ALREADY_ONLINE: &str = "已在线";

/// Login strategy for the Dr.COM (dorm zone) portal
pub struct DrcomStrategy {
    http: Client,
}

impl DrcomStrategy {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn attempt(&self, attempt: &LoginAttempt) -> Result<LoginOutcome> {
        let user_account = format!(",0,{}", attempt.credentials.username());
        let ip_text = attempt.ip.to_string();

        debug!("sending dorm login request");
        let response = self
            .http
            .get(&attempt.config.dorm_portal_url)
            .query(&[
                ("callback", CALLBACK),
                ("login_method", "1"),
                ("user_account", user_account.as_str()),
                ("user_password", attempt.credentials.password()),
                ("wlan_user_ip", ip_text.as_str()),
                ("jsVersion", JS_VERSION),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!("dorm portal returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        Ok(classify(&body))
    }
}

fn classify(body: &str) -> LoginOutcome {
    if body.contains(SUCCESS_FLAG) || body.contains(SUCCESS_MSG) || body.contains(ALREADY_ONLINE) {
        let message = jsonp::extract_field(body, "msg").unwrap_or("login accepted");
        return LoginOutcome::success(message);
    }
    match jsonp::extract_field(body, "msg") {
        Some(reason) => LoginOutcome::failure(reason),
        None => LoginOutcome::failure("dorm portal response carried no success marker"),
    }
}

#[async_trait]
impl LoginStrategy for DrcomStrategy {
    fn name(&self) -> &'static str {
        "drcom"
    }

    async fn login(&self, attempt: &LoginAttempt) -> LoginOutcome {
        match self.attempt(attempt).await {
            Ok(outcome) => outcome,
            Err(cause) => LoginOutcome::TransportError { cause },
        }
    }
}
