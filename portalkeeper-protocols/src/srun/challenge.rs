//! Challenge token retrieval
//!
//! The portal issues a one-time token per login attempt. The request
//! carries a JSONP callback parameter because the portal requires one,
//! even though the response is parsed as plain text here.

use crate::jsonp;
use portalkeeper_core::{Error, Result};
use reqwest::Client;
use std::net::IpAddr;
use std::time::SystemTime;
use tracing::debug;

/// Callback name prefix mimicking the portal's own web client
const CALLBACK_PREFIX: &str = "jQuery112404953340710317169";

/// One-time token issued by the portal.
///
/// Consumed by exactly one payload build; never reused across attempts.
/// A token gone stale simply fails the attempt, which the next cycle
/// retries with a fresh one.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub token: String,
    pub issued_at: SystemTime,
}

/// Client for the portal's challenge endpoint
pub struct ChallengeClient {
    http: Client,
    endpoint: String,
}

impl ChallengeClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch a fresh challenge token for this username/ip pair.
    ///
    /// Fails with [`Error::ChallengeNotFound`] when the token marker is
    /// absent and [`Error::Transport`] on network failure or a non-2xx
    /// status. No internal retries; the caller's poll cycle retries.
    pub async fn get_challenge(&self, username: &str, ip: IpAddr) -> Result<Challenge> {
        let timestamp = super::now_millis().to_string();
        let callback = format!("{CALLBACK_PREFIX}_{timestamp}");
        let ip_text = ip.to_string();

        debug!(ip = %ip, "requesting challenge token");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("callback", callback.as_str()),
                ("username", username),
                ("ip", ip_text.as_str()),
                ("_", timestamp.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!(
                "challenge endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;
        let token = jsonp::extract_field(&body, "challenge").ok_or(Error::ChallengeNotFound)?;

        debug!(token_len = token.len(), "got challenge token");
        Ok(Challenge {
            token: token.to_string(),
            issued_at: SystemTime::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        transport::portal_client(Duration::from_secs(2), "test-agent").unwrap()
    }

    fn test_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))
    }

    #[tokio::test]
    async fn test_get_challenge_extracts_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/get_challenge"))
            .and(query_param("username", "alice"))
            .and(query_param("ip", "10.1.2.3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"jQuery112404953340710317169_1({"challenge":"abc123","client_ip":"10.1.2.3","error":"ok"})"#,
            ))
            .mount(&server)
            .await;

        let client = ChallengeClient::new(
            test_client(),
            format!("{}/cgi-bin/get_challenge", server.uri()),
        );
        let challenge = client.get_challenge("alice", test_ip()).await.unwrap();
        assert_eq!(challenge.token, "abc123");
    }

    #[tokio::test]
    async fn test_get_challenge_missing_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"cb({"error":"fail"})"#))
            .mount(&server)
            .await;

        let client = ChallengeClient::new(test_client(), server.uri());
        let err = client.get_challenge("alice", test_ip()).await.unwrap_err();
        assert!(matches!(err, Error::ChallengeNotFound));
    }

    #[tokio::test]
    async fn test_get_challenge_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ChallengeClient::new(test_client(), server.uri());
        let err = client.get_challenge("alice", test_ip()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
