//! Connectivity probing
//!
//! A cheap HEAD request decides whether the host has unobstructed
//! internet access or sits behind the captive portal. The probe client
//! never follows redirects: a captive portal answers with a redirect to
//! its login page, and following it would falsely report success.

use reqwest::{Client, StatusCode};
use tracing::debug;

/// Probe the configured endpoint and report whether the host is online.
///
/// Online means the endpoint answered 204 (no-content probe) or 200
/// (generic probe). Timeouts, transport errors, and every other status
/// report offline; ambiguity reads as "needs login", which is safe
/// because logging in while already authenticated is a no-op.
pub async fn probe(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(response) => {
            let status = response.status();
            let online = status == StatusCode::NO_CONTENT || status == StatusCode::OK;
            if !online {
                debug!(status = %status, "probe returned unexpected status");
            }
            online
        }
        Err(error) => {
            debug!(error = %error, "connectivity probe failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalkeeper_protocols::transport;
    use std::time::{Duration, Instant};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(timeout: Duration) -> Client {
        transport::probe_client(timeout, "test-agent").unwrap()
    }

    async fn server_with_status(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_probe_no_content_is_online() {
        let server = server_with_status(204).await;
        assert!(probe(&test_client(Duration::from_secs(2)), &server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_ok_is_online() {
        let server = server_with_status(200).await;
        assert!(probe(&test_client(Duration::from_secs(2)), &server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_redirect_is_offline() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", "http://portal.local/login"),
            )
            .mount(&server)
            .await;
        assert!(!probe(&test_client(Duration::from_secs(2)), &server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_server_error_is_offline() {
        let server = server_with_status(500).await;
        assert!(!probe(&test_client(Duration::from_secs(2)), &server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_unreachable_is_offline() {
        let client = test_client(Duration::from_millis(500));
        assert!(!probe(&client, "http://127.0.0.1:9/generate_204").await);
    }

    #[tokio::test]
    async fn test_probe_timeout_is_offline_within_bound() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let client = test_client(Duration::from_millis(250));
        let start = Instant::now();
        assert!(!probe(&client, &server.uri()).await);
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
