//! Session controller
//!
//! Owns the two login strategies, dispatches each attempt to the one
//! matching the configured zone, and runs the keep-alive loop. Every
//! outcome is logged with a distinguishable severity; a bad cycle never
//! terminates the daemon, only cancellation does.

use crate::context::DaemonContext;
use crate::probe;
use portalkeeper_core::{net, Credentials, LoginOutcome, Result, SettingsHandle, Zone};
use portalkeeper_protocols::strategy::{LoginAttempt, LoginStrategy};
use portalkeeper_protocols::transport;
use portalkeeper_protocols::{DrcomStrategy, SrunStrategy};
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, error, info, warn};

/// Controller for portal login attempts and the keep-alive loop
pub struct SessionController {
    settings: SettingsHandle,
    srun: SrunStrategy,
    drcom: DrcomStrategy,
    probe_client: reqwest::Client,
}

impl SessionController {
    /// Build the controller and its HTTP clients from the current
    /// settings snapshot.
    pub fn new(settings: SettingsHandle) -> Result<Self> {
        let snapshot = settings.snapshot();
        let config = &snapshot.zone_config;

        let portal = transport::portal_client(config.http_timeout, &config.user_agent)?;
        let probe_client = transport::probe_client(config.http_timeout, &config.user_agent)?;

        Ok(Self {
            settings,
            srun: SrunStrategy::new(portal.clone()),
            drcom: DrcomStrategy::new(portal),
            probe_client,
        })
    }

    fn strategy_for(&self, zone: Zone) -> &dyn LoginStrategy {
        match zone {
            Zone::Teaching => &self.srun,
            Zone::Dorm => &self.drcom,
        }
    }

    /// Run one login attempt with the currently configured credentials.
    pub async fn login(&self) -> LoginOutcome {
        let snapshot = self.settings.snapshot();
        let ip = local_ip_or_loopback();
        let strategy = self.strategy_for(snapshot.zone);

        info!(
            zone = %snapshot.zone,
            strategy = strategy.name(),
            ip = %ip,
            username = snapshot.credentials.username(),
            "starting login attempt"
        );

        let attempt = LoginAttempt {
            credentials: snapshot.credentials,
            ip,
            config: snapshot.zone_config,
        };
        let outcome = strategy.login(&attempt).await;

        match &outcome {
            LoginOutcome::Success { message } => {
                info!(message = %message, "login succeeded");
            }
            LoginOutcome::Failure { reason } => {
                error!(reason = %reason, "portal rejected login");
            }
            LoginOutcome::TransportError { cause } => {
                warn!(cause = %cause, "login attempt reached no portal verdict");
            }
        }

        outcome
    }

    /// Try alternate credentials with a single attempt.
    ///
    /// The active credentials are restored on every exit path, including
    /// panics, before this function returns to the caller.
    pub async fn verify(&self, alternate: Credentials) -> bool {
        let previous = self.settings.replace_credentials(alternate);
        let settings = self.settings.clone();
        let _restore = scopeguard::guard(previous, move |credentials| {
            settings.replace_credentials(credentials);
        });

        self.login().await.is_success()
    }

    /// Keep-alive loop: probe, re-authenticate when captive, sleep until
    /// the next cycle or cancellation.
    pub async fn keep_alive(&self, ctx: &DaemonContext) {
        let interval = self.settings.snapshot().zone_config.check_interval;
        info!(interval_secs = interval.as_secs(), "starting keep-alive loop");

        while ctx.is_running() {
            let snapshot = self.settings.snapshot();

            if probe::probe(&self.probe_client, &snapshot.zone_config.probe_url).await {
                debug!(heartbeat = true, "connectivity check passed");
            } else {
                warn!("network unreachable or captive portal detected, initiating login");
                // The outcome is already logged; a failed login just means
                // the next cycle probes again.
                let _ = self.login().await;
            }

            ctx.sleep(snapshot.zone_config.check_interval).await;
        }

        info!("keep-alive loop stopped");
    }
}

fn local_ip_or_loopback() -> IpAddr {
    match net::local_ip() {
        Ok(ip) => ip,
        Err(error) => {
            warn!(error = %error, "failed to detect local IP, falling back to loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::spawn_keep_alive;
    use portalkeeper_core::{Settings, ZoneConfig};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dorm_settings(dorm_url: String) -> Settings {
        let mut config = ZoneConfig::default();
        config.dorm_portal_url = dorm_url;
        config.http_timeout = Duration::from_secs(2);
        Settings {
            credentials: Credentials::new("alice", "secret").unwrap(),
            zone: Zone::Dorm,
            zone_config: config,
        }
    }

    async fn rejecting_dorm_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/eportal/portal/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"dr1003({"result":0,"msg":"账号或密码错误"})"#),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_login_dispatches_to_dorm_strategy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/eportal/portal/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"dr1003({"result":1,"msg":"成功"})"#),
            )
            .mount(&server)
            .await;

        let settings = SettingsHandle::new(dorm_settings(format!(
            "{}/eportal/portal/login",
            server.uri()
        )));
        let controller = SessionController::new(settings).unwrap();
        assert!(controller.login().await.is_success());
    }

    #[tokio::test]
    async fn test_verify_restores_credentials_on_failure() {
        let server = rejecting_dorm_server().await;
        let handle = SettingsHandle::new(dorm_settings(format!(
            "{}/eportal/portal/login",
            server.uri()
        )));
        let controller = SessionController::new(handle.clone()).unwrap();

        let verified = controller
            .verify(Credentials::new("bob", "wrong").unwrap())
            .await;

        assert!(!verified);
        let restored = handle.snapshot().credentials;
        assert_eq!(restored.username(), "alice");
        assert_eq!(restored.password(), "secret");
    }

    #[tokio::test]
    async fn test_verify_restores_credentials_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/eportal/portal/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"dr1003({"result":1,"msg":"成功"})"#),
            )
            .mount(&server)
            .await;

        let handle = SettingsHandle::new(dorm_settings(format!(
            "{}/eportal/portal/login",
            server.uri()
        )));
        let controller = SessionController::new(handle.clone()).unwrap();

        let verified = controller
            .verify(Credentials::new("bob", "right").unwrap())
            .await;

        assert!(verified);
        assert_eq!(handle.snapshot().credentials.username(), "alice");
    }

    #[tokio::test]
    async fn test_verify_restores_credentials_on_transport_error() {
        let handle = SettingsHandle::new(dorm_settings(
            "http://127.0.0.1:9/eportal/portal/login".to_string(),
        ));
        let controller = SessionController::new(handle.clone()).unwrap();

        let verified = controller
            .verify(Credentials::new("bob", "other").unwrap())
            .await;

        assert!(!verified);
        assert_eq!(handle.snapshot().credentials.username(), "alice");
    }

    #[tokio::test]
    async fn test_keep_alive_logs_in_when_offline() {
        let server = rejecting_dorm_server().await;
        // No HEAD mock: the probe gets 404 and classifies as offline,
        // which must trigger a login on the same cycle.
        let mut settings = dorm_settings(format!("{}/eportal/portal/login", server.uri()));
        settings.zone_config.probe_url = server.uri();
        settings.zone_config.check_interval = Duration::from_secs(60);

        let controller = Arc::new(SessionController::new(SettingsHandle::new(settings)).unwrap());
        let mut daemon = spawn_keep_alive(controller);

        tokio::time::sleep(Duration::from_millis(200)).await;
        daemon.stop_and_wait().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests
            .iter()
            .any(|r| r.url.path() == "/eportal/portal/login"));
    }

    #[tokio::test]
    async fn test_keep_alive_cancellation_exits_within_one_tick() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut settings = dorm_settings("http://127.0.0.1:9/unused".to_string());
        settings.zone_config.probe_url = server.uri();
        settings.zone_config.check_interval = Duration::from_secs(60);

        let controller = Arc::new(SessionController::new(SettingsHandle::new(settings)).unwrap());
        let mut daemon = spawn_keep_alive(controller);

        // Let the loop reach its interval sleep, then cancel: the loop
        // must exit within one tick, not after the full interval.
        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::time::timeout(Duration::from_secs(5), daemon.stop_and_wait())
            .await
            .expect("keep-alive loop did not exit after cancellation")
            .unwrap();
    }
}
