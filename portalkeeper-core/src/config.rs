//! Network zone and settings model
//!
//! Settings are loaded once from the environment, then shared through a
//! [`SettingsHandle`]. The keep-alive loop takes a consistent snapshot per
//! attempt; credentials and zone can be swapped between attempts without
//! restarting the daemon.

use crate::{Credentials, Error, Result};
use parking_lot::RwLock;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default challenge endpoint for the teaching zone portal
pub const DEFAULT_CHALLENGE_URL: &str = "https://net.szu.edu.cn/cgi-bin/get_challenge";
/// Default login endpoint for the teaching zone portal
pub const DEFAULT_PORTAL_URL: &str = "https://net.szu.edu.cn/cgi-bin/srun_portal";
/// Dorm zone portal endpoint. Reachable only via this fixed private
/// address, not DNS.
pub const DEFAULT_DORM_PORTAL_URL: &str = "http://172.30.255.42:801/eportal/portal/login";
/// Default connectivity probe endpoint (responds 204 when unfiltered)
pub const DEFAULT_PROBE_URL: &str = "http://www.gstatic.com/generate_204";
/// Browser User-Agent the portal expects
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/63.0.3239.26 Safari/537.36";

/// Network zone served by one of the two portal families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Teaching area, SRUN challenge/response portal
    Teaching,
    /// Dormitory area, Dr.COM direct-GET portal
    Dorm,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Teaching => "teaching",
            Zone::Dorm => "dorm",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teaching" => Ok(Zone::Teaching),
            "dorm" => Ok(Zone::Dorm),
            _ => Err(Error::validation("zone", "must be 'teaching' or 'dorm'")),
        }
    }
}

/// Portal parameters for one login attempt.
///
/// Immutable for the duration of an attempt; the daemon re-snapshots
/// between attempts, so changes made through [`SettingsHandle`] take
/// effect on the next cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    /// Access controller id the portal assigned to this zone
    pub ac_id: String,
    /// Encryption version tag carried inside the info blob
    pub enc_ver: String,
    /// Protocol constant `n`
    pub n: String,
    /// Protocol constant `type`
    pub client_type: String,
    /// Challenge endpoint (teaching zone)
    pub challenge_url: String,
    /// Login endpoint (teaching zone)
    pub portal_url: String,
    /// Login endpoint (dorm zone)
    pub dorm_portal_url: String,
    /// Connectivity probe endpoint
    pub probe_url: String,
    /// Timeout applied to every portal request
    pub http_timeout: Duration,
    /// Keep-alive cycle interval
    pub check_interval: Duration,
    /// User-Agent header sent on portal requests
    pub user_agent: String,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            ac_id: "12".to_string(),
            enc_ver: "srun_bx1".to_string(),
            n: "200".to_string(),
            client_type: "1".to_string(),
            challenge_url: DEFAULT_CHALLENGE_URL.to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            dorm_portal_url: DEFAULT_DORM_PORTAL_URL.to_string(),
            probe_url: DEFAULT_PROBE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            check_interval: Duration::from_secs(300),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Complete daemon settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub zone: Zone,
    pub zone_config: ZoneConfig,
}

impl Settings {
    /// Load settings from `PORTAL_*` environment variables.
    ///
    /// `PORTAL_USERNAME` and `PORTAL_PASSWORD` are required; everything
    /// else falls back to the fixed portal defaults.
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::new(
            require_env("PORTAL_USERNAME")?,
            require_env("PORTAL_PASSWORD")?,
        )?;

        let zone = match env::var("PORTAL_ZONE") {
            Ok(value) => value.parse()?,
            Err(_) => Zone::Teaching,
        };

        let mut config = ZoneConfig::default();
        if let Ok(value) = env::var("PORTAL_AC_ID") {
            config.ac_id = value;
        }
        if let Ok(value) = env::var("PORTAL_ENC_VER") {
            config.enc_ver = value;
        }
        if let Ok(value) = env::var("PORTAL_N") {
            config.n = value;
        }
        if let Ok(value) = env::var("PORTAL_TYPE") {
            config.client_type = value;
        }
        if let Ok(value) = env::var("PORTAL_CHALLENGE_URL") {
            config.challenge_url = value;
        }
        if let Ok(value) = env::var("PORTAL_LOGIN_URL") {
            config.portal_url = value;
        }
        if let Ok(value) = env::var("PORTAL_DORM_URL") {
            config.dorm_portal_url = value;
        }
        if let Ok(value) = env::var("PORTAL_PROBE_URL") {
            config.probe_url = value;
        }
        if let Ok(value) = env::var("PORTAL_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse_positive("PORTAL_HTTP_TIMEOUT_SECS", &value)?);
        }
        if let Ok(value) = env::var("PORTAL_CHECK_INTERVAL_SECS") {
            config.check_interval =
                Duration::from_secs(parse_positive("PORTAL_CHECK_INTERVAL_SECS", &value)?);
        }

        Ok(Self {
            credentials,
            zone,
            zone_config: config,
        })
    }
}

fn require_env(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::validation(name, "must be set")),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| Error::validation(name, "must be a positive integer"))
}

/// Thread-synchronized handle to the live settings.
///
/// Cheap to clone; writers swap fields between attempts, readers take a
/// consistent [`Settings`] snapshot per attempt and never re-read
/// mid-attempt.
#[derive(Clone)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Take a consistent snapshot of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.inner.read().clone()
    }

    /// Install new credentials, returning the previous pair.
    pub fn replace_credentials(&self, credentials: Credentials) -> Credentials {
        std::mem::replace(&mut self.inner.write().credentials, credentials)
    }

    /// Switch the active zone; takes effect on the next attempt.
    pub fn set_zone(&self, zone: Zone) {
        self.inner.write().zone = zone;
    }

    /// Change the keep-alive interval; takes effect on the next cycle.
    pub fn set_check_interval(&self, interval: Duration) {
        self.inner.write().zone_config.check_interval = interval;
    }
}
