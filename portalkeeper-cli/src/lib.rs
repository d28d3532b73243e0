//! Portalkeeper CLI
//!
//! Loads settings, initializes logging, and dispatches to a one-shot
//! login, the keep-alive daemon, or credential verification. Returns the
//! process exit code: 0 on success, 1 on failure or fatal startup error.

pub mod args;

use args::{Cli, Commands};
use portalkeeper_core::{Credentials, Settings, SettingsHandle, Zone};
use portalkeeper_daemon::{spawn_keep_alive, SessionController};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run the CLI to completion and return the process exit code.
pub async fn run(cli: Cli) -> i32 {
    init_tracing(cli.verbose);

    if let Some(path) = &cli.env_file {
        if let Err(err) = dotenvy::from_path(path) {
            error!(path = %path, error = %err, "failed to load env file");
            return 1;
        }
    } else {
        // A ./.env file is optional
        let _ = dotenvy::dotenv();
    }

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return 1;
        }
    };

    if let Some(zone) = &cli.zone {
        match zone.parse::<Zone>() {
            Ok(zone) => settings.zone = zone,
            Err(err) => {
                error!(error = %err, "invalid zone override");
                return 1;
            }
        }
    }
    if let Some(secs) = cli.interval {
        if secs == 0 {
            error!("check interval must be positive");
            return 1;
        }
        settings.zone_config.check_interval = Duration::from_secs(secs);
    }

    let handle = SettingsHandle::new(settings);
    let controller = match SessionController::new(handle) {
        Ok(controller) => Arc::new(controller),
        Err(err) => {
            error!(error = %err, "failed to initialize portal transport");
            return 1;
        }
    };

    match cli.command {
        Some(Commands::Verify { username, password }) => {
            let credentials = match Credentials::new(username, password) {
                Ok(credentials) => credentials,
                Err(err) => {
                    error!(error = %err, "invalid credentials");
                    return 1;
                }
            };
            if controller.verify(credentials).await {
                info!("credentials verified against the portal");
                0
            } else {
                error!("credential verification failed");
                1
            }
        }
        None if cli.keep_alive => run_daemon(controller).await,
        None => match controller.login().await.into_result() {
            Ok(_) => 0,
            Err(err) => {
                error!(error = %err, "login failed");
                1
            }
        },
    }
}

async fn run_daemon(controller: Arc<SessionController>) -> i32 {
    let mut daemon = spawn_keep_alive(controller);

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        daemon.stop();
    } else {
        info!("shutdown requested");
    }

    match daemon.stop_and_wait().await {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "keep-alive loop did not shut down cleanly");
            1
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
