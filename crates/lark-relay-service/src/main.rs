//! # Lark Relay Service
//!
//! Binary entry point for the GitHub to Feishu relay.
//!
//! This executable:
//! - Loads configuration from files and the environment
//! - Initializes logging
//! - Builds the Feishu client and starts the HTTP server from lark-relay-api
//!
//! Exit codes: `1` bind failure, `2` server failure, `3` configuration error.

use lark_relay_api::{start_server, AppState, LoggingConfig, ServiceConfig, ServiceError};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Logging settings live in the configuration, so a load failure is
    // reported through a default subscriber.
    let service_config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            error!(
                error = %e,
                "Could not load service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    init_tracing(&service_config.logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Lark Relay Service");

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    if service_config.feishu.webhook_url.is_none() {
        warn!("FEISHU_WEBHOOK_URL is not set; webhooks will be refused until it is configured");
    }
    if service_config.github.secret.is_none() {
        warn!("GITHUB_SECRET is not set; webhook signatures will not be verified");
    }
    if service_config.feishu.secret.is_none() {
        info!("FEISHU_SECRET is not set; cards will be sent unsigned");
    }

    info!(
        host = %service_config.server.host,
        port = service_config.server.port,
        endpoint_path = %service_config.webhooks.endpoint_path,
        "Configuration loaded"
    );

    let result = match AppState::from_config(service_config) {
        Ok(state) => start_server(state).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Failed to run server: {}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&logging.level)));

    let json_layer = logging
        .json_format
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!logging.json_format).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn default_directive(level: &str) -> String {
    format!(
        "lark_relay={level},lark_relay_api={level},lark_relay_core={level},tower_http=info",
        level = level
    )
}

fn exit_code(error: &ServiceError) -> i32 {
    match error {
        ServiceError::BindFailed { .. } => 1,
        ServiceError::ServerFailed { .. } => 2,
        ServiceError::Configuration(_) => 3,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
