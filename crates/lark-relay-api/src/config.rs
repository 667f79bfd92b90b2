//! Configuration types for the HTTP service
//!
//! Configuration is layered with the `config` crate. Sources are applied in
//! order, later sources overriding earlier ones:
//!
//! 1. `/etc/lark-relay/service.{yaml,toml,json}`: system-wide defaults
//! 2. `config/service.{yaml,toml,json}`: deployment-local override
//! 3. The file named by `LARK_RELAY_CONFIG_FILE` (must exist when set)
//! 4. Environment variables prefixed `LARK_RELAY__`, `__` separating levels,
//!    e.g. `LARK_RELAY__SERVER__PORT=9090`
//! 5. The flat variables `GITHUB_SECRET`, `FEISHU_WEBHOOK_URL`,
//!    `FEISHU_SECRET` and `PORT`
//!
//! Every field has a default, so an unconfigured environment still yields a
//! valid configuration; the relay then reports itself unhealthy until a
//! Feishu webhook URL is supplied.

use crate::errors::ConfigError;
use serde::Deserialize;

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "LARK_RELAY_CONFIG_FILE";

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "LARK_RELAY";

/// Optional configuration files, lowest precedence first
pub const DEFAULT_CONFIG_FILES: &[&str] = &["/etc/lark-relay/service", "config/service"];

/// Flat environment variables and the keys they override
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GITHUB_SECRET", "github.secret"),
    ("FEISHU_WEBHOOK_URL", "feishu.webhook_url"),
    ("FEISHU_SECRET", "feishu.secret"),
    ("PORT", "server.port"),
];

/// Routes the service always serves itself
const RESERVED_PATHS: &[&str] = &["/health", "/metrics"];

/// Service configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Webhook endpoint settings
    pub webhooks: WebhookConfig,

    /// Inbound GitHub settings
    pub github: GithubConfig,

    /// Outbound Feishu settings
    pub feishu: FeishuConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 25 * 1024 * 1024, // GitHub caps payloads at 25MB
        }
    }
}

/// Webhook endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Additional webhook path; `POST /` is always served
    pub endpoint_path: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            endpoint_path: "/webhook".to_string(),
        }
    }
}

/// GitHub webhook settings
#[derive(Clone, Deserialize, Default)]
#[serde(default)]
pub struct GithubConfig {
    /// Shared secret for `X-Hub-Signature-256`; unset disables verification
    pub secret: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("secret", &redacted(&self.secret))
            .finish()
    }
}

/// Feishu custom bot settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct FeishuConfig {
    /// Custom bot webhook URL
    pub webhook_url: Option<String>,

    /// Signing secret; unset sends unsigned messages
    pub secret: Option<String>,

    /// Delivery request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FeishuConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            secret: None,
            timeout_seconds: 10,
        }
    }
}

impl std::fmt::Debug for FeishuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The webhook URL embeds the bot token, so it is redacted as well.
        f.debug_struct("FeishuConfig")
            .field("webhook_url", &redacted(&self.webhook_url))
            .field("secret", &redacted(&self.secret))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the default file locations and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file is malformed, an explicitly named
    /// file is missing, or a value cannot be coerced to its field type.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|path| !path.is_empty());

        Self::load_from(DEFAULT_CONFIG_FILES, explicit.as_deref())
    }

    /// Load configuration from the given optional files, an optional required
    /// file, and the environment.
    pub fn load_from(
        optional_files: &[&str],
        explicit_file: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        for path in optional_files {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        for (variable, key) in FLAT_ENV_OVERRIDES {
            let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        Ok(config.normalized())
    }

    /// Treat empty optional strings as unset.
    pub fn normalized(mut self) -> Self {
        for value in [
            &mut self.github.secret,
            &mut self.feishu.webhook_url,
            &mut self.feishu.secret,
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
        self
    }

    /// Validate configuration values.
    ///
    /// A missing Feishu webhook URL is not an error here: the service starts
    /// and reports the gap through its health endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if !self.webhooks.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path must start with '/', got '{}'",
                    self.webhooks.endpoint_path
                ),
            });
        }

        if RESERVED_PATHS.contains(&self.webhooks.endpoint_path.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path '{}' collides with a built-in route",
                    self.webhooks.endpoint_path
                ),
            });
        }

        let path = &self.webhooks.endpoint_path;
        if path.contains(['{', '}'])
            || path.split('/').any(|segment| segment.starts_with([':', '*']))
        {
            return Err(ConfigError::Invalid {
                message: format!(
                    "webhooks.endpoint_path '{}' must be a literal path without captures or wildcards",
                    path
                ),
            });
        }

        if self.feishu.timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "feishu.timeout_seconds must be non-zero".to_string(),
            });
        }

        if let Some(raw) = &self.feishu.webhook_url {
            let parsed = url::Url::parse(raw).map_err(|e| ConfigError::Invalid {
                message: format!("feishu.webhook_url is not a valid URL: {}", e),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "feishu.webhook_url must use http or https, got '{}'",
                        parsed.scheme()
                    ),
                });
            }
        }

        Ok(())
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<REDACTED>")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
