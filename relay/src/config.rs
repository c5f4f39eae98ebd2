//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup into [`Config`], which is then
//! passed explicitly into each component's constructor.

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::RelayError;

/// Default region used by both backends.
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Default LocalStack edge endpoint.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:4566";

/// Which AWS backend the clients talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// LocalStack emulation with static test credentials.
    Local,
    /// Real AWS endpoints and the default credential chain.
    Production,
}

impl Backend {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "local" => Backend::Local,
            _ => Backend::Production,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Production => "production",
        }
    }
}

/// Which entry point is validating the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The HTTP sender only enqueues.
    Sender,
    /// The poller and the Lambda adapter receive, look up the secret and delete.
    Receiver,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQS queue URL messages are sent to and received from
    pub queue_url: Option<String>,

    /// Secrets Manager secret name or ARN looked up per message
    pub secret_id: Option<String>,

    /// Backend selected by AWS_ENV
    pub backend: Backend,

    /// AWS region for both clients
    pub region: String,

    /// Endpoint override used by the local backend
    pub local_endpoint: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Maximum messages requested per receive call (1 - 10)
    pub receive_max_messages: i32,

    /// Long-poll wait per receive call in seconds (0 - 20)
    pub receive_wait_seconds: i32,

    /// Delay between poll cycles in milliseconds
    pub poll_interval_ms: u64,

    /// Whether secret values are masked before they are logged
    pub redact_secrets: bool,

    /// Run a single poll cycle and exit
    pub receiver_once: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            queue_url: non_empty(lookup("QUEUE_URL")),

            secret_id: non_empty(lookup("SECRET_ID")),

            backend: Backend::parse(lookup("AWS_ENV").as_deref()),

            region: non_empty(lookup("AWS_REGION")).unwrap_or_else(|| DEFAULT_REGION.to_string()),

            local_endpoint: non_empty(lookup("LOCALSTACK_ENDPOINT"))
                .unwrap_or_else(|| DEFAULT_LOCAL_ENDPOINT.to_string()),

            port: parse_or(&lookup, "PORT", 8080),

            receive_max_messages: parse_or(&lookup, "RECEIVE_MAX_MESSAGES", 1i32).clamp(1, 10),

            receive_wait_seconds: parse_or(&lookup, "RECEIVE_WAIT_SECONDS", 0i32).clamp(0, 20),

            poll_interval_ms: parse_or(&lookup, "POLL_INTERVAL_MS", 5000),

            redact_secrets: parse_flag(&lookup, "REDACT_SECRETS", true),

            receiver_once: parse_flag(&lookup, "RECEIVER_ONCE", false),
        }
    }

    /// Check that everything the given entry point needs is present.
    pub fn validate_for(&self, role: Role) -> Result<(), RelayError> {
        let queue_url = self.require_queue_url()?;
        Url::parse(queue_url)
            .map_err(|e| RelayError::Config(format!("QUEUE_URL is not a valid URL: {e}")))?;

        if self.backend == Backend::Local {
            Url::parse(&self.local_endpoint).map_err(|e| {
                RelayError::Config(format!("LOCALSTACK_ENDPOINT is not a valid URL: {e}"))
            })?;
        }

        if role == Role::Receiver {
            self.require_secret_id()?;
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn require_queue_url(&self) -> Result<&str, RelayError> {
        self.queue_url
            .as_deref()
            .ok_or_else(|| RelayError::Config("QUEUE_URL is not set".to_string()))
    }

    pub fn require_secret_id(&self) -> Result<&str, RelayError> {
        self.secret_id
            .as_deref()
            .ok_or_else(|| RelayError::Config("SECRET_ID is not set".to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a numeric variable, falling back to the default when unset or invalid.
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Parse a boolean flag like "true", "0" or "off".
fn parse_flag<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        Some(v) => {
            warn!(env_var = name, value = %v, "Invalid flag, using default");
            default
        }
        None => default,
    }
}
