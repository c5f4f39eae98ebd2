//! AWS client configuration shared by every entry point.
//!
//! The local-versus-production decision is made once, in
//! [`ClientSettings::resolve`]. The resulting value is turned into an
//! `SdkConfig` that both the SQS and Secrets Manager clients are built from.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sqs::config::Credentials;
use tracing::info;

use crate::config::{Backend, Config};

/// Access key and secret accepted by LocalStack.
const LOCAL_CREDENTIAL: &str = "test";

/// Resolved client configuration: where to connect and with which credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend: Backend,
    pub region: String,
    /// Endpoint override; `None` uses the regional AWS endpoints.
    pub endpoint_url: Option<String>,
    /// Use static LocalStack credentials instead of the default provider chain.
    pub static_credentials: bool,
}

impl ClientSettings {
    pub fn resolve(config: &Config) -> Self {
        match config.backend {
            Backend::Local => ClientSettings {
                backend: Backend::Local,
                region: config.region.clone(),
                endpoint_url: Some(config.local_endpoint.clone()),
                static_credentials: true,
            },
            Backend::Production => ClientSettings {
                backend: Backend::Production,
                region: config.region.clone(),
                endpoint_url: None,
                static_credentials: false,
            },
        }
    }
}

/// Load an `SdkConfig` for the resolved settings.
pub async fn load_sdk_config(settings: &ClientSettings) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));

    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if settings.static_credentials {
        loader = loader.credentials_provider(Credentials::new(
            LOCAL_CREDENTIAL,
            LOCAL_CREDENTIAL,
            None,
            None,
            "localstack",
        ));
    }

    let sdk_config = loader.load().await;

    info!(
        backend = settings.backend.name(),
        region = %settings.region,
        endpoint = ?settings.endpoint_url,
        "aws_config_loaded"
    );

    sdk_config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str) -> Config {
        let backend = backend.to_string();
        Config::from_lookup(move |name| match name {
            "AWS_ENV" => Some(backend.clone()),
            "LOCALSTACK_ENDPOINT" => Some("http://localstack:4566".to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_resolve_local() {
        let settings = ClientSettings::resolve(&config("local"));
        assert_eq!(settings.backend, Backend::Local);
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localstack:4566"));
        assert!(settings.static_credentials);
        assert_eq!(settings.region, "ap-southeast-2");
    }

    #[test]
    fn test_resolve_production() {
        let settings = ClientSettings::resolve(&config("production"));
        assert_eq!(settings.backend, Backend::Production);
        assert_eq!(settings.endpoint_url, None);
        assert!(!settings.static_credentials);
    }

    #[tokio::test]
    async fn test_load_local_sdk_config() {
        let settings = ClientSettings::resolve(&config("local"));
        let sdk_config = load_sdk_config(&settings).await;

        assert_eq!(sdk_config.endpoint_url(), Some("http://localstack:4566"));
        assert_eq!(
            sdk_config.region().map(|r| r.as_ref()),
            Some("ap-southeast-2")
        );
    }
}
