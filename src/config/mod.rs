use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

/// Development placeholder used by the token minting utility when no secret
/// is configured. The HTTP service refuses to start with it.
pub const PLACEHOLDER_JWT_SECRET: &str = "MYSECRET";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_FRONTEND_BASE_URL: &str = "https://cold.global";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{0} is set to an insecure placeholder value")]
    InsecureSecret(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// A configuration value that must never show up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Secret,
    pub api_key: Option<Secret>,
}

#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// Opaque DSN handed to the SQL-backed collaborator, never parsed here.
    pub sql_connection_string: Option<Secret>,
    pub mixedbread_api_key: Option<Secret>,
    pub catalog_path: Option<String>,
    pub classifier_url: Option<url::Url>,
    pub frontend_base_url: url::Url,
}

/// Process configuration. Built once at boot and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub security: SecurityConfig,
    pub services: ServicesConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret == PLACEHOLDER_JWT_SECRET {
            return Err(ConfigError::InsecureSecret("JWT_SECRET"));
        }

        let environment = Environment::from_value(get("APP_ENV").as_deref());

        let port = match get("COLD_API_PORT").or_else(|| get("PORT")) {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "COLD_API_PORT",
                value: v,
            })?,
            None => DEFAULT_PORT,
        };

        let frontend_base_url = parse_url(
            "COLD_FRONTEND_BASE_URL",
            get("COLD_FRONTEND_BASE_URL").unwrap_or_else(|| DEFAULT_FRONTEND_BASE_URL.to_string()),
        )?;

        let classifier_url = get("COLD_CLASSIFIER_URL")
            .map(|v| parse_url("COLD_CLASSIFIER_URL", v))
            .transpose()?;

        Ok(Self {
            environment,
            port,
            security: SecurityConfig {
                jwt_secret: Secret::new(jwt_secret),
                api_key: get("API_KEY").map(Secret::new),
            },
            services: ServicesConfig {
                sql_connection_string: get("AZURE_SQL_CONNECTION_STRING").map(Secret::new),
                mixedbread_api_key: get("MIXEDBREAD_API_KEY").map(Secret::new),
                catalog_path: get("COLD_CATALOG_PATH"),
                classifier_url,
                frontend_base_url,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

fn parse_url(key: &'static str, value: String) -> Result<url::Url, ConfigError> {
    url::Url::parse(&value).map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.security.jwt_secret.expose(), "s3cret");
        assert!(config.security.api_key.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.services.frontend_base_url.as_str(), "https://cold.global/");
        assert!(config.services.classifier_url.is_none());
    }

    #[test]
    fn test_all_recognized_keys() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("API_KEY", "key-123"),
            ("AZURE_SQL_CONNECTION_STRING", "Server=tcp:db;Database=cold"),
            ("MIXEDBREAD_API_KEY", "mxb"),
            ("APP_ENV", "prod"),
            ("PORT", "9090"),
            ("COLD_CLASSIFIER_URL", "http://localhost:7000/classify"),
        ]))
        .unwrap();

        assert_eq!(config.security.api_key.as_ref().map(Secret::expose), Some("key-123"));
        assert_eq!(
            config.services.sql_connection_string.as_ref().map(Secret::expose),
            Some("Server=tcp:db;Database=cold")
        );
        assert_eq!(config.services.mixedbread_api_key.as_ref().map(Secret::expose), Some("mxb"));
        assert!(config.is_production());
        assert_eq!(config.port, 9090);
        assert!(config.services.classifier_url.is_some());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_placeholder_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "MYSECRET")])).unwrap_err();
        assert_eq!(err, ConfigError::InsecureSecret("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("COLD_API_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "COLD_API_PORT", .. }));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug_output() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "super-secret-value"),
            ("API_KEY", "api-key-value"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(!rendered.contains("api-key-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
