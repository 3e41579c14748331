//! Process-wide configuration, read once at startup.

use crate::factory::ProviderConfig;
use crate::Error;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: IpAddr,
    pub port: u16,

    // Collaborator
    pub model: String,
    pub request_timeout: Duration,
    pub provider: ProviderConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = var("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid HOST: {e}")))?;
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid PORT: {e}")))?;
        let timeout_secs: u64 = var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid REQUEST_TIMEOUT_SECS: {e}")))?;

        Ok(Config {
            host,
            port,
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            provider: ProviderConfig::from_lookup(&lookup)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ProviderType;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.provider.provider_type, ProviderType::Gemini);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|key| {
            let value = match key {
                "HOST" => "0.0.0.0",
                "PORT" => "8080",
                "GEMINI_MODEL" => "gemini-2.5-pro",
                "REQUEST_TIMEOUT_SECS" => "15",
                "GEMINI_API_KEY" => "secret",
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            "GEMINI_API_KEY" => Some("secret".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(Error::Config(msg)) if msg.starts_with("Invalid PORT")));
    }

    #[test]
    fn test_missing_credentials_fail_startup() {
        assert!(Config::from_lookup(|_| None).is_err());
    }
}
