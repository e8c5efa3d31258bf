use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};
use crate::telemetry::LogFormat;

pub const DEFAULT_GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub gnews_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// Accept provider keys sent in request bodies when none is configured.
    pub allow_client_api_keys: bool,
    pub gnews_base_url: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub http_timeout: Duration,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = non_empty("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let timeout_secs = match non_empty("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid HTTP_TIMEOUT_SECS: {}", e)))?,
            None => 30,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config("HTTP_TIMEOUT_SECS must be greater than zero".to_string()));
        }

        let max_body_bytes = match non_empty("MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("Invalid MAX_BODY_BYTES: {}", e)))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        if max_body_bytes == 0 {
            return Err(AppError::Config("MAX_BODY_BYTES must be greater than zero".to_string()));
        }

        let allow_client_api_keys = non_empty("ALLOW_CLIENT_API_KEYS")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let log_format = match non_empty("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::Text,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gnews_api_key: non_empty("GNEWS_API_KEY"),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            allow_client_api_keys,
            gnews_base_url: non_empty("GNEWS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GNEWS_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes,
            log_format,
        })
    }

    pub fn resolve_gnews_key(&self, client_key: Option<&str>) -> Result<String> {
        self.resolve_key(self.gnews_api_key.as_deref(), client_key)
            .ok_or_else(|| AppError::Config("GNews API key is not configured".to_string()))
    }

    pub fn resolve_gemini_key(&self, client_key: Option<&str>) -> Result<String> {
        self.resolve_key(self.gemini_api_key.as_deref(), client_key)
            .ok_or_else(|| AppError::Config("Gemini API key is not configured".to_string()))
    }

    fn resolve_key(&self, configured: Option<&str>, client_key: Option<&str>) -> Option<String> {
        if let Some(key) = configured {
            return Some(key.to_string());
        }
        if !self.allow_client_api_keys {
            return None;
        }
        client_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.gnews_base_url, DEFAULT_GNEWS_BASE_URL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(config.gnews_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert!(!config.allow_client_api_keys);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn zero_timeout_is_a_config_error() {
        let err = config_from(&[("HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let config = config_from(&[("HTTP_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn body_limit_must_be_positive_number() {
        assert!(matches!(config_from(&[("MAX_BODY_BYTES", "0")]), Err(AppError::Config(_))));
        assert!(matches!(config_from(&[("MAX_BODY_BYTES", "lots")]), Err(AppError::Config(_))));
        assert_eq!(config_from(&[("MAX_BODY_BYTES", "2048")]).unwrap().max_body_bytes, 2048);
    }

    #[test]
    fn invalid_host_is_a_config_error() {
        let err = config_from(&[("HOST", "localhost:80")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn blank_keys_count_as_missing() {
        let config = config_from(&[("GNEWS_API_KEY", "   ")]).unwrap();
        assert!(config.gnews_api_key.is_none());
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let config = config_from(&[("GNEWS_BASE_URL", "http://localhost:9000/")]).unwrap();
        assert_eq!(config.gnews_base_url, "http://localhost:9000");
    }

    #[test]
    fn configured_key_wins_over_client_key() {
        let config = config_from(&[("GEMINI_API_KEY", "server"), ("ALLOW_CLIENT_API_KEYS", "true")]).unwrap();
        assert_eq!(config.resolve_gemini_key(Some("client")).unwrap(), "server");
    }

    #[test]
    fn client_key_ignored_unless_allowed() {
        let config = config_from(&[]).unwrap();
        assert!(matches!(config.resolve_gnews_key(Some("client")), Err(AppError::Config(_))));

        let config = config_from(&[("ALLOW_CLIENT_API_KEYS", "1")]).unwrap();
        assert_eq!(config.resolve_gnews_key(Some("client")).unwrap(), "client");
        assert!(config.resolve_gnews_key(Some("")).is_err());
        assert!(config.resolve_gnews_key(None).is_err());
    }

    #[test]
    fn log_format_parses() {
        let config = config_from(&[("LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
