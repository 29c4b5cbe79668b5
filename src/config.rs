use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::time::Duration;

/// Public Zefix REST endpoint root; the search path is appended by the client.
pub const DEFAULT_ZEFIX_BASE_URL: &str = "https://www.zefix.admin.ch/ZefixPublicREST";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_THROTTLE_DELAY_MS: u64 = 500;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Username/password pair for upstream Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value for the `Authorization` header: `Basic base64(username:password)`.
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub zefix_base_url: String,
    /// `None` when either secret is missing; lookups then fail as misconfigured.
    pub credentials: Option<Credentials>,
    pub throttle_delay: Duration,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Zefix Base URL: {}", config.zefix_base_url);
        tracing::debug!("Throttle delay: {:?}", config.throttle_delay);
        tracing::debug!("Upstream timeout: {:?}", config.upstream_timeout);
        tracing::debug!("Server Port: {}", config.port);
        if config.credentials.is_none() {
            tracing::warn!(
                "ZEFIX_USERNAME/ZEFIX_PASSWORD not set; every lookup will fail as misconfigured"
            );
        }

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => DEFAULT_PORT,
        };

        let zefix_base_url = non_empty("ZEFIX_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ZEFIX_BASE_URL.to_string());
        let parsed = url::Url::parse(&zefix_base_url)
            .map_err(|e| anyhow::anyhow!("ZEFIX_BASE_URL is not a valid URL: {}", e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("ZEFIX_BASE_URL must start with http:// or https://");
        }

        let credentials = match (non_empty("ZEFIX_USERNAME"), non_empty("ZEFIX_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };

        let throttle_delay_ms = match non_empty("THROTTLE_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("THROTTLE_DELAY_MS must be a number of milliseconds"))?,
            None => DEFAULT_THROTTLE_DELAY_MS,
        };

        let upstream_timeout_secs: u64 = match non_empty("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be a number of seconds"))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if upstream_timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            port,
            zefix_base_url,
            credentials,
            throttle_delay: Duration::from_millis(throttle_delay_ms),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.zefix_base_url, DEFAULT_ZEFIX_BASE_URL);
        assert!(config.credentials.is_none());
        assert_eq!(config.throttle_delay, Duration::from_millis(500));
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_credentials_require_both_values() {
        let only_user = Config::from_vars(vars(&[("ZEFIX_USERNAME", "user")])).unwrap();
        assert!(only_user.credentials.is_none());

        let blank_pass = Config::from_vars(vars(&[
            ("ZEFIX_USERNAME", "user"),
            ("ZEFIX_PASSWORD", "   "),
        ]))
        .unwrap();
        assert!(blank_pass.credentials.is_none());

        let both = Config::from_vars(vars(&[
            ("ZEFIX_USERNAME", "user"),
            ("ZEFIX_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert_eq!(both.credentials, Some(Credentials::new("user", "secret")));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
        assert!(Config::from_vars(vars(&[("ZEFIX_BASE_URL", "ftp://zefix.ch")])).is_err());
        assert!(Config::from_vars(vars(&[("ZEFIX_BASE_URL", "zefix")])).is_err());
        assert!(Config::from_vars(vars(&[("THROTTLE_DELAY_MS", "-1")])).is_err());
        assert!(Config::from_vars(vars(&[("UPSTREAM_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("ZEFIX_BASE_URL", "http://localhost:9000"),
            ("THROTTLE_DELAY_MS", "0"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.zefix_base_url, "http://localhost:9000");
        assert_eq!(config.throttle_delay, Duration::ZERO);
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_basic_authorization_header() {
        let creds = Credentials::new("user", "pass");
        // base64("user:pass")
        assert_eq!(creds.basic_authorization(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("user", "hunter2");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
