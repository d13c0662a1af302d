/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, identity service, CORS, cookie name, ...)
 * - Validate them (missing or malformed values abort startup)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::middleware::http::HttpLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw
            .unwrap_or("development")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Process configuration.
///
/// Holds the identity API key and optional JWT secret; no `Debug`.
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub http_limits: HttpLimits,

    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,

    pub identity_url: Url,
    pub identity_api_key: String,
    pub identity_timeout: Duration,
    pub identity_jwt_secret: Option<String>,
    pub identity_jwt_audience: String,

    // None disables the cookie fallback in the authenticator.
    pub session_cookie_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in production).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV").as_deref());

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let defaults = HttpLimits::default();
        let http_limits = HttpLimits {
            request_timeout: get("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            body_limit_bytes: get("BODY_LIMIT_BYTES")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.body_limit_bytes),
        };

        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = get("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);

        let database_acquire_timeout = Duration::from_secs(
            get("DATABASE_ACQUIRE_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
        );

        let identity_url = get("IDENTITY_URL").ok_or(ConfigError::Missing("IDENTITY_URL"))?;
        let identity_url =
            Url::parse(identity_url.trim()).map_err(|_| ConfigError::Invalid("IDENTITY_URL"))?;
        if !matches!(identity_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("IDENTITY_URL"));
        }

        let identity_api_key = get("IDENTITY_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("IDENTITY_API_KEY"))?;

        let identity_timeout = Duration::from_secs(
            get("IDENTITY_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
        );

        let identity_jwt_secret = get("IDENTITY_JWT_SECRET").filter(|v| !v.is_empty());

        let identity_jwt_audience =
            get("IDENTITY_JWT_AUDIENCE").unwrap_or_else(|| "authenticated".to_string());

        // Unset → default cookie; set but empty → fallback disabled.
        let session_cookie_name = match get("SESSION_COOKIE_NAME") {
            Some(name) if name.trim().is_empty() => None,
            Some(name) => Some(name.trim().to_string()),
            None => Some("sb-access-token".to_string()),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            http_limits,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            identity_url,
            identity_api_key,
            identity_timeout,
            identity_jwt_secret,
            identity_jwt_audience,
            session_cookie_name,
        })
    }
}
