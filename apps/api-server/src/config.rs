//! Application configuration loaded from environment variables.

use std::env;

use animoshi_infra::{DatabaseConfig, RecaptchaConfig};

use crate::middleware::client_ip::ForwardedHeaders;

/// Browser origins allowed when `CORS_ALLOWED_ORIGINS` is unset.
const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:4173",
    "http://localhost:3000",
    "https://animoshi-svelte-frontend-zvxn.vercel.app",
];

#[cfg(feature = "rate-limit")]
use animoshi_infra::RateLimitConfig;

#[cfg(feature = "s3")]
use animoshi_infra::S3Config;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub recaptcha: RecaptchaConfig,
    pub forwarded_headers: ForwardedHeaders,
    pub cors_allowed_origins: Vec<String>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    #[cfg(feature = "s3")]
    pub s3: Option<S3Config>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1323),
            database: DatabaseConfig::from_env(),
            recaptcha: RecaptchaConfig::from_env(),
            forwarded_headers: ForwardedHeaders::from_env(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
            #[cfg(feature = "s3")]
            s3: S3Config::from_env(),
        }
    }
}

/// Comma-separated origins; blanks and trailing slashes are dropped.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
