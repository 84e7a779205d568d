//! Google reCAPTCHA v3 verifier.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use animoshi_core::ports::{ChallengeScore, HumanVerifier, VerifierError};

const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// reCAPTCHA configuration.
#[derive(Debug, Clone)]
pub struct RecaptchaConfig {
    /// Shared secret issued with the site key.
    pub secret: String,
    pub verify_url: String,
    pub timeout: Duration,
}

impl RecaptchaConfig {
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("RECAPTCHA_SECRET").unwrap_or_default(),
            verify_url: std::env::var("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| DEFAULT_VERIFY_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("RECAPTCHA_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

/// Body of a `siteverify` response.
#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: f64,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

fn parse_response(body: &str) -> Result<ChallengeScore, VerifierError> {
    let response: SiteVerifyResponse =
        serde_json::from_str(body).map_err(|e| VerifierError::Parse(e.to_string()))?;

    if !response.error_codes.is_empty() {
        tracing::debug!(error_codes = ?response.error_codes, "reCAPTCHA reported errors");
    }

    Ok(ChallengeScore {
        success: response.success,
        score: response.score,
    })
}

/// Posts tokens to the reCAPTCHA `siteverify` endpoint.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    config: RecaptchaConfig,
}

impl RecaptchaVerifier {
    pub fn new(config: RecaptchaConfig) -> Result<Self, VerifierError> {
        if config.secret.is_empty() {
            tracing::warn!("RECAPTCHA_SECRET is empty, every token will be rejected");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VerifierError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl HumanVerifier for RecaptchaVerifier {
    async fn score(&self, token: &str) -> Result<ChallengeScore, VerifierError> {
        let body = self
            .client
            .post(&self.config.verify_url)
            .form(&[("secret", self.config.secret.as_str()), ("response", token)])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| VerifierError::Transport(e.to_string()))?
            .text()
            .await
            .map_err(|e| VerifierError::Transport(e.to_string()))?;

        parse_response(&body)
    }
}
