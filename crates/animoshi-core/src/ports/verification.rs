//! Human verification port.

use async_trait::async_trait;

/// Raw verdict returned by the scoring service for one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChallengeScore {
    pub success: bool,
    /// Confidence that the client is human, in `[0, 1]`.
    pub score: f64,
}

/// Scores client-side challenge tokens against a third-party service.
#[async_trait]
pub trait HumanVerifier: Send + Sync {
    async fn score(&self, token: &str) -> Result<ChallengeScore, VerifierError>;
}

/// Failures talking to the scoring service. A low score is not an error.
#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("Failed to reach verification service: {0}")]
    Transport(String),

    #[error("Failed to parse verification response: {0}")]
    Parse(String),
}
