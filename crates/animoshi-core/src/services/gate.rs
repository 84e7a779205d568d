//! Bot/abuse gate in front of every mutating action.

use std::sync::Arc;

use crate::error::{AbuseReason, Dependency, InteractionError};
use crate::ports::{ChallengeScore, HumanVerifier, VerifierError};

/// Lowest score accepted as human. Inclusive.
pub const MIN_HUMAN_SCORE: f64 = 0.5;

impl ChallengeScore {
    pub fn is_accepted(&self) -> bool {
        self.success && self.score >= MIN_HUMAN_SCORE
    }
}

/// First step of every mutating action: a blank token is refused outright.
pub fn require_token(token: &str) -> Result<(), InteractionError> {
    if token.trim().is_empty() {
        return Err(InteractionError::AbuseRejected(AbuseReason::MissingToken));
    }
    Ok(())
}

/// Verifies human-verification tokens and applies the acceptance policy.
pub struct BotGate {
    verifier: Arc<dyn HumanVerifier>,
}

impl BotGate {
    pub fn new(verifier: Arc<dyn HumanVerifier>) -> Self {
        Self { verifier }
    }

    /// `Ok(false)` means the service answered and the token was refused.
    /// Callers must reject empty tokens before getting here.
    pub async fn verify(&self, token: &str) -> Result<bool, VerifierError> {
        let verdict = self.verifier.score(token).await?;
        tracing::debug!(
            success = verdict.success,
            score = verdict.score,
            "Human verification scored"
        );
        Ok(verdict.is_accepted())
    }

    /// Presence check plus verification, mapped onto the interaction error taxonomy.
    pub(crate) async fn check(&self, token: &str) -> Result<(), InteractionError> {
        require_token(token)?;

        match self.verify(token).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::info!("Human verification rejected request");
                Err(InteractionError::AbuseRejected(AbuseReason::LowScore))
            }
            Err(e) => {
                tracing::error!(error = %e, "Human verification unavailable");
                Err(InteractionError::Dependency {
                    dependency: Dependency::Verifier,
                    message: e.to_string(),
                })
            }
        }
    }
}
