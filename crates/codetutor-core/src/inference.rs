//! Inference client trait
//!
//! The classification pipeline talks to the external generative-text service
//! only through [`InferenceClient`]. Implementations perform exactly one
//! request per call and never retry.

use crate::types::InferenceParams;
use async_trait::async_trait;

/// Failure of a single inference exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("inference request timed out")]
    Timeout,

    #[error("authentication with the inference service failed: {0}")]
    Authentication(String),

    #[error("inference service rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("inference service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("inference request cancelled")]
    Cancelled,
}

impl InferenceError {
    /// Whether a caller-side retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited(_) | Self::Transport(_) | Self::Status { status: 500..=599, .. }
        )
    }
}

/// Trait for all inference service adapters
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send a system instruction and user text, returning the raw generated text
    async fn invoke(
        &self,
        system_instruction: &str,
        user_text: &str,
        params: InferenceParams,
    ) -> Result<String, InferenceError>;

    /// Get the client name (used in logs)
    fn name(&self) -> &str;
}
