//! Caller-side retry
//!
//! The pipeline itself never retries. Callers that want to ride out transient
//! inference failures wrap `classify` with [`classify_with_retry`].

use crate::classifier::{ClassificationResult, ErrorResult};
use crate::pipeline::TutorPipeline;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// How many times to run the pipeline and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Run once, never retry
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Classify, re-running the pipeline after retryable service errors
///
/// Parse and schema failures are returned immediately: re-asking the model is
/// a caller policy decision, not a transport recovery. Cancelling `cancel`
/// aborts the in-flight attempt and any pending backoff.
pub async fn classify_with_retry(
    pipeline: &TutorPipeline,
    query: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<ClassificationResult, ErrorResult> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match pipeline.classify_with_cancel(query, cancel).await {
            Err(err) if err.is_retryable() && attempt < attempts => {
                warn!(
                    "Inference attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, attempts, err.detail, policy.backoff
                );
                metrics::counter!("codetutor_retries_total").increment(1);

                tokio::select! {
                    _ = cancel.cancelled() => return Err(err),
                    _ = tokio::time::sleep(policy.backoff) => {}
                }
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        assert_eq!(RetryPolicy::none().max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 2);
    }
}
