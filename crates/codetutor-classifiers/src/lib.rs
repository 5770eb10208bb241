//! CodeTutor Classifiers
//!
//! Turns a student's free-text question into a validated tutoring answer.
//!
//! The pipeline runs in fixed order:
//! - Safety gate: local deny-list check, no external call
//! - Prompt contract: fixed system instruction plus the raw query
//! - Inference: one call through an injected [`InferenceClient`]
//! - Validation: strict JSON parse and schema check of the model output
//!
//! [`InferenceClient`]: codetutor_core::InferenceClient

pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod prompt;
pub mod retry;
pub mod safety;
pub mod topics;
pub mod validator;

pub use classifier::{ClassificationResult, ErrorKind, ErrorResult, QueryType};
pub use config::{InferenceConfig, PipelineConfig, RetryConfig, SafetyConfig, TopicsConfig};
pub use pipeline::{PipelineBuilder, PipelineRun, PipelineState, TutorPipeline};
pub use prompt::PromptContract;
pub use retry::{classify_with_retry, RetryPolicy};
pub use safety::SafetyGate;
pub use topics::{TopicRegistry, TopicTag};
pub use tokio_util::sync::CancellationToken;
pub use validator::ResponseValidator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, ErrorKind, ErrorResult, QueryType};
    pub use crate::pipeline::{PipelineBuilder, TutorPipeline};
    pub use crate::safety::SafetyGate;
    pub use crate::topics::{TopicRegistry, TopicTag};
}
