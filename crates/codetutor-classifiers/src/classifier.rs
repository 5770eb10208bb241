//! Classification result and error types

use crate::topics::TopicTag;
use codetutor_core::InferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of question the student asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Conceptual,
    CodeExplanation,
    ExampleRequest,
    Other,
}

impl QueryType {
    /// All variants in contract order
    pub const ALL: [QueryType; 4] = [
        Self::Conceptual,
        Self::CodeExplanation,
        Self::ExampleRequest,
        Self::Other,
    ];

    /// Wire string for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conceptual => "conceptual",
            Self::CodeExplanation => "code_explanation",
            Self::ExampleRequest => "example_request",
            Self::Other => "other",
        }
    }

    /// Parse a wire string
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated outcome of classifying a query
///
/// Exactly one branch holds:
/// - `valid == true`: `topic` and `answer` present, `reason` absent
/// - `valid == false`: `reason` present; `topic`, `type` and `answer` absent
///
/// `keywords` is only non-empty when `answer` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether the query is in scope for the tutor
    pub valid: bool,

    /// Why the query was rejected
    pub reason: Option<String>,

    /// Subject tag for in-scope queries
    pub topic: Option<TopicTag>,

    /// Question kind for in-scope queries
    #[serde(rename = "type")]
    pub query_type: Option<QueryType>,

    /// Tutoring answer for in-scope queries
    pub answer: Option<String>,

    /// Short phrases summarizing the answer
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ClassificationResult {
    /// Create an in-scope result
    pub fn answered(
        topic: TopicTag,
        query_type: Option<QueryType>,
        answer: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            valid: true,
            reason: None,
            topic: Some(topic),
            query_type,
            answer: Some(answer.into()),
            keywords,
        }
    }

    /// Create an out-of-scope result
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            topic: None,
            query_type: None,
            answer: None,
            keywords: Vec::new(),
        }
    }

    /// Label used for logs and metrics
    pub fn outcome_label(&self) -> &'static str {
        if self.valid {
            "answered"
        } else {
            "rejected"
        }
    }
}

/// Category of pipeline failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Query was empty after trimming
    EmptyQuery,
    /// The inference call failed, timed out, or was cancelled
    ServiceError,
    /// Model output was not valid JSON
    ParseFailure,
    /// Model output was JSON but broke the response contract
    SchemaViolation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::ServiceError => "service_error",
            Self::ParseFailure => "parse_failure",
            Self::SchemaViolation => "schema_violation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed pipeline failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct ErrorResult {
    #[serde(rename = "error")]
    pub kind: ErrorKind,

    /// Human-readable description
    pub detail: String,

    /// Unparsed model output, kept for parse and schema failures
    #[serde(rename = "raw_response", skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Underlying inference failure for service errors
    #[serde(skip)]
    pub service_error: Option<InferenceError>,
}

impl ErrorResult {
    pub fn empty_query() -> Self {
        Self {
            kind: ErrorKind::EmptyQuery,
            detail: "query is empty".to_string(),
            raw: None,
            service_error: None,
        }
    }

    pub fn service(err: InferenceError) -> Self {
        Self {
            kind: ErrorKind::ServiceError,
            detail: err.to_string(),
            raw: None,
            service_error: Some(err),
        }
    }

    pub fn parse_failure(detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseFailure,
            detail: detail.into(),
            raw: Some(raw.into()),
            service_error: None,
        }
    }

    pub fn schema_violation(detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::SchemaViolation,
            detail: detail.into(),
            raw: Some(raw.into()),
            service_error: None,
        }
    }

    /// Whether re-invoking the pipeline could succeed
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::ServiceError
            && self.service_error.as_ref().map_or(true, InferenceError::is_transient)
    }
}
