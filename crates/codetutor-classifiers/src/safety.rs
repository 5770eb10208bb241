//! Deny-list safety gate
//!
//! Runs before any inference call. A query is rejected when it contains any
//! deny-listed term, ignoring letter case.

use aho_corasick::AhoCorasick;
use codetutor_core::{Error, Result};

/// Reason attached to results rejected by the gate
pub const BLOCKED_REASON: &str = "blocked by safety filter";

/// Terms rejected when no deny-list is configured
pub const DEFAULT_DENY_LIST: &[&str] = &["hack", "exploit", "bypass"];

/// Case-insensitive substring filter using Aho-Corasick
#[derive(Debug, Clone)]
pub struct SafetyGate {
    matcher: AhoCorasick,
    terms: Vec<String>,
}

impl SafetyGate {
    /// Create a gate from deny-list terms
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .collect();

        if terms.iter().any(|t| t.is_empty()) {
            return Err(Error::config("Safety deny-list contains an empty term"));
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&terms)
            .map_err(|e| Error::config(format!("Failed to build deny-list matcher: {}", e)))?;

        Ok(Self { matcher, terms })
    }

    /// Create a gate with [`DEFAULT_DENY_LIST`]
    pub fn with_default_terms() -> Result<Self> {
        Self::new(DEFAULT_DENY_LIST)
    }

    /// Whether the query may proceed to inference
    pub fn check(&self, query: &str) -> bool {
        self.find_match(query).is_none()
    }

    /// First deny-listed term found in the query, if any
    pub fn find_match(&self, query: &str) -> Option<&str> {
        let lowered = query.to_lowercase();
        self.matcher
            .find(&lowered)
            .map(|m| self.terms[m.pattern().as_usize()].as_str())
    }

    /// Normalized deny-list terms
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
