//! Practice problem records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Entry in the problem list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub topic: String,

    /// `easy`, `moderate` or `hard`
    pub difficulty: String,
}

/// Full problem statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetail {
    pub title: String,
    pub topic: String,
    pub difficulty: String,

    /// Name of the function the learner implements
    pub function: String,

    /// Parameter declarations, e.g. `"n: int"`
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Return type of the function
    #[serde(rename = "return")]
    pub return_type: String,

    pub statement: String,

    #[serde(default)]
    pub sample_input: Option<String>,

    #[serde(default)]
    pub sample_output: Option<String>,

    /// Fields not modelled above, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
