//! Response validation
//!
//! Parses raw model output as JSON and checks it against the response
//! contract. Output is only ever parsed as data. The one repair applied is
//! stripping a surrounding Markdown code fence.

use crate::classifier::{ClassificationResult, ErrorResult, QueryType};
use crate::topics::{TopicRegistry, TopicTag};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Strict schema validator for model output
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    registry: Arc<TopicRegistry>,
}

impl ResponseValidator {
    pub fn new(registry: Arc<TopicRegistry>) -> Self {
        Self { registry }
    }

    /// Validate raw model output
    pub fn validate(&self, raw: &str) -> Result<ClassificationResult, ErrorResult> {
        let body = strip_code_fence(raw);

        let value: Value = serde_json::from_str(body)
            .map_err(|e| ErrorResult::parse_failure(format!("output is not valid JSON: {}", e), raw))?;

        self.check_schema(&value)
            .map_err(|detail| ErrorResult::schema_violation(detail, raw))
    }

    fn check_schema(&self, value: &Value) -> Result<ClassificationResult, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| format!("expected a JSON object, found {}", json_type(value)))?;

        let valid = match obj.get("valid") {
            Some(Value::Bool(b)) => *b,
            Some(other) => return Err(format!("field 'valid' must be a boolean, found {}", json_type(other))),
            None => return Err("missing required field 'valid'".to_string()),
        };

        let reason = optional_string(obj, "reason")?;
        let topic = optional_string(obj, "topic")?.map(|t| TopicTag::parse(&t));
        let query_type = optional_string(obj, "type")?
            .map(|t| QueryType::parse(&t).ok_or_else(|| format!("field 'type' has unsupported value '{}'", t)))
            .transpose()?;
        let answer = optional_string(obj, "answer")?;
        let keywords = keyword_list(obj)?;

        if valid {
            if reason.is_some() {
                return Err("field 'reason' must be null when 'valid' is true".to_string());
            }
            let topic = topic.ok_or("missing required field 'topic' for a valid query")?;
            if !self.registry.accepts(&topic) {
                return Err(format!(
                    "field 'topic' has value '{}' outside registry v{}",
                    topic,
                    self.registry.version()
                ));
            }
            let answer = answer.ok_or("missing required field 'answer' for a valid query")?;
            if answer.trim().is_empty() {
                return Err("field 'answer' must not be blank".to_string());
            }

            Ok(ClassificationResult {
                valid,
                reason: None,
                topic: Some(topic),
                query_type,
                answer: Some(answer),
                keywords,
            })
        } else {
            let reason = reason.ok_or("missing required field 'reason' for an invalid query")?;
            if reason.trim().is_empty() {
                return Err("field 'reason' must not be blank".to_string());
            }
            if answer.is_some() {
                return Err("field 'answer' must be null when 'valid' is false".to_string());
            }
            if topic.is_some() || query_type.is_some() {
                return Err("fields 'topic' and 'type' must be null when 'valid' is false".to_string());
            }
            if !keywords.is_empty() {
                return Err("field 'keywords' must be empty when there is no answer".to_string());
            }

            Ok(ClassificationResult {
                valid,
                reason: Some(reason),
                topic: None,
                query_type: None,
                answer: None,
                keywords,
            })
        }
    }
}

/// Remove one surrounding ```` ``` ```` / ```` ```json ```` fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match inner.find('\n') {
        Some(idx) => inner[idx + 1..].trim(),
        None => inner.trim(),
    }
}

/// Absent and null both read as `None`
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!(
            "field '{}' must be a string or null, found {}",
            field,
            json_type(other)
        )),
    }
}

fn keyword_list(obj: &Map<String, Value>) -> Result<Vec<String>, String> {
    match obj.get("keywords") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("keywords[{}] must be a string, found {}", i, json_type(other))),
            })
            .collect(),
        Some(other) => Err(format!("field 'keywords' must be an array, found {}", json_type(other))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
