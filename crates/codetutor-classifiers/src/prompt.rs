//! Prompt contract
//!
//! Renders the fixed system instruction that tells the inference service
//! exactly which JSON object to emit. The instruction is built once from a
//! [`TopicRegistry`] and reused for every query.

use crate::classifier::QueryType;
use crate::topics::{TopicRegistry, UNKNOWN_TOPIC};
use std::sync::Arc;

/// Fixed system instruction plus per-query user text
#[derive(Debug, Clone)]
pub struct PromptContract {
    system_instruction: Arc<str>,
    registry_version: u32,
}

impl PromptContract {
    /// Render the instruction for a registry
    pub fn new(registry: &TopicRegistry) -> Self {
        Self {
            system_instruction: render_instruction(registry).into(),
            registry_version: registry.version(),
        }
    }

    /// Split a query into `(system_instruction, user_text)`
    pub fn build<'a>(&'a self, query: &'a str) -> (&'a str, &'a str) {
        (&self.system_instruction, query)
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Registry version the instruction was rendered from
    pub fn registry_version(&self) -> u32 {
        self.registry_version
    }
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_instruction(registry: &TopicRegistry) -> String {
    let topics = quoted_list(registry.topics().iter().map(String::as_str));
    let types = quoted_list(QueryType::ALL.iter().map(QueryType::as_str));

    format!(
        r#"You are the classifier and tutor for a computer science and math study assistant.

Respond ONLY with a single JSON object. No markdown, no code fences, no text before or after it.
The object must have exactly these fields:
- "valid": boolean. Whether the query is in scope for the tutor.
- "reason": string or null. A short explanation when "valid" is false; null when "valid" is true.
- "topic": string or null. When "valid" is true, one of [{topics}] or "{unknown}". Null when "valid" is false.
- "type": string or null. When "valid" is true, one of [{types}]. Null when "valid" is false.
- "answer": string or null. The tutoring answer when "valid" is true; null when "valid" is false.
- "keywords": array of strings. A few short phrases summarizing the answer; [] when "answer" is null.

Decision rules:
1. Set "valid" to false ONLY when the query has no plausible connection to programming, computer science, or math.
2. Otherwise set "valid" to true and map the query to the nearest topic, even if the connection is indirect.
3. If no listed topic fits, set "topic" to "{unknown}".
4. When the topic is a listed topic, give a thorough, code-oriented answer with a short example.
5. When the topic is "{unknown}", give a concise, programming-focused answer.
6. When "valid" is false, "answer" must be null, "keywords" must be [], and "reason" must be a short string.

Use only the listed topic and type values, spelled exactly as shown."#,
        topics = topics,
        types = types,
        unknown = UNKNOWN_TOPIC,
    )
}
