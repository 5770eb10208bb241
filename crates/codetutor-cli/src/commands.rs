//! Subcommand handlers
//!
//! Each handler returns a JSON body and whether the command succeeded; the
//! binary prints the body and maps failure to a non-zero exit status.

use codetutor_classifiers::{
    classify_with_retry, CancellationToken, ErrorResult, RetryPolicy, TutorPipeline,
};
use codetutor_practice::ProblemRepository;
use serde_json::{json, Value};
use tracing::debug;

/// Rendered command result
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub body: Value,
    pub success: bool,
}

impl CommandOutput {
    fn ok(body: Value) -> Self {
        Self {
            body,
            success: true,
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            body: json!({ "error": message }),
            success: false,
        }
    }
}

/// Classify a query and render the result or typed error
pub async fn ask(
    pipeline: &TutorPipeline,
    query: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> CommandOutput {
    match classify_with_retry(pipeline, query, policy, cancel).await {
        Ok(result) => CommandOutput::ok(json!(result)),
        Err(err) => render_error(&err),
    }
}

fn render_error(err: &ErrorResult) -> CommandOutput {
    debug!("Rendering pipeline error: {}", err);
    CommandOutput {
        body: json!(err),
        success: false,
    }
}

/// Print the active topic registry
pub fn topics(pipeline: &TutorPipeline) -> CommandOutput {
    CommandOutput::ok(json!(pipeline.registry()))
}

/// Run the safety gate alone
pub fn check(pipeline: &TutorPipeline, query: &str) -> CommandOutput {
    CommandOutput::ok(json!({ "safe": pipeline.safety_gate().check(query) }))
}

pub fn list_problems(repo: &dyn ProblemRepository, topic: Option<&str>) -> CommandOutput {
    let problems: Vec<_> = match topic {
        Some(needle) => repo.filter_by_topic(needle),
        None => repo.list_problems().iter().collect(),
    };
    CommandOutput::ok(json!(problems))
}

pub fn show_problem(repo: &dyn ProblemRepository, id: &str) -> CommandOutput {
    match repo.get_problem(id) {
        Some(problem) => CommandOutput::ok(json!(problem)),
        None => CommandOutput::not_found("Problem not found"),
    }
}

pub fn show_scaffold(repo: &dyn ProblemRepository, id: &str, language: &str) -> CommandOutput {
    match repo.get_solution_scaffold(id, language) {
        Some(wrapper) => CommandOutput::ok(json!({ "wrapper": wrapper })),
        None => CommandOutput::not_found("Testcases not found"),
    }
}
