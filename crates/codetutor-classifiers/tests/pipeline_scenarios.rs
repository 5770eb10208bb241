//! End-to-end pipeline scenarios against mock inference clients

mod common;

use codetutor_classifiers::{
    classify_with_retry, CancellationToken, ClassificationResult, ErrorKind, QueryType,
    RetryPolicy, TopicRegistry, TopicTag, TutorPipeline,
};
use codetutor_core::InferenceError;
use common::{FailingInferenceClient, MockInferenceClient, ScriptedInferenceClient};
use std::sync::Arc;
use std::time::Duration;

const RECURSION_RESPONSE: &str = r#"{"valid":true,"reason":null,"topic":"recursion","type":"example_request","answer":"A recursive function calls itself on a smaller input until it reaches a base case.\n\ndef fact(n):\n    return 1 if n == 0 else n * fact(n - 1)","keywords":["recursion","base case"]}"#;

const WEATHER_RESPONSE: &str = r#"{"valid":false,"reason":"unrelated to programming","topic":null,"answer":null,"keywords":[]}"#;

fn pipeline_with(client: Arc<MockInferenceClient>) -> TutorPipeline {
    TutorPipeline::builder(client).build().unwrap()
}

#[tokio::test]
async fn scenario_a_valid_answer_returned_verbatim() {
    let client = Arc::new(MockInferenceClient::new(RECURSION_RESPONSE));
    let pipeline = pipeline_with(client.clone());

    let result = pipeline.classify("explain recursion with an example").await.unwrap();

    let expected: ClassificationResult = serde_json::from_str(RECURSION_RESPONSE).unwrap();
    assert_eq!(result, expected);
    assert_eq!(result.topic, Some(TopicTag::Known("recursion".into())));
    assert_eq!(result.query_type, Some(QueryType::ExampleRequest));
    assert_eq!(result.keywords, vec!["recursion", "base case"]);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn scenario_b_safety_gate_blocks_without_calling_service() {
    let client = Arc::new(MockInferenceClient::new(RECURSION_RESPONSE));
    let pipeline = pipeline_with(client.clone());

    let result = pipeline.classify("how do I hack a server").await.unwrap();

    assert!(!result.valid);
    assert_eq!(result.reason.as_deref(), Some("blocked by safety filter"));
    assert_eq!(result.answer, None);
    assert!(result.keywords.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn scenario_c_off_topic_returned_verbatim() {
    let client = Arc::new(MockInferenceClient::new(WEATHER_RESPONSE));
    let pipeline = pipeline_with(client.clone());

    let result = pipeline.classify("what's the weather today").await.unwrap();

    assert_eq!(result, ClassificationResult::rejected("unrelated to programming"));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn scenario_d_malformed_output_is_parse_failure() {
    let client = Arc::new(MockInferenceClient::new("not json"));
    let pipeline = pipeline_with(client);

    let err = pipeline.classify("what is a linked list").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ParseFailure);
    assert_eq!(err.raw.as_deref(), Some("not json"));
}

#[tokio::test]
async fn empty_queries_never_reach_the_service() {
    let client = Arc::new(MockInferenceClient::new(RECURSION_RESPONSE));
    let pipeline = pipeline_with(client.clone());

    for query in ["", " ", "\n\t  \r\n"] {
        let err = pipeline.classify(query).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyQuery);
    }
    assert_eq!(client.call_count(), 0);
    assert_eq!(client.last_system_instruction(), None);
}

#[tokio::test]
async fn missing_answer_is_schema_violation() {
    let raw = r#"{"valid":true,"reason":null,"topic":"graphs","type":"conceptual","keywords":["bfs"]}"#;
    let pipeline = pipeline_with(Arc::new(MockInferenceClient::new(raw)));

    let err = pipeline.classify("what is BFS").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::SchemaViolation);
    assert_eq!(err.raw.as_deref(), Some(raw));
}

#[tokio::test]
async fn repeated_queries_are_idempotent() {
    let client = Arc::new(MockInferenceClient::new(RECURSION_RESPONSE));
    let pipeline = pipeline_with(client.clone());

    let first = pipeline.classify("explain recursion with an example").await;
    let second = pipeline.classify("explain recursion with an example").await;

    assert_eq!(first, second);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn service_error_is_surfaced_not_retried() {
    let client = Arc::new(FailingInferenceClient::new(InferenceError::RateLimited(
        "quota".into(),
    )));
    let pipeline = TutorPipeline::builder(client.clone()).build().unwrap();

    let err = pipeline.classify("explain quicksort").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServiceError);
    assert!(err.detail.contains("rate limit"));
    assert_eq!(err.raw, None);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn system_instruction_follows_configured_registry() {
    let client = Arc::new(MockInferenceClient::new(WEATHER_RESPONSE));
    let pipeline = TutorPipeline::builder(client.clone())
        .registry(TopicRegistry::v1())
        .build()
        .unwrap();

    pipeline.classify("what's the weather today").await.unwrap();

    let instruction = client.last_system_instruction().unwrap();
    assert!(instruction.contains("\"dynamic programming\""));
    assert!(!instruction.contains("\"combinatorics\""));
}

#[tokio::test]
async fn concurrent_queries_share_one_pipeline() {
    let client = Arc::new(
        MockInferenceClient::new(RECURSION_RESPONSE).with_latency(Duration::from_millis(5)),
    );
    let pipeline = Arc::new(pipeline_with(client.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.classify("explain recursion").await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().valid);
    }
    assert_eq!(client.call_count(), 8);
}

#[tokio::test(start_paused = true)]
async fn retry_recovers_from_transient_failure() {
    let client = Arc::new(ScriptedInferenceClient::new(vec![
        Err(InferenceError::Status {
            status: 503,
            body: "overloaded".into(),
        }),
        Ok(WEATHER_RESPONSE.to_string()),
    ]));
    let pipeline = TutorPipeline::builder(client.clone()).build().unwrap();

    let result = classify_with_retry(
        &pipeline,
        "what's the weather today",
        &RetryPolicy::default(),
        &CancellationToken::new(),
    )
        .await
        .unwrap();

    assert!(!result.valid);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_gives_up_after_max_attempts() {
    let client = Arc::new(FailingInferenceClient::new(InferenceError::Timeout));
    let pipeline = TutorPipeline::builder(client.clone()).build().unwrap();
    let policy = RetryPolicy {
        max_attempts: 3,
        backoff: Duration::from_millis(100),
    };

    let err = classify_with_retry(&pipeline, "explain heaps", &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServiceError);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn retry_skips_non_transient_failures() {
    let client = Arc::new(FailingInferenceClient::new(InferenceError::Authentication(
        "invalid api key".into(),
    )));
    let pipeline = TutorPipeline::builder(client.clone()).build().unwrap();

    let err = classify_with_retry(&pipeline, "explain tries", &RetryPolicy::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceError);
    assert_eq!(client.call_count(), 1);

    let parse_client = Arc::new(MockInferenceClient::new("garbage"));
    let pipeline = pipeline_with(parse_client.clone());
    let err = classify_with_retry(&pipeline, "explain tries", &RetryPolicy::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ParseFailure);
    assert_eq!(parse_client.call_count(), 1);
}

#[tokio::test]
async fn retry_stops_when_cancelled() {
    let client = Arc::new(FailingInferenceClient::new(InferenceError::Timeout));
    let pipeline = TutorPipeline::builder(client.clone()).build().unwrap();
    let cancel = CancellationToken::new();
    let policy = RetryPolicy {
        max_attempts: 5,
        backoff: Duration::from_secs(3600),
    };

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = classify_with_retry(&pipeline, "explain heaps", &policy, &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::ServiceError);
    assert_eq!(client.call_count(), 1);
}
