//! Mock inference clients for testing
//!
//! Configurable implementations of the `InferenceClient` trait for exercising
//! the pipeline, its error paths, and caller-side retry.

#![allow(dead_code)]

use async_trait::async_trait;
use codetutor_core::{InferenceClient, InferenceError, InferenceParams};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Returns the same text for every request and counts calls
pub struct MockInferenceClient {
    response: String,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
    last_system_instruction: Mutex<Option<String>>,
}

impl MockInferenceClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            simulated_latency: None,
            call_count: AtomicU32::new(0),
            last_system_instruction: Mutex::new(None),
        }
    }

    /// Set simulated latency for each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Get the number of times invoke was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// System instruction seen by the most recent call
    pub fn last_system_instruction(&self) -> Option<String> {
        self.last_system_instruction.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn invoke(
        &self,
        system_instruction: &str,
        _user_text: &str,
        _params: InferenceParams,
    ) -> Result<String, InferenceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_system_instruction.lock().unwrap() = Some(system_instruction.to_string());

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Always fails with the configured error
pub struct FailingInferenceClient {
    error: InferenceError,
    call_count: AtomicU32,
}

impl FailingInferenceClient {
    pub fn new(error: InferenceError) -> Self {
        Self {
            error,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InferenceClient for FailingInferenceClient {
    async fn invoke(
        &self,
        _system_instruction: &str,
        _user_text: &str,
        _params: InferenceParams,
    ) -> Result<String, InferenceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Replays a scripted sequence of outcomes, then repeats the last one
pub struct ScriptedInferenceClient {
    script: Mutex<VecDeque<Result<String, InferenceError>>>,
    call_count: AtomicU32,
}

impl ScriptedInferenceClient {
    pub fn new(script: Vec<Result<String, InferenceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InferenceClient for ScriptedInferenceClient {
    async fn invoke(
        &self,
        _system_instruction: &str,
        _user_text: &str,
        _params: InferenceParams,
    ) -> Result<String, InferenceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or(Err(InferenceError::Transport("empty script".into())))
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
