//! Pipeline configuration

use crate::retry::RetryPolicy;
use crate::safety::DEFAULT_DENY_LIST;
use crate::topics::DEFAULT_REGISTRY_VERSION;
use codetutor_core::{Error, InferenceParams, OpenAiSettings, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the classification pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Inference service connection and sampling
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Safety gate deny-list
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Topic registry selection
    #[serde(default)]
    pub topics: TopicsConfig,

    /// Caller-side retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let inference = &self.inference;

        if !(0.0..=2.0).contains(&inference.temperature) {
            return Err(Error::config(format!(
                "inference.temperature must be within [0, 2], got {}",
                inference.temperature
            )));
        }
        if inference.max_output_tokens == 0 {
            return Err(Error::config("inference.max_output_tokens must be positive"));
        }
        if inference.timeout_secs == 0 {
            return Err(Error::config("inference.timeout_secs must be positive"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be at least 1"));
        }
        crate::topics::TopicRegistry::for_version(self.topics.version)?;

        Ok(())
    }
}

/// Inference service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// OpenAI-compatible API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Deadline for one inference call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl InferenceConfig {
    pub fn params(&self) -> InferenceParams {
        InferenceParams {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client settings, reading the API key from the environment
    pub fn client_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty()),
            timeout: self.timeout(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Safety gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default = "default_deny_list")]
    pub deny_list: Vec<String>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            deny_list: default_deny_list(),
        }
    }
}

/// Topic registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsConfig {
    #[serde(default = "default_registry_version")]
    pub version: u32,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            version: default_registry_version(),
        }
    }
}

/// Caller-side retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    800
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_deny_list() -> Vec<String> {
    DEFAULT_DENY_LIST.iter().map(|t| t.to_string()).collect()
}

fn default_registry_version() -> u32 {
    DEFAULT_REGISTRY_VERSION
}

fn default_max_attempts() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    250
}
