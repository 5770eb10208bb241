//! Classification pipeline
//!
//! Sequences the safety gate, prompt contract, inference call and response
//! validator for one query:
//!
//! ```text
//! Received -> SafetyChecked -> Prompted -> Invoked -> Validated -> Done
//! ```
//!
//! An empty query or a safety-gate rejection jumps from `Received` straight to
//! `Done`, as does an inference failure from `Prompted`. No state survives
//! between queries, so one pipeline can serve concurrent callers.

use crate::classifier::{ClassificationResult, ErrorResult};
use crate::config::PipelineConfig;
use crate::prompt::PromptContract;
use crate::safety::{SafetyGate, BLOCKED_REASON};
use crate::topics::TopicRegistry;
use crate::validator::ResponseValidator;
use codetutor_core::{InferenceClient, InferenceError, InferenceParams, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default deadline for one inference call
pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Stage reached by a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    SafetyChecked,
    Prompted,
    Invoked,
    Validated,
    Done,
}

/// Complete record of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Correlation id used in logs
    pub request_id: Uuid,

    /// States visited, in order, ending with `Done`
    pub states: Vec<PipelineState>,

    /// Final result
    pub outcome: std::result::Result<ClassificationResult, ErrorResult>,

    /// Wall time of the run
    pub latency: Duration,
}

impl PipelineRun {
    /// Whether the run reached the inference service
    pub fn invoked_service(&self) -> bool {
        self.states.contains(&PipelineState::Prompted)
    }
}

/// Query classification and answer pipeline
#[derive(Clone)]
pub struct TutorPipeline {
    gate: SafetyGate,
    registry: Arc<TopicRegistry>,
    contract: PromptContract,
    validator: ResponseValidator,
    client: Arc<dyn InferenceClient>,
    params: InferenceParams,
    timeout: Duration,
}

impl TutorPipeline {
    /// Start building a pipeline around an inference client
    pub fn builder(client: Arc<dyn InferenceClient>) -> PipelineBuilder {
        PipelineBuilder::new(client)
    }

    /// Build a pipeline from configuration
    pub fn from_config(config: &PipelineConfig, client: Arc<dyn InferenceClient>) -> Result<Self> {
        config.validate()?;

        PipelineBuilder::new(client)
            .registry(TopicRegistry::for_version(config.topics.version)?)
            .safety_gate(SafetyGate::new(&config.safety.deny_list)?)
            .params(config.inference.params())
            .timeout(config.inference.timeout())
            .build()
    }

    /// Classify and answer a query
    pub async fn classify(&self, query: &str) -> std::result::Result<ClassificationResult, ErrorResult> {
        self.run(query, &CancellationToken::new()).await.outcome
    }

    /// Classify a query, abandoning the inference call if `cancel` fires
    pub async fn classify_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<ClassificationResult, ErrorResult> {
        self.run(query, cancel).await.outcome
    }

    /// Run the pipeline and return the full run record
    pub async fn run(&self, query: &str, cancel: &CancellationToken) -> PipelineRun {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        let mut states = vec![PipelineState::Received];

        let outcome = self.execute(query, cancel, request_id, &mut states).await;
        advance(&mut states, PipelineState::Done, request_id);

        let latency = start.elapsed();
        let label = match &outcome {
            Ok(result) => result.outcome_label(),
            Err(err) => err.kind.as_str(),
        };
        metrics::counter!("codetutor_classifications_total", "outcome" => label).increment(1);

        match &outcome {
            Ok(result) => info!(
                %request_id,
                outcome = label,
                topic = result.topic.as_ref().map(|t| t.as_str()),
                ?latency,
                "Classification complete"
            ),
            Err(err) => warn!(%request_id, outcome = label, detail = %err.detail, ?latency, "Classification failed"),
        }

        PipelineRun {
            request_id,
            states,
            outcome,
            latency,
        }
    }

    async fn execute(
        &self,
        query: &str,
        cancel: &CancellationToken,
        request_id: Uuid,
        states: &mut Vec<PipelineState>,
    ) -> std::result::Result<ClassificationResult, ErrorResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ErrorResult::empty_query());
        }

        if let Some(term) = self.gate.find_match(query) {
            info!(%request_id, term, "Query blocked by safety gate");
            return Ok(ClassificationResult::rejected(BLOCKED_REASON));
        }
        advance(states, PipelineState::SafetyChecked, request_id);

        let (system_instruction, user_text) = self.contract.build(query);
        advance(states, PipelineState::Prompted, request_id);

        let raw = self
            .invoke(system_instruction, user_text, cancel)
            .await
            .map_err(ErrorResult::service)?;
        advance(states, PipelineState::Invoked, request_id);

        let result = self.validator.validate(&raw);
        advance(states, PipelineState::Validated, request_id);

        result
    }

    async fn invoke(
        &self,
        system_instruction: &str,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<String, InferenceError> {
        let start = Instant::now();
        let call = tokio::time::timeout(
            self.timeout,
            self.client.invoke(system_instruction, user_text, self.params),
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(InferenceError::Cancelled),
            res = call => res.unwrap_or(Err(InferenceError::Timeout)),
        };

        metrics::histogram!("codetutor_inference_latency_us", "client" => self.client.name().to_string())
            .record(start.elapsed().as_micros() as f64);

        result
    }

    /// Active topic registry
    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    pub fn safety_gate(&self) -> &SafetyGate {
        &self.gate
    }

    pub fn contract(&self) -> &PromptContract {
        &self.contract
    }
}

fn advance(states: &mut Vec<PipelineState>, state: PipelineState, request_id: Uuid) {
    debug!(%request_id, ?state, "Pipeline transition");
    states.push(state);
}

/// Builder for [`TutorPipeline`]
pub struct PipelineBuilder {
    client: Arc<dyn InferenceClient>,
    registry: Option<TopicRegistry>,
    gate: Option<SafetyGate>,
    params: InferenceParams,
    timeout: Duration,
}

impl PipelineBuilder {
    /// Create a builder with default registry, deny-list and parameters
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self {
            client,
            registry: None,
            gate: None,
            params: InferenceParams::default(),
            timeout: DEFAULT_INFERENCE_TIMEOUT,
        }
    }

    pub fn registry(mut self, registry: TopicRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn safety_gate(mut self, gate: SafetyGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn params(mut self, params: InferenceParams) -> Self {
        self.params = params;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<TutorPipeline> {
        let registry = Arc::new(self.registry.unwrap_or_default());
        let gate = match self.gate {
            Some(gate) => gate,
            None => SafetyGate::with_default_terms()?,
        };

        debug!(
            "Building pipeline: registry v{}, {} deny-list terms, client {}",
            registry.version(),
            gate.terms().len(),
            self.client.name()
        );

        Ok(TutorPipeline {
            gate,
            contract: PromptContract::new(&registry),
            validator: ResponseValidator::new(Arc::clone(&registry)),
            registry,
            client: self.client,
            params: self.params,
            timeout: self.timeout,
        })
    }
}
