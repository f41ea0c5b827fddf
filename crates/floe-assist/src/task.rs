// ABOUTME: The generic task adapter: one runner wiring prompt, gateway, extraction, validation.
// ABOUTME: Every task definition is data for this runner; failure behavior is uniform across all eleven.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::gateway::{GatewayError, ProviderGateway};
use crate::provider::CompletionRequest;
use crate::validate::{Diagnostic, has_errors};

/// The closed set of assistance capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Classify,
    Keywords,
    AbstractQuality,
    SpatialExtract,
    Prefill,
    ReviewerNotes,
    TitleDraft,
    PurposeDraft,
    ResolutionHint,
    QueryParse,
    CorpusAnswer,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Classify => "classify",
            TaskKind::Keywords => "keywords",
            TaskKind::AbstractQuality => "abstract_quality",
            TaskKind::SpatialExtract => "spatial_extract",
            TaskKind::Prefill => "prefill",
            TaskKind::ReviewerNotes => "reviewer_notes",
            TaskKind::TitleDraft => "title_draft",
            TaskKind::PurposeDraft => "purpose_draft",
            TaskKind::ResolutionHint => "resolution_hint",
            TaskKind::QueryParse => "query_parse",
            TaskKind::CorpusAnswer => "corpus_answer",
        }
    }
}

/// Terminal status of one assistance invocation. Callers must handle all
/// four; Disabled and Failed leave the manual workflow fully usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Degraded,
    Disabled,
    Failed,
}

/// What one invocation produced. Immutable once constructed; retries build
/// new results, they never mutate an old one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistanceResult<T> {
    pub outcome: Outcome,
    pub output: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
    pub provider: Option<String>,
    pub elapsed: Duration,
    pub correlation_id: Ulid,
}

impl<T> AssistanceResult<T> {
    /// True when the caller has a typed output to use.
    pub fn is_usable(&self) -> bool {
        matches!(self.outcome, Outcome::Success | Outcome::Degraded)
    }
}

/// Result of the parse-and-validate stage: a typed output when every
/// required field held, plus whatever diagnostics were collected.
#[derive(Debug)]
pub struct Interpreted<T> {
    pub output: Option<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Interpreted<T> {
    pub fn ok(output: T) -> Self {
        Self {
            output: Some(output),
            diagnostics: Vec::new(),
        }
    }

    pub fn ok_with(output: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            output: Some(output),
            diagnostics,
        }
    }

    /// No candidate structure could be extracted at all.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            output: None,
            diagnostics: vec![Diagnostic::error("response", message)],
        }
    }

    /// Structure extracted, but a required constraint failed.
    pub fn invalid(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            output: None,
            diagnostics,
        }
    }
}

/// One assistance capability: input and output schemas, a prompt template,
/// and the parse-and-validate stage. Implementations carry no state; the
/// shared `Assistant` runner provides the uniform pipeline.
pub trait AssistTask {
    const KIND: TaskKind;

    type Input: Sync;
    type Output;

    /// Local pre-check on the input. A diagnostic here fails the invocation
    /// before any provider work (e.g. an abstract too short to work with).
    fn guard(_input: &Self::Input) -> Option<Diagnostic> {
        None
    }

    /// Build the provider request for this input. Pure.
    fn prompt(input: &Self::Input) -> CompletionRequest;

    /// Parse raw provider output and enforce this task's ruleset.
    /// `output` must be None whenever a required field fails validation.
    fn interpret(input: &Self::Input, raw: &str) -> Interpreted<Self::Output>;
}

/// Uniform entry point for all assistance tasks.
///
/// Holds the immutable gateway; invocations are independent and may run
/// concurrently without coordination.
#[derive(Clone)]
pub struct Assistant {
    gateway: Arc<ProviderGateway>,
}

impl Assistant {
    pub fn new(gateway: Arc<ProviderGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &ProviderGateway {
        &self.gateway
    }

    /// Run one task invocation end to end. Never panics and never returns
    /// an error; every path lands in one of the four outcomes.
    pub async fn run<T: AssistTask>(&self, input: &T::Input) -> AssistanceResult<T::Output> {
        let correlation_id = Ulid::new();
        let started = Instant::now();
        let task = T::KIND.name();
        tracing::debug!(task, %correlation_id, "assistance invocation started");

        if self.gateway.is_disabled() {
            return finish::<T::Output>(Outcome::Disabled, None, Vec::new(), None, started, correlation_id);
        }

        if let Some(diagnostic) = T::guard(input) {
            tracing::debug!(task, %correlation_id, field = %diagnostic.field, "input rejected before provider call");
            return finish::<T::Output>(Outcome::Failed, None, vec![diagnostic], None, started, correlation_id);
        }

        let request = T::prompt(input);

        let completion = match self.gateway.generate(&request).await {
            Ok(completion) => completion,
            Err(GatewayError::Disabled) => {
                return finish::<T::Output>(Outcome::Disabled, None, Vec::new(), None, started, correlation_id);
            }
            Err(GatewayError::AllProvidersFailed(failures)) => {
                let diagnostics = failures
                    .iter()
                    .map(|f| Diagnostic::error("provider", format!("{}: {}", f.provider, f.error)))
                    .collect();
                tracing::warn!(task, %correlation_id, "all providers failed");
                return finish::<T::Output>(Outcome::Failed, None, diagnostics, None, started, correlation_id);
            }
        };

        let interpreted = T::interpret(input, &completion.text);
        let provider = Some(completion.provider.clone());

        // A parse/validate failure is never retried against the same raw
        // output; a retry means a fresh invocation.
        let (outcome, output) = match interpreted.output {
            Some(output) if !has_errors(&interpreted.diagnostics) => {
                let outcome = if completion.degraded {
                    Outcome::Degraded
                } else {
                    Outcome::Success
                };
                (outcome, Some(output))
            }
            _ => (Outcome::Failed, None),
        };

        finish::<T::Output>(outcome, output, interpreted.diagnostics, provider, started, correlation_id)
    }
}

fn finish<T>(
    outcome: Outcome,
    output: Option<T>,
    diagnostics: Vec<Diagnostic>,
    provider: Option<String>,
    started: Instant,
    correlation_id: Ulid,
) -> AssistanceResult<T> {
    let elapsed = started.elapsed();
    tracing::debug!(
        %correlation_id,
        outcome = ?outcome,
        diagnostics = diagnostics.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "assistance invocation finished"
    );
    AssistanceResult {
        outcome,
        output,
        diagnostics,
        provider,
        elapsed,
        correlation_id,
    }
}
