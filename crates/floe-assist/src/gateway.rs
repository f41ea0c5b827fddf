// ABOUTME: Provider gateway: ordered fallback across configured providers with bounded retries.
// ABOUTME: Every call terminates within providers x (max_retries+1) x timeout, even if providers hang.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::AssistConfig;
use crate::provider::{ChatCompletionsProvider, CompletionRequest, ProviderError, TextProvider};

const BACKOFF_BASE: Duration = Duration::from_millis(100);
const BACKOFF_CAP: Duration = Duration::from_secs(1);

/// Whether any provider is configured. Decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Disabled,
    Available,
}

/// A recorded failure from one provider attempt.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

/// Terminal gateway failures. `Disabled` is an expected state, not an
/// incident; `AllProvidersFailed` carries every recorded attempt.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no text-generation provider is configured")]
    Disabled,

    #[error("all providers failed ({} attempts)", .0.len())]
    AllProvidersFailed(Vec<ProviderFailure>),
}

/// Raw provider output plus attribution. `degraded` is set when the text
/// came from a provider other than the top-priority one.
#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub text: String,
    pub provider: String,
    pub degraded: bool,
}

/// One provider in the chain with its retry budget.
pub struct ProviderSlot {
    pub provider: Arc<dyn TextProvider>,
    pub timeout: Duration,
    pub max_retries: u32,
}

/// Ordered provider chain. Immutable after construction; concurrent calls
/// share it without coordination.
pub struct ProviderGateway {
    slots: Vec<ProviderSlot>,
}

impl ProviderGateway {
    pub fn new(slots: Vec<ProviderSlot>) -> Self {
        Self { slots }
    }

    /// Build the gateway from configuration, one HTTP adapter per provider.
    pub fn from_config(config: &AssistConfig) -> Self {
        let slots = config
            .providers
            .iter()
            .map(|p| ProviderSlot {
                provider: Arc::new(ChatCompletionsProvider::new(p)) as Arc<dyn TextProvider>,
                timeout: p.timeout,
                max_retries: p.max_retries,
            })
            .collect();
        Self::new(slots)
    }

    pub fn state(&self) -> GatewayState {
        if self.slots.is_empty() {
            GatewayState::Disabled
        } else {
            GatewayState::Available
        }
    }

    /// Cheap synchronous check; callers use this to skip work entirely
    /// when no provider exists.
    pub fn is_disabled(&self) -> bool {
        self.slots.is_empty()
    }

    /// Provider names in priority order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.provider.name()).collect()
    }

    /// Hard upper bound on a single `generate` call.
    pub fn worst_case_budget(&self) -> Duration {
        self.slots
            .iter()
            .map(|s| s.timeout * (s.max_retries + 1))
            .sum()
    }

    /// Obtain one raw completion, walking the provider chain in priority
    /// order. Per attempt: a hard timeout. Per provider: at most
    /// `max_retries` extra attempts with bounded exponential backoff; a
    /// rate-limit response skips straight to the next provider. The whole
    /// call is capped at `worst_case_budget`, so a misbehaving provider
    /// cannot stretch it.
    pub async fn generate(&self, request: &CompletionRequest) -> Result<RawCompletion, GatewayError> {
        if self.slots.is_empty() {
            return Err(GatewayError::Disabled);
        }

        let mut failures: Vec<ProviderFailure> = Vec::new();

        let chain = async {
            for (rank, slot) in self.slots.iter().enumerate() {
                let name = slot.provider.name().to_string();

                for attempt in 0..=slot.max_retries {
                    if attempt > 0 {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }

                    match tokio::time::timeout(slot.timeout, slot.provider.complete(request)).await
                    {
                        Ok(Ok(text)) => {
                            if rank > 0 {
                                tracing::info!(
                                    provider = %name,
                                    rank,
                                    "completion obtained via fallback provider"
                                );
                            }
                            return Some(RawCompletion {
                                text,
                                provider: name,
                                degraded: rank > 0,
                            });
                        }
                        Ok(Err(error)) => {
                            tracing::warn!(provider = %name, attempt, error = %error, "provider attempt failed");
                            let rate_limited = matches!(error, ProviderError::RateLimited);
                            failures.push(ProviderFailure {
                                provider: name.clone(),
                                error,
                            });
                            if rate_limited {
                                // Retrying a rate-limited provider immediately
                                // just burns the budget; move down the chain.
                                break;
                            }
                        }
                        Err(_) => {
                            tracing::warn!(provider = %name, attempt, "provider attempt timed out");
                            failures.push(ProviderFailure {
                                provider: name.clone(),
                                error: ProviderError::Timeout,
                            });
                        }
                    }
                }
            }
            None
        };

        // Bind before matching so the chain future (and its borrow of
        // `failures`) is dropped here.
        let outcome = tokio::time::timeout(self.worst_case_budget(), chain).await;

        match outcome {
            Ok(Some(completion)) => Ok(completion),
            Ok(None) => {
                tracing::error!(attempts = failures.len(), "all providers failed");
                Err(GatewayError::AllProvidersFailed(failures))
            }
            Err(_) => {
                failures.push(ProviderFailure {
                    provider: "gateway".to_string(),
                    error: ProviderError::Timeout,
                });
                tracing::error!("call budget exhausted before any provider succeeded");
                Err(GatewayError::AllProvidersFailed(failures))
            }
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let scaled = BACKOFF_BASE.saturating_mul(1u32 << attempt.min(4));
    scaled.min(BACKOFF_CAP)
}
