// ABOUTME: Test utilities for floe-assist, including stub text providers.
// ABOUTME: Used in tests to simulate provider behavior without real API calls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::provider::{CompletionRequest, ProviderError, TextProvider};

enum Behavior {
    Text(String),
    Sequence(Mutex<VecDeque<String>>),
    Failing,
    RateLimited,
    Hanging,
    Panicking,
}

/// A stub provider with scripted behavior.
///
/// Drives the gateway and task adapters in tests without network access.
/// `calls()` reports how many attempts reached the stub, which lets tests
/// assert that short-circuit paths (disabled gateway, DOI queries, local
/// guards) issue zero provider calls.
pub struct StubProvider {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubProvider {
    /// Always succeed with the given text.
    pub fn with_text(name: &str, text: &str) -> Self {
        Self::new(name, Behavior::Text(text.to_string()))
    }

    /// Return each response once, in order; fail once the script runs out.
    pub fn with_responses<I, S>(name: &str, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = responses.into_iter().map(Into::into).collect();
        Self::new(name, Behavior::Sequence(Mutex::new(queue)))
    }

    /// Always fail with a transport error.
    pub fn failing(name: &str) -> Self {
        Self::new(name, Behavior::Failing)
    }

    /// Always respond with a rate-limit error.
    pub fn rate_limited(name: &str) -> Self {
        Self::new(name, Behavior::RateLimited)
    }

    /// Never complete; the caller's timeout must fire.
    pub fn hanging(name: &str) -> Self {
        Self::new(name, Behavior::Hanging)
    }

    /// Panic if invoked at all. For asserting no-provider-call paths.
    pub fn panicking(name: &str) -> Self {
        Self::new(name, Behavior::Panicking)
    }

    fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of attempts that reached this stub.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for StubProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            Behavior::Text(text) => Ok(text.clone()),
            Behavior::Sequence(queue) => {
                let next = queue.lock().unwrap().pop_front();
                next.ok_or_else(|| ProviderError::Transport("script exhausted".to_string()))
            }
            Behavior::Failing => Err(ProviderError::Transport("stub failure".to_string())),
            Behavior::RateLimited => Err(ProviderError::RateLimited),
            Behavior::Hanging => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Behavior::Panicking => panic!("provider {} must not be called", self.name),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::new("prompt", 100, 0.2)
    }

    #[tokio::test]
    async fn text_stub_returns_configured_output() {
        let stub = StubProvider::with_text("stub", "hello");
        assert_eq!(stub.complete(&request()).await.unwrap(), "hello");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn sequence_stub_plays_script_then_fails() {
        let stub = StubProvider::with_responses("stub", ["one", "two"]);
        assert_eq!(stub.complete(&request()).await.unwrap(), "one");
        assert_eq!(stub.complete(&request()).await.unwrap(), "two");
        assert!(stub.complete(&request()).await.is_err());
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn failing_stub_reports_transport_error() {
        let stub = StubProvider::failing("stub");
        assert!(matches!(
            stub.complete(&request()).await.unwrap_err(),
            ProviderError::Transport(_)
        ));
    }

    #[tokio::test]
    async fn rate_limited_stub_reports_rate_limit() {
        let stub = StubProvider::rate_limited("stub");
        assert!(matches!(
            stub.complete(&request()).await.unwrap_err(),
            ProviderError::RateLimited
        ));
    }
}
