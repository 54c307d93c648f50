//! Deterministic mock implementation of the shared `chat_provider` contract.
//!
//! This crate contains no transport/protocol logic and is intended for local
//! development and contract-level integration testing.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chat_provider::{
    CompletionError, CompletionProvider, CompletionReply, CompletionRequest, ProviderProfile,
};
use serde_json::{json, Value};

/// Stable provider identifier used for explicit startup selection.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// Reply used when no scripted outcome is queued.
pub const PREVIEW_REPLY: &str =
    "The chat server is not connected yet. For now this is a preview of the interface.";

/// Delay applied by [`MockProvider::preview`], in the spirit of a slow network.
pub const PREVIEW_DELAY: Duration = Duration::from_millis(900);

/// One scripted result for a single `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// 2xx response with this JSON body.
    Reply(Value),
    /// Non-2xx response.
    Status { status: u16, detail: String },
    /// 2xx response with `ok: false`.
    Rejected { detail: Option<String> },
    /// Network failure.
    Transport(String),
    /// The provider panics mid-call.
    Panic(String),
}

impl MockOutcome {
    /// Chat-completions shaped reply carrying `text`.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Reply(json!({
            "choices": [{"message": {"role": "assistant", "content": text.into()}}]
        }))
    }
}

/// Releases calls parked on a gated [`MockProvider`].
///
/// Each `release` lets exactly one call proceed. Dropping the gate releases
/// every call that is parked or arrives later.
#[derive(Debug, Clone)]
pub struct MockGate {
    permits: Sender<()>,
}

impl MockGate {
    pub fn release(&self) {
        let _ = self.permits.send(());
    }
}

/// Deterministic mock provider used by `chat_app` tests and local runs.
#[derive(Debug)]
pub struct MockProvider {
    model_id: String,
    script: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    delay: Duration,
    gate: Option<Mutex<Receiver<()>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Creates a mock provider that answers every call with the preview reply.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model_id: "mock".to_string(),
            script: Mutex::new(VecDeque::new()),
            fallback: MockOutcome::text(PREVIEW_REPLY),
            delay: Duration::ZERO,
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Preview-mode provider for interactive runs without a server.
    #[must_use]
    pub fn preview() -> Self {
        Self::new().with_delay(PREVIEW_DELAY)
    }

    /// Creates a provider that answers with `outcomes` in order, then the preview reply.
    #[must_use]
    pub fn scripted(outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        let provider = Self::new();
        lock_unpoisoned(&provider.script).extend(outcomes);
        provider
    }

    /// Makes every call wait for a [`MockGate::release`] before answering.
    #[must_use]
    pub fn gated(mut self) -> (Self, MockGate) {
        let (permits, receiver) = mpsc::channel();
        self.gate = Some(Mutex::new(receiver));
        (self, MockGate { permits })
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        let model_id = model_id.into();
        let trimmed = model_id.trim();
        if !trimmed.is_empty() {
            self.model_id = trimmed.to_string();
        }
        self
    }

    /// Queues another scripted outcome.
    pub fn push(&self, outcome: MockOutcome) {
        lock_unpoisoned(&self.script).push_back(outcome);
    }

    /// Requests observed so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock_unpoisoned(&self.requests).clone()
    }

    fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            // A dropped gate means every remaining call may proceed.
            let _ = lock_unpoisoned(gate).recv();
        }
    }

    fn next_outcome(&self) -> MockOutcome {
        lock_unpoisoned(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionProvider for MockProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: self.model_id.clone(),
        }
    }

    fn complete(&self, request: CompletionRequest) -> Result<CompletionReply, CompletionError> {
        lock_unpoisoned(&self.requests).push(request);

        self.wait_for_gate();
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match self.next_outcome() {
            MockOutcome::Reply(body) => Ok(CompletionReply::new(body)),
            MockOutcome::Status { status, detail } => {
                Err(CompletionError::Status { status, detail })
            }
            MockOutcome::Rejected { detail } => Err(CompletionError::Rejected { detail }),
            MockOutcome::Transport(message) => Err(CompletionError::Transport(message)),
            MockOutcome::Panic(message) => panic!("{message}"),
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use chat_provider::WireMessage;

    use super::*;

    fn request(request_id: u64, text: &str) -> CompletionRequest {
        CompletionRequest {
            request_id,
            model: "mock".to_string(),
            messages: vec![WireMessage::system("sys"), WireMessage::user(text)],
        }
    }

    #[test]
    fn profile_exposes_explicit_mock_provider_identity() {
        let profile = MockProvider::new().profile();

        assert_eq!(profile.provider_id, MOCK_PROVIDER_ID);
        assert_eq!(profile.model_id, "mock");
        assert_eq!(
            MockProvider::new().with_model("  ").profile().model_id,
            "mock"
        );
    }

    #[test]
    fn unscripted_calls_answer_with_preview_reply() {
        let provider = MockProvider::new();

        let reply = provider.complete(request(1, "hi")).expect("preview reply");

        assert_eq!(reply.body["choices"][0]["message"]["content"], PREVIEW_REPLY);
    }

    #[test]
    fn scripted_outcomes_are_consumed_in_order() {
        let provider = MockProvider::scripted([
            MockOutcome::text("first"),
            MockOutcome::Status {
                status: 500,
                detail: "boom".to_string(),
            },
            MockOutcome::Rejected {
                detail: Some("quota exceeded".to_string()),
            },
            MockOutcome::Transport("connection refused".to_string()),
        ]);

        let first = provider.complete(request(1, "a")).expect("first reply");
        assert_eq!(first.body["choices"][0]["message"]["content"], "first");
        assert_matches!(
            provider.complete(request(2, "b")),
            Err(CompletionError::Status { status: 500, .. })
        );
        assert_matches!(
            provider.complete(request(3, "c")),
            Err(CompletionError::Rejected { detail: Some(detail) }) if detail == "quota exceeded"
        );
        assert_matches!(
            provider.complete(request(4, "d")),
            Err(CompletionError::Transport(_))
        );
        assert!(provider.complete(request(5, "e")).is_ok());

        let observed: Vec<u64> = provider
            .requests()
            .iter()
            .map(|request| request.request_id)
            .collect();
        assert_eq!(observed, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn gated_call_waits_for_release() {
        let (provider, gate) = MockProvider::gated(MockProvider::new());
        let provider = Arc::new(provider);

        let worker = {
            let provider = Arc::clone(&provider);
            thread::spawn(move || provider.complete(request(1, "held")))
        };

        thread::sleep(Duration::from_millis(20));
        assert!(!worker.is_finished());
        assert_eq!(provider.requests().len(), 1);

        gate.release();
        let reply = worker.join().expect("worker thread");
        assert!(reply.is_ok());
    }

    #[test]
    fn dropped_gate_releases_parked_calls() {
        let (provider, gate) = MockProvider::new().gated();
        drop(gate);

        assert!(provider.complete(request(1, "free")).is_ok());
    }

    #[test]
    #[should_panic(expected = "scripted panic")]
    fn panic_outcome_panics() {
        let provider = MockProvider::scripted([MockOutcome::Panic("scripted panic".to_string())]);
        let _ = provider.complete(request(1, "x"));
    }
}
