use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chat_provider::{
    CompletionError, CompletionProvider, CompletionReply, CompletionRequest, RequestId,
    WireMessage,
};

use crate::app::{ChatSession, HostOps};

const ERROR_REQUEST_IN_FLIGHT: &str = "Request already in flight";

/// Result of one worker, queued until the session owner applies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub request_id: RequestId,
    pub outcome: Result<CompletionReply, CompletionError>,
}

struct ActiveRequest {
    request_id: RequestId,
    join_handle: Option<JoinHandle<()>>,
}

type Notify = Box<dyn Fn() + Send + Sync>;

/// Runs completion calls on worker threads and feeds their results back
/// into the session through a queue.
///
/// Workers never touch the session. Queued settlements are applied by
/// [`RequestController::flush_pending_events`], which must be called without
/// holding the session lock.
pub struct RequestController {
    session: Arc<Mutex<ChatSession>>,
    provider: Arc<dyn CompletionProvider>,
    pending_events: Mutex<VecDeque<Settlement>>,
    settled: Condvar,
    next_request_id: AtomicU64,
    active_request: Mutex<Option<ActiveRequest>>,
    render_requested: AtomicBool,
    stop_requested: AtomicBool,
    notify: Option<Notify>,
}

impl RequestController {
    pub fn new(
        session: Arc<Mutex<ChatSession>>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Arc<Self> {
        Self::build(session, provider, None)
    }

    /// Like [`RequestController::new`]; `notify` runs on the worker thread
    /// after each settlement is queued.
    pub fn with_notify(
        session: Arc<Mutex<ChatSession>>,
        provider: Arc<dyn CompletionProvider>,
        notify: impl Fn() + Send + Sync + 'static,
    ) -> Arc<Self> {
        Self::build(session, provider, Some(Box::new(notify)))
    }

    fn build(
        session: Arc<Mutex<ChatSession>>,
        provider: Arc<dyn CompletionProvider>,
        notify: Option<Notify>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session,
            provider,
            pending_events: Mutex::new(VecDeque::new()),
            settled: Condvar::new(),
            next_request_id: AtomicU64::new(1),
            active_request: Mutex::new(None),
            render_requested: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            notify,
        })
    }

    pub fn session(&self) -> &Arc<Mutex<ChatSession>> {
        &self.session
    }

    fn start_request_internal(
        self: &Arc<Self>,
        model: String,
        messages: Vec<WireMessage>,
    ) -> Result<RequestId, String> {
        let mut active_request = self.lock_active_request();
        if active_request.is_some() {
            return Err(ERROR_REQUEST_IN_FLIGHT.to_string());
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let request = CompletionRequest {
            request_id,
            model,
            messages,
        };
        let join_handle = self.spawn_worker(request)?;

        *active_request = Some(ActiveRequest {
            request_id,
            join_handle: Some(join_handle),
        });

        Ok(request_id)
    }

    fn spawn_worker(self: &Arc<Self>, request: CompletionRequest) -> Result<JoinHandle<()>, String> {
        let request_id = request.request_id;
        let controller = Arc::clone(self);
        thread::Builder::new()
            .name(format!("chat-request-{request_id}"))
            .spawn(move || controller.run_worker(request))
            .map_err(|error| format!("Failed to spawn request worker: {error}"))
    }

    fn run_worker(self: Arc<Self>, request: CompletionRequest) {
        let request_id = request.request_id;
        let provider = Arc::clone(&self.provider);

        let outcome = match catch_unwind(AssertUnwindSafe(|| provider.complete(request))) {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(request_id, "completion provider panicked");
                Err(CompletionError::Internal(
                    "Completion provider panicked".to_string(),
                ))
            }
        };

        self.enqueue_settlement(Settlement {
            request_id,
            outcome,
        });
    }

    fn enqueue_settlement(&self, settlement: Settlement) {
        {
            let mut queue = lock_unpoisoned(&self.pending_events);
            queue.push_back(settlement);
        }
        self.settled.notify_all();

        if let Some(notify) = &self.notify {
            notify();
        }
    }

    /// Applies queued settlements to the session and returns how many were applied.
    ///
    /// A worker that finished without queueing anything is settled here as a
    /// failure so the session never stays in flight forever.
    pub fn flush_pending_events(&self) -> usize {
        let mut drained = 0usize;

        loop {
            let settlement = {
                let mut pending_events = lock_unpoisoned(&self.pending_events);
                pending_events.pop_front()
            };

            match settlement {
                Some(settlement) => {
                    self.apply_settlement(settlement);
                    drained += 1;
                }
                None => break,
            }
        }

        if let Some(orphaned) = self.reap_silent_worker() {
            self.apply_settlement(orphaned);
            drained += 1;
        }

        if drained > 0 {
            self.render_requested.store(true, Ordering::SeqCst);
        }

        drained
    }

    /// Blocks until a settlement is queued or `timeout` elapses.
    pub fn wait_for_settlement(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending_events = lock_unpoisoned(&self.pending_events);

        while pending_events.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            pending_events = match self.settled.wait_timeout(pending_events, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }

        true
    }

    pub fn has_active_request(&self) -> bool {
        self.lock_active_request().is_some()
    }

    /// Returns and clears the render flag set by the session or by settlements.
    pub fn take_render_request(&self) -> bool {
        self.render_requested.swap(false, Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    fn apply_settlement(&self, settlement: Settlement) {
        let request_id = settlement.request_id;

        {
            let mut session = lock_unpoisoned(&self.session);
            session.on_settled(request_id, settlement.outcome);
        }

        self.clear_active_request_if_matching(request_id);
    }

    fn reap_silent_worker(&self) -> Option<Settlement> {
        let mut active_request = self.lock_active_request();
        let active = active_request.as_ref()?;
        let finished = active
            .join_handle
            .as_ref()
            .is_some_and(JoinHandle::is_finished);
        if !finished {
            return None;
        }

        let request_id = active.request_id;
        let queued = lock_unpoisoned(&self.pending_events)
            .iter()
            .any(|settlement| settlement.request_id == request_id);
        if queued {
            return None;
        }

        let mut completed = active_request.take()?;
        if let Some(join_handle) = completed.join_handle.take() {
            let _ = join_handle.join();
        }

        tracing::error!(request_id, "request worker exited without settlement");
        Some(Settlement {
            request_id,
            outcome: Err(CompletionError::Internal(
                "Request worker exited without settlement".to_string(),
            )),
        })
    }

    fn clear_active_request_if_matching(&self, request_id: RequestId) {
        let mut active_request = self.lock_active_request();
        let matches = active_request.as_ref().map(|active| active.request_id) == Some(request_id);
        if !matches {
            return;
        }

        let mut completed = match active_request.take() {
            Some(completed) => completed,
            None => return,
        };

        if let Some(join_handle) = completed.join_handle.take() {
            let is_current_thread = join_handle.thread().id() == thread::current().id();
            if !is_current_thread && join_handle.is_finished() {
                let _ = join_handle.join();
            }
        }
    }

    fn lock_active_request(&self) -> MutexGuard<'_, Option<ActiveRequest>> {
        lock_unpoisoned(&self.active_request)
    }
}

impl HostOps for Arc<RequestController> {
    fn start_request(
        &mut self,
        model: String,
        messages: Vec<WireMessage>,
    ) -> Result<RequestId, String> {
        self.start_request_internal(model, messages)
    }

    fn request_render(&mut self) {
        self.render_requested.store(true, Ordering::SeqCst);
    }

    fn request_stop(&mut self) {
        self.stop_requested.store(true, Ordering::SeqCst);
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
    use chat_provider::ProviderProfile;
    use conversation_log::SequentialIdGenerator;

    use super::*;
    use crate::app::Mode;
    use crate::bridge::NoBridge;
    use crate::config::AppConfig;
    use crate::reply::APOLOGY_TEXT;

    struct UnreachableProvider;

    impl CompletionProvider for UnreachableProvider {
        fn profile(&self) -> ProviderProfile {
            ProviderProfile {
                provider_id: "unreachable".to_string(),
                model_id: "none".to_string(),
            }
        }

        fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionReply, CompletionError> {
            Err(CompletionError::Transport("unreachable".to_string()))
        }
    }

    #[test]
    fn silent_worker_exit_settles_as_failure() {
        let session = Arc::new(Mutex::new(ChatSession::with_collaborators(
            &AppConfig::default(),
            Box::new(SequentialIdGenerator::default()),
            Box::new(NoBridge),
        )));
        let controller = RequestController::new(Arc::clone(&session), Arc::new(UnreachableProvider));

        {
            let mut session = lock_unpoisoned(&session);
            session.on_input_replace("hello");
            let mut host = Arc::clone(&controller);
            session.on_submit(&mut host);
        }
        assert!(controller.wait_for_settlement(Duration::from_secs(5)));

        // Swap the real worker for one that never queues anything.
        lock_unpoisoned(&controller.pending_events).clear();
        {
            let mut guard = controller.lock_active_request();
            let Some(active) = guard.as_mut() else {
                panic!("request should still be active");
            };
            if let Some(handle) = active.join_handle.take() {
                let _ = handle.join();
            }
            let silent = thread::spawn(|| {});
            while !silent.is_finished() {
                thread::yield_now();
            }
            active.join_handle = Some(silent);
        }

        assert_eq!(controller.flush_pending_events(), 1);

        let session = lock_unpoisoned(&session);
        assert_eq!(session.mode(), &Mode::Idle);
        assert!(session.input().is_enabled());
        let reply = &session.snapshot()[1];
        assert_eq!(reply.content(), APOLOGY_TEXT);
        assert_eq!(reply.note(), Some("Request worker exited without settlement"));
        assert!(!controller.has_active_request());
    }
}
