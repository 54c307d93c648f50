#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use chat_app::app::{ChatSession, HostOps};
use chat_app::bridge::{Haptic, HostBridge};
use chat_app::config::AppConfig;
use chat_provider::{RequestId, WireMessage};
use conversation_log::SequentialIdGenerator;

#[derive(Default)]
pub struct HostSpy {
    pub next_request_id: RequestId,
    pub started: Vec<(String, Vec<WireMessage>)>,
    pub render_requests: usize,
    pub stop_requests: usize,
}

impl HostSpy {
    pub fn with_next_request_id(request_id: RequestId) -> Self {
        Self {
            next_request_id: request_id,
            ..Self::default()
        }
    }
}

impl HostOps for HostSpy {
    fn start_request(
        &mut self,
        model: String,
        messages: Vec<WireMessage>,
    ) -> Result<RequestId, String> {
        self.started.push((model, messages));
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        Ok(request_id)
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn request_stop(&mut self) {
        self.stop_requests += 1;
    }
}

/// Host bridge that records every haptic pulse.
#[derive(Clone, Default)]
pub struct RecordingBridge {
    pub locale: Option<String>,
    pub pulses: Arc<Mutex<Vec<Haptic>>>,
}

impl HostBridge for RecordingBridge {
    fn locale(&self) -> Option<String> {
        self.locale.clone()
    }

    fn haptic(&mut self, style: Haptic) {
        lock_unpoisoned(&self.pulses).push(style);
    }
}

pub fn session_with_bridge(bridge: RecordingBridge) -> ChatSession {
    ChatSession::with_collaborators(
        &AppConfig::default(),
        Box::new(SequentialIdGenerator::default()),
        Box::new(bridge),
    )
}

pub fn session() -> ChatSession {
    session_with_bridge(RecordingBridge::default())
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
