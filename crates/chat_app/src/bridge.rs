//! Capabilities offered by the container that hosts the client.
//!
//! Every capability is optional; a missing host behaves as [`NoBridge`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Light,
    Medium,
}

pub trait HostBridge: Send {
    /// Raw locale code reported by the host, e.g. `fa-IR`.
    fn locale(&self) -> Option<String> {
        None
    }

    fn haptic(&mut self, _style: Haptic) {}
}

/// Host without any capabilities.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBridge;

impl HostBridge for NoBridge {}
