//! Warning sink contract and the default `tracing`-backed sink.

use std::collections::HashSet;
use std::sync::Mutex;

/// Warning sink collaborator.
///
/// Fire-and-forget: neither method returns anything or fails. Injected into
/// [`ResolveCtx`](crate::ResolveCtx) rather than reached as ambient global
/// state, so callers can capture warnings in tests.
pub trait Logger {
    fn warn(&self, msg: &str);

    /// Emit `msg` at most once over the lifetime of this sink.
    fn warnonce(&self, msg: &str);
}

/// Default sink, forwarding to `tracing::warn!`.
#[derive(Debug, Default)]
pub struct TracingLogger {
    seen: Mutex<HashSet<String>>,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Logger for TracingLogger {
    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn warnonce(&self, msg: &str) {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.insert(msg.to_string()) {
            tracing::warn!("{msg}");
        }
    }
}
