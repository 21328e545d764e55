//! Injected logging capability used by the engine and the store.

/// Sink for human-readable run events.
pub trait EventLog: Send + Sync {
    fn info(&self, message: &str);
}

/// Forwards events to the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

impl<T: EventLog + ?Sized> EventLog for std::sync::Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }
}

/// Keeps every message in memory; handy for assertions.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: std::sync::Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl EventLog for MemoryLog {
    fn info(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}
