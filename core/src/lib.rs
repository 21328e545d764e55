//! Core types shared by the netops crates: services, probe outcomes, port
//! lookups, the concurrency limiter and the event log seam.

pub mod limiter;
pub mod log;
pub mod outcome;
pub mod ports;
pub mod service;

pub use limiter::{ConcurrencyLimiter, LimiterError};
pub use log::{EventLog, MemoryLog, TracingLog};
pub use outcome::{OutcomeCategory, ParseOutcomeError, ProbeOutcome};
pub use ports::{resolve_name, resolve_number, PortNumber};
pub use service::Service;

pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
