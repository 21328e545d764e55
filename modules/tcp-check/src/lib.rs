//! TCP reachability probes with a per-attempt timeout and a shared concurrency cap.

use async_trait::async_trait;
use futures::future::join_all;
use netops_core::{resolve_number, ConcurrencyLimiter, EventLog, ProbeOutcome, Service};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

mod aggregate;

pub use aggregate::{aggregate, resolve_ip, AggregateError, ResultRecord};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// Opens a TCP connection. Implementations only report whether it was established.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str, port: u16) -> io::Result<()>;
}

/// Plain tokio connector; name resolution happens inside `TcpStream::connect`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, host: &str, port: u16) -> io::Result<()> {
        TcpStream::connect((host, port)).await.map(drop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Upper bound for one connection attempt.
    pub timeout: Duration,
    /// Pause after an unexpected error, before the probe reports back.
    pub cooldown: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings { timeout: DEFAULT_TIMEOUT, cooldown: DEFAULT_COOLDOWN }
    }
}

/// Probe one service. Never fails: every error is folded into the outcome.
pub async fn probe_service<C: Connector + ?Sized>(
    service: &Service,
    connector: &C,
    limiter: &ConcurrencyLimiter,
    settings: ProbeSettings,
    log: &dyn EventLog,
) -> ProbeOutcome {
    let port = resolve_number(&service.port);
    let outcome = if !port.known {
        ProbeOutcome::UnknownPort
    } else {
        let attempt = {
            let _permit = limiter.acquire().await;
            match u16::try_from(port.number) {
                Ok(p) => timeout(settings.timeout, connector.connect(&service.host, p)).await,
                Err(_) => Ok(Err(io::Error::new(io::ErrorKind::InvalidInput, "port must be 0-65535"))),
            }
        };
        let outcome = classify(attempt);
        if matches!(outcome, ProbeOutcome::Failure(_)) {
            sleep(settings.cooldown).await;
        }
        outcome
    };
    log.info(&format!("{} - {} - {}", outcome, service.service_name, service.endpoint()));
    outcome
}

fn classify(attempt: Result<io::Result<()>, tokio::time::error::Elapsed>) -> ProbeOutcome {
    match attempt {
        Ok(Ok(())) => ProbeOutcome::Success,
        Err(_) => ProbeOutcome::Timeout,
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => ProbeOutcome::Refused,
        Ok(Err(e)) => ProbeOutcome::Failure(e.to_string()),
    }
}

/// Probe every service concurrently, bounded by `limiter`.
/// The returned outcomes line up with `services`.
pub async fn probe_all<C: Connector + ?Sized>(
    services: &[Service],
    connector: &C,
    limiter: &ConcurrencyLimiter,
    settings: ProbeSettings,
    log: &dyn EventLog,
) -> Vec<ProbeOutcome> {
    join_all(services.iter().map(|s| probe_service(s, connector, limiter, settings, log))).await
}
