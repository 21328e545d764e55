use netops_core::{resolve_name, resolve_number, PortNumber, ProbeOutcome, Service};
use serde::Serialize;
use std::io;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("no address found for {0}")]
    NoAddress(String),
}

/// One service's result for the current run, as handed to the output sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    pub host: String,
    pub ip: String,
    pub port_name: String,
    pub port_number: i64,
    pub result: ProbeOutcome,
    pub timestamp: String,
}

/// IP literals are returned unchanged, anything else goes through DNS.
pub async fn resolve_ip(host: &str) -> Result<String, AggregateError> {
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    let addrs = tokio::net::lookup_host((host, 0u16))
        .await
        .map_err(|source| AggregateError::Resolve { host: host.to_string(), source })?;
    pick_address(addrs)
        .map(|ip| ip.to_string())
        .ok_or_else(|| AggregateError::NoAddress(host.to_string()))
}

/// First IPv4 address, else whatever the resolver listed first.
fn pick_address(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<IpAddr> {
    let mut fallback = None;
    for sa in addrs {
        if sa.is_ipv4() {
            return Some(sa.ip());
        }
        fallback.get_or_insert(sa.ip());
    }
    fallback
}

fn port_pair(token: &str) -> (String, i64) {
    if PortNumber::is_numeric_token(token) {
        let number = resolve_number(token).number;
        (resolve_name(number), number)
    } else {
        (token.to_string(), resolve_number(token).number)
    }
}

/// Join each service with its outcome. Output order follows input order.
pub async fn aggregate<'a, I>(probed: I, timestamp: &str) -> Result<Vec<ResultRecord>, AggregateError>
where
    I: IntoIterator<Item = (&'a Service, &'a ProbeOutcome)>,
{
    let mut records = Vec::new();
    for (service, outcome) in probed {
        let ip = resolve_ip(&service.host).await?;
        let (port_name, port_number) = port_pair(&service.port);
        records.push(ResultRecord {
            service_name: (!service.service_name.is_empty()).then(|| service.service_name.clone()),
            host: service.host.clone(),
            ip,
            port_name,
            port_number,
            result: outcome.clone(),
            timestamp: timestamp.to_string(),
        });
    }
    Ok(records)
}
