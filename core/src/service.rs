use crate::outcome::ProbeOutcome;
use std::collections::BTreeMap;

/// One service to probe plus the outcomes recorded for it by earlier runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Service {
    pub service_name: String,
    pub host: String,
    pub port: String,
    /// Run timestamp -> outcome of that run.
    pub history: BTreeMap<String, ProbeOutcome>,
}

impl Service {
    pub fn new(service_name: impl Into<String>, host: impl Into<String>, port: impl Into<String>) -> Self {
        Service {
            service_name: service_name.into(),
            host: host.into(),
            port: port.into(),
            history: BTreeMap::new(),
        }
    }

    /// `host:port` as written in the service file.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
