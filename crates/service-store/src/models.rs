use netops_core::Service;

/// Leading columns every service file starts with, in order.
pub const FIXED_COLUMNS: [&str; 3] = ["service_name", "host", "port"];

/// Every service from the file plus the run columns seen so far, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceSet {
    pub runs: Vec<String>,
    pub services: Vec<Service>,
}

impl ServiceSet {
    pub fn new(services: Vec<Service>) -> Self {
        ServiceSet { runs: Vec::new(), services }
    }

    /// Full header row: fixed columns followed by run columns.
    pub fn header(&self) -> Vec<&str> {
        FIXED_COLUMNS.iter().copied().chain(self.runs.iter().map(String::as_str)).collect()
    }

    pub fn len(&self) -> usize { self.services.len() }

    pub fn is_empty(&self) -> bool { self.services.is_empty() }
}
