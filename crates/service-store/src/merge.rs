use crate::{ServiceSet, StoreError};
use netops_core::ProbeOutcome;

impl ServiceSet {
    /// Record one run. `outcomes[i]` belongs to `services[i]`. Re-using a
    /// timestamp overwrites that column instead of adding a second one.
    pub fn merge_run(&mut self, timestamp: &str, outcomes: &[ProbeOutcome]) -> Result<(), StoreError> {
        if outcomes.len() != self.services.len() {
            return Err(StoreError::OutcomeCount { services: self.services.len(), outcomes: outcomes.len() });
        }
        if !self.runs.iter().any(|r| r == timestamp) {
            self.runs.push(timestamp.to_string());
        }
        for (service, outcome) in self.services.iter_mut().zip(outcomes) {
            service.history.insert(timestamp.to_string(), outcome.clone());
        }
        Ok(())
    }
}
