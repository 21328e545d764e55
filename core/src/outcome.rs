//! Classified result of a single probe and its external string forms.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const FAILURE_PREFIX: &str = "FAILURE - Error: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    Timeout,
    Refused,
    UnknownPort,
    Failure(String),
}

/// Coarse grouping used when coloring outcomes on a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCategory {
    Reachable,
    Refused,
    Unknown,
    Unreachable,
}

impl ProbeOutcome {
    pub fn category(&self) -> OutcomeCategory {
        match self {
            ProbeOutcome::Success => OutcomeCategory::Reachable,
            ProbeOutcome::Refused => OutcomeCategory::Refused,
            ProbeOutcome::UnknownPort => OutcomeCategory::Unknown,
            ProbeOutcome::Timeout | ProbeOutcome::Failure(_) => OutcomeCategory::Unreachable,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success => f.write_str("SUCCESS"),
            ProbeOutcome::Timeout => f.write_str("TIMEOUT"),
            ProbeOutcome::Refused => f.write_str("REFUSED"),
            ProbeOutcome::UnknownPort => f.write_str("UNKNOWN PORT"),
            ProbeOutcome::Failure(detail) => write!(f, "{FAILURE_PREFIX}{detail}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised probe outcome: {0:?}")]
pub struct ParseOutcomeError(pub String);

impl FromStr for ProbeOutcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(ProbeOutcome::Success),
            "TIMEOUT" => Ok(ProbeOutcome::Timeout),
            "REFUSED" => Ok(ProbeOutcome::Refused),
            "UNKNOWN PORT" => Ok(ProbeOutcome::UnknownPort),
            _ => s
                .strip_prefix(FAILURE_PREFIX)
                .map(|detail| ProbeOutcome::Failure(detail.to_string()))
                .ok_or_else(|| ParseOutcomeError(s.to_string())),
        }
    }
}

impl Serialize for ProbeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_detail_through_text_form() {
        let o = ProbeOutcome::Failure("failed to lookup address information".into());
        let text = o.to_string();
        assert_eq!(text, "FAILURE - Error: failed to lookup address information");
        assert_eq!(text.parse::<ProbeOutcome>().unwrap(), o);
    }

    #[test]
    fn unknown_port_uses_spaced_form() {
        assert_eq!(ProbeOutcome::UnknownPort.to_string(), "UNKNOWN PORT");
        assert_eq!("UNKNOWN PORT".parse::<ProbeOutcome>().unwrap(), ProbeOutcome::UnknownPort);
    }

    #[test]
    fn rejects_free_text() {
        assert!("maybe".parse::<ProbeOutcome>().is_err());
        assert!("success".parse::<ProbeOutcome>().is_err());
    }

    #[test]
    fn categories() {
        assert_eq!(ProbeOutcome::Success.category(), OutcomeCategory::Reachable);
        assert_eq!(ProbeOutcome::Timeout.category(), OutcomeCategory::Unreachable);
        assert_eq!(ProbeOutcome::Failure(String::new()).category(), OutcomeCategory::Unreachable);
        assert_eq!(ProbeOutcome::UnknownPort.category(), OutcomeCategory::Unknown);
    }

    #[test]
    fn serializes_as_string() {
        assert_eq!(serde_json::to_string(&ProbeOutcome::Refused).unwrap(), "\"REFUSED\"");
    }
}
