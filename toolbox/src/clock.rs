use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Wall clock pinned to either UTC or the local offset seen at startup.
///
/// The local offset has to be read before any other thread exists, so it is
/// captured once here and reused for every timestamp afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    offset: UtcOffset,
}

impl Clock {
    pub fn detect(use_utc: bool) -> Self {
        let offset = if use_utc {
            UtcOffset::UTC
        } else {
            UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
        };
        Clock { offset }
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }

    /// Column key for the current run, e.g. `2024-05-01 10:00:00`.
    pub fn run_timestamp(&self) -> String {
        format_run_timestamp(self.now())
    }

    /// Log line prefix with millisecond precision.
    pub fn log_timestamp(&self) -> String {
        self.now()
            .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"))
            .unwrap_or_else(|_| String::new())
    }
}

pub fn format_run_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| String::new())
}
