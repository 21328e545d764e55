//! Process-wide log stream: `TIMESTAMP - LEVEL - MESSAGE` on stderr and in a
//! log file, optionally mirrored to a syslog collector over UDP.

use crate::clock::Clock;
use crate::config::SyslogTarget;
use anyhow::{Context, Result};
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::net::UdpSocket;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SYSLOG_TAG: &str = "netops";
// facility "user"
const SYSLOG_FACILITY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Blue,
    Red,
    LightGreen,
    Green,
    Orange,
}

static KEYWORDS: Lazy<Vec<(Regex, Tint)>> = Lazy::new(|| {
    [
        ("CREATED", Tint::Blue),
        ("FAIL", Tint::Red),
        ("REFUSED", Tint::LightGreen),
        ("SUCCESS", Tint::Green),
        ("TIMEOUT", Tint::Red),
        ("STARTED", Tint::Blue),
        ("COMPLETED", Tint::Blue),
        ("UNKNOWN", Tint::Orange),
    ]
    .into_iter()
    .filter_map(|(pat, tint)| Regex::new(pat).ok().map(|re| (re, tint)))
    .collect()
});

/// First keyword found in the message decides its color.
pub fn keyword_tint(message: &str) -> Option<Tint> {
    KEYWORDS.iter().find(|(re, _)| re.is_match(message)).map(|(_, tint)| *tint)
}

fn paint(message: &str) -> String {
    match keyword_tint(message) {
        Some(Tint::Blue) => message.blue().to_string(),
        Some(Tint::Red) => message.red().to_string(),
        Some(Tint::LightGreen) => message.bright_green().to_string(),
        Some(Tint::Green) => message.green().to_string(),
        Some(Tint::Orange) => message.truecolor(255, 135, 0).to_string(),
        None => message.to_string(),
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

fn paint_level(level: &Level) -> String {
    let padded = format!("{:<8}", level_name(level));
    match *level {
        Level::ERROR => padded.red().to_string(),
        Level::WARN => padded.yellow().to_string(),
        Level::INFO => padded.green().to_string(),
        _ => padded.cyan().to_string(),
    }
}

/// `TIMESTAMP - LEVEL    - MESSAGE`
pub struct LineFormat {
    clock: Clock,
    color: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;
        let level = event.metadata().level();
        if self.color {
            writeln!(writer, "{} - {} - {}", self.clock.log_timestamp(), paint_level(level), paint(&message))
        } else {
            writeln!(writer, "{} - {:<8} - {}", self.clock.log_timestamp(), level_name(level), message)
        }
    }
}

/// `netops: LEVEL MESSAGE`; the priority prefix is added by [`SyslogWriter`].
pub struct SyslogFormat;

impl<S, N> FormatEvent<S, N> for SyslogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        write!(writer, "{}: {} ", SYSLOG_TAG, level_name(event.metadata().level()))?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn severity(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        Level::DEBUG | Level::TRACE => 7,
    }
}

/// Sends every formatted event as one UDP datagram.
#[derive(Clone)]
pub struct SyslogWriter {
    socket: Arc<UdpSocket>,
}

impl SyslogWriter {
    pub fn connect(target: &SyslogTarget) -> io::Result<Self> {
        let bind = if target.host.contains(':') { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind)?;
        socket.connect((target.host.as_str(), target.port))?;
        Ok(SyslogWriter { socket: Arc::new(socket) })
    }
}

pub struct Datagram {
    socket: Arc<UdpSocket>,
    buf: Vec<u8>,
}

impl Datagram {
    fn new(socket: Arc<UdpSocket>, severity: u8) -> Self {
        let buf = format!("<{}>", SYSLOG_FACILITY * 8 + severity).into_bytes();
        Datagram { socket, buf }
    }
}

impl Write for Datagram {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Datagram {
    fn drop(&mut self) {
        while self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        // a lost log datagram must never take the run down
        let _ = self.socket.send(&self.buf);
    }
}

impl<'a> MakeWriter<'a> for SyslogWriter {
    type Writer = Datagram;

    fn make_writer(&'a self) -> Self::Writer {
        Datagram::new(self.socket.clone(), severity(&Level::INFO))
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        Datagram::new(self.socket.clone(), severity(meta.level()))
    }
}

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub verbose: bool,
    pub log_file: PathBuf,
    pub syslog: Option<SyslogTarget>,
    pub clock: Clock,
}

pub fn level_for(verbose: bool) -> Level {
    if verbose { Level::INFO } else { Level::WARN }
}

/// `RUST_LOG`, when set, replaces the level picked by `--verbose`.
fn filter_for(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(level_for(verbose).as_str()),
    }
}

pub fn init(opts: &LogOptions) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(opts.verbose, rust_log.as_deref());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&opts.log_file)
        .with_context(|| format!("opening log file {}", opts.log_file.display()))?;

    let syslog_layer = match &opts.syslog {
        Some(target) => {
            let writer = SyslogWriter::connect(target).with_context(|| format!("connecting to syslog at {}", target))?;
            Some(tracing_subscriber::fmt::layer().event_format(SyslogFormat).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat { clock: opts.clock, color: io::stderr().is_terminal() })
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat { clock: opts.clock, color: false })
                .with_writer(Mutex::new(file)),
        )
        .with(syslog_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_matching_keyword_wins() {
        assert_eq!(keyword_tint("SUCCESS - web - 10.0.0.1:80"), Some(Tint::Green));
        assert_eq!(keyword_tint("REFUSED - web - 10.0.0.1:80"), Some(Tint::LightGreen));
        assert_eq!(keyword_tint("UNKNOWN PORT - x - h:bogus"), Some(Tint::Orange));
        assert_eq!(keyword_tint("FAILURE - Error: TIMEOUT"), Some(Tint::Red));
        assert_eq!(keyword_tint("COMPLETED - TCP-CHECKER"), Some(Tint::Blue));
        assert_eq!(keyword_tint("Data written to CSV file: a.csv"), None);
    }

    #[test]
    fn warn_is_default_level() {
        assert_eq!(level_for(false), Level::WARN);
        assert_eq!(level_for(true), Level::INFO);
        assert_eq!(level_name(&Level::WARN), "WARNING");
    }

    #[test]
    fn rust_log_overrides_verbosity() {
        assert!(filter_for(false, None).to_string().eq_ignore_ascii_case("warn"));
        assert!(filter_for(true, None).to_string().eq_ignore_ascii_case("info"));
        assert!(filter_for(false, Some("debug")).to_string().eq_ignore_ascii_case("debug"));
        assert!(filter_for(true, Some("netops=trace")).to_string().eq_ignore_ascii_case("netops=trace"));
        assert!(filter_for(true, Some("  ")).to_string().eq_ignore_ascii_case("info"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_line_layout() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .event_format(LineFormat { clock: Clock::detect(true), color: false })
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("SUCCESS - web - 127.0.0.1:80");
            tracing::warn!("TIMEOUT - db - 10.0.0.5:5432");
        });

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        // 23-char timestamp, e.g. 2024-05-01 10:00:00,123
        assert_eq!(&lines[0][23..], " - INFO     - SUCCESS - web - 127.0.0.1:80");
        assert_eq!(&lines[1][23..], " - WARNING  - TIMEOUT - db - 10.0.0.5:5432");
        assert_eq!(&lines[0][19..20], ",");
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn syslog_datagram_carries_priority() {
        let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
        collector.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let port = collector.local_addr().unwrap().port();
        let writer = SyslogWriter::connect(&SyslogTarget { host: "127.0.0.1".into(), port }).unwrap();
        {
            let mut line = writer.make_writer();
            line.write_all(b"netops: INFO STARTED - TCP-CHECKER\n").unwrap();
        }
        let mut buf = [0u8; 256];
        let n = collector.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"<14>netops: INFO STARTED - TCP-CHECKER");
    }
}
