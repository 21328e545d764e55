use netops_core::LimiterError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "netops.yaml";
pub const DEFAULT_SYSLOG_PORT: u16 = 514;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Concurrency(#[from] LimiterError),
    #[error("invalid syslog target {0:?}: expected host or host:port")]
    Syslog(String),
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct TcpCheckConfig {
    pub concurrency: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub delay_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub syslog: Option<String>,
    pub utc: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub tcp_check: Option<TcpCheckConfig>,
}

/// Load an explicit config file, or `./netops.yaml` when present.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = Path::new(DEFAULT_CONFIG_FILE);
            if p.exists() { p.to_path_buf() } else { return Ok(None); }
        }
    };
    let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
    parse_config(&s).map(Some).map_err(|source| ConfigError::Parse { path, source })
}

fn parse_config(s: &str) -> Result<Config, serde_yaml::Error> {
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(s)
}

/// Remote syslog endpoint given as `host` or `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogTarget {
    pub host: String,
    pub port: u16,
}

impl FromStr for SyslogTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::Syslog(s.to_string());
        if let Ok(sa) = s.parse::<SocketAddr>() {
            return Ok(SyslogTarget { host: sa.ip().to_string(), port: sa.port() });
        }
        let (host, port) = match s.rsplit_once(':') {
            Some((host, port)) => (host, port.parse::<u16>().map_err(|_| bad())?),
            None => (s, DEFAULT_SYSLOG_PORT),
        };
        if host.is_empty() || host.contains(':') || port == 0 {
            return Err(bad());
        }
        Ok(SyslogTarget { host: host.to_string(), port })
    }
}

impl fmt::Display for SyslogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp_check_section() {
        let cfg = parse_config("tcp_check:\n  concurrency: 20\n  delay_ms: 250\n  syslog: logs.example.net:1514\n").unwrap();
        let tc = cfg.tcp_check.unwrap();
        assert_eq!(tc.concurrency, Some(20));
        assert_eq!(tc.delay_ms, Some(250));
        assert_eq!(tc.timeout_ms, None);
        assert_eq!(tc.syslog.as_deref(), Some("logs.example.net:1514"));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("\n").unwrap(), Config::default());
    }

    #[test]
    fn syslog_targets() {
        assert_eq!("10.0.0.9:1514".parse::<SyslogTarget>().unwrap(), SyslogTarget { host: "10.0.0.9".into(), port: 1514 });
        assert_eq!("logs.example.net".parse::<SyslogTarget>().unwrap().port, 514);
        assert_eq!("[::1]:514".parse::<SyslogTarget>().unwrap().host, "::1");
        for bad in ["", ":514", "host:", "host:port", "host:70000", "a:b:c", "host:0"] {
            assert!(matches!(bad.parse::<SyslogTarget>(), Err(ConfigError::Syslog(_))), "{bad}");
        }
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/netops.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
