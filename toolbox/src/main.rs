use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use netops_core::limiter::DEFAULT_CONCURRENCY;
use netops_core::{ConcurrencyLimiter, EventLog, TracingLog};
use std::path::PathBuf;
use std::time::Duration;
use tcp_check::{Connector, ProbeSettings, TcpConnector, DEFAULT_COOLDOWN, DEFAULT_TIMEOUT};

mod clock;
mod config;
mod logging;
mod report;

use clock::Clock;
use config::{ConfigError, SyslogTarget, TcpCheckConfig};

const INPUT_FILE: &str = "remote_services.csv";
const LOG_FILE: &str = "tcp_checker.log";

#[derive(Debug, Parser)]
#[command(name = "netops", version, about = "A collection of utilities for network operations")]
struct Cli {
    /// Optional config file (YAML). If omitted, loads ./netops.yaml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print version information
    Version,
    /// Show a welcome message
    Welcome,
    /// Check TCP reachability of every service in a CSV file and record the results
    #[command(name = "tcp-checker")]
    TcpChecker(TcpCheckerArgs),
}

#[derive(Debug, Args)]
struct TcpCheckerArgs {
    /// CSV file with service_name,host,port columns; results are appended to it
    #[arg(default_value = INPUT_FILE)]
    file_name: PathBuf,
    /// Outputs logs to a log file
    #[arg(long = "export_log_file", visible_alias = "el", value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// Outputs results to a JSON file in a directory using the name of the input file
    #[arg(long = "export_json_file", visible_alias = "ej")]
    json_file: bool,
    /// Outputs JSON results to stdout
    #[arg(long = "print_json", visible_alias = "pj")]
    print_json: bool,
    /// Outputs pretty table results to stdout
    #[arg(long = "print_table", visible_alias = "pt")]
    print_table: bool,
    /// Sends logs to a syslog host (IP or FQDN). Port can be provided with a ':'
    #[arg(short, long, value_name = "HOST[:PORT]")]
    syslog: Option<String>,
    /// Enables UTC time for the timestamp
    #[arg(short = 'u', long = "utc-time")]
    utc_time: bool,
    /// Enables verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Maximum number of connection attempts in flight
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    concurrency: Option<u16>,
}

/// Everything a run needs, after CLI flags have been layered over the config file.
#[derive(Debug)]
struct RunSettings {
    file_name: PathBuf,
    log_file: PathBuf,
    syslog: Option<SyslogTarget>,
    use_utc: bool,
    verbose: bool,
    limiter: ConcurrencyLimiter,
    probe: ProbeSettings,
    json_file: bool,
    print_json: bool,
    print_table: bool,
}

fn resolve_settings(args: TcpCheckerArgs, file: TcpCheckConfig) -> Result<RunSettings, ConfigError> {
    let concurrency = args.concurrency.map(usize::from).or(file.concurrency).unwrap_or(DEFAULT_CONCURRENCY);
    let limiter = ConcurrencyLimiter::new(concurrency)?;
    let syslog = args
        .syslog
        .or(file.syslog)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<SyslogTarget>())
        .transpose()?;
    let probe = ProbeSettings {
        timeout: file.timeout_ms.map(Duration::from_millis).unwrap_or(DEFAULT_TIMEOUT),
        cooldown: file.delay_ms.map(Duration::from_millis).unwrap_or(DEFAULT_COOLDOWN),
    };
    Ok(RunSettings {
        file_name: args.file_name,
        log_file: args.log_file.or(file.log_file).unwrap_or_else(|| PathBuf::from(LOG_FILE)),
        syslog,
        use_utc: args.utc_time || file.utc.unwrap_or(false),
        verbose: args.verbose,
        limiter,
        probe,
        json_file: args.json_file,
        print_json: args.print_json,
        print_table: args.print_table,
    })
}

fn run_tcp_checker(run: RunSettings) -> Result<()> {
    // must happen while the process is still single-threaded
    let clock = Clock::detect(run.use_utc);
    let timestamp = clock.run_timestamp();

    logging::init(&logging::LogOptions {
        verbose: run.verbose,
        log_file: run.log_file.clone(),
        syslog: run.syslog.clone(),
        clock,
    })?;
    let log = TracingLog;
    log.info("STARTED - TCP-CHECKER");
    execute_run(&run, &timestamp, &TcpConnector, &log)
}

/// Load, check, merge, report and save one run keyed by `timestamp`.
fn execute_run<C: Connector + ?Sized>(
    run: &RunSettings,
    timestamp: &str,
    connector: &C,
    log: &dyn EventLog,
) -> Result<()> {
    let mut set = service_store::load(&run.file_name)
        .with_context(|| format!("loading services from {}", run.file_name.display()))?;
    tracing::debug!(services = set.len(), limit = run.limiter.limit(), "checking");

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let records = rt.block_on(async {
        let outcomes = tcp_check::probe_all(&set.services, connector, &run.limiter, run.probe, log).await;
        set.merge_run(timestamp, &outcomes)?;
        let records = tcp_check::aggregate(set.services.iter().zip(&outcomes), timestamp).await?;
        anyhow::Ok(records)
    })?;

    if run.print_json {
        report::print_json(&records)?;
    }
    if run.print_table {
        report::print_table(&records);
    }
    if run.json_file {
        report::write_json_file(&report::json_path(&run.file_name, timestamp), &records, log)?;
    }
    service_store::save(&set, &run.file_name, log)
        .with_context(|| format!("saving results to {}", run.file_name.display()))?;
    log.info("COMPLETED - TCP-CHECKER");
    Ok(())
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Version) => {
            println!("netops {} (core {})", env!("CARGO_PKG_VERSION"), netops_core::version());
        }
        Some(Commands::Welcome) | None => {
            println!("Welcome to the netops utilities app!");
        }
        Some(Commands::TcpChecker(args)) => {
            let file_cfg = config::load_config(cli.config.as_deref())?
                .and_then(|c| c.tcp_check)
                .unwrap_or_default();
            run_tcp_checker(resolve_settings(args, file_cfg)?)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    dispatch(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use netops_core::MemoryLog;
    use std::io;

    fn parse(argv: &[&str]) -> TcpCheckerArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::TcpChecker(args)) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let run = resolve_settings(parse(&["netops", "tcp-checker"]), TcpCheckConfig::default()).unwrap();
        assert_eq!(run.file_name, PathBuf::from(INPUT_FILE));
        assert_eq!(run.log_file, PathBuf::from(LOG_FILE));
        assert_eq!(run.limiter.limit(), 100);
        assert_eq!(run.probe, ProbeSettings::default());
        assert!(run.syslog.is_none());
        assert!(!run.use_utc && !run.json_file && !run.print_json && !run.print_table);
    }

    #[test]
    fn flags_and_aliases() {
        let args = parse(&["netops", "tcp-checker", "svc.csv", "--ej", "--pt", "-u", "-v", "-c", "5", "-s", "10.0.0.9:1514"]);
        let run = resolve_settings(args, TcpCheckConfig::default()).unwrap();
        assert_eq!(run.file_name, PathBuf::from("svc.csv"));
        assert!(run.json_file && run.print_table && run.use_utc && run.verbose);
        assert_eq!(run.limiter.limit(), 5);
        assert_eq!(run.syslog.unwrap().port, 1514);
    }

    #[test]
    fn concurrency_bounds_enforced_by_cli() {
        assert!(Cli::try_parse_from(["netops", "tcp-checker", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["netops", "tcp-checker", "-c", "1001"]).is_err());
    }

    #[test]
    fn config_file_fills_gaps_and_flags_win() {
        let file = TcpCheckConfig {
            concurrency: Some(7),
            timeout_ms: Some(250),
            delay_ms: Some(10),
            log_file: Some("/var/log/netops.log".into()),
            syslog: Some("collector".into()),
            utc: Some(true),
        };
        let run = resolve_settings(parse(&["netops", "tcp-checker", "-c", "3"]), file).unwrap();
        assert_eq!(run.limiter.limit(), 3);
        assert_eq!(run.probe.timeout, Duration::from_millis(250));
        assert_eq!(run.probe.cooldown, Duration::from_millis(10));
        assert_eq!(run.log_file, PathBuf::from("/var/log/netops.log"));
        assert_eq!(run.syslog.unwrap().port, 514);
        assert!(run.use_utc);
    }

    #[test]
    fn invalid_config_values_are_rejected() {
        let bad_limit = TcpCheckConfig { concurrency: Some(5000), ..Default::default() };
        assert!(matches!(
            resolve_settings(parse(&["netops", "tcp-checker"]), bad_limit),
            Err(ConfigError::Concurrency(_))
        ));
        let args = parse(&["netops", "tcp-checker", "--syslog", "host:notaport"]);
        assert!(matches!(resolve_settings(args, TcpCheckConfig::default()), Err(ConfigError::Syslog(_))));
    }

    /// Port 80 accepts, every other port refuses.
    struct OnlyHttp;

    #[async_trait]
    impl Connector for OnlyHttp {
        async fn connect(&self, _host: &str, port: u16) -> io::Result<()> {
            if port == 80 {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
            }
        }
    }

    #[test]
    fn full_run_updates_csv_and_writes_json() {
        let csv_path = std::env::temp_dir().join(format!("netops-run-{}.csv", uuid::Uuid::now_v7()));
        std::fs::write(
            &csv_path,
            "service_name,host,port\nweb,127.0.0.1,80\ndb,127.0.0.1,5432\nodd,127.0.0.1,bogus-protocol\n",
        )
        .unwrap();
        let path_arg = csv_path.to_string_lossy().into_owned();
        let run = resolve_settings(parse(&["netops", "tcp-checker", &path_arg, "--ej"]), TcpCheckConfig::default()).unwrap();
        let log = MemoryLog::default();
        let ts = "2024-05-01 10:00:00";

        execute_run(&run, ts, &OnlyHttp, &log).unwrap();

        let saved = std::fs::read_to_string(&csv_path).unwrap();
        let json_file = report::json_path(&csv_path, ts);
        let json = std::fs::read_to_string(&json_file).unwrap();
        std::fs::remove_file(&csv_path).unwrap();
        std::fs::remove_dir_all(json_file.parent().unwrap()).unwrap();

        assert_eq!(
            saved,
            "service_name,host,port,2024-05-01 10:00:00\n\
             web,127.0.0.1,80,SUCCESS\n\
             db,127.0.0.1,5432,REFUSED\n\
             odd,127.0.0.1,bogus-protocol,UNKNOWN PORT\n"
        );
        let records: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 3);
        assert_eq!(records[0]["result"], "SUCCESS");
        assert_eq!(records[0]["port_name"], "HTTP");
        assert_eq!(records[1]["port_name"], "POSTGRESQL");
        assert_eq!(records[1]["timestamp"], ts);
        assert_eq!(records[2]["port_number"], 0);
        assert_eq!(records[2]["result"], "UNKNOWN PORT");

        let lines = log.lines();
        assert_eq!(lines.len(), 6);
        assert!(lines.iter().any(|l| l == "REFUSED - db - 127.0.0.1:5432"));
        assert!(lines.iter().any(|l| l.starts_with("Data written to CSV file: ")));
        assert_eq!(lines.last().map(String::as_str), Some("COMPLETED - TCP-CHECKER"));
    }

    #[test]
    fn missing_input_stops_before_anything_is_written() {
        let csv_path = std::env::temp_dir().join(format!("netops-run-{}.csv", uuid::Uuid::now_v7()));
        let path_arg = csv_path.to_string_lossy().into_owned();
        let run = resolve_settings(parse(&["netops", "tcp-checker", &path_arg]), TcpCheckConfig::default()).unwrap();
        let log = MemoryLog::default();
        assert!(execute_run(&run, "2024-05-01 10:00:00", &OnlyHttp, &log).is_err());
        assert!(!csv_path.exists());
        assert!(log.lines().is_empty());
    }

    #[test]
    fn only_tcp_checker_reads_the_config_file() {
        let missing = std::env::temp_dir().join(format!("netops-{}.yaml", uuid::Uuid::now_v7()));
        let missing = missing.to_string_lossy().into_owned();
        assert!(dispatch(Cli::try_parse_from(["netops", "--config", &missing, "welcome"]).unwrap()).is_ok());
        assert!(dispatch(Cli::try_parse_from(["netops", "--config", &missing, "version"]).unwrap()).is_ok());
        assert!(dispatch(Cli::try_parse_from(["netops", "--config", &missing]).unwrap()).is_ok());
        let err = dispatch(Cli::try_parse_from(["netops", "--config", &missing, "tcp-checker"]).unwrap()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Read { .. })));
    }
}
