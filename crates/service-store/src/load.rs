use crate::{ServiceSet, StoreError, FIXED_COLUMNS};
use netops_core::{ProbeOutcome, Service};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn load(path: impl AsRef<Path>) -> Result<ServiceSet, StoreError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    load_from_reader(bytes.as_slice())
}

pub fn load_from_reader<R: Read>(mut rdr: R) -> Result<ServiceSet, StoreError> {
    let mut raw = Vec::new();
    rdr.read_to_end(&mut raw).map_err(csv::Error::from)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(body);
    let runs = parse_header(reader.headers()?)?;
    let width = FIXED_COLUMNS.len() + runs.len();

    let mut services = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() > width {
            return Err(StoreError::RowLength { line, expected: width, found: record.len() });
        }
        let cell = |i: usize| record.get(i).unwrap_or("");
        let host = cell(1);
        let port = cell(2);
        if host.is_empty() {
            return Err(StoreError::MissingField { line, field: "host" });
        }
        if port.is_empty() {
            return Err(StoreError::MissingField { line, field: "port" });
        }

        let mut history = BTreeMap::new();
        for (i, run) in runs.iter().enumerate() {
            let value = cell(FIXED_COLUMNS.len() + i);
            if value.is_empty() {
                continue;
            }
            let outcome = value.parse::<ProbeOutcome>().map_err(|source| StoreError::InvalidOutcome {
                line,
                column: run.clone(),
                source,
            })?;
            history.insert(run.clone(), outcome);
        }

        services.push(Service {
            service_name: cell(0).to_string(),
            host: host.to_string(),
            port: port.to_string(),
            history,
        });
    }
    Ok(ServiceSet { runs, services })
}

fn parse_header(header: &csv::StringRecord) -> Result<Vec<String>, StoreError> {
    if header.len() < FIXED_COLUMNS.len() || header.iter().zip(FIXED_COLUMNS).any(|(got, want)| got != want) {
        return Err(StoreError::MalformedHeader(format!(
            "expected header to start with {}, found {}",
            FIXED_COLUMNS.join(","),
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }
    let mut seen = HashSet::new();
    let mut runs = Vec::new();
    for name in header.iter().skip(FIXED_COLUMNS.len()) {
        if name.is_empty() {
            return Err(StoreError::MalformedHeader("empty run column name".into()));
        }
        if !seen.insert(name) {
            return Err(StoreError::MalformedHeader(format!("duplicate run column {:?}", name)));
        }
        runs.push(name.to_string());
    }
    Ok(runs)
}
