use crate::{ServiceSet, StoreError, FIXED_COLUMNS};
use netops_core::EventLog;
use std::io::Write;
use std::path::Path;

/// Rewrite the whole service file, prior run columns included.
pub fn save(set: &ServiceSet, path: impl AsRef<Path>, log: &dyn EventLog) -> Result<(), StoreError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    save_to_writer(set, file)?;
    log.info(&format!("Data written to CSV file: {}", path.display()));
    Ok(())
}

pub fn save_to_writer<W: Write>(set: &ServiceSet, w: W) -> Result<(), StoreError> {
    let mut wtr = csv::WriterBuilder::new().terminator(csv::Terminator::Any(b'\n')).from_writer(w);
    wtr.write_record(set.header())?;
    let mut row: Vec<String> = Vec::with_capacity(FIXED_COLUMNS.len() + set.runs.len());
    for service in &set.services {
        row.clear();
        row.push(service.service_name.clone());
        row.push(service.host.clone());
        row.push(service.port.clone());
        for run in &set.runs {
            row.push(service.history.get(run).map(|o| o.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
