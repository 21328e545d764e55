//! Output sinks for a run's result records.

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use netops_core::{EventLog, OutcomeCategory};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tcp_check::ResultRecord;

/// `<input without extension>/<timestamp>.json`
pub fn json_path(input: &Path, timestamp: &str) -> PathBuf {
    input.with_extension("").join(format!("{timestamp}.json"))
}

fn to_json_indented<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    value.serialize(&mut ser)?;
    Ok(buf)
}

pub fn write_json_file(path: &Path, records: &[ResultRecord], log: &dyn EventLog) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    }
    std::fs::write(path, to_json_indented(&records)?).with_context(|| format!("writing {}", path.display()))?;
    log.info(&format!("Data written to JSON file: {}", path.display()));
    Ok(())
}

pub fn print_json(records: &[ResultRecord]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

fn result_color(category: OutcomeCategory) -> Color {
    match category {
        OutcomeCategory::Reachable => Color::DarkGreen,
        OutcomeCategory::Refused => Color::Green,
        OutcomeCategory::Unknown => Color::AnsiValue(208),
        OutcomeCategory::Unreachable => Color::Red,
    }
}

pub fn render_table(records: &[ResultRecord]) -> String {
    let named = records.iter().any(|r| r.service_name.is_some());
    let mut headers = Vec::new();
    if named {
        headers.push("service_name");
    }
    headers.extend(["host", "ip", "port_name", "port_number", "result", "timestamp"]);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Magenta))
            .collect::<Vec<_>>(),
    );

    for r in records {
        let mut row = Vec::with_capacity(headers.len());
        if named {
            row.push(Cell::new(r.service_name.as_deref().unwrap_or("")));
        }
        row.push(Cell::new(&r.host));
        row.push(Cell::new(&r.ip));
        row.push(Cell::new(&r.port_name));
        row.push(Cell::new(r.port_number));
        row.push(Cell::new(r.result.to_string()).fg(result_color(r.result.category())));
        row.push(Cell::new(&r.timestamp));
        // first column is emphasised like the header
        if let Some(first) = row.first_mut() {
            *first = first.clone().add_attribute(Attribute::Bold);
        }
        table.add_row(row);
    }
    table.to_string()
}

pub fn print_table(records: &[ResultRecord]) {
    println!("{}", render_table(records));
}
