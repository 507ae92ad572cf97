use std::collections::HashSet;

use csv::WriterBuilder;
use serde_json::{Map, Value};
use shared::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Json,
    Csv,
}

/// Renders aggregated records for printing.
///
/// `fields` are dot separated paths into each record (`mint.tokenId`). Without
/// fields, JSON output keeps whole records and CSV output uses every leaf path
/// seen across the records, in first-seen order.
pub fn format_records(
    records: &[Value],
    fields: Option<&[String]>,
    show_header: bool,
    mode: OutputMode,
) -> Result<String, QueryError> {
    match mode {
        OutputMode::Json => format_json(records, fields),
        OutputMode::Csv => format_csv(records, fields, show_header),
    }
}

fn format_json(records: &[Value], fields: Option<&[String]>) -> Result<String, QueryError> {
    let rendered = match fields {
        Some(fields) => {
            let projected: Vec<Value> = records
                .iter()
                .map(|record| project(record, fields))
                .collect();
            serde_json::to_string_pretty(&projected)
        }
        None => serde_json::to_string_pretty(records),
    };
    rendered.map_err(|err| QueryError::Format(err.to_string()))
}

fn format_csv(
    records: &[Value],
    fields: Option<&[String]>,
    show_header: bool,
) -> Result<String, QueryError> {
    let columns = match fields {
        Some(fields) => fields.to_vec(),
        None => leaf_columns(records),
    };
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if show_header {
        writer
            .write_record(&columns)
            .map_err(|err| QueryError::Format(err.to_string()))?;
    }
    for record in records {
        let row = columns
            .iter()
            .map(|column| cell_text(lookup_path(record, column)));
        writer
            .write_record(row)
            .map_err(|err| QueryError::Format(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| QueryError::Format(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| QueryError::Format(err.to_string()))
}

fn project(record: &Value, fields: &[String]) -> Value {
    let mut projected = Map::new();
    for field in fields {
        let value = lookup_path(record, field).cloned().unwrap_or(Value::Null);
        projected.insert(field.clone(), value);
    }
    Value::Object(projected)
}

fn lookup_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => None,
    })
}

fn leaf_columns(records: &[Value]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        let mut paths = Vec::new();
        collect_leaf_paths(record, None, &mut paths);
        for path in paths {
            if seen.insert(path.clone()) {
                columns.push(path);
            }
        }
    }
    columns
}

fn collect_leaf_paths(value: &Value, prefix: Option<&str>, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                collect_leaf_paths(child, Some(&path), out);
            }
        }
        _ => {
            if let Some(prefix) = prefix {
                out.push(prefix.to_string());
            }
        }
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
