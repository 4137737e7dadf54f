use crate::domain::model::{Record, Table};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Cell spellings read as missing values.
const NULL_MARKERS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

pub fn parse_cell(raw: &str) -> Value {
    if NULL_MARKERS.contains(&raw.trim()) {
        return Value::Null;
    }
    if let Ok(n) = raw.trim().parse::<i64>() {
        return Value::from(n);
    }
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(raw.to_string()),
    }
}

pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Reads CSV bytes with a header row into a table.
pub fn read_table(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(String::is_empty) {
        return Err(EtlError::processing("CSV input has no header row"));
    }
    let columns = unique_columns(headers);

    let mut table = Table::new(columns);
    for row in reader.records() {
        let row = row?;
        let mut record = Record::default();
        for (column, raw) in table.columns.iter().zip(row.iter()) {
            record.set(column, parse_cell(raw));
        }
        table.records.push(record);
    }

    Ok(table)
}

/// Repeated header names get a `.N` suffix (`costo`, `costo.1`, ...) so
/// every input column keeps its own values.
fn unique_columns(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header;
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            let renamed = format!("{}.{}", name, count);
            tracing::warn!("⚠️ Duplicate CSV column '{}' renamed to '{}'", name, renamed);
            name = renamed;
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        columns.push(name);
    }

    columns
}

pub fn write_table(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for record in &table.records {
        writer.write_record(table.columns.iter().map(|c| format_cell(record.get(c))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::processing(format!("CSV output is not UTF-8: {}", e)))
}
