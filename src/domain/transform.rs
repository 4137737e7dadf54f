//! Cleaning and feature derivation for production job tables.

use crate::domain::model::{ColumnKind, Table};
use crate::utils::error::{EtlError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde_json::Value;

pub const UNKNOWN_CATEGORY: &str = "Desconocido";

pub const REQUEST_DATE: &str = "fecha_solicitud";
pub const PAGES: &str = "cantidad_paginas";
pub const ESTIMATED_COST: &str = "costo_estimado";

pub const MONTH: &str = "mes";
pub const WEEKDAY: &str = "dia_semana";
pub const HOUR: &str = "hora";
pub const COST_PER_PAGE: &str = "costo_por_pagina";
pub const SIZE_CATEGORY: &str = "categoria_tamano";

const REQUIRED_COLUMNS: [&str; 3] = [REQUEST_DATE, PAGES, ESTIMATED_COST];

// `%.f` also matches a timestamp without fractional seconds.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
pub const CANONICAL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Page-count bins, right-inclusive: (0, 50], (50, 200], (200, 500].
const SIZE_BINS: [(f64, f64, &str); 3] = [
    (0.0, 50.0, "Pequeño"),
    (50.0, 200.0, "Mediano"),
    (200.0, 500.0, "Grande"),
];

/// Returns a cleaned copy of `table` with the derived columns appended.
pub fn process(table: &Table) -> Result<Table> {
    for column in REQUIRED_COLUMNS {
        if !table.has_column(column) {
            return Err(EtlError::missing_column(column));
        }
    }

    let mut out = table.clone();
    fill_missing_values(&mut out);

    for column in [PAGES, ESTIMATED_COST] {
        if !out.column_kind(column).is_numeric() {
            return Err(EtlError::processing(format!(
                "Column '{}' must be numeric",
                column
            )));
        }
    }

    for column in [MONTH, WEEKDAY, HOUR, COST_PER_PAGE, SIZE_CATEGORY] {
        out.push_column(column);
    }

    for (index, record) in out.records.iter_mut().enumerate() {
        let requested_at = match record.get(REQUEST_DATE) {
            Value::String(s) => parse_request_date(s),
            Value::Number(n) => parse_request_date(&n.to_string()),
            _ => None,
        }
        .ok_or_else(|| {
            EtlError::processing(format!(
                "Row {}: cannot parse {} value {}",
                index + 1,
                REQUEST_DATE,
                record.get(REQUEST_DATE)
            ))
        })?;

        let pages = record.get_f64(PAGES);
        let cost = record.get_f64(ESTIMATED_COST);

        record.set(
            REQUEST_DATE,
            Value::String(requested_at.format(CANONICAL_DATETIME).to_string()),
        );
        record.set(MONTH, Value::from(requested_at.month()));
        record.set(
            WEEKDAY,
            Value::String(weekday_name(requested_at.weekday()).to_string()),
        );
        record.set(HOUR, Value::from(requested_at.hour()));
        record.set(COST_PER_PAGE, cost_per_page(cost, pages));
        record.set(
            SIZE_CATEGORY,
            pages
                .and_then(size_category)
                .map(|label| Value::String(label.to_string()))
                .unwrap_or(Value::Null),
        );
    }

    tracing::debug!(
        "Derived {} columns for {} records",
        out.columns.len() - table.columns.len(),
        out.len()
    );
    Ok(out)
}

/// Numeric nulls become the column median, text nulls become
/// [`UNKNOWN_CATEGORY`].
pub fn fill_missing_values(table: &mut Table) {
    let columns = table.columns.clone();
    for column in &columns {
        if !table.has_nulls(column) {
            continue;
        }

        let kind = table.column_kind(column);
        let fill = match kind {
            ColumnKind::Text => Value::String(UNKNOWN_CATEGORY.to_string()),
            ColumnKind::Integer | ColumnKind::Float => {
                let values: Vec<f64> = table.column_values(column).filter_map(Value::as_f64).collect();
                match median(values) {
                    Some(m) if kind == ColumnKind::Integer && m.fract() == 0.0 => {
                        Value::from(m as i64)
                    }
                    Some(m) => Value::from(m),
                    None => continue,
                }
            }
        };

        let mut filled = 0usize;
        for record in table.records.iter_mut() {
            if record.get(column).is_null() {
                record.set(column, fill.clone());
                filled += 1;
            }
        }
        tracing::debug!("Filled {} missing values in '{}' with {}", filled, column, fill);
    }
}

pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

pub fn parse_request_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Infinite ratios (zero pages) collapse to 0; 0/0 stays missing.
pub fn cost_per_page(cost: Option<f64>, pages: Option<f64>) -> Value {
    match (cost, pages) {
        (Some(cost), Some(pages)) => {
            let ratio = cost / pages;
            if ratio.is_infinite() {
                Value::from(0.0)
            } else if ratio.is_nan() {
                Value::Null
            } else {
                Value::from(ratio)
            }
        }
        _ => Value::Null,
    }
}

pub fn size_category(pages: f64) -> Option<&'static str> {
    SIZE_BINS
        .iter()
        .find(|(low, high, _)| pages > *low && pages <= *high)
        .map(|(_, _, label)| *label)
}
