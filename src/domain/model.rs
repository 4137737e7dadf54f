use crate::domain::summary::ProductionSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One production job. Missing cells are `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> &Value {
        self.data.get(column).unwrap_or(&Value::Null)
    }

    pub fn set(&mut self, column: &str, value: Value) {
        self.data.insert(column.to_string(), value);
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// Column-ordered set of records, the unit every ETL phase works on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.records.iter().map(move |r| r.get(column))
    }

    pub fn has_nulls(&self, column: &str) -> bool {
        self.column_values(column).any(Value::is_null)
    }

    /// Infers the column kind from its non-null values. An all-null
    /// column counts as `Float`.
    pub fn column_kind(&self, column: &str) -> ColumnKind {
        let mut kind = ColumnKind::Integer;
        for value in self.column_values(column) {
            match value {
                Value::Null => {}
                Value::Number(n) if n.is_i64() || n.is_u64() => {}
                Value::Number(_) => kind = ColumnKind::Float,
                _ => return ColumnKind::Text,
            }
        }
        if self.records.iter().all(|r| r.get(column).is_null()) {
            return ColumnKind::Float;
        }
        kind
    }

    /// Appends a column name; a no-op when the column already exists.
    pub fn push_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    pub csv_output: String,
    pub summary: ProductionSummary,
}
