// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! In-memory table handed over by the upstream parser.
//!
//! The summary is always derived from the columns; there is no way to build a
//! `Table` whose summary disagrees with its data.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub type Cell = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        }
    }
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub values: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    pub non_null_count: usize,
    pub distinct_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    /// Cell values coerced to finite numbers; anything else becomes 0.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().map(cell_to_f64).collect()
    }

    pub fn label_values(&self) -> Vec<String> {
        self.values.iter().map(cell_to_label).collect()
    }

    pub fn stats(&self) -> ColumnStats {
        let non_null: Vec<&Cell> = self.values.iter().filter(|v| !v.is_null()).collect();
        let distinct_count = non_null
            .iter()
            .map(|v| cell_to_label(v))
            .collect::<HashSet<_>>()
            .len();
        let (min, max, mean) = if self.column_type.is_numeric() {
            let finite: Vec<f64> = non_null.iter().filter_map(|v| parse_finite(v)).collect();
            if finite.is_empty() {
                (None, None, None)
            } else {
                let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
                let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mean = finite.iter().sum::<f64>() / finite.len() as f64;
                (Some(min), Some(max), Some(mean))
            }
        } else {
            (None, None, None)
        };
        ColumnStats {
            non_null_count: non_null.len(),
            distinct_count,
            min,
            max,
            mean,
        }
    }
}

/// Name lists partitioning the columns by kind, plus size totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_columns: Vec<String>,
    pub string_columns: Vec<String>,
    pub date_columns: Vec<String>,
}

impl DataSummary {
    pub fn from_columns(columns: &[Column], total_rows: usize) -> Self {
        let mut summary = DataSummary {
            total_rows,
            total_columns: columns.len(),
            ..Default::default()
        };
        for column in columns {
            let name = column.name.clone();
            match column.column_type {
                ColumnType::Number => summary.numeric_columns.push(name),
                ColumnType::Date => summary.date_columns.push(name),
                ColumnType::String | ColumnType::Boolean => summary.string_columns.push(name),
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableParts")]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
    summary: DataSummary,
}

#[derive(Deserialize)]
struct TableParts {
    #[serde(default)]
    columns: Vec<Column>,
}

impl From<TableParts> for Table {
    fn from(parts: TableParts) -> Self {
        Table::new(parts.columns)
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new(Vec::new())
    }
}

impl Table {
    /// Builds rows and summary from the columns. Ragged columns are padded
    /// with nulls up to the longest one.
    pub fn new(mut columns: Vec<Column>) -> Self {
        let row_count = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(row_count, Value::Null);
        }
        let rows = (0..row_count)
            .map(|i| columns.iter().map(|c| c.values[i].clone()).collect())
            .collect();
        let summary = DataSummary::from_columns(&columns, row_count);
        Self {
            columns,
            rows,
            summary,
        }
    }

    /// Row-oriented constructor; short rows are padded with nulls.
    pub fn from_rows(header: &[(&str, ColumnType)], rows: Vec<Vec<Cell>>) -> Self {
        let columns = header
            .iter()
            .enumerate()
            .map(|(idx, (name, column_type))| {
                let values = rows
                    .iter()
                    .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
                    .collect();
                Column::new(*name, *column_type, values)
            })
            .collect();
        Table::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
    pub fn summary(&self) -> &DataSummary {
        &self.summary
    }
    pub fn row_count(&self) -> usize {
        self.summary.total_rows
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Hex SHA-256 over names, types and cells. Equal tables hash equal.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(column.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(column.column_type.as_str().as_bytes());
            hasher.update([0u8]);
            for value in &column.values {
                hasher.update(value.to_string().as_bytes());
                hasher.update([0x1f]);
            }
            hasher.update([0x1e]);
        }
        hex::encode(hasher.finalize())
    }
}

fn parse_finite(value: &Cell) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Numeric view of a cell. Non-numeric and non-finite values map to 0.
pub fn cell_to_f64(value: &Cell) -> f64 {
    parse_finite(value).unwrap_or(0.0)
}

pub fn cell_to_label(value: &Cell) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
