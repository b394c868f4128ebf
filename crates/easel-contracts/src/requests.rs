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

use crate::config::Preferences;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProjection {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub sample_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProjection {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_columns: Vec<String>,
    pub string_columns: Vec<String>,
    pub date_columns: Vec<String>,
}

/// Reduced view of a table: never the full row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProjection {
    pub columns: Vec<ColumnProjection>,
    pub summary: SummaryProjection,
    pub row_count: usize,
}

/// The chart a configuration request is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDescriptor {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub id: Uuid,
    pub table: TableProjection,
    pub preferences: Preferences,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    pub id: Uuid,
    pub suggestion: SuggestionDescriptor,
    pub table: TableProjection,
    pub preferences: Preferences,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub id: Uuid,
    pub table: TableProjection,
    pub requested_at: DateTime<Utc>,
}

impl SuggestionRequest {
    pub fn new(table: TableProjection, preferences: Preferences) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            preferences,
            requested_at: Utc::now(),
        }
    }
}

impl ConfigRequest {
    pub fn new(
        suggestion: SuggestionDescriptor,
        table: TableProjection,
        preferences: Preferences,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            suggestion,
            table,
            preferences,
            requested_at: Utc::now(),
        }
    }
}

impl InsightsRequest {
    pub fn new(table: TableProjection) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            requested_at: Utc::now(),
        }
    }
}
