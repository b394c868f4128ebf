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

use crate::catalog::{ChartKind, Complexity};
use easel_contracts::SuggestionDescriptor;
use serde::{Deserialize, Serialize};

/// A recommended chart with its column bindings and rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub description: String,
    /// 0..=100
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_enhanced: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl ChartSuggestion {
    /// A suggestion pre-filled from the catalog entry for `kind`.
    pub fn new(kind: ChartKind, confidence: u8) -> Self {
        let descriptor = kind.descriptor();
        Self {
            kind,
            title: descriptor.label.to_string(),
            description: descriptor.description.to_string(),
            confidence: confidence.min(100),
            x_axis: None,
            y_axis: None,
            series: None,
            reasoning: String::new(),
            use_case: Some(descriptor.use_case.to_string()),
            complexity: Some(descriptor.complexity),
            ai_enhanced: None,
            preview: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
    pub fn with_x_axis(mut self, column: impl Into<String>) -> Self {
        self.x_axis = Some(column.into());
        self
    }
    pub fn with_y_axis(mut self, columns: Vec<String>) -> Self {
        self.y_axis = (!columns.is_empty()).then_some(columns);
        self
    }
    pub fn with_series(mut self, column: Option<String>) -> Self {
        self.series = column;
        self
    }

    pub fn is_enhanced(&self) -> bool {
        self.ai_enhanced.unwrap_or(false)
    }

    pub fn y_columns(&self) -> &[String] {
        self.y_axis.as_deref().unwrap_or(&[])
    }

    pub fn descriptor(&self) -> SuggestionDescriptor {
        SuggestionDescriptor {
            chart_type: self.kind.as_str().to_string(),
            title: self.title.clone(),
            x_axis: self.x_axis.clone(),
            y_axis: self.y_axis.clone(),
            series: self.series.clone(),
        }
    }
}
