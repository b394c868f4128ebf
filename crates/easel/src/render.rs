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

//! Renderer-facing chart option. Field names follow the renderer's camelCase
//! option object so a `RenderConfig` serialises straight into it.

use crate::catalog::ChartKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const DEFAULT_PALETTE: [&str; 8] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
];

pub const PLACEHOLDER_LABEL: &str = "No data";

pub fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tooltip {
    pub fn axis() -> Self {
        Self {
            trigger: Some("axis".to_string()),
            ..Default::default()
        }
    }
    pub fn item() -> Self {
        Self {
            trigger: Some("item".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Legend {
    pub fn of(names: Vec<String>) -> Self {
        Self {
            data: names,
            top: Some("bottom".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
    Time,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_gap: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Axis {
    pub fn category(name: Option<String>, labels: Vec<String>) -> Self {
        Self {
            axis_type: AxisType::Category,
            name,
            data: Some(labels.into_iter().map(Value::String).collect()),
            boundary_gap: None,
            extra: Map::new(),
        }
    }
    pub fn value(name: Option<String>) -> Self {
        Self {
            axis_type: AxisType::Value,
            name,
            data: None,
            boundary_gap: None,
            extra: Map::new(),
        }
    }
    pub fn without_gap(mut self) -> Self {
        self.boundary_gap = Some(false);
        self
    }
}

/// One series entry. Every field is optional at the type level so that
/// externally produced configurations can be carried to the validator, which
/// is what guarantees `type` and `data` before rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Renderers accept any scalar here, so it is kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Series {
    pub fn new(kind: &str, data: Value) -> Self {
        Self {
            kind: Some(kind.to_string()),
            name: None,
            data: Some(data),
            options: Map::new(),
        }
    }

    /// A single zero-valued bar labelled "No data".
    pub fn placeholder() -> Self {
        Series::new("bar", json!([0])).named(PLACEHOLDER_LABEL)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(Value::String(name.into()));
        self
    }

    /// The series name when it is a string.
    pub fn label(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }

    /// The type tag, if present and non-blank.
    pub fn type_tag(&self) -> Option<&str> {
        self.kind.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesItem {
    Series(Series),
    Malformed(Value),
}

impl From<Series> for SeriesItem {
    fn from(series: Series) -> Self {
        SeriesItem::Series(series)
    }
}

impl SeriesItem {
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            SeriesItem::Series(series) => Some(series),
            SeriesItem::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarBlock {
    pub indicator: Vec<RadarIndicator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMap {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub calculable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallelAxis {
    pub dim: usize,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<AxisType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
}

/// Recorded whenever a builder renders a different kind than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub requested: ChartKind,
    pub rendered: ChartKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub title: Title,
    pub tooltip: Tooltip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    #[serde(default)]
    pub series: Vec<SeriesItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar: Option<RadarBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<VisualMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_axis: Option<Vec<ParallelAxis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitution: Option<Substitution>,
}

impl RenderConfig {
    pub fn new(title: impl Into<String>, tooltip: Tooltip) -> Self {
        Self {
            title: Title {
                text: title.into(),
                left: Some("center".to_string()),
                ..Default::default()
            },
            tooltip,
            color: default_palette(),
            ..Default::default()
        }
    }

    /// A chart showing only the "No data" placeholder bar.
    pub fn placeholder(title: impl Into<String>) -> Self {
        let mut config = RenderConfig::new(title, Tooltip::item());
        config.title.subtext = Some(PLACEHOLDER_LABEL.to_string());
        config.show_placeholder();
        config
    }

    /// Replaces the series with the placeholder bar and the axes it needs.
    pub fn show_placeholder(&mut self) {
        self.x_axis = Some(Axis::category(None, vec![PLACEHOLDER_LABEL.to_string()]));
        self.y_axis = Some(Axis::value(None));
        self.series = vec![Series::placeholder().into()];
    }

    pub fn push_series(&mut self, series: Series) {
        self.series.push(SeriesItem::Series(series));
    }

    /// Type tags of well-formed series, in order.
    pub fn series_types(&self) -> Vec<&str> {
        self.series
            .iter()
            .filter_map(SeriesItem::as_series)
            .filter_map(Series::type_tag)
            .collect()
    }

    pub fn is_placeholder(&self) -> bool {
        self.series.len() == 1
            && self.series[0]
                .as_series()
                .is_some_and(|s| s.label() == Some(PLACEHOLDER_LABEL))
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
