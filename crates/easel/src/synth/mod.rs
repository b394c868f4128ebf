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

//! Turns one chosen suggestion plus its table into a render configuration.
//!
//! Dispatch goes through a registry from chart kind to builder. Kinds whose
//! real data shape cannot be recovered from a flat table are delegated to a
//! compatible builder and the substitution is recorded on the output. A
//! builder that cannot resolve its columns yields the placeholder chart, so
//! synthesis itself never fails.

mod axis;
mod multi;
mod part;

use crate::catalog::ChartKind;
use crate::render::{RenderConfig, Substitution, Tooltip};
use crate::suggestion::ChartSuggestion;
use crate::table::{Column, DataSummary, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

fn default_parallel_rows() -> usize {
    50
}
fn default_radar_rows() -> usize {
    5
}
fn default_fallback_max() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisLimits {
    /// Rows drawn as lines on parallel coordinates.
    #[serde(default = "default_parallel_rows")]
    pub parallel_rows: usize,
    /// Rows drawn as polygons on a radar.
    #[serde(default = "default_radar_rows")]
    pub radar_rows: usize,
    /// Upper bound used when a range has no finite values to derive it from.
    #[serde(default = "default_fallback_max")]
    pub fallback_max: f64,
}

impl Default for SynthesisLimits {
    fn default() -> Self {
        Self {
            parallel_rows: default_parallel_rows(),
            radar_rows: default_radar_rows(),
            fallback_max: default_fallback_max(),
        }
    }
}

impl SynthesisLimits {
    pub fn validate(&self) -> Result<(), String> {
        if self.parallel_rows == 0 || self.radar_rows == 0 {
            return Err("row caps must be at least 1".into());
        }
        if !self.fallback_max.is_finite() || self.fallback_max <= 0.0 {
            return Err(format!(
                "fallback_max must be a positive number, got {}",
                self.fallback_max
            ));
        }
        Ok(())
    }
}

/// Kinds rendered through another builder.
const SUBSTITUTIONS: [(ChartKind, ChartKind); 5] = [
    (ChartKind::Sankey, ChartKind::Bar),
    (ChartKind::Graph, ChartKind::Scatter),
    (ChartKind::Boxplot, ChartKind::Bar),
    (ChartKind::Candlestick, ChartKind::Line),
    (ChartKind::ThemeRiver, ChartKind::Area),
];

type Builder = fn(&Frame<'_>) -> Option<RenderConfig>;

const BUILDERS: [(ChartKind, Builder); 13] = [
    (ChartKind::Bar, axis::bar),
    (ChartKind::Line, axis::line),
    (ChartKind::Area, axis::area),
    (ChartKind::Scatter, axis::scatter),
    (ChartKind::Heatmap, axis::heatmap),
    (ChartKind::Pie, part::pie),
    (ChartKind::Funnel, part::funnel),
    (ChartKind::Treemap, part::treemap),
    (ChartKind::Tree, part::tree),
    (ChartKind::Sunburst, part::sunburst),
    (ChartKind::Radar, multi::radar),
    (ChartKind::Gauge, multi::gauge),
    (ChartKind::Parallel, multi::parallel),
];

/// The kind actually drawn for `requested`.
pub fn rendered_kind(requested: ChartKind) -> ChartKind {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == requested)
        .map(|(_, to)| *to)
        .unwrap_or(requested)
}

fn builder_for(kind: ChartKind) -> Option<Builder> {
    BUILDERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, builder)| *builder)
}

pub fn synthesize(
    suggestion: &ChartSuggestion,
    table: &Table,
    title_override: Option<&str>,
    limits: &SynthesisLimits,
) -> RenderConfig {
    let requested = suggestion.kind;
    let rendered = rendered_kind(requested);
    if rendered != requested {
        warn!(
            requested = %requested,
            rendered = %rendered,
            "chart type has no flat-table builder; substituting"
        );
    }

    let frame = Frame::new(suggestion, table, title_override, limits, rendered);
    let built = if table.is_empty() {
        None
    } else {
        builder_for(rendered).and_then(|build| build(&frame))
    };

    let mut config = match built {
        Some(config) => config,
        None => {
            warn!(
                chart_type = %requested,
                rows = table.row_count(),
                "required columns could not be resolved; rendering placeholder"
            );
            RenderConfig::placeholder(frame.title.clone())
        }
    };
    if rendered != requested {
        config.substitution = Some(Substitution {
            requested,
            rendered,
        });
    }
    debug!(chart_type = %requested, series = config.series.len(), "synthesised configuration");
    config
}

/// Everything a builder reads: the suggestion's bindings, the table and the
/// caps.
pub(crate) struct Frame<'a> {
    suggestion: &'a ChartSuggestion,
    table: &'a Table,
    limits: &'a SynthesisLimits,
    kind: ChartKind,
    title: String,
}

impl<'a> Frame<'a> {
    fn new(
        suggestion: &'a ChartSuggestion,
        table: &'a Table,
        title_override: Option<&str>,
        limits: &'a SynthesisLimits,
        kind: ChartKind,
    ) -> Self {
        let title = title_override
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .or_else(|| (!suggestion.title.trim().is_empty()).then(|| suggestion.title.clone()))
            .unwrap_or_else(|| suggestion.kind.descriptor().label.to_string());
        Self {
            suggestion,
            table,
            limits,
            kind,
            title,
        }
    }

    fn summary(&self) -> &'a DataSummary {
        self.table.summary()
    }

    fn lookup(&self, name: &str) -> Option<&'a Column> {
        self.table.column(name)
    }

    /// Explicit x binding if the table has it, else the positional default.
    fn x_or(&self, fallback: Option<&String>) -> Option<&'a Column> {
        self.suggestion
            .x_axis
            .as_deref()
            .and_then(|name| self.lookup(name))
            .or_else(|| fallback.and_then(|name| self.lookup(name)))
    }

    /// Explicit y bindings that exist in the table; if none do, the defaults.
    fn y_or(&self, fallback: &[String]) -> Vec<&'a Column> {
        let explicit: Vec<&'a Column> = self
            .suggestion
            .y_columns()
            .iter()
            .filter_map(|name| self.lookup(name))
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }
        fallback.iter().filter_map(|name| self.lookup(name)).collect()
    }

    fn series_column(&self) -> Option<&'a Column> {
        self.suggestion
            .series
            .as_deref()
            .and_then(|name| self.lookup(name))
    }

    fn base(&self) -> RenderConfig {
        let tooltip = if self.kind.descriptor().cartesian {
            Tooltip::axis()
        } else {
            Tooltip::item()
        };
        RenderConfig::new(self.title.clone(), tooltip)
    }
}

fn leading(names: &[String], n: usize) -> &[String] {
    &names[..n.min(names.len())]
}

/// (min, max) over the values; `(0, fallback_max)` when there are none.
pub(crate) fn value_range(values: &[f64], fallback_max: f64) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, fallback_max)
    }
}

/// Scale upper bound for gauges and radar indicators. A missing or
/// non-positive maximum cannot bound a scale that starts at zero.
pub(crate) fn scale_max(max: Option<f64>, fallback_max: f64) -> f64 {
    match max {
        Some(m) if m.is_finite() && m > 0.0 => m,
        _ => fallback_max,
    }
}

/// Sums `values` per distinct label in order of first appearance. Without a
/// value column each row counts as 1.
pub(crate) fn aggregate(labels: &Column, values: Option<&Column>) -> Vec<(String, f64)> {
    let weights: Vec<f64> = match values {
        Some(column) => column.numeric_values(),
        None => vec![1.0; labels.values.len()],
    };
    let mut order: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (label, weight) in labels.label_values().into_iter().zip(weights) {
        match index.get(&label) {
            Some(&i) => order[i].1 += weight,
            None => {
                index.insert(label.clone(), order.len());
                order.push((label, weight));
            }
        }
    }
    order
}

#[cfg(test)]
fn sample_table() -> Table {
    use crate::table::ColumnType;
    use serde_json::json;
    Table::from_rows(
        &[
            ("Region", ColumnType::String),
            ("Product", ColumnType::String),
            ("Day", ColumnType::Date),
            ("Sales", ColumnType::Number),
            ("Profit", ColumnType::Number),
            ("Units", ColumnType::Number),
        ],
        vec![
            vec![json!("North"), json!("A"), json!("2024-01-01"), json!(120), json!(30), json!(4)],
            vec![json!("South"), json!("B"), json!("2024-01-02"), json!(80), json!(12), json!(2)],
            vec![json!("North"), json!("C"), json!("2024-01-03"), json!(200), json!(55), json!(9)],
            vec![json!("East"), json!("A"), json!("2024-01-04"), json!(60), json!(-5), json!(1)],
        ],
    )
}
