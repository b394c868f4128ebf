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

//! Rule-based local suggestions. Every rule is independent; a table may
//! trigger none, some or all of them.

use crate::catalog::ChartKind;
use crate::patterns::DataPatterns;
use crate::suggestion::ChartSuggestion;
use crate::table::{DataSummary, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Baseline confidences per rule and the bonus applied to enhanced entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRules {
    #[serde(default = "default_bar")]
    pub bar: u8,
    #[serde(default = "default_line")]
    pub line: u8,
    #[serde(default = "default_pie")]
    pub pie: u8,
    #[serde(default = "default_scatter")]
    pub scatter: u8,
    #[serde(default = "default_area")]
    pub area: u8,
    #[serde(default = "default_radar")]
    pub radar: u8,
    #[serde(default = "default_heatmap")]
    pub heatmap: u8,
    #[serde(default = "default_enhanced_bonus")]
    pub enhanced_bonus: u8,
}

fn default_bar() -> u8 {
    85
}
fn default_line() -> u8 {
    90
}
fn default_pie() -> u8 {
    70
}
fn default_scatter() -> u8 {
    80
}
fn default_area() -> u8 {
    75
}
fn default_radar() -> u8 {
    75
}
fn default_heatmap() -> u8 {
    65
}
fn default_enhanced_bonus() -> u8 {
    15
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            bar: default_bar(),
            line: default_line(),
            pie: default_pie(),
            scatter: default_scatter(),
            area: default_area(),
            radar: default_radar(),
            heatmap: default_heatmap(),
            enhanced_bonus: default_enhanced_bonus(),
        }
    }
}

impl SuggestionRules {
    pub fn validate(&self) -> Result<(), String> {
        let baselines = [
            ("bar", self.bar),
            ("line", self.line),
            ("pie", self.pie),
            ("scatter", self.scatter),
            ("area", self.area),
            ("radar", self.radar),
            ("heatmap", self.heatmap),
        ];
        for (name, value) in baselines {
            if value > 100 {
                return Err(format!("{name} baseline must be between 0 and 100"));
            }
        }
        if self.enhanced_bonus > 100 {
            return Err("enhanced_bonus must be between 0 and 100".to_string());
        }
        Ok(())
    }

    pub fn baseline(&self, kind: ChartKind) -> Option<u8> {
        match kind {
            ChartKind::Bar => Some(self.bar),
            ChartKind::Line => Some(self.line),
            ChartKind::Pie => Some(self.pie),
            ChartKind::Scatter => Some(self.scatter),
            ChartKind::Area => Some(self.area),
            ChartKind::Radar => Some(self.radar),
            ChartKind::Heatmap => Some(self.heatmap),
            _ => None,
        }
    }

    /// Confidence for an enhanced entry: the service's own score (or the
    /// local baseline, or 50) plus the bonus, capped at 100.
    pub fn enhanced_confidence(&self, kind: ChartKind, reported: Option<f64>) -> u8 {
        let base = reported
            .filter(|c| c.is_finite())
            .map(|c| if c <= 1.0 { c * 100.0 } else { c })
            .unwrap_or_else(|| f64::from(self.baseline(kind).unwrap_or(50)));
        (base.round() + f64::from(self.enhanced_bonus)).clamp(0.0, 100.0) as u8
    }
}

struct Rule {
    kind: ChartKind,
    applies: fn(&DataPatterns) -> bool,
    build: fn(&DataSummary, u8) -> ChartSuggestion,
}

const RULES: [Rule; 7] = [
    Rule {
        kind: ChartKind::Bar,
        applies: categorical_with_numeric,
        build: category_comparison,
    },
    Rule {
        kind: ChartKind::Line,
        applies: temporal_with_numeric,
        build: time_trend,
    },
    Rule {
        kind: ChartKind::Pie,
        applies: categorical_with_numeric,
        build: proportion,
    },
    Rule {
        kind: ChartKind::Scatter,
        applies: two_numeric,
        build: correlation,
    },
    Rule {
        kind: ChartKind::Area,
        applies: temporal_with_numeric,
        build: cumulative_timeline,
    },
    Rule {
        kind: ChartKind::Radar,
        applies: three_numeric,
        build: multi_metric,
    },
    Rule {
        kind: ChartKind::Heatmap,
        applies: two_numeric_with_categorical,
        build: dense_pattern,
    },
];

fn categorical_with_numeric(p: &DataPatterns) -> bool {
    p.has_categorical && p.has_numeric
}
fn temporal_with_numeric(p: &DataPatterns) -> bool {
    p.has_temporal && p.has_numeric
}
fn two_numeric(p: &DataPatterns) -> bool {
    p.numeric_count >= 2
}
fn three_numeric(p: &DataPatterns) -> bool {
    p.numeric_count >= 3
}
fn two_numeric_with_categorical(p: &DataPatterns) -> bool {
    p.numeric_count >= 2 && p.has_categorical
}

pub fn generate_local_suggestions(table: &Table, rules: &SuggestionRules) -> Vec<ChartSuggestion> {
    let summary = table.summary();
    let patterns = DataPatterns::from_summary(summary);
    let suggestions: Vec<ChartSuggestion> = RULES
        .iter()
        .filter(|rule| (rule.applies)(&patterns))
        .filter_map(|rule| {
            let confidence = rules.baseline(rule.kind)?;
            Some((rule.build)(summary, confidence))
        })
        .collect();
    debug!(
        patterns = %patterns.describe(),
        count = suggestions.len(),
        "Generated local chart suggestions"
    );
    suggestions
}

fn first(names: &[String]) -> String {
    names.first().cloned().unwrap_or_default()
}

fn category_comparison(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let (x, y) = (first(&s.string_columns), first(&s.numeric_columns));
    ChartSuggestion::new(ChartKind::Bar, confidence)
        .with_title(format!("{y} by {x}"))
        .with_reasoning(format!(
            "'{x}' is categorical and '{y}' is numeric, so bars compare {y} across each {x}."
        ))
        .with_x_axis(x)
        .with_y_axis(vec![y])
}

fn time_trend(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let (x, y) = (first(&s.date_columns), first(&s.numeric_columns));
    ChartSuggestion::new(ChartKind::Line, confidence)
        .with_title(format!("{y} over {x}"))
        .with_reasoning(format!(
            "'{x}' holds dates, so a line shows how '{y}' trends over time."
        ))
        .with_x_axis(x)
        .with_y_axis(vec![y])
}

fn proportion(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let (x, y) = (first(&s.string_columns), first(&s.numeric_columns));
    ChartSuggestion::new(ChartKind::Pie, confidence)
        .with_title(format!("Share of {y} by {x}"))
        .with_reasoning(format!(
            "Summing '{y}' per '{x}' shows each category's share of the total."
        ))
        .with_x_axis(x)
        .with_y_axis(vec![y])
}

fn correlation(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let x = first(&s.numeric_columns);
    let y = s.numeric_columns.get(1).cloned().unwrap_or_default();
    ChartSuggestion::new(ChartKind::Scatter, confidence)
        .with_title(format!("{y} vs {x}"))
        .with_reasoning(format!(
            "Two numeric columns ('{x}', '{y}') can be plotted against each other \
             to reveal correlation."
        ))
        .with_x_axis(x)
        .with_y_axis(vec![y])
        .with_series(s.string_columns.first().cloned())
}

fn cumulative_timeline(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let (x, y) = (first(&s.date_columns), first(&s.numeric_columns));
    ChartSuggestion::new(ChartKind::Area, confidence)
        .with_title(format!("Cumulative {y} over {x}"))
        .with_reasoning(format!(
            "Filling under '{y}' along '{x}' emphasises volume accumulated over time."
        ))
        .with_x_axis(x)
        .with_y_axis(vec![y])
}

fn multi_metric(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let metrics: Vec<String> = s.numeric_columns.iter().take(3).cloned().collect();
    let mut suggestion = ChartSuggestion::new(ChartKind::Radar, confidence)
        .with_title("Multi-metric profile")
        .with_reasoning(format!(
            "{} numeric columns can be compared side by side on radial axes.",
            s.numeric_columns.len()
        ))
        .with_y_axis(metrics);
    if let Some(label) = s.string_columns.first() {
        suggestion = suggestion.with_x_axis(label.clone());
    }
    suggestion
}

fn dense_pattern(s: &DataSummary, confidence: u8) -> ChartSuggestion {
    let x = first(&s.string_columns);
    let y: Vec<String> = s.numeric_columns.iter().take(2).cloned().collect();
    ChartSuggestion::new(ChartKind::Heatmap, confidence)
        .with_title(format!("Metric intensity by {x}"))
        .with_reasoning(format!(
            "A colour grid of '{x}' against its numeric columns surfaces dense patterns."
        ))
        .with_x_axis(x)
        .with_y_axis(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;
    use serde_json::json;

    fn kinds(suggestions: &[ChartSuggestion]) -> Vec<ChartKind> {
        suggestions.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn product_sales_yields_bar_and_pie() {
        let table = Table::from_rows(
            &[("Product", ColumnType::String), ("Sales", ColumnType::Number)],
            vec![vec![json!("A"), json!(10)], vec![json!("B"), json!(20)]],
        );
        let out = generate_local_suggestions(&table, &SuggestionRules::default());
        assert_eq!(kinds(&out), vec![ChartKind::Bar, ChartKind::Pie]);
        assert_eq!(out[0].confidence, 85);
        assert_eq!(out[0].x_axis.as_deref(), Some("Product"));
        assert_eq!(out[0].y_axis, Some(vec!["Sales".to_string()]));
        assert_eq!(out[1].confidence, 70);
    }

    #[test]
    fn interleaved_columns_bind_first_of_each_kind() {
        let table = Table::from_rows(
            &[
                ("N1", ColumnType::Number),
                ("S1", ColumnType::String),
                ("N2", ColumnType::Number),
                ("S2", ColumnType::String),
            ],
            vec![vec![json!(1), json!("a"), json!(2), json!("b")]],
        );
        let out = generate_local_suggestions(&table, &SuggestionRules::default());
        assert_eq!(
            kinds(&out),
            [ChartKind::Bar, ChartKind::Pie, ChartKind::Scatter, ChartKind::Heatmap]
        );
        for categorical in &out[..2] {
            assert_eq!(categorical.x_axis.as_deref(), Some("S1"));
            assert_eq!(categorical.y_columns(), ["N1"]);
        }
        let scatter = &out[2];
        assert_eq!(scatter.x_axis.as_deref(), Some("N1"));
        assert_eq!(scatter.y_columns(), ["N2"]);
        assert_eq!(scatter.series.as_deref(), Some("S1"));
        assert_eq!(out[3].x_axis.as_deref(), Some("S1"));
        assert_eq!(out[3].y_columns(), ["N1", "N2"]);
    }

    #[test]
    fn only_strings_yields_nothing() {
        let table = Table::from_rows(
            &[("a", ColumnType::String), ("b", ColumnType::String)],
            vec![vec![json!("x"), json!("y")]],
        );
        assert!(generate_local_suggestions(&table, &SuggestionRules::default()).is_empty());
    }

    #[test]
    fn rich_table_triggers_every_rule() {
        let table = Table::from_rows(
            &[
                ("Region", ColumnType::String),
                ("When", ColumnType::Date),
                ("Revenue", ColumnType::Number),
                ("Cost", ColumnType::Number),
                ("Units", ColumnType::Number),
            ],
            vec![vec![json!("N"), json!("2024-01-01"), json!(1), json!(2), json!(3)]],
        );
        let out = generate_local_suggestions(&table, &SuggestionRules::default());
        assert_eq!(
            kinds(&out),
            vec![
                ChartKind::Bar,
                ChartKind::Line,
                ChartKind::Pie,
                ChartKind::Scatter,
                ChartKind::Area,
                ChartKind::Radar,
                ChartKind::Heatmap,
            ]
        );
        let scatter = &out[3];
        assert_eq!(scatter.x_axis.as_deref(), Some("Revenue"));
        assert_eq!(scatter.y_axis, Some(vec!["Cost".to_string()]));
        assert_eq!(scatter.series.as_deref(), Some("Region"));
        let line = &out[1];
        assert_eq!(line.x_axis.as_deref(), Some("When"));
        assert_eq!(out[5].y_columns(), ["Revenue", "Cost", "Units"]);
    }

    #[test]
    fn baselines_are_configurable() {
        let table = Table::from_rows(
            &[("p", ColumnType::String), ("v", ColumnType::Number)],
            vec![vec![json!("a"), json!(1)]],
        );
        let rules = SuggestionRules {
            bar: 40,
            ..Default::default()
        };
        let out = generate_local_suggestions(&table, &rules);
        assert_eq!(out[0].confidence, 40);
    }

    #[test]
    fn enhanced_confidence_applies_bonus_and_caps() {
        let rules = SuggestionRules::default();
        assert_eq!(rules.enhanced_confidence(ChartKind::Bar, Some(70.0)), 85);
        assert_eq!(rules.enhanced_confidence(ChartKind::Bar, Some(0.9)), 100);
        assert_eq!(rules.enhanced_confidence(ChartKind::Bar, None), 100);
        assert_eq!(rules.enhanced_confidence(ChartKind::Gauge, None), 65);
        assert_eq!(rules.enhanced_confidence(ChartKind::Gauge, Some(f64::NAN)), 65);
    }

    #[test]
    fn validate_rejects_out_of_range_baselines() {
        let rules = SuggestionRules {
            pie: 101,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
        assert!(SuggestionRules::default().validate().is_ok());
    }
}
