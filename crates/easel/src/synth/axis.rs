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

//! Builders drawn on a cartesian grid.

use super::{leading, value_range, Frame};
use crate::render::{Axis, Legend, RenderConfig, Series, VisualMap};
use crate::table::{cell_to_label, Column};
use serde_json::{json, Value};
use std::collections::HashMap;

fn numbers(column: &Column) -> Value {
    Value::from(column.numeric_values())
}

fn legend_for(columns: &[&Column]) -> Option<Legend> {
    (columns.len() > 1).then(|| Legend::of(columns.iter().map(|c| c.name.clone()).collect()))
}

fn single_name(columns: &[&Column]) -> Option<String> {
    match columns {
        [only] => Some(only.name.clone()),
        _ => None,
    }
}

pub(super) fn bar(frame: &Frame) -> Option<RenderConfig> {
    let summary = frame.summary();
    let x = frame.x_or(
        summary
            .string_columns
            .first()
            .or(summary.date_columns.first()),
    )?;
    let ys = frame.y_or(leading(&summary.numeric_columns, 1));
    if ys.is_empty() {
        return None;
    }

    let mut config = frame.base();
    config.x_axis = Some(Axis::category(Some(x.name.clone()), x.label_values()));
    config.y_axis = Some(Axis::value(single_name(&ys)));
    config.legend = legend_for(&ys);
    for y in ys {
        config.push_series(Series::new("bar", numbers(y)).named(y.name.clone()));
    }
    Some(config)
}

fn trend(frame: &Frame, stacked_area: bool) -> Option<RenderConfig> {
    let summary = frame.summary();
    let x = frame.x_or(
        summary
            .date_columns
            .first()
            .or(summary.string_columns.first()),
    )?;
    let ys = frame.y_or(leading(&summary.numeric_columns, 1));
    if ys.is_empty() {
        return None;
    }

    let mut config = frame.base();
    let mut x_axis = Axis::category(Some(x.name.clone()), x.label_values());
    if frame.kind.descriptor().has_any_tag(&["timeseries"]) {
        x_axis = x_axis.without_gap();
    }
    config.x_axis = Some(x_axis);
    config.y_axis = Some(Axis::value(single_name(&ys)));
    config.legend = legend_for(&ys);
    for y in ys {
        let mut series = Series::new("line", numbers(y))
            .named(y.name.clone())
            .with("smooth", json!(true));
        if stacked_area {
            series = series
                .with("areaStyle", json!({}))
                .with("stack", json!("total"));
        }
        config.push_series(series);
    }
    Some(config)
}

pub(super) fn line(frame: &Frame) -> Option<RenderConfig> {
    trend(frame, false)
}

pub(super) fn area(frame: &Frame) -> Option<RenderConfig> {
    trend(frame, true)
}

pub(super) fn scatter(frame: &Frame) -> Option<RenderConfig> {
    let numeric = &frame.summary().numeric_columns;
    let x = frame.x_or(numeric.first())?;
    let default_y: &[String] = numeric.get(1..).map(|rest| leading(rest, 1)).unwrap_or(&[]);
    // A y bound to the x column itself falls back to the next numeric column.
    let y = frame
        .y_or(default_y)
        .into_iter()
        .find(|column| column.name != x.name)
        .or_else(|| {
            numeric
                .iter()
                .filter(|name| **name != x.name)
                .find_map(|name| frame.lookup(name))
        })?;

    let xs = x.numeric_values();
    let ys = y.numeric_values();
    let mut config = frame.base();
    config.x_axis = Some(Axis::value(Some(x.name.clone())));
    config.y_axis = Some(Axis::value(Some(y.name.clone())));

    match frame.series_column() {
        Some(group) => {
            let mut order: Vec<String> = Vec::new();
            let mut points: HashMap<String, Vec<Value>> = HashMap::new();
            for ((label, px), py) in group.values.iter().map(cell_to_label).zip(&xs).zip(&ys) {
                if !points.contains_key(&label) {
                    order.push(label.clone());
                }
                points.entry(label).or_default().push(json!([px, py]));
            }
            config.legend = Some(Legend::of(order.clone()));
            for label in order {
                let data = points.remove(&label).unwrap_or_default();
                config.push_series(Series::new("scatter", Value::Array(data)).named(label));
            }
        }
        None => {
            let data: Vec<Value> = xs.iter().zip(&ys).map(|(px, py)| json!([px, py])).collect();
            config.push_series(
                Series::new("scatter", Value::Array(data))
                    .named(format!("{} vs {}", x.name, y.name))
                    .with("symbolSize", json!(10)),
            );
        }
    }
    Some(config)
}

pub(super) fn heatmap(frame: &Frame) -> Option<RenderConfig> {
    let summary = frame.summary();
    let x = frame.x_or(summary.string_columns.first())?;
    let ys = frame.y_or(&summary.numeric_columns);
    if ys.is_empty() {
        return None;
    }

    let mut cells = Vec::new();
    let mut values = Vec::new();
    for (yi, y) in ys.iter().enumerate() {
        for (xi, v) in y.numeric_values().into_iter().enumerate() {
            cells.push(json!([xi, yi, v]));
            values.push(v);
        }
    }
    let (min, max) = value_range(&values, frame.limits.fallback_max);

    let mut config = frame.base();
    config.x_axis = Some(Axis::category(Some(x.name.clone()), x.label_values()));
    config.y_axis = Some(Axis::category(
        None,
        ys.iter().map(|c| c.name.clone()).collect(),
    ));
    config.visual_map = Some(VisualMap {
        min,
        max,
        calculable: true,
        orient: Some("horizontal".to_string()),
        left: Some("center".to_string()),
        bottom: Some("0".to_string()),
    });
    config.push_series(
        Series::new("heatmap", Value::Array(cells))
            .named(frame.title.clone())
            .with("label", json!({"show": false})),
    );
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::super::{sample_table, synthesize, SynthesisLimits};
    use crate::catalog::ChartKind;
    use crate::render::AxisType;
    use crate::suggestion::ChartSuggestion;
    use serde_json::json;

    fn build(suggestion: ChartSuggestion) -> crate::render::RenderConfig {
        synthesize(&suggestion, &sample_table(), None, &SynthesisLimits::default())
    }

    #[test]
    fn bar_draws_one_series_per_y_column() {
        let config = build(
            ChartSuggestion::new(ChartKind::Bar, 85)
                .with_x_axis("Region")
                .with_y_axis(vec!["Sales".into(), "Profit".into()]),
        );
        assert_eq!(config.series.len(), 2);
        assert_eq!(config.legend.unwrap().data, vec!["Sales", "Profit"]);
        let x = config.x_axis.unwrap();
        assert_eq!(x.axis_type, AxisType::Category);
        assert_eq!(x.data.unwrap()[0], json!("North"));
        assert_eq!(
            config.series[1].as_series().unwrap().data,
            Some(json!([30.0, 12.0, 55.0, -5.0]))
        );
    }

    #[test]
    fn area_is_a_stacked_line_without_boundary_gap() {
        let config = build(ChartSuggestion::new(ChartKind::Area, 75));
        let series = config.series[0].as_series().unwrap();
        assert_eq!(series.type_tag(), Some("line"));
        assert_eq!(series.options["areaStyle"], json!({}));
        assert_eq!(series.options["stack"], json!("total"));
        let x = config.x_axis.unwrap();
        assert_eq!(x.name.as_deref(), Some("Day"));
        assert_eq!(x.boundary_gap, Some(false));
    }

    #[test]
    fn scatter_pairs_two_distinct_numeric_columns() {
        let config = build(ChartSuggestion::new(ChartKind::Scatter, 80));
        assert_eq!(config.x_axis.unwrap().name.as_deref(), Some("Sales"));
        assert_eq!(config.y_axis.unwrap().name.as_deref(), Some("Profit"));
        let data = config.series[0].as_series().unwrap().data.clone().unwrap();
        assert_eq!(data[0], json!([120.0, 30.0]));
    }

    #[test]
    fn scatter_with_y_bound_to_x_uses_another_numeric_column() {
        let config = build(
            ChartSuggestion::new(ChartKind::Scatter, 80)
                .with_x_axis("Profit")
                .with_y_axis(vec!["Profit".into()]),
        );
        assert!(!config.is_placeholder());
        assert_eq!(config.x_axis.unwrap().name.as_deref(), Some("Profit"));
        assert_eq!(config.y_axis.unwrap().name.as_deref(), Some("Sales"));
    }

    #[test]
    fn scatter_groups_by_series_column() {
        let config = build(
            ChartSuggestion::new(ChartKind::Scatter, 80)
                .with_x_axis("Sales")
                .with_y_axis(vec!["Profit".into()])
                .with_series(Some("Region".into())),
        );
        assert_eq!(config.series.len(), 3);
        assert_eq!(config.legend.unwrap().data, vec!["North", "South", "East"]);
        let north = config.series[0].as_series().unwrap();
        assert_eq!(north.data, Some(json!([[120.0, 30.0], [200.0, 55.0]])));
    }

    #[test]
    fn heatmap_maps_values_onto_a_visual_range() {
        let config = build(
            ChartSuggestion::new(ChartKind::Heatmap, 65)
                .with_x_axis("Product")
                .with_y_axis(vec!["Sales".into(), "Profit".into()]),
        );
        let vm = config.visual_map.unwrap();
        assert_eq!((vm.min, vm.max), (-5.0, 200.0));
        let data = config.series[0].as_series().unwrap().data.clone().unwrap();
        assert_eq!(data.as_array().unwrap().len(), 8);
        assert_eq!(data[4], json!([0, 1, 30.0]));
    }
}
