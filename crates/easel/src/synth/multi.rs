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

//! Multi-metric builders: radar, gauge and parallel coordinates.

use super::{leading, scale_max, value_range, Frame};
use crate::render::{
    AxisType, Legend, ParallelAxis, RadarBlock, RadarIndicator, RenderConfig, Series,
};
use crate::table::cell_to_label;
use serde_json::{json, Value};

pub(super) fn radar(frame: &Frame) -> Option<RenderConfig> {
    let summary = frame.summary();
    let metrics = frame.y_or(&summary.numeric_columns);
    if metrics.is_empty() {
        return None;
    }
    let labels = frame.x_or(summary.string_columns.first());
    let columns: Vec<Vec<f64>> = metrics.iter().map(|c| c.numeric_values()).collect();

    let indicator = metrics
        .iter()
        .zip(&columns)
        .map(|(column, values)| {
            let (_, max) = value_range(values, frame.limits.fallback_max);
            RadarIndicator {
                name: column.name.clone(),
                max: scale_max(Some(max), frame.limits.fallback_max),
            }
        })
        .collect();

    let rows = frame.table.row_count().min(frame.limits.radar_rows);
    let names: Vec<String> = (0..rows)
        .map(|i| match labels {
            Some(column) => cell_to_label(&column.values[i]),
            None => format!("Row {}", i + 1),
        })
        .collect();
    let data: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value: Vec<f64> = columns.iter().map(|values| values[i]).collect();
            json!({"name": name, "value": value})
        })
        .collect();

    let mut config = frame.base();
    config.legend = Some(Legend::of(names));
    config.radar = Some(RadarBlock {
        indicator,
        shape: None,
    });
    config.push_series(Series::new("radar", Value::Array(data)).named(frame.title.clone()));
    Some(config)
}

/// Mean of the first bound numeric column against its maximum.
pub(super) fn gauge(frame: &Frame) -> Option<RenderConfig> {
    let metric = frame
        .y_or(leading(&frame.summary().numeric_columns, 1))
        .into_iter()
        .next()?;
    let stats = metric.stats();
    let mean = stats.mean.unwrap_or(0.0);
    let max = scale_max(stats.max, frame.limits.fallback_max);
    let min = stats.min.filter(|m| *m < 0.0).unwrap_or(0.0);

    let mut config = frame.base();
    config.tooltip.formatter = Some("{b}: {c}".to_string());
    config.push_series(
        Series::new(
            "gauge",
            json!([{"name": metric.name, "value": (mean * 100.0).round() / 100.0}]),
        )
        .named(metric.name.clone())
        .with("min", json!(min))
        .with("max", json!(max))
        .with("detail", json!({"formatter": "{value}"})),
    );
    Some(config)
}

pub(super) fn parallel(frame: &Frame) -> Option<RenderConfig> {
    let dims = frame.y_or(&frame.summary().numeric_columns);
    if dims.is_empty() {
        return None;
    }
    let columns: Vec<Vec<f64>> = dims.iter().map(|c| c.numeric_values()).collect();

    let axes = dims
        .iter()
        .zip(&columns)
        .enumerate()
        .map(|(dim, (column, values))| {
            let (min, max) = value_range(values, frame.limits.fallback_max);
            ParallelAxis {
                dim,
                name: column.name.clone(),
                axis_type: Some(AxisType::Value),
                min: Some(min),
                max: Some(max),
                data: None,
            }
        })
        .collect();

    let rows = frame.table.row_count().min(frame.limits.parallel_rows);
    let lines: Vec<Value> = (0..rows)
        .map(|i| Value::from(columns.iter().map(|values| values[i]).collect::<Vec<f64>>()))
        .collect();

    let mut config = frame.base();
    config.parallel_axis = Some(axes);
    config.push_series(
        Series::new("parallel", Value::Array(lines))
            .named(frame.title.clone())
            .with("lineStyle", json!({"width": 1, "opacity": 0.5})),
    );
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::super::{sample_table, synthesize, SynthesisLimits};
    use crate::catalog::ChartKind;
    use crate::render::RenderConfig;
    use crate::suggestion::ChartSuggestion;
    use crate::table::{Column, ColumnType, Table};
    use serde_json::{json, Value};

    fn build(kind: ChartKind, table: &Table) -> RenderConfig {
        synthesize(
            &ChartSuggestion::new(kind, 50),
            table,
            None,
            &SynthesisLimits::default(),
        )
    }

    fn wide_table(rows: usize) -> Table {
        Table::new(vec![
            Column::new(
                "label",
                ColumnType::String,
                (0..rows).map(|i| json!(format!("r{i}"))).collect(),
            ),
            Column::new("a", ColumnType::Number, (0..rows).map(|i| json!(i)).collect()),
            Column::new("b", ColumnType::Number, (0..rows).map(|i| json!(i * 2)).collect()),
        ])
    }

    #[test]
    fn parallel_caps_rows_and_spans_each_axis() {
        let config = build(ChartKind::Parallel, &wide_table(120));
        let axes = config.parallel_axis.unwrap();
        assert_eq!(axes.len(), 2);
        assert_eq!((axes[1].min, axes[1].max), (Some(0.0), Some(238.0)));
        let lines = config.series[0].as_series().unwrap().data.clone().unwrap();
        assert_eq!(lines.as_array().unwrap().len(), 50);
        assert_eq!(lines[3], json!([3.0, 6.0]));
    }

    #[test]
    fn radar_caps_rows_and_labels_them() {
        let config = build(ChartKind::Radar, &wide_table(9));
        let data = config.series[0].as_series().unwrap().data.clone().unwrap();
        assert_eq!(data.as_array().unwrap().len(), 5);
        assert_eq!(data[0]["name"], json!("r0"));
        let radar = config.radar.unwrap();
        assert_eq!(radar.indicator[0].max, 8.0);
        assert_eq!(radar.indicator[1].max, 16.0);
    }

    #[test]
    fn radar_indicator_falls_back_when_column_has_no_positive_max() {
        let table = Table::new(vec![Column::new(
            "zeros",
            ColumnType::Number,
            vec![json!("n/a"), Value::Null],
        )]);
        let config = build(ChartKind::Radar, &table);
        assert_eq!(config.radar.unwrap().indicator[0].max, 100.0);
        let data = config.series[0].as_series().unwrap().data.clone().unwrap();
        assert_eq!(data[0]["name"], json!("Row 1"));
    }

    #[test]
    fn gauge_shows_the_mean_against_the_column_max() {
        let config = build(ChartKind::Gauge, &sample_table());
        let series = config.series[0].as_series().unwrap();
        assert_eq!(series.data.as_ref().unwrap()[0]["value"], json!(115.0));
        assert_eq!(series.options["max"], json!(200.0));
    }

    #[test]
    fn gauge_without_finite_values_uses_the_fallback_scale() {
        let table = Table::new(vec![Column::new(
            "score",
            ColumnType::Number,
            vec![Value::Null, json!("?")],
        )]);
        let config = build(ChartKind::Gauge, &table);
        let series = config.series[0].as_series().unwrap();
        assert_eq!(series.options["max"], json!(100.0));
        assert_eq!(series.data.as_ref().unwrap()[0]["value"], json!(0.0));
    }
}
