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

//! Part-of-whole and hierarchy builders. All of them aggregate a numeric
//! column by category.

use super::{aggregate, leading, Frame};
use crate::render::{Legend, RenderConfig, Series};
use crate::table::{cell_to_label, Column};
use serde_json::{json, Value};
use std::collections::HashMap;

/// The category column and the value column it is summed over.
fn category_and_value<'a>(frame: &Frame<'a>) -> Option<(&'a Column, &'a Column)> {
    let summary = frame.summary();
    let label = frame.x_or(summary.string_columns.first())?;
    let value = frame
        .y_or(leading(&summary.numeric_columns, 1))
        .into_iter()
        .next()?;
    Some((label, value))
}

fn name_value(items: &[(String, f64)]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|(name, value)| json!({"name": name, "value": value}))
            .collect(),
    )
}

pub(super) fn pie(frame: &Frame) -> Option<RenderConfig> {
    let (label, value) = category_and_value(frame)?;
    let items = aggregate(label, Some(value));

    let mut config = frame.base();
    let mut legend = Legend::of(items.iter().map(|(name, _)| name.clone()).collect());
    legend.orient = Some("vertical".to_string());
    legend.top = None;
    legend.left = Some("left".to_string());
    config.legend = Some(legend);
    config.push_series(
        Series::new("pie", name_value(&items))
            .named(value.name.clone())
            .with("radius", json!(["40%", "70%"]))
            .with("avoidLabelOverlap", json!(true)),
    );
    Some(config)
}

pub(super) fn funnel(frame: &Frame) -> Option<RenderConfig> {
    let (label, value) = category_and_value(frame)?;
    let mut items = aggregate(label, Some(value));
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut config = frame.base();
    config.legend = Some(Legend::of(items.iter().map(|(name, _)| name.clone()).collect()));
    config.push_series(
        Series::new("funnel", name_value(&items))
            .named(value.name.clone())
            .with("sort", json!("descending"))
            .with("left", json!("10%"))
            .with("width", json!("80%")),
    );
    Some(config)
}

pub(super) fn treemap(frame: &Frame) -> Option<RenderConfig> {
    let (label, value) = category_and_value(frame)?;
    let items = aggregate(label, Some(value));

    let mut config = frame.base();
    config.push_series(
        Series::new("treemap", name_value(&items))
            .named(value.name.clone())
            .with("roam", json!(false)),
    );
    Some(config)
}

pub(super) fn tree(frame: &Frame) -> Option<RenderConfig> {
    let (label, value) = category_and_value(frame)?;
    let items = aggregate(label, Some(value));
    let root = json!({
        "name": value.name,
        "children": name_value(&items),
    });

    let mut config = frame.base();
    config.push_series(
        Series::new("tree", json!([root]))
            .named(label.name.clone())
            .with("layout", json!("orthogonal"))
            .with("expandAndCollapse", json!(true))
            .with("initialTreeDepth", json!(1)),
    );
    Some(config)
}

/// Two rings: the first category column, then a second category column when
/// the table has one. Rows are counted when there is no numeric column.
pub(super) fn sunburst(frame: &Frame) -> Option<RenderConfig> {
    let summary = frame.summary();
    let outer = frame.x_or(summary.string_columns.first())?;
    let inner = frame.series_column().filter(|c| c.name != outer.name).or_else(|| {
        summary
            .string_columns
            .iter()
            .find(|name| **name != outer.name)
            .and_then(|name| frame.lookup(name))
    });
    let value = frame
        .y_or(leading(&summary.numeric_columns, 1))
        .into_iter()
        .next();

    let data = match inner {
        None => name_value(&aggregate(outer, value)),
        Some(inner) => {
            let weights = match value {
                Some(column) => column.numeric_values(),
                None => vec![1.0; outer.values.len()],
            };
            let mut order: Vec<String> = Vec::new();
            let mut children: HashMap<String, Vec<(String, f64)>> = HashMap::new();
            for ((parent, child), weight) in outer
                .values
                .iter()
                .map(cell_to_label)
                .zip(inner.values.iter().map(cell_to_label))
                .zip(weights)
            {
                let leaves = children.entry(parent.clone()).or_insert_with(|| {
                    order.push(parent.clone());
                    Vec::new()
                });
                match leaves.iter_mut().find(|(name, _)| *name == child) {
                    Some(leaf) => leaf.1 += weight,
                    None => leaves.push((child, weight)),
                }
            }
            Value::Array(
                order
                    .into_iter()
                    .map(|parent| {
                        let leaves = children.remove(&parent).unwrap_or_default();
                        json!({"name": parent, "children": name_value(&leaves)})
                    })
                    .collect(),
            )
        }
    };

    let mut config = frame.base();
    config.push_series(
        Series::new("sunburst", data)
            .named(outer.name.clone())
            .with("radius", json!(["0", "90%"])),
    );
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::super::{sample_table, synthesize, SynthesisLimits};
    use crate::catalog::ChartKind;
    use crate::suggestion::ChartSuggestion;
    use crate::table::{ColumnType, Table};
    use serde_json::json;

    fn data_of(kind: ChartKind, table: &Table) -> serde_json::Value {
        let config = synthesize(
            &ChartSuggestion::new(kind, 50),
            table,
            None,
            &SynthesisLimits::default(),
        );
        config.series[0].as_series().unwrap().data.clone().unwrap()
    }

    #[test]
    fn pie_sums_values_per_category() {
        let data = data_of(ChartKind::Pie, &sample_table());
        assert_eq!(
            data,
            json!([
                {"name": "North", "value": 320.0},
                {"name": "South", "value": 80.0},
                {"name": "East", "value": 60.0}
            ])
        );
    }

    #[test]
    fn funnel_is_sorted_descending() {
        let table = Table::from_rows(
            &[("Stage", ColumnType::String), ("Users", ColumnType::Number)],
            vec![
                vec![json!("Signup"), json!(40)],
                vec![json!("Visit"), json!(100)],
                vec![json!("Buy"), json!(5)],
            ],
        );
        let data = data_of(ChartKind::Funnel, &table);
        let names: Vec<_> = data
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Visit", "Signup", "Buy"]);
    }

    #[test]
    fn tree_has_one_leaf_per_category() {
        let data = data_of(ChartKind::Tree, &sample_table());
        assert_eq!(data[0]["name"], json!("Sales"));
        assert_eq!(data[0]["children"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn sunburst_nests_the_second_category_column() {
        let data = data_of(ChartKind::Sunburst, &sample_table());
        assert_eq!(data[0]["name"], json!("North"));
        assert_eq!(
            data[0]["children"],
            json!([
                {"name": "A", "value": 120.0},
                {"name": "C", "value": 200.0}
            ])
        );
    }

    #[test]
    fn sunburst_counts_rows_without_a_numeric_column() {
        let table = Table::from_rows(
            &[("Team", ColumnType::String)],
            vec![vec![json!("x")], vec![json!("y")], vec![json!("x")]],
        );
        let data = data_of(ChartKind::Sunburst, &table);
        assert_eq!(
            data,
            json!([{"name": "x", "value": 2.0}, {"name": "y", "value": 1.0}])
        );
    }
}
