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

use easel::render::PLACEHOLDER_LABEL;
use easel::{
    ChartAdvisor, ChartKind, ChartSuggestion, ColumnType, EaselConfig, EnhancementClient, Table,
};
use easel_contracts::EnhancementConfig;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

fn product_sales() -> Table {
    Table::from_rows(
        &[("Product", ColumnType::String), ("Sales", ColumnType::Number)],
        vec![
            vec![json!("A"), json!(10)],
            vec![json!("B"), json!(20)],
            vec![json!("C"), json!(15)],
        ],
    )
}

fn kinds(suggestions: &[ChartSuggestion]) -> Vec<ChartKind> {
    suggestions.iter().map(|s| s.kind).collect()
}

#[test]
fn test_category_and_measure_yield_bar_then_pie() {
    let advisor = ChartAdvisor::default();
    let suggestions = advisor.local_suggestions(&product_sales());
    assert_eq!(kinds(&suggestions), [ChartKind::Bar, ChartKind::Pie]);

    let bar = &suggestions[0];
    assert_eq!(bar.confidence, 85);
    assert_eq!(bar.x_axis.as_deref(), Some("Product"));
    assert_eq!(bar.y_columns(), ["Sales"]);

    let pie = &suggestions[1];
    assert_eq!(pie.confidence, 70);
    assert_eq!(pie.x_axis.as_deref(), Some("Product"));
}

#[test]
fn test_string_only_table_yields_nothing() {
    let table = Table::from_rows(
        &[("Name", ColumnType::String), ("City", ColumnType::String)],
        vec![vec![json!("Ada"), json!("London")]],
    );
    assert!(ChartAdvisor::default().local_suggestions(&table).is_empty());
}

#[test]
fn test_radar_without_numeric_columns_renders_placeholder() {
    let table = Table::from_rows(
        &[("Name", ColumnType::String)],
        vec![vec![json!("Ada")], vec![json!("Grace")]],
    );
    let advisor = ChartAdvisor::default();
    let suggestion = ChartSuggestion::new(ChartKind::Radar, 75);
    let config = advisor.configure_locally(&suggestion, &table, None);
    assert_eq!(config.series.len(), 1);
    let series = config.series[0].as_series().unwrap();
    assert_eq!(series.type_tag(), Some("bar"));
    assert_eq!(series.label(), Some(PLACEHOLDER_LABEL));
    assert_eq!(series.data, Some(json!([0])));
}

#[tokio::test]
async fn test_unavailable_enhancement_matches_local_output() {
    let config = EaselConfig {
        enhancement: EnhancementConfig::enabled_at("http://127.0.0.1:9"),
        ..Default::default()
    };
    let advisor = ChartAdvisor::new(config);
    assert!(!advisor.initialize().await);

    let table = product_sales();
    let local: HashSet<_> = kinds(&advisor.local_suggestions(&table)).into_iter().collect();
    let enhanced = advisor.client().generate_enhanced_suggestions(&table).await;
    assert_eq!(kinds(&enhanced).into_iter().collect::<HashSet<_>>(), local);
    assert!(enhanced.iter().all(|s| s.ai_enhanced.is_none()));

    let ranked = advisor.suggest(Arc::new(table)).await;
    assert_eq!(kinds(&ranked), [ChartKind::Bar, ChartKind::Pie]);
}

#[test]
fn test_numeric_pairs_bind_scatter_axes() {
    let table = Table::from_rows(
        &[
            ("Height", ColumnType::Number),
            ("Weight", ColumnType::Number),
            ("Age", ColumnType::Number),
        ],
        vec![vec![json!(180), json!(80), json!(31)]],
    );
    let suggestions = ChartAdvisor::default().local_suggestions(&table);
    let scatter = suggestions
        .iter()
        .find(|s| s.kind == ChartKind::Scatter)
        .unwrap();
    assert_eq!(scatter.x_axis.as_deref(), Some("Height"));
    assert_eq!(scatter.y_columns(), ["Weight"]);
    assert!(suggestions.iter().any(|s| s.kind == ChartKind::Radar));
}

#[tokio::test]
async fn test_disabled_client_configures_locally() {
    let client = EnhancementClient::new(EnhancementConfig::default());
    let table = product_sales();
    let suggestion = ChartSuggestion::new(ChartKind::ThemeRiver, 60);
    let config = client.generate_enhanced_config(&suggestion, &table, Some("Flow")).await;
    assert_eq!(config.title.text, "Flow");
    let substitution = config.substitution.unwrap();
    assert_eq!(substitution.rendered, ChartKind::Area);
    assert_eq!(config.series_types(), ["line"]);
}
