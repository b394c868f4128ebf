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

use easel::{
    ChartAdvisor, ChartKind, ChartSuggestion, ColumnType, EaselConfig, EnhancementClient, Enhancer,
    HttpEnhancer, Table,
};
use easel_contracts::{EnhancementConfig, EnhancementError, Route};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sales() -> Table {
    Table::from_rows(
        &[("Product", ColumnType::String), ("Sales", ColumnType::Number)],
        vec![
            vec![json!("A"), json!(10)],
            vec![json!("B"), json!(20)],
        ],
    )
}

async fn healthy_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> EnhancementConfig {
    EnhancementConfig {
        timeout_ms: 1_000,
        ..EnhancementConfig::enabled_at(server.uri())
    }
}

async fn client_for(config: EnhancementConfig) -> EnhancementClient {
    let http = HttpEnhancer::new(&config)
        .unwrap()
        .with_backoff(Duration::ZERO);
    let client = EnhancementClient::with_transport(config, Arc::new(http));
    assert!(client.initialize().await);
    client
}

#[tokio::test]
async fn test_enhanced_suggestions_are_merged_and_ranked() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "suggestions": [
                {
                    "type": "line",
                    "confidence": 0.92,
                    "title": "Sales trend",
                    "xAxis": "Product",
                    "yAxis": "Sales"
                },
                {"type": "hologram", "confidence": 0.99}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = EaselConfig {
        enhancement: config_for(&server),
        ..Default::default()
    };
    let advisor = ChartAdvisor::new(config);
    assert!(advisor.initialize().await);

    let ranked = advisor.suggest(Arc::new(sales())).await;
    let kinds: Vec<_> = ranked.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, [ChartKind::Line, ChartKind::Bar, ChartKind::Pie]);
    assert!(ranked[0].is_enhanced());
    assert_eq!(ranked[0].title, "Sales trend");
    assert_eq!(ranked[0].y_columns(), ["Sales"]);
    assert!(!ranked[1].is_enhanced());
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_local() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let client = client_for(config_for(&server)).await;
    let err = client.try_enhanced_suggestions(&sales()).await.unwrap_err();
    assert!(matches!(err, EnhancementError::Serialisation(_)));

    let suggestions = client.generate_enhanced_suggestions(&sales()).await;
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| !s.is_enhanced()));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/suggestions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(EnhancementConfig {
        max_retries: 1,
        ..config_for(&server)
    })
    .await;
    let err = client.try_enhanced_suggestions(&sales()).await.unwrap_err();
    assert!(matches!(err, EnhancementError::Http { status: 503, .. }));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/suggestions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(EnhancementConfig {
        max_retries: 3,
        ..config_for(&server)
    })
    .await;
    let err = client.try_enhanced_suggestions(&sales()).await.unwrap_err();
    match err {
        EnhancementError::Http { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_slow_service_times_out_to_local() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/suggestions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"type": "line", "confidence": 0.9}]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(EnhancementConfig {
        timeout_ms: 150,
        max_retries: 0,
        ..config_for(&server)
    })
    .await;
    let err = client.try_enhanced_suggestions(&sales()).await.unwrap_err();
    assert!(matches!(err, EnhancementError::Timeout | EnhancementError::Network(_)));

    let suggestions = client.generate_enhanced_suggestions(&sales()).await;
    assert!(suggestions.iter().all(|s| !s.is_enhanced()));
}

#[tokio::test]
async fn test_health_check_reports_status() {
    let server = healthy_server().await;
    let http = HttpEnhancer::new(&config_for(&server)).unwrap();
    assert!(http.health_check().await.is_ok());

    let down = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&down)
        .await;
    let config = config_for(&down);
    let http = HttpEnhancer::new(&config).unwrap();
    assert!(matches!(
        http.health_check().await,
        Err(EnhancementError::Http { status: 503, .. })
    ));

    let client = EnhancementClient::with_transport(config, Arc::new(http));
    assert!(!client.initialize().await);
    assert!(matches!(
        client.try_insights(&sales()).await,
        Err(EnhancementError::Disabled)
    ));
}

#[tokio::test]
async fn test_service_configuration_is_validated() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "config": {
                "title": {"text": "From service"},
                "tooltip": {"trigger": "axis"},
                "xAxis": {"type": "category", "data": ["A", "B"]},
                "yAxis": {"type": "value"},
                "series": [
                    {"type": "bar", "name": "Sales", "data": [10, 20]},
                    {"name": "untyped"},
                    {"type": "line"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(config_for(&server)).await;
    let suggestion = ChartSuggestion::new(ChartKind::Bar, 85)
        .with_x_axis("Product")
        .with_y_axis(vec!["Sales".to_string()]);
    let config = client
        .generate_enhanced_config(&suggestion, &sales(), Some("Quarterly"))
        .await;

    assert_eq!(config.title.text, "Quarterly");
    assert_eq!(config.series_types(), ["bar", "line"]);
    let line = config.series[1].as_series().unwrap();
    assert_eq!(line.data, Some(json!([])));
    assert!(!config.color.is_empty());
}

#[tokio::test]
async fn test_incomplete_configuration_is_synthesised_locally() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path("/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": {"text": "No tooltip"},
            "series": [{"type": "bar", "data": [1]}]
        })))
        .mount(&server)
        .await;

    let client = client_for(config_for(&server)).await;
    let suggestion = ChartSuggestion::new(ChartKind::Pie, 70).with_x_axis("Product");
    let config = client.generate_enhanced_config(&suggestion, &sales(), None).await;
    assert_eq!(config.series_types(), ["pie"]);
}

#[tokio::test]
async fn test_insights_are_returned_without_blanks() {
    let server = healthy_server().await;
    Mock::given(method("POST"))
        .and(path(Route::Insights.path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "insights": ["B outsold A", "  ", "Sales doubled"]
        })))
        .mount(&server)
        .await;

    let client = client_for(config_for(&server)).await;
    let insights = client.generate_insights(&sales()).await;
    assert_eq!(insights, ["B outsold A", "Sales doubled"]);
}
