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

use crate::types::{EnhancementError, EnhancementResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An axis reference as sent by the service: one column or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisRef {
    Single(String),
    Multiple(Vec<String>),
}

impl AxisRef {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AxisRef::Single(name) => vec![name],
            AxisRef::Multiple(names) => names,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSuggestion {
    #[serde(rename = "type")]
    pub chart_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<AxisRef>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Suggestions,
    Config,
    Insights,
}

/// A response body that passed its shape check. Nothing else leaves this module.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Suggestions(Vec<ExternalSuggestion>),
    Config(Value),
    Insights(Vec<String>),
}

/// Accepts either a bare payload or one wrapped under its kind's key
/// (`{"suggestions": [...]}`, `{"config": {...}}`, `{"insights": [...]}`).
pub fn parse_response(kind: ResponseKind, body: Value) -> EnhancementResult<ParsedResponse> {
    match kind {
        ResponseKind::Suggestions => parse_suggestions(unwrap_key(body, "suggestions")),
        ResponseKind::Config => parse_config(unwrap_key(body, "config")),
        ResponseKind::Insights => parse_insights(unwrap_key(body, "insights")),
    }
}

fn unwrap_key(body: Value, key: &str) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

fn parse_suggestions(payload: Value) -> EnhancementResult<ParsedResponse> {
    let Value::Array(items) = payload else {
        return Err(EnhancementError::MalformedResponse(
            "suggestions payload is not an array".to_string(),
        ));
    };
    let parsed: Vec<ExternalSuggestion> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if parsed.is_empty() {
        return Err(EnhancementError::MalformedResponse(
            "no usable suggestions in response".to_string(),
        ));
    }
    Ok(ParsedResponse::Suggestions(parsed))
}

fn parse_config(payload: Value) -> EnhancementResult<ParsedResponse> {
    let Some(object) = payload.as_object() else {
        return Err(EnhancementError::MalformedResponse(
            "config payload is not an object".to_string(),
        ));
    };
    for key in ["title", "tooltip"] {
        if object.get(key).map_or(true, Value::is_null) {
            return Err(EnhancementError::MalformedResponse(format!(
                "config is missing '{key}'"
            )));
        }
    }
    let has_series = object
        .get("series")
        .and_then(Value::as_array)
        .is_some_and(|series| !series.is_empty());
    if !has_series {
        return Err(EnhancementError::MalformedResponse(
            "config has no series".to_string(),
        ));
    }
    Ok(ParsedResponse::Config(payload))
}

fn parse_insights(payload: Value) -> EnhancementResult<ParsedResponse> {
    let Value::Array(items) = payload else {
        return Err(EnhancementError::MalformedResponse(
            "insights payload is not an array".to_string(),
        ));
    };
    Ok(ParsedResponse::Insights(
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) if !text.trim().is_empty() => Some(text),
                _ => None,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_and_bare_suggestion_lists_parse() {
        let wrapped = json!({"suggestions": [{"type": "bar", "yAxis": "Sales"}]});
        let bare = json!([{"type": "line", "yAxis": ["a", "b"]}]);

        let ParsedResponse::Suggestions(w) =
            parse_response(ResponseKind::Suggestions, wrapped).unwrap()
        else {
            panic!("expected suggestions");
        };
        assert_eq!(w[0].chart_type, "bar");
        assert_eq!(w[0].y_axis.clone().unwrap().into_vec(), vec!["Sales"]);

        let ParsedResponse::Suggestions(b) =
            parse_response(ResponseKind::Suggestions, bare).unwrap()
        else {
            panic!("expected suggestions");
        };
        assert_eq!(b[0].y_axis.clone().unwrap().into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn suggestion_entries_without_type_are_skipped() {
        let body = json!([{"title": "no type"}, 42, {"type": "pie"}]);
        let ParsedResponse::Suggestions(items) =
            parse_response(ResponseKind::Suggestions, body).unwrap()
        else {
            panic!("expected suggestions");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].chart_type, "pie");
    }

    #[test]
    fn empty_suggestion_list_is_malformed() {
        let err = parse_response(ResponseKind::Suggestions, json!({"suggestions": []}))
            .unwrap_err();
        assert!(matches!(err, EnhancementError::MalformedResponse(_)));
    }

    #[test]
    fn config_requires_title_tooltip_and_series() {
        let ok = json!({"title": {"text": "t"}, "tooltip": {}, "series": [{"type": "bar"}]});
        assert!(parse_response(ResponseKind::Config, ok).is_ok());

        let no_tooltip = json!({"title": {"text": "t"}, "series": [{"type": "bar"}]});
        assert!(parse_response(ResponseKind::Config, no_tooltip).is_err());

        let empty_series = json!({"config": {"title": {}, "tooltip": {}, "series": []}});
        assert!(parse_response(ResponseKind::Config, empty_series).is_err());

        assert!(parse_response(ResponseKind::Config, json!("nope")).is_err());
    }

    #[test]
    fn insights_keep_only_non_blank_strings() {
        let body = json!({"insights": ["Sales peak in Q4", "", 3, "  "]});
        assert_eq!(
            parse_response(ResponseKind::Insights, body).unwrap(),
            ParsedResponse::Insights(vec!["Sales peak in Q4".to_string()])
        );
    }
}
