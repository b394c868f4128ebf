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

//! Last gate before a configuration reaches the renderer. After it runs every
//! series has a type tag and a data payload, and there is at least one series.

use crate::render::{default_palette, RenderConfig, SeriesItem};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Positions (in the input list) of series that were removed.
    pub dropped: Vec<usize>,
    /// Positions (in the input list) of series given an empty data array.
    pub patched: Vec<usize>,
    pub placeholder_used: bool,
    pub palette_filled: bool,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
            && self.patched.is_empty()
            && !self.placeholder_used
            && !self.palette_filled
    }
}

pub fn validate(config: RenderConfig) -> RenderConfig {
    validate_with_report(config).0
}

pub fn validate_with_report(mut config: RenderConfig) -> (RenderConfig, ValidationReport) {
    let mut report = ValidationReport::default();
    let mut kept = Vec::with_capacity(config.series.len());

    for (index, item) in std::mem::take(&mut config.series).into_iter().enumerate() {
        let mut series = match item {
            SeriesItem::Series(series) if series.type_tag().is_some() => series,
            SeriesItem::Series(_) => {
                warn!(index, "dropping series without a type");
                report.dropped.push(index);
                continue;
            }
            SeriesItem::Malformed(value) => {
                warn!(index, found = json_kind(&value), "dropping malformed series entry");
                report.dropped.push(index);
                continue;
            }
        };
        if series.data.as_ref().map_or(true, Value::is_null) {
            warn!(index, "series has no data; patching with an empty array");
            series.data = Some(Value::Array(Vec::new()));
            report.patched.push(index);
        }
        kept.push(SeriesItem::Series(series));
    }

    if kept.is_empty() {
        warn!("no valid series left; substituting placeholder");
        config.show_placeholder();
        report.placeholder_used = true;
    } else {
        config.series = kept;
    }

    if config.color.is_empty() {
        config.color = default_palette();
        report.palette_filled = true;
    }
    (config, report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
