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

use crate::types::{ChartStyle, ColorScheme, EnhancementError, EnhancementResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed preference block sent with every enhancement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default = "default_accessibility")]
    pub accessibility: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            style: ChartStyle::Modern,
            accessibility: default_accessibility(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancementConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Sample values per column included in the table projection.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_accessibility() -> bool {
    true
}
fn default_endpoint() -> String {
    "http://localhost:8787".to_string()
}
fn default_timeout_ms() -> u64 {
    5_000
}
fn default_max_retries() -> u32 {
    1
}
fn default_sample_size() -> usize {
    5
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            sample_size: default_sample_size(),
            preferences: Preferences::default(),
        }
    }
}

impl EnhancementConfig {
    pub fn enabled_at(endpoint: impl Into<String>) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn validate(&self) -> EnhancementResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(EnhancementError::Configuration(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout_ms == 0 {
            return Err(EnhancementError::Configuration(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_retries > 5 {
            return Err(EnhancementError::Configuration(
                "max_retries should not exceed 5".to_string(),
            ));
        }
        Ok(())
    }
}
