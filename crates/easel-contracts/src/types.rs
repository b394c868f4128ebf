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

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Default,
    Vibrant,
    Pastel,
    Monochrome,
    Colorblind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartStyle {
    #[default]
    Modern,
    Classic,
    Minimal,
}

/// Endpoints exposed by the enhancement service, relative to its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Health,
    Suggestions,
    Config,
    Insights,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Health => "/health",
            Route::Suggestions => "/suggestions",
            Route::Config => "/config",
            Route::Insights => "/insights",
        }
    }
}

#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Enhancement service is disabled")]
    Disabled,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Enhancement service returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Timeout error")]
    Timeout,

    #[error("Serialisation error: {0}")]
    Serialisation(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request was superseded by a newer one")]
    Cancelled,
}

pub type EnhancementResult<T> = Result<T, EnhancementError>;

impl EnhancementError {
    /// Errors worth another attempt within the same logical call.
    pub fn is_retryable(&self) -> bool {
        match self {
            EnhancementError::Network(_)
            | EnhancementError::RateLimit
            | EnhancementError::Timeout => true,
            EnhancementError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for EnhancementError {
    fn from(err: serde_json::Error) -> Self {
        EnhancementError::Serialisation(err.to_string())
    }
}
