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

//! Optional external enhancement service.
//!
//! `Enhancer` is the transport seam: it moves JSON to and from one route.
//! `EnhancementClient` owns everything else (availability, projection,
//! deadlines, parsing, mapping and fallback).

pub mod client;
pub mod http;
pub mod projection;

use async_trait::async_trait;
use easel_contracts::{EnhancementError, EnhancementResult, Route};
use serde_json::Value;

pub use client::EnhancementClient;
pub use http::HttpEnhancer;
pub use projection::project_table;

#[async_trait]
pub trait Enhancer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> EnhancementResult<()>;

    /// POSTs `payload` to `route` and returns the raw response body.
    async fn send(&self, route: Route, payload: Value) -> EnhancementResult<Value>;
}

/// Stands in when enhancement is switched off or the transport could not be
/// built. Every call reports `Disabled`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnhancer;

#[async_trait]
impl Enhancer for DisabledEnhancer {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn health_check(&self) -> EnhancementResult<()> {
        Err(EnhancementError::Disabled)
    }

    async fn send(&self, _route: Route, _payload: Value) -> EnhancementResult<Value> {
        Err(EnhancementError::Disabled)
    }
}
