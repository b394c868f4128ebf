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

use super::{project_table, DisabledEnhancer, Enhancer, HttpEnhancer};
use crate::catalog::{ChartKind, Complexity};
use crate::generator::{generate_local_suggestions, SuggestionRules};
use crate::ranker::merge_suggestions;
use crate::render::{default_palette, RenderConfig};
use crate::suggestion::ChartSuggestion;
use crate::synth::{synthesize, SynthesisLimits};
use crate::table::Table;
use crate::validator::validate;
use easel_contracts::{
    parse_response, ConfigRequest, EnhancementConfig, EnhancementError, EnhancementResult,
    ExternalSuggestion, InsightsRequest, ParsedResponse, ResponseKind, Route, SuggestionRequest,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct EnhancementClient {
    transport: Arc<dyn Enhancer>,
    config: EnhancementConfig,
    rules: SuggestionRules,
    limits: SynthesisLimits,
    available: AtomicBool,
}

impl EnhancementClient {
    /// Picks the HTTP transport when enhancement is enabled. A transport that
    /// cannot be built leaves the client permanently unavailable.
    pub fn new(config: EnhancementConfig) -> Self {
        let transport: Arc<dyn Enhancer> = if config.enabled {
            match HttpEnhancer::new(&config) {
                Ok(http) => Arc::new(http),
                Err(e) => {
                    warn!(
                        error = %e,
                        "Enhancement transport unavailable; using local suggestions only"
                    );
                    Arc::new(DisabledEnhancer)
                }
            }
        } else {
            Arc::new(DisabledEnhancer)
        };
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: EnhancementConfig, transport: Arc<dyn Enhancer>) -> Self {
        Self {
            transport,
            config,
            rules: SuggestionRules::default(),
            limits: SynthesisLimits::default(),
            available: AtomicBool::new(false),
        }
    }

    pub fn with_rules(mut self, rules: SuggestionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_limits(mut self, limits: SynthesisLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &EnhancementConfig {
        &self.config
    }
    pub fn rules(&self) -> &SuggestionRules {
        &self.rules
    }
    pub fn limits(&self) -> &SynthesisLimits {
        &self.limits
    }

    /// Probes the service and records whether it can be used. Never fails.
    pub async fn initialize(&self) -> bool {
        let available = if !self.config.enabled {
            debug!("Enhancement disabled by configuration");
            false
        } else {
            match tokio::time::timeout(self.config.timeout(), self.transport.health_check()).await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    warn!(
                        transport = self.transport.name(),
                        error = %e,
                        "Enhancement service unavailable"
                    );
                    false
                }
                Err(_) => {
                    warn!(transport = self.transport.name(), "Enhancement health check timed out");
                    false
                }
            }
        };
        self.available.store(available, Ordering::SeqCst);
        info!(available, "Enhancement client initialised");
        available
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn call<R: Serialize>(
        &self,
        route: Route,
        kind: ResponseKind,
        request: &R,
    ) -> EnhancementResult<ParsedResponse> {
        if !self.is_available() {
            return Err(EnhancementError::Disabled);
        }
        let payload = serde_json::to_value(request)?;
        let body = tokio::time::timeout(self.config.timeout(), self.transport.send(route, payload))
            .await
            .map_err(|_| EnhancementError::Timeout)??;
        parse_response(kind, body)
    }

    /// Enhanced suggestions only, tagged `aiEnhanced`. Errors when the service
    /// is unavailable or returns nothing usable.
    pub async fn try_enhanced_suggestions(
        &self,
        table: &Table,
    ) -> EnhancementResult<Vec<ChartSuggestion>> {
        let request = SuggestionRequest::new(
            project_table(table, self.config.sample_size),
            self.config.preferences.clone(),
        );
        let external = match self
            .call(Route::Suggestions, ResponseKind::Suggestions, &request)
            .await?
        {
            ParsedResponse::Suggestions(list) => list,
            _ => {
                return Err(EnhancementError::MalformedResponse(
                    "expected a suggestion list".to_string(),
                ))
            }
        };
        let received = external.len();
        let adopted: Vec<ChartSuggestion> = external
            .into_iter()
            .filter_map(|s| adopt_external(s, &self.rules))
            .collect();
        if adopted.is_empty() {
            return Err(EnhancementError::MalformedResponse(format!(
                "none of the {received} suggestions named a supported chart type"
            )));
        }
        debug!(
            request_id = %request.id,
            received,
            adopted = adopted.len(),
            "Adopted enhanced suggestions"
        );
        Ok(adopted)
    }

    /// Local suggestions upgraded by the service when it answers. Enhanced
    /// entries replace local ones of the same kind. Any failure yields the
    /// local list unchanged.
    pub async fn generate_enhanced_suggestions(&self, table: &Table) -> Vec<ChartSuggestion> {
        let local = generate_local_suggestions(table, &self.rules);
        match self.try_enhanced_suggestions(table).await {
            Ok(enhanced) => merge_suggestions(local, enhanced),
            Err(EnhancementError::Disabled) => local,
            Err(e) => {
                warn!(error = %e, "Enhancement failed; using local suggestions");
                local
            }
        }
    }

    /// The service's configuration for `suggestion`, unvalidated. Accepted
    /// only with a title, a tooltip and at least one series.
    pub async fn try_enhanced_config(
        &self,
        suggestion: &ChartSuggestion,
        table: &Table,
    ) -> EnhancementResult<RenderConfig> {
        let request = ConfigRequest::new(
            suggestion.descriptor(),
            project_table(table, self.config.sample_size),
            self.config.preferences.clone(),
        );
        let value = match self.call(Route::Config, ResponseKind::Config, &request).await? {
            ParsedResponse::Config(value) => value,
            _ => {
                return Err(EnhancementError::MalformedResponse(
                    "expected a configuration object".to_string(),
                ))
            }
        };
        let mut config: RenderConfig = serde_json::from_value(value).map_err(|e| {
            EnhancementError::MalformedResponse(format!(
                "configuration does not fit the renderer: {e}"
            ))
        })?;
        if config.color.is_empty() {
            config.color = default_palette();
        }
        debug!(
            request_id = %request.id,
            chart_type = %suggestion.kind,
            "Adopted enhanced configuration"
        );
        Ok(config)
    }

    /// Always returns a validated configuration: the service's when it
    /// answers with an acceptable one, the local synthesizer's otherwise.
    pub async fn generate_enhanced_config(
        &self,
        suggestion: &ChartSuggestion,
        table: &Table,
        title_override: Option<&str>,
    ) -> RenderConfig {
        match self.try_enhanced_config(suggestion, table).await {
            Ok(mut config) => {
                if let Some(title) = title_override.filter(|t| !t.trim().is_empty()) {
                    config.title.text = title.to_string();
                }
                validate(config)
            }
            Err(e) => {
                if !matches!(e, EnhancementError::Disabled) {
                    warn!(
                        error = %e,
                        chart_type = %suggestion.kind,
                        "Enhanced configuration failed; synthesising locally"
                    );
                }
                validate(synthesize(suggestion, table, title_override, &self.limits))
            }
        }
    }

    pub async fn try_insights(&self, table: &Table) -> EnhancementResult<Vec<String>> {
        let request = InsightsRequest::new(project_table(table, self.config.sample_size));
        match self.call(Route::Insights, ResponseKind::Insights, &request).await? {
            ParsedResponse::Insights(insights) => Ok(insights),
            _ => Err(EnhancementError::MalformedResponse(
                "expected a list of insights".to_string(),
            )),
        }
    }

    /// Insight sentences from the service; empty when it is unavailable.
    pub async fn generate_insights(&self, table: &Table) -> Vec<String> {
        match self.try_insights(table).await {
            Ok(insights) => insights,
            Err(EnhancementError::Disabled) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Insights unavailable");
                Vec::new()
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Maps an external entry onto the local model. Unknown chart types are
/// skipped.
fn adopt_external(
    external: ExternalSuggestion,
    rules: &SuggestionRules,
) -> Option<ChartSuggestion> {
    let kind = match external.chart_type.parse::<ChartKind>() {
        Ok(kind) => kind,
        Err(reason) => {
            debug!(%reason, "Skipping external suggestion");
            return None;
        }
    };
    let confidence = rules.enhanced_confidence(kind, external.confidence);
    let mut suggestion = ChartSuggestion::new(kind, confidence)
        .with_y_axis(external.y_axis.map(|y| y.into_vec()).unwrap_or_default())
        .with_series(non_blank(external.series));
    if let Some(title) = non_blank(external.title) {
        suggestion.title = title;
    }
    if let Some(description) = non_blank(external.description) {
        suggestion.description = description;
    }
    suggestion.reasoning = non_blank(external.reasoning)
        .unwrap_or_else(|| "Recommended by the enhancement service".to_string());
    suggestion.x_axis = non_blank(external.x_axis);
    if let Some(use_case) = non_blank(external.use_case) {
        suggestion.use_case = Some(use_case);
    }
    if let Some(complexity) = external.complexity.and_then(|c| c.parse::<Complexity>().ok()) {
        suggestion.complexity = Some(complexity);
    }
    suggestion.ai_enhanced = Some(true);
    Some(suggestion)
}
