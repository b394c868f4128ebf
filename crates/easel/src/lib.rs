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

pub mod cache;
pub mod catalog;
pub mod config;
pub mod enhancer;
pub mod error;
pub mod generator;
pub mod patterns;
pub mod ranker;
pub mod render;
pub mod session;
pub mod suggestion;
pub mod synth;
pub mod table;
pub mod validator;

pub use cache::SuggestionCache;
pub use catalog::{ChartDescriptor, ChartKind, Complexity};
pub use config::{CacheConfig, EaselConfig};
pub use enhancer::{DisabledEnhancer, EnhancementClient, Enhancer, HttpEnhancer};
pub use error::{ConfigError, EaselError, Result};
pub use generator::{generate_local_suggestions, SuggestionRules};
pub use patterns::DataPatterns;
pub use ranker::{merge_suggestions, rank_suggestions};
pub use render::{RenderConfig, Series, SeriesItem, Substitution};
pub use session::{PendingEnhancement, SettleOutcome, SuggestionSession};
pub use suggestion::ChartSuggestion;
pub use synth::{synthesize, SynthesisLimits};
pub use table::{Column, ColumnType, DataSummary, Table};
pub use validator::{validate, validate_with_report, ValidationReport};

use std::path::Path;
use std::sync::Arc;

/// Entry point wiring the pipeline together: local rules, the optional
/// enhancement service, ranking, synthesis and validation.
pub struct ChartAdvisor {
    config: EaselConfig,
    client: Arc<EnhancementClient>,
    session: SuggestionSession,
}
impl ChartAdvisor {
    pub fn new(config: EaselConfig) -> Self {
        let client = EnhancementClient::new(config.enhancement.clone());
        Self::assemble(config, client)
    }
    pub fn with_transport(config: EaselConfig, transport: Arc<dyn Enhancer>) -> Self {
        let client = EnhancementClient::with_transport(config.enhancement.clone(), transport);
        Self::assemble(config, client)
    }
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = EaselConfig::load(Some(path.as_ref()))?;
        Ok(Self::new(config))
    }
    fn assemble(config: EaselConfig, client: EnhancementClient) -> Self {
        let client = Arc::new(
            client
                .with_rules(config.rules.clone())
                .with_limits(config.limits.clone()),
        );
        let mut session = SuggestionSession::new(Arc::clone(&client));
        if config.cache.enabled {
            session = session.with_cache(Arc::new(SuggestionCache::new(config.cache.capacity)));
        }
        Self {
            config,
            client,
            session,
        }
    }
    pub fn config(&self) -> &EaselConfig {
        &self.config
    }
    pub fn client(&self) -> &Arc<EnhancementClient> {
        &self.client
    }
    /// Probes the enhancement service. Safe to skip; the advisor then runs
    /// on local rules only.
    pub async fn initialize(&self) -> bool {
        self.client.initialize().await
    }
    pub fn analyze(&self, table: &Table) -> DataPatterns {
        DataPatterns::from_summary(table.summary())
    }
    pub fn local_suggestions(&self, table: &Table) -> Vec<ChartSuggestion> {
        rank_suggestions(generate_local_suggestions(table, &self.config.rules))
    }
    pub fn begin(&self, table: Arc<Table>) -> (Vec<ChartSuggestion>, PendingEnhancement) {
        self.session.begin(table)
    }
    pub async fn suggest(&self, table: Arc<Table>) -> Vec<ChartSuggestion> {
        self.session.suggest(table).await
    }
    pub async fn configure(
        &self,
        suggestion: &ChartSuggestion,
        table: &Table,
        title_override: Option<&str>,
    ) -> RenderConfig {
        self.client
            .generate_enhanced_config(suggestion, table, title_override)
            .await
    }
    pub fn configure_locally(
        &self,
        suggestion: &ChartSuggestion,
        table: &Table,
        title_override: Option<&str>,
    ) -> RenderConfig {
        validate(synthesize(
            suggestion,
            table,
            title_override,
            &self.config.limits,
        ))
    }
    pub async fn insights(&self, table: &Table) -> Vec<String> {
        self.client.generate_insights(table).await
    }
}
impl Default for ChartAdvisor {
    fn default() -> Self {
        Self::new(EaselConfig::default())
    }
}
