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

//! One suggestion pipeline per table, last request wins.
//!
//! `begin` hands back local suggestions straight away together with a
//! `PendingEnhancement`. Settling it waits for the enhancement service under
//! a deadline. Starting a newer request cancels the older one, and an older
//! request that finishes late reports `Superseded` instead of a list.

use crate::cache::SuggestionCache;
use crate::enhancer::EnhancementClient;
use crate::generator::generate_local_suggestions;
use crate::ranker::{merge_suggestions, rank_suggestions};
use crate::suggestion::ChartSuggestion;
use crate::table::Table;
use easel_contracts::{EnhancementError, EnhancementResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SettleOutcome {
    /// Final ranked list. `enhanced` is false when the service did not
    /// contribute.
    Ready {
        suggestions: Vec<ChartSuggestion>,
        enhanced: bool,
    },
    /// A newer request started; keep whatever is on screen.
    Superseded,
}

pub struct SuggestionSession {
    client: Arc<EnhancementClient>,
    cache: Option<Arc<SuggestionCache>>,
    generation: Arc<AtomicU64>,
    current: Mutex<CancellationToken>,
}

impl SuggestionSession {
    pub fn new(client: Arc<EnhancementClient>) -> Self {
        Self {
            client,
            cache: None,
            generation: Arc::new(AtomicU64::new(0)),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<SuggestionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn client(&self) -> &Arc<EnhancementClient> {
        &self.client
    }

    /// Starts a request for `table`, superseding any request in flight.
    pub fn begin(&self, table: Arc<Table>) -> (Vec<ChartSuggestion>, PendingEnhancement) {
        let token = CancellationToken::new();
        // Bump and swap under one lock so the newest generation always owns
        // the live token.
        let generation = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            current.cancel();
            *current = token.clone();
            generation
        };

        let local = rank_suggestions(generate_local_suggestions(&table, self.client.rules()));
        info!(
            generation,
            local = local.len(),
            rows = table.row_count(),
            "Suggestion request started"
        );

        let pending = PendingEnhancement {
            client: Arc::clone(&self.client),
            cache: self.cache.clone(),
            table,
            local: local.clone(),
            generation,
            latest: Arc::clone(&self.generation),
            token,
        };
        (local, pending)
    }

    /// `begin` then `settle` under the enhancement timeout. A superseded
    /// request returns its local list.
    pub async fn suggest(&self, table: Arc<Table>) -> Vec<ChartSuggestion> {
        let deadline = self.client.config().timeout();
        let (local, pending) = self.begin(table);
        match pending.settle(deadline).await {
            SettleOutcome::Ready { suggestions, .. } => suggestions,
            SettleOutcome::Superseded => local,
        }
    }

    /// Cancels the request in flight, if any.
    pub fn cancel(&self) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        current.cancel();
    }
}

pub struct PendingEnhancement {
    client: Arc<EnhancementClient>,
    cache: Option<Arc<SuggestionCache>>,
    table: Arc<Table>,
    local: Vec<ChartSuggestion>,
    generation: u64,
    latest: Arc<AtomicU64>,
    token: CancellationToken,
}

impl PendingEnhancement {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_superseded(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.generation || self.token.is_cancelled()
    }

    /// Enhanced entries for this request, raced against cancellation and
    /// `deadline`.
    async fn enhance(&self, deadline: Duration) -> EnhancementResult<Vec<ChartSuggestion>> {
        if !self.client.is_available() {
            return Err(EnhancementError::Disabled);
        }
        let request =
            tokio::time::timeout(deadline, self.client.try_enhanced_suggestions(&self.table));
        tokio::select! {
            _ = self.token.cancelled() => Err(EnhancementError::Cancelled),
            result = request => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        generation = self.generation,
                        "Enhancement missed its deadline"
                    );
                    Err(EnhancementError::Timeout)
                }
            },
        }
    }

    pub async fn settle(self, deadline: Duration) -> SettleOutcome {
        if self.is_superseded() {
            return SettleOutcome::Superseded;
        }
        let fingerprint = self.table.fingerprint();
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&fingerprint)) {
            debug!(generation = self.generation, "Suggestion cache hit");
            return SettleOutcome::Ready {
                suggestions: hit,
                enhanced: true,
            };
        }

        let enhanced = match self.enhance(deadline).await {
            Ok(list) => list,
            Err(EnhancementError::Cancelled) => {
                debug!(generation = self.generation, "Enhancement cancelled by a newer request");
                return SettleOutcome::Superseded;
            }
            Err(EnhancementError::Disabled) => Vec::new(),
            Err(e) => {
                warn!(
                    error = %e,
                    generation = self.generation,
                    "Enhancement failed; keeping local suggestions"
                );
                Vec::new()
            }
        };

        if self.is_superseded() {
            debug!(generation = self.generation, "Discarding result of superseded request");
            return SettleOutcome::Superseded;
        }

        let upgraded = !enhanced.is_empty();
        let ranked = rank_suggestions(merge_suggestions(self.local, enhanced));
        if upgraded {
            if let Some(cache) = &self.cache {
                cache.insert(fingerprint, ranked.clone());
            }
        }
        SettleOutcome::Ready {
            suggestions: ranked,
            enhanced: upgraded,
        }
    }
}
