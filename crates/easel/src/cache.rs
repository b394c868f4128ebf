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

use crate::suggestion::ChartSuggestion;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedSuggestions {
    suggestions: Vec<ChartSuggestion>,
    stored_at: DateTime<Utc>,
}

/// Final ranked lists keyed by table fingerprint. When full, the oldest
/// entry is evicted.
#[derive(Debug)]
pub struct SuggestionCache {
    entries: DashMap<String, CachedSuggestions>,
    capacity: usize,
}

impl SuggestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, fingerprint: &str) -> Option<Vec<ChartSuggestion>> {
        self.entries
            .get(fingerprint)
            .map(|entry| entry.suggestions.clone())
    }

    pub fn insert(&self, fingerprint: String, suggestions: Vec<ChartSuggestion>) {
        if !self.entries.contains_key(&fingerprint) && self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.stored_at)
                .map(|entry| entry.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
                debug!(evicted = %key, "Suggestion cache full");
            }
        }
        self.entries.insert(
            fingerprint,
            CachedSuggestions {
                suggestions,
                stored_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
