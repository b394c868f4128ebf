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

use crate::catalog::ChartKind;
use crate::suggestion::ChartSuggestion;
use std::collections::HashSet;

/// Stable sort by confidence, highest first. Nothing is dropped.
pub fn rank_suggestions(mut suggestions: Vec<ChartSuggestion>) -> Vec<ChartSuggestion> {
    suggestions.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    suggestions
}

/// Combines enhanced and local lists before ranking. Entries are matched on
/// chart kind; an enhanced entry replaces the local one of the same kind.
/// Enhanced entries come first, then the local ones that were not replaced.
pub fn merge_suggestions(
    local: Vec<ChartSuggestion>,
    enhanced: Vec<ChartSuggestion>,
) -> Vec<ChartSuggestion> {
    let mut seen: HashSet<ChartKind> = HashSet::new();
    let mut merged = Vec::with_capacity(local.len() + enhanced.len());
    for suggestion in enhanced.into_iter().chain(local) {
        if seen.insert(suggestion.kind) {
            merged.push(suggestion);
        }
    }
    merged
}
