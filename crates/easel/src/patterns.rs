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

use crate::table::DataSummary;
use serde::{Deserialize, Serialize};

/// Structural facts about a table, read off its summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPatterns {
    pub has_categorical: bool,
    pub has_numeric: bool,
    pub has_temporal: bool,
    pub numeric_count: usize,
    pub categorical_count: usize,
    pub temporal_count: usize,
}

impl DataPatterns {
    pub fn from_summary(summary: &DataSummary) -> Self {
        let numeric_count = summary.numeric_columns.len();
        let categorical_count = summary.string_columns.len();
        let temporal_count = summary.date_columns.len();
        Self {
            has_categorical: categorical_count > 0,
            has_numeric: numeric_count > 0,
            has_temporal: temporal_count > 0,
            numeric_count,
            categorical_count,
            temporal_count,
        }
    }

    /// Columns of every kind; `numeric_count` is the numeric dimensionality.
    pub fn column_count(&self) -> usize {
        self.numeric_count + self.categorical_count + self.temporal_count
    }

    pub fn describe(&self) -> String {
        format!(
            "{} columns ({} numeric, {} categorical, {} temporal)",
            self.column_count(),
            self.numeric_count,
            self.categorical_count,
            self.temporal_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary_yields_no_patterns() {
        assert_eq!(
            DataPatterns::from_summary(&DataSummary::default()),
            DataPatterns::default()
        );
    }

    #[test]
    fn counts_follow_summary_lists() {
        let summary = DataSummary {
            total_rows: 3,
            total_columns: 4,
            numeric_columns: vec!["a".into(), "b".into()],
            string_columns: vec!["c".into()],
            date_columns: vec!["d".into()],
        };
        let p = DataPatterns::from_summary(&summary);
        assert!(p.has_categorical && p.has_numeric && p.has_temporal);
        assert_eq!(p.numeric_count, 2);
        assert_eq!(p.column_count(), 4);
        assert_eq!(p.describe(), "4 columns (2 numeric, 1 categorical, 1 temporal)");
    }
}
