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

use crate::table::Table;
use easel_contracts::{ColumnProjection, SummaryProjection, TableProjection};

/// What the enhancement service gets to see of a table: names, types, the
/// first `sample_size` non-null values per column and the summary.
pub fn project_table(table: &Table, sample_size: usize) -> TableProjection {
    let columns = table
        .columns()
        .iter()
        .map(|column| ColumnProjection {
            name: column.name.clone(),
            column_type: column.column_type.as_str().to_string(),
            sample_values: column
                .values
                .iter()
                .filter(|v| !v.is_null())
                .take(sample_size)
                .cloned()
                .collect(),
        })
        .collect();
    let summary = table.summary();
    TableProjection {
        columns,
        summary: SummaryProjection {
            total_rows: summary.total_rows,
            total_columns: summary.total_columns,
            numeric_columns: summary.numeric_columns.clone(),
            string_columns: summary.string_columns.clone(),
            date_columns: summary.date_columns.clone(),
        },
        row_count: table.row_count(),
    }
}
