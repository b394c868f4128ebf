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
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
    Radar,
    Heatmap,
    Funnel,
    Gauge,
    Tree,
    Treemap,
    Sunburst,
    Parallel,
    Sankey,
    Graph,
    Boxplot,
    Candlestick,
    ThemeRiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Intermediate,
    Advanced,
}

impl FromStr for Complexity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "basic" => Ok(Complexity::Simple),
            "intermediate" | "medium" => Ok(Complexity::Intermediate),
            "advanced" | "complex" => Ok(Complexity::Advanced),
            other => Err(format!("unknown complexity '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub label: &'static str,
    pub description: &'static str,
    pub use_case: &'static str,
    pub complexity: Complexity,
    pub tags: &'static [&'static str],
    /// Drawn on a cartesian grid (x/y axes, axis tooltip).
    pub cartesian: bool,
}

impl ChartDescriptor {
    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.tags.contains(tag))
    }
}

const CATALOG: [ChartDescriptor; 18] = [
    ChartDescriptor {
        kind: ChartKind::Bar,
        label: "Bar Chart",
        description: "Compare values across categories",
        use_case: "Comparing quantities between discrete groups",
        complexity: Complexity::Simple,
        tags: &["comparison", "categorical", "ranking"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Line,
        label: "Line Chart",
        description: "Show how a measure changes over time",
        use_case: "Tracking trends and seasonality",
        complexity: Complexity::Simple,
        tags: &["timeseries", "trend", "temporal"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Pie,
        label: "Pie Chart",
        description: "Show each category's share of the whole",
        use_case: "Part-to-whole proportions with few categories",
        complexity: Complexity::Simple,
        tags: &["proportion", "parts-of-whole"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Scatter,
        label: "Scatter Plot",
        description: "Plot two measures against each other",
        use_case: "Spotting correlation, clusters and outliers",
        complexity: Complexity::Intermediate,
        tags: &["relationship", "correlation"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Area,
        label: "Area Chart",
        description: "Show accumulated volume over time",
        use_case: "Cumulative totals along a timeline",
        complexity: Complexity::Simple,
        tags: &["timeseries", "cumulative", "temporal"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Radar,
        label: "Radar Chart",
        description: "Compare several metrics at once",
        use_case: "Multi-metric profiles of a handful of items",
        complexity: Complexity::Intermediate,
        tags: &["multivariate", "comparison"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Heatmap,
        label: "Heatmap",
        description: "Encode a matrix of values as colour",
        use_case: "Dense patterns across two dimensions",
        complexity: Complexity::Intermediate,
        tags: &["matrix", "density"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Funnel,
        label: "Funnel Chart",
        description: "Show values shrinking through ordered stages",
        use_case: "Conversion through a process",
        complexity: Complexity::Simple,
        tags: &["business", "funnel", "conversion"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Gauge,
        label: "Gauge",
        description: "Show a single value against its range",
        use_case: "KPI status at a glance",
        complexity: Complexity::Simple,
        tags: &["kpi", "dashboard"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Tree,
        label: "Tree",
        description: "Lay out categories as a hierarchy",
        use_case: "Parent/child structures",
        complexity: Complexity::Advanced,
        tags: &["hierarchy", "nested"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Treemap,
        label: "Treemap",
        description: "Nested rectangles sized by value",
        use_case: "Share of total within a hierarchy",
        complexity: Complexity::Intermediate,
        tags: &["hierarchy", "proportion"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Sunburst,
        label: "Sunburst",
        description: "Concentric rings for a multi-level hierarchy",
        use_case: "Drilling into nested categories",
        complexity: Complexity::Advanced,
        tags: &["hierarchy", "nested", "proportion"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Parallel,
        label: "Parallel Coordinates",
        description: "One vertical axis per measure, one line per row",
        use_case: "Exploring many numeric dimensions together",
        complexity: Complexity::Advanced,
        tags: &["multivariate", "parallel"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Sankey,
        label: "Sankey Diagram",
        description: "Flows between sources and targets",
        use_case: "Movement of quantities between states",
        complexity: Complexity::Advanced,
        tags: &["flow"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Graph,
        label: "Network Graph",
        description: "Nodes connected by edges",
        use_case: "Relationships between entities",
        complexity: Complexity::Advanced,
        tags: &["relationship", "network"],
        cartesian: false,
    },
    ChartDescriptor {
        kind: ChartKind::Boxplot,
        label: "Box Plot",
        description: "Quartiles and outliers of a distribution",
        use_case: "Comparing distributions",
        complexity: Complexity::Intermediate,
        tags: &["statistical", "distribution", "outlier"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::Candlestick,
        label: "Candlestick",
        description: "Open/high/low/close per period",
        use_case: "Price movement over time",
        complexity: Complexity::Advanced,
        tags: &["financial", "timeseries"],
        cartesian: true,
    },
    ChartDescriptor {
        kind: ChartKind::ThemeRiver,
        label: "Theme River",
        description: "Streams of categories flowing over time",
        use_case: "How the mix of categories shifts over time",
        complexity: Complexity::Advanced,
        tags: &["timeseries", "stream", "proportion"],
        cartesian: false,
    },
];

impl ChartKind {
    pub const ALL: [ChartKind; 18] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Area,
        ChartKind::Radar,
        ChartKind::Heatmap,
        ChartKind::Funnel,
        ChartKind::Gauge,
        ChartKind::Tree,
        ChartKind::Treemap,
        ChartKind::Sunburst,
        ChartKind::Parallel,
        ChartKind::Sankey,
        ChartKind::Graph,
        ChartKind::Boxplot,
        ChartKind::Candlestick,
        ChartKind::ThemeRiver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Area => "area",
            ChartKind::Radar => "radar",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Funnel => "funnel",
            ChartKind::Gauge => "gauge",
            ChartKind::Tree => "tree",
            ChartKind::Treemap => "treemap",
            ChartKind::Sunburst => "sunburst",
            ChartKind::Parallel => "parallel",
            ChartKind::Sankey => "sankey",
            ChartKind::Graph => "graph",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Candlestick => "candlestick",
            ChartKind::ThemeRiver => "themeRiver",
        }
    }

    pub fn descriptor(&self) -> &'static ChartDescriptor {
        &CATALOG[*self as usize]
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        ChartKind::ALL
            .iter()
            .find(|kind| kind.as_str().to_lowercase() == normalised)
            .copied()
            .ok_or_else(|| format!("unsupported chart type '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_kind() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
        }
    }

    #[test]
    fn parsing_is_lenient() {
        assert_eq!("Bar".parse::<ChartKind>(), Ok(ChartKind::Bar));
        assert_eq!("theme_river".parse::<ChartKind>(), Ok(ChartKind::ThemeRiver));
        assert_eq!("themeRiver".parse::<ChartKind>(), Ok(ChartKind::ThemeRiver));
        assert!("donut".parse::<ChartKind>().is_err());
    }

    #[test]
    fn serde_uses_renderer_names() {
        assert_eq!(
            serde_json::to_string(&ChartKind::ThemeRiver).unwrap(),
            "\"themeRiver\""
        );
        assert_eq!(
            serde_json::from_str::<ChartKind>("\"candlestick\"").unwrap(),
            ChartKind::Candlestick
        );
    }
}
