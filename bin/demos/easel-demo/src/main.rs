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

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use easel::{
    synthesize, validate_with_report, ChartAdvisor, ChartKind, ChartSuggestion, EaselConfig, Table,
};
use easel_contracts::EnhancementConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Rank chart suggestions for a table.
    Suggest,
    /// Build the render configuration for one chart.
    Configure {
        /// Chart type; defaults to the top-ranked suggestion.
        #[arg(long)]
        chart: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Also print the validation report.
        #[arg(long, default_value_t = false)]
        report: bool,
    },
    /// Ask the enhancement service for insights.
    Insights,
    /// Print what the table looks like to the rules.
    Patterns,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "easel-demo")]
#[command(about = "Chart suggestions and render configurations for a JSON table")]
struct Cli {
    /// Table in `{"columns": [{"name", "type", "values"}]}` form.
    #[arg(long, default_value = "bin/demos/easel-demo/data/sales.json")]
    table: PathBuf,
    /// YAML configuration; EASEL_* variables override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Enable the enhancement service at this URL.
    #[arg(long)]
    enhancer_url: Option<String>,
    #[arg(long, default_value_t = false)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

fn load_table(path: &Path) -> Result<Table> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid table", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let filter = if args.debug {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,reqwest=info,hyper=info,hyper_util=info"))
    } else {
        EnvFilter::new("info,reqwest=warn,hyper=warn,hyper_util=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    info!("Starting easel demo");

    let mut config = EaselConfig::load(args.config.as_deref()).context("invalid configuration")?;
    if let Some(url) = &args.enhancer_url {
        config.enhancement = EnhancementConfig {
            preferences: config.enhancement.preferences.clone(),
            ..EnhancementConfig::enabled_at(url.clone())
        };
    }

    let table = Arc::new(load_table(&args.table)?);
    info!(
        rows = table.row_count(),
        columns = table.summary().total_columns,
        "Loaded table"
    );

    let advisor = ChartAdvisor::new(config);
    if advisor.config().enhancement.enabled && !advisor.initialize().await {
        warn!("Enhancement service unreachable; continuing with local rules");
    }

    match args.command {
        Commands::Suggest => {
            let suggestions = advisor.suggest(Arc::clone(&table)).await;
            print_json(&suggestions)?;
        }
        Commands::Configure {
            chart,
            title,
            report,
        } => {
            let suggestion = match chart {
                Some(name) => {
                    let kind: ChartKind = name.parse().map_err(anyhow::Error::msg)?;
                    advisor
                        .local_suggestions(&table)
                        .into_iter()
                        .find(|s| s.kind == kind)
                        .unwrap_or_else(|| ChartSuggestion::new(kind, 50))
                }
                None => match advisor.suggest(Arc::clone(&table)).await.into_iter().next() {
                    Some(top) => top,
                    None => bail!("no chart fits this table; pass --chart to force one"),
                },
            };
            if report {
                let (config, report) = validate_with_report(synthesize(
                    &suggestion,
                    &table,
                    title.as_deref(),
                    &advisor.config().limits,
                ));
                print_json(&config)?;
                print_json(&report)?;
            } else {
                let config = advisor
                    .configure(&suggestion, &table, title.as_deref())
                    .await;
                print_json(&config)?;
            }
        }
        Commands::Insights => {
            let insights = advisor.insights(&table).await;
            if insights.is_empty() {
                info!("No insights available");
            }
            for insight in insights {
                println!("- {insight}");
            }
        }
        Commands::Patterns => {
            let patterns = advisor.analyze(&table);
            println!("{}", patterns.describe());
            print_json(&patterns)?;
        }
    }

    Ok(())
}
