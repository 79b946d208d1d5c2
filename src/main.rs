// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! dagcheck - Pipeline Graph Validation
//!
//! Count the nodes and edges of a pipeline and check that it is a DAG.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dagcheck::cli::check::CheckOptions;
use dagcheck::cli::{Cli, Commands};
use dagcheck::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "dagcheck=debug" } else { "dagcheck=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Check {
            files,
            format,
            fail_on_cycle,
            strict,
            order,
        } => {
            let options = CheckOptions::merge(&config, format, fail_on_cycle, strict, order);
            dagcheck::cli::check::run(files, options, cli.verbose).await
        }
        Commands::Graph { file, format } => {
            dagcheck::cli::graph::run(file, format, cli.verbose).await
        }
    }
}
