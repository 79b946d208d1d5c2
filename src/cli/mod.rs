// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for dagcheck.

pub mod check;
pub mod graph;
pub mod input;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Pipeline graph checker
///
/// Count the nodes and edges of a pipeline and check that it has no cycles.
#[derive(Parser, Debug)]
#[clap(
    name = "dagcheck",
    version,
    about = "Structural validation for visual pipeline graphs",
    long_about = None,
    after_help = "Examples:\n\
        dagcheck check pipeline.json         Check one payload\n\
        dagcheck check 'pipelines/*.json'    Check every matching payload\n\
        cat pipeline.json | dagcheck check   Read the payload from stdin\n\
        dagcheck graph pipeline.json -f dot  Render the pipeline as DOT\n\n\
        See 'dagcheck <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: .dagcheck.yaml/.yml/.toml if present)
    #[clap(long, global = true, value_name = "FILE", env = "DAGCHECK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count nodes and edges and check that each pipeline is a DAG
    Check {
        /// Payload files or glob patterns ('-' or nothing reads stdin)
        files: Vec<String>,

        /// Output format (text, json)
        #[clap(short, long)]
        format: Option<OutputFormat>,

        /// Exit with an error if any pipeline contains a cycle
        #[clap(long)]
        fail_on_cycle: bool,

        /// Exit with an error if any record had to be left out
        #[clap(long)]
        strict: bool,

        /// Print the topological order of valid pipelines
        #[clap(long)]
        order: bool,
    },

    /// Show a pipeline as a graph
    Graph {
        /// Payload file ('-' reads stdin)
        #[clap(default_value = "-")]
        file: String,

        /// Output format (text, dot, mermaid)
        #[clap(short, long, default_value = "text")]
        format: GraphFormat,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "dot" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::parse_from(["dagcheck", "check", "a.json", "b.json", "-f", "json", "--fail-on-cycle"]);
        match cli.command {
            Commands::Check {
                files,
                format,
                fail_on_cycle,
                strict,
                order,
            } => {
                assert_eq!(files, vec!["a.json", "b.json"]);
                assert_eq!(format, Some(OutputFormat::Json));
                assert!(fail_on_cycle);
                assert!(!strict);
                assert!(!order);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_graph_format_parsing() {
        assert_eq!("DOT".parse::<GraphFormat>(), Ok(GraphFormat::Dot));
        assert!("svg".parse::<GraphFormat>().is_err());
    }
}
