// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Check command - count nodes and edges, detect cycles

use colored::Colorize;
use miette::Result;

use super::input::{expand_inputs, read_request, InputSource};
use crate::config::{Config, OutputFormat};
use crate::pipeline::{PipelineResponse, PipelineValidator, ValidationReport};
use crate::utils::{create_progress_bar, print_error, print_header, print_info, print_section, print_success, print_warning};

/// Settings for one `check` run, after merging flags over config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub fail_on_cycle: bool,
    pub strict: bool,
    pub show_order: bool,
}

impl CheckOptions {
    /// Merge command-line flags over the loaded configuration
    ///
    /// Boolean flags can only switch a setting on.
    pub fn merge(
        config: &Config,
        format: Option<OutputFormat>,
        fail_on_cycle: bool,
        strict: bool,
        order: bool,
    ) -> Self {
        Self {
            format: format.unwrap_or(config.format),
            fail_on_cycle: fail_on_cycle || config.fail_on_cycle,
            strict: strict || config.strict,
            show_order: order || config.show_order,
        }
    }
}

/// Run the check command
pub async fn run(files: Vec<String>, options: CheckOptions, verbose: bool) -> Result<()> {
    let sources = expand_inputs(&files)?;

    let progress = create_progress_bar(sources.len() as u64, "Checking", options.format == OutputFormat::Text);
    let mut checked: Vec<(InputSource, ValidationReport)> = Vec::with_capacity(sources.len());

    for source in sources {
        let request = read_request(&source).await?;
        let report = PipelineValidator::validate(&request);
        tracing::info!(
            source = %source,
            num_nodes = report.response.num_nodes,
            num_edges = report.response.num_edges,
            is_dag = report.response.is_dag,
            "checked pipeline"
        );
        checked.push((source, report));
        progress.inc(1);
    }
    progress.finish_and_clear();

    match options.format {
        OutputFormat::Json => print_json(&checked)?,
        OutputFormat::Text => {
            for (source, report) in &checked {
                print_text(source, report, options.show_order, verbose);
            }
        }
    }

    let cyclic = checked.iter().filter(|(_, r)| !r.response.is_dag).count();
    let warned = checked.iter().filter(|(_, r)| r.has_warnings()).count();

    if options.fail_on_cycle && cyclic > 0 {
        return Err(miette::miette!(
            "{} of {} pipeline(s) contain a cycle",
            cyclic,
            checked.len()
        ));
    }

    if options.strict && warned > 0 {
        return Err(miette::miette!(
            "{} of {} pipeline(s) have records that were left out (strict mode)",
            warned,
            checked.len()
        ));
    }

    Ok(())
}

fn print_json(checked: &[(InputSource, ValidationReport)]) -> Result<()> {
    let responses: Vec<PipelineResponse> = checked.iter().map(|(_, r)| r.response).collect();

    let out = match responses.as_slice() {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    }
    .map_err(|e| miette::miette!("Failed to serialize result: {}", e))?;

    println!("{}", out);
    Ok(())
}

fn print_text(source: &InputSource, report: &ValidationReport, show_order: bool, verbose: bool) {
    let response = &report.response;

    print_header(&format!("Pipeline: {}", source));
    println!("  Nodes: {}", response.num_nodes.to_string().green().bold());
    println!("  Edges: {}", response.num_edges.to_string().yellow().bold());

    if response.is_dag {
        print_success("Is a DAG (no cycles)");
    } else {
        print_error("Not a DAG (contains a cycle)");
        for error in &report.errors {
            print_info(error);
        }
    }

    if report.has_warnings() {
        if verbose {
            print_section("Warnings");
            for warning in &report.warnings {
                print_warning(warning);
            }
        } else {
            print_warning(&format!(
                "{} record(s) left out of the cycle check (use --verbose for details)",
                report.warnings.len()
            ));
        }
    }

    if show_order {
        if let Some(order) = &report.order {
            print_section("Order");
            for (i, id) in order.iter().enumerate() {
                println!("  {}. {}", i + 1, id);
            }
        }
    }

    println!();
}
