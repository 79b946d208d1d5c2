// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Graph command - visualize a pipeline as a graph

use miette::Result;

use super::input::{expand_inputs, read_request};
use super::GraphFormat;
use crate::pipeline::PipelineGraph;

/// Run the graph command
pub async fn run(file: String, format: GraphFormat, verbose: bool) -> Result<()> {
    let sources = expand_inputs(std::slice::from_ref(&file))?;
    let [source] = sources.as_slice() else {
        return Err(miette::miette!(
            "'{}' matched {} files; graph renders one pipeline at a time",
            file,
            sources.len()
        ));
    };

    let request = read_request(source).await?;
    let graph = PipelineGraph::from_request(&request);

    let output = match format {
        GraphFormat::Text => graph.to_text(),
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Mermaid => graph.to_mermaid(),
    };

    print!("{}", output);

    // Stdout carries the rendering, so the summary goes to stderr
    if verbose {
        eprintln!(
            "{}: {} node(s), {} edge(s) drawn; {} node and {} edge record(s) left out, {} dangling edge(s)",
            source,
            graph.node_count(),
            graph.edge_count(),
            graph.skipped_nodes().len(),
            graph.skipped_edges().len(),
            graph.dangling_edges().len()
        );
    }

    Ok(())
}
