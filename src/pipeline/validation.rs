// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Pipeline validation
//!
//! Wraps the structural check in a report meant for people: the same
//! response the core returns, plus warnings about records that were left
//! out and the cycle that made the pipeline invalid.

use crate::pipeline::detector::{CycleDetector, DagStatus};
use crate::pipeline::graph::PipelineGraph;
use crate::pipeline::payload::{Ident, PipelineRequest, PipelineResponse};

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline request
    ///
    /// Never fails. Warnings describe what the leniency rules dropped; they
    /// do not change the response. The graph is built and traversed once;
    /// the response, cycle and order all come from that one traversal.
    pub fn validate(request: &PipelineRequest) -> ValidationReport {
        let graph = PipelineGraph::from_request(request);
        let status = CycleDetector::new(&graph).run();

        let mut report = ValidationReport::new(PipelineResponse::for_request(request, status.is_dag()));

        for position in graph.skipped_nodes() {
            report.add_warning(&format!(
                "Node #{} has no usable `id` and is left out of the cycle check",
                position
            ));
        }

        for id in graph.duplicate_ids() {
            report.add_warning(&format!("Node id '{}' is used by more than one node", id));
        }

        for position in graph.skipped_edges() {
            report.add_warning(&format!(
                "Edge #{} is missing its `source` or `target` and is left out of the cycle check",
                position
            ));
        }

        for (source, target) in graph.dangling_edges() {
            let missing = if graph.contains(source) { target } else { source };
            report.add_warning(&format!(
                "Edge '{}' -> '{}' refers to unknown node '{}'",
                source, target, missing
            ));
        }

        match status {
            DagStatus::Acyclic(order) => report.order = Some(order),
            DagStatus::Cyclic(cycle) => {
                let path: Vec<String> = cycle.iter().map(Ident::to_string).collect();
                report.add_error(&format!("Circular dependency: {}", path.join(" → ")));
                report.cycle = Some(cycle);
            }
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated pipeline"
        );

        report
    }
}

/// Result of pipeline validation
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub response: PipelineResponse,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// First cycle found, closed (first node repeated at the end)
    pub cycle: Option<Vec<Ident>>,
    /// Topological order of the known nodes, when there is one
    pub order: Option<Vec<Ident>>,
}

impl ValidationReport {
    pub fn new(response: PipelineResponse) -> Self {
        Self {
            response,
            errors: Vec::new(),
            warnings: Vec::new(),
            cycle: None,
            order: None,
        }
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
