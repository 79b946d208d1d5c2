// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Cycle detection for pipeline graphs
//!
//! Three-color depth-first search over the known nodes of a
//! [`PipelineGraph`]. Every node starts unvisited, turns in-progress while it
//! sits on the current path and finished once all of its successors are
//! explored. Reaching an in-progress node again is a back-edge, which means
//! the graph has a cycle.
//!
//! The traversal keeps its own stack of `(node, next successor)` frames, so
//! very deep pipelines do not grow the call stack. Edge targets that are not
//! known nodes are skipped when scanning successors.

use crate::pipeline::graph::PipelineGraph;
use crate::pipeline::payload::{Ident, PipelineRequest, PipelineResponse};

/// Per-node traversal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Finished,
}

/// Outcome of one full traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagStatus {
    /// No back-edge; known nodes in topological order
    Acyclic(Vec<Ident>),
    /// First back-edge found; the closed path it completes
    Cyclic(Vec<Ident>),
}

impl DagStatus {
    pub fn is_dag(&self) -> bool {
        matches!(self, Self::Acyclic(_))
    }

    /// Topological order, when there is one
    pub fn order(&self) -> Option<&[Ident]> {
        match self {
            Self::Acyclic(order) => Some(order),
            Self::Cyclic(_) => None,
        }
    }

    /// Cycle path, when there is one
    pub fn cycle(&self) -> Option<&[Ident]> {
        match self {
            Self::Cyclic(cycle) => Some(cycle),
            Self::Acyclic(_) => None,
        }
    }
}

/// Answers whether a [`PipelineGraph`] is acyclic
///
/// Holds no state of its own between calls: each query builds a fresh color
/// map, so the same detector can be asked repeatedly. Use [`run`](Self::run)
/// when more than one answer is needed from the same traversal.
///
/// # Example
///
/// ```rust
/// use dagcheck::pipeline::{CycleDetector, PipelineGraph};
///
/// let mut graph = PipelineGraph::new();
/// graph.add_node("input");
/// graph.add_node("llm");
/// graph.add_edge("input", "llm");
///
/// let detector = CycleDetector::new(&graph);
/// assert!(detector.is_dag());
/// assert_eq!(detector.topological_order().unwrap(), vec!["input", "llm"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CycleDetector<'g> {
    graph: &'g PipelineGraph,
}

impl<'g> CycleDetector<'g> {
    /// Create a detector over `graph`
    pub fn new(graph: &'g PipelineGraph) -> Self {
        Self { graph }
    }

    /// Check if the known nodes and the edges between them form a DAG
    ///
    /// A graph with no known nodes is trivially a DAG.
    pub fn is_dag(&self) -> bool {
        self.run().is_dag()
    }

    /// Find the first cycle the traversal runs into
    ///
    /// The path starts at the node the back-edge points to and repeats it at
    /// the end, so `a -> b -> a` comes back as `["a", "b", "a"]` and a
    /// self-loop on `a` as `["a", "a"]`.
    pub fn find_cycle(&self) -> Option<Vec<Ident>> {
        match self.run() {
            DagStatus::Cyclic(path) => Some(path),
            DagStatus::Acyclic(_) => None,
        }
    }

    /// Known nodes in topological order, or `None` if there is a cycle
    ///
    /// This is the reverse of the finishing order, so for every edge `u -> v`
    /// between known nodes `u` comes before `v`.
    pub fn topological_order(&self) -> Option<Vec<Ident>> {
        match self.run() {
            DagStatus::Acyclic(order) => Some(order),
            DagStatus::Cyclic(_) => None,
        }
    }

    /// Traverse the whole graph once
    pub fn run(&self) -> DagStatus {
        let ids = self.graph.node_ids();
        let names = |positions: Vec<usize>| -> Vec<Ident> {
            positions.into_iter().map(|p| ids[p].clone()).collect()
        };

        let mut color = vec![Color::Unvisited; ids.len()];
        let mut finished = Vec::with_capacity(ids.len());
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..ids.len() {
            if color[root] != Color::Unvisited {
                continue;
            }

            color[root] = Color::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                let successors = self.graph.successors(&ids[node]);

                if cursor == successors.len() {
                    color[node] = Color::Finished;
                    finished.push(node);
                    stack.pop();
                    continue;
                }
                frame.1 += 1;

                // Targets outside the node list cannot close a cycle
                let Some(next) = self.graph.position(&successors[cursor]) else {
                    continue;
                };

                match color[next] {
                    Color::InProgress => {
                        tracing::trace!(from = %ids[node], to = %ids[next], "back-edge found");
                        let start = stack
                            .iter()
                            .position(|&(n, _)| n == next)
                            .unwrap_or_default();
                        let mut path: Vec<usize> = stack[start..].iter().map(|&(n, _)| n).collect();
                        path.push(next);
                        return DagStatus::Cyclic(names(path));
                    }
                    Color::Unvisited => {
                        color[next] = Color::InProgress;
                        stack.push((next, 0));
                    }
                    Color::Finished => {}
                }
            }
        }

        finished.reverse();
        DagStatus::Acyclic(names(finished))
    }
}

/// Count the records of a pipeline and check whether it is a DAG
///
/// Counts are the literal lengths of the submitted lists. Records without
/// usable identifiers still count, they just take no part in the cycle check.
pub fn parse_pipeline(request: &PipelineRequest) -> PipelineResponse {
    let graph = PipelineGraph::from_request(request);
    let response = PipelineResponse::for_request(request, CycleDetector::new(&graph).is_dag());

    tracing::debug!(
        num_nodes = response.num_nodes,
        num_edges = response.num_edges,
        is_dag = response.is_dag,
        "parsed pipeline"
    );

    response
}
