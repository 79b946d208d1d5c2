// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Directed graph built from raw pipeline records
//!
//! Known nodes are the identifiers extracted from the node list, in
//! first-appearance order. Adjacency is keyed by edge source and may mention
//! identifiers that are not known nodes; those entries are kept but never
//! traversed.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::pipeline::detector::{CycleDetector, DagStatus};
use crate::pipeline::payload::{edge_endpoints, node_id, Ident, PipelineRequest};

/// Node identifiers plus adjacency for one pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
    node_ids: Vec<Ident>,
    index: HashMap<Ident, usize>,
    adjacency: HashMap<Ident, Vec<Ident>>,
    edges: Vec<(Ident, Ident)>,
    skipped_nodes: Vec<usize>,
    duplicate_ids: Vec<Ident>,
    skipped_edges: Vec<usize>,
}

impl PipelineGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a request
    pub fn from_request(request: &PipelineRequest) -> Self {
        let mut graph = Self::new();

        for (position, record) in request.nodes.iter().enumerate() {
            match node_id(record) {
                Some(id) => graph.add_node(id),
                None => graph.skipped_nodes.push(position),
            }
        }

        for (position, record) in request.edges.iter().enumerate() {
            match edge_endpoints(record) {
                Some((source, target)) => graph.add_edge(source, target),
                None => graph.skipped_edges.push(position),
            }
        }

        tracing::debug!(
            nodes = graph.node_ids.len(),
            edges = graph.edges.len(),
            skipped_nodes = graph.skipped_nodes.len(),
            skipped_edges = graph.skipped_edges.len(),
            "built pipeline graph"
        );

        graph
    }

    /// Add a known node; a repeated identifier is recorded and otherwise ignored
    pub fn add_node(&mut self, id: impl Into<Ident>) {
        let id = id.into();
        if self.index.contains_key(&id) {
            if !self.duplicate_ids.contains(&id) {
                self.duplicate_ids.push(id);
            }
            return;
        }
        self.index.insert(id.clone(), self.node_ids.len());
        self.node_ids.push(id);
    }

    /// Add an edge; parallel edges are kept
    pub fn add_edge(&mut self, source: impl Into<Ident>, target: impl Into<Ident>) {
        let source = source.into();
        let target = target.into();
        self.adjacency
            .entry(source.clone())
            .or_default()
            .push(target.clone());
        self.edges.push((source, target));
    }

    /// Known node identifiers, in first-appearance order
    pub fn node_ids(&self) -> &[Ident] {
        &self.node_ids
    }

    /// Number of unique known nodes
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of edges with both endpoints present
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether `id` is a known node
    pub fn contains(&self, id: &Ident) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a known node in [`node_ids`](Self::node_ids)
    pub fn position(&self, id: &Ident) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Edge targets of `id` in insertion order, known or not
    pub fn successors(&self, id: &Ident) -> &[Ident] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Edges with both endpoints present, in insertion order
    pub fn edges(&self) -> &[(Ident, Ident)] {
        &self.edges
    }

    /// Edges whose source or target is not a known node
    pub fn dangling_edges(&self) -> Vec<(&Ident, &Ident)> {
        self.edges
            .iter()
            .filter(|(s, t)| !self.contains(s) || !self.contains(t))
            .map(|(s, t)| (s, t))
            .collect()
    }

    /// Positions of node records that carried no identifier
    pub fn skipped_nodes(&self) -> &[usize] {
        &self.skipped_nodes
    }

    /// Identifiers that appeared on more than one node record
    pub fn duplicate_ids(&self) -> &[Ident] {
        &self.duplicate_ids
    }

    /// Positions of edge records missing an endpoint
    pub fn skipped_edges(&self) -> &[usize] {
        &self.skipped_edges
    }

    /// Known predecessors of every known node, by node position
    ///
    /// One pass over the edges; each predecessor is listed once, in edge order.
    pub fn predecessor_lists(&self) -> Vec<Vec<&Ident>> {
        let mut preds: Vec<Vec<&Ident>> = vec![Vec::new(); self.node_ids.len()];
        for (source, target) in &self.edges {
            if let (Some(s), Some(t)) = (self.position(source), self.position(target)) {
                let source = &self.node_ids[s];
                if !preds[t].contains(&source) {
                    preds[t].push(source);
                }
            }
        }
        preds
    }

    /// Project the known part of the graph onto a petgraph `DiGraph`
    ///
    /// Node weights are identifiers; node `i` is `node_ids()[i]`.
    pub fn to_digraph(&self) -> DiGraph<Ident, ()> {
        let mut graph = DiGraph::with_capacity(self.node_ids.len(), self.edges.len());
        for id in &self.node_ids {
            graph.add_node(id.clone());
        }
        for (source, target) in &self.edges {
            if let (Some(s), Some(t)) = (self.position(source), self.position(target)) {
                graph.add_edge(NodeIndex::new(s), NodeIndex::new(t), ());
            }
        }
        graph
    }

    /// Check if `to` is reachable from `from` over known nodes
    pub fn has_path(&self, from: &Ident, to: &Ident) -> bool {
        let (Some(from), Some(to)) = (self.position(from), self.position(to)) else {
            return false;
        };
        let graph = self.to_digraph();
        has_path_connecting(&graph, NodeIndex::new(from), NodeIndex::new(to), None)
    }

    /// Generate Mermaid diagram of the graph
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for (i, id) in self.node_ids.iter().enumerate() {
            out.push_str(&format!("    n{}[\"{}\"]\n", i, id.to_string().replace('"', "#quot;")));
        }

        for (source, target) in &self.edges {
            if let (Some(s), Some(t)) = (self.position(source), self.position(target)) {
                out.push_str(&format!("    n{} --> n{}\n", s, t));
            }
        }

        out
    }

    /// Generate DOT diagram of the graph
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for id in &self.node_ids {
            out.push_str(&format!("    \"{}\";\n", escape_dot(id)));
        }

        for (source, target) in &self.edges {
            if self.contains(source) && self.contains(target) {
                out.push_str(&format!(
                    "    \"{}\" -> \"{}\";\n",
                    escape_dot(source),
                    escape_dot(target)
                ));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Generate text representation: execution order, or the cycle found
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        match CycleDetector::new(self).run() {
            DagStatus::Acyclic(order) => {
                let preds = self.predecessor_lists();
                for (i, id) in order.iter().enumerate() {
                    out.push_str(&format!("{}. {}", i + 1, id));
                    let after = self.position(id).map(|p| preds[p].as_slice()).unwrap_or_default();
                    if !after.is_empty() {
                        let names: Vec<String> = after.iter().map(ToString::to_string).collect();
                        out.push_str(&format!(" [after: {}]", names.join(", ")));
                    }
                    out.push('\n');
                }
            }
            DagStatus::Cyclic(cycle) => {
                let names: Vec<String> = cycle.iter().map(ToString::to_string).collect();
                out.push_str(&format!("cycle: {}\n", names.join(" -> ")));
            }
        }

        out
    }
}

fn escape_dot(id: &Ident) -> String {
    id.to_string().replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(nodes: &[&str], edges: &[(&str, &str)]) -> PipelineRequest {
        PipelineRequest::new(
            nodes.iter().map(|id| json!({ "id": id })).collect(),
            edges
                .iter()
                .map(|(s, t)| json!({ "source": s, "target": t }))
                .collect(),
        )
    }

    fn id(s: &str) -> Ident {
        Ident::from(s)
    }

    #[test]
    fn test_build_keeps_parallel_edges() {
        let graph = PipelineGraph::from_request(&request(&["a", "b"], &[("a", "b"), ("a", "b")]));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors(&id("a")), ["b", "b"]);
        assert!(graph.successors(&id("b")).is_empty());
    }

    #[test]
    fn test_build_records_dropped_records() {
        let req = PipelineRequest::new(
            vec![json!({"id": "a"}), json!({"type": "note"}), json!({"id": "a"}), json!({"id": ""})],
            vec![json!({"source": "a"}), json!({"source": "a", "target": "ghost"})],
        );
        let graph = PipelineGraph::from_request(&req);

        assert_eq!(graph.node_ids(), ["a"]);
        assert_eq!(graph.skipped_nodes(), [1, 3]);
        assert_eq!(graph.duplicate_ids(), ["a"]);
        assert_eq!(graph.skipped_edges(), [0]);
        assert_eq!(graph.dangling_edges(), vec![(&id("a"), &id("ghost"))]);
        // Unknown targets stay in adjacency
        assert_eq!(graph.successors(&id("a")), ["ghost"]);
    }

    #[test]
    fn test_edges_never_create_nodes() {
        let graph = PipelineGraph::from_request(&request(&["a"], &[("x", "y")]));
        assert_eq!(graph.node_ids(), ["a"]);
        assert!(!graph.contains(&id("x")));
        assert_eq!(graph.successors(&id("x")), ["y"]);
    }

    #[test]
    fn test_numeric_ids_are_not_strings() {
        let req = PipelineRequest::new(
            vec![json!({"id": 1}), json!({"id": "1"}), json!({"id": 1.0})],
            vec![json!({"source": 1.0, "target": "1"})],
        );
        let graph = PipelineGraph::from_request(&req);

        assert_eq!(graph.node_ids(), [Ident::Int(1), id("1")]);
        assert_eq!(graph.duplicate_ids(), [Ident::Int(1)]);
        assert_eq!(graph.successors(&Ident::Int(1)), [id("1")]);
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn test_has_path() {
        let graph = PipelineGraph::from_request(&request(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "c")],
        ));

        assert!(graph.has_path(&id("a"), &id("c"))); // transitive
        assert!(graph.has_path(&id("a"), &id("b"))); // direct
        assert!(!graph.has_path(&id("c"), &id("a"))); // reverse
        assert!(!graph.has_path(&id("a"), &id("ghost")));
    }

    #[test]
    fn test_digraph_skips_dangling_edges() {
        let graph = PipelineGraph::from_request(&request(&["a", "b"], &[("a", "b"), ("b", "zz")]));
        let digraph = graph.to_digraph();
        assert_eq!(digraph.node_count(), 2);
        assert_eq!(digraph.edge_count(), 1);
        assert_eq!(digraph[NodeIndex::new(1)], "b");
    }

    #[test]
    fn test_predecessor_lists() {
        let graph = PipelineGraph::from_request(&request(
            &["a", "b", "c"],
            &[("a", "c"), ("b", "c"), ("a", "c"), ("ghost", "c"), ("a", "b")],
        ));
        let preds = graph.predecessor_lists();

        assert!(preds[0].is_empty());
        assert_eq!(preds[1], vec![&id("a")]);
        assert_eq!(preds[2], vec![&id("a"), &id("b")]);
    }

    #[test]
    fn test_mermaid_output() {
        let graph = PipelineGraph::from_request(&request(&["input", "llm"], &[("input", "llm")]));
        let mermaid = graph.to_mermaid();

        assert!(mermaid.contains("graph TD"));
        assert!(mermaid.contains("n0[\"input\"]"));
        assert!(mermaid.contains("n0 --> n1"));
    }

    #[test]
    fn test_dot_output_escapes_quotes() {
        let graph = PipelineGraph::from_request(&request(&["say \"hi\"", "out"], &[("say \"hi\"", "out")]));
        let dot = graph.to_dot();

        assert!(dot.starts_with("digraph pipeline {"));
        assert!(dot.contains("\"say \\\"hi\\\"\" -> \"out\";"));
    }

    #[test]
    fn test_text_output() {
        let dag = PipelineGraph::from_request(&request(&["a", "b"], &[("a", "b"), ("a", "b")]));
        assert_eq!(dag.to_text(), "1. a\n2. b [after: a]\n");

        let cyclic = PipelineGraph::from_request(&request(&["a", "b"], &[("a", "b"), ("b", "a")]));
        assert_eq!(cyclic.to_text(), "cycle: a -> b -> a\n");
    }
}
