// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Pipeline graphs and their structural validation
//!
//! Raw editor payloads go in, a node count, an edge count and a DAG flag
//! come out.

mod detector;
mod graph;
mod payload;
mod validation;

pub use detector::{parse_pipeline, CycleDetector, DagStatus};
pub use graph::PipelineGraph;
pub use payload::{edge_endpoints, identifier, node_id, Ident, PipelineRequest, PipelineResponse};
pub use validation::{PipelineValidator, ValidationReport};
