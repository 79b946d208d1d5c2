// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! # dagcheck - Pipeline Graph Validation
//!
//! `dagcheck` takes the nodes and edges of a visual pipeline, as an editor
//! submits them, and reports how many there are and whether they form a
//! directed acyclic graph.
//!
//! ## Features
//!
//! - **Lenient input** - records without usable ids are counted but never fail a check
//! - **Three-color DFS** - linear-time cycle detection that survives very deep pipelines
//! - **Diagnostics** - cycle path, topological order and dropped-record warnings
//! - **Diagrams** - DOT and Mermaid output
//!
//! ## Quick Start
//!
//! ```rust
//! use dagcheck::{parse_pipeline, PipelineRequest};
//! use serde_json::json;
//!
//! let request = PipelineRequest::new(
//!     vec![json!({"id": "input"}), json!({"id": "llm"})],
//!     vec![json!({"source": "input", "target": "llm"})],
//! );
//!
//! let response = parse_pipeline(&request);
//! assert_eq!(response.num_nodes, 2);
//! assert_eq!(response.num_edges, 1);
//! assert!(response.is_dag);
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use errors::{DagcheckError, DagcheckResult};
pub use pipeline::{parse_pipeline, CycleDetector, Ident, PipelineGraph, PipelineRequest, PipelineResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
