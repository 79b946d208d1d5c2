// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Pipeline request/response payloads
//!
//! Nodes and edges arrive as open JSON records. Only `id` is read from a
//! node, and only `source`/`target` from an edge. Everything else a visual
//! editor attaches (position, data, handles) is carried along untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::errors::{DagcheckError, DagcheckResult};

/// A pipeline as submitted by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Raw node records, in submission order
    pub nodes: Vec<Value>,

    /// Raw edge records, in submission order
    pub edges: Vec<Value>,
}

/// Structural summary returned for a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResponse {
    /// Length of the raw node list, malformed records included
    pub num_nodes: usize,

    /// Length of the raw edge list, malformed records included
    pub num_edges: usize,

    /// Whether the known nodes and the edges between them form a DAG
    pub is_dag: bool,
}

impl PipelineRequest {
    /// Create a request from already-parsed records
    pub fn new(nodes: Vec<Value>, edges: Vec<Value>) -> Self {
        Self { nodes, edges }
    }

    /// Parse a request from a JSON document
    pub fn from_json(json: &str) -> DagcheckResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a request from a YAML document
    pub fn from_yaml(yaml: &str) -> DagcheckResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a request, picking the format from the file extension
    ///
    /// `.yaml` and `.yml` are read as YAML, anything else as JSON.
    pub fn parse(content: &str, path: Option<&Path>) -> DagcheckResult<Self> {
        let is_yaml = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml(content)
        } else {
            Self::from_json(content)
        }
    }

    /// Check the minimal shape (an object holding two lists) and take it apart
    ///
    /// This is the only rejection point: anything that gets past it is
    /// accepted by the core no matter what the individual records look like.
    pub fn from_value(value: Value) -> DagcheckResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(DagcheckError::invalid_payload(format!(
                "expected an object, found {}",
                json_type_name(&value)
            )));
        };

        let nodes = take_list(&mut map, "nodes")?;
        let edges = take_list(&mut map, "edges")?;

        Ok(Self { nodes, edges })
    }

    /// Number of raw node records
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of raw edge records
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

impl PipelineResponse {
    /// Pair the literal record counts of `request` with a DAG verdict
    pub fn for_request(request: &PipelineRequest, is_dag: bool) -> Self {
        Self {
            num_nodes: request.num_nodes(),
            num_edges: request.num_edges(),
            is_dag,
        }
    }
}

fn take_list(map: &mut serde_json::Map<String, Value>, key: &str) -> DagcheckResult<Vec<Value>> {
    match map.remove(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(DagcheckError::invalid_payload(format!(
            "`{}` must be a list, found {}",
            key,
            json_type_name(&other)
        ))),
        None => Err(DagcheckError::invalid_payload(format!(
            "missing `{}` list",
            key
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identifier extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a node, as read from an `id`, `source` or `target` field
///
/// Strings and numbers never compare equal to each other, so `1` and `"1"`
/// are different nodes. Numbers compare by value: `1` and `1.0` are the same
/// node.
#[derive(Debug, Clone)]
pub enum Ident {
    Str(String),
    /// Integral numbers, whether written as `1` or `1.0`
    Int(i128),
    /// Numbers with a fractional part
    Float(f64),
}

impl Ident {
    /// The string form, if this identifier is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn from_number(n: &serde_json::Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            return (i != 0).then_some(Self::Int(i128::from(i)));
        }
        if let Some(u) = n.as_u64() {
            return Some(Self::Int(i128::from(u)));
        }

        let f = n.as_f64()?;
        if f == 0.0 || !f.is_finite() {
            None
        } else if f.fract() == 0.0 && f.abs() < i128::MAX as f64 {
            Some(Self::Int(f as i128))
        } else {
            Some(Self::Float(f))
        }
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // Never zero or NaN, so bit equality is value equality
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Ident {}

impl std::hash::Hash for Ident {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Str(s) => s.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Read the identifier of a raw node record
pub fn node_id(record: &Value) -> Option<Ident> {
    identifier(record.get("id"))
}

/// Read the `(source, target)` pair of a raw edge record
///
/// Returns `None` unless both endpoints are usable identifiers.
pub fn edge_endpoints(record: &Value) -> Option<(Ident, Ident)> {
    let source = identifier(record.get("source"))?;
    let target = identifier(record.get("target"))?;
    Some((source, target))
}

/// Turn a field value into an identifier
///
/// Non-empty strings and non-zero numbers are identifiers. Empty strings,
/// zero, null, booleans, lists and objects are not.
pub fn identifier(value: Option<&Value>) -> Option<Ident> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(Ident::Str(s.clone())),
        Value::Number(n) => Ident::from_number(n),
        _ => None,
    }
}
