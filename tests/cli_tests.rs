// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! End-to-end tests for the dagcheck binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const DAG: &str = r#"{
  "nodes": [
    {"id": "customInput-1", "type": "customInput", "position": {"x": 0, "y": 0}},
    {"id": "llm-1", "type": "llm"},
    {"id": "customOutput-1", "type": "customOutput"}
  ],
  "edges": [
    {"id": "e1", "source": "customInput-1", "target": "llm-1", "sourceHandle": "customInput-1-value"},
    {"id": "e2", "source": "llm-1", "target": "customOutput-1"}
  ]
}"#;

const CYCLE: &str = r#"{
  "nodes": [{"id": "a"}, {"id": "b"}],
  "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "a"}]
}"#;

const SLOPPY: &str = r#"{
  "nodes": [{"id": "a"}, {"type": "note"}],
  "edges": [{"source": "a"}, {"source": "a", "target": "ghost"}]
}"#;

fn dagcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dagcheck").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DAGCHECK_CONFIG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).unwrap();
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_check_json_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pipeline.json", DAG);

    let output = dagcheck(&dir)
        .args(["check", "pipeline.json", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"num_nodes": 3, "num_edges": 2, "is_dag": true})
    );
}

#[test]
fn test_check_text_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "cycle.json", CYCLE);

    dagcheck(&dir)
        .args(["check", "cycle.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes: "))
        .stdout(predicate::str::contains("Not a DAG"))
        .stdout(predicate::str::contains("a → b → a"));
}

#[test]
fn test_check_reads_stdin() {
    let dir = TempDir::new().unwrap();

    let output = dagcheck(&dir)
        .args(["check", "-f", "json"])
        .write_stdin(r#"{"nodes": [], "edges": [{"source": "x", "target": "x"}]}"#)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"num_nodes": 0, "num_edges": 1, "is_dag": true})
    );
}

#[test]
fn test_check_glob_emits_array() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.json", DAG);
    write(&dir, "b.json", CYCLE);

    let output = dagcheck(&dir)
        .args(["check", "*.json", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let results = stdout_json(&output);
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|r| r["is_dag"] == json!(false)));
}

#[test]
fn test_fail_on_cycle() {
    let dir = TempDir::new().unwrap();
    write(&dir, "cycle.json", CYCLE);
    write(&dir, "dag.json", DAG);

    dagcheck(&dir)
        .args(["check", "cycle.json", "--fail-on-cycle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("contain a cycle"));

    dagcheck(&dir)
        .args(["check", "dag.json", "--fail-on-cycle"])
        .assert()
        .success();
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    write(&dir, "cycle.json", CYCLE);
    write(&dir, ".dagcheck.yaml", "format: json\nfail_on_cycle: true\n");

    dagcheck(&dir)
        .args(["check", "cycle.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"is_dag\": false"));
}

#[test]
fn test_strict_mode_fails_on_dropped_records() {
    let dir = TempDir::new().unwrap();
    write(&dir, "sloppy.json", SLOPPY);

    // Lenient by default
    dagcheck(&dir)
        .args(["check", "sloppy.json", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown node 'ghost'"));

    dagcheck(&dir)
        .args(["check", "sloppy.json", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn test_invalid_payload_shape() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bad.json", r#"{"nodes": []}"#);

    dagcheck(&dir)
        .args(["check", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing `edges` list"));
}

#[test]
fn test_missing_payload_file() {
    let dir = TempDir::new().unwrap();

    dagcheck(&dir)
        .args(["check", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Payload file not found"));
}

#[test]
fn test_graph_dot_output() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pipeline.json", DAG);

    dagcheck(&dir)
        .args(["graph", "pipeline.json", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph pipeline {"))
        .stdout(predicate::str::contains("\"customInput-1\" -> \"llm-1\";"));
}

#[test]
fn test_graph_text_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pipeline.yaml", "nodes:\n  - id: b\n  - id: a\nedges:\n  - source: a\n    target: b\n");

    dagcheck(&dir)
        .args(["graph", "pipeline.yaml"])
        .assert()
        .success()
        .stdout("1. a\n2. b [after: a]\n");
}

#[test]
fn test_graph_verbose_summary_on_stderr() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pipeline.json", SLOPPY);

    dagcheck(&dir)
        .args(["graph", "pipeline.json", "--verbose"])
        .assert()
        .success()
        .stdout("1. a\n")
        .stderr(predicate::str::contains(
            "pipeline.json: 1 node(s), 1 edge(s) drawn; 1 node and 1 edge record(s) left out, 1 dangling edge(s)",
        ));

    dagcheck(&dir)
        .args(["graph", "pipeline.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("drawn").not());
}

#[test]
fn test_check_numeric_ids_compare_by_type_and_value() {
    let dir = TempDir::new().unwrap();
    write(&dir, "spelled.json", r#"{"nodes": [{"id": 1}], "edges": [{"source": "1", "target": "1"}]}"#);
    write(&dir, "float.json", r#"{"nodes": [{"id": 1}], "edges": [{"source": 1.0, "target": 1}]}"#);

    let spelled = dagcheck(&dir)
        .args(["check", "spelled.json", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&spelled),
        json!({"num_nodes": 1, "num_edges": 1, "is_dag": true})
    );

    let float = dagcheck(&dir)
        .args(["check", "float.json", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&float),
        json!({"num_nodes": 1, "num_edges": 1, "is_dag": false})
    );
}
