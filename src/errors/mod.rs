// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Error types for the dagcheck command-line layer
//!
//! The graph core never fails: malformed records are excluded, not rejected.
//! Everything here belongs to the layer that loads payloads and configuration
//! before handing them to the core.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dagcheck operations
pub type DagcheckResult<T> = Result<T, DagcheckError>;

/// Main error type for dagcheck
#[derive(Error, Debug, Diagnostic)]
pub enum DagcheckError {
    // ─────────────────────────────────────────────────────────────────────────
    // Payload Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Payload file not found: {path}")]
    #[diagnostic(
        code(dagcheck::payload_not_found),
        help("Pass a JSON or YAML file containing `nodes` and `edges`, or '-' to read stdin")
    )]
    PayloadNotFound { path: PathBuf },

    #[error("Invalid pipeline payload: {reason}")]
    #[diagnostic(
        code(dagcheck::invalid_payload),
        help("A payload is an object with two lists: {{\"nodes\": [...], \"edges\": [...]}}")
    )]
    InvalidPayload { reason: String },

    #[error("No payload files matched pattern: {pattern}")]
    #[diagnostic(
        code(dagcheck::no_input_files),
        help("Check that files matching '{pattern}' exist")
    )]
    NoInputFiles { pattern: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid configuration in '{path}': {reason}")]
    #[diagnostic(code(dagcheck::invalid_config))]
    InvalidConfig {
        path: PathBuf,
        reason: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(dagcheck::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(dagcheck::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(dagcheck::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(dagcheck::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(dagcheck::toml_error))]
    Toml { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(dagcheck::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for DagcheckError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for DagcheckError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for DagcheckError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for DagcheckError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<glob::PatternError> for DagcheckError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}

impl DagcheckError {
    /// Create an invalid payload error
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    /// Create a config error with a hint derived from the failure text
    pub fn invalid_config(path: PathBuf, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let help = Self::parse_config_error(&reason);
        Self::InvalidConfig { path, reason, help }
    }

    fn parse_config_error(reason: &str) -> Option<String> {
        if reason.contains("unknown field") {
            Some("Known keys: format, fail_on_cycle, strict, show_order".into())
        } else if reason.contains("unknown variant") {
            Some("`format` must be either \"text\" or \"json\"".into())
        } else if reason.contains("invalid type") {
            Some("`fail_on_cycle`, `strict` and `show_order` take true or false".into())
        } else {
            None
        }
    }
}
