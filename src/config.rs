// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Configuration loading
//!
//! Load defaults for the CLI from `.dagcheck.yaml`, `.dagcheck.yml` or
//! `.dagcheck.toml`. Command-line flags win over anything set here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{DagcheckError, DagcheckResult};

/// File names searched for, in order
pub const CONFIG_FILES: &[&str] = &[".dagcheck.yaml", ".dagcheck.yml", ".dagcheck.toml"];

/// dagcheck configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output format for `check`
    #[serde(default)]
    pub format: OutputFormat,

    /// Exit with an error when a pipeline is not a DAG
    #[serde(default)]
    pub fail_on_cycle: bool,

    /// Treat warnings about dropped records as failures
    #[serde(default)]
    pub strict: bool,

    /// Print the topological order of valid pipelines
    #[serde(default)]
    pub show_order: bool,
}

/// Output format for the check command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file
    pub fn from_file(path: &Path) -> DagcheckResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DagcheckError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| DagcheckError::invalid_config(path.to_path_buf(), reason))
    }

    /// Find a config file in `dir`
    pub fn find(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the explicit file if given, else the one found in `dir`, else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> DagcheckResult<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(DagcheckError::FileReadError {
                    path: path.to_path_buf(),
                    error: "no such file".into(),
                });
            }
            tracing::debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        match Self::find(dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
