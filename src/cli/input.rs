// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagcheck contributors

//! Payload inputs - files, glob patterns and stdin

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;

use crate::errors::{DagcheckError, DagcheckResult};
use crate::pipeline::PipelineRequest;

/// Where a payload comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "<stdin>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl InputSource {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Stdin => None,
            Self::File(path) => Some(path),
        }
    }
}

fn is_glob(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand command-line arguments into input sources
///
/// No arguments, or `-`, means stdin. Arguments with glob metacharacters are
/// expanded and must match at least one file; plain paths must exist.
pub fn expand_inputs(args: &[String]) -> DagcheckResult<Vec<InputSource>> {
    if args.is_empty() {
        return Ok(vec![InputSource::Stdin]);
    }

    let mut sources = Vec::new();

    for arg in args {
        if arg == "-" {
            sources.push(InputSource::Stdin);
        } else if is_glob(arg) {
            let mut matched = 0;
            for entry in glob::glob(arg)? {
                match entry {
                    Ok(path) if path.is_file() => {
                        sources.push(InputSource::File(path));
                        matched += 1;
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Skipping unreadable glob match: {}", e),
                }
            }
            if matched == 0 {
                return Err(DagcheckError::NoInputFiles {
                    pattern: arg.clone(),
                });
            }
        } else {
            let path = PathBuf::from(arg);
            if !path.exists() {
                return Err(DagcheckError::PayloadNotFound { path });
            }
            sources.push(InputSource::File(path));
        }
    }

    Ok(sources)
}

/// Read and parse the payload from a source
pub async fn read_request(source: &InputSource) -> DagcheckResult<PipelineRequest> {
    let content = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
        InputSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DagcheckError::FileReadError {
                    path: path.clone(),
                    error: e.to_string(),
                })?
        }
    };

    tracing::debug!(source = %source, bytes = content.len(), "read payload");

    PipelineRequest::parse(&content, source.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_args_means_stdin() {
        assert_eq!(expand_inputs(&[]).unwrap(), vec![InputSource::Stdin]);
        assert_eq!(expand_inputs(&["-".into()]).unwrap(), vec![InputSource::Stdin]);
    }

    #[test]
    fn test_glob_expansion() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.json"), "{}").unwrap();
        std::fs::write(dir.path().join("two.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let sources = expand_inputs(&[pattern]).unwrap();
        assert_eq!(sources.len(), 2);

        let none = format!("{}/*.yaml", dir.path().display());
        assert!(matches!(
            expand_inputs(&[none]),
            Err(DagcheckError::NoInputFiles { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = expand_inputs(&["definitely/not/here.json".into()]);
        assert!(matches!(result, Err(DagcheckError::PayloadNotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "nodes:\n  - id: a\n  - id: b\nedges:\n  - source: a\n    target: b\n").unwrap();

        let request = read_request(&InputSource::File(path)).await.unwrap();
        assert_eq!(request.num_nodes(), 2);
        assert_eq!(request.num_edges(), 1);
    }
}
