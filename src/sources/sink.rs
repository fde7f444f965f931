// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Output sinks for the rendered script.
//!
//! The script is rendered completely in memory before a sink sees it, so a
//! failed run never leaves a partial file behind.

use super::OutputSink;
use crate::constants::STDOUT_OUTPUT;
use crate::errors::SourceError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes the script to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn write_payload(&self, payload: &str) -> Result<(), SourceError> {
        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|e| SourceError::Output {
                destination: self.destination(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), bytes = payload.len(), "Wrote nsupdate script");
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes the script to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

#[async_trait]
impl OutputSink for StdoutSink {
    async fn write_payload(&self, payload: &str) -> Result<(), SourceError> {
        let mut stdout = tokio::io::stdout();
        let to_output_err = |e: std::io::Error| SourceError::Output {
            destination: self.destination(),
            reason: e.to_string(),
        };

        stdout
            .write_all(payload.as_bytes())
            .await
            .map_err(to_output_err)?;
        stdout.flush().await.map_err(to_output_err)
    }

    fn destination(&self) -> String {
        "stdout".to_string()
    }
}

/// Sink for an `--output-file` argument; `-` selects standard output.
#[must_use]
pub fn sink_for(output: &str) -> Box<dyn OutputSink> {
    if output == STDOUT_OUTPUT {
        Box::new(StdoutSink)
    } else {
        Box::new(FileSink::new(output))
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod sink_tests;
