// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Offline sources.
//!
//! Let the generator run away from the cluster: a saved SLS network document,
//! a saved `etcdctl get --prefix "" -w json` dump and a fixed domain.

use super::{DnsStoreDumpSource, DomainSuffixProvider, NetworkInventorySource};
use crate::errors::SourceError;
use crate::externaldns::{parse_dump, KeyValueEntry};
use crate::sls::SlsNetwork;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

async fn read_document(path: &Path) -> Result<String, SourceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceError::LocalFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// A fixed external domain, e.g. from `--external-domain`.
#[derive(Debug, Clone)]
pub struct StaticDomain(String);

impl StaticDomain {
    #[must_use]
    pub fn new(domain: &str) -> Self {
        Self(domain.trim().trim_end_matches('.').to_string())
    }
}

#[async_trait]
impl DomainSuffixProvider for StaticDomain {
    async fn external_domain(&self) -> Result<String, SourceError> {
        if self.0.is_empty() {
            return Err(SourceError::MissingField {
                source_name: "external domain".to_string(),
                field: "domain".to_string(),
            });
        }
        Ok(self.0.clone())
    }

    fn source_label(&self) -> &'static str {
        "static_domain"
    }
}

/// An SLS network document saved to disk.
#[derive(Debug, Clone)]
pub struct NetworkFile {
    path: PathBuf,
}

impl NetworkFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NetworkInventorySource for NetworkFile {
    async fn fetch_network(&self, network: &str) -> Result<SlsNetwork, SourceError> {
        let text = read_document(&self.path).await?;
        let parsed: SlsNetwork =
            serde_json::from_str(&text).map_err(|e| SourceError::MalformedResponse {
                source_name: "sls".to_string(),
                reason: e.to_string(),
            })?;

        if !parsed.name.is_empty() && !parsed.name.eq_ignore_ascii_case(network) {
            warn!(
                requested = %network,
                found = %parsed.name,
                path = %self.path.display(),
                "Network file describes a different network"
            );
        }

        debug!(path = %self.path.display(), "Loaded SLS network from file");
        Ok(parsed)
    }

    fn source_label(&self) -> &'static str {
        "sls_file"
    }
}

/// An etcd JSON dump saved to disk.
#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
}

impl DumpFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DnsStoreDumpSource for DumpFile {
    async fn dump(&self) -> Result<Vec<KeyValueEntry>, SourceError> {
        let text = read_document(&self.path).await?;
        let entries = parse_dump(&text)?;

        debug!(path = %self.path.display(), entries = entries.len(), "Loaded etcd dump from file");
        Ok(entries)
    }

    fn source_label(&self) -> &'static str {
        "etcd_file"
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod local_tests;
