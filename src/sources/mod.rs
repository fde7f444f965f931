// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Input sources and output sinks used by the generator.
//!
//! The reconciliation core never talks to the network itself. It is fed by the
//! collaborators defined here:
//!
//! - [`NetworkInventorySource`] - SLS network descriptions ([`sls_client::SlsClient`])
//! - [`DnsStoreDumpSource`] - external DNS etcd dumps ([`etcd::EtcdReplicaDumper`])
//! - [`DomainSuffixProvider`] - external DNS domain ([`site_init::SiteInitDomainProvider`])
//! - [`OutputSink`] - destination of the rendered script ([`sink::FileSink`], [`sink::StdoutSink`])
//!
//! Offline implementations reading local files live in [`local`].
//!
//! Every failure here is a [`SourceError`] and ends the run.

pub mod etcd;
pub mod local;
pub mod retry;
pub mod sink;
pub mod site_init;
pub mod sls_client;

use crate::errors::SourceError;
use crate::externaldns::KeyValueEntry;
use crate::sls::SlsNetwork;
use async_trait::async_trait;

/// Provides the structured description of a network segment.
#[async_trait]
pub trait NetworkInventorySource: Send + Sync {
    /// Fetch the network named `network` (e.g., `CAN`).
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the inventory is unreachable, rejects the
    /// request or returns a document that cannot be decoded.
    async fn fetch_network(&self, network: &str) -> Result<SlsNetwork, SourceError>;

    /// Metric label identifying this source.
    fn source_label(&self) -> &'static str {
        "sls"
    }
}

/// Provides every raw key/value record of the DNS store.
#[async_trait]
pub trait DnsStoreDumpSource: Send + Sync {
    /// Dump all key/value entries.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if no replica can be reached or the dump is
    /// not a valid document.
    async fn dump(&self) -> Result<Vec<KeyValueEntry>, SourceError>;

    /// Metric label identifying this source.
    fn source_label(&self) -> &'static str {
        "etcd"
    }
}

/// Provides the external DNS domain used to qualify inventory names.
#[async_trait]
pub trait DomainSuffixProvider: Send + Sync {
    /// The external domain, e.g. `can.example.com`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the domain cannot be determined.
    async fn external_domain(&self) -> Result<String, SourceError>;

    /// Metric label identifying this source.
    fn source_label(&self) -> &'static str {
        "site_init"
    }
}

/// Accepts the complete rendered script.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Write the whole payload.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Output`] if the destination cannot be written.
    async fn write_payload(&self, payload: &str) -> Result<(), SourceError>;

    /// Human-readable destination, for logging.
    fn destination(&self) -> String;
}
