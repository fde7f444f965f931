// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! End-to-end generation of the nsupdate script.
//!
//! All sources are fetched before any record is reconciled, so a fatal source
//! error leaves nothing to write. The returned script is complete; callers
//! hand it to an [`OutputSink`](crate::sources::OutputSink) in one write.

use crate::classifier::Supernet;
use crate::constants::{DEFAULT_NETWORK_NAME, DNS_PORT};
use crate::errors::SourceError;
use crate::externaldns::{self, KeySchema};
use crate::metrics;
use crate::reconcile::{reconcile, DuplicatePolicy, ReconcileStats};
use crate::sls;
use crate::sources::{DnsStoreDumpSource, DomainSuffixProvider, NetworkInventorySource};
use crate::zonefile::{render, reverse_zone_name};
use std::time::Instant;
use tracing::info;

/// Parameters of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    /// Server named on the `server` line
    pub dns_server: String,
    /// Port named on the `server` line
    pub port: u16,
    /// SLS network to reconcile (e.g., `CAN`)
    pub network: String,
    pub duplicate_policy: DuplicatePolicy,
    pub key_schema: KeySchema,
}

impl GenerateSettings {
    /// Defaults for everything but the DNS server.
    #[must_use]
    pub fn new(dns_server: impl Into<String>) -> Self {
        Self {
            dns_server: dns_server.into(),
            port: DNS_PORT,
            network: DEFAULT_NETWORK_NAME.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            key_schema: KeySchema::default(),
        }
    }
}

/// A rendered script plus what went into it.
#[derive(Debug, Clone)]
pub struct GeneratedUpdate {
    pub script: String,
    pub supernet: Supernet,
    pub forward_zone: String,
    pub reverse_zone: String,
    pub stats: ReconcileStats,
}

/// Fetch every source, reconcile the records and render the script.
///
/// # Errors
///
/// Returns the first [`SourceError`] raised by a source,
/// [`SourceError::MissingField`] when the network has no IP ranges or no
/// subnet list, or [`SourceError::InvalidSupernet`] when the network's range
/// cannot be parsed.
/// Malformed individual records are skipped, never returned.
pub async fn generate(
    inventory: &dyn NetworkInventorySource,
    dns_store: &dyn DnsStoreDumpSource,
    domain: &dyn DomainSuffixProvider,
    settings: &GenerateSettings,
) -> Result<GeneratedUpdate, SourceError> {
    let started = Instant::now();
    let network = inventory.fetch_network(&settings.network).await?;
    metrics::record_source_fetch(inventory.source_label(), started.elapsed());

    let supernet = network.supernet()?;
    let subnets = network.subnets()?;
    info!(network = %settings.network, supernet = %supernet, "Resolved network supernet");

    let started = Instant::now();
    let forward_zone = domain.external_domain().await?;
    metrics::record_source_fetch(domain.source_label(), started.elapsed());

    let started = Instant::now();
    let entries = dns_store.dump().await?;
    metrics::record_source_fetch(dns_store.source_label(), started.elapsed());

    let pairs = sls::host_pairs(subnets, &forward_zone)
        .chain(externaldns::host_pairs(&entries, &settings.key_schema));
    let reconciliation = reconcile(pairs, &supernet, settings.duplicate_policy);

    let script = render(
        &reconciliation.forward,
        &reconciliation.reverse,
        &settings.dns_server,
        settings.port,
        &forward_zone,
        &supernet,
    );

    let stats = reconciliation.stats;
    info!(
        accepted = stats.accepted,
        out_of_scope = stats.out_of_scope,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        "Reconciled {} host/address pair(s) for zone {}",
        stats.pairs_seen,
        forward_zone
    );

    Ok(GeneratedUpdate {
        script,
        reverse_zone: reverse_zone_name(&supernet),
        supernet,
        forward_zone,
        stats,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;
