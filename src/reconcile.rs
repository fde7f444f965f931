// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of host/address pairs into forward and reverse directives.
//!
//! The engine consumes pairs from every source in a single pass, drops
//! malformed records and out-of-scope addresses, and returns the accumulated
//! directive lists together with run statistics. It holds no state between
//! calls, so identical inputs always produce identical results.
//!
//! # Example
//!
//! ```rust
//! use nsupdate_gen::classifier::Supernet;
//! use nsupdate_gen::errors::RecordOrigin;
//! use nsupdate_gen::records::HostAddressPair;
//! use nsupdate_gen::reconcile::{reconcile, DuplicatePolicy};
//!
//! let supernet = Supernet::parse("10.1.0.0/16").unwrap();
//! let pairs = vec![
//!     Ok(HostAddressPair::new("a.example.com", "10.1.0.5".parse().unwrap(), RecordOrigin::Sls)),
//!     Ok(HostAddressPair::new("b.example.com", "192.168.1.1".parse().unwrap(), RecordOrigin::Sls)),
//! ];
//!
//! let result = reconcile(pairs, &supernet, DuplicatePolicy::Preserve);
//! assert_eq!(result.forward.len(), 1);
//! assert_eq!(result.stats.out_of_scope, 1);
//! ```

use crate::classifier::Supernet;
use crate::errors::RecordParseError;
use crate::metrics;
use crate::records::{build_pair, Directive, HostAddressPair};
use std::collections::HashSet;
use tracing::{debug, warn};

/// What to do when the same directive is produced more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep every directive, including repeats across sources
    #[default]
    Preserve,
    /// Emit each (record type, name, value) once
    Deduplicate,
}

/// Counters describing one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Well-formed pairs considered
    pub pairs_seen: usize,
    /// Pairs that produced a forward and a reverse directive
    pub accepted: usize,
    /// Pairs whose address is outside the supernet
    pub out_of_scope: usize,
    /// Pairs dropped by [`DuplicatePolicy::Deduplicate`]
    pub duplicates: usize,
    /// Malformed source records skipped
    pub skipped: usize,
}

/// Result of a reconciliation pass, in source order (unsorted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub forward: Vec<Directive>,
    pub reverse: Vec<Directive>,
    pub stats: ReconcileStats,
}

/// Reconcile pairs from all sources against `supernet`.
///
/// Record errors are logged, counted and skipped. Out-of-scope addresses are
/// dropped silently. Every accepted pair adds exactly one entry to both
/// `forward` and `reverse`.
pub fn reconcile<I>(pairs: I, supernet: &Supernet, policy: DuplicatePolicy) -> Reconciliation
where
    I: IntoIterator<Item = Result<HostAddressPair, RecordParseError>>,
{
    let mut result = Reconciliation::default();
    // The reverse directive is fully determined by the forward one
    let mut emitted: HashSet<Directive> = HashSet::new();

    for item in pairs {
        let pair = match item {
            Ok(pair) => pair,
            Err(e) => {
                warn!(
                    source = %e.origin(),
                    reason = e.reason(),
                    "Skipping malformed record: {e}"
                );
                metrics::record_skipped(e.origin().as_str(), e.reason());
                result.stats.skipped += 1;
                continue;
            }
        };

        result.stats.pairs_seen += 1;
        let source = pair.origin.as_str();

        let Some((forward, reverse)) = build_pair(&pair.name, pair.address, supernet) else {
            debug!(
                source = source,
                name = %pair.name,
                address = %pair.address,
                supernet = %supernet,
                "Address outside supernet, dropping"
            );
            metrics::record_pair_out_of_scope(source);
            result.stats.out_of_scope += 1;
            continue;
        };

        if policy == DuplicatePolicy::Deduplicate && !emitted.insert(forward.clone()) {
            debug!(source = source, directive = %forward, "Dropping duplicate directive");
            metrics::record_pair_duplicate(source);
            result.stats.duplicates += 1;
            continue;
        }

        metrics::record_pair_accepted(source);
        result.stats.accepted += 1;
        result.forward.push(forward);
        result.reverse.push(reverse);
    }

    result
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
