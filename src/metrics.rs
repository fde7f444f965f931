// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the nsupdate generator.
//!
//! Metric names carry the prefix `nsupdate_gen_`. The generator is a one-shot
//! command, so instead of serving `/metrics` the registry can be written to a
//! file in text exposition format at the end of a run (suitable for the
//! node-exporter textfile collector).
//!
//! # Metrics Categories
//!
//! - **Record Metrics** - Pairs accepted, out of scope, duplicates dropped
//! - **Error Metrics** - Source records skipped, by source and reason
//! - **Performance Metrics** - Time spent fetching each source
//!
//! # Example
//!
//! ```rust,no_run
//! use nsupdate_gen::metrics::{gather_metrics, record_pair_accepted};
//!
//! record_pair_accepted("sls");
//! let text = gather_metrics().unwrap();
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all generator metrics
const METRICS_NAMESPACE: &str = "nsupdate_gen";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

fn register_counter(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    let opts = Opts::new(format!("{METRICS_NAMESPACE}_{name}"), help);
    let counter = CounterVec::new(opts, labels).expect("metric options are valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric is registered once");
    counter
}

// ============================================================================
// Record Metrics
// ============================================================================

/// Host/address pairs turned into a forward and a reverse directive
///
/// Labels:
/// - `source`: `sls` or `externaldns`
pub static PAIRS_ACCEPTED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "pairs_accepted_total",
        "Host/address pairs converted into directives by source",
        &["source"],
    )
});

/// Host/address pairs dropped because the address is outside the supernet
///
/// Labels:
/// - `source`: `sls` or `externaldns`
pub static PAIRS_OUT_OF_SCOPE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "pairs_out_of_scope_total",
        "Host/address pairs outside the supernet by source",
        &["source"],
    )
});

/// Host/address pairs dropped by the deduplication policy
///
/// Labels:
/// - `source`: `sls` or `externaldns`
pub static PAIRS_DUPLICATE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "pairs_duplicate_total",
        "Host/address pairs dropped as duplicates by source",
        &["source"],
    )
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Source records skipped because they could not be parsed
///
/// Labels:
/// - `source`: `sls` or `externaldns`
/// - `reason`: short parse failure reason (e.g., `missing_host`, `key_schema`)
pub static RECORDS_SKIPPED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "records_skipped_total",
        "Malformed source records skipped by source and reason",
        &["source", "reason"],
    )
});

// ============================================================================
// Performance Metrics
// ============================================================================

/// Time spent fetching a source, in seconds
///
/// Labels:
/// - `source`: `sls`, `site_init` and `etcd` for the live sources;
///   `sls_file`, `static_domain` and `etcd_file` for the offline ones
pub static SOURCE_FETCH_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_source_fetch_duration_seconds"),
        "Duration of source fetches in seconds by source",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["source"]).expect("metric options are valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("metric is registered once");
    histogram
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a pair that produced directives.
pub fn record_pair_accepted(source: &str) {
    PAIRS_ACCEPTED_TOTAL.with_label_values(&[source]).inc();
}

/// Record a pair outside the supernet.
pub fn record_pair_out_of_scope(source: &str) {
    PAIRS_OUT_OF_SCOPE_TOTAL.with_label_values(&[source]).inc();
}

/// Record a pair dropped as a duplicate.
pub fn record_pair_duplicate(source: &str) {
    PAIRS_DUPLICATE_TOTAL.with_label_values(&[source]).inc();
}

/// Record a skipped source record.
pub fn record_skipped(source: &str, reason: &str) {
    RECORDS_SKIPPED_TOTAL
        .with_label_values(&[source, reason])
        .inc();
}

/// Record how long fetching a source took.
pub fn record_source_fetch(source: &str, duration: Duration) {
    SOURCE_FETCH_DURATION_SECONDS
        .with_label_values(&[source])
        .observe(duration.as_secs_f64());
}

/// Gather all metrics in Prometheus text format
///
/// # Errors
///
/// Returns an error if metrics encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
