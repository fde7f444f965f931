// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the record sources and the reconciliation engine.
//!
//! Errors come in two severities:
//! - [`SourceError`] - a whole data source is unusable. Fatal, the run aborts
//!   before any output is rendered.
//! - [`RecordParseError`] - a single reservation or key/value entry is malformed.
//!   Local, the record is skipped and the run continues.
//!
//! Addresses outside the supernet are not errors at all and never appear here.

use thiserror::Error;

/// Errors that make an entire input source unusable.
///
/// These are surfaced to the caller of the pipeline and end the run.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// HTTP connection could not be established or the request failed in transit
    #[error("Request to {url} failed: {reason}")]
    Transport {
        /// The URL that was requested
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// The upstream service answered with a non-success HTTP status
    #[error("Request to {url} returned HTTP {status_code}: {body}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        body: String,
    },

    /// The source answered but its document could not be decoded
    #[error("Malformed response from {source_name}: {reason}")]
    MalformedResponse {
        /// Which source produced the document (e.g., "sls", "etcd")
        source_name: String,
        /// Explanation of what could not be decoded
        reason: String,
    },

    /// A field the pipeline cannot work without is absent
    #[error("{source_name} response is missing required field '{field}'")]
    MissingField {
        /// Which source produced the document
        source_name: String,
        /// Path of the missing field
        field: String,
    },

    /// The first IP range of the network is not a usable supernet
    #[error("Invalid supernet '{value}': {reason}")]
    InvalidSupernet {
        /// The raw range as returned by the inventory
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A Kubernetes API call failed
    #[error("Kubernetes operation '{operation}' failed: {reason}")]
    Kubernetes {
        /// Short description of the operation (e.g., "get secret loftsman/site-init")
        operation: String,
        /// Reason reported by the client
        reason: String,
    },

    /// No running replica of the DNS store could be found
    #[error("No running pods match selector '{selector}' in namespace {namespace}")]
    NoReplicas {
        /// Namespace that was searched
        namespace: String,
        /// Label selector that was used
        selector: String,
    },

    /// A saved input document could not be read
    #[error("Failed to read {path}: {reason}")]
    LocalFile {
        /// Path of the document
        path: String,
        /// Reason reported by the filesystem
        reason: String,
    },

    /// Writing the rendered output failed
    #[error("Failed to write output to {destination}: {reason}")]
    Output {
        /// Destination description (path or "stdout")
        destination: String,
        /// Reason for the failure
        reason: String,
    },
}

/// Source that produced a host/address pair or a record error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOrigin {
    /// Network inventory reservations
    Sls,
    /// External DNS etcd key/value store
    ExternalDns,
}

impl RecordOrigin {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sls => "sls",
            Self::ExternalDns => "externaldns",
        }
    }
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violations of the external DNS key layout `/{namespace}/{reversed-labels...}/{record-id}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeySchemaError {
    /// The key contains no segments at all
    #[error("key is empty")]
    Empty,

    /// The key has fewer segments than namespace + one label + record id
    #[error("key has {found} segment(s), at least {required} required")]
    TooFewSegments {
        /// Number of segments present
        found: usize,
        /// Minimum number of segments
        required: usize,
    },

    /// The leading segment is not the expected store namespace
    #[error("key namespace '{found}' does not match expected '{expected}'")]
    NamespaceMismatch {
        /// Configured namespace
        expected: String,
        /// Namespace found in the key
        found: String,
    },

    /// A segment between the namespace and the record id is empty (e.g., `//`)
    #[error("key has an empty segment at position {position}")]
    EmptySegment {
        /// Zero-based segment index within the key
        position: usize,
    },
}

/// A single source record that could not be turned into a host/address pair.
///
/// The offending record is skipped; processing of the remaining records continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    /// An SLS reservation lacks a field needed to build a pair
    #[error("SLS reservation in subnet '{subnet}' is missing '{field}'")]
    MissingReservationField {
        /// Subnet the reservation belongs to
        subnet: String,
        /// Field that is missing
        field: &'static str,
    },

    /// An SLS reservation is not an object or has a field of the wrong type
    #[error("SLS reservation #{index} in subnet '{subnet}' is malformed: {reason}")]
    MalformedReservation {
        /// Subnet the reservation belongs to
        subnet: String,
        /// Position of the reservation within the subnet
        index: usize,
        /// Decoder message
        reason: String,
    },

    /// An alias of an SLS reservation is not a non-empty string
    #[error("SLS reservation '{name}' has invalid alias {alias}")]
    MalformedAlias {
        /// Primary name of the reservation
        name: String,
        /// The raw alias value, as JSON
        alias: String,
    },

    /// An SLS reservation carries an address that does not parse
    #[error("SLS reservation '{name}' has unparsable address '{address}'")]
    InvalidReservationAddress {
        /// Primary name of the reservation
        name: String,
        /// The raw address value
        address: String,
    },

    /// An etcd key or value is not valid base64, or the key is not UTF-8
    #[error("etcd entry #{index}: {field} is not decodable: {reason}")]
    InvalidEncoding {
        /// Position of the entry in the dump
        index: usize,
        /// Which half of the entry failed ("key" or "value")
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// An etcd key does not follow the expected layout
    #[error("etcd key '{key}' rejected: {source}")]
    KeySchema {
        /// The decoded key
        key: String,
        /// The layout violation
        #[source]
        source: KeySchemaError,
    },

    /// An etcd value is not a JSON object
    #[error("etcd key '{key}' has a value that is not valid JSON: {reason}")]
    InvalidValueJson {
        /// The decoded key
        key: String,
        /// Parser message
        reason: String,
    },

    /// An etcd value has no `host` field
    #[error("etcd key '{key}' has no 'host' in its value")]
    MissingHost {
        /// The decoded key
        key: String,
    },

    /// An etcd value's `host` is not an IP address (e.g., a CNAME target)
    #[error("etcd key '{key}' has host '{host}' which is not an IP address")]
    InvalidHostAddress {
        /// The decoded key
        key: String,
        /// The raw host value
        host: String,
    },
}

impl RecordParseError {
    /// Source the failing record came from.
    #[must_use]
    pub const fn origin(&self) -> RecordOrigin {
        match self {
            Self::MissingReservationField { .. }
            | Self::MalformedReservation { .. }
            | Self::MalformedAlias { .. }
            | Self::InvalidReservationAddress { .. } => RecordOrigin::Sls,
            Self::InvalidEncoding { .. }
            | Self::KeySchema { .. }
            | Self::InvalidValueJson { .. }
            | Self::MissingHost { .. }
            | Self::InvalidHostAddress { .. } => RecordOrigin::ExternalDns,
        }
    }

    /// Short machine-readable reason, used as a metric label.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingReservationField { .. } => "missing_field",
            Self::MalformedReservation { .. } => "malformed_reservation",
            Self::MalformedAlias { .. } => "malformed_alias",
            Self::InvalidReservationAddress { .. } | Self::InvalidHostAddress { .. } => {
                "invalid_address"
            }
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::KeySchema { .. } => "key_schema",
            Self::InvalidValueJson { .. } => "invalid_json",
            Self::MissingHost { .. } => "missing_host",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
