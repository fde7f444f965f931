// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! External DNS etcd records and their conversion into host/address pairs.
//!
//! The external DNS service stores its records in etcd using the CoreDNS
//! layout: every key is a slash-delimited path holding the domain name in
//! reverse label order, wrapped by a store namespace and a per-record id,
//! and every value is a JSON document whose `host` field carries the address.
//!
//! ```text
//! /skydns/com/cray/dev/shandy/vcs/3f7d78ec  ->  vcs.shandy.dev.cray.com
//! {"host":"10.1.0.7","ttl":3600}            ->  10.1.0.7
//! ```
//!
//! Keys and values arrive base64-encoded, as printed by
//! `etcdctl get --prefix "" -w json`. Any entry that does not decode or does not
//! follow [`KeySchema`] is reported as a [`RecordParseError`] and skipped; the
//! remaining entries are still processed.

use crate::constants::{DEFAULT_KEY_NAMESPACE, KEY_SEGMENT_SEPARATOR};
use crate::errors::{KeySchemaError, RecordOrigin, RecordParseError, SourceError};
use crate::records::HostAddressPair;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Minimum number of key segments: namespace, one label and the record id.
const MIN_KEY_SEGMENTS: usize = 3;

/// One raw key/value entry from an etcd dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    /// Base64-encoded key
    pub key: String,

    /// Base64-encoded value (etcd omits it for empty values)
    #[serde(default)]
    pub value: String,
}

impl KeyValueEntry {
    /// Build an entry from plain text, encoding both halves.
    #[must_use]
    pub fn from_plain(key: &str, value: &str) -> Self {
        Self {
            key: BASE64.encode(key),
            value: BASE64.encode(value),
        }
    }
}

/// JSON document printed by `etcdctl get -w json`.
#[derive(Debug, Clone, Default, Deserialize)]
struct EtcdDump {
    /// Absent when the store holds no keys
    #[serde(default)]
    kvs: Vec<KeyValueEntry>,
}

/// Parse the JSON output of an etcd dump into raw entries.
///
/// # Errors
///
/// Returns [`SourceError::MalformedResponse`] if the document is not JSON or
/// `kvs` has the wrong shape.
pub fn parse_dump(document: &str) -> Result<Vec<KeyValueEntry>, SourceError> {
    let dump: EtcdDump =
        serde_json::from_str(document).map_err(|e| SourceError::MalformedResponse {
            source_name: "etcd".to_string(),
            reason: e.to_string(),
        })?;

    Ok(dump.kvs)
}

/// Layout of external DNS keys: `/{namespace}/{reversed-labels...}/{record-id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Required leading segment, or `None` to accept any namespace
    namespace: Option<String>,
}

impl Default for KeySchema {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_NAMESPACE)
    }
}

/// A key that matched [`KeySchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey<'k> {
    pub namespace: &'k str,
    /// Domain labels in key order (top-level domain first)
    pub reversed_labels: Vec<&'k str>,
    pub record_id: &'k str,
}

impl ParsedKey<'_> {
    /// Fully-qualified name encoded by the key.
    #[must_use]
    pub fn fqdn(&self) -> String {
        let labels: Vec<&str> = self.reversed_labels.iter().rev().copied().collect();
        labels.join(".")
    }
}

impl KeySchema {
    /// Schema requiring the given namespace as first segment.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
        }
    }

    /// Schema accepting any namespace.
    #[must_use]
    pub fn any_namespace() -> Self {
        Self { namespace: None }
    }

    /// Split a decoded key into namespace, labels and record id.
    ///
    /// # Errors
    ///
    /// Returns a [`KeySchemaError`] if the key is empty, too short, carries an
    /// unexpected namespace or has an empty segment.
    pub fn parse<'k>(&self, key: &'k str) -> Result<ParsedKey<'k>, KeySchemaError> {
        let path = key.strip_prefix(KEY_SEGMENT_SEPARATOR).unwrap_or(key);
        if path.is_empty() {
            return Err(KeySchemaError::Empty);
        }

        let segments: Vec<&str> = path.split(KEY_SEGMENT_SEPARATOR).collect();
        if segments.len() < MIN_KEY_SEGMENTS {
            return Err(KeySchemaError::TooFewSegments {
                found: segments.len(),
                required: MIN_KEY_SEGMENTS,
            });
        }

        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(KeySchemaError::EmptySegment { position });
        }

        let namespace = segments[0];
        if let Some(expected) = &self.namespace {
            if namespace != expected {
                return Err(KeySchemaError::NamespaceMismatch {
                    expected: expected.clone(),
                    found: namespace.to_string(),
                });
            }
        }

        let last = segments.len() - 1;
        Ok(ParsedKey {
            namespace,
            reversed_labels: segments[1..last].to_vec(),
            record_id: segments[last],
        })
    }
}

/// Value document stored under each key.
#[derive(Debug, Deserialize)]
struct RecordValue {
    #[serde(default)]
    host: Option<serde_json::Value>,
}

/// Convert one raw entry into a host/address pair.
///
/// `index` is the entry's position in the dump and is only used in diagnostics.
///
/// # Errors
///
/// Returns a [`RecordParseError`] describing the first problem found.
pub fn entry_pair(
    index: usize,
    entry: &KeyValueEntry,
    schema: &KeySchema,
) -> Result<HostAddressPair, RecordParseError> {
    let key = decode_text(index, "key", &entry.key)?;

    let name = schema
        .parse(&key)
        .map(|parsed| parsed.fqdn())
        .map_err(|source| RecordParseError::KeySchema {
            key: key.clone(),
            source,
        })?;

    let raw_value = BASE64
        .decode(entry.value.as_bytes())
        .map_err(|e| RecordParseError::InvalidEncoding {
            index,
            field: "value",
            reason: e.to_string(),
        })?;

    let value: RecordValue =
        serde_json::from_slice(&raw_value).map_err(|e| RecordParseError::InvalidValueJson {
            key: key.clone(),
            reason: e.to_string(),
        })?;

    let host = match value.host {
        Some(serde_json::Value::String(host)) => host,
        _ => return Err(RecordParseError::MissingHost { key }),
    };

    let address: IpAddr = host
        .parse()
        .map_err(|_| RecordParseError::InvalidHostAddress { key, host: host.clone() })?;

    Ok(HostAddressPair::new(name, address, RecordOrigin::ExternalDns))
}

fn decode_text(
    index: usize,
    field: &'static str,
    encoded: &str,
) -> Result<String, RecordParseError> {
    let bytes = BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| RecordParseError::InvalidEncoding {
            index,
            field,
            reason: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| RecordParseError::InvalidEncoding {
        index,
        field,
        reason: e.to_string(),
    })
}

/// Stream host/address pairs for every entry of a dump.
pub fn host_pairs<'a>(
    entries: &'a [KeyValueEntry],
    schema: &'a KeySchema,
) -> impl Iterator<Item = Result<HostAddressPair, RecordParseError>> + 'a {
    entries
        .iter()
        .enumerate()
        .map(move |(index, entry)| entry_pair(index, entry, schema))
}

#[cfg(test)]
#[path = "externaldns_tests.rs"]
mod externaldns_tests;
