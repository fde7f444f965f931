// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(clippy::must_use_candidate)]

//! Forward and reverse update directives in nsupdate format.
//!
//! A host/address pair becomes exactly two directives, an `A` (or `AAAA`) record
//! in the forward zone and a `PTR` record in the reverse zone, or nothing at all
//! when the address is outside the supernet.
//!
//! # Example
//!
//! ```rust
//! use nsupdate_gen::classifier::Supernet;
//! use nsupdate_gen::records::build_pair;
//!
//! let supernet = Supernet::parse("10.1.0.0/16").unwrap();
//! let (forward, reverse) =
//!     build_pair("ncn-m001.can.example.com", "10.1.0.5".parse().unwrap(), &supernet).unwrap();
//!
//! assert_eq!(forward.to_string(), "update add ncn-m001.can.example.com 86400 A 10.1.0.5");
//! assert_eq!(
//!     reverse.to_string(),
//!     "update add 5.0.1.10.in-addr.arpa. 86400 PTR ncn-m001.can.example.com"
//! );
//! ```

use crate::classifier::{belongs_to_supernet, Supernet};
use crate::constants::{DIRECTIVE_TTL_SECS, IPV4_REVERSE_SUFFIX, IPV6_REVERSE_SUFFIX};
use crate::errors::RecordOrigin;
use std::fmt;
use std::net::IpAddr;

/// A fully-qualified name and the address it resolves to, as read from a source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddressPair {
    /// Fully-qualified host name
    pub name: String,
    /// Address the name maps to
    pub address: IpAddr,
    /// Source the pair was read from
    pub origin: RecordOrigin,
}

impl HostAddressPair {
    pub fn new(name: impl Into<String>, address: IpAddr, origin: RecordOrigin) -> Self {
        Self {
            name: name.into(),
            address,
            origin,
        }
    }
}

/// Which zone a directive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirectiveKind {
    Forward,
    Reverse,
}

/// DNS record type carried by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    A,
    Aaaa,
    Ptr,
}

impl RecordType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `update add` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Owner name of the record
    pub name: String,
    pub ttl: u32,
    pub record_type: RecordType,
    /// Record data (an address for A/AAAA, a host name for PTR)
    pub value: String,
}

impl Directive {
    /// Forward record for `name` pointing at `address`.
    pub fn forward(name: &str, address: IpAddr) -> Self {
        let record_type = match address {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        };

        Self {
            kind: DirectiveKind::Forward,
            name: name.to_string(),
            ttl: DIRECTIVE_TTL_SECS,
            record_type,
            value: address.to_string(),
        }
    }

    /// Reverse record mapping the pointer name of `address` back to `name`.
    pub fn reverse(name: &str, address: IpAddr) -> Self {
        Self {
            kind: DirectiveKind::Reverse,
            name: reverse_pointer(address),
            ttl: DIRECTIVE_TTL_SECS,
            record_type: RecordType::Ptr,
            value: name.to_string(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "update add {} {} {} {}",
            self.name, self.ttl, self.record_type, self.value
        )
    }
}

/// Reverse-lookup name of an address.
///
/// IPv4 octets are reversed under `in-addr.arpa.`, IPv6 nibbles under `ip6.arpa.`.
/// The result is fully qualified.
///
/// ```rust
/// use nsupdate_gen::records::reverse_pointer;
///
/// assert_eq!(reverse_pointer("10.1.0.0".parse().unwrap()), "0.0.1.10.in-addr.arpa.");
/// assert_eq!(
///     reverse_pointer("2001:db8::1".parse().unwrap()),
///     "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa."
/// );
/// ```
pub fn reverse_pointer(address: IpAddr) -> String {
    match address {
        IpAddr::V4(v4) => {
            let labels: Vec<String> = v4.octets().iter().rev().map(u8::to_string).collect();
            format!("{}.{IPV4_REVERSE_SUFFIX}", labels.join("."))
        }
        IpAddr::V6(v6) => {
            let mut nibbles = Vec::with_capacity(32);
            for byte in v6.octets().iter().rev() {
                nibbles.push(format!("{:x}", byte & 0x0f));
                nibbles.push(format!("{:x}", byte >> 4));
            }
            format!("{}.{IPV6_REVERSE_SUFFIX}", nibbles.join("."))
        }
    }
}

/// Build the forward/reverse directive pair for a host.
///
/// Returns `None` when `address` is outside `supernet`; a pair is never
/// emitted partially.
pub fn build_pair(
    name: &str,
    address: IpAddr,
    supernet: &Supernet,
) -> Option<(Directive, Directive)> {
    if !belongs_to_supernet(address, supernet) {
        return None;
    }

    Some((
        Directive::forward(name, address),
        Directive::reverse(name, address),
    ))
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
