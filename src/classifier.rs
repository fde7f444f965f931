// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Supernet membership checks.
//!
//! Every directive the generator emits must belong to the network segment's
//! supernet, the first IP range reported by the network inventory. This module
//! holds the [`Supernet`] type and the pure membership test used by the
//! record builder.
//!
//! # Example
//!
//! ```rust
//! use nsupdate_gen::classifier::{belongs_to_supernet, Supernet};
//!
//! let supernet = Supernet::parse("10.1.0.0/16").unwrap();
//! assert!(belongs_to_supernet("10.1.0.5".parse().unwrap(), &supernet));
//! assert!(!belongs_to_supernet("192.168.1.1".parse().unwrap(), &supernet));
//! ```

use crate::errors::SourceError;
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// The single network all in-scope addresses must belong to.
///
/// Built once per run and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Supernet(IpNet);

impl Supernet {
    /// Parse a supernet from CIDR notation.
    ///
    /// A bare address is accepted and treated as a host network (`/32` or `/128`).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidSupernet`] if the value is not a network or
    /// has host bits set (e.g., `10.1.0.1/16`).
    pub fn parse(value: &str) -> Result<Self, SourceError> {
        let trimmed = value.trim();

        let net = if trimmed.contains('/') {
            IpNet::from_str(trimmed).map_err(|e| SourceError::InvalidSupernet {
                value: value.to_string(),
                reason: e.to_string(),
            })?
        } else {
            let addr = IpAddr::from_str(trimmed).map_err(|e| SourceError::InvalidSupernet {
                value: value.to_string(),
                reason: e.to_string(),
            })?;
            IpNet::from(addr)
        };

        if net.trunc() != net {
            return Err(SourceError::InvalidSupernet {
                value: value.to_string(),
                reason: format!("host bits set, did you mean {}?", net.trunc()),
            });
        }

        Ok(Self(net))
    }

    /// Network address of the supernet (host bits zero).
    #[must_use]
    pub fn network_address(&self) -> IpAddr {
        self.0.network()
    }

    /// Prefix length in bits.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Underlying network value.
    #[must_use]
    pub const fn as_ipnet(&self) -> &IpNet {
        &self.0
    }
}

impl From<IpNet> for Supernet {
    fn from(net: IpNet) -> Self {
        Self(net.trunc())
    }
}

impl fmt::Display for Supernet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Whether `address` lies inside `supernet`.
///
/// Addresses of the other IP family are never members.
#[must_use]
pub fn belongs_to_supernet(address: IpAddr, supernet: &Supernet) -> bool {
    supernet.0.contains(&address)
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod classifier_tests;
