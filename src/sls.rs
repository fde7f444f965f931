// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Network inventory (SLS) documents and their conversion into host/address pairs.
//!
//! SLS describes a network segment as a list of IP ranges, the first of which is
//! the supernet, plus subnets that may carry IP reservations. Every reservation
//! yields one pair for its primary name and one per alias, all qualified with
//! the external DNS domain.
//!
//! # Example
//!
//! ```rust
//! use nsupdate_gen::sls::{host_pairs, SlsNetwork};
//!
//! let network: SlsNetwork = serde_json::from_value(serde_json::json!({
//!     "Name": "CAN",
//!     "IPRanges": ["10.1.0.0/16"],
//!     "ExtraProperties": {
//!         "Subnets": [{
//!             "Name": "bootstrap_dhcp",
//!             "IPReservations": [
//!                 { "Name": "ncn-m001", "IPAddress": "10.1.0.5", "Aliases": ["master"] }
//!             ]
//!         }]
//!     }
//! }))
//! .unwrap();
//!
//! let subnets = network.subnets().unwrap();
//! let names: Vec<String> = host_pairs(subnets, "can.example.com")
//!     .filter_map(Result::ok)
//!     .map(|pair| pair.name)
//!     .collect();
//! assert_eq!(names, ["ncn-m001.can.example.com", "master.can.example.com"]);
//! ```

use crate::classifier::Supernet;
use crate::errors::{RecordOrigin, RecordParseError, SourceError};
use crate::records::HostAddressPair;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::IpAddr;

const SOURCE_NAME: &str = "sls";

/// A network segment as returned by `GET /v1/networks/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlsNetwork {
    #[serde(rename = "Name", default)]
    pub name: String,

    /// CIDR ranges of the network; the first entry is the supernet
    #[serde(rename = "IPRanges", default, skip_serializing_if = "Option::is_none")]
    pub ip_ranges: Option<Vec<String>>,

    #[serde(
        rename = "ExtraProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_properties: Option<NetworkExtraProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkExtraProperties {
    #[serde(rename = "Subnets", default, skip_serializing_if = "Option::is_none")]
    pub subnets: Option<Vec<SlsSubnet>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlsSubnet {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "CIDR", default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,

    /// Raw reservations, decoded one at a time by [`host_pairs`]
    #[serde(
        rename = "IPReservations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_reservations: Option<Vec<Value>>,
}

/// A single address reservation.
///
/// Reservations are decoded individually, so a wrong-typed field in one entry
/// is reported against that entry only. Aliases stay raw for the same reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpReservation {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "IPAddress", default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(rename = "Aliases", default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<Value>>,
}

impl SlsNetwork {
    /// Supernet of the segment, taken from the first IP range.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingField`] when there are no IP ranges and
    /// [`SourceError::InvalidSupernet`] when the first range does not parse.
    pub fn supernet(&self) -> Result<Supernet, SourceError> {
        let ranges = self
            .ip_ranges
            .as_ref()
            .ok_or_else(|| SourceError::MissingField {
                source_name: SOURCE_NAME.to_string(),
                field: "IPRanges".to_string(),
            })?;

        let first = ranges.first().ok_or_else(|| SourceError::MissingField {
            source_name: SOURCE_NAME.to_string(),
            field: "IPRanges[0]".to_string(),
        })?;

        Supernet::parse(first)
    }

    /// Subnets of the segment.
    ///
    /// An empty list is valid; an absent one means the document is not a
    /// usable network description.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingField`] when `ExtraProperties` or its
    /// `Subnets` list is absent.
    pub fn subnets(&self) -> Result<&[SlsSubnet], SourceError> {
        self.extra_properties
            .as_ref()
            .and_then(|extra| extra.subnets.as_deref())
            .ok_or_else(|| SourceError::MissingField {
                source_name: SOURCE_NAME.to_string(),
                field: "ExtraProperties.Subnets".to_string(),
            })
    }
}

/// Qualify a short SLS name with the external domain.
#[must_use]
pub fn qualify(name: &str, external_domain: &str) -> String {
    format!("{name}.{external_domain}")
}

/// Stream host/address pairs for every reservation and alias in `subnets`.
///
/// Subnets without reservations are skipped. A malformed reservation yields a
/// single [`RecordParseError`] and contributes no pairs; a malformed alias
/// yields an error for that alias only.
pub fn host_pairs<'a>(
    subnets: &'a [SlsSubnet],
    external_domain: &'a str,
) -> impl Iterator<Item = Result<HostAddressPair, RecordParseError>> + 'a {
    subnets
        .iter()
        .filter_map(|subnet| {
            subnet
                .ip_reservations
                .as_ref()
                .map(|reservations| (subnet, reservations))
        })
        .flat_map(move |(subnet, reservations)| {
            reservations
                .iter()
                .enumerate()
                .flat_map(move |(index, raw)| {
                    reservation_pairs(subnet, index, raw, external_domain)
                })
        })
}

fn reservation_pairs(
    subnet: &SlsSubnet,
    index: usize,
    raw: &Value,
    external_domain: &str,
) -> Vec<Result<HostAddressPair, RecordParseError>> {
    let reservation = match IpReservation::deserialize(raw) {
        Ok(reservation) => reservation,
        Err(e) => {
            return vec![Err(RecordParseError::MalformedReservation {
                subnet: subnet.name.clone(),
                index,
                reason: e.to_string(),
            })]
        }
    };

    let Some(name) = reservation.name.as_deref().filter(|n| !n.is_empty()) else {
        return vec![Err(RecordParseError::MissingReservationField {
            subnet: subnet.name.clone(),
            field: "Name",
        })];
    };

    let Some(raw_address) = reservation.ip_address.as_deref() else {
        return vec![Err(RecordParseError::MissingReservationField {
            subnet: subnet.name.clone(),
            field: "IPAddress",
        })];
    };

    let address: IpAddr = match raw_address.parse() {
        Ok(address) => address,
        Err(_) => {
            return vec![Err(RecordParseError::InvalidReservationAddress {
                name: name.to_string(),
                address: raw_address.to_string(),
            })]
        }
    };

    let pair = |host: &str| {
        HostAddressPair::new(qualify(host, external_domain), address, RecordOrigin::Sls)
    };

    std::iter::once(Ok(pair(name)))
        .chain(reservation.aliases.iter().flatten().map(|alias| {
            match alias.as_str().filter(|a| !a.is_empty()) {
                Some(alias) => Ok(pair(alias)),
                None => Err(RecordParseError::MalformedAlias {
                    name: name.to_string(),
                    alias: alias.to_string(),
                }),
            }
        }))
        .collect()
}

#[cfg(test)]
#[path = "sls_tests.rs"]
mod sls_tests;
