// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # nsupdate-gen - external DNS update scripts from SLS and etcd
//!
//! Reconciles host/address assignments from two independent sources into one
//! validated, sorted `nsupdate` script for a single network:
//!
//! - IP reservations (and their aliases) of an SLS network
//! - records of the external DNS etcd store
//!
//! Every address is checked against the network's supernet. In-scope pairs
//! become an `A`/`AAAA` directive in the forward zone and a `PTR` directive in
//! the reverse zone; everything else is dropped.
//!
//! ## Modules
//!
//! - [`classifier`] - supernet parsing and membership
//! - [`records`] - directives and reverse pointers
//! - [`sls`] - SLS network documents and their host pairs
//! - [`externaldns`] - etcd dump decoding and key schema
//! - [`reconcile`] - the reconciliation pass
//! - [`zonefile`] - script rendering
//! - [`sources`] - network, Kubernetes and file collaborators
//! - [`pipeline`] - fetch, reconcile and render in one call
//!
//! ## Example
//!
//! ```rust
//! use nsupdate_gen::classifier::Supernet;
//! use nsupdate_gen::records::build_pair;
//! use nsupdate_gen::zonefile::render;
//!
//! let supernet = Supernet::parse("10.1.0.0/16").unwrap();
//! let (forward, reverse) =
//!     build_pair("ncn-m001.can.example.com", "10.1.0.5".parse().unwrap(), &supernet).unwrap();
//!
//! let script = render(&[forward], &[reverse], "ns.example.com", 53, "can.example.com", &supernet);
//! assert!(script.contains("zone 1.10.in-addr.arpa.\n"));
//! ```

pub mod classifier;
pub mod cli;
pub mod constants;
pub mod errors;
pub mod externaldns;
pub mod metrics;
pub mod pipeline;
pub mod reconcile;
pub mod records;
pub mod sls;
pub mod sources;
pub mod zonefile;
