// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line arguments.

use crate::constants::{
    DEFAULT_KEY_NAMESPACE, DEFAULT_NETWORK_NAME, DEFAULT_OUTPUT_FILE,
    DEFAULT_SLS_BASE_API_ADDRESS, DNS_PORT, TOKEN_ENV_VAR,
};
use crate::externaldns::KeySchema;
use crate::pipeline::GenerateSettings;
use crate::reconcile::DuplicatePolicy;
use crate::sources::etcd::ReplicaPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Generate an nsupdate script for the external DNS zones of a network.
#[derive(Debug, Clone, Parser)]
#[command(name = "nsupdate-gen", version, about)]
pub struct Cli {
    /// DNS server named on the `server` line of the script
    #[arg(long, value_name = "FQDN")]
    pub dns_server: String,

    /// Port named on the `server` line of the script
    #[arg(long, default_value_t = DNS_PORT)]
    pub server_port: u16,

    /// Where to write the script; `-` writes to stdout
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: String,

    /// Base address of the SLS API
    #[arg(long, value_name = "URL", default_value = DEFAULT_SLS_BASE_API_ADDRESS)]
    pub base_api_address: String,

    /// SLS network to reconcile
    #[arg(long, default_value = DEFAULT_NETWORK_NAME)]
    pub network: String,

    /// Emit each directive once even when both sources produce it
    #[arg(long)]
    pub dedupe: bool,

    /// How to choose the etcd replica to dump
    #[arg(long, value_enum, default_value_t = ReplicaPolicy::Random)]
    pub replica_policy: ReplicaPolicy,

    /// First segment required on external DNS keys
    #[arg(long, default_value = DEFAULT_KEY_NAMESPACE)]
    pub key_namespace: String,

    /// Accept external DNS keys under any namespace
    #[arg(long, conflicts_with = "key_namespace")]
    pub any_key_namespace: bool,

    /// Use this external domain instead of reading the site-init secret
    #[arg(long, value_name = "DOMAIN")]
    pub external_domain: Option<String>,

    /// Read the SLS network from a saved JSON document instead of the API
    #[arg(long, value_name = "PATH")]
    pub sls_file: Option<PathBuf>,

    /// Read the external DNS store from a saved `etcdctl -w json` dump
    #[arg(long, value_name = "PATH")]
    pub etcd_dump_file: Option<PathBuf>,

    /// Write Prometheus metrics for the run to this file
    #[arg(long, value_name = "PATH")]
    pub metrics_file: Option<PathBuf>,

    /// Bearer token for the API gateway
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,
}

impl Cli {
    /// Settings for [`crate::pipeline::generate`].
    #[must_use]
    pub fn generate_settings(&self) -> GenerateSettings {
        GenerateSettings {
            dns_server: self.dns_server.clone(),
            port: self.server_port,
            network: self.network.clone(),
            duplicate_policy: if self.dedupe {
                DuplicatePolicy::Deduplicate
            } else {
                DuplicatePolicy::Preserve
            },
            key_schema: if self.any_key_namespace {
                KeySchema::any_namespace()
            } else {
                KeySchema::new(self.key_namespace.as_str())
            },
        }
    }

    /// Non-empty bearer token, if one was given.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Whether any source has to talk to the Kubernetes API.
    #[must_use]
    pub fn needs_kubernetes(&self) -> bool {
        self.external_domain.is_none() || self.etcd_dump_file.is_none()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
