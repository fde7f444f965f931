// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the nsupdate generator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Standard DNS port for dynamic updates
pub const DNS_PORT: u16 = 53;

/// TTL applied to every generated directive (1 day)
pub const DIRECTIVE_TTL_SECS: u32 = 86400;

/// Suffix for IPv4 reverse pointers
pub const IPV4_REVERSE_SUFFIX: &str = "in-addr.arpa.";

/// Suffix for IPv6 reverse pointers
pub const IPV6_REVERSE_SUFFIX: &str = "ip6.arpa.";

// ============================================================================
// SLS (Network Inventory) Constants
// ============================================================================

/// Default base address of the SLS API behind the API gateway
pub const DEFAULT_SLS_BASE_API_ADDRESS: &str = "https://api-gw-service-nmn.local/apis/sls";

/// Network segment whose records are reconciled by default
pub const DEFAULT_NETWORK_NAME: &str = "CAN";

/// Environment variable holding the API gateway bearer token
pub const TOKEN_ENV_VAR: &str = "TOKEN";

// ============================================================================
// Kubernetes Constants
// ============================================================================

/// Namespace holding the site-init secret
pub const SITE_INIT_NAMESPACE: &str = "loftsman";

/// Name of the secret carrying the site customizations
pub const SITE_INIT_SECRET: &str = "site-init";

/// Key inside the site-init secret with the customizations document
pub const CUSTOMIZATIONS_KEY: &str = "customizations.yaml";

/// Namespace where the external DNS etcd cluster runs
pub const EXTERNAL_DNS_NAMESPACE: &str = "services";

/// Label selector matching the external DNS etcd replicas
pub const EXTERNAL_DNS_ETCD_SELECTOR: &str = "etcd_cluster=cray-externaldns-etcd";

/// Container name of etcd inside each replica pod
pub const ETCD_CONTAINER: &str = "etcd";

/// Shell command producing a JSON dump of every key in etcd
pub const ETCD_DUMP_COMMAND: [&str; 3] = [
    "sh",
    "-c",
    "ETCDCTL_API=3 etcdctl get --prefix \"\" -w json",
];

// ============================================================================
// External DNS Key Schema Constants
// ============================================================================

/// Leading key segment written by the CoreDNS etcd plugin
pub const DEFAULT_KEY_NAMESPACE: &str = "skydns";

/// Separator between key segments
pub const KEY_SEGMENT_SEPARATOR: char = '/';

// ============================================================================
// Output Constants
// ============================================================================

/// Default destination of the rendered nsupdate script
pub const DEFAULT_OUTPUT_FILE: &str = "./nsupdate-commands.txt";

/// Output path meaning "write to standard output"
pub const STDOUT_OUTPUT: &str = "-";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;

/// Timeout for a single SLS HTTP request
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
