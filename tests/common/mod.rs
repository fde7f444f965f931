// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use kube::client::Client;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// SLS document for a CAN network with two subnets
pub fn can_network() -> Value {
    json!({
        "Name": "CAN",
        "FullName": "Customer Access Network",
        "IPRanges": ["10.101.8.0/22"],
        "Type": "ethernet",
        "ExtraProperties": {
            "CIDR": "10.101.8.0/22",
            "VlanRange": [6],
            "Subnets": [
                {
                    "Name": "bootstrap_dhcp",
                    "CIDR": "10.101.8.0/24",
                    "IPReservations": [
                        {"Name": "ncn-m001", "IPAddress": "10.101.8.5", "Aliases": ["ncn-m001-can"]},
                        {"Name": "ncn-w001", "IPAddress": "10.101.8.11"}
                    ]
                },
                {
                    "Name": "can_metallb_address_pool",
                    "CIDR": "10.101.9.0/25"
                }
            ]
        }
    })
}

/// `etcdctl get --prefix "" -w json` output for plain key/value pairs
pub fn etcd_dump(entries: &[(&str, &str)]) -> String {
    let kvs: Vec<Value> = entries
        .iter()
        .map(|(key, value)| {
            json!({
                "key": BASE64.encode(key),
                "create_revision": 2,
                "mod_revision": 2,
                "version": 1,
                "value": BASE64.encode(value)
            })
        })
        .collect();

    json!({
        "header": {"cluster_id": 1, "member_id": 2, "revision": 3, "raft_term": 4},
        "kvs": kvs,
        "count": entries.len()
    })
    .to_string()
}

/// Write `contents` to `dir/name`
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}
