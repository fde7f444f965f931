// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! External DNS key/value dump from an etcd replica.
//!
//! Lists the etcd pods backing the external DNS store, picks one running
//! replica, and runs `etcdctl get --prefix ""` inside it. The JSON written to
//! stdout is decoded with [`parse_dump`].

use super::retry::retry_api_call;
use super::DnsStoreDumpSource;
use crate::constants::{
    ETCD_CONTAINER, ETCD_DUMP_COMMAND, EXTERNAL_DNS_ETCD_SELECTOR, EXTERNAL_DNS_NAMESPACE,
};
use crate::errors::SourceError;
use crate::externaldns::{parse_dump, KeyValueEntry};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use kube::api::{AttachParams, ListParams};
use kube::{Api, Client};
use rand::seq::IndexedRandom;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// How a replica is chosen among the running etcd pods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReplicaPolicy {
    /// Uniformly random running replica, spreading load across runs
    #[default]
    Random,
    /// First running replica in listing order
    First,
}

/// Pick a running pod according to `policy`.
///
/// Pods without a name or not in phase `Running` are never selected.
#[must_use]
pub fn select_replica(pods: &[Pod], policy: ReplicaPolicy) -> Option<&str> {
    let running: Vec<&str> = pods
        .iter()
        .filter(|pod| {
            pod.status.as_ref().and_then(|s| s.phase.as_deref()) == Some("Running")
        })
        .filter_map(|pod| pod.metadata.name.as_deref())
        .collect();

    match policy {
        ReplicaPolicy::First => running.first().copied(),
        ReplicaPolicy::Random => running.choose(&mut rand::rng()).copied(),
    }
}

/// Describe why a remote command failed, or `None` if it succeeded.
///
/// The API server reports a non-zero exit through an `ExitCode` cause.
#[must_use]
pub fn exec_failure(status: &Status) -> Option<String> {
    if status.status.as_deref() == Some("Success") {
        return None;
    }

    let exit_code = status
        .details
        .as_ref()
        .and_then(|details| details.causes.as_ref())
        .and_then(|causes| {
            causes
                .iter()
                .find(|cause| cause.reason.as_deref() == Some("ExitCode"))
        })
        .and_then(|cause| cause.message.as_deref());

    let message = status
        .message
        .as_deref()
        .or(status.reason.as_deref())
        .unwrap_or("no message");

    Some(match exit_code {
        Some(code) => format!("etcdctl exited with code {code}: {message}"),
        None => format!("etcdctl failed: {message}"),
    })
}

/// Dumps the external DNS store through `kubectl exec`-style attach.
#[derive(Clone)]
pub struct EtcdReplicaDumper {
    client: Client,
    namespace: String,
    selector: String,
    container: String,
    policy: ReplicaPolicy,
}

impl EtcdReplicaDumper {
    /// Dumper for the `cray-externaldns-etcd` cluster in `services`.
    #[must_use]
    pub fn new(client: Client, policy: ReplicaPolicy) -> Self {
        Self {
            client,
            namespace: EXTERNAL_DNS_NAMESPACE.to_string(),
            selector: EXTERNAL_DNS_ETCD_SELECTOR.to_string(),
            container: ETCD_CONTAINER.to_string(),
            policy,
        }
    }

    /// Override where the etcd pods are looked up.
    #[must_use]
    pub fn with_location(mut self, namespace: &str, selector: &str) -> Self {
        self.namespace = namespace.to_string();
        self.selector = selector.to_string();
        self
    }

    async fn exec_dump(&self, pod_api: &Api<Pod>, pod_name: &str) -> Result<String, SourceError> {
        let operation = format!("exec etcdctl in {}/{pod_name}", self.namespace);
        let kube_err = |reason: String| SourceError::Kubernetes {
            operation: operation.clone(),
            reason,
        };

        let params = AttachParams::default()
            .container(self.container.as_str())
            .stdin(false)
            .stdout(true)
            .stderr(false);

        let mut process = pod_api
            .exec(pod_name, ETCD_DUMP_COMMAND, &params)
            .await
            .map_err(|e| kube_err(e.to_string()))?;

        let status = process.take_status();

        let mut output = String::new();
        {
            let mut stdout = process
                .stdout()
                .ok_or_else(|| kube_err("stdout stream not attached".to_string()))?;
            stdout
                .read_to_string(&mut output)
                .await
                .map_err(|e| kube_err(format!("failed to read stdout: {e}")))?;
        }

        match status {
            Some(status) => match status.await {
                Some(status) => {
                    if let Some(reason) = exec_failure(&status) {
                        return Err(kube_err(reason));
                    }
                }
                None => warn!(pod = %pod_name, "No exit status reported for etcdctl"),
            },
            None => warn!(pod = %pod_name, "Exit status of etcdctl already taken"),
        }

        process
            .join()
            .await
            .map_err(|e| kube_err(e.to_string()))?;

        Ok(output)
    }
}

#[async_trait]
impl DnsStoreDumpSource for EtcdReplicaDumper {
    async fn dump(&self) -> Result<Vec<KeyValueEntry>, SourceError> {
        let pod_api: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let lp = ListParams::default().labels(&self.selector);
        let operation = format!("list pods {} in {}", self.selector, self.namespace);

        let pods = retry_api_call(|| pod_api.list(&lp), &operation)
            .await
            .map_err(|e| SourceError::Kubernetes {
                operation: operation.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Found {} etcd pod(s) matching {} in {}",
            pods.items.len(),
            self.selector,
            self.namespace
        );

        let pod_name = select_replica(&pods.items, self.policy).ok_or_else(|| {
            SourceError::NoReplicas {
                namespace: self.namespace.clone(),
                selector: self.selector.clone(),
            }
        })?;

        info!(pod = %pod_name, policy = ?self.policy, "Dumping external DNS store");

        let output = self.exec_dump(&pod_api, pod_name).await?;
        let entries = parse_dump(&output)?;

        info!(pod = %pod_name, entries = entries.len(), "Fetched external DNS entries");
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "etcd_tests.rs"]
mod etcd_tests;
