// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! External DNS domain from the `site-init` secret.
//!
//! The installer stores its customizations document in the `site-init` secret.
//! The domain that qualifies every inventory name is found at
//! `spec.network.dns.external` of the `customizations.yaml` entry.

use super::retry::retry_api_call;
use super::DomainSuffixProvider;
use crate::constants::{CUSTOMIZATIONS_KEY, SITE_INIT_NAMESPACE, SITE_INIT_SECRET};
use crate::errors::SourceError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use serde_yaml::Value;
use tracing::{debug, info};

/// Path of the external domain inside the customizations document.
const EXTERNAL_DOMAIN_PATH: [&str; 4] = ["spec", "network", "dns", "external"];

/// Reads the external domain from a Kubernetes secret.
#[derive(Clone)]
pub struct SiteInitDomainProvider {
    client: Client,
    namespace: String,
    secret_name: String,
}

impl SiteInitDomainProvider {
    /// Provider for `loftsman/site-init`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_secret(client, SITE_INIT_NAMESPACE, SITE_INIT_SECRET)
    }

    /// Provider for an arbitrary secret carrying a `customizations.yaml` key.
    #[must_use]
    pub fn with_secret(client: Client, namespace: &str, secret_name: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            secret_name: secret_name.to_string(),
        }
    }
}

#[async_trait]
impl DomainSuffixProvider for SiteInitDomainProvider {
    async fn external_domain(&self) -> Result<String, SourceError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        let operation = format!("get secret {}/{}", self.namespace, self.secret_name);

        let secret = retry_api_call(|| secret_api.get(&self.secret_name), &operation)
            .await
            .map_err(|e| SourceError::Kubernetes {
                operation: operation.clone(),
                reason: e.to_string(),
            })?;

        let document = secret
            .data
            .as_ref()
            .and_then(|data| data.get(CUSTOMIZATIONS_KEY))
            .ok_or_else(|| SourceError::MissingField {
                source_name: format!("secret {}/{}", self.namespace, self.secret_name),
                field: CUSTOMIZATIONS_KEY.to_string(),
            })?;

        debug!(
            secret = %self.secret_name,
            namespace = %self.namespace,
            bytes = document.0.len(),
            "Loaded customizations document"
        );

        let domain = parse_external_domain(&document.0)?;
        info!(domain = %domain, "Resolved external DNS domain");
        Ok(domain)
    }
}

/// Extract `spec.network.dns.external` from a customizations document.
///
/// # Errors
///
/// Returns [`SourceError::MalformedResponse`] if the document is not YAML and
/// [`SourceError::MissingField`] if the path is absent, not a string or empty.
pub fn parse_external_domain(customizations: &[u8]) -> Result<String, SourceError> {
    let document: Value =
        serde_yaml::from_slice(customizations).map_err(|e| SourceError::MalformedResponse {
            source_name: CUSTOMIZATIONS_KEY.to_string(),
            reason: e.to_string(),
        })?;

    let domain = EXTERNAL_DOMAIN_PATH
        .iter()
        .try_fold(&document, |node, segment| node.get(*segment))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .ok_or_else(|| SourceError::MissingField {
            source_name: CUSTOMIZATIONS_KEY.to_string(),
            field: EXTERNAL_DOMAIN_PATH.join("."),
        })?;

    Ok(domain.trim_end_matches('.').to_string())
}

#[cfg(test)]
#[path = "site_init_tests.rs"]
mod site_init_tests;
