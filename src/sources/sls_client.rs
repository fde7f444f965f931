// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SLS HTTP client.
//!
//! Fetches network descriptions from the SLS API behind the API gateway,
//! authenticating with a bearer token. The gateway presents a certificate from
//! the system's internal CA, so certificate verification is disabled.

use super::retry::retry_http_call;
use super::NetworkInventorySource;
use crate::constants::HTTP_REQUEST_TIMEOUT_SECS;
use crate::errors::SourceError;
use crate::sls::SlsNetwork;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Client for `GET {base}/v1/networks/{name}`.
#[derive(Debug, Clone)]
pub struct SlsClient {
    /// HTTP client for API requests
    client: HttpClient,
    /// Base address of the SLS API, without trailing slash
    base_url: String,
    /// Bearer token for the API gateway
    token: String,
}

impl SlsClient {
    /// Create a client for the SLS API at `base_api_address`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the address is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_api_address: &str, token: impl Into<String>) -> Result<Self, SourceError> {
        let client = HttpClient::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SourceError::Transport {
                url: base_api_address.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Self::with_client(client, base_api_address, token)
    }

    /// Create a client reusing an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Transport`] if the address is not an absolute
    /// http(s) URL.
    pub fn with_client(
        client: HttpClient,
        base_api_address: &str,
        token: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let parsed = Url::parse(base_api_address).map_err(|e| SourceError::Transport {
            url: base_api_address.to_string(),
            reason: format!("invalid base API address: {e}"),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SourceError::Transport {
                url: base_api_address.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: base_api_address.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// URL of the network description for `network`.
    #[must_use]
    pub fn network_url(&self, network: &str) -> String {
        format!("{}/v1/networks/{network}", self.base_url)
    }

    async fn fetch_once(&self, url: &str) -> Result<SlsNetwork, SourceError> {
        info!(url = %url, "HTTP API request to SLS");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                url = %url,
                status = %status,
                error = %error_text,
                "SLS request failed"
            );
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status_code: status.as_u16(),
                body: error_text,
            });
        }

        let text = response.text().await.map_err(|e| SourceError::Transport {
            url: url.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        info!(
            url = %url,
            status = %status,
            response_len = text.len(),
            "SLS request successful"
        );

        serde_json::from_str(&text).map_err(|e| SourceError::MalformedResponse {
            source_name: "sls".to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl NetworkInventorySource for SlsClient {
    async fn fetch_network(&self, network: &str) -> Result<SlsNetwork, SourceError> {
        let url = self.network_url(network);
        retry_http_call(|| self.fetch_once(&url), &format!("GET {url}")).await
    }
}

#[cfg(test)]
#[path = "sls_client_tests.rs"]
mod sls_client_tests;
