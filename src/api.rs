// ABOUTME: HTTP client for the FitWell backend REST API with bearer-token authentication
// ABOUTME: Thin typed wrappers over the health endpoints; the sync upload sits behind HealthApi
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitWell

use crate::config::ApiConfig;
use crate::constants::defaults;
use crate::models::{DailySummary, SyncPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Upload surface the sync orchestrator depends on
///
/// Kept minimal so tests can substitute a recording implementation.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Upload one sync payload to the backend
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and non-success responses.
    async fn sync_health_data(&self, payload: &SyncPayload) -> Result<()>;
}

/// Authenticated client for the FitWell backend
pub struct ApiClient {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

impl ApiClient {
    /// Create a client for the configured backend
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            auth_token: config.auth_token.clone(),
            client,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Attach the bearer token when one is configured
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Make an authenticated GET request and decode the JSON response
    async fn get_json<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Request to {url} failed with status {status}: {text}"
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {url}"))
    }

    /// Fetch stored daily summaries for the last `days` days
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and non-success responses.
    pub async fn get_health_data(&self, days: u32) -> Result<Vec<DailySummary>> {
        self.get_json(&format!("/health/health-data/?days={days}"))
            .await
    }

    /// Fetch the backend's analytics rollup for the last `days` days
    ///
    /// The analytics shape is owned by the backend and evolves with it, so
    /// it is surfaced untyped.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures and non-success responses.
    pub async fn get_analytics(&self, days: u32) -> Result<serde_json::Value> {
        self.get_json(&format!("/health/analytics/?days={days}"))
            .await
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn sync_health_data(&self, payload: &SyncPayload) -> Result<()> {
        let url = self.url("/health/sync/");
        let response = self
            .authorize(self.client.post(&url))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to send sync payload to {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Sync upload failed with status {status}: {text}"
            ));
        }

        if let Ok(body) = response.json::<serde_json::Value>().await {
            if let Some(message) = body.get("message").and_then(|m| m.as_str()) {
                debug!(backend.message = %message, "Sync upload acknowledged");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(base_url: &str, token: Option<&str>) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_owned(),
            auth_token: token.map(str::to_owned),
            timeout_secs: 5,
        })
    }

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let client = client_with("http://localhost:8000/api/", None);
        assert_eq!(
            client.url("/health/sync/"),
            "http://localhost:8000/api/health/sync/"
        );
        assert_eq!(
            client.url("health/sync/"),
            "http://localhost:8000/api/health/sync/"
        );
    }

    #[test]
    fn token_is_optional() {
        let with_token = client_with("http://localhost:8000/api", Some("tok"));
        let without = client_with("http://localhost:8000/api", None);
        assert!(with_token.auth_token.is_some());
        assert!(without.auth_token.is_none());
    }
}
