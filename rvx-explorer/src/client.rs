//! Backend contract and HTTP transport
//!
//! [`ReviewBackend`] is the opaque fetch capability the feeds and the
//! comparison controller depend on. [`HttpBackend`] implements it over
//! `reqwest`; tests substitute in-memory backends.

use async_trait::async_trait;
use rvx_common::config::ExplorerConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::ReviewPage;
use crate::query::QueryParams;

const USER_AGENT: &str = concat!("rvx-explorer/", env!("CARGO_PKG_VERSION"));

/// Comparative aggregate endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateEndpoint {
    Kpis,
    Sentiments,
    Timeseries,
    TopCodes,
    HeatmapCodes,
}

impl AggregateEndpoint {
    /// Path below the backend base URL
    pub const fn path(self) -> &'static str {
        match self {
            AggregateEndpoint::Kpis => "compare/kpis",
            AggregateEndpoint::Sentiments => "compare/sentiments",
            AggregateEndpoint::Timeseries => "compare/timeseries",
            AggregateEndpoint::TopCodes => "compare/top-codes",
            AggregateEndpoint::HeatmapCodes => "compare/heatmap-codes",
        }
    }
}

impl fmt::Display for AggregateEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Fetch capability
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// `GET /reviews`
    async fn fetch_reviews(&self, params: &QueryParams) -> Result<ReviewPage, FetchError>;

    /// `GET /compare/...`; the body is passed through undecoded
    async fn fetch_aggregate(
        &self,
        endpoint: AggregateEndpoint,
        params: &QueryParams,
    ) -> Result<Value, FetchError>;
}

/// `reqwest`-backed transport
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ExplorerConfig) -> Result<Self, FetchError> {
        Self::new(&config.backend_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, params = params.len(), "Querying backend");

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            tracing::warn!(url = %url, status = status.as_u16(), "Backend returned an error");
            return Err(FetchError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ReviewBackend for HttpBackend {
    async fn fetch_reviews(&self, params: &QueryParams) -> Result<ReviewPage, FetchError> {
        self.get_json("reviews", params).await
    }

    async fn fetch_aggregate(
        &self,
        endpoint: AggregateEndpoint,
        params: &QueryParams,
    ) -> Result<Value, FetchError> {
        self.get_json(endpoint.path(), params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base() {
        let backend = HttpBackend::new("http://localhost:8000/api/", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(AggregateEndpoint::TopCodes.path(), "compare/top-codes");
        assert_eq!(AggregateEndpoint::HeatmapCodes.to_string(), "compare/heatmap-codes");
    }
}
