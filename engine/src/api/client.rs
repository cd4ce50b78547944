//! Analytics API client.
//!
//! Every endpoint answers with the same envelope: `{"success": true,
//! "data": ...}` or `{"success": false, "error": "reason"}`. Transport
//! failures, non-success statuses, undecodable bodies, and failed
//! envelopes all normalize to [`AppError::RequestFailed`], with the
//! server-supplied reason whenever one is present.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use shared::{ForecastRequest, ForecastResponse, KpiId, Snapshot};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Wire envelope shared by every analytics endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Unwrap the `{success, data, error}` envelope into its data payload.
pub fn decode_envelope<T: DeserializeOwned>(endpoint: &str, body: Value) -> AppResult<T> {
    let envelope: Envelope = serde_json::from_value(body).map_err(|e| {
        AppError::request_failed(endpoint, format!("unexpected response shape: {}", e))
    })?;

    if !envelope.success {
        let reason = envelope
            .error
            .unwrap_or_else(|| "the analytics service reported a failure".to_string());
        return Err(AppError::request_failed(endpoint, reason));
    }

    let data = envelope
        .data
        .ok_or_else(|| AppError::request_failed(endpoint, "response carried no data"))?;
    serde_json::from_value(data).map_err(|e| {
        AppError::request_failed(endpoint, format!("could not decode response data: {}", e))
    })
}

/// Boundary the controller fetches through; tests substitute a stub.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Fetch the dashboard snapshot; `refresh` bypasses the server cache.
    async fn dashboard(&self, refresh: bool) -> AppResult<Snapshot>;

    /// Fetch the detail payload for one KPI.
    async fn kpi_detail(&self, id: KpiId) -> AppResult<Value>;

    /// Run a demand forecast.
    async fn forecast(&self, request: &ForecastRequest) -> AppResult<ForecastResponse>;
}

/// Delegate through `Arc` so a shared handle can serve as the API.
#[async_trait]
impl<T: AnalyticsApi + ?Sized> AnalyticsApi for Arc<T> {
    async fn dashboard(&self, refresh: bool) -> AppResult<Snapshot> {
        (**self).dashboard(refresh).await
    }

    async fn kpi_detail(&self, id: KpiId) -> AppResult<Value> {
        (**self).kpi_detail(id).await
    }

    async fn forecast(&self, request: &ForecastRequest) -> AppResult<ForecastResponse> {
        (**self).forecast(request).await
    }
}

/// Analytics API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new ApiClient from configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new ApiClient with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Liveness probe used by the headless runner at startup.
    pub async fn health(&self) -> AppResult<Value> {
        let body = self.get_json("health").await?;
        decode_envelope("health", body)
    }

    async fn get_json(&self, path: &str) -> AppResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(path, format!("request failed: {}", e)))?;
        Self::read_body(path, response).await
    }

    async fn post_json(&self, path: &str, payload: &impl serde::Serialize) -> AppResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::request_failed(path, format!("request failed: {}", e)))?;
        Self::read_body(path, response).await
    }

    /// Read the body, preferring an envelope error reason on bad statuses.
    async fn read_body(path: &str, response: reqwest::Response) -> AppResult<Value> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::request_failed(path, format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            let reason = serde_json::from_str::<Envelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| format!("HTTP {}", status));
            tracing::error!("Analytics request to {} failed: HTTP {}", path, status);
            return Err(AppError::request_failed(path, reason));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::request_failed(path, format!("unexpected response shape: {}", e))
        })
    }
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn dashboard(&self, refresh: bool) -> AppResult<Snapshot> {
        let path = if refresh {
            "dashboard?refresh=true"
        } else {
            "dashboard"
        };
        let body = self.get_json(path).await?;
        decode_envelope("dashboard", body)
    }

    async fn kpi_detail(&self, id: KpiId) -> AppResult<Value> {
        let path = format!("kpi/{}", id);
        let body = self.get_json(&path).await?;
        decode_envelope(&path, body)
    }

    async fn forecast(&self, request: &ForecastRequest) -> AppResult<ForecastResponse> {
        let body = self.post_json("forecast/demand", request).await?;
        decode_envelope("forecast/demand", body)
    }
}
