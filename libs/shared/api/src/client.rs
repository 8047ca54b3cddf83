use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::{AppError, AppResult};

/// JSON-over-HTTP client shared by every per-resource service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(Self::default_headers())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for the clinic API (`API_BASE_URL`).
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    /// Client for the scheduling service (`API_JAVA_URL`).
    pub fn for_agenda(config: &AppConfig) -> AppResult<Self> {
        Self::new(&config.agenda_api_url, config.request_timeout())
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let text = self.send(method, path, query, body).await?;

        // Some endpoints answer 2xx with an empty body.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            error!("Failed to decode response from {}: {}", path, e);
            AppError::Decode(format!("{}: {}", path, e))
        })
    }

    /// Issues a request whose response body is irrelevant to the caller.
    pub async fn request_no_content(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AppResult<()> {
        self.send(method, path, &[], body).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> AppResult<T> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> AppResult<T> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// POST whose response body is ignored.
    pub async fn post_no_content(&self, path: &str, body: Value) -> AppResult<()> {
        self.request_no_content(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.request_no_content(Method::DELETE, path, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> AppResult<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(match status {
                StatusCode::NOT_FOUND => AppError::NotFound(format!("{}: {}", path, text)),
                _ => AppError::Api {
                    status: status.as_u16(),
                    message: text,
                },
            });
        }

        Ok(text)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
