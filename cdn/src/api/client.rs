use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::{ApiErrorDetails, ApiErrorResponse, ApiResponse};
use super::error::ApiError;

/// Header carrying a per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// CDN API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    retry_config: RetryConfig,
}

/// Retry settings for idempotent reads. Mutating requests are sent once.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl RetryConfig {
    /// Delay before retry `attempt` (1-based): doubles from the initial
    /// backoff and saturates at the maximum
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        2_u64
            .checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.initial_backoff_ms.checked_mul(factor))
            .map_or(self.max_backoff_ms, |backoff| backoff.min(self.max_backoff_ms))
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(endpoint: &str, api_token: &str, insecure: bool) -> Result<Self, ApiError> {
        Self::with_config(endpoint, api_token, insecure, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        endpoint: &str,
        api_token: &str,
        insecure: bool,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!(
                "{}: scheme must be http or https",
                endpoint
            )));
        }

        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(Duration::from_secs(retry_config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: endpoint.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", api_token),
                retry_config,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn services(&self) -> super::services::ServicesApi<'_> {
        super::services::ServicesApi::new(self)
    }

    pub fn domains(&self) -> super::domains::DomainsApi<'_> {
        super::domains::DomainsApi::new(self)
    }

    pub fn origins(&self) -> super::origins::OriginsApi<'_> {
        super::origins::OriginsApi::new(self)
    }

    pub fn certificates(&self) -> super::certificates::CertificatesApi<'_> {
        super::certificates::CertificatesApi::new(self)
    }

    pub fn traffic_policies(&self) -> super::traffic_policies::TrafficPoliciesApi<'_> {
        super::traffic_policies::TrafficPoliciesApi::new(self)
    }

    /// Execute a GET request, retrying transient failures with backoff
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let retry = &self.inner.retry_config;
        let mut attempt = 0;

        loop {
            match self.send(Method::GET, path, None).await {
                Ok(response) => return parse_success_response(response).await,
                Err(e) if e.is_transient() && attempt < retry.max_retries => {
                    attempt += 1;
                    let backoff = retry.backoff_ms(attempt);
                    tracing::debug!(
                        "Retrying GET {} after {}ms (attempt {}): {}",
                        path,
                        backoff,
                        attempt,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Execute a POST request once
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_json_body(body)?;
        let response = self.send(Method::POST, path, Some(&body)).await?;
        parse_success_response(response).await
    }

    /// Execute a PUT request once
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_json_body(body)?;
        let response = self.send(Method::PUT, path, Some(&body)).await?;
        parse_success_response(response).await
    }

    /// Execute a DELETE request once; any response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("{} request to: {} (request id {})", method, url, request_id);

        let mut request = self
            .inner
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        tracing::debug!("Response status: {} (request id {})", status, request_id);

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthError);
        }
        Err(error_from_response(response).await)
    }

    fn classify(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.inner.retry_config.timeout_seconds)
        } else if e.is_connect() {
            ApiError::ServiceUnavailable(e.to_string())
        } else {
            ApiError::RequestError(e)
        }
    }
}

fn to_json_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to encode request body: {}", e)))
}

/// Parse a success body, unwrapping the `data` envelope when present
async fn parse_success_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let text = response.text().await?;
    tracing::debug!("API response body: {}", text);

    match serde_json::from_str::<ApiResponse<T>>(&text) {
        Ok(wrapper) => Ok(wrapper.data),
        Err(_) => match serde_json::from_str::<T>(&text) {
            Ok(data) => Ok(data),
            Err(e) => {
                tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
                Err(ApiError::ParseError(format!(
                    "Failed to parse response: {}",
                    e
                )))
            }
        },
    }
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let details = serde_json::from_str::<ApiErrorResponse>(&text)
        .ok()
        .map(|body| {
            Box::new(ApiErrorDetails {
                errors: body.errors,
                field_errors: body.field_errors,
            })
        });

    ApiError::ApiError {
        status,
        message: text,
        details,
    }
}
