//! API client for communicating with the targeting API.
//!
//! Every request is JSON in both directions and keeps cookies between
//! calls. Mutating verbs additionally carry an `X-CSRF-Token` header.
//!
//! Response handling:
//! - 2xx with a body: the body is decoded as the requested type
//! - 204 or an empty body: decoded from `{}`
//! - anything else: [`ApiError::Http`] carrying the backend's `message`

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Header carrying the CSRF token on mutating requests
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Default endpoint issuing CSRF tokens, relative to the base URL
pub const DEFAULT_CSRF_PATH: &[&str] = &["auth", "csrf"];

/// Where the CSRF token for mutating requests comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfSource {
    /// A fixed token, e.g. from configuration
    Static(String),
    /// Fetched once from this path (segments under the base URL) and cached
    Endpoint(Vec<String>),
}

impl Default for CsrfSource {
    fn default() -> Self {
        Self::Endpoint(DEFAULT_CSRF_PATH.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    csrf_token: String,
}

/// Builder for [`ApiClient`]
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: String,
    csrf: CsrfSource,
    timeout: Duration,
}

impl ApiClientBuilder {
    /// Set the CSRF token source
    pub fn csrf(mut self, csrf: CsrfSource) -> Self {
        self.csrf = csrf;
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| ApiError::BaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(self.base_url));
        }
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()?;

        Ok(ApiClient {
            base_url,
            client,
            csrf: self.csrf,
            csrf_cache: Mutex::new(None),
        })
    }
}

/// API client for the targeting API
#[derive(Debug)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
    csrf: CsrfSource,
    csrf_cache: Mutex<Option<String>>,
}

/// Whether a method changes server state and needs a CSRF token
pub fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

impl ApiClient {
    /// Start building a client for `base_url`
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            csrf: CsrfSource::default(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Create a client with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder(base_url).build()
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments under the base URL, escaping each segment.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send(Method::GET, segments, &[], None).await
    }

    /// GET with query parameters and decode
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.send(Method::GET, segments, query, None).await
    }

    /// POST a JSON body and decode
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, segments, &[], Some(encode(body)?)).await
    }

    /// PUT a JSON body and decode
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PUT, segments, &[], Some(encode(body)?)).await
    }

    /// PATCH a JSON body and decode
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::PATCH, segments, &[], Some(encode(body)?)).await
    }

    /// DELETE and decode
    pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send(Method::DELETE, segments, &[], None).await
    }

    /// Health check
    pub async fn health(&self) -> bool {
        let Ok(url) = self.url_for(&["health"]) else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Send a request and decode the response
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let url = self.url_for(segments)?;
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        let csrf_token = if is_mutating(&method) {
            let token = self.csrf_token().await?;
            request = request.header(CSRF_HEADER, token.as_str());
            Some(token)
        } else {
            None
        };
        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(%method, %url, "API request");
        let (status, bytes) = execute(request).await?;

        if status == StatusCode::FORBIDDEN && csrf_token.is_some() {
            // A rejected token is dropped so the next mutation fetches a fresh one.
            self.forget_csrf_token().await;
        }

        decode(status, &bytes).inspect_err(|e| warn!(%method, %url, error = %e, "API request failed"))
    }

    /// Token for mutating requests, fetching and caching it if needed
    async fn csrf_token(&self) -> Result<String, ApiError> {
        let path = match &self.csrf {
            CsrfSource::Static(token) => return Ok(token.clone()),
            CsrfSource::Endpoint(path) => path,
        };

        let mut cache = self.csrf_cache.lock().await;
        if let Some(token) = cache.as_ref() {
            return Ok(token.clone());
        }

        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        let url = self.url_for(&segments)?;
        let request = self.client.get(url).header(ACCEPT, "application/json");
        let (status, bytes) = execute(request).await?;
        let response: CsrfResponse = decode(status, &bytes).map_err(|e| ApiError::Csrf(e.to_string()))?;

        debug!("Fetched CSRF token");
        *cache = Some(response.csrf_token.clone());
        Ok(response.csrf_token)
    }

    async fn forget_csrf_token(&self) {
        if matches!(self.csrf, CsrfSource::Endpoint(_)) {
            *self.csrf_cache.lock().await = None;
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body).map_err(ApiError::Encode)
}

async fn execute(request: reqwest::RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    Ok((status, bytes.to_vec()))
}

/// Turn a status and body into a decoded value or an error.
fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), bytes));
    }
    let empty = status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace);
    let body: &[u8] = if empty { b"{}" } else { bytes };
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new("http://localhost:8000/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::BaseUrl(_))));
        assert!(matches!(ApiClient::new("mailto:cell@example.mil"), Err(ApiError::BaseUrl(_))));
    }

    #[test]
    fn test_url_segments_are_escaped() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        let url = client.url_for(&["targets", "T 1/2"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/targets/T%201%2F2");
    }

    #[test]
    fn test_mutating_methods() {
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::DELETE));
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::HEAD));
    }

    #[test]
    fn test_decode_no_content_is_empty_object() {
        let value: Value = decode(StatusCode::NO_CONTENT, b"").unwrap();
        assert_eq!(value, serde_json::json!({}));
        let value: Value = decode(StatusCode::OK, b"  ").unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_decode_error_status() {
        let result: Result<Value, _> = decode(StatusCode::NOT_FOUND, br#"{"message":"No such target"}"#);
        assert_eq!(result.unwrap_err().to_string(), "No such target");
    }
}
