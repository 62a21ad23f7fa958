//! Mock HTTP client for testing.
//!
//! A configurable client that returns predefined responses and records
//! every request for verification, so API interactions can be tested
//! without network access.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST or DELETE)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(Response),
    /// Return an error
    Error(HttpError),
}

/// Mock HTTP client.
///
/// URLs are matched exactly first, then by prefix; unmatched requests get
/// the default response (404 unless configured otherwise).
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:8080/api/otp",
///     MockResponse::Success(Response::new(200, Bytes::from("[]"))),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no pattern matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Exact matches win over prefix matches.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set the response used when no configured URL matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn lookup(&self, url: &str) -> MockResponse {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return response.clone();
        }
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return response.clone();
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone().unwrap_or(MockResponse::Success(Response::new(
            404,
            Bytes::from_static(b"not found"),
        )))
    }

    fn resolve(&self, url: &str) -> Result<Response, HttpError> {
        match self.lookup(url) {
            MockResponse::Success(response) => Ok(response),
            MockResponse::Error(error) => Err(error),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("GET", url, headers, None);
        self.resolve(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("POST", url, headers, Some(body.to_string()));
        self.resolve(url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record("DELETE", url, headers, None);
        self.resolve(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_match_and_recording() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://x/api/otp",
            MockResponse::Success(Response::new(200, Bytes::from("[]"))),
        );

        let response = client.get("http://x/api/otp", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 200);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "http://x/api/otp");
    }

    #[tokio::test]
    async fn test_prefix_match() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://x/api/otp/",
            MockResponse::Success(Response::new(200, Bytes::from(r#"{"code":"123456"}"#))),
        );

        let response = client
            .get("http://x/api/otp/42/token", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_unmatched_url_is_404() {
        let client = MockHttpClient::new();
        let response = client.get("http://x/unknown", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_configured_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://x/api/logs",
            MockResponse::Error(HttpError::ConnectionFailed("down".to_string())),
        );
        let result = client.get("http://x/api/logs", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_post_body_recorded() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(200, Bytes::new())));
        client
            .post("http://x/api/otp", r#"{"serviceName":"GitHub"}"#, &Headers::new())
            .await
            .unwrap();
        let requests = client.requests();
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"serviceName":"GitHub"}"#));
    }
}
