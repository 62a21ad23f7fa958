//! ChronoAuth API client for backend communication.
//!
//! All server interaction goes through [`ChronoApiClient`], which is
//! generic over the [`HttpClient`] trait so tests can substitute the
//! recording mock. The client holds the opaque session token obtained at
//! login and attaches it as a bearer credential on every call.

use crate::models::{
    ActivityLog, CodeResponse, CreateEntryRequest, EntrySummary, LoginRequest, LoginResponse,
    MessageResponse,
};
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Default backend address for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Error type for ChronoAuth API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Credentials were rejected by the server.
    #[error("invalid credentials")]
    Unauthorized,
    /// The server rejected a new entry's secret.
    #[error("{0}")]
    InvalidSecret(String),
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// Server returned a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Client for the ChronoAuth backend API.
#[derive(Debug, Clone)]
pub struct ChronoApiClient<C> {
    /// Base URL for the backend, without a trailing slash.
    base_url: String,
    /// Session token from a successful login.
    token: Option<String>,
    client: C,
}

impl<C: HttpClient> ChronoApiClient<C> {
    /// Create a client against the given base URL.
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: None,
            client,
        }
    }

    /// Attach an existing session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(ref token) = self.token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Extract the server's `{"message": ...}` text from an error body,
    /// falling back to the raw body.
    fn error_message(response: &Response) -> String {
        response
            .json::<MessageResponse>()
            .map(|m| m.message)
            .or_else(|_| response.text())
            .unwrap_or_else(|_| "unknown error".to_string())
    }

    fn check(response: Response) -> Result<Response, ApiError> {
        if response.is_success() {
            return Ok(response);
        }
        if response.status == 401 || response.status == 403 {
            return Err(ApiError::Unauthorized);
        }
        Err(ApiError::Server {
            status: response.status,
            message: Self::error_message(&response),
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sign in and store the returned session token.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let body = serde_json::to_string(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        let response = self
            .client
            .post(&self.url("/api/auth/login"), &body, &self.headers())
            .await?;
        let response = Self::check(response)?;
        let login: LoginResponse = Self::decode(&response)?;
        self.token = Some(login.token);
        Ok(())
    }

    /// End the session server-side. Best-effort: callers drop the client
    /// afterwards, so a failure here only means a dangling server session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&self.url("/api/auth/logout"), "", &self.headers())
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Full entry listing. Codes are not included; fetch them by id.
    pub async fn fetch_entries(&self) -> Result<Vec<EntrySummary>, ApiError> {
        let response = self
            .client
            .get(&self.url("/api/otp"), &self.headers())
            .await?;
        Self::decode(&Self::check(response)?)
    }

    /// Current 6-digit code for one entry.
    pub async fn fetch_code(&self, id: i64) -> Result<String, ApiError> {
        let response = self
            .client
            .get(&self.url(&format!("/api/otp/{}/token", id)), &self.headers())
            .await?;
        let code: CodeResponse = Self::decode(&Self::check(response)?)?;
        Ok(code.code)
    }

    /// Register a new entry.
    ///
    /// This is the form boundary: the secret is whitespace-stripped and
    /// uppercased here before it goes on the wire. A 400 maps to
    /// [`ApiError::InvalidSecret`] with the server's message.
    pub async fn create_entry(&self, service_name: &str, secret: &str) -> Result<(), ApiError> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        let body = serde_json::to_string(&CreateEntryRequest {
            service_name: service_name.to_string(),
            secret_key: normalized,
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        let response = self
            .client
            .post(&self.url("/api/otp"), &body, &self.headers())
            .await?;

        if response.status == 400 {
            return Err(ApiError::InvalidSecret(Self::error_message(&response)));
        }
        Self::check(response)?;
        Ok(())
    }

    /// Delete an entry by id.
    pub async fn delete_entry(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(&self.url(&format!("/api/otp/{}", id)), &self.headers())
            .await?;
        Self::check(response)?;
        Ok(())
    }

    /// Activity-log listing, newest first as served.
    pub async fn fetch_logs(&self) -> Result<Vec<ActivityLog>, ApiError> {
        let response = self
            .client
            .get(&self.url("/api/logs"), &self.headers())
            .await?;
        Self::decode(&Self::check(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use bytes::Bytes;

    fn client_with(mock: &MockHttpClient) -> ChronoApiClient<MockHttpClient> {
        ChronoApiClient::new(mock.clone(), "http://x").with_token("tok")
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let api = ChronoApiClient::new(MockHttpClient::new(), "http://x:8080/");
        assert_eq!(api.base_url(), "http://x:8080");
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/auth/login",
            MockResponse::Success(crate::traits::Response::new(
                200,
                Bytes::from(r#"{"token":"session-abc"}"#),
            )),
        );

        let mut api = ChronoApiClient::new(mock.clone(), "http://x");
        assert!(!api.has_session());
        api.login("thanapat", "hunter2").await.unwrap();
        assert!(api.has_session());

        let requests = mock.requests();
        assert_eq!(requests[0].method, "POST");
        let body: serde_json::Value = serde_json::from_str(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["username"], "thanapat");
    }

    #[tokio::test]
    async fn test_login_rejected_is_unauthorized() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/auth/login",
            MockResponse::Success(crate::traits::Response::new(401, Bytes::new())),
        );
        let mut api = ChronoApiClient::new(mock, "http://x");
        let result = api.login("u", "p").await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!api.has_session());
    }

    #[tokio::test]
    async fn test_fetch_entries_sends_bearer() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp",
            MockResponse::Success(crate::traits::Response::new(
                200,
                Bytes::from(r#"[{"id":1,"serviceName":"GitHub","owner":"thanapat"}]"#),
            )),
        );

        let api = client_with(&mock);
        let entries = api.fetch_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].service_name, "GitHub");

        let requests = mock.requests();
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer tok".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_code() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp/42/token",
            MockResponse::Success(crate::traits::Response::new(
                200,
                Bytes::from(r#"{"code":"492039","serviceName":"GitHub"}"#),
            )),
        );

        let api = client_with(&mock);
        assert_eq!(api.fetch_code(42).await.unwrap(), "492039");
    }

    #[tokio::test]
    async fn test_create_entry_normalizes_secret() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp",
            MockResponse::Success(crate::traits::Response::new(
                200,
                Bytes::from(r#"{"message":"Service added successfully"}"#),
            )),
        );

        let api = client_with(&mock);
        api.create_entry("GitHub", " jbsw y3dp ehpk 3pxp ")
            .await
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_str(mock.requests()[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["secretKey"], "JBSWY3DPEHPK3PXP");
    }

    #[tokio::test]
    async fn test_create_entry_invalid_secret() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp",
            MockResponse::Success(crate::traits::Response::new(
                400,
                Bytes::from(r#"{"message":"Invalid Base32 secret key"}"#),
            )),
        );

        let api = client_with(&mock);
        let result = api.create_entry("GitHub", "not base32!").await;
        match result {
            Err(ApiError::InvalidSecret(message)) => {
                assert_eq!(message, "Invalid Base32 secret key")
            }
            other => panic!("expected InvalidSecret, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp/7",
            MockResponse::Success(crate::traits::Response::new(
                200,
                Bytes::from(r#"{"message":"Service deleted"}"#),
            )),
        );

        let api = client_with(&mock);
        api.delete_entry(7).await.unwrap();
        assert_eq!(mock.requests()[0].method, "DELETE");
        assert_eq!(mock.requests()[0].url, "http://x/api/otp/7");
    }

    #[tokio::test]
    async fn test_server_error_carries_message() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/otp/9",
            MockResponse::Success(crate::traits::Response::new(
                500,
                Bytes::from(r#"{"message":"boom"}"#),
            )),
        );

        let api = client_with(&mock);
        match api.delete_entry(9).await {
            Err(ApiError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_posts_with_session() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://x/api/auth/logout",
            MockResponse::Success(crate::traits::Response::new(200, Bytes::new())),
        );
        let api = client_with(&mock);
        api.logout().await.unwrap();
        let requests = mock.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url, "http://x/api/auth/logout");
    }
}
