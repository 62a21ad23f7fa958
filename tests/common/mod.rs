//! Shared helpers for integration tests.

use std::sync::Arc;

use bytes::Bytes;

use chronoauth::adapters::mock::{MockHttpClient, MockResponse};
use chronoauth::api::ChronoApiClient;
use chronoauth::app::App;
use chronoauth::clipboard::MemoryClipboard;
use chronoauth::qr::RqrrDecoder;
use chronoauth::traits::Response;

pub const BASE: &str = "http://mock";

/// Build an app wired to a fresh mock HTTP client.
pub fn mock_app() -> (App<MockHttpClient>, MockHttpClient) {
    let mock = MockHttpClient::new();
    let api = Arc::new(ChronoApiClient::new(mock.clone(), BASE).with_token("test-session"));
    let app = App::new(
        api,
        "thanapat",
        Arc::new(RqrrDecoder),
        Box::new(MemoryClipboard::default()),
    );
    (app, mock)
}

/// Configure a 200 JSON response for a URL.
pub fn json_response(mock: &MockHttpClient, url: &str, body: &str) {
    mock.set_response(
        url,
        MockResponse::Success(Response::new(200, Bytes::from(body.to_string()))),
    );
}

