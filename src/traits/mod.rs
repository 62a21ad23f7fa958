//! Trait abstractions for injectable capabilities.

pub mod http;

pub use http::{Headers, HttpClient, HttpError, Response};
