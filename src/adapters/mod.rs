//! Concrete implementations of the capability traits.

pub mod mock;
pub mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
