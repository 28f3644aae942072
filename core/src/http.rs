//! Plain-data HTTP request/response types.
//!
//! # Design
//! These types describe HTTP traffic as plain data. `ReaderClient` builds
//! `HttpRequest` values (URL, verb, signed headers, optional JSON body) and
//! parses `HttpResponse` values; the actual round-trip happens in an
//! [`HttpTransport`](crate::transport::HttpTransport) implementation. Keeping
//! the boundary explicit makes request building and response parsing testable
//! without a network, and lets tests inject a fake transport instead of
//! patching any global state.
//!
//! All fields use owned types (`String`, `Vec`) so values can move freely
//! across the async transport boundary.

/// HTTP method for a request. The Reader API uses GET for reads, POST for
/// creates and actions, and DELETE for tag removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Wire name of the method, e.g. `"GET"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ReaderClient::build_*` methods; the `url` is absolute and the
/// headers already carry the `Authorization` signature.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by the transport after executing an `HttpRequest`, then handed to
/// `ReaderClient::parse_*` methods. Non-2xx statuses are represented here as
/// data, not transport errors; interpreting them is the client's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
