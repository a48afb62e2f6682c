//! HTTP transport types and the seam the endpoint functions send through.
//!
//! # Design
//! Requests are plain data. The core builds `HttpRequest` values and hands
//! them to a `Transport`, which performs the single network call and returns
//! its response unopened. `RawResponse` keeps the two steps apart: status and
//! headers are readable as soon as `send` returns, the body is materialized by
//! a separate `text` call and buffered so later reads see the same bytes.
//!
//! `HttpResponse` is the in-memory implementation used by unit tests and by
//! any host that already has the full body in hand.

use std::fmt;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Header names are lowercase. `body` is already encoded; the matching
/// `content-type` header is present whenever it is `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Response returned by a `Transport`, with the body read on demand.
pub trait RawResponse {
    fn status(&self) -> u16;

    fn header(&self, name: &str) -> Option<&str>;

    /// Read the body to text. The first call drains the underlying stream;
    /// subsequent calls return the buffered text.
    fn text(&mut self) -> Result<&str, TransportError>;
}

impl RawResponse for HttpResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    fn text(&mut self) -> Result<&str, TransportError> {
        Ok(&self.body)
    }
}

/// Executes one `HttpRequest` per call.
///
/// Non-2xx statuses are data, not errors: an implementation must only return
/// `Err` when no response was obtained at all.
pub trait Transport {
    type Response: RawResponse;

    fn send(&self, request: HttpRequest) -> Result<Self::Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Response = T::Response;

    fn send(&self, request: HttpRequest) -> Result<Self::Response, TransportError> {
        (**self).send(request)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
