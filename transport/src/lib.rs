//! ureq-backed `Transport` for `notes-core`.
//!
//! # Design
//! The agent is configured with `http_status_as_error(false)` so 4xx and 5xx
//! answers come back as responses for the caller to assert on; only failures
//! to obtain a response at all become `TransportError`. A global per-call
//! timeout bounds each request. The body stays in the ureq stream until
//! `RawResponse::text` is called, then is buffered for repeat reads. A body
//! that fails to read stays failed: later calls return the same error rather
//! than whatever is left in the stream.

use std::time::Duration;

use notes_core::{HttpMethod, HttpRequest, RawResponse, Transport, TransportError};
use ureq::http::Response;
use ureq::{Agent, Body};

/// Blocking HTTP transport. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    type Response = UreqResponse;

    fn send(&self, request: HttpRequest) -> Result<UreqResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get | HttpMethod::Delete => {
                let mut builder = match method {
                    HttpMethod::Get => self.agent.get(&url),
                    _ => self.agent.delete(&url),
                };
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = match method {
                    HttpMethod::Post => self.agent.post(&url),
                    _ => self.agent.put(&url),
                };
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let response = result.map_err(|err| {
            tracing::warn!(%method, %url, error = %err, "notes api request failed");
            TransportError::new(err)
        })?;
        tracing::debug!(%method, %url, status = response.status().as_u16(), "notes api response");
        Ok(UreqResponse::from(response))
    }
}

/// A response whose body has not been read yet.
pub struct UreqResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: BodyState,
}

enum BodyState {
    Unread(Body),
    Read(String),
    Failed(String),
}

impl From<Response<Body>> for UreqResponse {
    fn from(response: Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        Self {
            status: parts.status.as_u16(),
            headers,
            body: BodyState::Unread(body),
        }
    }
}

impl RawResponse for UreqResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn text(&mut self) -> Result<&str, TransportError> {
        let read = match &mut self.body {
            BodyState::Unread(body) => Some(body.read_to_string()),
            _ => None,
        };
        match read {
            Some(Ok(text)) => self.body = BodyState::Read(text),
            Some(Err(err)) => {
                tracing::warn!(status = self.status, error = %err, "failed to read notes api response body");
                self.body = BodyState::Failed(err.to_string());
                return Err(TransportError::new(err));
            }
            None => {}
        }
        match &self.body {
            BodyState::Read(text) => Ok(text.as_str()),
            BodyState::Failed(reason) => Err(TransportError::new(format!(
                "response body already failed to read: {reason}"
            ))),
            BodyState::Unread(_) => Err(TransportError::new("response body was not read")),
        }
    }
}
