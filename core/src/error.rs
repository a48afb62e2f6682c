//! Error types for the Notes API client.
//!
//! # Design
//! The service's own failures (400, 401, 404, 409) are not errors here: they
//! come back as a status plus an `Envelope` and are asserted by the caller.
//! `ApiError` only covers what goes wrong locally, before a response exists
//! or while turning its body into an envelope.

use std::error::Error as StdError;

use thiserror::Error;

/// No response was obtained, or its body could not be read.
#[derive(Debug, Error)]
#[error("transport failed: {source}")]
pub struct TransportError {
    source: Box<dyn StdError + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Errors returned by endpoint functions and response helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be form-encoded.
    #[error("form encoding failed: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a JSON envelope.
    #[error("response body is not a valid envelope: {0}")]
    Decode(#[from] serde_json::Error),
}
