//! Facade over the endpoint functions.
//!
//! # Design
//! `NotesApi` holds a transport and a base URL and nothing else. Every method
//! forwards to the matching function in `endpoints`, so tests get one
//! injection point instead of wiring the transport into each call. The
//! transport's own lifecycle stays with whoever constructed it; pass `&T` to
//! share one transport between several facades.

use crate::endpoints;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{
    ChangePasswordRequest, CreateNoteRequest, LoginRequest, RegisterRequest, UpdateNoteRequest,
};

/// Typed client for the Notes API.
#[derive(Debug, Clone)]
pub struct NotesApi<T> {
    transport: T,
    base_url: String,
}

impl<T: Transport> NotesApi<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn register(&self, body: &RegisterRequest) -> Result<T::Response, ApiError> {
        endpoints::register(&self.transport, &self.base_url, body)
    }

    pub fn login(&self, body: &LoginRequest) -> Result<T::Response, ApiError> {
        endpoints::login(&self.transport, &self.base_url, body)
    }

    pub fn change_password(
        &self,
        body: &ChangePasswordRequest,
        token: Option<&str>,
    ) -> Result<T::Response, ApiError> {
        endpoints::change_password(&self.transport, &self.base_url, body, token)
    }

    pub fn create_note(
        &self,
        body: &CreateNoteRequest,
        token: Option<&str>,
    ) -> Result<T::Response, ApiError> {
        endpoints::create_note(&self.transport, &self.base_url, body, token)
    }

    pub fn update_note(
        &self,
        note_id: &str,
        body: &UpdateNoteRequest,
        token: Option<&str>,
    ) -> Result<T::Response, ApiError> {
        endpoints::update_note(&self.transport, &self.base_url, note_id, body, token)
    }

    pub fn delete_note(&self, note_id: &str, token: Option<&str>) -> Result<T::Response, ApiError> {
        endpoints::delete_note(&self.transport, &self.base_url, note_id, token)
    }
}
