//! One function per Notes API operation.
//!
//! # Design
//! Each operation comes in two halves. `*_request` is a pure builder that
//! produces the `HttpRequest` (method, URL, headers, form body). The operation
//! itself sends that request through the given `Transport` exactly once and
//! returns the response unopened. Nothing here inspects a response, retries,
//! or validates input: a missing token or a malformed note id goes out as-is
//! and the service answers for it.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::types::{
    ChangePasswordRequest, CreateNoteRequest, LoginRequest, RegisterRequest, UpdateNoteRequest,
};

/// Header carrying the bearer token on authenticated endpoints.
pub const AUTH_HEADER: &str = "x-auth-token";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Headers sent on every request.
pub fn base_headers() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

/// Base headers, plus `x-auth-token` when a non-empty token is supplied.
pub fn auth_headers(token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = base_headers();
    if let Some(token) = token.filter(|token| !token.is_empty()) {
        headers.push((AUTH_HEADER.to_string(), token.to_string()));
    }
    headers
}

fn form_request<B: Serialize>(
    method: HttpMethod,
    url: String,
    body: &B,
    token: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    let body = serde_urlencoded::to_string(body)?;
    let mut headers = auth_headers(token);
    headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
    Ok(HttpRequest {
        method,
        url,
        headers,
        body: Some(body),
    })
}

fn dispatch<T: Transport>(transport: &T, request: HttpRequest) -> Result<T::Response, ApiError> {
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        authenticated = request.header(AUTH_HEADER).is_some(),
        "sending notes api request"
    );
    let response = transport.send(request)?;
    Ok(response)
}

pub fn register_request(base_url: &str, body: &RegisterRequest) -> Result<HttpRequest, ApiError> {
    form_request(HttpMethod::Post, format!("{base_url}/users/register"), body, None)
}

pub fn login_request(base_url: &str, body: &LoginRequest) -> Result<HttpRequest, ApiError> {
    form_request(HttpMethod::Post, format!("{base_url}/users/login"), body, None)
}

pub fn change_password_request(
    base_url: &str,
    body: &ChangePasswordRequest,
    token: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    form_request(
        HttpMethod::Post,
        format!("{base_url}/users/change-password"),
        body,
        token,
    )
}

pub fn create_note_request(
    base_url: &str,
    body: &CreateNoteRequest,
    token: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    form_request(HttpMethod::Post, format!("{base_url}/notes"), body, token)
}

pub fn update_note_request(
    base_url: &str,
    note_id: &str,
    body: &UpdateNoteRequest,
    token: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    form_request(
        HttpMethod::Put,
        format!("{base_url}/notes/{note_id}"),
        body,
        token,
    )
}

pub fn delete_note_request(base_url: &str, note_id: &str, token: Option<&str>) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Delete,
        url: format!("{base_url}/notes/{note_id}"),
        headers: auth_headers(token),
        body: None,
    }
}

/// `POST /users/register`
pub fn register<T: Transport>(
    transport: &T,
    base_url: &str,
    body: &RegisterRequest,
) -> Result<T::Response, ApiError> {
    dispatch(transport, register_request(base_url, body)?)
}

/// `POST /users/login`
pub fn login<T: Transport>(
    transport: &T,
    base_url: &str,
    body: &LoginRequest,
) -> Result<T::Response, ApiError> {
    dispatch(transport, login_request(base_url, body)?)
}

/// `POST /users/change-password` (requires x-auth-token)
pub fn change_password<T: Transport>(
    transport: &T,
    base_url: &str,
    body: &ChangePasswordRequest,
    token: Option<&str>,
) -> Result<T::Response, ApiError> {
    dispatch(transport, change_password_request(base_url, body, token)?)
}

/// `POST /notes` (requires x-auth-token)
pub fn create_note<T: Transport>(
    transport: &T,
    base_url: &str,
    body: &CreateNoteRequest,
    token: Option<&str>,
) -> Result<T::Response, ApiError> {
    dispatch(transport, create_note_request(base_url, body, token)?)
}

/// `PUT /notes/{id}` (requires x-auth-token)
pub fn update_note<T: Transport>(
    transport: &T,
    base_url: &str,
    note_id: &str,
    body: &UpdateNoteRequest,
    token: Option<&str>,
) -> Result<T::Response, ApiError> {
    dispatch(transport, update_note_request(base_url, note_id, body, token)?)
}

/// `DELETE /notes/{id}` (requires x-auth-token)
pub fn delete_note<T: Transport>(
    transport: &T,
    base_url: &str,
    note_id: &str,
    token: Option<&str>,
) -> Result<T::Response, ApiError> {
    dispatch(transport, delete_note_request(base_url, note_id, token))
}
