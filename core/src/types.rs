//! Request bodies and response payloads of the Notes API.
//!
//! # Design
//! Request bodies serialize to form fields with the service's field names
//! (`currentPassword`, `newPassword`). No field is validated locally: the
//! service owns the rules and the negative suites depend on being able to
//! send out-of-range values. These types are defined independently from the
//! mock-server crate; the integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Categories the service accepts for a note.
pub const NOTE_CATEGORIES: [&str; 3] = ["Home", "Work", "Personal"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub title: String,
    pub description: String,
    pub category: String,
}

/// Full replacement of a note. `completed` travels as the literal string
/// `"true"` or `"false"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: String,
}

/// The `{ success, message, status, data }` wrapper every endpoint returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The message, or an empty string when the service sent none.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

/// Payload of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserData {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload of a successful login. `token` is opaque and passed through as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
