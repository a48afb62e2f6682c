//! Typed client core for the Notes REST API.
//!
//! # Overview
//! Request builders and endpoint functions for the six Notes operations,
//! composed into the `NotesApi` facade, plus the helpers the test suites use
//! on every response: envelope decoding, report attachments and random test
//! data.
//!
//! # Design
//! - The network call goes through the `Transport` trait; this crate performs
//!   no I/O of its own. `notes-transport` provides the ureq implementation.
//! - Responses come back unopened. Status first, body on demand.
//! - The service's 4xx answers are data. `ApiError` is reserved for local
//!   failures: encoding, transport, and non-JSON bodies.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod report;
pub mod response;
pub mod test_data;
pub mod types;

pub use client::NotesApi;
pub use endpoints::{auth_headers, AUTH_HEADER};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RawResponse, Transport};
pub use report::{attach_to_report, Attachment, MemoryReport, ReportSink};
pub use response::decode;
pub use types::{
    ChangePasswordRequest, CreateNoteRequest, Envelope, LoginData, LoginRequest, NoteData,
    RegisterRequest, UpdateNoteRequest, UserData, NOTE_CATEGORIES,
};
