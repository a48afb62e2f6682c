//! Capturing request outcomes as named report artifacts.
//!
//! # Design
//! A `ReportSink` receives `Attachment`s and decides where they live. The
//! helpers here only read from the response; whatever the sink does with the
//! artifact never feeds back into the caller's control flow.

use crate::error::ApiError;
use crate::http::RawResponse;

/// A named artifact saved alongside a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub body: String,
}

/// Destination for report attachments.
pub trait ReportSink {
    /// Store `attachment`. Failures are the sink's to log; they are never
    /// returned to the test.
    fn attach(&mut self, attachment: Attachment);
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn attach(&mut self, attachment: Attachment) {
        (**self).attach(attachment);
    }
}

/// Keeps attachments in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MemoryReport {
    attachments: Vec<Attachment>,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

impl ReportSink for MemoryReport {
    fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }
}

/// Record the body and status of `response` under `response-{label} ({status})`.
///
/// Reading the body here buffers it, so the caller can still decode the same
/// response afterwards. Only a failure to read the body is returned.
pub fn attach_to_report<S, R>(sink: &mut S, response: &mut R, label: &str) -> Result<(), ApiError>
where
    S: ReportSink + ?Sized,
    R: RawResponse + ?Sized,
{
    let status = response.status();
    let body = response.text()?.to_string();
    sink.attach(Attachment {
        name: format!("response-{label} ({status})"),
        content_type: "application/json".to_string(),
        body,
    });
    Ok(())
}
