//! File-backed report: one directory per scenario, one file per attachment,
//! and an `index.html` linking them.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use notes_core::{Attachment, ReportSink};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    file_name: String,
    content_type: String,
}

/// Persists attachments for one scenario under `<root>/<scenario-slug>/`.
#[derive(Debug)]
pub struct FileReport {
    title: String,
    dir: PathBuf,
    entries: Vec<Entry>,
}

impl FileReport {
    /// Start an empty report for `scenario`, discarding any earlier run's files.
    pub fn create(root: &Path, scenario: &str) -> Result<Self, ReportError> {
        let dir = root.join(slug(scenario));
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(ReportError::Io { path: dir, source }),
        }
        fs::create_dir_all(&dir).map_err(|source| ReportError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            title: scenario.to_string(),
            dir,
            entries: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the attachments written so far, in order.
    pub fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    fn write(&self, attachment: &Attachment) -> Result<Entry, ReportError> {
        let extension = if attachment.content_type.contains("json") {
            "json"
        } else {
            "txt"
        };
        let file_name = format!(
            "{:02}-{}.{extension}",
            self.entries.len() + 1,
            slug(&attachment.name)
        );
        let path = self.dir.join(&file_name);
        fs::write(&path, &attachment.body).map_err(|source| ReportError::Io { path, source })?;
        Ok(Entry {
            name: attachment.name.clone(),
            file_name,
            content_type: attachment.content_type.clone(),
        })
    }

    /// Render `index.html` for the attachments written so far.
    pub fn write_index(&self) -> Result<PathBuf, ReportError> {
        let mut html = String::new();
        let title = escape_html(&self.title);
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<ul>\n"
        );
        for entry in &self.entries {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a> <small>{}</small></li>",
                escape_html(&entry.file_name),
                escape_html(&entry.name),
                escape_html(&entry.content_type),
            );
        }
        html.push_str("</ul>\n</body>\n</html>\n");

        let path = self.dir.join("index.html");
        fs::write(&path, html).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl ReportSink for FileReport {
    fn attach(&mut self, attachment: Attachment) {
        match self.write(&attachment) {
            Ok(entry) => self.entries.push(entry),
            Err(err) => tracing::warn!(error = %err, attachment = %attachment.name, "dropping report attachment"),
        }
    }
}

/// Lowercase ASCII alphanumerics, everything else collapsed to single `-`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("unnamed");
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
