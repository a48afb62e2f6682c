//! Runner configuration for the Notes API suites.
//!
//! Values come from the process environment, after loading a `.env` file if
//! one exists. `from_lookup` takes any key lookup so the rules can be tested
//! without touching the real environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hosted practice service used when `BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://practice.expandtesting.com/notes/api";

/// Upper bound for one scenario attempt and for each request in it.
pub const SCENARIO_TIMEOUT: Duration = Duration::from_secs(30);

/// Report location relative to the workspace root.
pub const DEFAULT_REPORT_DIR: &str = "target/notes-report";

/// `DEFAULT_REPORT_DIR` anchored at the workspace root, so reports land in the
/// shared `target/` whatever directory the test binary runs from.
pub fn default_report_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .join(DEFAULT_REPORT_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    pub base_url: String,
    /// Whether the suites target `base_url` instead of the in-process mock.
    pub live: bool,
    pub retries: u32,
    pub timeout: Duration,
    pub report_dir: PathBuf,
}

impl SuiteConfig {
    pub fn from_env() -> Self {
        if let Err(err) = dotenv::dotenv() {
            tracing::trace!(error = %err, "no .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let configured_url = lookup("BASE_URL").filter(|url| !url.trim().is_empty());
        let live = configured_url.is_some() || lookup("NOTES_LIVE").is_some();
        let base_url = configured_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let retries = if lookup("CI").is_some() { 1 } else { 0 };
        let report_dir = lookup("NOTES_REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_report_dir);

        Self {
            base_url,
            live,
            retries,
            timeout: SCENARIO_TIMEOUT,
            report_dir,
        }
    }
}
