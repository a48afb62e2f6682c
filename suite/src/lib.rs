//! Scenario harness, configuration and report output for the Notes API
//! suites under `tests/`.
//!
//! # Overview
//! A suite test wraps its steps in [`scenario`]. The harness resolves the
//! target (the hosted service when configured, otherwise an in-process mock),
//! builds a fresh `NotesApi` per attempt, serializes scenarios, enforces the
//! timeout, retries under CI, and writes each scenario's response attachments
//! plus an `index.html` under the report directory.

pub mod config;
pub mod harness;
pub mod report;

pub use config::{default_report_dir, SuiteConfig};
pub use harness::{notes_api, scenario, scenario_with, Account, Scenario, ScenarioError};
pub use report::{FileReport, ReportError};
