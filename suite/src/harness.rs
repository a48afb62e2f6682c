//! Scenario runner for the Notes API suites.
//!
//! # Design
//! `cargo test` runs tests on several threads; the suites instead behave like
//! a single worker. Every `scenario` call takes one process-wide lock, so
//! scenarios execute strictly one after another and report in a stable order.
//! Each attempt runs on its own thread so that an attempt exceeding the
//! configured timeout is reported as a failure on time. The serial slot stays
//! taken until that thread has actually finished, so a hung attempt never
//! overlaps the retry or the next scenario. Retries
//! (one under CI, none otherwise) repeat the whole scenario with a fresh
//! facade and a fresh report directory; the client itself never retries.
//!
//! When no live target is configured, the in-process mock service is started
//! once per test binary on a random port.

use std::any::Any;
use std::net::TcpListener;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, Once, OnceLock, PoisonError};
use std::thread;

use notes_core::test_data::{random_email, random_password, random_string, DEFAULT_PASSWORD_LEN};
use notes_core::{
    attach_to_report, decode, ApiError, CreateNoteRequest, LoginData, LoginRequest, NoteData,
    NotesApi, RawResponse, RegisterRequest,
};
use notes_transport::UreqTransport;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::SuiteConfig;
use crate::report::FileReport;

static SERIAL: Mutex<()> = Mutex::new(());
static MOCK_BASE_URL: OnceLock<Result<String, String>> = OnceLock::new();

/// Why a scenario attempt did not pass, other than a failed assertion.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A precondition (registration, login, note creation) did not hold.
    #[error("scenario setup failed: {0}")]
    Setup(String),
}

/// A registered user with a live session.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Per-attempt context handed to a scenario body.
pub struct Scenario {
    name: String,
    api: NotesApi<UreqTransport>,
    report: FileReport,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api(&self) -> &NotesApi<UreqTransport> {
        &self.api
    }

    pub fn report(&self) -> &FileReport {
        &self.report
    }

    /// Attach the response body and status to this scenario's report.
    pub fn attach<R: RawResponse>(&mut self, response: &mut R, label: &str) -> Result<(), ApiError> {
        attach_to_report(&mut self.report, response, label)
    }

    /// Register a fresh user whose email starts with `prefix`, then log in.
    pub fn register_user(&mut self, prefix: &str) -> Result<Account, ScenarioError> {
        let name = random_string("User");
        let email = random_email(prefix);
        let password = random_password(DEFAULT_PASSWORD_LEN);

        let mut res = self.api.register(&RegisterRequest {
            name: name.clone(),
            email: email.clone(),
            password: password.clone(),
        })?;
        self.attach(&mut res, "setup-register")?;
        if res.status() != 201 {
            return Err(ScenarioError::Setup(format!(
                "registering {email} returned {}",
                res.status()
            )));
        }

        let mut res = self.api.login(&LoginRequest {
            email: email.clone(),
            password: password.clone(),
        })?;
        self.attach(&mut res, "setup-login")?;
        let token = decode::<LoginData, _>(&mut res)?
            .data
            .map(|data| data.token)
            .ok_or_else(|| {
                ScenarioError::Setup(format!("login for {email} returned no token"))
            })?;

        Ok(Account {
            name,
            email,
            password,
            token,
        })
    }

    /// Create a valid note owned by `token`'s user.
    pub fn create_note(&mut self, token: &str) -> Result<NoteData, ScenarioError> {
        let mut res = self.api.create_note(
            &CreateNoteRequest {
                title: "Valid Title Here".to_string(),
                description: "Valid description here".to_string(),
                category: "Home".to_string(),
            },
            Some(token),
        )?;
        self.attach(&mut res, "setup-create-note")?;
        decode::<NoteData, _>(&mut res)?
            .data
            .ok_or_else(|| ScenarioError::Setup(format!("note creation returned {}", res.status())))
    }
}

/// Build the facade for one scenario attempt.
pub fn notes_api(config: &SuiteConfig, base_url: &str) -> NotesApi<UreqTransport> {
    NotesApi::new(UreqTransport::new(config.timeout), base_url)
}

enum Outcome {
    Passed,
    Failed(String),
}

/// Run `body` as a named scenario, panicking if every attempt fails.
pub fn scenario<F>(name: &str, body: F)
where
    F: Fn(&mut Scenario) -> Result<(), ScenarioError> + Send + Sync + 'static,
{
    scenario_with(&SuiteConfig::from_env(), name, body);
}

/// `scenario` with an explicit configuration instead of the environment.
pub fn scenario_with<F>(config: &SuiteConfig, name: &str, body: F)
where
    F: Fn(&mut Scenario) -> Result<(), ScenarioError> + Send + Sync + 'static,
{
    init_tracing();
    let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);

    let base_url = match target_base_url(config) {
        Ok(url) => url,
        Err(err) => panic!("scenario `{name}` could not start: {err}"),
    };

    let body = Arc::new(body);
    let attempts = config.retries + 1;
    let mut last_failure = String::new();
    for attempt in 1..=attempts {
        let report_name = if attempt == 1 {
            name.to_string()
        } else {
            format!("{name} retry{}", attempt - 1)
        };
        match run_attempt(config, &base_url, &report_name, Arc::clone(&body)) {
            Outcome::Passed => {
                tracing::info!(scenario = name, attempt, "scenario passed");
                return;
            }
            Outcome::Failed(reason) => {
                tracing::warn!(scenario = name, attempt, %reason, "scenario attempt failed");
                last_failure = reason;
            }
        }
    }
    panic!("scenario `{name}` failed after {attempts} attempt(s): {last_failure}");
}

fn run_attempt<F>(config: &SuiteConfig, base_url: &str, name: &str, body: Arc<F>) -> Outcome
where
    F: Fn(&mut Scenario) -> Result<(), ScenarioError> + Send + Sync + 'static,
{
    let report = match FileReport::create(&config.report_dir, name) {
        Ok(report) => report,
        Err(err) => return Outcome::Failed(err.to_string()),
    };
    let mut scenario = Scenario {
        name: name.to_string(),
        api: notes_api(config, base_url),
        report,
    };

    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name(format!("scenario: {name}"))
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| (*body)(&mut scenario)));
            if let Err(err) = scenario.report.write_index() {
                tracing::warn!(error = %err, "failed to write report index");
            }
            let outcome = match result {
                Ok(Ok(())) => Outcome::Passed,
                Ok(Err(err)) => Outcome::Failed(err.to_string()),
                Err(payload) => Outcome::Failed(panic_message(payload.as_ref())),
            };
            let _ = tx.send(outcome);
        });
    let handle = match spawned {
        Ok(handle) => handle,
        Err(err) => return Outcome::Failed(format!("could not spawn scenario thread: {err}")),
    };

    let outcome = match rx.recv_timeout(config.timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(
                scenario = name,
                timeout = ?config.timeout,
                "scenario attempt timed out, waiting for it to stop"
            );
            Outcome::Failed(format!("timed out after {:?}", config.timeout))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Outcome::Failed("scenario thread exited without reporting".to_string())
        }
    };
    // Requests carry the same timeout, so a stuck attempt unblocks on its own.
    if handle.join().is_err() {
        tracing::warn!(scenario = name, "scenario thread panicked outside the body");
    }
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scenario panicked".to_string()
    }
}

fn target_base_url(config: &SuiteConfig) -> Result<String, String> {
    if config.live {
        return Ok(config.base_url.clone());
    }
    MOCK_BASE_URL
        .get_or_init(|| spawn_mock().map_err(|err| format!("mock notes service: {err}")))
        .clone()
}

fn spawn_mock() -> std::io::Result<String> {
    let std_listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    thread::Builder::new()
        .name("notes-mock".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    tracing::error!(error = %err, "failed to build mock runtime");
                    return;
                }
            };
            let served = rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener)?;
                mock_server::run(listener).await
            });
            if let Err(err) = served {
                tracing::error!(error = %err, "mock notes service stopped");
            }
        })?;

    let base_url = format!("http://{addr}{}", mock_server::API_PREFIX);
    tracing::info!(%base_url, "started mock notes service");
    Ok(base_url)
}

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("notes_suite=info,notes_core=debug,notes_transport=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
