//! Behavior of the scenario runner itself.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use notes_core::{decode, LoginRequest, RawResponse};
use notes_suite::{scenario, scenario_with, ScenarioError, SuiteConfig};
use serde_json::Value;

fn offline_config(report_dir: &Path, retries: u32, timeout: Duration) -> SuiteConfig {
    SuiteConfig {
        retries,
        timeout,
        report_dir: report_dir.to_path_buf(),
        ..SuiteConfig::from_lookup(|_| None)
    }
}

fn failure_message(run: impl FnOnce()) -> String {
    let payload = panic::catch_unwind(AssertUnwindSafe(run)).unwrap_err();
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .unwrap_or_default(),
    }
}

#[test]
fn scenario_writes_report_index() {
    scenario("Report index smoke", |s| {
        let mut res = s.api().login(&LoginRequest {
            email: "nonexistent@example.com".to_string(),
            password: "somepassword".to_string(),
        })?;
        s.attach(&mut res, "login-nonexistent")?;
        assert_eq!(res.status(), 401);
        assert!(!decode::<Value, _>(&mut res)?.success);
        Ok(())
    });

    let dir = SuiteConfig::from_env()
        .report_dir
        .join("report-index-smoke");
    let index = std::fs::read_to_string(dir.join("index.html")).unwrap();
    assert!(index.contains("response-login-nonexistent (401)"));
    assert!(dir.join("01-response-login-nonexistent-401.json").exists());
}

#[test]
#[should_panic(expected = "failed after")]
fn failing_scenario_panics_with_reason() {
    scenario("Setup failure is reported", |_| {
        Err(ScenarioError::Setup("precondition missing".to_string()))
    });
}

#[test]
fn retry_reruns_a_failed_attempt() {
    let root = tempfile::tempdir().unwrap();
    let config = offline_config(root.path(), 1, Duration::from_secs(5));
    let calls = Arc::new(AtomicU32::new(0));

    let counter = Arc::clone(&calls);
    scenario_with(&config, "Flaky scenario", move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ScenarioError::Setup("first attempt fails".to_string()))
        } else {
            Ok(())
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(root.path().join("flaky-scenario").join("index.html").exists());
    assert!(root.path().join("flaky-scenario-retry1").join("index.html").exists());
}

#[test]
fn without_retries_a_failure_is_final() {
    let root = tempfile::tempdir().unwrap();
    let config = offline_config(root.path(), 0, Duration::from_secs(5));
    let calls = Arc::new(AtomicU32::new(0));

    let counter = Arc::clone(&calls);
    let message = failure_message(|| {
        scenario_with(&config, "Always failing", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ScenarioError::Setup("nope".to_string()))
        })
    });

    assert!(message.contains("failed after 1 attempt(s)"), "{message}");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!root.path().join("always-failing-retry1").exists());
}

#[test]
fn timed_out_attempt_finishes_before_the_runner_returns() {
    let root = tempfile::tempdir().unwrap();
    let config = offline_config(root.path(), 0, Duration::from_millis(100));
    let running = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&running);
    let message = failure_message(|| {
        scenario_with(&config, "Hung scenario", move |_| {
            flag.store(true, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(600));
            flag.store(false, Ordering::SeqCst);
            Ok(())
        })
    });

    assert!(message.contains("timed out after"), "{message}");
    assert!(!running.load(Ordering::SeqCst));

    let seen_running = Arc::new(AtomicBool::new(true));
    let seen = Arc::clone(&seen_running);
    let observed = Arc::clone(&running);
    scenario_with(&config, "Next scenario", move |_| {
        seen.store(observed.load(Ordering::SeqCst), Ordering::SeqCst);
        Ok(())
    });
    assert!(!seen_running.load(Ordering::SeqCst));
}
