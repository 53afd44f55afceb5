//! Default-settings file picked up through the environment.

use super::{recording_interpreter, write_temp_file};
use rest_script::config::{load_env_defaults, DEFAULTS_ENV_VAR};
use rest_script::resolver::ResolutionMode;
use serial_test::serial;
use std::env;
use tempfile::TempDir;

struct EnvGuard;

impl EnvGuard {
    fn set(value: &str) -> Self {
        env::set_var(DEFAULTS_ENV_VAR, value);
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(DEFAULTS_ENV_VAR);
    }
}

#[test]
#[serial]
fn test_defaults_seed_context() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(
        &dir,
        "defaults.json",
        r#"{
            "Base.URL": "https://staging.example.com/api",
            "print.response.headers": "nope",
            "strict.resolution": "sure",
            "timeout": "12",
            "color": "yes",
            "header:X-Team": "payments",
            "HEADER:Accept": "application/json"
        }"#,
    );
    let _guard = EnvGuard::set(&file.display().to_string());

    let (mut interpreter, executor, _) = recording_interpreter();
    let defaults = interpreter.apply_env_defaults().unwrap();

    assert_eq!(defaults.timeout, Some(12));
    assert_eq!(defaults.unknown_keys(), vec!["color"]);

    let ctx = interpreter.context();
    assert_eq!(ctx.base_url, "https://staging.example.com/api");
    assert!(!ctx.dials.print_response_headers);
    assert_eq!(ctx.resolver.mode(), ResolutionMode::Strict);
    assert_eq!(ctx.headers.get("X-Team").map(String::as_str), Some("payments"));
    assert_eq!(
        ctx.headers.get("Accept").map(String::as_str),
        Some("application/json")
    );

    interpreter.run_script("seeded.rest", "get /health\n").unwrap();
    let requests = executor.requests.borrow();
    assert_eq!(requests[0].url, "https://staging.example.com/api/health");
    assert!(requests[0].headers.contains_key("X-Team"));
}

#[test]
#[serial]
fn test_script_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(
        &dir,
        "defaults.json",
        r#"{"base.url": "http://one.test", "header:X-Trace": "on"}"#,
    );
    let _guard = EnvGuard::set(&file.display().to_string());

    let (mut interpreter, executor, _) = recording_interpreter();
    interpreter.apply_env_defaults();
    interpreter
        .run_script(
            "override.rest",
            "set baseurl http://two.test\nheader X-Trace:\nget /x\n",
        )
        .unwrap();

    let requests = executor.requests.borrow();
    assert_eq!(requests[0].url, "http://two.test/x");
    assert!(requests[0].headers.is_empty());
}

#[test]
#[serial]
fn test_malformed_defaults_are_ignored() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(&dir, "broken.json", "{ \"base.url\": ");
    let _guard = EnvGuard::set(&file.display().to_string());

    let (mut interpreter, _, _) = recording_interpreter();
    assert!(interpreter.apply_env_defaults().is_none());
    assert_eq!(interpreter.context().base_url, "http://localhost");
}

#[test]
#[serial]
fn test_missing_defaults_file_is_ignored() {
    let _guard = EnvGuard::set("/no/such/dir/defaults.json");

    let (mut interpreter, _, _) = recording_interpreter();
    assert!(interpreter.apply_env_defaults().is_none());
    interpreter.run_script("plain.rest", "map a 1").unwrap();
}

#[test]
#[serial]
fn test_invalid_timeout_is_ignored() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(&dir, "zero.json", r#"{"timeout": 0}"#);
    let _guard = EnvGuard::set(&file.display().to_string());

    let (mut interpreter, _, _) = recording_interpreter();
    assert!(interpreter.apply_env_defaults().is_none());
}

#[test]
#[serial]
fn test_unset_variable_means_no_defaults() {
    env::remove_var(DEFAULTS_ENV_VAR);

    let (mut interpreter, _, _) = recording_interpreter();
    assert!(interpreter.apply_env_defaults().is_none());
}

#[test]
#[serial]
fn test_defaults_load_without_interpreter() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(&dir, "timeout.json", r#"{"timeout": "45", "color": "no"}"#);
    let _guard = EnvGuard::set(&file.display().to_string());

    let defaults = load_env_defaults().unwrap();
    assert_eq!(defaults.timeout, Some(45));
    assert_eq!(defaults.unknown_keys(), vec!["color"]);
}

#[test]
#[serial]
fn test_defaults_can_start_offline() {
    let dir = TempDir::new().unwrap();
    let file = write_temp_file(
        &dir,
        "offline.json",
        r#"{"generate.curl.commands": "yeah", "base.url": "https://api.example.com"}"#,
    );
    let _guard = EnvGuard::set(&file.display().to_string());

    let (mut interpreter, executor, output) = recording_interpreter();
    interpreter.apply_env_defaults().unwrap();
    interpreter
        .run_script("offline.rest", "echo hidden\ndelete /items/3\n")
        .unwrap();

    assert_eq!(executor.call_count(), 0);
    let text = output.text();
    assert!(text.starts_with("# generating curl commands from offline.rest\n"));
    assert!(text.contains("# DELETE https://api.example.com/items/3"));
    assert!(!text.contains("hidden"));
}
