//! Whole-script runs against a recording executor.

use super::{recording_interpreter, write_temp_file};
use rest_script::models::HttpMethod;
use rest_script::ScriptError;
use tempfile::TempDir;

#[test]
fn test_set_map_echo_script_makes_no_calls() {
    let (mut interpreter, executor, output) = recording_interpreter();

    let script = r#"#!/usr/bin/env rest-script
# configuration only
set baseurl https://api.example.com
set echo.map no
map user alice
map greeting hello ${user}
echo ${greeting}
"#;

    interpreter.run_script("config.rest", script).unwrap();

    assert_eq!(executor.call_count(), 0);
    let text = output.text();
    assert!(text.contains("hello alice"));
    assert!(!text.contains("MAP command"));
    assert!(text.contains("SET command: baseurl https://api.example.com"));
}

#[test]
fn test_post_body_terminated_by_blank_line() {
    let (mut interpreter, executor, _) = recording_interpreter();

    let script = "POST /x\n{\"a\": 1}\n\necho done\n";
    interpreter.run_script("post.rest", script).unwrap();

    let requests = executor.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::POST);
    assert_eq!(requests[0].url, "http://localhost/x");
    assert_eq!(requests[0].body.as_deref(), Some("{\"a\": 1}"));
}

#[test]
fn test_response_values_chain_into_later_calls() {
    let (mut interpreter, executor, output) = recording_interpreter();
    executor.respond_json(
        200,
        r#"{"token": "t-123", "items": [
            {"state": "open", "created": "2024-01-02", "id": "b"},
            {"state": "closed", "created": "2024-03-01", "id": "c"},
            {"state": "open", "created": "2024-02-01", "id": "d"}
        ]}"#,
    );

    let script = r#"
set baseurl http://service.test/api
post /login {"user": "me"}

map token ${response:token}
map newest ${response:items/state=open;created:latest/id}
header Authorization: Bearer ${token}
get /items/${newest}

require ${newest} d
"#;

    interpreter.run_script("chain.rest", script).unwrap();

    let requests = executor.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "http://service.test/api/login");
    assert_eq!(requests[0].body.as_deref(), Some(r#"{"user": "me"}"#));
    assert_eq!(requests[1].method, HttpMethod::GET);
    assert_eq!(requests[1].url, "http://service.test/api/items/d");
    assert_eq!(
        requests[1].headers.get("Authorization").map(String::as_str),
        Some("Bearer t-123")
    );
    assert!(output.text().contains("Require passed"));
}

#[test]
fn test_header_removal_between_calls() {
    let (mut interpreter, executor, _) = recording_interpreter();

    let script = "header X-Debug: on\nget /one\n\nheader X-Debug:\nget /two\n";
    interpreter.run_script("headers.rest", script).unwrap();

    let requests = executor.requests.borrow();
    assert!(requests[0].headers.contains_key("X-Debug"));
    assert!(!requests[1].headers.contains_key("X-Debug"));
}

#[test]
fn test_fatal_error_carries_location() {
    let (mut interpreter, executor, _) = recording_interpreter();
    executor.respond_json(200, r#"{"name": "plain"}"#);

    let script = "get /thing\n\n# probe too deep\nmap x ${response:name/first}\nget /never\n";
    let fatal = interpreter.run_script("deep.rest", script).unwrap_err();

    assert!(matches!(fatal.error, ScriptError::Resolve(_)));
    assert_eq!(fatal.file, "deep.rest");
    assert_eq!(fatal.line, 4);
    assert_eq!(fatal.command, "map x ${response:name/first}");
    assert_eq!(executor.call_count(), 1);
}

#[test]
fn test_multiple_selectors_are_fatal() {
    let (mut interpreter, executor, _) = recording_interpreter();
    executor.respond_json(200, r#"{"items": [{"a": "1"}]}"#);

    let fatal = interpreter
        .run_script("sel.rest", "get /\n\necho ${response:items/a:first;a:last/a}")
        .unwrap_err();
    assert!(fatal.to_string().contains("more than one selector"));
}

#[test]
fn test_unresolved_placeholder_is_empty_by_default() {
    let (mut interpreter, _, output) = recording_interpreter();
    interpreter
        .run_script("tolerant.rest", "echo [${nothing.here}]")
        .unwrap();
    assert!(output.text().contains("[]"));
}

#[test]
fn test_offline_mode_prints_curl_script() {
    let (mut interpreter, executor, output) = recording_interpreter();
    interpreter.enable_offline_mode();

    let script = r#"set baseurl https://api.example.com
header Accept: application/json
echo not shown
section not shown either
put /users/7
{"name": "x"}
"#;
    interpreter.run_script("offline.rest", script).unwrap();

    assert_eq!(executor.call_count(), 0);
    let text = output.text();
    assert!(text.starts_with("# generating curl commands from offline.rest\n"));
    assert!(text.contains("# PUT https://api.example.com/users/7\ncurl \\\n  -i \\\n  --request PUT"));
    assert!(text.contains("--header 'Accept: application/json'"));
    assert!(text.contains(r#"--data '{"name": "x"}'"#));
    assert!(!text.contains("not shown"));
    assert!(!text.contains("HEADER command"));
}

#[test]
fn test_set_can_switch_offline_mode_mid_script() {
    let (mut interpreter, executor, output) = recording_interpreter();
    let script = "get /live\n\nset generate.curl.commands yes\nget /rendered\n";
    interpreter.run_script("switch.rest", script).unwrap();

    assert_eq!(executor.call_count(), 1);
    assert!(output.text().contains("# GET http://localhost/rendered"));
}

#[test]
fn test_run_file_binds_script_names() {
    let dir = TempDir::new().unwrap();
    let path = write_temp_file(&dir, "names.rest", "echo ${script}|${script.full}\n");

    let (mut interpreter, _, output) = recording_interpreter();
    interpreter.run_file(&path).unwrap();

    let text = output.text();
    let expected_name = path.display().to_string();
    assert!(text.contains(&format!("{}|", expected_name)));
    assert_eq!(
        interpreter.context().resolver.get("script"),
        Some(expected_name.as_str())
    );
    assert!(interpreter.context().resolver.get("script.full").is_some());
}

#[test]
fn test_load_command_from_json_file() {
    let dir = TempDir::new().unwrap();
    let data = write_temp_file(
        &dir,
        "accounts.json",
        r#"{"accounts": [
            {"role": "admin", "name": "root", "since": "2019-05-01"},
            {"role": "user", "name": "ann", "since": "2021-07-12"},
            {"role": "user", "name": "bob", "since": "2020-02-29"}
        ]}"#,
    );

    let (mut interpreter, _, output) = recording_interpreter();
    let script = format!(
        "load veteran {} json accounts/role=user;since:earliest/name\necho ${{veteran}}\n",
        data.display()
    );
    interpreter.run_script("load.rest", &script).unwrap();

    assert_eq!(interpreter.context().resolver.get("veteran"), Some("bob"));
    assert!(output.text().contains("bob\n"));
}

#[test]
fn test_require_failure_stops_script() {
    let (mut interpreter, executor, _) = recording_interpreter();
    let fatal = interpreter
        .run_script("req.rest", "map a 1\nrequire ${a} 2\nget /never")
        .unwrap_err();

    assert!(matches!(fatal.error, ScriptError::RequireFailed { .. }));
    assert_eq!(fatal.line, 2);
    assert_eq!(executor.call_count(), 0);
}

#[test]
fn test_increment_and_session_keys() {
    let (mut interpreter, _, output) = recording_interpreter();
    interpreter
        .run_script("keys.rest", "echo ${increment},${increment}\nrequire ${session}")
        .unwrap();
    assert!(output.text().contains("1,2\n"));
}
