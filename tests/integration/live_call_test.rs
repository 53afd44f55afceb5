//! Scripts running against a local mock server through the reqwest executor.

use super::{init_test_env, SharedOutput};
use httpmock::prelude::*;
use rest_script::executor::{ExecutionConfig, ReqwestExecutor};
use rest_script::Interpreter;

fn live_interpreter() -> (Interpreter, SharedOutput) {
    init_test_env();
    let output = SharedOutput::default();
    let interpreter = Interpreter::new(
        Box::new(ReqwestExecutor::new(ExecutionConfig::new(5))),
        Box::new(output.clone()),
    );
    (interpreter, output)
}

#[test]
fn test_get_with_headers_and_response_display() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/status")
            .query_param("verbose", "1")
            .header("Accept", "application/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .header("X-Upstream-Error", "none")
            .body(r#"{"state":"green"}"#);
    });

    let (mut interpreter, output) = live_interpreter();
    let script = format!(
        "set baseurl {}/api\nheader Accept: application/json\nget /status?verbose=1\n\nrequire ${{response:state}} green\n",
        server.base_url()
    );
    interpreter.run_script("status.rest", &script).unwrap();

    mock.assert();
    let text = output.text();
    assert!(text.contains("Status: 200 OK"));
    assert!(text.contains("<-- attention"));
    assert!(text.contains("\"state\": \"green\""));
    assert!(text.contains("Require passed"));
}

#[test]
fn test_post_body_and_chained_token() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/login")
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"user": "ann", "password": "pw"}));
        then.status(201)
            .header("Content-Type", "application/json")
            .body(r#"{"token": "tok-42", "user": {"id": "u7"}}"#);
    });
    let profile = server.mock(|when, then| {
        when.method("PATCH")
            .path("/users/u7")
            .header("Authorization", "Bearer tok-42")
            .body("nickname=annie");
        then.status(204);
    });

    let (mut interpreter, output) = live_interpreter();
    let script = format!(
        r#"set baseurl {}
header Content-Type: application/json
post /login
{{"user": "ann", "password": "pw"}}

map token ${{response:token}}
map id ${{response:user/id}}
header Content-Type:
header Authorization: Bearer ${{token}}
patch /users/${{id}} nickname=annie
"#,
        server.base_url()
    );
    interpreter.run_script("chain.rest", &script).unwrap();

    login.assert();
    profile.assert();
    assert_eq!(interpreter.context().resolver.get("token"), Some("tok-42"));
    assert!(output.text().contains("Body is empty."));
}

#[test]
fn test_failed_status_does_not_stop_script() {
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(DELETE).path("/items/9");
        then.status(404);
    });

    let (mut interpreter, output) = live_interpreter();
    let script = format!(
        "set baseurl {}\ndelete /items/9\n\necho after\n",
        server.base_url()
    );
    interpreter.run_script("delete.rest", &script).unwrap();

    missing.assert();
    let text = output.text();
    assert!(text.contains("Status: 404"));
    assert!(text.contains("after"));
}

#[test]
fn test_unreachable_host_is_fatal() {
    let (mut interpreter, _) = live_interpreter();
    let fatal = interpreter
        .run_script("down.rest", "set baseurl http://127.0.0.1:9\nget /never")
        .unwrap_err();
    assert_eq!(fatal.line, 2);
    assert_eq!(fatal.command, "get /never");
}
