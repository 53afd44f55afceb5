//! Integration tests module for REST Script
//!
//! Shared doubles and helpers for running whole scripts.

pub mod defaults_test;
pub mod live_call_test;
pub mod script_run_test;

use rest_script::executor::{CallExecutor, RequestError};
use rest_script::models::{HttpResponse, ScriptRequest};
use rest_script::Interpreter;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Records every request and answers from a queue of canned responses.
///
/// When the queue is empty it answers `200 OK` with an empty body.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    pub requests: Rc<RefCell<Vec<ScriptRequest>>>,
    pub responses: Rc<RefCell<VecDeque<HttpResponse>>>,
}

impl RecordingExecutor {
    /// Queues a JSON response.
    pub fn respond_json(&self, status_code: u16, body: &str) {
        let mut response = HttpResponse::new(status_code, "OK".to_string());
        response.add_header("Content-Type".to_string(), "application/json".to_string());
        response.set_body(body.as_bytes().to_vec());
        self.responses.borrow_mut().push_back(response);
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl CallExecutor for RecordingExecutor {
    fn execute(&mut self, request: &ScriptRequest) -> Result<HttpResponse, RequestError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(200, "OK".to_string())))
    }
}

/// Output sink whose content stays readable after being handed to the interpreter.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl io::Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Interpreter wired to a recording executor and a shared output buffer.
pub fn recording_interpreter() -> (Interpreter, RecordingExecutor, SharedOutput) {
    init_test_env();
    let executor = RecordingExecutor::default();
    let output = SharedOutput::default();
    let interpreter = Interpreter::new(Box::new(executor.clone()), Box::new(output.clone()));
    (interpreter, executor, output)
}

/// Writes a file into a temporary directory.
pub fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}
