#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use kube_wizard::config::Config;
use kube_wizard::kubectl::{CommandRunner, Kubectl, RawOutput};
use kube_wizard::tasks::TaskRunner;
use kube_wizard::saved_outputs::SavedOutputs;
use tempfile::TempDir;

/// Build a Config rooted in the temp dir.
pub fn test_config(tmp: &TempDir) -> Config {
    Config::new(tmp.path().join(".kube-wizard"))
}

/// Scripted stand-in for the kubectl process.
///
/// Responses are keyed by the full command line (`program arg1 arg2 ...`).
/// Unscripted calls fail like a missing binary would.
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<HashMap<String, RawOutput>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a resolvable context named `test-ctx`.
    pub fn with_context() -> Self {
        Self::new().respond("kubectl config current-context", "test-ctx\n")
    }

    pub fn respond(self, line: &str, stdout: &str) -> Self {
        self.script(line, stdout, "", true)
    }

    pub fn fail(self, line: &str, stderr: &str) -> Self {
        self.script(line, "", stderr, false)
    }

    pub fn script(self, line: &str, stdout: &str, stderr: &str, success: bool) -> Self {
        self.responses.lock().unwrap().insert(
            line.to_string(),
            RawOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                success,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, line: &str) -> bool {
        self.calls().iter().any(|c| c == line)
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&line)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("unscripted: {}", line)))
    }
}

pub fn fake_kubectl(runner: &Arc<FakeRunner>) -> Kubectl {
    Kubectl::with_runner("kubectl", Arc::clone(runner) as Arc<dyn CommandRunner>)
}

/// Task runner with only the saved-output store; other stores are attached
/// by the caller.
pub fn bare_runner(tmp: &TempDir, runner: &Arc<FakeRunner>) -> TaskRunner {
    TaskRunner::new(
        fake_kubectl(runner),
        SavedOutputs::new(tmp.path().join("saved_cmd")),
    )
}
