//! Thin wrapper around the kubectl binary.

use std::io;
use std::process::Command;
use std::sync::Arc;

use crate::cluster::{self, ClusterInfo};
use crate::command::TOOL;

/// Minimum client version the wizard is tested against.
pub const MIN_VERSION: (u32, u32) = (1, 21);

#[derive(Debug, thiserror::Error)]
pub enum KubectlError {
    #[error("no cluster context configured")]
    NoContext,
    #[error("invalid command")]
    InvalidCommand,
    #[error("failed to run kubectl: {0}")]
    Spawn(#[from] io::Error),
    #[error("kubectl error: {0}")]
    Tool(String),
    #[error("failed to parse kubectl output: {0}")]
    Parse(String),
}

/// Captured output of one process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Process execution seam so callers can be tested without a cluster.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawOutput>;
}

/// Runs real processes.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

/// Output of a user command, kept together with the command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Text for the output view. Stderr is shown first under its own heading.
    pub fn render(&self, label: &str) -> String {
        if self.stderr.is_empty() {
            format!("{}:\n{}", label, self.stdout)
        } else {
            format!("Error:\n{}\n\n{}:\n{}", self.stderr, label, self.stdout)
        }
    }
}

/// Strip a leading `kubectl` token and split the rest on whitespace.
///
/// There is no quoting support: an argument cannot contain spaces.
pub fn split_args(command: &str) -> Result<Vec<String>, KubectlError> {
    let trimmed = command.trim();
    let rest = match trimmed.strip_prefix(TOOL) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => trimmed,
    };
    let args: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    if args.is_empty() {
        return Err(KubectlError::InvalidCommand);
    }
    Ok(args)
}

/// Report produced by the connectivity check.
pub fn connectivity_report(result: &CommandResult) -> String {
    let combined = format!("{}\n{}", result.stdout, result.stderr);
    if !result.stderr.trim().is_empty() || combined.contains("Unable to connect to the server") {
        let detail = if result.stderr.trim().is_empty() {
            result.stdout.trim()
        } else {
            result.stderr.trim()
        };
        return format!("❌ Cluster is not reachable\n\n{}", detail);
    }

    let summary: Vec<&str> = result
        .stdout
        .lines()
        .map(str::trim_end)
        .filter(|l| {
            !l.trim().is_empty()
                && !l.starts_with("Further debugging")
                && !l.starts_with("To further debug")
        })
        .collect();
    format!("✅ Cluster is reachable\n\n{}", summary.join("\n"))
}

/// Parse `major`/`minor` out of `kubectl version --client -o json`.
pub fn parse_client_version(json: &str) -> Result<(u32, u32), KubectlError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| KubectlError::Parse(e.to_string()))?;
    let info = &value["clientVersion"];
    let number = |field: &str| -> Result<u32, KubectlError> {
        let raw = info[field].as_str().unwrap_or_default();
        let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
        digits
            .parse()
            .map_err(|_| KubectlError::Parse(format!("invalid {} version: {:?}", field, raw)))
    };
    Ok((number("major")?, number("minor")?))
}

#[derive(Clone)]
pub struct Kubectl {
    binary: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for Kubectl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kubectl").field("binary", &self.binary).finish()
    }
}

impl Kubectl {
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(binary, Arc::new(ProcessRunner))
    }

    pub fn with_runner(binary: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn run(&self, args: &[String]) -> Result<RawOutput, KubectlError> {
        tracing::debug!(binary = %self.binary, args = ?args, "running kubectl");
        Ok(self.runner.run(&self.binary, args)?)
    }

    /// Run a helper query and return stdout, treating any stderr as failure.
    fn query(&self, args: &[&str]) -> Result<String, KubectlError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let out = self.run(&args)?;
        if !out.stderr.trim().is_empty() {
            return Err(KubectlError::Tool(out.stderr.trim().to_string()));
        }
        if !out.success {
            return Err(KubectlError::Tool(format!("{} exited with an error", self.binary)));
        }
        Ok(out.stdout)
    }

    /// Whether the binary can be found on `PATH`.
    pub fn is_installed(&self) -> bool {
        self.runner
            .run("which", &[self.binary.clone()])
            .map(|o| o.success)
            .unwrap_or(false)
    }

    pub fn client_version(&self) -> Result<(u32, u32), KubectlError> {
        let out = self.query(&["version", "--client", "-o", "json"])?;
        parse_client_version(&out)
    }

    pub fn current_context(&self) -> Result<String, KubectlError> {
        let context = match self.query(&["config", "current-context"]) {
            Ok(out) => out.trim().to_string(),
            Err(e) => {
                tracing::debug!(error = %e, "current-context lookup failed");
                return Err(KubectlError::NoContext);
            }
        };
        if context.is_empty() {
            return Err(KubectlError::NoContext);
        }
        Ok(context)
    }

    /// Run a full command string after checking a cluster context resolves.
    ///
    /// A non-zero exit is not an error here: stderr is returned for display.
    pub fn execute_raw(&self, command: &str) -> Result<CommandResult, KubectlError> {
        self.current_context()?;
        let args = split_args(command)?;
        let out = self.run(&args)?;
        Ok(CommandResult {
            command: format!("{} {}", TOOL, args.join(" ")),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }

    /// Names of every object of `resource`, in `namespace` or the context's
    /// namespace when `None`.
    pub fn list_names(&self, resource: &str, namespace: Option<&str>) -> Result<Vec<String>, KubectlError> {
        let mut args = vec!["get", resource, "-o", "jsonpath={.items[*].metadata.name}"];
        if let Some(ns) = namespace {
            args.push("-n");
            args.push(ns);
        }
        let out = self.query(&args)?;
        Ok(out.split_whitespace().map(str::to_string).collect())
    }

    pub fn list_namespaces(&self) -> Result<Vec<String>, KubectlError> {
        self.list_names("namespaces", None)
    }

    /// Node inventory and totals for the current context.
    ///
    /// Pod count, namespace count and server version are best-effort and
    /// left empty when their queries fail.
    pub fn cluster_info(&self) -> Result<ClusterInfo, KubectlError> {
        let context = self.current_context()?;
        let nodes = cluster::parse_nodes(&self.query(&["get", "nodes", "-o", "json"])?)?;
        let mut info = ClusterInfo::from_nodes(context, nodes);

        info.total_pods = self
            .query(&["get", "pods", "--all-namespaces", "-o", "json"])
            .and_then(|out| cluster::count_items(&out))
            .map_err(|e| tracing::debug!(error = %e, "pod count unavailable"))
            .ok();
        info.namespace_count = self
            .list_namespaces()
            .map(|names| names.len())
            .map_err(|e| tracing::debug!(error = %e, "namespace count unavailable"))
            .ok();
        info.version = self
            .query(&["version", "-o", "json"])
            .ok()
            .and_then(|out| cluster::parse_server_version(&out));
        Ok(info)
    }

    pub fn list_contexts(&self) -> Result<Vec<String>, KubectlError> {
        let out = self.query(&["config", "get-contexts", "-o", "name"])?;
        Ok(out.split_whitespace().map(str::to_string).collect())
    }

    pub fn use_context(&self, name: &str) -> Result<(), KubectlError> {
        self.query(&["config", "use-context", name])?;
        Ok(())
    }

    /// Sorted keys of a secret's `data` map.
    pub fn secret_keys(&self, name: &str, namespace: Option<&str>) -> Result<Vec<String>, KubectlError> {
        let mut args = vec!["get", "secret", name, "-o", "json"];
        if let Some(ns) = namespace {
            args.push("-n");
            args.push(ns);
        }
        let out = self.query(&args)?;
        let value: serde_json::Value =
            serde_json::from_str(&out).map_err(|e| KubectlError::Parse(e.to_string()))?;
        let mut keys: Vec<String> = value["data"]
            .as_object()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
