//! Type-safe builder for external tool invocations.
//!
//! Every external process the pipeline touches goes through [`ToolCommand`]:
//! one place for working-directory handling, output capture, tracing, and
//! the non-zero-exit-becomes-error contract. Exit status is the only thing
//! interpreted here; captured output is carried verbatim in the failure and
//! never parsed for control decisions.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::core::TryoutError;

/// Builder for a single tool invocation that runs to completion.
///
/// No retries and no timeout: a failing tool call is always fatal to the
/// pipeline, and external processes run to completion or failure.
pub struct ToolCommand {
    /// Program to execute (absolute path or PATH lookup)
    program: String,

    /// Arguments passed to the program
    args: Vec<String>,

    /// Working directory for the invocation (defaults to the current one)
    current_dir: Option<std::path::PathBuf>,

    /// Whether to capture output (true) or inherit stdio (false)
    capture_output: bool,

    /// Environment variables to set for the child process
    env_vars: Vec<(String, String)>,

    /// Human-readable operation label used in logs and failures
    /// (e.g. "swift package resolve")
    label: Option<String>,
}

impl ToolCommand {
    /// Create a builder for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            capture_output: true,
            env_vars: Vec::new(),
            label: None,
        }
    }

    /// Set the working directory for the invocation.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Disable output capture so the child writes directly to the terminal.
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Set the operation label used in logs and in `ToolFailure`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label, or a reconstruction from program and arguments.
    fn describe(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            let mut parts = vec![self.program.clone()];
            parts.extend(self.args.iter().cloned());
            parts.join(" ")
        })
    }

    /// Execute the command and return its captured output.
    ///
    /// Returns normally only on zero exit status; any other outcome is a
    /// [`TryoutError::ToolFailure`] carrying the exit status and the
    /// captured stdout/stderr verbatim.
    pub async fn execute(self) -> Result<ToolOutput> {
        let start = std::time::Instant::now();
        let description = self.describe();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
            tracing::debug!(
                target: "toolchain",
                "Executing: {} {} (in {})",
                self.program,
                self.args.join(" "),
                dir.display()
            );
        } else {
            tracing::debug!(
                target: "toolchain",
                "Executing: {} {}",
                self.program,
                self.args.join(" ")
            );
        }

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "toolchain", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output = cmd
            .output()
            .await
            .with_context(|| format!("failed to execute {description}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let status = output.status.code().unwrap_or(-1);

            tracing::debug!(
                target: "toolchain",
                "'{}' failed with exit code {:?}",
                description,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "toolchain", "stderr: {}", stderr.trim());
            }

            let mut captured = String::new();
            captured.push_str(stdout.trim_end());
            if !stdout.trim().is_empty() && !stderr.trim().is_empty() {
                captured.push('\n');
            }
            captured.push_str(stderr.trim_end());

            return Err(TryoutError::ToolFailure {
                tool: description,
                status,
                output: captured,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.trim().is_empty() {
            tracing::debug!(target: "toolchain", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "toolchain::perf",
                "{} took {:.2}s",
                description,
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "toolchain::perf",
                "{} took {}ms",
                description,
                elapsed.as_millis()
            );
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }

    /// Execute and return only stdout, trimmed.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute and check for success, discarding output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Captured output from a successful tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}
