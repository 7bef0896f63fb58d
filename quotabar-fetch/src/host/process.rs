//! Subprocess execution for CLI ledgers.
//!
//! The cost-ledger provider shells out to an external statistics command;
//! this module provides the runner it does so through. The runner is a
//! trait so provider tests can substitute canned outputs instead of
//! spawning processes.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ProcessError;

// ============================================================================
// Command Output
// ============================================================================

/// Output from a subprocess execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output content, ANSI escapes stripped.
    pub stdout: String,
    /// Standard error content.
    pub stderr: String,
    /// Exit code (0 = success).
    pub exit_code: i32,
    /// How long the command took to execute.
    pub duration: Duration,
}

impl CommandOutput {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the stdout if successful, otherwise a non-zero-exit error.
    pub fn stdout_if_success(&self) -> Result<&str, ProcessError> {
        if self.success() {
            Ok(&self.stdout)
        } else {
            Err(ProcessError::NonZeroExit {
                code: self.exit_code,
                stderr: self.stderr.clone(),
            })
        }
    }
}

// ============================================================================
// Command Runner Trait
// ============================================================================

/// Capability to execute a named external command and capture its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a command with the given timeout and captures its output.
    async fn run(
        &self,
        cmd: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProcessError>;

    /// Returns true if the command exists on PATH.
    fn command_exists(&self, cmd: &str) -> bool;
}

// ============================================================================
// System Command Runner
// ============================================================================

/// Production runner over `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Creates a new system runner.
    pub fn new() -> Self {
        Self
    }

    /// Finds the path to a command.
    pub fn which(&self, cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    #[instrument(skip(self), fields(cmd = %cmd))]
    async fn run(
        &self,
        cmd: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProcessError> {
        debug!(args = ?args, "Running command");

        let cmd_path = self.which(cmd).ok_or_else(|| {
            warn!(cmd = %cmd, "Command not found");
            ProcessError::NotFound(cmd.to_string())
        })?;

        let start = Instant::now();

        let mut command = Command::new(&cmd_path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(cmd = %cmd, timeout = ?timeout, "Command timed out");
                return Err(ProcessError::Timeout(timeout));
            }
        };

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        // Ledger CLIs decorate their tables with color codes; strip them
        // before anything downstream tries to parse the text.
        let stdout = strip_ansi_escapes::strip_str(String::from_utf8_lossy(&output.stdout));

        let result = CommandOutput {
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            duration,
        };

        debug!(
            exit_code = exit_code,
            duration = ?duration,
            stdout_len = result.stdout.len(),
            "Command completed"
        );

        Ok(result)
    }

    fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        let runner = SystemCommandRunner::new();

        assert!(runner.command_exists("echo"));
        assert!(!runner.command_exists("definitely_not_a_real_command_12345"));
    }

    #[tokio::test]
    async fn test_run_echo() {
        let runner = SystemCommandRunner::new();

        let output = runner
            .run("echo", &["hello", "world"], Duration::from_secs(5))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stdout_if_success().is_ok());
    }

    #[tokio::test]
    async fn test_run_failure_exit_code() {
        let runner = SystemCommandRunner::new();

        let output = runner
            .run("ls", &["/definitely/not/a/real/path/12345"], Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!output.success());
        assert!(matches!(
            output.stdout_if_success(),
            Err(ProcessError::NonZeroExit { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let runner = SystemCommandRunner::new();

        let result = runner
            .run("not_a_real_command_xyz", &[], Duration::from_secs(5))
            .await;

        assert!(matches!(result, Err(ProcessError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = SystemCommandRunner::new();

        let result = runner
            .run("sleep", &["5"], Duration::from_millis(100))
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout(_))));
    }
}
