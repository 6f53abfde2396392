//! Execution capability for external commands
//!
//! The orchestrator only ever talks to an [`Executor`]. [`ProcessExecutor`] launches real
//! processes; tests substitute [`MockExecutor`](super::MockExecutor).

use async_trait::async_trait;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Cancellation signal; the build is cancelled once the value becomes `true`.
///
/// A dropped sender means the signal can never fire.
pub type CancelSignal = watch::Receiver<bool>;

/// A command to run, its arguments, and its working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub command: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    /// Stdout followed by stderr, for diagnostics
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}")]
    Failed {
        command: String,
        status: String,
        output: ExecutionOutput,
    },

    #[error("{command} was cancelled")]
    Cancelled { command: String },
}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Runs the execution to completion, or until `cancel` fires
    async fn execute(
        &self,
        execution: &Execution,
        cancel: CancelSignal,
    ) -> Result<ExecutionOutput, ExecutionError>;
}

/// Runs executions as child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

#[async_trait]
impl Executor for ProcessExecutor {
    async fn execute(
        &self,
        execution: &Execution,
        mut cancel: CancelSignal,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let command = execution.command.clone();

        if *cancel.borrow() {
            return Err(ExecutionError::Cancelled { command });
        }

        info!(
            command = %command,
            args = ?execution.args,
            dir = %execution.dir.display(),
            "Executing"
        );

        let mut child = Command::new(&execution.command)
            .args(&execution.args)
            .current_dir(&execution.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Launch {
                command: command.clone(),
                source,
            })?;

        let stdout_task = tokio::spawn(collect_lines(child.stdout.take(), false));
        let stderr_task = tokio::spawn(collect_lines(child.stderr.take(), true));

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancelled(&mut cancel) => None,
        };

        let status = match waited {
            Some(status) => status.map_err(|source| ExecutionError::Launch {
                command: command.clone(),
                source,
            })?,
            None => {
                warn!(command = %command, "Cancellation requested, terminating process");
                if let Err(e) = child.kill().await {
                    warn!(command = %command, error = %e, "Failed to kill process");
                }
                stdout_task.abort();
                stderr_task.abort();
                return Err(ExecutionError::Cancelled { command });
            }
        };

        let output = ExecutionOutput {
            stdout: stdout_task.await.unwrap_or_default(),
            stderr: stderr_task.await.unwrap_or_default(),
        };

        debug!(command = %command, status = %status, "Process exited");

        if status.success() {
            Ok(output)
        } else {
            Err(ExecutionError::Failed {
                command,
                status: describe_status(status),
                output,
            })
        }
    }
}

async fn cancelled(cancel: &mut CancelSignal) {
    let closed = cancel.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

async fn collect_lines<R>(reader: Option<R>, is_stderr: bool) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return String::new();
    };

    let mut collected = String::new();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if is_stderr {
            warn!(target: "boot_native::compiler", "{}", line);
        } else {
            info!(target: "boot_native::compiler", "{}", line);
        }
        collected.push_str(&line);
        collected.push('\n');
    }
    collected
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn sh(script: &str, dir: &TempDir) -> Execution {
        Execution {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            dir: dir.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_captures_output_and_runs_in_dir() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);

        let output = ProcessExecutor
            .execute(&sh("echo out; echo err >&2; touch made-here", &dir), rx)
            .await
            .unwrap();

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(dir.path().join("made-here").exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure_with_output() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);

        let err = ProcessExecutor
            .execute(&sh("echo broken >&2; exit 3", &dir), rx)
            .await
            .unwrap_err();

        match err {
            ExecutionError::Failed { status, output, .. } => {
                assert_eq!(status, "exit code 3");
                assert_eq!(output.stderr, "broken\n");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_command_is_launch_error() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let execution = Execution {
            command: "definitely-not-a-real-command-4711".to_string(),
            args: vec![],
            dir: dir.path().to_path_buf(),
        };

        let err = ProcessExecutor.execute(&execution, rx).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_kills_process() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = tx.send(true);
        });

        let started = Instant::now();
        let err = ProcessExecutor
            .execute(&sh("sleep 30", &dir), rx)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_already_cancelled_does_not_launch() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(true);

        let err = ProcessExecutor
            .execute(&sh("touch launched", &dir), rx)
            .await
            .unwrap_err();

        assert!(matches!(err, ExecutionError::Cancelled { .. }));
        assert!(!dir.path().join("launched").exists());
    }

    #[tokio::test]
    async fn test_dropped_sender_never_cancels() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        drop(tx);

        let output = ProcessExecutor
            .execute(&sh("echo done", &dir), rx)
            .await
            .unwrap();
        assert_eq!(output.stdout, "done\n");
    }

    #[test]
    fn test_combined_output() {
        let output = ExecutionOutput {
            stdout: "a\n".to_string(),
            stderr: "b\n".to_string(),
        };
        assert_eq!(output.combined(), "a\nb\n");
        assert_eq!(ExecutionOutput::default().combined(), "");
    }
}
