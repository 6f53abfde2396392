//! Deterministic executor double for tests

use super::executor::{CancelSignal, Execution, ExecutionError, ExecutionOutput, Executor};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub const MOCK_VERSION: &str = "GraalVM 21.0.0 Java 11 CE (mock)";

#[derive(Debug, Clone)]
enum MockBehavior {
    Succeed,
    FailCompilation { status: String, stderr: String },
    FailLaunch,
    Cancel,
}

/// Records every execution and imitates the compiler.
///
/// A successful compilation writes a small file at the `-H:Name=` path, which is what
/// the real compiler produces. The `--version` probe always succeeds unless the mock
/// is set up to fail launching.
pub struct MockExecutor {
    calls: Mutex<Vec<Execution>>,
    behavior: MockBehavior,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Succeed)
    }

    /// Compilation exits non-zero with the given diagnostics
    pub fn failing(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::FailCompilation {
            status: status.into(),
            stderr: stderr.into(),
        })
    }

    /// Every execution fails to launch, as when the compiler is not installed
    pub fn unlaunchable() -> Self {
        Self::with_behavior(MockBehavior::FailLaunch)
    }

    /// Compilation reports cancellation
    pub fn cancelling() -> Self {
        Self::with_behavior(MockBehavior::Cancel)
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            behavior,
        }
    }

    pub fn calls(&self) -> Vec<Execution> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The first execution that was not the version probe
    pub fn compile_call(&self) -> Option<Execution> {
        self.calls()
            .into_iter()
            .find(|c| c.args.iter().all(|a| a != "--version"))
    }

    fn output_path(execution: &Execution) -> Option<PathBuf> {
        execution
            .args
            .iter()
            .find_map(|a| a.strip_prefix("-H:Name="))
            .map(PathBuf::from)
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(
        &self,
        execution: &Execution,
        cancel: CancelSignal,
    ) -> Result<ExecutionOutput, ExecutionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(execution.clone());
        }

        let command = execution.command.clone();

        if *cancel.borrow() {
            return Err(ExecutionError::Cancelled { command });
        }

        if let MockBehavior::FailLaunch = self.behavior {
            return Err(not_found(command));
        }

        if execution.args.iter().any(|a| a == "--version") {
            return Ok(ExecutionOutput {
                stdout: format!("{}\n", MOCK_VERSION),
                stderr: String::new(),
            });
        }

        match &self.behavior {
            MockBehavior::Succeed => {
                if let Some(path) = Self::output_path(execution) {
                    fs::write(&path, b"mock native executable").map_err(|source| {
                        ExecutionError::Launch {
                            command: command.clone(),
                            source,
                        }
                    })?;
                }
                Ok(ExecutionOutput {
                    stdout: "Build on Server completed\n".to_string(),
                    stderr: String::new(),
                })
            }
            MockBehavior::FailCompilation { status, stderr } => Err(ExecutionError::Failed {
                command,
                status: status.clone(),
                output: ExecutionOutput {
                    stdout: String::new(),
                    stderr: stderr.clone(),
                },
            }),
            MockBehavior::Cancel => Err(ExecutionError::Cancelled { command }),
            MockBehavior::FailLaunch => Err(not_found(command)),
        }
    }
}

fn not_found(command: String) -> ExecutionError {
    ExecutionError::Launch {
        command,
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::watch;

    #[tokio::test]
    async fn test_records_and_writes_output() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let mock = MockExecutor::new();
        let out = dir.path().join("app");

        let execution = Execution {
            command: "native-image".to_string(),
            args: vec![format!("-H:Name={}", out.display()), "Main".to_string()],
            dir: dir.path().to_path_buf(),
        };
        mock.execute(&execution, rx).await.unwrap();

        assert!(out.is_file());
        assert_eq!(mock.calls().len(), 1);
        assert_eq!(mock.compile_call(), Some(execution));
    }

    #[tokio::test]
    async fn test_version_probe_succeeds() {
        let (_tx, rx) = watch::channel(false);
        let mock = MockExecutor::failing("exit code 1", "boom");
        let probe = Execution {
            command: "native-image".to_string(),
            args: vec!["--version".to_string()],
            dir: PathBuf::from("/"),
        };

        let output = mock.execute(&probe, rx).await.unwrap();
        assert!(output.stdout.contains("GraalVM"));
        assert!(mock.compile_call().is_none());
    }
}
