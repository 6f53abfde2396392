//! Progress handler trait and events

use std::fmt;
use std::time::Duration;

/// Build stages, in the order the orchestrator runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadIndex,
    Classify,
    ResolveClasspath,
    Fingerprint,
    VersionProbe,
    BuildInvocation,
    Compile,
    Rearrange,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ReadIndex => "read-index",
            Stage::Classify => "classify",
            Stage::ResolveClasspath => "resolve-classpath",
            Stage::Fingerprint => "fingerprint",
            Stage::VersionProbe => "version-probe",
            Stage::BuildInvocation => "build-invocation",
            Stage::Compile => "compile",
            Stage::Rearrange => "rearrange",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted while a build runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Build started for an application
    Started { application: String },

    /// A stage began
    StageStarted { stage: Stage },

    /// A stage finished successfully
    StageComplete { stage: Stage, duration: Duration },

    /// Build completed successfully
    Completed {
        executable: String,
        total_time: Duration,
    },

    /// A stage failed; the build stops here
    Failed { stage: Stage, error: String },
}

/// Trait for handling progress events during a build
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
