//! Error taxonomy for the native image build step

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the build orchestrator
///
/// Every variant is terminal: the build step reports it and stops.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Missing manifest keys, absent native-support dependency, bad arguments
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The dependency index is not a list of strings
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Filesystem failure, with the stage and path that caused it
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// The compiler could not be launched or exited unsuccessfully
    #[error("native-image compilation failed: {message}{}", format_output(output))]
    Compilation { message: String, output: String },

    /// The cancellation signal fired while the compiler was running
    #[error("native-image compilation cancelled")]
    Cancelled,
}

fn format_output(output: &str) -> String {
    if output.trim().is_empty() {
        String::new()
    } else {
        format!("\n{}", output.trim_end())
    }
}

impl BuildError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this class of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Configuration(_) => 2,
            BuildError::Cancelled => 130,
            BuildError::Parse { .. } | BuildError::Io { .. } | BuildError::Compilation { .. } => 1,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BuildError::Configuration(_))
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
