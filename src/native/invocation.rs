//! Native compiler command line construction

use super::executor::Execution;
use crate::classpath::Classpath;
use crate::error::{BuildError, BuildResult};
use crate::stack::StackId;
use std::path::{Path, PathBuf};

/// Executable name of the native compiler
pub const NATIVE_IMAGE_COMMAND: &str = "native-image";

/// A fully built compiler command line; executed once, then discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    command: String,
    args: Vec<String>,
    dir: PathBuf,
}

impl CompilerInvocation {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn into_execution(self) -> Execution {
        Execution {
            command: self.command,
            args: self.args,
            dir: self.dir,
        }
    }
}

/// Splits the caller's argument string the way a POSIX shell would
pub fn tokenize_arguments(arguments: &str) -> BuildResult<Vec<String>> {
    shell_words::split(arguments).map_err(|e| {
        BuildError::Configuration(format!(
            "unable to parse native-image arguments {:?}: {}",
            arguments, e
        ))
    })
}

/// Builds the compiler invocation.
///
/// Argument order: caller arguments, stack flags, `-H:Name=<layer>/<start class>`,
/// `-cp <classpath>`, and the start class last. The working directory is the layer.
pub fn build_invocation(
    arguments: &str,
    stack: &StackId,
    layer_path: &Path,
    start_class: &str,
    classpath: &Classpath,
) -> BuildResult<CompilerInvocation> {
    let mut args = tokenize_arguments(arguments)?;
    args.extend(stack.compiler_flags().iter().map(|flag| flag.to_string()));
    args.push(format!("-H:Name={}", layer_path.join(start_class).display()));
    args.push("-cp".to_string());
    args.push(classpath.joined());
    args.push(start_class.to_string());

    Ok(CompilerInvocation {
        command: NATIVE_IMAGE_COMMAND.to_string(),
        args,
        dir: layer_path.to_path_buf(),
    })
}

/// The `native-image --version` probe run before compiling
pub fn version_probe(layer_path: &Path) -> Execution {
    Execution {
        command: NATIVE_IMAGE_COMMAND.to_string(),
        args: vec!["--version".to_string()],
        dir: layer_path.to_path_buf(),
    }
}
