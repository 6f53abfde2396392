//! Build orchestrator: from exploded application to native executable

use super::executor::{CancelSignal, ExecutionError, Executor};
use super::fingerprint::fingerprint;
use super::invocation::{build_invocation, tokenize_arguments, version_probe};
use super::rearrange::install_executable;
use crate::application::{ApplicationLayout, ManifestProperties};
use crate::classpath::{has_native_support, read_index, resolve, Classpath};
use crate::error::{BuildError, BuildResult};
use crate::layers::BuildLayer;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler, Stage};
use crate::stack::StackId;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Compiles one exploded application into a native executable.
///
/// All inputs are fixed at construction. `contribute` may be called once per build.
pub struct NativeImage {
    layout: ApplicationLayout,
    manifest: ManifestProperties,
    arguments: String,
    stack: StackId,
    executor: Arc<dyn Executor>,
    progress: Arc<dyn ProgressHandler>,
}

impl NativeImage {
    /// Validates the inputs and derives the application layout.
    ///
    /// Fails if the application root is unreadable or the argument string cannot be
    /// tokenized.
    pub fn new(
        application_path: impl Into<PathBuf>,
        arguments: impl Into<String>,
        manifest: ManifestProperties,
        stack: StackId,
        executor: Arc<dyn Executor>,
    ) -> BuildResult<Self> {
        let arguments = arguments.into();
        tokenize_arguments(&arguments)?;
        let layout = ApplicationLayout::new(application_path, &manifest)?;

        Ok(Self {
            layout,
            manifest,
            arguments,
            stack,
            executor,
            progress: Arc::new(NoOpHandler),
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn layout(&self) -> &ApplicationLayout {
        &self.layout
    }

    pub fn start_class(&self) -> &str {
        &self.manifest.start_class
    }

    pub fn stack(&self) -> &StackId {
        &self.stack
    }

    /// Reads the dependency index, checks for native support, and resolves the classpath
    pub fn resolve_classpath(&self) -> BuildResult<Classpath> {
        let entries = self.stage(Stage::ReadIndex, || {
            read_index(self.layout.root(), self.layout.index_relative_path())
        })?;

        self.stage(Stage::Classify, || {
            if has_native_support(&entries) {
                Ok(())
            } else {
                Err(BuildError::Configuration(format!(
                    "no native-image dependency found in {}: expected spring-native-*.jar \
                     or spring-graalvm-native-*.jar",
                    self.layout.index_path().display()
                )))
            }
        })?;

        self.stage(Stage::ResolveClasspath, || {
            let classpath = resolve(&entries, &self.layout);
            debug!(classpath = %classpath, "Resolved classpath");
            Ok(classpath)
        })
    }

    /// Runs the whole build into `layer`.
    ///
    /// On success the executable exists at `<layer>/<start class>` and is the only entry
    /// of the application root, and the returned layer is marked cacheable.
    pub async fn contribute(
        &self,
        mut layer: BuildLayer,
        cancel: CancelSignal,
    ) -> BuildResult<BuildLayer> {
        let started = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            application: self.layout.root().display().to_string(),
        });

        let classpath = self.resolve_classpath()?;
        let files = self.stage(Stage::Fingerprint, || fingerprint(self.layout.root()))?;

        self.progress.on_progress(&ProgressEvent::StageStarted {
            stage: Stage::VersionProbe,
        });
        let probe_started = Instant::now();
        let version = self
            .executor
            .execute(&version_probe(&layer.path), cancel.clone())
            .await
            .map_err(|e| self.fail(Stage::VersionProbe, execution_error(e)))?;
        let version = version.stdout.trim().to_string();
        self.progress.on_progress(&ProgressEvent::StageComplete {
            stage: Stage::VersionProbe,
            duration: probe_started.elapsed(),
        });
        info!(version = %version, "Using native-image");

        let invocation = self.stage(Stage::BuildInvocation, || {
            build_invocation(
                &self.arguments,
                &self.stack,
                &layer.path,
                self.start_class(),
                &classpath,
            )
        })?;
        let arguments = invocation.args().to_vec();

        self.progress.on_progress(&ProgressEvent::StageStarted {
            stage: Stage::Compile,
        });
        let compile_started = Instant::now();
        self.executor
            .execute(&invocation.into_execution(), cancel)
            .await
            .map_err(|e| self.fail(Stage::Compile, execution_error(e)))?;

        let executable = layer.path.join(self.start_class());
        if !executable.is_file() {
            return Err(self.fail(
                Stage::Compile,
                BuildError::Compilation {
                    message: format!(
                        "compiler reported success but {} was not produced",
                        executable.display()
                    ),
                    output: String::new(),
                },
            ));
        }
        self.progress.on_progress(&ProgressEvent::StageComplete {
            stage: Stage::Compile,
            duration: compile_started.elapsed(),
        });

        let installed = self.stage(Stage::Rearrange, || {
            install_executable(&executable, self.layout.root(), self.start_class())
        })?;

        layer.cache = true;
        layer.metadata.insert(
            "arguments".to_string(),
            toml::Value::Array(arguments.into_iter().map(toml::Value::String).collect()),
        );
        layer
            .metadata
            .insert("files".to_string(), toml::Value::String(files));
        layer.metadata.insert(
            "stack".to_string(),
            toml::Value::String(self.stack.id().to_string()),
        );
        layer
            .metadata
            .insert("version".to_string(), toml::Value::String(version));

        self.progress.on_progress(&ProgressEvent::Completed {
            executable: installed.display().to_string(),
            total_time: started.elapsed(),
        });

        Ok(layer)
    }

    fn stage<T>(&self, stage: Stage, run: impl FnOnce() -> BuildResult<T>) -> BuildResult<T> {
        self.progress
            .on_progress(&ProgressEvent::StageStarted { stage });
        let started = Instant::now();
        let value = run().map_err(|e| self.fail(stage, e))?;
        self.progress.on_progress(&ProgressEvent::StageComplete {
            stage,
            duration: started.elapsed(),
        });
        Ok(value)
    }

    fn fail(&self, stage: Stage, error: BuildError) -> BuildError {
        self.progress.on_progress(&ProgressEvent::Failed {
            stage,
            error: error.to_string(),
        });
        error
    }
}

fn execution_error(error: ExecutionError) -> BuildError {
    match error {
        ExecutionError::Cancelled { .. } => BuildError::Cancelled,
        ExecutionError::Failed { ref output, .. } => BuildError::Compilation {
            output: output.combined(),
            message: error.to_string(),
        },
        ExecutionError::Launch { .. } => BuildError::Compilation {
            message: error.to_string(),
            output: String::new(),
        },
    }
}
