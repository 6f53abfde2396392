//! Command handlers. Each returns the process exit code.

use super::commands::{BuildArgs, ClasspathArgs};
use super::output::{BuildReport, ClasspathReport, OutputFormatter};
use crate::application::ManifestProperties;
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::layers::{Launch, Layers};
use crate::native::{NativeImage, ProcessExecutor};
use crate::progress::LoggingHandler;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, warn};

pub async fn handle_build(args: &BuildArgs) -> i32 {
    let mut config = match BuildConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    if let Some(arguments) = &args.arguments {
        config = config.with_arguments(arguments.clone());
    }
    if let Some(stack) = &args.stack {
        config = config.with_stack(stack.clone());
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    if let Some(layer_name) = &args.layer_name {
        config = config.with_layer_name(layer_name.clone());
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        return 2;
    }
    debug!("{}", config);

    let application = match application_path(args.application_path.as_ref()) {
        Ok(path) => path,
        Err(e) => return report_error(&e),
    };

    match run_build(&application, &args.layers, &config).await {
        Ok(report) => {
            let formatter = OutputFormatter::new(args.format.into());
            match formatter.format_build(&report) {
                Ok(out) => {
                    print!("{}", out);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    1
                }
            }
        }
        Err(e) => report_error(&e),
    }
}

async fn run_build(
    application: &Path,
    layers_path: &Path,
    config: &BuildConfig,
) -> Result<BuildReport, BuildError> {
    let started = Instant::now();

    let manifest = ManifestProperties::read(application)?;
    let native_image = NativeImage::new(
        application,
        config.arguments.clone(),
        manifest,
        config.stack.clone(),
        Arc::new(ProcessExecutor),
    )?
    .with_progress(Arc::new(LoggingHandler));

    let layers = Layers::new(layers_path);
    let layer = layers.layer(&config.layer_name)?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cancel_tx = Arc::new(cancel_tx);
    let watchers = spawn_cancel_watchers(cancel_tx, config.timeout);

    let result = native_image.contribute(layer, cancel_rx).await;
    for watcher in watchers {
        watcher.abort();
    }
    let layer = result?;

    layers.persist(&layer)?;
    let executable = application.join(native_image.start_class());
    layers.write_launch(&Launch::for_executable(&executable))?;

    Ok(BuildReport {
        application: application.display().to_string(),
        executable: executable.display().to_string(),
        layer: layer.path.display().to_string(),
        stack: native_image.stack().id().to_string(),
        cache: layer.cache,
        duration_secs: started.elapsed().as_secs_f64(),
    })
}

/// Raises the cancellation signal on Ctrl-C or when the timeout elapses
fn spawn_cancel_watchers(
    cancel: Arc<watch::Sender<bool>>,
    timeout: Option<Duration>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let mut watchers = Vec::new();

    let on_interrupt = cancel.clone();
    watchers.push(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling native image build");
            let _ = on_interrupt.send(true);
        }
    }));

    if let Some(timeout) = timeout {
        watchers.push(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            warn!(
                timeout_secs = timeout.as_secs(),
                "Timeout reached, cancelling native image build"
            );
            let _ = cancel.send(true);
        }));
    }

    watchers
}

pub fn handle_classpath(args: &ClasspathArgs) -> i32 {
    let application = match application_path(args.application_path.as_ref()) {
        Ok(path) => path,
        Err(e) => return report_error(&e),
    };

    let config = BuildConfig::default();
    let result = ManifestProperties::read(&application).and_then(|manifest| {
        let native_image = NativeImage::new(
            application.clone(),
            config.arguments.clone(),
            manifest,
            config.stack.clone(),
            Arc::new(ProcessExecutor),
        )?;
        let classpath = native_image.resolve_classpath()?;
        Ok(ClasspathReport::new(
            &application,
            native_image.start_class(),
            &classpath,
        ))
    });

    match result {
        Ok(report) => match OutputFormatter::new(args.format.into()).format_classpath(&report) {
            Ok(out) => {
                print!("{}", out);
                0
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
        Err(e) => report_error(&e),
    }
}

fn application_path(path: Option<&PathBuf>) -> Result<PathBuf, BuildError> {
    match path {
        Some(path) => Ok(path.clone()),
        None => env::current_dir()
            .map_err(|e| BuildError::io("determining current directory", e)),
    }
}

fn report_error(e: &BuildError) -> i32 {
    error!("{}", e);
    eprintln!("Error: {}", e);
    e.exit_code()
}
