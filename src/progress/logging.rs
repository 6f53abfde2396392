//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, error, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { application } => {
                info!(application = %application, "Building native image");
            }
            ProgressEvent::StageStarted { stage } => {
                debug!(stage = %stage, "Starting stage");
            }
            ProgressEvent::StageComplete { stage, duration } => {
                debug!(
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::Completed {
                executable,
                total_time,
            } => {
                info!(
                    executable = %executable,
                    total_time_ms = total_time.as_millis(),
                    "Native image build complete"
                );
            }
            ProgressEvent::Failed { stage, error } => {
                error!(stage = %stage, error = %error, "Native image build failed");
            }
        }
    }
}
