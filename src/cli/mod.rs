pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{BuildArgs, ClasspathArgs, CliArgs, Commands};
pub use output::{BuildReport, ClasspathReport, OutputFormat, OutputFormatter};
