use boot_native::cli::commands::{CliArgs, Commands};
use boot_native::cli::handlers::{handle_build, handle_classpath};
use boot_native::util::logging::{config_from_env, init_logging, parse_level};
use boot_native::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("boot-native v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Build(build_args) => handle_build(build_args).await,
        Commands::Classpath(classpath_args) => handle_classpath(classpath_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        Some(parse_level(level_str))
    } else if args.verbose {
        Some(Level::DEBUG)
    } else if args.quiet {
        Some(Level::ERROR)
    } else {
        None
    };

    init_logging(config_from_env(level));
}
