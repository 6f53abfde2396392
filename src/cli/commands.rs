use crate::stack::StackId;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Compiles an exploded Spring Boot application into a native executable
#[derive(Parser, Debug)]
#[command(
    name = "boot-native",
    about = "Compiles an exploded Spring Boot application into a native executable",
    version,
    author,
    long_about = "boot-native reads the application's manifest and classpath index, checks that \
                  the application depends on Spring Native, and runs the GraalVM native-image \
                  compiler. On success the application directory is replaced by the compiled \
                  executable."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Compile the application into a native executable",
        long_about = "Runs the full native image build: reads the manifest and classpath \
                      index, invokes native-image, installs the executable in the application \
                      directory, and writes layer and launch metadata.\n\n\
                      Examples:\n  \
                      boot-native build --layers /layers\n  \
                      boot-native build /workspace --layers /layers --stack io.paketo.stacks.tiny\n  \
                      boot-native build --layers /layers --args '--no-fallback -J-Xmx4g'"
    )]
    Build(BuildArgs),

    #[command(
        about = "Print the classpath native-image would be given",
        long_about = "Reads the manifest and classpath index and prints the resolved compiler \
                      classpath without compiling anything.\n\n\
                      Examples:\n  \
                      boot-native classpath\n  \
                      boot-native classpath /workspace --format json"
    )]
    Classpath(ClasspathArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the exploded application (defaults to current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Directory that holds build layers")]
    pub layers: PathBuf,

    #[arg(long, value_name = "NAME", help = "Layer the compiler writes into")]
    pub layer_name: Option<String>,

    #[arg(
        long,
        value_name = "STACK_ID",
        help = "Stack identifier (defaults to $CNB_STACK_ID)"
    )]
    pub stack: Option<StackId>,

    #[arg(
        long = "args",
        value_name = "ARGS",
        allow_hyphen_values = true,
        help = "Extra native-image arguments, shell-quoted"
    )]
    pub arguments: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Cancel compilation after this many seconds (0 disables)"
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ClasspathArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the exploded application (defaults to current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
