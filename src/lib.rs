//! boot-native - ahead-of-time native image build step for Spring Boot applications
//!
//! Takes an exploded Spring Boot application (classes tree plus library directory) and
//! compiles it into a single native executable with GraalVM `native-image`.
//!
//! # Pipeline
//!
//! 1. [`ManifestProperties`] and [`ApplicationLayout`] describe the application
//! 2. [`classpath::read_index`] loads the ordered dependency index
//! 3. [`classpath::has_native_support`] gates the build on Spring Native being present
//! 4. [`classpath::resolve`] produces the compiler classpath
//! 5. [`native::build_invocation`] assembles the `native-image` command line
//! 6. [`NativeImage::contribute`] runs it through an [`Executor`] and installs the result
//!
//! # Example
//!
//! ```no_run
//! use boot_native::{BuildLayer, ManifestProperties, NativeImage, ProcessExecutor, StackId};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), boot_native::BuildError> {
//! let app = Path::new("/workspace");
//! let manifest = ManifestProperties::read(app)?;
//! let native_image = NativeImage::new(
//!     app,
//!     "--no-fallback",
//!     manifest,
//!     StackId::Bionic,
//!     Arc::new(ProcessExecutor),
//! )?;
//!
//! let (_cancel, signal) = tokio::sync::watch::channel(false);
//! let layer = BuildLayer::new("native-image", "/layers/native-image");
//! let layer = native_image.contribute(layer, signal).await?;
//! assert!(layer.cache);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod classpath;
pub mod cli;
pub mod config;
pub mod error;
pub mod layers;
pub mod native;
pub mod progress;
pub mod stack;
pub mod util;

pub use application::{ApplicationLayout, ManifestProperties};
pub use classpath::Classpath;
pub use config::{BuildConfig, ConfigError};
pub use error::{BuildError, BuildResult};
pub use layers::{BuildLayer, Launch, Layers};
pub use native::{
    CancelSignal, CompilerInvocation, Execution, ExecutionError, ExecutionOutput, Executor,
    MockExecutor, NativeImage, ProcessExecutor,
};
pub use stack::StackId;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
