//! Native image compilation: invocation, execution, and the build orchestrator.

pub mod executor;
pub mod fingerprint;
pub mod invocation;
pub mod mock;
pub mod orchestrator;
pub mod rearrange;

pub use executor::{
    CancelSignal, Execution, ExecutionError, ExecutionOutput, Executor, ProcessExecutor,
};
pub use invocation::{build_invocation, CompilerInvocation, NATIVE_IMAGE_COMMAND};
pub use mock::MockExecutor;
pub use orchestrator::NativeImage;
