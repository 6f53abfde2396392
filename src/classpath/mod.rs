//! Dependency index handling: reading, gating on the native-support library, and
//! resolving entries into the compiler classpath.

pub mod classifier;
pub mod index;
pub mod resolver;

pub use classifier::{has_native_support, is_native_support};
pub use index::read_index;
pub use resolver::{resolve, Classpath, CLASSPATH_SEPARATOR};
