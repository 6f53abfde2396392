//! Stack identifiers.
//!
//! The stack names the base image family the executable will run on. Unknown identifiers
//! are carried through as `Custom` so that new stacks never fail a build.

#[macro_use]
pub mod id_enum_macro;

pub mod stack_id;

pub use stack_id::{StackId, TINY_STACK_FLAG};
