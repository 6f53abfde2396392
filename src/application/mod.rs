//! The exploded application: its manifest and the directory layout derived from it.

pub mod layout;
pub mod manifest;

pub use layout::ApplicationLayout;
pub use manifest::ManifestProperties;
