//! Directory layout of an exploded application

use super::manifest::ManifestProperties;
use crate::error::{BuildError, BuildResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Application root and the fixed sub-paths named by its manifest.
///
/// Sub-paths are resolved once at construction and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationLayout {
    root: PathBuf,
    classes_dir: PathBuf,
    lib_dir: PathBuf,
    index_relative: PathBuf,
}

impl ApplicationLayout {
    /// Derives the layout, failing if the root is not a readable directory
    pub fn new(root: impl Into<PathBuf>, manifest: &ManifestProperties) -> BuildResult<Self> {
        let root = root.into();
        fs::read_dir(&root).map_err(|e| {
            BuildError::io(
                format!("reading application directory {}", root.display()),
                e,
            )
        })?;

        Ok(Self {
            classes_dir: root.join(normalize_relative(&manifest.classes)),
            lib_dir: root.join(normalize_relative(&manifest.lib)),
            index_relative: normalize_relative(&manifest.classpath_index),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Dependency index path, relative to the root
    pub fn index_relative_path(&self) -> &Path {
        &self.index_relative
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_relative)
    }
}

/// Turns a manifest or index path into a clean relative path.
///
/// `/` always separates segments. Empty and `.` segments are dropped, so trailing
/// separators disappear, and a leading root never escapes the application directory.
pub fn normalize_relative(path: &str) -> PathBuf {
    path.split('/')
        .flat_map(|segment| Path::new(segment).components())
        .filter_map(|component| match component {
            Component::Normal(part) => Some(PathBuf::from(part)),
            Component::ParentDir => Some(PathBuf::from("..")),
            _ => None,
        })
        .collect()
}
