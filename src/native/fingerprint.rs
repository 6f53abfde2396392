//! Content fingerprint of the application tree, recorded in layer metadata

use crate::error::{BuildError, BuildResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// SHA-256 over every entry under `root`, in sorted path order.
///
/// Each file contributes its relative path and contents; symlinks contribute their
/// target. Directories contribute only through their children.
pub fn fingerprint(root: &Path) -> BuildResult<String> {
    let mut hasher = Sha256::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let context = format!("listing application files under {}", root.display());
            BuildError::io(context, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let file_type = entry.file_type();
        if file_type.is_file() {
            let content = fs::read(entry.path()).map_err(|e| {
                BuildError::io(format!("reading {}", entry.path().display()), e)
            })?;
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);
            hasher.update(&content);
            hasher.update([0u8]);
        } else if file_type.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| {
                BuildError::io(format!("reading link {}", entry.path().display()), e)
            })?;
            hasher.update(relative.as_bytes());
            hasher.update([1u8]);
            hasher.update(target.to_string_lossy().as_bytes());
            hasher.update([0u8]);
        }
    }

    Ok(hex::encode(hasher.finalize()))
}
