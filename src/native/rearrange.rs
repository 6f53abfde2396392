//! Moves the compiled executable into the application root, replacing its contents.
//!
//! The replacement either completes or leaves the root exactly as it was.

use crate::error::{BuildError, BuildResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile, TempDir};
use tracing::{debug, error, warn};

const STAGING_PREFIX: &str = ".boot-native-";
const BACKUP_PREFIX: &str = ".boot-native-previous-";

/// Installs `executable` as `<application_root>/<name>` and removes everything else
/// that was in the application root. Returns the installed path.
pub fn install_executable(
    executable: &Path,
    application_root: &Path,
    name: &str,
) -> BuildResult<PathBuf> {
    let target = application_root.join(name);

    let staged = stage_copy(executable, application_root)?;

    let backup = Builder::new()
        .prefix(BACKUP_PREFIX)
        .tempdir_in(application_root)
        .map_err(|e| {
            BuildError::io(
                format!("creating backup directory in {}", application_root.display()),
                e,
            )
        })?;

    let moved = match move_aside(application_root, executable, &staged, &backup) {
        Ok(moved) => moved,
        Err((moved, err)) => return Err(rollback(application_root, backup, &moved, err)),
    };

    if let Err(e) = staged.persist(&target) {
        let err = BuildError::io(
            format!("installing executable at {}", target.display()),
            e.error,
        );
        return Err(rollback(application_root, backup, &moved, err));
    }

    debug!(
        removed = moved.len(),
        target = %target.display(),
        "Replaced application contents"
    );

    let backup_path = backup.path().to_path_buf();
    backup.close().map_err(|e| {
        BuildError::io(
            format!("removing previous application contents {}", backup_path.display()),
            e,
        )
    })?;

    Ok(target)
}

fn stage_copy(executable: &Path, application_root: &Path) -> BuildResult<NamedTempFile> {
    let copy_context = || {
        format!(
            "copying {} into {}",
            executable.display(),
            application_root.display()
        )
    };

    let mut staged = Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(application_root)
        .map_err(|e| BuildError::io(copy_context(), e))?;

    let mut source = File::open(executable).map_err(|e| BuildError::io(copy_context(), e))?;
    io::copy(&mut source, staged.as_file_mut()).map_err(|e| BuildError::io(copy_context(), e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| BuildError::io(copy_context(), e))?;

    let permissions = fs::metadata(executable)
        .map_err(|e| BuildError::io(copy_context(), e))?
        .permissions();
    fs::set_permissions(staged.path(), executable_permissions(permissions))
        .map_err(|e| BuildError::io(copy_context(), e))?;

    Ok(staged)
}

#[cfg(unix)]
fn executable_permissions(permissions: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(permissions.mode() | 0o755)
}

#[cfg(not(unix))]
fn executable_permissions(permissions: fs::Permissions) -> fs::Permissions {
    permissions
}

/// Moves every root entry except the staged file, the backup directory, and anything
/// containing the source executable into the backup directory.
fn move_aside(
    application_root: &Path,
    executable: &Path,
    staged: &NamedTempFile,
    backup: &TempDir,
) -> Result<Vec<OsString>, (Vec<OsString>, BuildError)> {
    let mut moved = Vec::new();

    let entries = match fs::read_dir(application_root) {
        Ok(entries) => entries,
        Err(e) => {
            let context = format!("listing {}", application_root.display());
            return Err((moved, BuildError::io(context, e)));
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let context = format!("listing {}", application_root.display());
                return Err((moved, BuildError::io(context, e)));
            }
        };

        let path = entry.path();
        if path == staged.path() || path == backup.path() || executable.starts_with(&path) {
            continue;
        }

        let name = entry.file_name();
        if let Err(e) = fs::rename(&path, backup.path().join(&name)) {
            let context = format!("moving aside {}", path.display());
            return Err((moved, BuildError::io(context, e)));
        }
        moved.push(name);
    }

    Ok(moved)
}

/// Puts moved entries back. If any entry cannot be restored the backup directory is kept
/// on disk and the returned error names it; otherwise `cause` is returned unchanged.
fn rollback(
    application_root: &Path,
    backup: TempDir,
    moved: &[OsString],
    cause: BuildError,
) -> BuildError {
    let mut stranded = restore(application_root, &backup, moved);
    if stranded.is_empty() {
        return cause;
    }

    #[allow(deprecated)]
    let kept = backup.into_path();
    let names: Vec<String> = stranded
        .iter()
        .map(|(name, _)| name.to_string_lossy().into_owned())
        .collect();
    error!(
        backup = %kept.display(),
        entries = ?names,
        "Could not restore application contents, keeping backup"
    );

    let (_, source) = stranded.remove(0);
    BuildError::io(
        format!(
            "{}; could not restore {} into {}, previous contents kept in {}",
            cause,
            names.join(", "),
            application_root.display(),
            kept.display()
        ),
        source,
    )
}

/// Moves entries back from the backup directory, returning those that failed
fn restore(
    application_root: &Path,
    backup: &TempDir,
    moved: &[OsString],
) -> Vec<(OsString, io::Error)> {
    let mut stranded = Vec::new();
    for name in moved {
        let from = backup.path().join(name);
        let to = application_root.join(name);
        if let Err(e) = fs::rename(&from, &to) {
            warn!(
                from = %from.display(),
                to = %to.display(),
                error = %e,
                "Failed to restore application entry"
            );
            stranded.push((name.clone(), e));
        }
    }
    stranded
}
