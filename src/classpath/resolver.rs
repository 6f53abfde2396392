//! Classpath resolution

use crate::application::layout::{normalize_relative, ApplicationLayout};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Separator the native compiler expects between classpath entries, on every platform
pub const CLASSPATH_SEPARATOR: &str = ":";

/// Ordered, absolute compiler classpath
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The classpath as the value of the compiler's `-cp` flag
    pub fn joined(&self) -> String {
        self.entries
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(CLASSPATH_SEPARATOR)
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Resolves index entries into the compiler classpath.
///
/// The application root comes first, then the classes directory, then one path per
/// entry in index order. Entries containing `/` already encode their location and
/// resolve under the root; bare file names resolve under the library directory.
pub fn resolve<S: AsRef<str>>(entries: &[S], layout: &ApplicationLayout) -> Classpath {
    let mut resolved = Vec::with_capacity(entries.len() + 2);
    resolved.push(layout.root().to_path_buf());
    resolved.push(layout.classes_dir().to_path_buf());

    for entry in entries {
        let entry = entry.as_ref();
        let path = if entry.contains('/') {
            layout.root().join(normalize_relative(entry))
        } else {
            layout.lib_dir().join(entry)
        };
        resolved.push(path);
    }

    Classpath { entries: resolved }
}
