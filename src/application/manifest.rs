//! Manifest properties describing an exploded Spring Boot application

use crate::error::{BuildError, BuildResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const START_CLASS: &str = "Start-Class";
pub const CLASSES: &str = "Spring-Boot-Classes";
pub const CLASSPATH_INDEX: &str = "Spring-Boot-Classpath-Index";
pub const LIB: &str = "Spring-Boot-Lib";

/// Location of the manifest relative to the application root
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// The four manifest keys the build needs, validated at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestProperties {
    pub start_class: String,
    pub classes: String,
    pub classpath_index: String,
    pub lib: String,
}

impl ManifestProperties {
    /// Builds the properties from an already-parsed key/value mapping.
    ///
    /// Every required key must be present with a non-blank value; the error lists all
    /// keys that are missing, not just the first.
    pub fn from_map(map: &HashMap<String, String>) -> BuildResult<Self> {
        let lookup = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let start_class = lookup(START_CLASS);
        let classes = lookup(CLASSES);
        let classpath_index = lookup(CLASSPATH_INDEX);
        let lib = lookup(LIB);

        let missing: Vec<&str> = [
            (START_CLASS, start_class.is_none()),
            (CLASSES, classes.is_none()),
            (CLASSPATH_INDEX, classpath_index.is_none()),
            (LIB, lib.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| key)
        .collect();

        match (start_class, classes, classpath_index, lib) {
            (Some(start_class), Some(classes), Some(classpath_index), Some(lib)) => Ok(Self {
                start_class,
                classes,
                classpath_index,
                lib,
            }),
            _ => Err(BuildError::Configuration(format!(
                "manifest is missing required key(s): {}",
                missing.join(", ")
            ))),
        }
    }

    /// Reads `META-INF/MANIFEST.MF` under the application root
    pub fn read(application_root: &Path) -> BuildResult<Self> {
        let path = application_root.join(MANIFEST_PATH);
        let content = fs::read_to_string(&path)
            .map_err(|e| BuildError::io(format!("reading manifest {}", path.display()), e))?;
        let map = parse_manifest(&content);
        debug!(path = %path.display(), keys = map.len(), "Parsed manifest");
        Self::from_map(&map)
    }
}

/// Parses the main section of a JAR manifest.
///
/// Lines are `Key: Value`; a line starting with a single space continues the previous
/// value. The first blank line ends the main section.
pub fn parse_manifest(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut current: Option<(String, String)> = None;

    for raw in content.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line.is_empty() {
            if current.is_some() || !map.is_empty() {
                break;
            }
            continue;
        }

        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(continuation);
            }
            continue;
        }

        if let Some((key, value)) = current.take() {
            map.insert(key, value);
        }

        if let Some((key, value)) = line.split_once(':') {
            let value = value.strip_prefix(' ').unwrap_or(value);
            current = Some((key.trim().to_string(), value.to_string()));
        }
    }

    if let Some((key, value)) = current {
        map.insert(key, value);
    }

    map
}
