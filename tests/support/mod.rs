//! Shared fixtures for the integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const START_CLASS: &str = "test-start-class";

/// An exploded Spring Boot application next to an empty layers directory
pub struct SpringApp {
    _dir: TempDir,
    pub root: PathBuf,
    pub layers: PathBuf,
}

impl SpringApp {
    /// Writes the manifest, a compiled class, and a dependency index with the given entries
    pub fn with_index(entries: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("application");
        let layers = dir.path().join("layers");
        fs::create_dir_all(&layers).unwrap();

        write(
            &root.join("META-INF/MANIFEST.MF"),
            &format!(
                "Manifest-Version: 1.0\r\n\
                 Start-Class: {}\r\n\
                 Spring-Boot-Classes: BOOT-INF/classes/\r\n\
                 Spring-Boot-Classpath-Index: BOOT-INF/classpath.idx\r\n\
                 Spring-Boot-Lib: BOOT-INF/lib/\r\n\r\n",
                START_CLASS
            ),
        );
        write(&root.join("BOOT-INF/classes/Application.class"), "");
        fs::create_dir_all(root.join("BOOT-INF/lib")).unwrap();

        let index: String = entries
            .iter()
            .map(|entry| format!("- \"{}\"\n", entry))
            .collect();
        write(&root.join("BOOT-INF/classpath.idx"), &index);

        Self {
            _dir: dir,
            root,
            layers,
        }
    }

    pub fn path(&self, relative: &str) -> String {
        self.root.join(relative).display().to_string()
    }

    /// Names of the entries directly under the application root
    #[allow(dead_code)]
    pub fn root_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[allow(dead_code)]
pub fn boot_native_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.join("boot-native")
}
