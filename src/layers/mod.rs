//! Build layers and launch metadata.
//!
//! A layer is a directory under the layers root plus a `<name>.toml` describing how it
//! may be used: `cache` (reuse in later builds), `build`, and `launch`, with free-form
//! `[metadata]`. The orchestrator writes into a layer and flips its cache flag; `Layers`
//! allocates and persists them.

use crate::error::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output directory of a build step together with its usage flags
#[derive(Debug, Clone, PartialEq)]
pub struct BuildLayer {
    pub name: String,
    pub path: PathBuf,
    pub cache: bool,
    pub build: bool,
    pub launch: bool,
    pub metadata: toml::Table,
}

impl BuildLayer {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            cache: false,
            build: false,
            launch: false,
            metadata: toml::Table::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LayerTypes {
    build: bool,
    cache: bool,
    launch: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayerDescriptor {
    types: LayerTypes,
    #[serde(default)]
    metadata: toml::Table,
}

/// A process the platform can launch from the built image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "type")]
    pub process_type: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub direct: bool,
    #[serde(default)]
    pub default: bool,
}

/// Contents of `launch.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launch {
    pub processes: Vec<Process>,
}

impl Launch {
    /// Process types that start the native executable directly; `web` is the default
    pub fn for_executable(executable: &Path) -> Self {
        let command = executable.display().to_string();
        let processes = ["native-image", "task", "web"]
            .into_iter()
            .map(|process_type| Process {
                process_type: process_type.to_string(),
                command: command.clone(),
                args: Vec::new(),
                direct: true,
                default: process_type == "web",
            })
            .collect();
        Self { processes }
    }
}

/// The layers root directory
#[derive(Debug, Clone)]
pub struct Layers {
    path: PathBuf,
}

impl Layers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Allocates `<layers>/<name>/`, creating it if needed
    pub fn layer(&self, name: &str) -> BuildResult<BuildLayer> {
        let path = self.path.join(name);
        fs::create_dir_all(&path)
            .map_err(|e| BuildError::io(format!("creating layer {}", path.display()), e))?;
        Ok(BuildLayer::new(name, path))
    }

    pub fn descriptor_path(&self, layer: &BuildLayer) -> PathBuf {
        self.path.join(format!("{}.toml", layer.name))
    }

    /// Writes `<layers>/<name>.toml` with the layer's flags and metadata
    pub fn persist(&self, layer: &BuildLayer) -> BuildResult<PathBuf> {
        let descriptor = LayerDescriptor {
            types: LayerTypes {
                build: layer.build,
                cache: layer.cache,
                launch: layer.launch,
            },
            metadata: layer.metadata.clone(),
        };
        let path = self.descriptor_path(layer);
        write_toml(&path, &descriptor)?;
        debug!(layer = %layer.name, path = %path.display(), "Persisted layer");
        Ok(path)
    }

    /// Reads a previously persisted layer back, if present
    pub fn load(&self, name: &str) -> BuildResult<Option<BuildLayer>> {
        let mut layer = BuildLayer::new(name, self.path.join(name));
        let path = self.descriptor_path(&layer);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| BuildError::io(format!("reading {}", path.display()), e))?;
        let descriptor: LayerDescriptor =
            toml::from_str(&content).map_err(|e| BuildError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        layer.build = descriptor.types.build;
        layer.cache = descriptor.types.cache;
        layer.launch = descriptor.types.launch;
        layer.metadata = descriptor.metadata;
        Ok(Some(layer))
    }

    /// Writes `<layers>/launch.toml`
    pub fn write_launch(&self, launch: &Launch) -> BuildResult<PathBuf> {
        let path = self.path.join("launch.toml");
        write_toml(&path, launch)?;
        Ok(path)
    }
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> BuildResult<()> {
    let content = toml::to_string(value).map_err(|e| {
        BuildError::io(
            format!("serializing {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })?;
    fs::write(path, content).map_err(|e| BuildError::io(format!("writing {}", path.display()), e))
}
